use crate::config::Config;
use crate::errors::AppResult;

pub struct ConfigLogic;

impl ConfigLogic {
    /// Print the effective configuration, `--db` override included.
    pub fn print(cfg: &Config) -> AppResult<()> {
        println!("📄 Current configuration ({}):\n", Config::config_file().display());
        println!("{}", serde_yaml::to_string(cfg)?);
        Ok(())
    }
}

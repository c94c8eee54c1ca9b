use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::catalog::DutyCatalog;
use crate::db::pool::DbPool;
use crate::db::queries::load_all_duty_types;
use crate::errors::AppResult;
use crate::models::duty_type::NewDutyType;
use crate::ui::messages::{info, success};
use crate::utils::colors::{GREEN, RESET};
use crate::utils::table::{Column, Table};
use std::fs;

/// Seed records from a YAML (or JSON, a YAML subset) file.
fn read_seed_file(path: &str) -> AppResult<Vec<NewDutyType>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&content)?)
}

fn print_catalog(pool: &DbPool) -> AppResult<()> {
    let types = load_all_duty_types(&pool.conn)?;
    if types.is_empty() {
        info("The duty catalog is empty.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        Column::new("ID"),
        Column::new("Name"),
        Column::new("Code"),
        Column::new("Position"),
        Column::new("Active"),
    ]);

    for d in &types {
        table.add_row(vec![
            d.id.to_string(),
            d.name.clone(),
            d.source_code.clone(),
            d.qualifier_str().to_string(),
            if d.active { "yes" } else { "no" }.to_string(),
        ]);
    }
    print!("{}", table.render());
    Ok(())
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Catalog {
        seed,
        file,
        force,
        list,
        deactivate,
    } = cmd
    {
        let mut pool = DbPool::new(&cfg.database)?;

        if *seed {
            let items = match file {
                Some(path) => read_seed_file(path)?,
                None => NewDutyType::standard_set(),
            };
            let n = pool.with_conn(|conn| DutyCatalog::seed(conn, &items, *force))?;
            success(format!("Seeded {}{}{} duty type(s).", GREEN, n, RESET));
        }

        if let Some(name) = deactivate {
            pool.with_conn(|conn| DutyCatalog::deactivate(conn, name))?;
            success(format!("Duty type '{}' deactivated.", name));
        }

        if *list {
            print_catalog(&pool)?;
        }
    }

    Ok(())
}

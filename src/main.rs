//! rRoster main entrypoint.

use rroster::run;
use rroster::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}

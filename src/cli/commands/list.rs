use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::list::{ListFilter, ListLogic};
use crate::db::pool::DbPool;
use crate::db::queries::load_group_control;
use crate::errors::{AppError, AppResult};
use crate::models::window::DateWindow;
use crate::ui::messages::info;
use crate::utils::date::parse_date;
use crate::utils::table::{Column, Table};

/// Open bounds, chosen so they still compare correctly as TEXT.
const OPEN_START: &str = "0001-01-01";
const OPEN_END: &str = "9999-12-31";

fn resolve_window(from: &Option<String>, to: &Option<String>) -> AppResult<Option<DateWindow>> {
    if from.is_none() && to.is_none() {
        return Ok(None);
    }

    let parse = |s: &str| parse_date(s).ok_or_else(|| AppError::InvalidDate(s.to_string()));

    let start = parse(from.as_deref().unwrap_or(OPEN_START))?;
    let end = parse(to.as_deref().unwrap_or(OPEN_END))?;

    Ok(Some(DateWindow::new(start, end)?))
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List {
        from,
        to,
        person,
        duty,
        exclude_responsible,
        group_control,
    } = cmd
    {
        let pool = DbPool::new(&cfg.database)?;
        let window = resolve_window(from, to)?;

        if *group_control {
            let entries = load_group_control(&pool.conn, window.as_ref())?;
            if entries.is_empty() {
                info("No group-control days found.");
                return Ok(());
            }
            println!("📅 Group control:");
            for e in entries {
                println!("  {}", e.date.format("%Y-%m-%d (%a)"));
            }
            return Ok(());
        }

        let filter = ListFilter {
            window,
            person_ids: person.clone(),
            duty_names: duty.clone(),
            ignore_duty_name: exclude_responsible.then(|| cfg.responsible_name.clone()),
        };

        let rows = ListLogic::assignments(&pool, &filter)?;
        if rows.is_empty() {
            info("No assignments found.");
            return Ok(());
        }

        let mut table = Table::new(vec![
            Column::new("Date"),
            Column::new("Person"),
            Column::new("Duty"),
            Column::new("Code"),
        ]);
        for r in &rows {
            let duty = if r.duty_active {
                r.duty_name.clone()
            } else {
                format!("{} (inactive)", r.duty_name)
            };
            table.add_row(vec![
                r.date.to_string(),
                r.person_id.clone(),
                duty,
                r.source_code.clone(),
            ]);
        }
        print!("{}", table.render());
        println!("{} assignment(s).", rows.len());
    }

    Ok(())
}

use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

/// Row counts and date coverage of the schedule tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DbStats {
    pub duty_types_total: i64,
    pub duty_types_active: i64,
    pub assignments: i64,
    pub group_control: i64,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
}

pub fn collect(pool: &DbPool) -> AppResult<DbStats> {
    let conn = &pool.conn;

    let count = |sql: &str| -> rusqlite::Result<i64> { conn.query_row(sql, [], |row| row.get(0)) };

    let first_date: Option<String> = conn
        .query_row(
            "SELECT date FROM schedule_assignments ORDER BY date ASC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let last_date: Option<String> = conn
        .query_row(
            "SELECT date FROM schedule_assignments ORDER BY date DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    Ok(DbStats {
        duty_types_total: count("SELECT COUNT(*) FROM duty_types")?,
        duty_types_active: count("SELECT COUNT(*) FROM duty_types WHERE active = 1")?,
        assignments: count("SELECT COUNT(*) FROM schedule_assignments")?,
        group_control: count("SELECT COUNT(*) FROM group_control")?,
        first_date,
        last_date,
    })
}

pub fn print_db_info(pool: &DbPool, db_path: &str) -> AppResult<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) COUNTS
    //
    let stats = collect(pool)?;
    println!(
        "{}• Duty types:{} {}{}{} active / {} total",
        CYAN, RESET, GREEN, stats.duty_types_active, RESET, stats.duty_types_total
    );
    println!(
        "{}• Assignments:{} {}{}{}",
        CYAN, RESET, GREEN, stats.assignments, RESET
    );
    println!(
        "{}• Group control days:{} {}{}{}",
        CYAN, RESET, GREEN, stats.group_control, RESET
    );

    //
    // 3) DATE RANGE
    //
    match (&stats.first_date, &stats.last_date) {
        (Some(first), Some(last)) => {
            println!("{}• Date range:{} {} → {}", CYAN, RESET, first, last);
        }
        _ => println!("{}• Date range:{} {}(empty){}", CYAN, RESET, GREY, RESET),
    }

    println!();
    Ok(())
}

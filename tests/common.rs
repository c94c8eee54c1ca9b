#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::NaiveDate;
use rroster::core::catalog::DutyCatalog;
use rroster::db::pool::DbPool;
use rroster::db::queries::{AssignmentQuery, load_assignments};
use rroster::models::duty_type::{DutyTypeDefinition, NewDutyType};
use std::env;
use std::fs;
use std::path::PathBuf;

pub const RESPONSIBLE: &str = "Ответственный";

pub fn rro() -> Command {
    cargo_bin_cmd!("rroster")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rroster.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Write an input file inside the temp dir and return its path
pub fn temp_input(name: &str, content: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rroster_input.json", name));
    let p = path.to_string_lossy().to_string();
    fs::write(&p, content).expect("write input file");
    p
}

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("valid date")
}

/// In-memory database seeded with the standard duty types.
pub fn seeded_pool() -> DbPool {
    let mut pool = DbPool::in_memory().expect("open in-memory db");
    pool.with_conn(|conn| DutyCatalog::seed(conn, &NewDutyType::standard_set(), false))
        .expect("seed catalog");
    pool
}

/// In-memory database seeded with the given duty types only.
pub fn pool_with(items: &[NewDutyType]) -> DbPool {
    let mut pool = DbPool::in_memory().expect("open in-memory db");
    pool.with_conn(|conn| DutyCatalog::seed(conn, items, false))
        .expect("seed catalog");
    pool
}

/// Active duty type id by canonical name.
pub fn duty_id(pool: &DbPool, name: &str) -> i64 {
    DutyCatalog::load_active(&pool.conn)
        .expect("catalog")
        .find_by_name(name)
        .expect("duty type present")
        .id
}

/// Every stored assignment as (date, duty type id, person), sorted.
pub fn snapshot(pool: &DbPool) -> Vec<(NaiveDate, i64, String)> {
    let mut rows: Vec<_> = load_assignments(&pool.conn, &AssignmentQuery::default())
        .expect("load assignments")
        .iter()
        .map(|a| a.key())
        .collect();
    rows.sort();
    rows
}

/// Catalog row for tokenizer tests, without touching a database.
pub fn def(id: i64, name: &str, code: &str, qualifier: Option<&str>) -> DutyTypeDefinition {
    DutyTypeDefinition {
        id,
        name: name.to_string(),
        source_code: code.to_string(),
        position_qualifier: qualifier.map(str::to_string),
        active: true,
    }
}

use crate::errors::{AppError, AppResult};
use crate::models::assignment::{GroupControlEntry, NewAssignment, ScheduleAssignment};
use crate::models::duty_type::{DutyTypeDefinition, NewDutyType};
use crate::models::window::DateWindow;
use crate::utils::date::{from_db_str, to_db_str};
use chrono::{Local, NaiveDate};
use rusqlite::types::Value;
use rusqlite::{Connection, ErrorCode, Result, Row, ffi, params, params_from_iter};

// ---------------------------
// Duty catalog
// ---------------------------

pub fn map_duty_type(row: &Row) -> Result<DutyTypeDefinition> {
    Ok(DutyTypeDefinition {
        id: row.get("id")?,
        name: row.get("name")?,
        source_code: row.get("source_code")?,
        position_qualifier: row.get("position_qualifier")?,
        active: row.get::<_, i32>("active")? == 1,
    })
}

/// Active duty types in insertion order.
pub fn load_active_duty_types(conn: &Connection) -> AppResult<Vec<DutyTypeDefinition>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, name, source_code, position_qualifier, active
         FROM duty_types
         WHERE active = 1
         ORDER BY id ASC",
    )?;

    let rows = stmt.query_map([], map_duty_type)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Every duty type, deactivated ones included.
pub fn load_all_duty_types(conn: &Connection) -> AppResult<Vec<DutyTypeDefinition>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, name, source_code, position_qualifier, active
         FROM duty_types
         ORDER BY id ASC",
    )?;

    let rows = stmt.query_map([], map_duty_type)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn count_duty_types(conn: &Connection) -> AppResult<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM duty_types", [], |row| row.get(0))?)
}

pub fn insert_duty_type(conn: &Connection, dt: &NewDutyType) -> AppResult<i64> {
    let res = conn.execute(
        "INSERT INTO duty_types (name, source_code, position_qualifier, active, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            dt.name,
            dt.source_code,
            dt.position_qualifier,
            if dt.active { 1 } else { 0 },
            Local::now().to_rfc3339(),
        ],
    );

    match res {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == ErrorCode::ConstraintViolation
                && e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            Err(AppError::DuplicateDutyType(dt.name.clone()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Soft-deactivate by canonical name. Returns the number of rows changed.
pub fn deactivate_duty_type(conn: &Connection, name: &str) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE duty_types SET active = 0 WHERE name = ?1 AND active = 1",
        [name],
    )?;
    Ok(n)
}

// ---------------------------
// Schedule assignments
// ---------------------------

/// Which duty types a range-delete applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DutyFilter {
    Only(i64),
    Except(i64),
}

pub fn map_assignment(row: &Row) -> Result<ScheduleAssignment> {
    let date_str: String = row.get("date")?;

    let date = from_db_str(&date_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidDate(date_str.clone())),
        )
    })?;

    Ok(ScheduleAssignment {
        id: row.get("id")?,
        date,
        duty_type_id: row.get("duty_type_id")?,
        person_id: row.get("person_id")?,
    })
}

/// Delete assignments dated inside `window` (inclusive) that pass `filter`.
pub fn delete_assignments_in_window(
    conn: &Connection,
    window: &DateWindow,
    filter: DutyFilter,
) -> AppResult<usize> {
    let (sql, duty_type_id) = match filter {
        DutyFilter::Only(id) => (
            "DELETE FROM schedule_assignments
             WHERE date BETWEEN ?1 AND ?2 AND duty_type_id = ?3",
            id,
        ),
        DutyFilter::Except(id) => (
            "DELETE FROM schedule_assignments
             WHERE date BETWEEN ?1 AND ?2 AND duty_type_id <> ?3",
            id,
        ),
    };

    let n = conn.execute(
        sql,
        params![window.start_str(), window.end_str(), duty_type_id],
    )?;
    Ok(n)
}

pub fn insert_assignments(conn: &Connection, rows: &[NewAssignment]) -> AppResult<usize> {
    let created_at = Local::now().to_rfc3339();
    let mut stmt = conn.prepare_cached(
        "INSERT INTO schedule_assignments (date, duty_type_id, person_id, created_at)
         VALUES (?1, ?2, ?3, ?4)",
    )?;

    for a in rows {
        stmt.execute(params![
            to_db_str(&a.date),
            a.duty_type_id,
            a.person_id,
            created_at
        ])?;
    }
    Ok(rows.len())
}

/// Filters for listing assignments. Empty lists mean "no restriction".
#[derive(Debug, Clone, Default)]
pub struct AssignmentQuery {
    pub window: Option<DateWindow>,
    pub person_ids: Vec<String>,
    pub duty_type_ids: Vec<i64>,
    /// Excluded duty type. Removed from `duty_type_ids` when both are given.
    pub ignore_duty_type_id: Option<i64>,
}

pub fn load_assignments(conn: &Connection, q: &AssignmentQuery) -> AppResult<Vec<ScheduleAssignment>> {
    let mut sql = String::from(
        "SELECT id, date, duty_type_id, person_id FROM schedule_assignments WHERE 1 = 1",
    );
    let mut args: Vec<Value> = Vec::new();

    if let Some(w) = &q.window {
        sql.push_str(" AND date BETWEEN ? AND ?");
        args.push(Value::Text(w.start_str()));
        args.push(Value::Text(w.end_str()));
    }

    if !q.person_ids.is_empty() {
        sql.push_str(&format!(" AND person_id IN ({})", placeholders(q.person_ids.len())));
        args.extend(q.person_ids.iter().cloned().map(Value::Text));
    }

    let duty_ids: Vec<i64> = q
        .duty_type_ids
        .iter()
        .copied()
        .filter(|id| Some(*id) != q.ignore_duty_type_id)
        .collect();

    if !q.duty_type_ids.is_empty() {
        if duty_ids.is_empty() {
            // every requested type was the ignored one
            return Ok(Vec::new());
        }
        sql.push_str(&format!(" AND duty_type_id IN ({})", placeholders(duty_ids.len())));
        args.extend(duty_ids.into_iter().map(Value::Integer));
    } else if let Some(ignore) = q.ignore_duty_type_id {
        sql.push_str(" AND duty_type_id <> ?");
        args.push(Value::Integer(ignore));
    }

    sql.push_str(" ORDER BY date ASC, duty_type_id ASC, person_id ASC, id ASC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(args), map_assignment)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

// ---------------------------
// Group control
// ---------------------------

pub fn delete_group_control_in_window(conn: &Connection, window: &DateWindow) -> AppResult<usize> {
    let n = conn.execute(
        "DELETE FROM group_control WHERE date BETWEEN ?1 AND ?2",
        params![window.start_str(), window.end_str()],
    )?;
    Ok(n)
}

pub fn insert_group_control(conn: &Connection, dates: &[NaiveDate]) -> AppResult<usize> {
    let created_at = Local::now().to_rfc3339();
    let mut stmt = conn.prepare_cached(
        "INSERT INTO group_control (date, created_at) VALUES (?1, ?2)",
    )?;

    for d in dates {
        stmt.execute(params![to_db_str(d), created_at])?;
    }
    Ok(dates.len())
}

pub fn load_group_control(
    conn: &Connection,
    window: Option<&DateWindow>,
) -> AppResult<Vec<GroupControlEntry>> {
    let (sql, args): (&str, Vec<String>) = match window {
        Some(w) => (
            "SELECT id, date FROM group_control WHERE date BETWEEN ?1 AND ?2 ORDER BY date ASC, id ASC",
            vec![w.start_str(), w.end_str()],
        ),
        None => (
            "SELECT id, date FROM group_control ORDER BY date ASC, id ASC",
            Vec::new(),
        ),
    };

    let mut stmt = conn.prepare_cached(sql)?;
    let rows = stmt.query_map(params_from_iter(args), |row| {
        let date_str: String = row.get(1)?;
        let date = from_db_str(&date_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                1,
                rusqlite::types::Type::Text,
                Box::new(AppError::InvalidDate(date_str.clone())),
            )
        })?;
        Ok(GroupControlEntry {
            id: row.get(0)?,
            date,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

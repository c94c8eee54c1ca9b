use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension};

/// Schema migrations, applied in order. Each is recorded in `log`
/// with operation `migration_applied` and the version as target.
const MIGRATIONS: &[(&str, &str, &str)] = &[
    (
        "20251001_0001_create_duty_types",
        "Created duty_types catalog",
        r#"
        CREATE TABLE IF NOT EXISTS duty_types (
            id                 INTEGER PRIMARY KEY AUTOINCREMENT,
            name               TEXT NOT NULL,
            source_code        TEXT NOT NULL,
            position_qualifier TEXT,
            active             INTEGER NOT NULL DEFAULT 1 CHECK(active IN (0, 1)),
            created_at         TEXT NOT NULL
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_duty_types_active_name
            ON duty_types(name) WHERE active = 1;
        "#,
    ),
    (
        "20251001_0002_create_schedule_assignments",
        "Created schedule_assignments table",
        r#"
        CREATE TABLE IF NOT EXISTS schedule_assignments (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            date         TEXT NOT NULL,
            duty_type_id INTEGER NOT NULL REFERENCES duty_types(id),
            person_id    TEXT NOT NULL,
            created_at   TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_assignments_date_duty
            ON schedule_assignments(date, duty_type_id);
        CREATE INDEX IF NOT EXISTS idx_assignments_person
            ON schedule_assignments(person_id);
        "#,
    ),
    (
        "20251001_0003_create_group_control",
        "Created group_control table",
        r#"
        CREATE TABLE IF NOT EXISTS group_control (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            date       TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_group_control_date ON group_control(date);
        "#,
    ),
];

/// Ensure that the `log` table exists. Migration bookkeeping lives there.
fn ensure_log_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> AppResult<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, version: &str, description: &str, sql: &str) -> AppResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(sql)
        .map_err(|e| AppError::Migration(format!("{}: {}", version, e)))?;

    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, description],
    )?;

    tx.commit()?;
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invocata da db::init_db().
pub fn run_pending_migrations(conn: &Connection) -> AppResult<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for (version, description, sql) in MIGRATIONS {
        if is_applied(conn, version)? {
            continue;
        }
        apply(conn, version, description, sql)?;
        log::info!("event=migration status=applied version={}", version);
        applied += 1;
    }

    if applied > 0 {
        success(format!("Applied {} database migration(s).", applied));
    }

    Ok(applied)
}

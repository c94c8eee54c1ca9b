use crate::cli::parser::{Commands, ImportKind};
use crate::config::Config;
use crate::core::catalog::DutyCatalog;
use crate::core::reconcile::{
    ReconcileLogic, ReconcileReport, ReconcileSettings, StagedWindow, UnmatchedCell,
};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::roster::{parse_general_json, parse_group_control_json, parse_responsible_json};
use crate::models::window::DateWindow;
use crate::ui::messages::{detail, header, info, success, warning};
use crate::utils::colors::{RESET, color_for_count};
use crate::utils::date::parse_date;
use crate::utils::table::{Column, Table};
use chrono::NaiveDate;
use std::fs;

fn parse_bound(value: &Option<String>) -> AppResult<Option<NaiveDate>> {
    value
        .as_deref()
        .map(|s| parse_date(s).ok_or_else(|| AppError::InvalidDate(s.to_string())))
        .transpose()
}

fn print_unmatched(cells: &[UnmatchedCell]) {
    warning(format!(
        "{} cell(s) contained unrecognized text (dropped):",
        cells.len()
    ));

    let mut table = Table::new(vec![
        Column::new("Date"),
        Column::new("Person"),
        Column::new("Position"),
        Column::new("Cell"),
        Column::new("Unmatched"),
    ]);
    for c in cells {
        table.add_row(vec![
            c.date.to_string(),
            c.person_id.clone(),
            c.position.clone(),
            c.text.clone(),
            c.leftover.clone(),
        ]);
    }
    print!("{}", table.render());
}

fn print_report(report: &ReconcileReport, cfg: &Config) {
    success(format!(
        "Imported {} schedule for {}",
        report.kind.as_str(),
        report.window
    ));
    detail(format!(
        "deleted: {}{}{}  inserted: {}{}{}",
        color_for_count(report.deleted),
        report.deleted,
        RESET,
        color_for_count(report.inserted),
        report.inserted,
        RESET
    ));

    if cfg.report_unmatched && !report.unmatched.is_empty() {
        print_unmatched(&report.unmatched);
    }
}

fn print_staged(staged: &StagedWindow, cfg: &Config) {
    header(format!("Dry run: {} {}", staged.kind.as_str(), staged.window));
    info(format!(
        "{} row(s) would replace the window; nothing was written.",
        staged.row_count()
    ));

    if cfg.report_unmatched && !staged.unmatched.is_empty() {
        print_unmatched(&staged.unmatched);
    }
}

/// Parse and tokenize against a read-only view of the database.
fn dry_run_import(
    kind: ImportKind,
    raw: &str,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    settings: &ReconcileSettings,
    cfg: &Config,
) -> AppResult<()> {
    let pool = DbPool::open_read_only(&cfg.database)?;

    let staged = match kind {
        ImportKind::Responsible => {
            let input = parse_responsible_json(raw)?;
            let window = DateWindow::resolve(from, to, input.keys().copied())?;
            let catalog = DutyCatalog::load_active(&pool.conn)?;
            ReconcileLogic::stage_responsible(&catalog, settings, &input, window)?
        }
        ImportKind::General => {
            let rows = parse_general_json(raw)?;
            let dates = rows.iter().flat_map(|r| r.cells_by_date.keys().copied());
            let window = DateWindow::resolve(from, to, dates)?;
            let catalog = DutyCatalog::load_active(&pool.conn)?;
            ReconcileLogic::stage_general(&catalog, settings, &rows, window)?
        }
        ImportKind::GroupControl => {
            let dates = parse_group_control_json(raw)?;
            let window = DateWindow::resolve(from, to, dates.iter().copied())?;
            ReconcileLogic::stage_group_control(&dates, window)
        }
    };

    print_staged(&staged, cfg);
    Ok(())
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Import {
        kind,
        file,
        from,
        to,
        dry_run,
    } = cmd
    {
        let raw = fs::read_to_string(file)?;
        let from = parse_bound(from)?;
        let to = parse_bound(to)?;

        let settings = ReconcileSettings::from_config(cfg);
        if *dry_run {
            return dry_run_import(*kind, &raw, from, to, &settings, cfg);
        }
        let mut pool = DbPool::new(&cfg.database)?;

        let report = match kind {
            ImportKind::Responsible => {
                let input = parse_responsible_json(&raw)?;
                let window = DateWindow::resolve(from, to, input.keys().copied())?;
                ReconcileLogic::replace_responsible(&mut pool, &settings, &input, window)?
            }
            ImportKind::General => {
                let rows = parse_general_json(&raw)?;
                let dates = rows.iter().flat_map(|r| r.cells_by_date.keys().copied());
                let window = DateWindow::resolve(from, to, dates)?;
                ReconcileLogic::replace_general(&mut pool, &settings, &rows, window)?
            }
            ImportKind::GroupControl => {
                let dates = parse_group_control_json(&raw)?;
                let window = DateWindow::resolve(from, to, dates.iter().copied())?;
                ReconcileLogic::replace_group_control(&mut pool, &dates, window)?
            }
        };
        print_report(&report, cfg);
    }

    Ok(())
}

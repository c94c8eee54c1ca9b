//! Window reconcilers.
//!
//! Every operation is staged first (rows computed, nothing written) and then
//! applied inside one transaction: delete the window, insert the staged rows,
//! write the audit line, commit. Any error drops the transaction, which rolls
//! back everything done so far in the call.
//!
//! Concurrent calls on overlapping windows are not serialized here.

use crate::config::Config;
use crate::core::catalog::DutyCatalog;
use crate::core::tokenizer::{PriorityRule, Tokenizer};
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::db::queries::{
    DutyFilter, delete_assignments_in_window, delete_group_control_in_window,
    insert_assignments, insert_group_control,
};
use crate::errors::AppResult;
use crate::models::assignment::NewAssignment;
use crate::models::roster::{RawRosterRow, ResponsibleMap};
use crate::models::window::DateWindow;
use chrono::NaiveDate;
use rusqlite::{Connection, Transaction};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileKind {
    Responsible,
    General,
    GroupControl,
}

impl ReconcileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReconcileKind::Responsible => "responsible",
            ReconcileKind::General => "general",
            ReconcileKind::GroupControl => "group_control",
        }
    }

    /// Operation name written to the audit table.
    pub fn audit_operation(&self) -> &'static str {
        match self {
            ReconcileKind::Responsible => "import_responsible",
            ReconcileKind::General => "import_general",
            ReconcileKind::GroupControl => "import_group_control",
        }
    }
}

/// A non-empty cell whose text was not fully recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmatchedCell {
    pub person_id: String,
    pub position: String,
    pub date: NaiveDate,
    pub text: String,
    pub leftover: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StagedRows {
    Assignments {
        filter: DutyFilter,
        rows: Vec<NewAssignment>,
    },
    GroupControl {
        dates: Vec<NaiveDate>,
    },
}

/// Everything a reconciliation will write, computed before touching storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedWindow {
    pub kind: ReconcileKind,
    pub window: DateWindow,
    pub rows: StagedRows,
    pub unmatched: Vec<UnmatchedCell>,
}

impl StagedWindow {
    pub fn row_count(&self) -> usize {
        match &self.rows {
            StagedRows::Assignments { rows, .. } => rows.len(),
            StagedRows::GroupControl { dates } => dates.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    pub kind: ReconcileKind,
    pub window: DateWindow,
    pub deleted: usize,
    pub inserted: usize,
    pub unmatched: Vec<UnmatchedCell>,
}

/// Settings the reconcilers read from the configuration.
#[derive(Debug, Clone)]
pub struct ReconcileSettings {
    pub responsible_name: String,
    pub priority_rules: Vec<PriorityRule>,
}

impl Default for ReconcileSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl ReconcileSettings {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            responsible_name: cfg.responsible_name.clone(),
            priority_rules: cfg.priority_rules.clone(),
        }
    }
}

pub struct ReconcileLogic;

impl ReconcileLogic {
    // ---------------------------
    // Staging (no writes)
    // ---------------------------

    pub fn stage_responsible(
        catalog: &DutyCatalog,
        settings: &ReconcileSettings,
        assignments: &ResponsibleMap,
        window: DateWindow,
    ) -> AppResult<StagedWindow> {
        let responsible = catalog.find_by_role(&settings.responsible_name)?;

        let mut rows = Vec::with_capacity(assignments.len());
        for (date, person_id) in assignments {
            if !window.contains(*date) {
                // inserted anyway: the window bounds deletion only
                log::warn!(
                    "event=reconcile kind=responsible status=outside_window date={} window={}",
                    date,
                    window
                );
            }
            rows.push(NewAssignment {
                date: *date,
                duty_type_id: responsible.id,
                person_id: person_id.clone(),
            });
        }

        Ok(StagedWindow {
            kind: ReconcileKind::Responsible,
            window,
            rows: StagedRows::Assignments {
                filter: DutyFilter::Only(responsible.id),
                rows,
            },
            unmatched: Vec::new(),
        })
    }

    pub fn stage_general(
        catalog: &DutyCatalog,
        settings: &ReconcileSettings,
        roster: &[RawRosterRow],
        window: DateWindow,
    ) -> AppResult<StagedWindow> {
        let responsible = catalog.find_by_role(&settings.responsible_name)?;
        let tokenizer = Tokenizer::new(catalog, &settings.priority_rules).excluding(responsible.id);

        let mut rows = Vec::new();
        let mut unmatched = Vec::new();

        for row in roster {
            for (date, text) in &row.cells_by_date {
                let found = tokenizer.classify(text, &row.position_code);

                for duty in &found.duties {
                    rows.push(NewAssignment {
                        date: *date,
                        duty_type_id: duty.id,
                        person_id: row.person_id.clone(),
                    });
                }

                if found.has_leftover() {
                    log::debug!(
                        "event=tokenize status=leftover person={} date={} leftover={:?}",
                        row.person_id,
                        date,
                        found.leftover
                    );
                    unmatched.push(UnmatchedCell {
                        person_id: row.person_id.clone(),
                        position: row.position_code.clone(),
                        date: *date,
                        text: text.clone(),
                        leftover: found.leftover,
                    });
                }
            }
        }

        Ok(StagedWindow {
            kind: ReconcileKind::General,
            window,
            rows: StagedRows::Assignments {
                filter: DutyFilter::Except(responsible.id),
                rows,
            },
            unmatched,
        })
    }

    pub fn stage_group_control(dates: &BTreeSet<NaiveDate>, window: DateWindow) -> StagedWindow {
        StagedWindow {
            kind: ReconcileKind::GroupControl,
            window,
            rows: StagedRows::GroupControl {
                dates: dates.iter().copied().collect(),
            },
            unmatched: Vec::new(),
        }
    }

    // ---------------------------
    // Apply
    // ---------------------------

    /// Delete the window and insert the staged rows inside `tx`.
    /// The caller commits.
    pub fn apply(tx: &Transaction<'_>, staged: StagedWindow) -> AppResult<ReconcileReport> {
        let window = staged.window;

        let (deleted, inserted) = match &staged.rows {
            StagedRows::Assignments { filter, rows } => {
                let deleted = delete_assignments_in_window(tx, &window, *filter)?;
                let inserted = insert_assignments(tx, rows)?;
                (deleted, inserted)
            }
            StagedRows::GroupControl { dates } => {
                let deleted = delete_group_control_in_window(tx, &window)?;
                let inserted = insert_group_control(tx, dates)?;
                (deleted, inserted)
            }
        };

        audit(
            tx,
            staged.kind.audit_operation(),
            &window.to_string(),
            &format!(
                "deleted={} inserted={} unmatched={}",
                deleted,
                inserted,
                staged.unmatched.len()
            ),
        )?;

        Ok(ReconcileReport {
            kind: staged.kind,
            window,
            deleted,
            inserted,
            unmatched: staged.unmatched,
        })
    }

    /// Apply a staged window in its own transaction.
    pub fn commit(conn: &mut Connection, staged: StagedWindow) -> AppResult<ReconcileReport> {
        let kind = staged.kind;
        let window = staged.window;

        let tx = conn.transaction()?;
        let report = Self::apply(&tx, staged).and_then(|report| {
            tx.commit()?;
            Ok(report)
        });

        Self::log_outcome(kind, &window, &report);
        report
    }

    // ---------------------------
    // Public operations
    // ---------------------------

    /// Replace the Responsible schedule inside `window`.
    pub fn replace_responsible(
        pool: &mut DbPool,
        settings: &ReconcileSettings,
        assignments: &ResponsibleMap,
        window: DateWindow,
    ) -> AppResult<ReconcileReport> {
        Self::run(pool, ReconcileKind::Responsible, window, |tx| {
            let catalog = DutyCatalog::load_active(tx)?;
            Self::stage_responsible(&catalog, settings, assignments, window)
        })
    }

    /// Replace every non-Responsible assignment inside `window` with the
    /// tokenized roster.
    pub fn replace_general(
        pool: &mut DbPool,
        settings: &ReconcileSettings,
        roster: &[RawRosterRow],
        window: DateWindow,
    ) -> AppResult<ReconcileReport> {
        Self::run(pool, ReconcileKind::General, window, |tx| {
            let catalog = DutyCatalog::load_active(tx)?;
            Self::stage_general(&catalog, settings, roster, window)
        })
    }

    /// Replace the group-control days inside `window`.
    pub fn replace_group_control(
        pool: &mut DbPool,
        dates: &BTreeSet<NaiveDate>,
        window: DateWindow,
    ) -> AppResult<ReconcileReport> {
        Self::run(pool, ReconcileKind::GroupControl, window, |_| {
            Ok(Self::stage_group_control(dates, window))
        })
    }

    /// Stage against a consistent snapshot, then apply and commit.
    fn run<F>(
        pool: &mut DbPool,
        kind: ReconcileKind,
        window: DateWindow,
        stage: F,
    ) -> AppResult<ReconcileReport>
    where
        F: FnOnce(&Transaction<'_>) -> AppResult<StagedWindow>,
    {
        let report = pool.with_conn(|conn| {
            let tx = conn.transaction()?;
            let staged = stage(&tx)?;
            let report = Self::apply(&tx, staged)?;
            tx.commit()?;
            Ok(report)
        });

        Self::log_outcome(kind, &window, &report);
        report
    }

    fn log_outcome(kind: ReconcileKind, window: &DateWindow, report: &AppResult<ReconcileReport>) {
        match report {
            Ok(r) => log::info!(
                "event=reconcile kind={} status=ok window={} deleted={} inserted={} unmatched={}",
                kind.as_str(),
                window,
                r.deleted,
                r.inserted,
                r.unmatched.len()
            ),
            Err(e) => log::error!(
                "event=reconcile kind={} status=rolled_back window={} error={}",
                kind.as_str(),
                window,
                e
            ),
        }
    }
}

use crate::db::pool::DbPool;
use crate::db::queries::{AssignmentQuery, load_all_duty_types, load_assignments};
use crate::errors::{AppError, AppResult};
use crate::models::duty_type::DutyTypeDefinition;
use crate::models::window::DateWindow;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Listing filters expressed with duty names, as typed on the command line.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub window: Option<DateWindow>,
    pub person_ids: Vec<String>,
    pub duty_names: Vec<String>,
    pub ignore_duty_name: Option<String>,
}

/// An assignment joined with its duty definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentView {
    pub date: NaiveDate,
    pub person_id: String,
    pub duty_name: String,
    pub source_code: String,
    pub duty_active: bool,
}

pub struct ListLogic;

impl ListLogic {
    /// Deactivated duty types still resolve, so history stays readable.
    pub fn assignments(pool: &DbPool, filter: &ListFilter) -> AppResult<Vec<AssignmentView>> {
        let types = load_all_duty_types(&pool.conn)?;
        let by_id: HashMap<i64, &DutyTypeDefinition> = types.iter().map(|d| (d.id, d)).collect();

        let resolve = |name: &str| -> AppResult<Vec<i64>> {
            let ids: Vec<i64> = types.iter().filter(|d| d.name == name).map(|d| d.id).collect();
            if ids.is_empty() {
                return Err(AppError::UnknownDutyType(name.to_string()));
            }
            Ok(ids)
        };

        let mut duty_type_ids = Vec::new();
        for name in &filter.duty_names {
            duty_type_ids.extend(resolve(name)?);
        }

        // several rows may share a name across deactivations; ignore the active one
        let ignore_duty_type_id = match &filter.ignore_duty_name {
            Some(name) => {
                let ids = resolve(name)?;
                types
                    .iter()
                    .find(|d| d.active && ids.contains(&d.id))
                    .map(|d| d.id)
                    .or(ids.first().copied())
            }
            None => None,
        };

        let query = AssignmentQuery {
            window: filter.window,
            person_ids: filter.person_ids.clone(),
            duty_type_ids,
            ignore_duty_type_id,
        };

        let rows = load_assignments(&pool.conn, &query)?;

        let mut out = Vec::with_capacity(rows.len());
        for a in rows {
            let duty = by_id
                .get(&a.duty_type_id)
                .ok_or_else(|| AppError::UnknownDutyType(format!("#{}", a.duty_type_id)))?;
            out.push(AssignmentView {
                date: a.date,
                person_id: a.person_id,
                duty_name: duty.name.clone(),
                source_code: duty.source_code.clone(),
                duty_active: duty.active,
            });
        }
        Ok(out)
    }
}

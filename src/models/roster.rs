//! Roster inputs produced by the spreadsheet extractor.
//!
//! The extractor hands over JSON documents; this module turns them into typed
//! rows. Date keys are validated here so that the reconcilers only ever see
//! well-formed dates.

use crate::errors::{AppError, AppResult};
use crate::utils::date::{parse_date, parse_roster_date};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// One person-row of the general roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRosterRow {
    pub person_id: String,
    pub position_code: String,
    pub cells_by_date: BTreeMap<NaiveDate, String>,
}

impl RawRosterRow {
    pub fn new(person_id: &str, position_code: &str) -> Self {
        Self {
            person_id: person_id.to_string(),
            position_code: position_code.to_string(),
            cells_by_date: BTreeMap::new(),
        }
    }

    pub fn with_cell(mut self, date: NaiveDate, text: &str) -> Self {
        self.cells_by_date.insert(date, text.to_string());
        self
    }
}

/// Responsible schedule: exactly one person per date.
pub type ResponsibleMap = BTreeMap<NaiveDate, String>;

#[derive(Debug, Deserialize)]
struct GeneralRowInput {
    #[serde(default)]
    position: Option<String>,
    #[serde(default)]
    schedule: BTreeMap<String, Option<String>>,
}

/// Person ids arrive as strings or bare numbers depending on the exporter.
fn person_id_from_value(v: &Value) -> AppResult<String> {
    match v {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(AppError::Other(format!("Invalid person id: {}", other))),
    }
}

/// Decode `{"DD-MM-YYYY": personId, ...}`.
pub fn parse_responsible_json(raw: &str) -> AppResult<ResponsibleMap> {
    let input: BTreeMap<String, Value> = serde_json::from_str(raw)?;

    let mut out = ResponsibleMap::new();
    for (date_str, person) in input {
        let date = parse_roster_date(&date_str).ok_or(AppError::InvalidDate(date_str))?;
        out.insert(date, person_id_from_value(&person)?);
    }
    Ok(out)
}

/// Decode `{personId: {"position": "...", "schedule": {"YYYY-MM-DD": "cell"}}}`.
pub fn parse_general_json(raw: &str) -> AppResult<Vec<RawRosterRow>> {
    let input: BTreeMap<String, GeneralRowInput> = serde_json::from_str(raw)?;

    let mut rows = Vec::with_capacity(input.len());
    for (person_id, data) in input {
        let mut row = RawRosterRow::new(&person_id, data.position.as_deref().unwrap_or(""));
        for (date_str, cell) in data.schedule {
            let date = parse_date(&date_str).ok_or(AppError::InvalidDate(date_str))?;
            row.cells_by_date.insert(date, cell.unwrap_or_default());
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Decode `["YYYY-MM-DD", ...]`. Duplicates collapse.
pub fn parse_group_control_json(raw: &str) -> AppResult<BTreeSet<NaiveDate>> {
    let input: Vec<String> = serde_json::from_str(raw)?;

    input
        .into_iter()
        .map(|s| parse_date(&s).ok_or(AppError::InvalidDate(s)))
        .collect()
}

//! Cell tokenizer.
//!
//! Roster cells are unseparated concatenations of duty codes (`"РГДТП"`,
//! `"ЗН Р"`). A cell is resolved in two passes:
//!
//! 1. the ordered [`PriorityRule`] table, where compound codes come before
//!    any code they contain;
//! 2. a residual scan over the remaining catalog entries.
//!
//! Every matched code is removed from the working text (all occurrences), so
//! a shorter code embedded in a longer one cannot match a second time.
//! Whatever is left is returned as `leftover` and never raises.

use crate::core::catalog::DutyCatalog;
use crate::models::duty_type::DutyTypeDefinition;
use serde::{Deserialize, Serialize};

/// Cell value meaning "no duty".
pub const EMPTY_SENTINEL: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityRule {
    pub code: String,
    /// Only accept definitions qualified for the row's position (or unqualified ones).
    #[serde(default)]
    pub requires_qualifier: bool,
}

impl PriorityRule {
    pub fn new(code: &str, requires_qualifier: bool) -> Self {
        Self {
            code: code.to_string(),
            requires_qualifier,
        }
    }

    /// Standard table, most specific first.
    pub fn default_table() -> Vec<Self> {
        vec![
            Self::new("ЗН Р", true),
            Self::new("РГ", false),
            Self::new("Р", true),
            Self::new("ЗН ДТП", false),
            Self::new("ДТП", false),
        ]
    }
}

/// Result of tokenizing one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification<'a> {
    pub duties: Vec<&'a DutyTypeDefinition>,
    pub leftover: String,
}

impl Classification<'_> {
    fn empty() -> Self {
        Self {
            duties: Vec::new(),
            leftover: String::new(),
        }
    }

    /// True when some non-blank text matched no code.
    pub fn has_leftover(&self) -> bool {
        !self.leftover.trim().is_empty()
    }

    pub fn duty_ids(&self) -> Vec<i64> {
        self.duties.iter().map(|d| d.id).collect()
    }
}

pub struct Tokenizer<'a> {
    catalog: &'a DutyCatalog,
    rules: &'a [PriorityRule],
    excluded: Option<i64>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(catalog: &'a DutyCatalog, rules: &'a [PriorityRule]) -> Self {
        Self {
            catalog,
            rules,
            excluded: None,
        }
    }

    /// Never emit the given duty type (the general roster must not produce
    /// Responsible assignments).
    pub fn excluding(mut self, duty_type_id: i64) -> Self {
        self.excluded = Some(duty_type_id);
        self
    }

    pub fn classify(&self, cell: &str, position: &str) -> Classification<'a> {
        let trimmed = cell.trim();
        if trimmed.is_empty() || trimmed == EMPTY_SENTINEL {
            return Classification::empty();
        }

        let mut rest = cell.to_string();
        let mut duties: Vec<&'a DutyTypeDefinition> = Vec::new();

        // 1) priority table
        for rule in self.rules {
            if rule.code.is_empty() || !rest.contains(rule.code.as_str()) {
                continue;
            }
            rest = rest.replace(rule.code.as_str(), "");

            // a qualified code with no candidate for this position is still consumed
            if let Some(def) = self.pick(rule, position)
                && !duties.iter().any(|d| d.id == def.id)
            {
                duties.push(def);
            }
        }

        // 2) residual scan, catalog order
        let catalog: &'a DutyCatalog = self.catalog;
        for def in catalog.entries() {
            if Some(def.id) == self.excluded
                || def.source_code.is_empty()
                || self.is_rule_code(&def.source_code)
                || !def.accepts_position(position)
            {
                continue;
            }
            if rest.contains(def.source_code.as_str()) {
                rest = rest.replace(def.source_code.as_str(), "");
                duties.push(def);
            }
        }

        Classification {
            duties,
            leftover: rest.trim().to_string(),
        }
    }

    fn is_rule_code(&self, code: &str) -> bool {
        self.rules.iter().any(|r| r.code == code)
    }

    /// Catalog definition a priority rule resolves to for this position.
    fn pick(&self, rule: &PriorityRule, position: &str) -> Option<&'a DutyTypeDefinition> {
        let catalog: &'a DutyCatalog = self.catalog;
        let excluded = self.excluded;
        let mut candidates = catalog
            .entries()
            .iter()
            .filter(move |d| d.source_code == rule.code && Some(d.id) != excluded);

        if !rule.requires_qualifier {
            return candidates.next();
        }

        // exact qualifier wins over an unqualified definition
        let mut fallback = None;
        for d in candidates {
            match &d.position_qualifier {
                Some(q) if q == position => return Some(d),
                None if fallback.is_none() => fallback = Some(d),
                _ => {}
            }
        }
        fallback
    }
}

/// Tokenize one cell against a catalog with the given rules.
pub fn classify<'a>(
    cell: &str,
    position: &str,
    catalog: &'a DutyCatalog,
    rules: &'a [PriorityRule],
) -> Vec<&'a DutyTypeDefinition> {
    Tokenizer::new(catalog, rules).classify(cell, position).duties
}

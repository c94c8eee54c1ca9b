//! Duty catalog: the active duty-type definitions, loaded once per call.

use crate::db::log::audit;
use crate::db::queries::{
    count_duty_types, deactivate_duty_type, insert_duty_type, load_active_duty_types,
};
use crate::errors::{AppError, AppResult};
use crate::models::duty_type::{DutyTypeDefinition, NewDutyType};
use rusqlite::Connection;

#[derive(Debug, Clone)]
pub struct DutyCatalog {
    entries: Vec<DutyTypeDefinition>,
}

impl DutyCatalog {
    /// Read the active definitions. An empty catalog is an error: nothing
    /// can be tokenized without it.
    pub fn load_active(conn: &Connection) -> AppResult<Self> {
        let entries = load_active_duty_types(conn)?;
        Self::from_entries(entries)
    }

    /// Build a catalog from already loaded rows; inactive rows are dropped.
    pub fn from_entries(entries: Vec<DutyTypeDefinition>) -> AppResult<Self> {
        let entries: Vec<_> = entries.into_iter().filter(|d| d.active).collect();
        if entries.is_empty() {
            return Err(AppError::DutyCatalogEmpty);
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[DutyTypeDefinition] {
        &self.entries
    }

    pub fn find_by_name(&self, name: &str) -> Option<&DutyTypeDefinition> {
        self.entries.iter().find(|d| d.name == name)
    }

    /// Resolve a mandatory category (e.g. the Responsible duty) by canonical name.
    pub fn find_by_role(&self, name: &str) -> AppResult<&DutyTypeDefinition> {
        self.find_by_name(name)
            .ok_or_else(|| AppError::RequiredDutyTypeMissing(name.to_string()))
    }

    /// Insert seed records in one transaction. Refuses a non-empty table
    /// unless `force` is set.
    pub fn seed(conn: &mut Connection, items: &[NewDutyType], force: bool) -> AppResult<usize> {
        let existing = count_duty_types(conn)?;
        if existing > 0 && !force {
            return Err(AppError::CatalogNotEmpty(existing));
        }

        let tx = conn.transaction()?;
        for item in items {
            insert_duty_type(&tx, item)?;
        }
        audit(
            &tx,
            "catalog_seed",
            "duty_types",
            &format!("seeded {} duty type(s)", items.len()),
        )?;
        tx.commit()?;

        log::info!("event=catalog_seed status=ok count={}", items.len());
        Ok(items.len())
    }

    /// Soft-deactivate a definition. Historical assignments keep their reference.
    pub fn deactivate(conn: &mut Connection, name: &str) -> AppResult<()> {
        let tx = conn.transaction()?;
        if deactivate_duty_type(&tx, name)? == 0 {
            return Err(AppError::UnknownDutyType(name.to_string()));
        }
        audit(&tx, "catalog_deactivate", name, "duty type deactivated")?;
        tx.commit()?;

        log::info!("event=catalog_deactivate status=ok name={}", name);
        Ok(())
    }
}

//! Unit catalogs loaded from data files.

use std::collections::HashMap;
use std::path::Path;

use colony_core::catalog::{StandardCatalog, UnitCatalog, UnitKind, UnitRequirements};
use colony_core::id::TechLevel;

use crate::loader::DataLoadError;
use crate::schema::CatalogEntryData;

/// Requirements listed per product and tech level. Products without a tech
/// level are stored once and match any requested level.
#[derive(Debug, Clone, Default)]
pub struct TableCatalog {
    entries: HashMap<(UnitKind, TechLevel), UnitRequirements>,
}

impl TableCatalog {
    fn key(kind: UnitKind, tech_level: TechLevel) -> (UnitKind, TechLevel) {
        if kind.is_tech_leveled() {
            (kind, tech_level)
        } else {
            (kind, 0)
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn insert(&mut self, kind: UnitKind, tech_level: TechLevel, req: UnitRequirements) {
        self.entries.insert(Self::key(kind, tech_level), req);
    }

    /// Build a table from data file entries, rejecting unknown codes and
    /// repeated (code, tech level) pairs.
    pub fn from_entries(entries: &[CatalogEntryData], file: &Path) -> Result<Self, DataLoadError> {
        let mut table = TableCatalog::default();
        for entry in entries {
            let kind: UnitKind = entry.code.parse().map_err(|_| DataLoadError::UnresolvedRef {
                file: file.to_path_buf(),
                name: entry.code.clone(),
                expected_kind: "unit",
            })?;
            let key = Self::key(kind, entry.tech_level);
            if table.entries.contains_key(&key) {
                return Err(DataLoadError::DuplicateName {
                    file: file.to_path_buf(),
                    name: format!("{}-{}", entry.code, entry.tech_level),
                });
            }
            if !(entry.metals >= 0.0 && entry.non_metals >= 0.0) {
                return Err(DataLoadError::Parse {
                    file: file.to_path_buf(),
                    detail: format!("negative materials for {}", entry.code),
                });
            }
            table.entries.insert(
                key,
                UnitRequirements::from_materials(entry.metals, entry.non_metals),
            );
        }
        Ok(table)
    }
}

impl UnitCatalog for TableCatalog {
    fn requirements(&self, kind: UnitKind, tech_level: TechLevel) -> Option<UnitRequirements> {
        self.entries.get(&Self::key(kind, tech_level)).copied()
    }
}

/// The catalog a scenario runs with: the built-in formulas, or a table
/// loaded from the scenario directory.
#[derive(Debug, Clone)]
pub enum ScenarioCatalog {
    Standard(StandardCatalog),
    Table(TableCatalog),
}

impl Default for ScenarioCatalog {
    fn default() -> Self {
        ScenarioCatalog::Standard(StandardCatalog)
    }
}

impl UnitCatalog for ScenarioCatalog {
    fn requirements(&self, kind: UnitKind, tech_level: TechLevel) -> Option<UnitRequirements> {
        match self {
            ScenarioCatalog::Standard(c) => c.requirements(kind, tech_level),
            ScenarioCatalog::Table(c) => c.requirements(kind, tech_level),
        }
    }
}

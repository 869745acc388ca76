//! Serde data file structs for scenario definitions.
//!
//! These structs define the on-disk format for the unit catalog and for
//! colonies and ships. They are deserialized from RON, JSON, or TOML data
//! files and then resolved into engine types by the loader.

use colony_core::entity::EntityKind;
use serde::Deserialize;

// ===========================================================================
// Catalog
// ===========================================================================

/// Material requirements for one product at one tech level.
///
/// `tech_level` is ignored for products that have no tech level.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntryData {
    pub code: String,
    #[serde(default)]
    pub tech_level: u8,
    pub metals: f64,
    pub non_metals: f64,
}

/// TOML wrapper: `[[units]]` tables.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlCatalog {
    pub units: Vec<CatalogEntryData>,
}

// ===========================================================================
// Entities
// ===========================================================================

/// Headcounts by profession. Missing professions are empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PopulationData {
    pub professional: u64,
    pub unskilled: u64,
    pub unemployed: u64,
    pub soldier: u64,
    pub construction: u64,
    pub spy: u64,
}

/// One inventory line. `code` names a resource (`FUEL`, `METS`, ...) or a
/// product (`AUT`, `FCT`, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct InventoryData {
    pub code: String,
    #[serde(default)]
    pub tech_level: u8,
    pub assembled: f64,
    #[serde(default)]
    pub disassembled: f64,
}

/// Physical units of one tech level.
#[derive(Debug, Clone, Deserialize)]
pub struct UnitStackData {
    pub tech_level: u8,
    pub units: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FarmGroupData {
    pub id: u32,
    pub seq: u16,
    pub units: Vec<UnitStackData>,
}

/// A deposit on the entity, referenced by name from mine groups.
#[derive(Debug, Clone, Deserialize)]
pub struct DepositData {
    pub name: String,
    pub id: u32,
    /// Resource code, e.g. `METS`.
    pub resource: String,
    pub yield_pct: f64,
    /// Refined quantity left; absent means unlimited.
    #[serde(default)]
    pub remaining: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MineGroupData {
    pub id: u32,
    pub seq: u16,
    /// Name of a deposit on the same entity. Absent leaves the group idle.
    #[serde(default)]
    pub deposit: Option<String>,
    pub units: Vec<UnitStackData>,
}

/// A product code and the tech level it is built at.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolingData {
    pub code: String,
    #[serde(default)]
    pub tech_level: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FactoryUnitData {
    pub tech_level: u8,
    pub units: u64,
    #[serde(default)]
    pub cache_metals: f64,
    #[serde(default)]
    pub cache_non_metals: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FactoryGroupData {
    pub id: u32,
    pub seq: u16,
    /// Current tooling. Absent means idle.
    #[serde(default)]
    pub tooling: Option<ToolingData>,
    /// Pending retool target.
    #[serde(default)]
    pub retool_to: Option<ToolingData>,
    pub units: Vec<FactoryUnitData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntityData {
    pub name: String,
    pub id: u32,
    pub kind: EntityKind,
    pub tech_level: u8,
    #[serde(default)]
    pub is_on_surface: Option<bool>,
    #[serde(default)]
    pub is_enclosed: bool,
    #[serde(default)]
    pub population: PopulationData,
    #[serde(default)]
    pub inventory: Vec<InventoryData>,
    #[serde(default)]
    pub deposits: Vec<DepositData>,
    #[serde(default)]
    pub farms: Vec<FarmGroupData>,
    #[serde(default)]
    pub mines: Vec<MineGroupData>,
    #[serde(default)]
    pub factories: Vec<FactoryGroupData>,
}

/// TOML wrapper: `[[entities]]` tables.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlEntities {
    pub entities: Vec<EntityData>,
}

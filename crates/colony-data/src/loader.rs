//! Resolution pipeline: reads data files, resolves cross-references, builds
//! engine entities.
//!
//! Provides format detection (RON/JSON/TOML), file discovery, and
//! deserialization helpers used by [`load_scenario`].

use serde::de::DeserializeOwned;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use colony_core::catalog::{ResourceKind, UnitKind};
use colony_core::config::EngineConfig;
use colony_core::entity::{Entity, InventoryItem, Population, ProfessionGroup};
use colony_core::factory::{FactoryGroup, FactoryUnit};
use colony_core::farm::{FarmGroup, FarmUnit};
use colony_core::id::{DepositId, EntityId, GroupId, SequenceNo};
use colony_core::mine::{Depletion, Deposit, MineGroup, MineUnit};
use colony_core::tooling::{Tooling, ToolingError, ToolingState};
use colony_core::turn::TurnEngine;
use colony_core::world::World;

use crate::catalog::{ScenarioCatalog, TableCatalog};
use crate::schema::{
    CatalogEntryData, DepositData, EntityData, FactoryGroupData, InventoryData, PopulationData,
    ToolingData,
};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A required data file was not found in the given directory.
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: String, dir: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A name reference could not be resolved.
    #[error("unresolved {expected_kind} reference '{name}' in {file}")]
    UnresolvedRef {
        file: PathBuf,
        name: String,
        expected_kind: &'static str,
    },

    /// A duplicate name was found.
    #[error("duplicate name '{name}' in {file}")]
    DuplicateName { file: PathBuf, name: String },

    /// A factory group's tooling could not be applied.
    #[error("invalid tooling for factory group {group} in {file}: {source}")]
    Tooling {
        file: PathBuf,
        group: u32,
        #[source]
        source: ToolingError,
    },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Scan a directory for a data file with the given base name (without extension).
///
/// Looks for `{base_name}.ron`, `{base_name}.toml`, and `{base_name}.json`.
/// Returns `Ok(None)` if no file is found, or `Err(ConflictingFormats)` if
/// multiple formats exist for the same base name.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let extensions = ["ron", "toml", "json"];
    let mut found: Option<PathBuf> = None;

    for ext in &extensions {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(ref existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing.clone(),
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

/// Like [`find_data_file`], but returns an error if no file is found.
pub fn require_data_file(dir: &Path, base_name: &str) -> Result<PathBuf, DataLoadError> {
    find_data_file(dir, base_name)?.ok_or_else(|| DataLoadError::MissingRequired {
        file: base_name.to_string(),
        dir: dir.to_path_buf(),
    })
}

// ===========================================================================
// Deserialization
// ===========================================================================

fn parse_error(path: &Path, e: impl std::fmt::Display) -> DataLoadError {
    DataLoadError::Parse {
        file: path.to_path_buf(),
        detail: e.to_string(),
    }
}

/// Read a file and deserialize it according to its format (detected from extension).
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Toml => toml::from_str(&content).map_err(|e| parse_error(path, e)),
    }
}

/// Deserialize a list from a file. For TOML files, extracts the array at the
/// given `toml_key` from a top-level table. For RON and JSON, deserializes
/// directly as `Vec<T>`.
pub fn deserialize_list<T: DeserializeOwned>(
    path: &Path,
    toml_key: &str,
) -> Result<Vec<T>, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Toml => {
            let table: toml::Value = toml::from_str(&content).map_err(|e| parse_error(path, e))?;
            let array = table
                .get(toml_key)
                .ok_or_else(|| DataLoadError::Parse {
                    file: path.to_path_buf(),
                    detail: format!("missing key '{toml_key}' in TOML file"),
                })?
                .clone();
            array
                .try_into()
                .map_err(|e: toml::de::Error| parse_error(path, e))
        }
    }
}

// ===========================================================================
// Name resolution helpers
// ===========================================================================

/// Look up a name in a map, returning an `UnresolvedRef` error if not found.
pub fn resolve_name<'a, V>(
    map: &'a HashMap<String, V>,
    name: &str,
    file: &Path,
    expected_kind: &'static str,
) -> Result<&'a V, DataLoadError> {
    map.get(name).ok_or_else(|| DataLoadError::UnresolvedRef {
        file: file.to_path_buf(),
        name: name.to_string(),
        expected_kind,
    })
}

/// Check whether a name already exists in a map, returning a `DuplicateName`
/// error if so.
pub fn check_duplicate<V>(
    map: &HashMap<String, V>,
    name: &str,
    file: &Path,
) -> Result<(), DataLoadError> {
    if map.contains_key(name) {
        Err(DataLoadError::DuplicateName {
            file: file.to_path_buf(),
            name: name.to_string(),
        })
    } else {
        Ok(())
    }
}

// ===========================================================================
// Scenario loading
// ===========================================================================

/// Rules, catalog and entities loaded from one directory.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub config: EngineConfig,
    pub catalog: ScenarioCatalog,
    /// Entities in file order.
    pub entities: Vec<Entity>,
}

impl Scenario {
    /// A turn engine and a world holding every entity.
    pub fn into_parts(self) -> (TurnEngine<ScenarioCatalog>, World) {
        let mut world = World::new();
        for entity in self.entities {
            let id = entity.id;
            // ids were checked for duplicates while loading
            if let Err(e) = world.insert(entity) {
                tracing::warn!(target: "colony::data", entity = id.0, error = %e, "data.entity.skipped");
            }
        }
        (TurnEngine::new(self.config, self.catalog), world)
    }
}

/// Load a scenario from `dir`.
///
/// - `engine.{ron,toml,json}` -- optional [`EngineConfig`]; defaults if absent.
/// - `units.{ron,toml,json}` -- optional catalog table; the standard
///   formulas are used if absent.
/// - `entities.{ron,toml,json}` -- required list of colonies and ships.
pub fn load_scenario(dir: &Path) -> Result<Scenario, DataLoadError> {
    let config = match find_data_file(dir, "engine")? {
        Some(path) => {
            let config: EngineConfig = deserialize_file(&path)?;
            tracing::info!(target: "colony::data", file = %path.display(), "data.config.loaded");
            config
        }
        None => {
            tracing::info!(target: "colony::data", dir = %dir.display(), "data.config.default");
            EngineConfig::default()
        }
    };

    let catalog = match find_data_file(dir, "units")? {
        Some(path) => {
            let entries: Vec<CatalogEntryData> = deserialize_list(&path, "units")?;
            let table = TableCatalog::from_entries(&entries, &path)?;
            tracing::info!(
                target: "colony::data",
                file = %path.display(),
                entries = table.len(),
                "data.catalog.loaded"
            );
            ScenarioCatalog::Table(table)
        }
        None => {
            tracing::warn!(target: "colony::data", dir = %dir.display(), "data.catalog.standard_fallback");
            ScenarioCatalog::default()
        }
    };

    let path = require_data_file(dir, "entities")?;
    let data: Vec<EntityData> = deserialize_list(&path, "entities")?;
    let entities = resolve_entities(&data, &catalog, &path)?;
    tracing::info!(
        target: "colony::data",
        file = %path.display(),
        entities = entities.len(),
        "data.entities.loaded"
    );

    Ok(Scenario {
        config,
        catalog,
        entities,
    })
}

/// Resolve entity data into engine entities, checking names, ids and
/// references.
pub fn resolve_entities(
    data: &[EntityData],
    catalog: &ScenarioCatalog,
    file: &Path,
) -> Result<Vec<Entity>, DataLoadError> {
    let mut names: HashMap<String, EntityId> = HashMap::new();
    let mut ids: HashSet<u32> = HashSet::new();
    let mut entities = Vec::with_capacity(data.len());

    for d in data {
        check_duplicate(&names, &d.name, file)?;
        if !ids.insert(d.id) {
            return Err(DataLoadError::DuplicateName {
                file: file.to_path_buf(),
                name: format!("entity id {}", d.id),
            });
        }
        names.insert(d.name.clone(), EntityId(d.id));
        entities.push(resolve_entity(d, catalog, file)?);
    }
    Ok(entities)
}

fn resolve_entity(d: &EntityData, catalog: &ScenarioCatalog, file: &Path) -> Result<Entity, DataLoadError> {
    let mut entity = Entity::new(EntityId(d.id), d.kind, d.tech_level);
    if let Some(on_surface) = d.is_on_surface {
        entity.is_on_surface = on_surface;
    }
    entity.is_enclosed = d.is_enclosed;
    entity.population = resolve_population(&d.population);
    entity.inventory = d
        .inventory
        .iter()
        .map(|i| resolve_inventory(i, file))
        .collect::<Result<_, _>>()?;

    let mut group_ids: HashSet<u32> = HashSet::new();
    let mut claim_group = |id: u32| {
        if group_ids.insert(id) {
            Ok(GroupId(id))
        } else {
            Err(DataLoadError::DuplicateName {
                file: file.to_path_buf(),
                name: format!("{} group {id}", d.name),
            })
        }
    };

    for farm in &d.farms {
        let units = farm
            .units
            .iter()
            .map(|s| FarmUnit::new(s.tech_level, s.units))
            .collect();
        entity
            .farms
            .push(FarmGroup::new(claim_group(farm.id)?, SequenceNo(farm.seq), units));
    }

    // Each group owns the deposit it works, so a deposit can back one group.
    let deposits = resolve_deposits(&d.deposits, file)?;
    let mut worked: HashSet<&str> = HashSet::new();
    for mine in &d.mines {
        let deposit = match &mine.deposit {
            Some(name) => {
                let deposit = resolve_name(&deposits, name, file, "deposit")?.clone();
                if !worked.insert(name.as_str()) {
                    return Err(DataLoadError::DuplicateName {
                        file: file.to_path_buf(),
                        name: format!("{} deposit {name}", d.name),
                    });
                }
                Some(deposit)
            }
            None => None,
        };
        let units = mine
            .units
            .iter()
            .map(|s| MineUnit::new(s.tech_level, s.units))
            .collect();
        entity.mines.push(MineGroup::new(
            claim_group(mine.id)?,
            SequenceNo(mine.seq),
            deposit,
            units,
        ));
    }

    for factory in &d.factories {
        let id = claim_group(factory.id)?;
        entity
            .factories
            .push(resolve_factory(id, factory, catalog, file)?);
    }

    entity.sort_groups();
    Ok(entity)
}

fn resolve_population(p: &PopulationData) -> Population {
    Population {
        unemployed: ProfessionGroup::new(p.unemployed, 0.0),
        unskilled: ProfessionGroup::new(p.unskilled, 0.125),
        professional: ProfessionGroup::new(p.professional, 0.375),
        soldier: ProfessionGroup::new(p.soldier, 0.25),
        construction: ProfessionGroup::new(p.construction, 0.5),
        spy: ProfessionGroup::new(p.spy, 0.625),
    }
}

fn resolve_inventory(i: &InventoryData, file: &Path) -> Result<InventoryItem, DataLoadError> {
    let mut item = if let Ok(kind) = i.code.parse::<ResourceKind>() {
        InventoryItem::resource(kind, i.assembled)
    } else if let Ok(kind) = i.code.parse::<UnitKind>() {
        InventoryItem::unit(kind, i.tech_level, i.assembled)
    } else {
        return Err(DataLoadError::UnresolvedRef {
            file: file.to_path_buf(),
            name: i.code.clone(),
            expected_kind: "inventory",
        });
    };
    item.disassembled = i.disassembled;
    Ok(item)
}

fn resolve_deposits(data: &[DepositData], file: &Path) -> Result<HashMap<String, Deposit>, DataLoadError> {
    let mut deposits = HashMap::new();
    for d in data {
        check_duplicate(&deposits, &d.name, file)?;
        let kind: ResourceKind = d.resource.parse().map_err(|_| DataLoadError::UnresolvedRef {
            file: file.to_path_buf(),
            name: d.resource.clone(),
            expected_kind: "resource",
        })?;
        let depletion = match d.remaining {
            Some(remaining) => Depletion::Finite { remaining },
            None => Depletion::Unlimited,
        };
        deposits.insert(
            d.name.clone(),
            Deposit::new(DepositId(d.id), kind, d.yield_pct, depletion),
        );
    }
    Ok(deposits)
}

fn resolve_tooling(t: &ToolingData, file: &Path) -> Result<Tooling, DataLoadError> {
    let kind: UnitKind = t.code.parse().map_err(|_| DataLoadError::UnresolvedRef {
        file: file.to_path_buf(),
        name: t.code.clone(),
        expected_kind: "unit",
    })?;
    Ok(Tooling::new(kind, t.tech_level))
}

fn resolve_factory(
    id: GroupId,
    data: &FactoryGroupData,
    catalog: &ScenarioCatalog,
    file: &Path,
) -> Result<FactoryGroup, DataLoadError> {
    let units = data
        .units
        .iter()
        .map(|u| FactoryUnit::new(u.tech_level, u.units).with_cache(u.cache_metals, u.cache_non_metals))
        .collect();
    let mut group = FactoryGroup::new(id, SequenceNo(data.seq), ToolingState::Idle, units);
    let tooling_error = |source: ToolingError| DataLoadError::Tooling {
        file: file.to_path_buf(),
        group: data.id,
        source,
    };

    if let Some(t) = &data.tooling {
        group
            .assign_tooling(resolve_tooling(t, file)?, catalog)
            .map_err(tooling_error)?;
    }
    if let Some(t) = &data.retool_to {
        group
            .order_retool(resolve_tooling(t, file)?, catalog)
            .map_err(tooling_error)?;
    }
    Ok(group)
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use colony_core::entity::{EntityKind, Stock};
    use std::fs;

    /// Create a temporary directory with a unique name for test isolation.
    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "colony_data_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Clean up a test directory.
    fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    const UNITS_RON: &str = r#"[
        (code: "FCT", tech_level: 1, metals: 9.0, non_metals: 5.0),
        (code: "CNGD", metals: 0.2, non_metals: 0.4),
    ]"#;

    const UNITS_JSON: &str = r#"[
        {"code": "FCT", "tech_level": 1, "metals": 9.0, "non_metals": 5.0},
        {"code": "CNGD", "metals": 0.2, "non_metals": 0.4}
    ]"#;

    const UNITS_TOML: &str = r#"
[[units]]
code = "FCT"
tech_level = 1
metals = 9.0
non_metals = 5.0

[[units]]
code = "CNGD"
metals = 0.2
non_metals = 0.4
"#;

    const ENTITIES_RON: &str = r#"[
        (
            name: "Alpha",
            id: 1,
            kind: Colony,
            tech_level: 1,
            population: (professional: 500, unskilled: 2000),
            inventory: [
                (code: "FUEL", assembled: 400.0),
                (code: "METS", assembled: 300.0),
                (code: "NMTS", assembled: 300.0),
                (code: "AUT", tech_level: 1, assembled: 50.0),
            ],
            deposits: [
                (name: "north", id: 4, resource: "METS", yield_pct: 30.0, remaining: Some(10000.0)),
            ],
            farms: [(id: 1, seq: 1, units: [(tech_level: 1, units: 100)])],
            mines: [(id: 2, seq: 1, deposit: Some("north"), units: [(tech_level: 1, units: 20)])],
            factories: [
                (
                    id: 3,
                    seq: 1,
                    tooling: Some((code: "FCT", tech_level: 1)),
                    units: [(tech_level: 1, units: 10, cache_metals: 5.0)],
                ),
            ],
        ),
    ]"#;

    // -----------------------------------------------------------------------
    // detect_format
    // -----------------------------------------------------------------------

    #[test]
    fn detect_format_ron() {
        assert_eq!(detect_format(Path::new("units.ron")).unwrap(), Format::Ron);
    }

    #[test]
    fn detect_format_toml() {
        assert_eq!(
            detect_format(Path::new("units.toml")).unwrap(),
            Format::Toml
        );
    }

    #[test]
    fn detect_format_json() {
        assert_eq!(
            detect_format(Path::new("units.json")).unwrap(),
            Format::Json
        );
    }

    #[test]
    fn detect_format_unsupported() {
        let result = detect_format(Path::new("units.yaml"));
        assert!(matches!(
            result,
            Err(DataLoadError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn detect_format_no_extension() {
        let result = detect_format(Path::new("units"));
        assert!(matches!(
            result,
            Err(DataLoadError::UnsupportedFormat { .. })
        ));
    }

    // -----------------------------------------------------------------------
    // find_data_file / require_data_file
    // -----------------------------------------------------------------------

    #[test]
    fn find_data_file_found_ron() {
        let dir = make_test_dir("find_ron");
        fs::write(dir.join("units.ron"), "[]").unwrap();

        let result = find_data_file(&dir, "units").unwrap();
        assert_eq!(result, Some(dir.join("units.ron")));

        cleanup(&dir);
    }

    #[test]
    fn find_data_file_missing() {
        let dir = make_test_dir("find_missing");

        let result = find_data_file(&dir, "units").unwrap();
        assert_eq!(result, None);

        cleanup(&dir);
    }

    #[test]
    fn find_data_file_conflict() {
        let dir = make_test_dir("find_conflict");
        fs::write(dir.join("units.ron"), "[]").unwrap();
        fs::write(dir.join("units.json"), "[]").unwrap();

        let result = find_data_file(&dir, "units");
        assert!(matches!(
            result,
            Err(DataLoadError::ConflictingFormats { .. })
        ));

        cleanup(&dir);
    }

    #[test]
    fn require_data_file_missing() {
        let dir = make_test_dir("require_missing");

        let result = require_data_file(&dir, "entities");
        assert!(matches!(
            result,
            Err(DataLoadError::MissingRequired { ref file, .. }) if file == "entities"
        ));

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // deserialize_file / deserialize_list
    // -----------------------------------------------------------------------

    #[test]
    fn deserialize_file_toml_wrapper() {
        let dir = make_test_dir("deser_toml");
        let path = dir.join("units.toml");
        fs::write(&path, UNITS_TOML).unwrap();

        let wrapper: crate::schema::TomlCatalog = deserialize_file(&path).unwrap();
        assert_eq!(wrapper.units.len(), 2);
        assert_eq!(wrapper.units[0].code, "FCT");

        cleanup(&dir);
    }

    #[test]
    fn deserialize_file_parse_error() {
        let dir = make_test_dir("deser_parse_err");
        let path = dir.join("bad.ron");
        fs::write(&path, "this is not valid RON {{{").unwrap();

        let result: Result<Vec<CatalogEntryData>, _> = deserialize_file(&path);
        assert!(matches!(result, Err(DataLoadError::Parse { .. })));

        cleanup(&dir);
    }

    #[test]
    fn deserialize_list_every_format() {
        let dir = make_test_dir("list_formats");
        for (name, content) in [
            ("units.ron", UNITS_RON),
            ("units.json", UNITS_JSON),
            ("units.toml", UNITS_TOML),
        ] {
            let path = dir.join(name);
            fs::write(&path, content).unwrap();
            let entries: Vec<CatalogEntryData> = deserialize_list(&path, "units").unwrap();
            assert_eq!(entries.len(), 2, "{name}");
            assert_eq!(entries[1].code, "CNGD");
            assert_eq!(entries[1].tech_level, 0);
        }
        cleanup(&dir);
    }

    #[test]
    fn deserialize_list_toml_missing_key() {
        let dir = make_test_dir("list_toml_missing");
        let path = dir.join("units.toml");
        fs::write(&path, r#"foo = "bar""#).unwrap();

        let result: Result<Vec<CatalogEntryData>, _> = deserialize_list(&path, "units");
        assert!(matches!(result, Err(DataLoadError::Parse { .. })));

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // resolve_name / check_duplicate
    // -----------------------------------------------------------------------

    #[test]
    fn resolve_name_missing() {
        let map: HashMap<String, u32> = HashMap::new();

        let result = resolve_name(&map, "north", Path::new("entities.ron"), "deposit");
        assert!(matches!(
            result,
            Err(DataLoadError::UnresolvedRef { ref name, expected_kind: "deposit", .. }) if name == "north"
        ));
    }

    #[test]
    fn check_duplicate_has_dup() {
        let mut map = HashMap::new();
        map.insert("north".to_string(), 42u32);

        assert!(check_duplicate(&map, "south", Path::new("entities.ron")).is_ok());
        let result = check_duplicate(&map, "north", Path::new("entities.ron"));
        assert!(matches!(
            result,
            Err(DataLoadError::DuplicateName { ref name, .. }) if name == "north"
        ));
    }

    // -----------------------------------------------------------------------
    // load_scenario
    // -----------------------------------------------------------------------

    #[test]
    fn scenario_resolves_entities() {
        let dir = make_test_dir("scenario_full");
        fs::write(dir.join("units.ron"), UNITS_RON).unwrap();
        fs::write(dir.join("entities.ron"), ENTITIES_RON).unwrap();
        fs::write(
            dir.join("engine.toml"),
            "turns_per_year = 2\n[mine]\nore_clamp = \"ore\"\n",
        )
        .unwrap();

        let scenario = load_scenario(&dir).unwrap();
        assert_eq!(scenario.config.turns_per_year, 2);
        assert_eq!(
            scenario.config.mine.ore_clamp,
            colony_core::config::OreClampPool::Ore
        );
        assert!(matches!(scenario.catalog, ScenarioCatalog::Table(_)));

        let alpha = &scenario.entities[0];
        assert_eq!(alpha.kind, EntityKind::Colony);
        assert_eq!(alpha.population.professional.quantity, 500);
        assert_eq!(alpha.inventory.len(), 4);
        assert_eq!(
            alpha.inventory[3].stock,
            Stock::Unit {
                kind: UnitKind::Automation,
                tech_level: 1
            }
        );
        assert_eq!(
            alpha.mines[0].deposit.as_ref().map(|d| d.id),
            Some(DepositId(4))
        );
        assert_eq!(
            alpha.factories[0].tooling,
            ToolingState::Producing(Tooling::new(UnitKind::Factory, 1))
        );
        assert_eq!(alpha.factories[0].cache().metals, 5.0);

        cleanup(&dir);
    }

    #[test]
    fn scenario_without_catalog_uses_standard_formulas() {
        let dir = make_test_dir("scenario_standard");
        fs::write(dir.join("entities.json"), "[]").unwrap();

        let scenario = load_scenario(&dir).unwrap();
        assert!(matches!(scenario.catalog, ScenarioCatalog::Standard(_)));
        assert_eq!(scenario.config, EngineConfig::default());
        assert!(scenario.entities.is_empty());

        cleanup(&dir);
    }

    #[test]
    fn scenario_requires_entities() {
        let dir = make_test_dir("scenario_no_entities");
        let result = load_scenario(&dir);
        assert!(matches!(result, Err(DataLoadError::MissingRequired { .. })));
        cleanup(&dir);
    }

    #[test]
    fn unknown_deposit_is_unresolved() {
        let dir = make_test_dir("scenario_bad_deposit");
        fs::write(
            dir.join("entities.ron"),
            r#"[(name: "B", id: 2, kind: Ship, tech_level: 1,
                 mines: [(id: 1, seq: 1, deposit: Some("nowhere"), units: [])])]"#,
        )
        .unwrap();

        let result = load_scenario(&dir);
        assert!(matches!(
            result,
            Err(DataLoadError::UnresolvedRef { expected_kind: "deposit", .. })
        ));
        cleanup(&dir);
    }

    #[test]
    fn deposit_worked_by_two_groups_is_rejected() {
        let dir = make_test_dir("scenario_shared_deposit");
        fs::write(
            dir.join("entities.ron"),
            r#"[(name: "E", id: 5, kind: Colony, tech_level: 1,
                 deposits: [(name: "ridge", id: 1, resource: "METS", yield_pct: 100.0,
                             remaining: Some(1000.0))],
                 mines: [
                     (id: 1, seq: 1, deposit: Some("ridge"), units: [(tech_level: 1, units: 1000)]),
                     (id: 2, seq: 2, deposit: Some("ridge"), units: [(tech_level: 1, units: 1000)]),
                 ])]"#,
        )
        .unwrap();

        let result = load_scenario(&dir);
        assert!(matches!(
            result,
            Err(DataLoadError::DuplicateName { ref name, .. }) if name == "E deposit ridge"
        ));
        cleanup(&dir);
    }

    #[test]
    fn retool_without_tooling_is_rejected() {
        let dir = make_test_dir("scenario_bad_retool");
        fs::write(
            dir.join("entities.ron"),
            r#"[(name: "C", id: 3, kind: Colony, tech_level: 1,
                 factories: [(id: 1, seq: 1, retool_to: Some((code: "LSR", tech_level: 1)),
                              units: [(tech_level: 1, units: 5)])])]"#,
        )
        .unwrap();

        let result = load_scenario(&dir);
        assert!(matches!(
            result,
            Err(DataLoadError::Tooling {
                source: ToolingError::NotTooled,
                ..
            })
        ));
        cleanup(&dir);
    }

    #[test]
    fn duplicate_entity_ids_rejected() {
        let dir = make_test_dir("scenario_dup_ids");
        fs::write(
            dir.join("entities.json"),
            r#"[{"name": "A", "id": 1, "kind": "Colony", "tech_level": 1},
                {"name": "B", "id": 1, "kind": "Ship", "tech_level": 1}]"#,
        )
        .unwrap();

        let result = load_scenario(&dir);
        assert!(matches!(result, Err(DataLoadError::DuplicateName { .. })));
        cleanup(&dir);
    }

    #[test]
    fn duplicate_group_ids_rejected() {
        let data = vec![EntityData {
            name: "D".to_string(),
            id: 4,
            kind: EntityKind::Colony,
            tech_level: 1,
            is_on_surface: None,
            is_enclosed: false,
            population: PopulationData::default(),
            inventory: vec![],
            deposits: vec![],
            farms: vec![crate::schema::FarmGroupData {
                id: 7,
                seq: 1,
                units: vec![],
            }],
            mines: vec![crate::schema::MineGroupData {
                id: 7,
                seq: 1,
                deposit: None,
                units: vec![],
            }],
            factories: vec![],
        }];
        let result = resolve_entities(&data, &ScenarioCatalog::default(), Path::new("entities.ron"));
        assert!(matches!(result, Err(DataLoadError::DuplicateName { .. })));
    }

    // -----------------------------------------------------------------------
    // Errors
    // -----------------------------------------------------------------------

    #[test]
    fn error_display_messages() {
        let e = DataLoadError::MissingRequired {
            file: "entities".to_string(),
            dir: PathBuf::from("/data"),
        };
        assert!(format!("{e}").contains("entities"));
        assert!(format!("{e}").contains("/data"));

        let e = DataLoadError::Tooling {
            file: PathBuf::from("entities.ron"),
            group: 3,
            source: ToolingError::NotTooled,
        };
        let msg = format!("{e}");
        assert!(msg.contains("group 3"));
        assert!(msg.contains("no tooling"));
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let data_err: DataLoadError = io_err.into();
        assert!(matches!(data_err, DataLoadError::Io(_)));
        assert!(format!("{data_err}").contains("file not found"));
    }
}

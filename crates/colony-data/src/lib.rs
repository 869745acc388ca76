//! Scenario data for colony-core: engine rules, unit catalogs, and colonies
//! and ships, read from RON, TOML or JSON files.

pub mod catalog;
pub mod loader;
pub mod schema;

pub use catalog::{ScenarioCatalog, TableCatalog};
pub use loader::{DataLoadError, Scenario, load_scenario};

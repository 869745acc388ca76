//! Product codes and the unit catalog.
//!
//! The catalog maps a product code and tech level to the mass, volume and
//! build materials of one item. The engine only ever asks the catalog
//! through the [`UnitCatalog`] trait; [`StandardCatalog`] carries the
//! standard rule formulas and `colony-data` can supply a table instead.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::id::TechLevel;

// ---------------------------------------------------------------------------
// Codes
// ---------------------------------------------------------------------------

/// Manufactured unit kinds, by their short product code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    #[serde(rename = "AUT")]
    Automation,
    #[serde(rename = "CNGD")]
    ConsumerGoods,
    #[serde(rename = "FCT")]
    Factory,
    #[serde(rename = "FRM")]
    Farm,
    #[serde(rename = "HEN")]
    HyperEngine,
    #[serde(rename = "LSR")]
    Laser,
    #[serde(rename = "MIN")]
    Mine,
    #[serde(rename = "MSL")]
    Missile,
    #[serde(rename = "SEN")]
    Sensor,
    #[serde(rename = "SPD")]
    SpaceDrive,
    #[serde(rename = "STU")]
    Structural,
    #[serde(rename = "ANM")]
    AntiMissile,
}

impl UnitKind {
    pub const ALL: [UnitKind; 12] = [
        UnitKind::Automation,
        UnitKind::ConsumerGoods,
        UnitKind::Factory,
        UnitKind::Farm,
        UnitKind::HyperEngine,
        UnitKind::Laser,
        UnitKind::Mine,
        UnitKind::Missile,
        UnitKind::Sensor,
        UnitKind::SpaceDrive,
        UnitKind::Structural,
        UnitKind::AntiMissile,
    ];

    pub fn code(self) -> &'static str {
        match self {
            UnitKind::Automation => "AUT",
            UnitKind::ConsumerGoods => "CNGD",
            UnitKind::Factory => "FCT",
            UnitKind::Farm => "FRM",
            UnitKind::HyperEngine => "HEN",
            UnitKind::Laser => "LSR",
            UnitKind::Mine => "MIN",
            UnitKind::Missile => "MSL",
            UnitKind::Sensor => "SEN",
            UnitKind::SpaceDrive => "SPD",
            UnitKind::Structural => "STU",
            UnitKind::AntiMissile => "ANM",
        }
    }

    /// Whether the item's properties depend on a tech level.
    pub fn is_tech_leveled(self) -> bool {
        !matches!(self, UnitKind::ConsumerGoods | UnitKind::Structural)
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Bulk resources held in inventory and produced by farms and mines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    #[serde(rename = "FOOD")]
    Food,
    #[serde(rename = "FUEL")]
    Fuel,
    #[serde(rename = "GOLD")]
    Gold,
    #[serde(rename = "METS")]
    Metals,
    #[serde(rename = "NMTS")]
    NonMetals,
}

impl ResourceKind {
    pub fn code(self) -> &'static str {
        match self {
            ResourceKind::Food => "FOOD",
            ResourceKind::Fuel => "FUEL",
            ResourceKind::Gold => "GOLD",
            ResourceKind::Metals => "METS",
            ResourceKind::NonMetals => "NMTS",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A product code that is neither a known unit nor a known resource.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown product code '{0}'")]
pub struct UnknownCode(pub String);

impl FromStr for UnitKind {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        UnitKind::ALL
            .into_iter()
            .find(|k| k.code() == upper)
            .ok_or(UnknownCode(s.to_string()))
    }
}

impl FromStr for ResourceKind {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FOOD" => Ok(ResourceKind::Food),
            "FUEL" => Ok(ResourceKind::Fuel),
            "GOLD" => Ok(ResourceKind::Gold),
            "METS" => Ok(ResourceKind::Metals),
            "NMTS" => Ok(ResourceKind::NonMetals),
            _ => Err(UnknownCode(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Requirements
// ---------------------------------------------------------------------------

/// Physical properties and build materials of one item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitRequirements {
    pub mass: f64,
    pub volume: f64,
    pub volume_disassembled: f64,
    pub metals: f64,
    pub non_metals: f64,
}

impl UnitRequirements {
    /// Requirements for an item whose mass is exactly its build materials.
    pub fn from_materials(metals: f64, non_metals: f64) -> Self {
        let mass = metals + non_metals;
        Self {
            mass,
            volume: mass,
            volume_disassembled: mass / 2.0,
            metals,
            non_metals,
        }
    }

    /// Metals plus non-metals needed per item.
    pub fn materials(&self) -> f64 {
        self.metals + self.non_metals
    }
}

/// Source of per-item requirements.
pub trait UnitCatalog {
    /// Requirements for one item of `kind` at `tech_level`, or `None` when
    /// the catalog has no such product.
    fn requirements(&self, kind: UnitKind, tech_level: TechLevel) -> Option<UnitRequirements>;
}

impl<C: UnitCatalog + ?Sized> UnitCatalog for &C {
    fn requirements(&self, kind: UnitKind, tech_level: TechLevel) -> Option<UnitRequirements> {
        (**self).requirements(kind, tech_level)
    }
}

/// The standard rule formulas.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardCatalog;

impl UnitCatalog for StandardCatalog {
    fn requirements(&self, kind: UnitKind, tech_level: TechLevel) -> Option<UnitRequirements> {
        if kind.is_tech_leveled() && tech_level == 0 {
            return None;
        }
        let tl = f64::from(tech_level);
        let (metals, non_metals) = match kind {
            UnitKind::Automation => (2.0 * tl, 2.0 * tl),
            UnitKind::ConsumerGoods => (0.2, 0.4),
            UnitKind::Factory => (8.0 + tl, 4.0 + tl),
            UnitKind::Farm => (4.0 + tl, 2.0 + tl),
            UnitKind::HyperEngine => (25.0 * tl, 20.0 * tl),
            UnitKind::Laser => (5.0 * tl, 3.0 * tl),
            UnitKind::Mine => (5.0 + tl, 5.0 + tl),
            UnitKind::Missile => (2.0 * tl, 2.0 * tl),
            UnitKind::Sensor => (10.0 * tl, 30.0 * tl),
            UnitKind::SpaceDrive => (15.0 * tl, 10.0 * tl),
            UnitKind::Structural => (0.1, 0.4),
            UnitKind::AntiMissile => (2.0 * tl, 2.0 * tl),
        };
        Some(UnitRequirements::from_materials(metals, non_metals))
    }
}

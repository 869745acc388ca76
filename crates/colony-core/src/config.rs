//! Game-rule constants for the production engine.
//!
//! Every rate the engine uses lives in [`EngineConfig`]. The defaults are the
//! standard rules; data files loaded through `colony-data` can override any
//! field.

use serde::{Deserialize, Serialize};

use crate::allocation::UnitCosts;
use crate::id::TechLevel;

/// Fuel and labor needed to operate one physical unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatingCosts {
    /// Fuel burned per unit per year, per tech level.
    pub fuel_per_unit_year_per_tl: f64,
    /// Professionals needed per operating unit.
    pub pro_per_unit: f64,
    /// Unskilled workers (or automation) needed per operating unit.
    pub usk_per_unit: f64,
}

impl Default for OperatingCosts {
    fn default() -> Self {
        Self {
            fuel_per_unit_year_per_tl: 0.5,
            pro_per_unit: 1.0,
            usk_per_unit: 3.0,
        }
    }
}

impl OperatingCosts {
    /// Per-unit costs for one turn at the given tech level.
    pub fn per_turn(&self, tech_level: TechLevel, turns_per_year: f64) -> UnitCosts {
        UnitCosts {
            fuel: self.fuel_per_unit_year_per_tl * f64::from(tech_level) / turns_per_year,
            pro: self.pro_per_unit,
            labor: self.usk_per_unit,
        }
    }
}

/// Which pool the mine ore clamp divides.
///
/// The standard rules divide the *fuel* pool by the ore cost per unit. That
/// looks like a slip for the ore pool, but changing it changes turn results,
/// so the historical behavior stays the default until the rules are settled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OreClampPool {
    #[default]
    Fuel,
    Ore,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FarmRules {
    /// Food per unit per year for tech level 1 farms.
    pub food_per_unit_year_tl1: f64,
    /// Food per unit per year, per tech level, for every other tech level.
    pub food_per_unit_year_per_tl: f64,
    pub costs: OperatingCosts,
}

impl Default for FarmRules {
    fn default() -> Self {
        Self {
            food_per_unit_year_tl1: 100.0,
            food_per_unit_year_per_tl: 20.0,
            costs: OperatingCosts::default(),
        }
    }
}

impl FarmRules {
    pub fn food_per_unit_year(&self, tech_level: TechLevel) -> f64 {
        if tech_level == 1 {
            self.food_per_unit_year_tl1
        } else {
            f64::from(tech_level) * self.food_per_unit_year_per_tl
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MineRules {
    /// Raw ore mass one unit can move per year, per tech level.
    pub ore_mass_per_unit_year_per_tl: f64,
    pub ore_clamp: OreClampPool,
    pub costs: OperatingCosts,
}

impl Default for MineRules {
    fn default() -> Self {
        Self {
            ore_mass_per_unit_year_per_tl: 100.0,
            ore_clamp: OreClampPool::Fuel,
            costs: OperatingCosts::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactoryRules {
    /// Material mass one unit can work per year, per tech level.
    pub mass_per_unit_year_per_tl: f64,
    pub costs: OperatingCosts,
}

impl Default for FactoryRules {
    fn default() -> Self {
        Self {
            mass_per_unit_year_per_tl: 20.0,
            costs: OperatingCosts::default(),
        }
    }
}

/// All rule constants consulted during a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub turns_per_year: u32,
    pub farm: FarmRules,
    pub mine: MineRules,
    pub factory: FactoryRules,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            turns_per_year: 4,
            farm: FarmRules::default(),
            mine: MineRules::default(),
            factory: FactoryRules::default(),
        }
    }
}

impl EngineConfig {
    /// Turns per year as a divisor. A zero setting is treated as one turn.
    pub fn turns(&self) -> f64 {
        f64::from(self.turns_per_year.max(1))
    }
}

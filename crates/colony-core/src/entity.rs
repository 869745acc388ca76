//! Ships and colonies: the owners of production groups.

use serde::{Deserialize, Serialize};

use crate::catalog::{ResourceKind, UnitKind};
use crate::factory::FactoryGroup;
use crate::farm::FarmGroup;
use crate::id::{EntityId, TechLevel};
use crate::mine::MineGroup;
use crate::resources::ResourceConstraints;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Colony,
    Ship,
}

/// Headcount of one profession.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfessionGroup {
    pub quantity: u64,
    pub pay_rate: f64,
    pub rebels: u64,
}

impl ProfessionGroup {
    pub fn new(quantity: u64, pay_rate: f64) -> Self {
        Self {
            quantity,
            pay_rate,
            rebels: 0,
        }
    }

    /// People still willing to work.
    pub fn loyal(&self) -> u64 {
        self.quantity.saturating_sub(self.rebels)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Population {
    pub unemployed: ProfessionGroup,
    pub unskilled: ProfessionGroup,
    pub professional: ProfessionGroup,
    pub soldier: ProfessionGroup,
    pub construction: ProfessionGroup,
    pub spy: ProfessionGroup,
}

impl Population {
    pub fn total(&self) -> u64 {
        [
            self.unemployed,
            self.unskilled,
            self.professional,
            self.soldier,
            self.construction,
            self.spy,
        ]
        .iter()
        .map(|g| g.quantity)
        .sum()
    }
}

/// What an inventory line holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stock {
    Resource(ResourceKind),
    Unit { kind: UnitKind, tech_level: TechLevel },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub stock: Stock,
    /// Assembled and ready for use.
    pub assembled: f64,
    /// Stored in pieces; does not count toward operating capacity.
    #[serde(default)]
    pub disassembled: f64,
}

impl InventoryItem {
    pub fn resource(kind: ResourceKind, quantity: f64) -> Self {
        Self {
            stock: Stock::Resource(kind),
            assembled: quantity,
            disassembled: 0.0,
        }
    }

    pub fn unit(kind: UnitKind, tech_level: TechLevel, assembled: f64) -> Self {
        Self {
            stock: Stock::Unit { kind, tech_level },
            assembled,
            disassembled: 0.0,
        }
    }
}

/// A colony or ship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub is_on_surface: bool,
    pub is_enclosed: bool,
    pub tech_level: TechLevel,
    /// Inactive entities are skipped by turn processing.
    pub active: bool,
    pub population: Population,
    #[serde(default)]
    pub inventory: Vec<InventoryItem>,
    #[serde(default)]
    pub farms: Vec<FarmGroup>,
    #[serde(default)]
    pub mines: Vec<MineGroup>,
    #[serde(default)]
    pub factories: Vec<FactoryGroup>,
}

impl Entity {
    pub fn new(id: EntityId, kind: EntityKind, tech_level: TechLevel) -> Self {
        Self {
            id,
            kind,
            is_on_surface: kind == EntityKind::Colony,
            is_enclosed: false,
            tech_level,
            active: true,
            population: Population::default(),
            inventory: Vec::new(),
            farms: Vec::new(),
            mines: Vec::new(),
            factories: Vec::new(),
        }
    }

    pub fn is_colony(&self) -> bool {
        self.kind == EntityKind::Colony
    }

    pub fn is_ship(&self) -> bool {
        self.kind == EntityKind::Ship
    }

    /// Assembled quantity of a bulk resource.
    pub fn resource_on_hand(&self, kind: ResourceKind) -> f64 {
        self.inventory
            .iter()
            .filter(|i| i.stock == Stock::Resource(kind))
            .map(|i| i.assembled)
            .sum()
    }

    /// Automation capacity: assembled AUT units weighted by tech level.
    pub fn automation(&self) -> f64 {
        self.inventory
            .iter()
            .filter_map(|i| match i.stock {
                Stock::Unit {
                    kind: UnitKind::Automation,
                    tech_level,
                } => Some(i.assembled * f64::from(tech_level)),
                _ => None,
            })
            .sum()
    }

    /// Default allocation pool derived from population and inventory.
    /// Rebels do not work.
    pub fn resource_budget(&self) -> ResourceConstraints {
        ResourceConstraints::empty()
            .with_fuel(self.resource_on_hand(ResourceKind::Fuel))
            .with_pro(self.population.professional.loyal() as f64)
            .with_usk(self.population.unskilled.loyal() as f64)
            .with_aut(self.automation())
            .with_metals(self.resource_on_hand(ResourceKind::Metals))
            .with_non_metals(self.resource_on_hand(ResourceKind::NonMetals))
    }

    /// Sort every group collection by sequence number.
    pub fn sort_groups(&mut self) {
        self.farms.sort_by_key(|g| g.seq);
        self.mines.sort_by_key(|g| g.seq);
        self.factories.sort_by_key(|g| g.seq);
    }
}

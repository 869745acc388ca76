//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::catalog::{ResourceKind, UnitKind};
use crate::entity::{Entity, EntityKind, InventoryItem, ProfessionGroup};
use crate::factory::{FactoryGroup, FactoryUnit};
use crate::farm::{FarmGroup, FarmUnit};
use crate::id::{DepositId, EntityId, GroupId, SequenceNo, TechLevel};
use crate::mine::{Depletion, Deposit, MineGroup, MineUnit};
use crate::resources::ResourceConstraints;
use crate::tooling::{Tooling, ToolingState};
use crate::world::World;

// ===========================================================================
// Pools
// ===========================================================================

/// A pool no test group will exhaust.
pub fn plenty_pool() -> ResourceConstraints {
    ResourceConstraints::empty()
        .with_fuel(1e12)
        .with_pro(1e12)
        .with_usk(1e12)
        .with_metals(1e12)
        .with_non_metals(1e12)
}

/// A pool with only fuel and labor, split as `pro` professionals and
/// `usk` unskilled workers.
pub fn labor_pool(fuel: f64, pro: f64, usk: f64) -> ResourceConstraints {
    ResourceConstraints::empty()
        .with_fuel(fuel)
        .with_pro(pro)
        .with_usk(usk)
}

// ===========================================================================
// Groups
// ===========================================================================

pub fn farm_group(id: u32, seq: u16, tech_level: TechLevel, units: u64) -> FarmGroup {
    FarmGroup::new(
        GroupId(id),
        SequenceNo(seq),
        vec![FarmUnit::new(tech_level, units)],
    )
}

pub fn metals_deposit(id: u32, yield_pct: f64, remaining: Option<f64>) -> Deposit {
    let depletion = match remaining {
        Some(remaining) => Depletion::Finite { remaining },
        None => Depletion::Unlimited,
    };
    Deposit::new(DepositId(id), ResourceKind::Metals, yield_pct, depletion)
}

pub fn mine_group(id: u32, seq: u16, deposit: Deposit, tech_level: TechLevel, units: u64) -> MineGroup {
    MineGroup::new(
        GroupId(id),
        SequenceNo(seq),
        Some(deposit),
        vec![MineUnit::new(tech_level, units)],
    )
}

pub fn factory_group(id: u32, seq: u16, product: UnitKind, tech_level: TechLevel, units: u64) -> FactoryGroup {
    FactoryGroup::new(
        GroupId(id),
        SequenceNo(seq),
        ToolingState::Producing(Tooling::new(product, tech_level)),
        vec![FactoryUnit::new(tech_level, units)],
    )
}

// ===========================================================================
// Entities
// ===========================================================================

/// A TL1 colony with one farm, one mine and one factory group, a
/// population, and stockpiles to run them from its own budget.
pub fn sample_colony(id: u32) -> Entity {
    let mut e = Entity::new(EntityId(id), EntityKind::Colony, 1);
    e.population.professional = ProfessionGroup::new(2_000, 0.375);
    e.population.unskilled = ProfessionGroup::new(10_000, 0.125);
    e.population.unemployed = ProfessionGroup::new(5_000, 0.0);
    e.inventory = vec![
        InventoryItem::resource(ResourceKind::Fuel, 5_000.0),
        InventoryItem::resource(ResourceKind::Metals, 2_000.0),
        InventoryItem::resource(ResourceKind::NonMetals, 2_000.0),
        InventoryItem::unit(UnitKind::Automation, 1, 500.0),
    ];
    e.farms.push(farm_group(id * 10 + 1, 1, 1, 1_000));
    e.mines.push(mine_group(
        id * 10 + 2,
        1,
        metals_deposit(id, 40.0, Some(1_000_000.0)),
        1,
        200,
    ));
    e.factories
        .push(factory_group(id * 10 + 3, 1, UnitKind::Factory, 1, 100));
    e
}

/// A world of `n` sample colonies with ids `1..=n`.
pub fn sample_world(n: u32) -> World {
    let mut world = World::new();
    for id in 1..=n {
        world.insert(sample_colony(id)).expect("unique ids");
    }
    world
}

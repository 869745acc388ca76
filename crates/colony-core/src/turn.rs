//! One entity's production turn.
//!
//! Groups run in a fixed order against a single pool: farms, then mines,
//! then factories, each kind in ascending sequence number. For every group
//! the steps are begin (record wants) -> allocate -> consume -> produce.
//! Factories that operated also advance their pipelines before starting new
//! work, and a retooling factory whose pipelines are empty switches to its
//! new product at the end of the turn.

use crate::catalog::{StandardCatalog, UnitCatalog};
use crate::config::EngineConfig;
use crate::entity::Entity;
use crate::mine::Deposit;
use crate::report::TurnReport;
use crate::resources::{ResourceConstraints, Resources};

/// Runs production turns with one rule set and catalog.
#[derive(Debug, Clone)]
pub struct TurnEngine<C = StandardCatalog> {
    config: EngineConfig,
    catalog: C,
}

impl TurnEngine<StandardCatalog> {
    /// Standard rules and the standard catalog.
    pub fn standard() -> Self {
        Self::new(EngineConfig::default(), StandardCatalog)
    }
}

impl Default for TurnEngine<StandardCatalog> {
    fn default() -> Self {
        Self::standard()
    }
}

impl<C: UnitCatalog> TurnEngine<C> {
    pub fn new(config: EngineConfig, catalog: C) -> Self {
        Self { config, catalog }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Everything the entity's groups would consume if nothing were scarce.
    pub fn want(&self, entity: &Entity) -> Resources {
        let cfg = &self.config;
        let farms: Resources = entity.farms.iter().map(|g| g.want(cfg)).sum();
        let mines: Resources = entity.mines.iter().map(|g| g.want(cfg)).sum();
        let factories: Resources = entity
            .factories
            .iter()
            .map(|g| g.want(cfg, &self.catalog))
            .sum();
        farms + mines + factories
    }

    /// Run one turn for `entity`, allocating from `pool`.
    pub fn process_entity(&self, entity: &mut Entity, pool: ResourceConstraints) -> TurnReport {
        if !entity.active {
            tracing::debug!(target: "colony::turn", entity = entity.id.0, "turn.entity.inactive");
            return TurnReport::empty(entity.id, pool);
        }

        let cfg = &self.config;
        entity.sort_groups();
        tracing::debug!(
            target: "colony::turn",
            entity = entity.id.0,
            fuel = pool.fuel,
            pro = pool.pro,
            usk = pool.usk,
            aut = pool.aut,
            metals = pool.metals,
            non_metals = pool.non_metals,
            "turn.entity.start"
        );

        let mut pool = pool;
        let mut groups =
            Vec::with_capacity(entity.farms.len() + entity.mines.len() + entity.factories.len());

        for farm in &mut entity.farms {
            farm.begin_turn(cfg);
            pool = farm.allocate(cfg, pool);
            farm.consume();
            let food = farm.produce(cfg);
            tracing::trace!(target: "colony::turn", group = farm.id.0, food, "turn.farm");
            groups.push(farm.summary());
        }

        for mine in &mut entity.mines {
            mine.begin_turn(cfg);
            // Ore is local to the group's deposit.
            let outer_ore = pool.ore;
            pool.ore = mine.deposit.as_ref().map_or(0.0, Deposit::extractable_ore);
            pool = mine.allocate(cfg, pool);
            pool.ore = outer_ore;
            mine.consume();
            let refined = mine.produce();
            tracing::trace!(target: "colony::turn", group = mine.id.0, refined, "turn.mine");
            groups.push(mine.summary());
        }

        for factory in &mut entity.factories {
            factory.begin_turn(cfg, &self.catalog);
            pool = factory.allocate(cfg, &self.catalog, pool);
            factory.consume();
            let completed = factory.advance_pipelines(&self.catalog);
            let started = factory.produce(cfg, &self.catalog);
            if factory.tooling.is_retooling()
                && factory.is_drained()
                && let Ok(tooling) = factory.complete_retool()
            {
                tracing::debug!(
                    target: "colony::turn",
                    entity = entity.id.0,
                    group = factory.id.0,
                    kind = %tooling.kind,
                    "turn.factory.retooled"
                );
            }
            tracing::trace!(
                target: "colony::turn",
                group = factory.id.0,
                completed,
                started,
                "turn.factory"
            );
            groups.push(factory.summary());
        }

        tracing::debug!(
            target: "colony::turn",
            entity = entity.id.0,
            groups = groups.len(),
            fuel = pool.fuel,
            pro = pool.pro,
            "turn.entity.finish"
        );
        TurnReport {
            entity: entity.id,
            groups,
            remaining: pool,
        }
    }

    /// Run one turn with the pool derived from the entity's own population
    /// and inventory.
    pub fn process_with_own_budget(&self, entity: &mut Entity) -> TurnReport {
        let pool = entity.resource_budget();
        self.process_entity(entity, pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ResourceKind, UnitKind};
    use crate::entity::EntityKind;
    use crate::factory::{FactoryGroup, FactoryUnit};
    use crate::farm::{FarmGroup, FarmUnit};
    use crate::id::{DepositId, EntityId, GroupId, SequenceNo};
    use crate::ledger::Product;
    use crate::mine::{Depletion, MineGroup, MineUnit};
    use crate::pipeline::Pipeline;
    use crate::report::GroupKind;
    use crate::tooling::{Tooling, ToolingState};

    fn colony() -> Entity {
        let mut e = Entity::new(EntityId(3), EntityKind::Colony, 1);
        e.farms.push(FarmGroup::new(
            GroupId(1),
            SequenceNo(1),
            vec![FarmUnit::new(1, 100)],
        ));
        e.mines.push(MineGroup::new(
            GroupId(2),
            SequenceNo(1),
            Some(Deposit::new(
                DepositId(1),
                ResourceKind::Metals,
                50.0,
                Depletion::Finite { remaining: 1_000.0 },
            )),
            vec![MineUnit::new(1, 10)],
        ));
        e.factories.push(FactoryGroup::new(
            GroupId(3),
            SequenceNo(1),
            ToolingState::Producing(Tooling::new(UnitKind::Factory, 1)),
            vec![FactoryUnit::new(1, 10)],
        ));
        e
    }

    fn pool() -> ResourceConstraints {
        ResourceConstraints::empty()
            .with_fuel(1_000.0)
            .with_pro(1_000.0)
            .with_usk(10_000.0)
            .with_metals(1_000.0)
            .with_non_metals(1_000.0)
    }

    #[test]
    fn groups_report_in_processing_order() {
        let engine = TurnEngine::standard();
        let mut e = colony();
        let report = engine.process_entity(&mut e, pool());
        let kinds: Vec<GroupKind> = report.groups.iter().map(|g| g.kind).collect();
        assert_eq!(kinds, vec![GroupKind::Farm, GroupKind::Mine, GroupKind::Factory]);
        assert_eq!(report.produced(Product::Resource(ResourceKind::Food)), 2_500.0);
        // 10 units * 25 mass * 50%
        assert_eq!(report.produced(Product::Resource(ResourceKind::Metals)), 125.0);
    }

    #[test]
    fn earlier_groups_starve_later_ones() {
        let engine = TurnEngine::standard();
        let mut e = colony();
        // Farms take all 100 professionals.
        let report = engine.process_entity(&mut e, pool().with_pro(100.0));
        assert_eq!(report.groups[0].operating_units(), 100);
        assert_eq!(report.groups[1].operating_units(), 0);
        assert_eq!(report.groups[2].operating_units(), 0);
    }

    #[test]
    fn caller_ore_is_restored() {
        let engine = TurnEngine::standard();
        let mut e = colony();
        let report = engine.process_entity(&mut e, pool().with_ore(77.0));
        assert_eq!(report.remaining.ore, 77.0);
    }

    #[test]
    fn inactive_entity_is_skipped() {
        let engine = TurnEngine::standard();
        let mut e = colony();
        e.active = false;
        let report = engine.process_entity(&mut e, pool());
        assert!(report.groups.is_empty());
        assert_eq!(report.remaining, pool());
    }

    #[test]
    fn drained_retool_switches_product() {
        let engine = TurnEngine::standard();
        let mut e = Entity::new(EntityId(4), EntityKind::Ship, 2);
        e.factories.push(FactoryGroup::new(
            GroupId(5),
            SequenceNo(1),
            ToolingState::Retooling {
                current: Tooling::new(UnitKind::Factory, 1),
                target: Tooling::new(UnitKind::Automation, 1),
            },
            vec![FactoryUnit::new(1, 5).with_pipeline(Pipeline::from_stages([0.0, 1.0, 0.0]))],
        ));

        engine.process_entity(&mut e, pool());
        assert!(e.factories[0].tooling.is_retooling());

        let report = engine.process_entity(&mut e, pool());
        assert_eq!(
            report.completed(Product::Unit {
                kind: UnitKind::Factory,
                tech_level: 1
            }),
            1.0
        );
        assert_eq!(
            e.factories[0].tooling,
            ToolingState::Producing(Tooling::new(UnitKind::Automation, 1))
        );
    }

    #[test]
    fn want_aggregates_all_groups() {
        let engine = TurnEngine::standard();
        let e = colony();
        let want = engine.want(&e);
        assert_eq!(want.nbr_of_units, 120);
        assert_eq!(want.pro, 120.0);
        assert!(want.metals > 0.0);
    }
}

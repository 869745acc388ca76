//! Farms: fuel and labor in, food out.

use serde::{Deserialize, Serialize};

use crate::allocation::{UnitCosts, clamp_units, operating_grant, operating_limits, operating_want};
use crate::catalog::ResourceKind;
use crate::config::EngineConfig;
use crate::id::{GroupId, SequenceNo, TechLevel};
use crate::ledger::{Product, Production, TurnLedger};
use crate::report::{GroupKind, GroupSummary};
use crate::resources::{ResourceConstraints, Resources};

/// Farm units of one tech level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmUnit {
    pub tech_level: TechLevel,
    pub nbr_of_units: u64,
    #[serde(default)]
    pub ledger: TurnLedger,
}

impl FarmUnit {
    pub fn new(tech_level: TechLevel, nbr_of_units: u64) -> Self {
        Self {
            tech_level,
            nbr_of_units,
            ledger: TurnLedger::default(),
        }
    }

    pub fn costs(&self, cfg: &EngineConfig) -> UnitCosts {
        cfg.farm.costs.per_turn(self.tech_level, cfg.turns())
    }

    /// Resources needed to run every physical unit this turn.
    pub fn want(&self, cfg: &EngineConfig) -> Resources {
        operating_want(self.nbr_of_units, &self.costs(cfg))
    }

    pub fn begin_turn(&mut self, cfg: &EngineConfig) {
        let wanted = self.want(cfg);
        self.ledger.reset(wanted);
    }

    /// Claim fuel and labor for as many units as the pool supports and hand
    /// back the rest of the pool.
    pub fn allocate(&mut self, cfg: &EngineConfig, pool: ResourceConstraints) -> ResourceConstraints {
        let mut pool = pool;
        let costs = self.costs(cfg);
        let ceiling = self.nbr_of_units.min(pool.nbr_of_units);
        let n = clamp_units(ceiling, &operating_limits(&costs, &pool));
        let granted = operating_grant(n, &costs, &pool);
        pool.draw(&granted);
        self.ledger.allocated = granted;
        pool
    }

    pub fn consume(&mut self) {
        self.ledger.consume();
    }

    /// Food grown this turn by the units that operated, rounded down.
    pub fn produce(&mut self, cfg: &EngineConfig) -> Production {
        let units = self.ledger.allocated.nbr_of_units as f64;
        let food = (units * cfg.farm.food_per_unit_year(self.tech_level) / cfg.turns()).floor();
        let production = Production::new(Product::Resource(ResourceKind::Food), food);
        self.ledger.produced = Some(production);
        production
    }
}

/// An ordered set of farm units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmGroup {
    pub id: GroupId,
    pub seq: SequenceNo,
    pub units: Vec<FarmUnit>,
}

impl FarmGroup {
    pub fn new(id: GroupId, seq: SequenceNo, units: Vec<FarmUnit>) -> Self {
        Self { id, seq, units }
    }

    pub fn want(&self, cfg: &EngineConfig) -> Resources {
        self.units.iter().map(|u| u.want(cfg)).sum()
    }

    pub fn begin_turn(&mut self, cfg: &EngineConfig) {
        for unit in &mut self.units {
            unit.begin_turn(cfg);
        }
    }

    /// Allocate unit by unit, in order, from one pool.
    pub fn allocate(&mut self, cfg: &EngineConfig, pool: ResourceConstraints) -> ResourceConstraints {
        self.units
            .iter_mut()
            .fold(pool, |pool, unit| unit.allocate(cfg, pool))
    }

    pub fn consume(&mut self) {
        for unit in &mut self.units {
            unit.consume();
        }
    }

    /// Total food grown this turn.
    pub fn produce(&mut self, cfg: &EngineConfig) -> f64 {
        self.units.iter_mut().map(|u| u.produce(cfg).quantity).sum()
    }

    pub fn summary(&self) -> GroupSummary {
        GroupSummary::from_ledgers(
            self.id,
            self.seq,
            GroupKind::Farm,
            self.units.iter().map(|u| (u.nbr_of_units, &u.ledger)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plenty() -> ResourceConstraints {
        ResourceConstraints::empty()
            .with_fuel(1e12)
            .with_pro(1e12)
            .with_usk(1e12)
    }

    fn run(group: &mut FarmGroup, cfg: &EngineConfig, pool: ResourceConstraints) -> (f64, ResourceConstraints) {
        group.begin_turn(cfg);
        let rest = group.allocate(cfg, pool);
        group.consume();
        (group.produce(cfg), rest)
    }

    #[test]
    fn unconstrained_tech_one_farms() {
        let cfg = EngineConfig::default();
        let mut group = FarmGroup::new(GroupId(1), SequenceNo(1), vec![FarmUnit::new(1, 130_000)]);
        let (food, _) = run(&mut group, &cfg, plenty());
        assert_eq!(food, 3_250_000.0);
    }

    #[test]
    fn higher_tech_uses_per_tech_rate() {
        let cfg = EngineConfig::default();
        // 3 units * 60 food/yr / 4 = 45
        let mut group = FarmGroup::new(GroupId(1), SequenceNo(1), vec![FarmUnit::new(3, 3)]);
        let (food, _) = run(&mut group, &cfg, plenty());
        assert_eq!(food, 45.0);
    }

    #[test]
    fn food_is_floored() {
        // 100 / 7 = 14.28...
        let cfg = EngineConfig {
            turns_per_year: 7,
            ..EngineConfig::default()
        };
        let mut group = FarmGroup::new(GroupId(1), SequenceNo(1), vec![FarmUnit::new(1, 1)]);
        let (food, _) = run(&mut group, &cfg, plenty());
        assert_eq!(food, 14.0);
    }

    #[test]
    fn labor_shortage_limits_units() {
        let cfg = EngineConfig::default();
        let mut group = FarmGroup::new(GroupId(1), SequenceNo(1), vec![FarmUnit::new(1, 100)]);
        let pool = plenty().with_pro(40.0);
        let (food, rest) = run(&mut group, &cfg, pool);
        assert_eq!(group.units[0].ledger.allocated.nbr_of_units, 40);
        assert_eq!(food, 1_000.0);
        assert_eq!(rest.pro, 0.0);
    }

    #[test]
    fn units_share_one_pool_in_order() {
        let cfg = EngineConfig::default();
        let mut group = FarmGroup::new(
            GroupId(1),
            SequenceNo(1),
            vec![FarmUnit::new(1, 30), FarmUnit::new(2, 30)],
        );
        let pool = plenty().with_pro(50.0);
        run(&mut group, &cfg, pool);
        assert_eq!(group.units[0].ledger.allocated.nbr_of_units, 30);
        assert_eq!(group.units[1].ledger.allocated.nbr_of_units, 20);
        let summary = group.summary();
        assert_eq!(summary.operating_units(), 50);
        assert_eq!(summary.physical_units, 60);
    }

    #[test]
    fn no_fuel_no_farming() {
        let cfg = EngineConfig::default();
        let mut group = FarmGroup::new(GroupId(1), SequenceNo(1), vec![FarmUnit::new(1, 10)]);
        let pool = plenty().with_fuel(0.0);
        let (food, rest) = run(&mut group, &cfg, pool);
        assert_eq!(food, 0.0);
        assert!(group.units[0].ledger.allocated.is_zero());
        assert_eq!(rest.pro, 1e12);
    }

    #[test]
    fn want_is_idempotent() {
        let cfg = EngineConfig::default();
        let group = FarmGroup::new(GroupId(1), SequenceNo(1), vec![FarmUnit::new(2, 17)]);
        assert_eq!(group.want(&cfg), group.want(&cfg));
        assert_eq!(group.want(&cfg).nbr_of_units, 17);
    }
}

//! Mines: fuel, labor and ore throughput in, refined resources out.
//!
//! Every mine group works exactly one [`Deposit`]. Raw ore mass moved this
//! turn is scaled by the deposit's yield to get refined output, and a finite
//! deposit never gives up more than it has left.

use serde::{Deserialize, Serialize};

use crate::allocation::{
    Limit, UnitCosts, clamp_units, operating_grant, operating_limits, operating_want,
};
use crate::catalog::ResourceKind;
use crate::config::{EngineConfig, OreClampPool};
use crate::id::{DepositId, GroupId, SequenceNo, TechLevel};
use crate::ledger::{Product, Production, TurnLedger};
use crate::report::{GroupKind, GroupSummary};
use crate::resources::{ResourceConstraints, Resources, non_negative};

// ---------------------------------------------------------------------------
// Deposit
// ---------------------------------------------------------------------------

/// How much a deposit has left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Depletion {
    /// Never runs out.
    Unlimited,
    /// Refined quantity remaining; once zero the deposit is exhausted.
    Finite { remaining: f64 },
}

/// A natural-resource site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deposit {
    pub id: DepositId,
    pub kind: ResourceKind,
    /// Refined output per unit of raw mass, in percent (0..=100).
    pub yield_pct: f64,
    pub depletion: Depletion,
}

impl Deposit {
    pub fn new(id: DepositId, kind: ResourceKind, yield_pct: f64, depletion: Depletion) -> Self {
        Self {
            id,
            kind,
            yield_pct,
            depletion,
        }
    }

    pub fn yield_fraction(&self) -> f64 {
        non_negative(self.yield_pct).min(100.0) / 100.0
    }

    pub fn remaining(&self) -> Option<f64> {
        match self.depletion {
            Depletion::Unlimited => None,
            Depletion::Finite { remaining } => Some(non_negative(remaining)),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining().is_some_and(|r| r <= 0.0)
    }

    /// Raw mass that can still be worked before the deposit is exhausted.
    pub fn extractable_ore(&self) -> f64 {
        match self.remaining() {
            None => f64::MAX,
            Some(remaining) => {
                let y = self.yield_fraction();
                if y > 0.0 { remaining / y } else { 0.0 }
            }
        }
    }

    /// Refine `mass` raw units. Returns the refined quantity actually taken
    /// and reduces a finite deposit by it.
    pub fn extract(&mut self, mass: f64) -> f64 {
        let refined = non_negative(mass) * self.yield_fraction();
        match &mut self.depletion {
            Depletion::Unlimited => refined,
            Depletion::Finite { remaining } => {
                let taken = refined.min(non_negative(*remaining));
                *remaining = non_negative(*remaining - taken);
                taken
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Mine unit
// ---------------------------------------------------------------------------

/// Mine units of one tech level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MineUnit {
    pub tech_level: TechLevel,
    pub nbr_of_units: u64,
    #[serde(default)]
    pub ledger: TurnLedger,
}

impl MineUnit {
    pub fn new(tech_level: TechLevel, nbr_of_units: u64) -> Self {
        Self {
            tech_level,
            nbr_of_units,
            ledger: TurnLedger::default(),
        }
    }

    pub fn costs(&self, cfg: &EngineConfig) -> UnitCosts {
        cfg.mine.costs.per_turn(self.tech_level, cfg.turns())
    }

    /// Raw mass one unit moves per turn.
    pub fn ore_per_unit(&self, cfg: &EngineConfig) -> f64 {
        f64::from(self.tech_level) * cfg.mine.ore_mass_per_unit_year_per_tl / cfg.turns()
    }

    pub fn want(&self, cfg: &EngineConfig) -> Resources {
        let mut want = operating_want(self.nbr_of_units, &self.costs(cfg));
        want.ore = self.nbr_of_units as f64 * self.ore_per_unit(cfg);
        want
    }

    pub fn begin_turn(&mut self, cfg: &EngineConfig) {
        let wanted = self.want(cfg);
        self.ledger.reset(wanted);
    }

    pub fn allocate(&mut self, cfg: &EngineConfig, pool: ResourceConstraints) -> ResourceConstraints {
        let mut pool = pool;
        let costs = self.costs(cfg);
        let ore_per_unit = self.ore_per_unit(cfg);
        let ceiling = self.nbr_of_units.min(pool.nbr_of_units);

        let staffed = clamp_units(ceiling, &operating_limits(&costs, &pool));
        let ore_pool = match cfg.mine.ore_clamp {
            OreClampPool::Fuel => pool.fuel,
            OreClampPool::Ore => pool.ore,
        };
        let n = clamp_units(staffed, &[Limit::new(ore_per_unit, ore_pool)]);
        if n < staffed && cfg.mine.ore_clamp == OreClampPool::Fuel {
            tracing::warn!(
                target: "colony::mine",
                staffed,
                operating = n,
                fuel = pool.fuel,
                ore_per_unit,
                "mine.ore_clamp.fuel_pool_binding"
            );
        }

        let mut granted = operating_grant(n, &costs, &pool);
        // Never record more raw mass than the deposit can supply.
        granted.ore = (n as f64 * ore_per_unit).min(non_negative(pool.ore));
        pool.draw(&granted);
        self.ledger.allocated = granted;
        pool
    }

    pub fn consume(&mut self) {
        self.ledger.consume();
    }

    /// Refine the ore worked this turn out of `deposit`.
    pub fn produce(&mut self, deposit: &mut Deposit) -> Production {
        let refined = deposit.extract(self.ledger.allocated.ore);
        let production = Production::new(Product::Resource(deposit.kind), refined);
        self.ledger.produced = Some(production);
        production
    }
}

// ---------------------------------------------------------------------------
// Mine group
// ---------------------------------------------------------------------------

/// An ordered set of mine units working one deposit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MineGroup {
    pub id: GroupId,
    pub seq: SequenceNo,
    /// `None` leaves the group idle.
    pub deposit: Option<Deposit>,
    pub units: Vec<MineUnit>,
}

impl MineGroup {
    pub fn new(id: GroupId, seq: SequenceNo, deposit: Option<Deposit>, units: Vec<MineUnit>) -> Self {
        Self {
            id,
            seq,
            deposit,
            units,
        }
    }

    fn workable(&self) -> bool {
        self.deposit.as_ref().is_some_and(|d| !d.is_exhausted())
    }

    pub fn want(&self, cfg: &EngineConfig) -> Resources {
        if !self.workable() {
            return Resources::ZERO;
        }
        self.units.iter().map(|u| u.want(cfg)).sum()
    }

    pub fn begin_turn(&mut self, cfg: &EngineConfig) {
        let workable = self.workable();
        for unit in &mut self.units {
            if workable {
                unit.begin_turn(cfg);
            } else {
                unit.ledger.reset(Resources::ZERO);
            }
        }
    }

    /// Ore in `pool` is taken as the raw mass this group's deposit can
    /// supply; callers scope it per group.
    pub fn allocate(&mut self, cfg: &EngineConfig, pool: ResourceConstraints) -> ResourceConstraints {
        if !self.workable() {
            for unit in &mut self.units {
                unit.ledger.allocated = Resources::ZERO;
            }
            return pool;
        }
        self.units
            .iter_mut()
            .fold(pool, |pool, unit| unit.allocate(cfg, pool))
    }

    pub fn consume(&mut self) {
        for unit in &mut self.units {
            unit.consume();
        }
    }

    /// Total refined output this turn.
    pub fn produce(&mut self) -> f64 {
        let Some(deposit) = self.deposit.as_mut() else {
            return 0.0;
        };
        self.units
            .iter_mut()
            .map(|u| u.produce(deposit).quantity)
            .sum()
    }

    pub fn summary(&self) -> GroupSummary {
        GroupSummary::from_ledgers(
            self.id,
            self.seq,
            GroupKind::Mine,
            self.units.iter().map(|u| (u.nbr_of_units, &u.ledger)),
        )
    }
}

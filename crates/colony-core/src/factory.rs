//! Factories: fuel, labor and banked materials in, manufactured items out.
//!
//! A factory unit keeps a cache of metals and non-metals sized to a year of
//! full-capacity work, topped up from the pool each turn it is producing.
//! Fuel and labor are still claimed turn by turn. New work enters a three
//! stage pipeline and finishes three operating turns later.
//!
//! A group that is retooling hands its cache back and only drains the old
//! pipeline; a group with no tooling does nothing at all.

use serde::{Deserialize, Serialize};

use crate::allocation::{UnitCosts, clamp_units, operating_grant, operating_limits, operating_want};
use crate::catalog::{UnitCatalog, UnitRequirements};
use crate::config::EngineConfig;
use crate::id::{GroupId, SequenceNo, TechLevel};
use crate::ledger::{Product, Production, TurnLedger};
use crate::pipeline::Pipeline;
use crate::report::{GroupKind, GroupSummary, merge_production};
use crate::resources::{ResourceConstraints, Resources, non_negative};
use crate::tooling::{Tooling, ToolingError, ToolingState};

// ---------------------------------------------------------------------------
// Material cache
// ---------------------------------------------------------------------------

/// Metals and non-metals banked by a factory unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialCache {
    pub metals: f64,
    pub non_metals: f64,
}

impl MaterialCache {
    pub fn is_empty(&self) -> bool {
        self.metals <= 0.0 && self.non_metals <= 0.0
    }

    /// Empty the cache, returning what it held.
    fn take(&mut self) -> MaterialCache {
        std::mem::take(self)
    }
}

/// How a factory unit should treat this turn, derived from group tooling.
#[derive(Debug, Clone, Copy)]
enum Mode {
    /// No tooling, or tooling the catalog does not know.
    Idle,
    Retooling(Tooling),
    Producing(Tooling, UnitRequirements),
}

impl Mode {
    fn resolve<C: UnitCatalog>(state: &ToolingState, catalog: &C) -> Mode {
        match *state {
            ToolingState::Idle => Mode::Idle,
            ToolingState::Retooling { current, .. } => Mode::Retooling(current),
            ToolingState::Producing(t) => match catalog.requirements(t.kind, t.tech_level) {
                Some(req) if req.materials() > 0.0 => Mode::Producing(t, req),
                _ => Mode::Idle,
            },
        }
    }

    fn tooling(&self) -> Option<Tooling> {
        match *self {
            Mode::Idle => None,
            Mode::Retooling(t) | Mode::Producing(t, _) => Some(t),
        }
    }
}

// ---------------------------------------------------------------------------
// Factory unit
// ---------------------------------------------------------------------------

/// Factory units of one tech level with their pipeline and cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactoryUnit {
    pub tech_level: TechLevel,
    pub nbr_of_units: u64,
    #[serde(default)]
    pub pipeline: Pipeline,
    #[serde(default)]
    pub cache: MaterialCache,
    #[serde(default)]
    pub ledger: TurnLedger,
    /// Items that left the pipeline this turn.
    #[serde(default)]
    pub completed: Option<Production>,
    /// Cache returned to the pool this turn.
    #[serde(default)]
    pub released: MaterialCache,
}

impl FactoryUnit {
    pub fn new(tech_level: TechLevel, nbr_of_units: u64) -> Self {
        Self {
            tech_level,
            nbr_of_units,
            pipeline: Pipeline::new(),
            cache: MaterialCache::default(),
            ledger: TurnLedger::default(),
            completed: None,
            released: MaterialCache::default(),
        }
    }

    pub fn with_cache(mut self, metals: f64, non_metals: f64) -> Self {
        self.cache = MaterialCache {
            metals: non_negative(metals),
            non_metals: non_negative(non_metals),
        };
        self
    }

    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn costs(&self, cfg: &EngineConfig) -> UnitCosts {
        cfg.factory.costs.per_turn(self.tech_level, cfg.turns())
    }

    /// Material mass the unit's physical units work in a year.
    fn mass_per_year(&self, cfg: &EngineConfig, units: u64) -> f64 {
        f64::from(self.tech_level) * cfg.factory.mass_per_unit_year_per_tl * units as f64
    }

    /// Cache level covering a full year at 100% capacity.
    fn cache_target(&self, cfg: &EngineConfig, req: &UnitRequirements) -> MaterialCache {
        let items = self.mass_per_year(cfg, self.nbr_of_units) / req.materials();
        MaterialCache {
            metals: items * req.metals,
            non_metals: items * req.non_metals,
        }
    }

    fn want(&self, cfg: &EngineConfig, mode: &Mode) -> Resources {
        match mode {
            Mode::Idle => Resources::ZERO,
            Mode::Retooling(_) => operating_want(self.nbr_of_units, &self.costs(cfg)),
            Mode::Producing(_, req) => {
                let mut want = operating_want(self.nbr_of_units, &self.costs(cfg));
                let target = self.cache_target(cfg, req);
                want.metals = non_negative(target.metals - self.cache.metals);
                want.non_metals = non_negative(target.non_metals - self.cache.non_metals);
                want
            }
        }
    }

    fn begin_turn(&mut self, cfg: &EngineConfig, mode: &Mode) {
        let wanted = self.want(cfg, mode);
        self.ledger.reset(wanted);
        self.completed = None;
        self.released = MaterialCache::default();
    }

    fn allocate(&mut self, cfg: &EngineConfig, mode: &Mode, pool: ResourceConstraints) -> ResourceConstraints {
        let mut pool = pool;
        self.ledger.allocated = Resources::ZERO;

        if !matches!(mode, Mode::Producing(..)) && !self.cache.is_empty() {
            let cache = self.cache.take();
            pool.release_materials(cache.metals, cache.non_metals);
            self.released = cache;
            tracing::debug!(
                target: "colony::factory",
                metals = cache.metals,
                non_metals = cache.non_metals,
                "factory.cache.released"
            );
        }
        if matches!(mode, Mode::Idle) {
            return pool;
        }

        let costs = self.costs(cfg);
        let ceiling = self.nbr_of_units.min(pool.nbr_of_units);
        let n = clamp_units(ceiling, &operating_limits(&costs, &pool));
        if n == 0 {
            return pool;
        }

        let mut granted = operating_grant(n, &costs, &pool);
        if let Mode::Producing(_, req) = mode {
            let target = self.cache_target(cfg, req);
            granted.metals = non_negative(target.metals - self.cache.metals).min(pool.metals);
            granted.non_metals =
                non_negative(target.non_metals - self.cache.non_metals).min(pool.non_metals);
            self.cache.metals += granted.metals;
            self.cache.non_metals += granted.non_metals;
        }
        pool.draw(&granted);
        self.ledger.allocated = granted;
        pool
    }

    /// Move work one stage on. Only units that operated this turn advance.
    fn advance(&mut self, mode: &Mode) -> f64 {
        let Some(tooling) = mode.tooling() else {
            return 0.0;
        };
        if self.ledger.operating_units() == 0 {
            return 0.0;
        }
        let done = self.pipeline.advance();
        if done > 0.0 {
            self.completed = Some(Production::new(product_of(tooling), done));
        }
        done
    }

    /// Start new work in the newest pipeline stage, paid from the cache.
    fn produce(&mut self, cfg: &EngineConfig, mode: &Mode) -> f64 {
        let Mode::Producing(tooling, req) = *mode else {
            return 0.0;
        };
        let n = self.ledger.operating_units();
        if n == 0 {
            return 0.0;
        }

        let startable = self.mass_per_year(cfg, n) / cfg.turns() / req.materials();
        let headroom = non_negative(startable - self.pipeline.total());
        let mut quantity = startable.min(headroom) / cfg.turns();
        if req.metals > 0.0 {
            quantity = quantity.min(self.cache.metals / req.metals);
        }
        if req.non_metals > 0.0 {
            quantity = quantity.min(self.cache.non_metals / req.non_metals);
        }
        let quantity = non_negative(quantity);

        self.cache.metals = non_negative(self.cache.metals - quantity * req.metals);
        self.cache.non_metals = non_negative(self.cache.non_metals - quantity * req.non_metals);
        self.pipeline.start(quantity);
        self.ledger.produced = Some(Production::new(product_of(tooling), quantity));
        quantity
    }
}

fn ensure_known<C: UnitCatalog>(target: Tooling, catalog: &C) -> Result<(), ToolingError> {
    match catalog.requirements(target.kind, target.tech_level) {
        Some(_) => Ok(()),
        None => Err(ToolingError::UnknownProduct {
            kind: target.kind,
            tech_level: target.tech_level,
        }),
    }
}

fn product_of(tooling: Tooling) -> Product {
    Product::Unit {
        kind: tooling.kind,
        tech_level: tooling.tech_level,
    }
}

// ---------------------------------------------------------------------------
// Factory group
// ---------------------------------------------------------------------------

/// An ordered set of factory units sharing one tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactoryGroup {
    pub id: GroupId,
    pub seq: SequenceNo,
    pub tooling: ToolingState,
    pub units: Vec<FactoryUnit>,
}

impl FactoryGroup {
    pub fn new(id: GroupId, seq: SequenceNo, tooling: ToolingState, units: Vec<FactoryUnit>) -> Self {
        Self {
            id,
            seq,
            tooling,
            units,
        }
    }

    pub fn want<C: UnitCatalog>(&self, cfg: &EngineConfig, catalog: &C) -> Resources {
        let mode = Mode::resolve(&self.tooling, catalog);
        self.units.iter().map(|u| u.want(cfg, &mode)).sum()
    }

    pub fn begin_turn<C: UnitCatalog>(&mut self, cfg: &EngineConfig, catalog: &C) {
        let mode = Mode::resolve(&self.tooling, catalog);
        for unit in &mut self.units {
            unit.begin_turn(cfg, &mode);
        }
    }

    pub fn allocate<C: UnitCatalog>(
        &mut self,
        cfg: &EngineConfig,
        catalog: &C,
        pool: ResourceConstraints,
    ) -> ResourceConstraints {
        let mode = Mode::resolve(&self.tooling, catalog);
        self.units
            .iter_mut()
            .fold(pool, |pool, unit| unit.allocate(cfg, &mode, pool))
    }

    pub fn consume(&mut self) {
        for unit in &mut self.units {
            unit.ledger.consume();
        }
    }

    /// Advance the pipelines of units that operated; returns items finished.
    pub fn advance_pipelines<C: UnitCatalog>(&mut self, catalog: &C) -> f64 {
        let mode = Mode::resolve(&self.tooling, catalog);
        self.units.iter_mut().map(|u| u.advance(&mode)).sum()
    }

    /// Start new work; returns items placed into the newest stage.
    pub fn produce<C: UnitCatalog>(&mut self, cfg: &EngineConfig, catalog: &C) -> f64 {
        let mode = Mode::resolve(&self.tooling, catalog);
        self.units.iter_mut().map(|u| u.produce(cfg, &mode)).sum()
    }

    pub fn wip(&self) -> f64 {
        self.units.iter().map(|u| u.pipeline.total()).sum()
    }

    pub fn is_drained(&self) -> bool {
        self.units.iter().all(|u| u.pipeline.is_drained())
    }

    pub fn cache(&self) -> MaterialCache {
        self.units.iter().fold(MaterialCache::default(), |acc, u| MaterialCache {
            metals: acc.metals + u.cache.metals,
            non_metals: acc.non_metals + u.cache.non_metals,
        })
    }

    /// Apply an order to build `target`, checking the catalog knows it.
    pub fn order_tooling<C: UnitCatalog>(&mut self, target: Tooling, catalog: &C) -> Result<(), ToolingError> {
        ensure_known(target, catalog)?;
        self.tooling.order(target);
        Ok(())
    }

    /// Tool an idle group. A group that already has tooling is retooled.
    pub fn assign_tooling<C: UnitCatalog>(&mut self, target: Tooling, catalog: &C) -> Result<(), ToolingError> {
        if self.tooling.current().is_some() {
            return self.order_retool(target, catalog);
        }
        ensure_known(target, catalog)?;
        self.tooling = ToolingState::Producing(target);
        Ok(())
    }

    /// Start switching a tooled group to `target`.
    pub fn order_retool<C: UnitCatalog>(&mut self, target: Tooling, catalog: &C) -> Result<(), ToolingError> {
        if self.tooling.current().is_none() {
            return Err(ToolingError::NotTooled);
        }
        ensure_known(target, catalog)?;
        self.tooling.order(target);
        Ok(())
    }

    /// Finish a retool once every pipeline has drained.
    pub fn complete_retool(&mut self) -> Result<Tooling, ToolingError> {
        if !self.tooling.is_retooling() {
            return Err(ToolingError::NotRetooling);
        }
        if !self.is_drained() {
            return Err(ToolingError::PipelineNotDrained { wip: self.wip() });
        }
        let tooling = self.tooling.finish_retool()?;
        tracing::debug!(
            target: "colony::factory",
            group = self.id.0,
            kind = %tooling.kind,
            tech_level = tooling.tech_level,
            "factory.retool.completed"
        );
        Ok(tooling)
    }

    pub fn summary(&self) -> GroupSummary {
        let mut summary = GroupSummary::from_ledgers(
            self.id,
            self.seq,
            GroupKind::Factory,
            self.units.iter().map(|u| (u.nbr_of_units, &u.ledger)),
        );
        for unit in &self.units {
            if let Some(done) = unit.completed {
                merge_production(&mut summary.completed, done);
            }
            summary.released.metals += unit.released.metals;
            summary.released.non_metals += unit.released.non_metals;
        }
        summary
    }
}

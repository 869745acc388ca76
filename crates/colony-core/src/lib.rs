//! Colony Core -- production and resource allocation for colonies and ships.
//!
//! Each entity owns ordered groups of farms, mines and factories. A turn
//! walks those groups in a fixed order against one shared pool of fuel,
//! labor and materials, so groups earlier in the order are served first.
//!
//! # Turn Pipeline
//!
//! [`turn::TurnEngine::process_entity`] runs, per group:
//!
//! 1. **Want** -- Record what every unit would consume unconstrained.
//! 2. **Allocate** -- Clamp the operating unit count against the pool and
//!    draw fuel, labor and materials for those units only.
//! 3. **Consume** -- Commit the allocation.
//! 4. **Produce** -- Farms grow food, mines refine ore from their deposit,
//!    factories advance a three-stage pipeline and start new work.
//!
//! Groups run farms first, then mines, then factories, each kind by
//! ascending sequence number.
//!
//! # Key Types
//!
//! - [`resources::ResourceConstraints`] -- The pool a turn allocates from.
//! - [`allocation::clamp_units`] -- Largest unit count every limit admits.
//! - [`factory::FactoryGroup`] -- Tooling, cache and pipeline per unit.
//! - [`tooling::ToolingState`] -- Idle / producing / retooling.
//! - [`catalog::UnitCatalog`] -- Material requirements per product.
//! - [`world::World`] -- Every entity; runs turns, optionally in parallel.
//! - [`serialize`] -- Versioned world snapshots via bitcode.

pub mod allocation;
pub mod catalog;
pub mod config;
pub mod entity;
pub mod factory;
pub mod farm;
pub mod id;
pub mod ledger;
pub mod mine;
pub mod pipeline;
pub mod report;
pub mod resources;
pub mod serialize;
pub mod tooling;
pub mod turn;
pub mod validation;
pub mod world;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

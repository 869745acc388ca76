//! Per-turn bookkeeping shared by every production unit kind.

use serde::{Deserialize, Serialize};

use crate::catalog::{ResourceKind, UnitKind};
use crate::id::TechLevel;
use crate::resources::Resources;

/// Something a production unit emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Product {
    Resource(ResourceKind),
    Unit { kind: UnitKind, tech_level: TechLevel },
}

/// A quantity of one product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Production {
    pub product: Product,
    pub quantity: f64,
}

impl Production {
    pub fn new(product: Product, quantity: f64) -> Self {
        Self { product, quantity }
    }
}

/// Transient records of one unit's turn. Cleared by [`TurnLedger::reset`]
/// at the start of every turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnLedger {
    pub wanted: Resources,
    pub allocated: Resources,
    pub consumed: Resources,
    pub produced: Option<Production>,
}

impl TurnLedger {
    /// Start a new turn with the given want.
    pub fn reset(&mut self, wanted: Resources) {
        *self = TurnLedger {
            wanted,
            ..TurnLedger::default()
        };
    }

    /// Everything allocated is consumed.
    pub fn consume(&mut self) {
        self.consumed = self.allocated;
    }

    /// Units that actually operate this turn.
    pub fn operating_units(&self) -> u64 {
        self.allocated.nbr_of_units
    }
}

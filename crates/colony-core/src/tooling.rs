//! What a factory group is set up to build, and changing it.

use serde::{Deserialize, Serialize};

use crate::catalog::UnitKind;
use crate::id::TechLevel;

/// A product and the tech level it is built at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tooling {
    pub kind: UnitKind,
    pub tech_level: TechLevel,
}

impl Tooling {
    pub fn new(kind: UnitKind, tech_level: TechLevel) -> Self {
        Self { kind, tech_level }
    }
}

/// Tooling state of a factory group.
///
/// A group mid-retool keeps working off its old product's pipeline and only
/// switches once that pipeline is empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolingState {
    /// No tooling; the group cannot operate.
    #[default]
    Idle,
    Producing(Tooling),
    Retooling { current: Tooling, target: Tooling },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ToolingError {
    #[error("factory group has no tooling")]
    NotTooled,
    #[error("factory group is not retooling")]
    NotRetooling,
    #[error("retool blocked: {wip} items still in the pipeline")]
    PipelineNotDrained { wip: f64 },
    #[error("no catalog entry for {kind} at tech level {tech_level}")]
    UnknownProduct { kind: UnitKind, tech_level: TechLevel },
}

impl ToolingState {
    /// What the group's pipeline is currently building.
    pub fn current(&self) -> Option<Tooling> {
        match *self {
            ToolingState::Idle => None,
            ToolingState::Producing(t) => Some(t),
            ToolingState::Retooling { current, .. } => Some(current),
        }
    }

    pub fn target(&self) -> Option<Tooling> {
        match *self {
            ToolingState::Retooling { target, .. } => Some(target),
            _ => None,
        }
    }

    pub fn is_producing(&self) -> bool {
        matches!(self, ToolingState::Producing(_))
    }

    pub fn is_retooling(&self) -> bool {
        matches!(self, ToolingState::Retooling { .. })
    }

    /// Apply an order to build `target`.
    ///
    /// An idle group is tooled at once. A producing group starts retooling
    /// unless `target` is what it already builds. A group already retooling
    /// gets its target replaced, or goes back to producing if the order names
    /// its current product.
    pub fn order(&mut self, target: Tooling) {
        *self = match *self {
            ToolingState::Idle => ToolingState::Producing(target),
            ToolingState::Producing(current) | ToolingState::Retooling { current, .. } => {
                if current == target {
                    ToolingState::Producing(current)
                } else {
                    ToolingState::Retooling { current, target }
                }
            }
        };
    }

    /// Switch a retooling group over to its target.
    pub fn finish_retool(&mut self) -> Result<Tooling, ToolingError> {
        match *self {
            ToolingState::Retooling { target, .. } => {
                *self = ToolingState::Producing(target);
                Ok(target)
            }
            _ => Err(ToolingError::NotRetooling),
        }
    }

    /// Remove all tooling.
    pub fn clear(&mut self) {
        *self = ToolingState::Idle;
    }
}

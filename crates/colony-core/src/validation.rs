//! Post-turn checks on a [`TurnReport`].
//!
//! The engine upholds these by construction; the checks exist so callers
//! and tests can confirm it after the fact.

use crate::entity::Entity;
use crate::id::GroupId;
use crate::report::{GroupSummary, TurnReport};
use crate::resources::Resources;

/// Slack allowed when comparing floating-point totals.
const EPSILON: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Violation types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvariantViolation {
    /// A group was granted more of `field` than it asked for.
    #[error("group {group:?} allocated {allocated} {field}, wanted {wanted}")]
    AllocatedExceedsWanted {
        group: GroupId,
        field: &'static str,
        wanted: f64,
        allocated: f64,
    },
    /// Consumption differs from the allocation.
    #[error("group {group:?} consumed a different amount of {field} than allocated")]
    ConsumedMismatch { group: GroupId, field: &'static str },
    /// More units operated than the group physically has.
    #[error("group {group:?} operated {operating} units but has {physical}")]
    OperatingExceedsPhysical {
        group: GroupId,
        operating: u64,
        physical: u64,
    },
    /// The report names a group the entity does not have.
    #[error("report names unknown group {0:?}")]
    UnknownGroup(GroupId),
    /// A pool field ended the turn below zero or non-finite.
    #[error("pool {field} ended the turn at {value}")]
    NegativePool { field: &'static str, value: f64 },
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

fn fields(r: &Resources) -> [(&'static str, f64); 8] {
    [
        ("nbr_of_units", r.nbr_of_units as f64),
        ("fuel", r.fuel),
        ("pro", r.pro),
        ("usk", r.usk),
        ("aut", r.aut),
        ("ore", r.ore),
        ("metals", r.metals),
        ("non_metals", r.non_metals),
    ]
}

fn check_group(summary: &GroupSummary, out: &mut Vec<InvariantViolation>) {
    let wanted = fields(&summary.wanted);
    let allocated = fields(&summary.allocated);
    let consumed = fields(&summary.consumed);

    for i in 0..wanted.len() {
        let (field, want) = wanted[i];
        let (_, alloc) = allocated[i];
        if alloc > want + EPSILON {
            out.push(InvariantViolation::AllocatedExceedsWanted {
                group: summary.group,
                field,
                wanted: want,
                allocated: alloc,
            });
        }
        if (consumed[i].1 - alloc).abs() > EPSILON {
            out.push(InvariantViolation::ConsumedMismatch {
                group: summary.group,
                field,
            });
        }
    }

    if summary.operating_units() > summary.physical_units {
        out.push(InvariantViolation::OperatingExceedsPhysical {
            group: summary.group,
            operating: summary.operating_units(),
            physical: summary.physical_units,
        });
    }
}

/// Check every group in `report` against `entity`. An empty result means
/// the turn respected all allocation invariants.
pub fn check_report(report: &TurnReport, entity: &Entity) -> Vec<InvariantViolation> {
    let mut out = Vec::new();

    for summary in &report.groups {
        let known = entity.farms.iter().any(|g| g.id == summary.group)
            || entity.mines.iter().any(|g| g.id == summary.group)
            || entity.factories.iter().any(|g| g.id == summary.group);
        if !known {
            out.push(InvariantViolation::UnknownGroup(summary.group));
        }
        check_group(summary, &mut out);
    }

    let pool = report.remaining.as_resources();
    for (field, value) in fields(&pool) {
        if value.is_nan() || value < 0.0 {
            out.push(InvariantViolation::NegativePool { field, value });
        }
    }
    out
}

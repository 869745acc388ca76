//! Turn results handed back to callers (persistence, reports, next turn).

use serde::{Deserialize, Serialize};

use crate::id::{EntityId, GroupId, SequenceNo};
use crate::ledger::{Product, Production, TurnLedger};
use crate::resources::{ResourceConstraints, Resources};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupKind {
    Farm,
    Mine,
    Factory,
}

/// Aggregated results of one production group for one turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub group: GroupId,
    pub seq: SequenceNo,
    pub kind: GroupKind,
    /// Physical units across every unit record in the group.
    pub physical_units: u64,
    pub wanted: Resources,
    pub allocated: Resources,
    pub consumed: Resources,
    /// New output: food, refined resources, or items entering the pipeline.
    pub produced: Vec<Production>,
    /// Factory items leaving the last pipeline stage this turn.
    pub completed: Vec<Production>,
    /// Cached metals and non-metals handed back to the pool.
    pub released: Resources,
}

impl GroupSummary {
    /// Fold unit ledgers into a summary. Productions of the same product are
    /// merged, first-seen order kept.
    pub fn from_ledgers<'a>(
        group: GroupId,
        seq: SequenceNo,
        kind: GroupKind,
        units: impl IntoIterator<Item = (u64, &'a TurnLedger)>,
    ) -> Self {
        let mut summary = GroupSummary {
            group,
            seq,
            kind,
            physical_units: 0,
            wanted: Resources::ZERO,
            allocated: Resources::ZERO,
            consumed: Resources::ZERO,
            produced: Vec::new(),
            completed: Vec::new(),
            released: Resources::ZERO,
        };
        for (physical, ledger) in units {
            summary.physical_units += physical;
            summary.wanted += ledger.wanted;
            summary.allocated += ledger.allocated;
            summary.consumed += ledger.consumed;
            if let Some(p) = ledger.produced {
                merge_production(&mut summary.produced, p);
            }
        }
        summary
    }

    pub fn operating_units(&self) -> u64 {
        self.allocated.nbr_of_units
    }
}

pub(crate) fn merge_production(into: &mut Vec<Production>, p: Production) {
    match into.iter_mut().find(|e| e.product == p.product) {
        Some(existing) => existing.quantity += p.quantity,
        None => into.push(p),
    }
}

/// Everything one entity's turn produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnReport {
    pub entity: EntityId,
    /// Groups in processing order.
    pub groups: Vec<GroupSummary>,
    /// What was left of the pool after every group ran.
    pub remaining: ResourceConstraints,
}

impl TurnReport {
    pub fn empty(entity: EntityId, remaining: ResourceConstraints) -> Self {
        Self {
            entity,
            groups: Vec::new(),
            remaining,
        }
    }

    pub fn total_allocated(&self) -> Resources {
        self.groups.iter().map(|g| g.allocated).sum()
    }

    /// Total new output of `product` across all groups.
    pub fn produced(&self, product: Product) -> f64 {
        self.groups
            .iter()
            .flat_map(|g| g.produced.iter())
            .filter(|p| p.product == product)
            .map(|p| p.quantity)
            .sum()
    }

    /// Total finished factory output of `product` across all groups.
    pub fn completed(&self, product: Product) -> f64 {
        self.groups
            .iter()
            .flat_map(|g| g.completed.iter())
            .filter(|p| p.product == product)
            .map(|p| p.quantity)
            .sum()
    }

    pub fn group(&self, id: GroupId) -> Option<&GroupSummary> {
        self.groups.iter().find(|g| g.group == id)
    }
}

//! Every entity in the game, and running a turn across all of them.
//!
//! Entities never share resources, so a turn can process them in any order
//! or in parallel (`parallel` feature). Reports always come back sorted by
//! entity id.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::catalog::UnitCatalog;
use crate::entity::Entity;
use crate::id::{EntityId, EntityKey};
use crate::report::TurnReport;
use crate::resources::ResourceConstraints;
use crate::turn::TurnEngine;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorldError {
    #[error("entity not found: {0:?}")]
    EntityNotFound(EntityId),
    #[error("duplicate entity: {0:?}")]
    DuplicateEntity(EntityId),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    entities: SlotMap<EntityKey, Entity>,
    by_id: BTreeMap<EntityId, EntityKey>,
    /// Turns completed so far.
    turn: u64,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turn(&self) -> u64 {
        self.turn
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn insert(&mut self, entity: Entity) -> Result<EntityKey, WorldError> {
        if self.by_id.contains_key(&entity.id) {
            return Err(WorldError::DuplicateEntity(entity.id));
        }
        let id = entity.id;
        let key = self.entities.insert(entity);
        self.by_id.insert(id, key);
        Ok(key)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.by_id.get(&id).and_then(|k| self.entities.get(*k))
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let key = *self.by_id.get(&id)?;
        self.entities.get_mut(key)
    }

    /// Entities are never removed mid-game, only switched off.
    pub fn deactivate(&mut self, id: EntityId) -> Result<(), WorldError> {
        let entity = self.get_mut(id).ok_or(WorldError::EntityNotFound(id))?;
        entity.active = false;
        Ok(())
    }

    /// Entities in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.by_id.values().filter_map(|k| self.entities.get(*k))
    }

    /// Run one turn for every entity. `budget` supplies each entity's pool.
    pub fn run_turn<C, F>(&mut self, engine: &TurnEngine<C>, budget: F) -> Vec<TurnReport>
    where
        C: UnitCatalog + Sync,
        F: Fn(&Entity) -> ResourceConstraints + Sync,
    {
        let targets: Vec<&mut Entity> = self.entities.values_mut().collect();

        #[cfg(feature = "parallel")]
        let mut reports: Vec<TurnReport> = {
            use rayon::prelude::*;
            targets
                .into_par_iter()
                .map(|entity| {
                    let pool = budget(entity);
                    engine.process_entity(entity, pool)
                })
                .collect()
        };

        #[cfg(not(feature = "parallel"))]
        let mut reports: Vec<TurnReport> = targets
            .into_iter()
            .map(|entity| {
                let pool = budget(entity);
                engine.process_entity(entity, pool)
            })
            .collect();

        reports.sort_by_key(|r| r.entity);
        self.turn += 1;
        tracing::debug!(
            target: "colony::turn",
            turn = self.turn,
            entities = reports.len(),
            "turn.world.finish"
        );
        reports
    }

    /// Run one turn with each entity's own population and inventory budget.
    pub fn run_turn_with_own_budgets<C>(&mut self, engine: &TurnEngine<C>) -> Vec<TurnReport>
    where
        C: UnitCatalog + Sync,
    {
        self.run_turn(engine, Entity::resource_budget)
    }
}

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Storage key for an entity inside a [`World`](crate::world::World).
    pub struct EntityKey;
}

/// Game-assigned identifier of a colony or ship. Stable across turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Identifies a production group. Unique within the whole game, not just
/// within one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupId(pub u32);

/// Identifies a natural-resource deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DepositId(pub u32);

/// Position of a group within its owning entity. Groups are processed in
/// ascending sequence order every turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SequenceNo(pub u16);

/// Technology level of a unit or product. Production units are always >= 1.
pub type TechLevel = u8;

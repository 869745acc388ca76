//! World snapshots.
//!
//! Binary encoding via `bitcode` behind a versioned header, plus a small
//! ring buffer of recent snapshots for undoing turns.

use serde::{Deserialize, Serialize};

use crate::world::World;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic number identifying a colony world snapshot.
pub const SNAPSHOT_MAGIC: u32 = 0xC010_0001;

/// Current format version. Increment when breaking the wire format.
pub const FORMAT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    #[error("bitcode encoding failed: {0}")]
    Encode(String),
}

#[derive(Debug, thiserror::Error)]
pub enum DeserializeError {
    #[error("data too short for snapshot header")]
    TooShort,
    #[error("invalid magic number: expected 0x{:08X}, got 0x{:08X}", SNAPSHOT_MAGIC, .0)]
    InvalidMagic(u32),
    #[error("unsupported format version: expected {}, got {}", FORMAT_VERSION, .0)]
    UnsupportedVersion(u32),
    #[error("snapshot from future version {0} (this build supports up to {FORMAT_VERSION})")]
    FutureVersion(u32),
    #[error("bitcode decoding failed: {0}")]
    Decode(String),
}

// ---------------------------------------------------------------------------
// Snapshot header
// ---------------------------------------------------------------------------

/// Header prepended to every snapshot, checked before the world is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotHeader {
    pub magic: u32,
    pub version: u32,
    /// Turns completed when the snapshot was taken.
    pub turn: u64,
}

impl SnapshotHeader {
    pub fn new(turn: u64) -> Self {
        Self {
            magic: SNAPSHOT_MAGIC,
            version: FORMAT_VERSION,
            turn,
        }
    }

    pub fn validate(&self) -> Result<(), DeserializeError> {
        if self.magic != SNAPSHOT_MAGIC {
            return Err(DeserializeError::InvalidMagic(self.magic));
        }
        if self.version > FORMAT_VERSION {
            return Err(DeserializeError::FutureVersion(self.version));
        }
        if self.version < FORMAT_VERSION {
            return Err(DeserializeError::UnsupportedVersion(self.version));
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct WorldSnapshot {
    header: SnapshotHeader,
    world: World,
}

// ---------------------------------------------------------------------------
// Save / load
// ---------------------------------------------------------------------------

pub fn save_world(world: &World) -> Result<Vec<u8>, SerializeError> {
    #[derive(Serialize)]
    struct Borrowed<'a> {
        header: SnapshotHeader,
        world: &'a World,
    }
    let snapshot = Borrowed {
        header: SnapshotHeader::new(world.turn()),
        world,
    };
    bitcode::serialize(&snapshot).map_err(|e| SerializeError::Encode(e.to_string()))
}

pub fn load_world(data: &[u8]) -> Result<World, DeserializeError> {
    if data.is_empty() {
        return Err(DeserializeError::TooShort);
    }
    let snapshot: WorldSnapshot =
        bitcode::deserialize(data).map_err(|e| DeserializeError::Decode(e.to_string()))?;
    snapshot.header.validate()?;
    Ok(snapshot.world)
}

/// Decode a snapshot and return only its header, without validating it.
///
/// bitcode has no partial decoding, so this decodes the whole payload.
pub fn read_snapshot_header(data: &[u8]) -> Result<SnapshotHeader, DeserializeError> {
    if data.is_empty() {
        return Err(DeserializeError::TooShort);
    }
    let snapshot: WorldSnapshot =
        bitcode::deserialize(data).map_err(|e| DeserializeError::Decode(e.to_string()))?;
    Ok(snapshot.header)
}

// ---------------------------------------------------------------------------
// Snapshot ring buffer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SnapshotEntry {
    pub turn: u64,
    pub data: Vec<u8>,
}

/// Fixed-capacity ring of recent snapshots. When full, the oldest is evicted.
#[derive(Debug)]
pub struct SnapshotRingBuffer {
    entries: Vec<Option<SnapshotEntry>>,
    head: usize,
    len: usize,
}

impl SnapshotRingBuffer {
    /// A capacity of 0 is clamped to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: (0..capacity).map(|_| None).collect(),
            head: 0,
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Snapshot `world` into the ring.
    pub fn record(&mut self, world: &World) -> Result<(), SerializeError> {
        let data = save_world(world)?;
        self.entries[self.head] = Some(SnapshotEntry {
            turn: world.turn(),
            data,
        });
        self.head = (self.head + 1) % self.capacity();
        if self.len < self.capacity() {
            self.len += 1;
        }
        Ok(())
    }

    /// 0 = oldest, len-1 = newest.
    pub fn get(&self, index: usize) -> Option<&SnapshotEntry> {
        if index >= self.len {
            return None;
        }
        let start = if self.len < self.capacity() { 0 } else { self.head };
        self.entries[(start + index) % self.capacity()].as_ref()
    }

    pub fn latest(&self) -> Option<&SnapshotEntry> {
        self.len.checked_sub(1).and_then(|i| self.get(i))
    }

    /// Restore the newest snapshot taken at or before `turn`.
    pub fn restore(&self, turn: u64) -> Option<Result<World, DeserializeError>> {
        (0..self.len)
            .rev()
            .filter_map(|i| self.get(i))
            .find(|e| e.turn <= turn)
            .map(|e| load_world(&e.data))
    }
}

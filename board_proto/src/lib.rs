//! Wire shape of the board snapshots pushed to spectators.
//!
//! The game server serializes its board as `{ "spaces": [[cell, ...], ...] }`
//! where every cell is a flat object tagged by `"type"`. The tag is kept as a
//! plain string here; interpreting it is left to `spectator_core`.

use ahash::RandomState;
use serde::{Deserialize, Serialize};
use std::hash::{BuildHasher, Hash, Hasher};

pub const MOUNTAIN: &str = "Mountain";
pub const EMPTY: &str = "Empty";
pub const NEUTRAL_TOWN: &str = "NeutralTown";
pub const PLAYER_CAPITAL: &str = "PlayerCapital";
pub const PLAYER_TOWN: &str = "PlayerTown";
pub const PLAYER_EMPTY: &str = "PlayerEmpty";

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WireSnapshot {
    pub spaces: Vec<Vec<WireCell>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WireCell {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

impl WireCell {
    pub fn new(kind: impl Into<String>, units: Option<u32>, owner: Option<String>) -> Self {
        Self {
            kind: kind.into(),
            units,
            owner,
        }
    }

    pub fn mountain() -> Self {
        Self::new(MOUNTAIN, None, None)
    }

    pub fn empty() -> Self {
        Self::new(EMPTY, None, None)
    }

    pub fn neutral_town(units: u32) -> Self {
        Self::new(NEUTRAL_TOWN, Some(units), None)
    }

    pub fn player_capital(units: u32, owner: impl Into<String>) -> Self {
        Self::new(PLAYER_CAPITAL, Some(units), Some(owner.into()))
    }

    pub fn player_town(units: u32, owner: impl Into<String>) -> Self {
        Self::new(PLAYER_TOWN, Some(units), Some(owner.into()))
    }

    pub fn player_empty(units: u32, owner: impl Into<String>) -> Self {
        Self::new(PLAYER_EMPTY, Some(units), Some(owner.into()))
    }
}

impl WireSnapshot {
    pub fn new(spaces: Vec<Vec<WireCell>>) -> Self {
        Self { spaces }
    }

    pub fn cell_count(&self) -> usize {
        self.spaces.iter().map(Vec::len).sum()
    }
}

/// Stable digest of a snapshot, identical across processes for equal boards.
pub fn fingerprint(snapshot: &WireSnapshot) -> u64 {
    let mut hasher = RandomState::with_seeds(0, 0, 0, 0).build_hasher();
    snapshot.hash(&mut hasher);
    hasher.finish()
}

pub fn encode_snapshot_json(snapshot: &WireSnapshot) -> serde_json::Result<String> {
    serde_json::to_string(snapshot)
}

pub fn decode_snapshot_json(data: &str) -> serde_json::Result<WireSnapshot> {
    serde_json::from_str(data)
}

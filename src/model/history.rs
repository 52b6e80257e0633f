use serde::{Deserialize, Serialize};

use crate::model::delta::TurnDelta;

/// One resolved turn. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRecord {
    pub input: String,
    pub narrative: String,
    pub delta: TurnDelta,
}

/// Append-only log of everything that happened in a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HistoryEntry {
    Turn(TurnRecord),
    /// Marker written when the player dies and a new life begins.
    Reincarnation {
        karma: i32,
        situation: String,
    },
}

impl HistoryEntry {
    pub fn as_turn(&self) -> Option<&TurnRecord> {
        match self {
            HistoryEntry::Turn(record) => Some(record),
            HistoryEntry::Reincarnation { .. } => None,
        }
    }
}

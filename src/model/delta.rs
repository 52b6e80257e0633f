use serde::{Deserialize, Serialize};

/// Structured change extracted from a narrative response.
/// This is a *proposal*; clamping happens when it is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnDelta {
    pub health: i32,
    pub karma: i32,
    pub items_gained: Vec<String>,
    pub items_lost: Vec<String>,
    /// Optional event the narrator triggered this turn.
    pub event: Option<String>,
}

impl TurnDelta {
    pub fn is_zero(&self) -> bool {
        self.health == 0
            && self.karma == 0
            && self.items_gained.is_empty()
            && self.items_lost.is_empty()
            && self.event.is_none()
    }
}

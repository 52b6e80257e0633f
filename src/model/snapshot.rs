use serde::{Deserialize, Serialize};

use crate::model::game_state::GameState;

/// Read-only view of the game sent to the UI after every turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub name: String,
    pub health: i32,
    pub karma: i32,
    pub inventory: Vec<String>,
    pub situation: String,
    pub turn: u32,
    pub lives: u32,
}

impl From<&GameState> for GameSnapshot {
    fn from(state: &GameState) -> Self {
        Self {
            name: state.player.name.clone(),
            health: state.player.health,
            karma: state.player.karma,
            inventory: state.player.inventory.clone(),
            situation: state.situation.0.clone(),
            turn: state.turn,
            lives: state.lives(),
        }
    }
}

pub mod delta;
pub mod game_state;
pub mod history;
pub mod message;
pub mod player_state;
pub mod situation;
pub mod snapshot;

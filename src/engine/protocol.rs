use crate::engine::image_client::SceneImage;
use crate::model::message::Message;
use crate::model::snapshot::GameSnapshot;

/// UI → engine.
pub enum EngineCommand {
    /// Begin a new game with the chosen character name.
    StartGame { player_name: String },
    /// One line of player input for the current turn.
    SubmitAction(String),
}

/// Engine → UI.
pub enum EngineResponse {
    /// Full chat log; the UI re-renders it wholesale.
    History(Vec<Message>),
    Snapshot(GameSnapshot),
    /// The latest scene illustration, or `None` when generation failed.
    Scene(Option<SceneImage>),
    /// The turn (or game start) finished; input may be re-enabled.
    TurnFinished,
}

use serde::{Deserialize, Serialize};

/// A single line of the on-screen chat log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Message {
    Player(String),
    Gamemaster(String),
    System(String),
}

impl Message {
    /// Color key used by `UiSettings::color`.
    pub fn speaker_key(&self) -> &'static str {
        match self {
            Message::Player(_) => "Player",
            Message::Gamemaster(_) => "Gamemaster",
            Message::System(_) => "System",
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Message::Player(t) | Message::Gamemaster(t) | Message::System(t) => t,
        }
    }
}

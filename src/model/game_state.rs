use crate::model::delta::TurnDelta;
use crate::model::history::{HistoryEntry, TurnRecord};
use crate::model::player_state::{PlayerState, MAX_HEALTH};
use crate::model::situation::Situation;

/// What applying a turn did to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    Alive,
    Died,
}

/// The authoritative record of a running game. Owned by the engine;
/// the UI only ever sees snapshots of it.
#[derive(Debug, Clone)]
pub struct GameState {
    pub player: PlayerState,
    pub situation: Situation,
    /// Turns resolved in the current life.
    pub turn: u32,
    pub history: Vec<HistoryEntry>,
    /// Rolling prose summary of the run, maintained by the narrator.
    pub turn_summary: String,
}

impl GameState {
    pub fn new(name: impl Into<String>, situation: Situation) -> Self {
        Self {
            player: PlayerState::new(name),
            situation,
            turn: 0,
            history: Vec::new(),
            turn_summary: String::new(),
        }
    }

    /// Apply one resolved turn: clamp and record. Reincarnation itself is a
    /// separate step so the caller can narrate the death first.
    pub fn apply_turn(&mut self, input: String, narrative: String, delta: TurnDelta) -> TurnOutcome {
        self.player.apply(&delta);
        self.history.push(HistoryEntry::Turn(TurnRecord {
            input,
            narrative,
            delta,
        }));
        self.turn += 1;

        if self.player.is_dead() {
            TurnOutcome::Died
        } else {
            TurnOutcome::Alive
        }
    }

    /// Begin a new life: health resets, inventory clears, a fresh situation
    /// takes over. Karma follows the player across lives.
    pub fn reincarnate(&mut self, situation: Situation) {
        self.history.push(HistoryEntry::Reincarnation {
            karma: self.player.karma,
            situation: situation.0.clone(),
        });

        self.player.health = MAX_HEALTH;
        self.player.inventory.clear();
        self.situation = situation;
        self.turn = 0;
        self.turn_summary.clear();
    }

    /// Lives lived so far, counting the current one.
    pub fn lives(&self) -> u32 {
        let rebirths = self
            .history
            .iter()
            .filter(|e| matches!(e, HistoryEntry::Reincarnation { .. }))
            .count() as u32;
        rebirths + 1
    }

    /// The last `limit` resolved turns, oldest first. Bounds the context
    /// sent to the narrator; the full history itself is never truncated.
    pub fn recent_turns(&self, limit: usize) -> Vec<&TurnRecord> {
        let mut turns: Vec<&TurnRecord> = self
            .history
            .iter()
            .rev()
            .filter_map(HistoryEntry::as_turn)
            .take(limit)
            .collect();
        turns.reverse();
        turns
    }

    pub fn last_narrative(&self) -> Option<&str> {
        self.history
            .iter()
            .rev()
            .filter_map(HistoryEntry::as_turn)
            .map(|t| t.narrative.as_str())
            .next()
    }

    pub fn last_input(&self) -> Option<&str> {
        self.history
            .iter()
            .rev()
            .filter_map(HistoryEntry::as_turn)
            .map(|t| t.input.as_str())
            .next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn damage(amount: i32) -> TurnDelta {
        TurnDelta {
            health: -amount,
            ..TurnDelta::default()
        }
    }

    fn new_game() -> GameState {
        GameState::new("Asha", Situation("a desert".into()))
    }

    #[test]
    fn history_grows_by_one_per_turn() {
        let mut game = new_game();
        for n in 1..=5 {
            let outcome = game.apply_turn(format!("act {n}"), "…".into(), TurnDelta::default());
            assert_eq!(outcome, TurnOutcome::Alive);
            assert_eq!(game.history.len(), n);
        }
        assert_eq!(game.turn, 5);
    }

    #[test]
    fn earlier_entries_are_never_altered() {
        let mut game = new_game();
        game.apply_turn("look".into(), "dunes".into(), TurnDelta::default());
        game.apply_turn("walk".into(), "more dunes".into(), damage(10));

        let first = game.history[0].as_turn().unwrap();
        assert_eq!(first.input, "look");
        assert_eq!(first.narrative, "dunes");
        assert!(first.delta.is_zero());
    }

    #[test]
    fn reincarnation_resets_everything_but_karma() {
        let mut game = new_game();
        game.apply_turn(
            "steal".into(),
            "…".into(),
            TurnDelta {
                karma: -30,
                items_gained: vec!["stolen idol".into()],
                ..TurnDelta::default()
            },
        );

        let mut outcome = TurnOutcome::Alive;
        for _ in 0..3 {
            outcome = game.apply_turn("fight".into(), "…".into(), damage(40));
        }
        assert_eq!(outcome, TurnOutcome::Died);
        assert_eq!(game.player.health, 0);

        let turns_before = game.history.len();
        game.reincarnate(Situation("an island".into()));

        assert_eq!(game.player.health, 100);
        assert!(game.player.inventory.is_empty());
        assert_eq!(game.player.karma, -30);
        assert_eq!(game.situation, Situation("an island".into()));
        assert_eq!(game.turn, 0);
        // The marker is appended, nothing is removed.
        assert_eq!(game.history.len(), turns_before + 1);
        assert!(matches!(
            game.history.last(),
            Some(HistoryEntry::Reincarnation { karma: -30, .. })
        ));
        assert_eq!(game.lives(), 2);
    }

    #[test]
    fn three_hits_of_forty_trigger_death() {
        let mut game = new_game();
        assert_eq!(game.player.health, 100);

        game.apply_turn("a".into(), "…".into(), damage(40));
        assert_eq!(game.player.health, 60);
        game.apply_turn("b".into(), "…".into(), damage(40));
        assert_eq!(game.player.health, 20);
        let outcome = game.apply_turn("c".into(), "…".into(), damage(40));
        assert_eq!(game.player.health, 0);
        assert_eq!(outcome, TurnOutcome::Died);
        assert_eq!(game.player.karma, 0);
    }

    #[test]
    fn recent_turns_is_bounded_and_ordered() {
        let mut game = new_game();
        for n in 0..12 {
            game.apply_turn(format!("act {n}"), format!("reply {n}"), TurnDelta::default());
        }

        let recent = game.recent_turns(8);
        assert_eq!(recent.len(), 8);
        assert_eq!(recent[0].input, "act 4");
        assert_eq!(recent[7].input, "act 11");
    }

    #[test]
    fn recent_turns_skips_reincarnation_markers() {
        let mut game = new_game();
        game.apply_turn("a".into(), "…".into(), TurnDelta::default());
        game.reincarnate(Situation("an island".into()));
        game.apply_turn("b".into(), "…".into(), TurnDelta::default());

        let recent = game.recent_turns(10);
        assert_eq!(recent.len(), 2);
        assert_eq!(game.last_input(), Some("b"));
    }
}

use serde::{Deserialize, Serialize};

use crate::model::delta::TurnDelta;

pub const MAX_HEALTH: i32 = 100;
pub const MIN_HEALTH: i32 = 0;
pub const MAX_KARMA: i32 = 100;
pub const MIN_KARMA: i32 = -100;

/// The player's vital statistics. Mutated only through `apply`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub name: String,
    pub health: i32,
    pub karma: i32,
    /// Ordered item names, duplicates allowed.
    pub inventory: Vec<String>,
}

impl PlayerState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            health: MAX_HEALTH,
            karma: 0,
            inventory: Vec::new(),
        }
    }

    /// Apply a delta, clamping health and karma to their ranges. The adds
    /// saturate: the delta values come straight from parsed model output and
    /// may be arbitrarily large. Each entry in `items_lost` removes at most
    /// one matching instance.
    pub fn apply(&mut self, delta: &TurnDelta) {
        self.health = self
            .health
            .saturating_add(delta.health)
            .clamp(MIN_HEALTH, MAX_HEALTH);
        self.karma = self
            .karma
            .saturating_add(delta.karma)
            .clamp(MIN_KARMA, MAX_KARMA);

        for item in &delta.items_gained {
            self.inventory.push(item.clone());
        }

        for item in &delta.items_lost {
            if let Some(pos) = self
                .inventory
                .iter()
                .position(|held| held.eq_ignore_ascii_case(item))
            {
                self.inventory.remove(pos);
            }
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= MIN_HEALTH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delta(health: i32, karma: i32) -> TurnDelta {
        TurnDelta {
            health,
            karma,
            ..TurnDelta::default()
        }
    }

    #[test]
    fn health_and_karma_stay_in_range() {
        let mut p = PlayerState::new("Asha");
        p.apply(&delta(1000, 1000));
        assert_eq!(p.health, 100);
        assert_eq!(p.karma, 100);

        p.apply(&delta(-1000, -1000));
        assert_eq!(p.health, 0);
        assert_eq!(p.karma, -100);
    }

    #[test]
    fn extreme_deltas_saturate_instead_of_overflowing() {
        let mut p = PlayerState::new("Asha");
        p.apply(&delta(i32::MAX, i32::MAX));
        assert_eq!(p.health, 100);
        assert_eq!(p.karma, 100);

        p.apply(&delta(i32::MIN, i32::MIN));
        assert_eq!(p.health, 0);
        assert_eq!(p.karma, -100);
    }

    #[test]
    fn three_heavy_hits_reach_zero() {
        let mut p = PlayerState::new("Asha");
        for expected in [60, 20, 0] {
            p.apply(&delta(-40, 0));
            assert_eq!(p.health, expected);
        }
        assert!(p.is_dead());
        assert_eq!(p.karma, 0);
    }

    #[test]
    fn losing_an_item_removes_one_instance() {
        let mut p = PlayerState::new("Asha");
        p.apply(&TurnDelta {
            items_gained: vec!["rusty key".into(), "rusty key".into()],
            ..TurnDelta::default()
        });
        assert_eq!(p.inventory, vec!["rusty key", "rusty key"]);

        p.apply(&TurnDelta {
            items_lost: vec!["rusty key".into()],
            ..TurnDelta::default()
        });
        assert_eq!(p.inventory, vec!["rusty key"]);

        p.apply(&TurnDelta {
            items_lost: vec!["rusty key".into()],
            ..TurnDelta::default()
        });
        assert!(p.inventory.is_empty());
    }

    #[test]
    fn losing_an_item_not_held_is_a_no_op() {
        let mut p = PlayerState::new("Asha");
        p.apply(&TurnDelta {
            items_lost: vec!["torch".into()],
            ..TurnDelta::default()
        });
        assert!(p.inventory.is_empty());
    }
}

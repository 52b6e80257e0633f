use rand::Rng;

/// A sudden event injected into a turn. Lethal events instruct the narrator
/// to end the turn with the player's death.
#[derive(Debug, Clone)]
pub struct TurbulenceEvent {
    pub description: String,
    pub lethal: bool,
}

/// Whether this turn gets interrupted. Quiet on the opening turn, then the
/// odds rise as a life drags on.
pub fn should_trigger(turn: u32, rng: &mut impl Rng) -> bool {
    if turn < 1 {
        return false;
    }

    let chance = if turn <= 5 {
        0.10
    } else if turn <= 10 {
        0.20
    } else {
        0.30
    };

    rng.gen::<f64>() < chance
}

/// Lethality odds derived from karma: 80% at karma -100 down to 5% at +100.
/// Karma follows you, and it keeps you alive.
pub fn lethal_chance(karma: i32) -> f64 {
    let karma_factor = f64::from(karma + 100) / 200.0;
    0.80 - karma_factor * 0.75
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn never_triggers_on_the_opening_turn() {
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..100 {
            assert!(!should_trigger(0, &mut rng));
        }
    }

    #[test]
    fn trigger_rate_roughly_matches_the_schedule() {
        let mut rng = StdRng::seed_from_u64(42);
        let hits = (0..10_000).filter(|_| should_trigger(3, &mut rng)).count();
        // 10% nominal; allow generous slack for the sample size.
        assert!((700..1300).contains(&hits), "hits = {hits}");

        let hits = (0..10_000).filter(|_| should_trigger(20, &mut rng)).count();
        assert!((2600..3400).contains(&hits), "hits = {hits}");
    }

    #[test]
    fn lethal_chance_tracks_karma() {
        assert!((lethal_chance(-100) - 0.80).abs() < 1e-9);
        assert!((lethal_chance(0) - 0.425).abs() < 1e-9);
        assert!((lethal_chance(100) - 0.05).abs() < 1e-9);
    }

    #[test]
    fn lethal_chance_is_monotonic_in_karma() {
        let mut prev = f64::INFINITY;
        for karma in (-100..=100).step_by(10) {
            let chance = lethal_chance(karma);
            assert!(chance < prev);
            assert!((0.0..=1.0).contains(&chance));
            prev = chance;
        }
    }
}

use std::fs;
use std::path::Path;

use anyhow::{bail, Result};
use rand::seq::SliceRandom;
use rand::Rng;

/// A free-text scenario seed, immutable once drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Situation(pub String);

/// Scenario seeds loaded once at startup, drawn uniformly at random
/// on game start and after each reincarnation.
#[derive(Debug, Clone)]
pub struct SituationPool {
    situations: Vec<String>,
}

/// Used when `situations.txt` is missing so the game can still start.
const BUILTIN_SITUATIONS: &[&str] = &[
    "a fishing village on the edge of a storm-wracked sea",
    "a caravan crossing a desert littered with half-buried statues",
    "a mountain monastery whose bells have gone silent",
    "a port city during a lantern festival",
    "a forest where the trees whisper the names of the dead",
    "a mining town dug too deep beneath the ice",
    "a floating market strung between two cliff faces",
    "a walled garden at the center of a ruined palace",
];

impl SituationPool {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_lines(&contents)
    }

    pub fn from_lines(contents: &str) -> Result<Self> {
        let situations: Vec<String> = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        if situations.is_empty() {
            bail!("situation file contains no scenarios");
        }

        Ok(Self { situations })
    }

    pub fn builtin() -> Self {
        Self {
            situations: BUILTIN_SITUATIONS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.situations.len()
    }

    pub fn draw(&self, rng: &mut impl Rng) -> Situation {
        // Pool is never empty by construction.
        let seed = self
            .situations
            .choose(rng)
            .cloned()
            .unwrap_or_default();
        Situation(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn blank_lines_are_skipped() {
        let pool = SituationPool::from_lines("a desert\n\n  \nan island\n").unwrap();
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn empty_file_is_an_error() {
        assert!(SituationPool::from_lines("\n  \n").is_err());
    }

    #[test]
    fn draw_returns_a_member_of_the_pool() {
        let pool = SituationPool::from_lines("a desert\nan island\na swamp").unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let Situation(seed) = pool.draw(&mut rng);
            assert!(["a desert", "an island", "a swamp"].contains(&seed.as_str()));
        }
    }

    #[test]
    fn builtin_pool_is_usable() {
        let pool = SituationPool::builtin();
        assert!(pool.len() > 0);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(!pool.draw(&mut rng).0.is_empty());
    }
}

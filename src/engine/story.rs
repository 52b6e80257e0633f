use rand::seq::SliceRandom;
use rand::Rng;

/// Kind of narrative element woven into each turn to keep the story moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Choice,
    Character,
    Action,
}

impl ElementKind {
    pub fn pick(rng: &mut impl Rng) -> Self {
        *[Self::Choice, Self::Character, Self::Action]
            .choose(rng)
            .unwrap_or(&Self::Action)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Choice => "CHOICE",
            Self::Character => "CHARACTER",
            Self::Action => "ACTION",
        }
    }

    /// Format instructions handed to the model for this element kind.
    pub fn instructions(self) -> &'static str {
        match self {
            Self::Choice => {
                "Create a dilemma or choice the player must face. \
                 Format: 'You must decide: [brief compelling choice]'"
            }
            Self::Character => {
                "Introduce a new character with a line of dialogue. \
                 Format: '[Character description]: \"[intriguing dialogue]\"'"
            }
            Self::Action => {
                "Create a sudden action that demands player response. \
                 Format: 'Suddenly, [unexpected event or action]'"
            }
        }
    }
}

/// A generated element ready to be woven into the turn prompt.
#[derive(Debug, Clone)]
pub struct NarrativeElement {
    pub kind: ElementKind,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn pick_covers_all_kinds() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = [false; 3];
        for _ in 0..100 {
            match ElementKind::pick(&mut rng) {
                ElementKind::Choice => seen[0] = true,
                ElementKind::Character => seen[1] = true,
                ElementKind::Action => seen[2] = true,
            }
        }
        assert_eq!(seen, [true, true, true]);
    }
}

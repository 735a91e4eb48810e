//! Difficulty levels and their generation profiles.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use derive_more::{Display as DeriveDisplay, Error};
use ninefold_solver::technique::Tier;

/// A puzzle difficulty level.
///
/// Each level maps to a [`DifficultyProfile`] constraining generation (how
/// many givens, which technique tiers must suffice) and to the session
/// limits for hints and mistakes.
///
/// The string identifiers (`"beginner"`, `"easy"`, …) are the stable
/// interface used by menus and persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Difficulty {
    /// Generous givens, singles only.
    Beginner,
    /// Singles only, fewer givens.
    Easy,
    /// Adds pairs and box/line interactions.
    Medium,
    /// Adds two-line fish patterns.
    Hard,
    /// Anything goes, including backtracking-hard puzzles.
    Expert,
}

/// Generation parameters for one difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyProfile {
    /// The number of givens carving aims for.
    pub target_givens: usize,
    /// Hard floor: carving never removes below this many givens.
    pub min_givens: usize,
    /// Highest technique tier the puzzle may require, or `None` for no
    /// restriction.
    pub max_tier: Option<Tier>,
    /// How many seeded attempts to spend before settling for the best.
    pub max_attempts: u32,
}

impl Difficulty {
    /// All difficulty levels, easiest first.
    pub const ALL: [Self; 5] = [
        Self::Beginner,
        Self::Easy,
        Self::Medium,
        Self::Hard,
        Self::Expert,
    ];

    /// Returns the stable string identifier of this level.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Expert => "expert",
        }
    }

    /// Returns the generation profile for this level.
    #[must_use]
    pub const fn profile(self) -> DifficultyProfile {
        match self {
            Self::Beginner => DifficultyProfile {
                target_givens: 48,
                min_givens: 44,
                max_tier: Some(Tier::Basic),
                max_attempts: 20,
            },
            Self::Easy => DifficultyProfile {
                target_givens: 44,
                min_givens: 38,
                max_tier: Some(Tier::Basic),
                max_attempts: 20,
            },
            Self::Medium => DifficultyProfile {
                target_givens: 36,
                min_givens: 32,
                max_tier: Some(Tier::Intermediate),
                max_attempts: 40,
            },
            Self::Hard => DifficultyProfile {
                target_givens: 30,
                min_givens: 26,
                max_tier: Some(Tier::Advanced),
                max_attempts: 60,
            },
            Self::Expert => DifficultyProfile {
                target_givens: 26,
                min_givens: 22,
                max_tier: None,
                max_attempts: 80,
            },
        }
    }

    /// Returns the hint budget for sessions at this level.
    #[must_use]
    pub const fn max_hints(self) -> u32 {
        match self {
            Self::Beginner => 5,
            Self::Easy => 4,
            Self::Medium | Self::Hard => 3,
            Self::Expert => 2,
        }
    }

    /// Returns the mistake budget for sessions at this level.
    #[must_use]
    pub const fn max_mistakes(self) -> u32 {
        match self {
            Self::Beginner => 5,
            Self::Easy => 4,
            Self::Medium | Self::Hard | Self::Expert => 3,
        }
    }
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Error parsing a [`Difficulty`] from its string identifier.
#[derive(Debug, Clone, PartialEq, Eq, DeriveDisplay, Error)]
#[display("unknown difficulty: {_0:?}")]
pub struct ParseDifficultyError(#[error(not(source))] pub String);

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, ParseDifficultyError> {
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.id() == s)
            .ok_or_else(|| ParseDifficultyError(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_round_trip() {
        for difficulty in Difficulty::ALL {
            assert_eq!(difficulty.id().parse::<Difficulty>(), Ok(difficulty));
            assert_eq!(difficulty.to_string(), difficulty.id());
        }
        assert!("impossible".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_profiles_are_internally_consistent() {
        for difficulty in Difficulty::ALL {
            let profile = difficulty.profile();
            assert!(profile.min_givens <= profile.target_givens);
            assert!(profile.target_givens <= 81);
            assert!(profile.max_attempts > 0);
        }
    }

    #[test]
    fn test_harder_levels_have_fewer_givens() {
        for pair in Difficulty::ALL.windows(2) {
            assert!(pair[0].profile().target_givens >= pair[1].profile().target_givens);
        }
    }

    #[test]
    fn test_tier_allowance_grows_with_difficulty() {
        assert_eq!(Difficulty::Beginner.profile().max_tier, Some(Tier::Basic));
        assert_eq!(
            Difficulty::Medium.profile().max_tier,
            Some(Tier::Intermediate)
        );
        assert_eq!(Difficulty::Hard.profile().max_tier, Some(Tier::Advanced));
        assert_eq!(Difficulty::Expert.profile().max_tier, None);
    }
}

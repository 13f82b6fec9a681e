//! Teams and scoring
//!
//! A game is always played by four teams. Scores are signed since a wrong
//! answer deducts the tile's award and teams routinely drop below zero.

use std::fmt::Display;

use enum_map::{Enum, EnumMap};
use serde::{Deserialize, Serialize};

/// One of the four competing teams
///
/// Teams are selected by the host with the digit keys `1` to `4`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Enum, Serialize, Deserialize,
)]
pub enum Team {
    /// First team, digit `1`
    One,
    /// Second team, digit `2`
    Two,
    /// Third team, digit `3`
    Three,
    /// Fourth team, digit `4`
    Four,
}

impl Team {
    /// Every team in seating order
    pub const ALL: [Team; 4] = [Team::One, Team::Two, Team::Three, Team::Four];

    /// Maps a keyboard digit to its team
    ///
    /// # Returns
    ///
    /// The team for `'1'..='4'`, otherwise `None`
    pub fn from_digit(digit: char) -> Option<Self> {
        match digit {
            '1' => Some(Self::One),
            '2' => Some(Self::Two),
            '3' => Some(Self::Three),
            '4' => Some(Self::Four),
            _ => None,
        }
    }

    /// The 1-based number shown to the audience
    pub fn number(self) -> usize {
        self.into_usize() + 1
    }
}

impl Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Team {}", self.number())
    }
}

/// Running totals for all four teams
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    scores: EnumMap<Team, i64>,
}

impl Scoreboard {
    /// Current score of a team
    pub fn score(&self, team: Team) -> i64 {
        self.scores[team]
    }

    /// Adds points to a team and returns its new score
    pub fn award(&mut self, team: Team, points: i64) -> i64 {
        self.scores[team] += points;
        self.scores[team]
    }

    /// Deducts points from a team and returns its new score
    ///
    /// The result may be negative.
    pub fn deduct(&mut self, team: Team, points: i64) -> i64 {
        self.scores[team] -= points;
        self.scores[team]
    }

    /// Puts every team back to zero
    pub fn reset(&mut self) {
        self.scores = EnumMap::default();
    }

    /// All scores keyed by team
    pub fn scores(&self) -> &EnumMap<Team, i64> {
        &self.scores
    }
}

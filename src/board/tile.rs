//! Tile identity and the per-tile state machine
//!
//! A tile moves through `Hidden → Revealed → AnswerShown → Completed` and
//! never goes back on its own. Only host resets rewind it.

use std::{fmt::Display, num::ParseIntError, str::FromStr};

use enum_map::EnumMap;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use thiserror::Error;

use crate::scores::Team;

/// Identifies a tile by its category column and face value
///
/// Keys are written as `"<category>-<value>"`, e.g. `"2-300"`, which is
/// also the format used for the clue table of a board configuration.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, SerializeDisplay, DeserializeFromStr,
)]
pub struct TileKey {
    category: usize,
    value: u32,
}

impl TileKey {
    /// Creates a key for the tile in `category` worth `value` points
    pub fn new(category: usize, value: u32) -> Self {
        Self { category, value }
    }

    /// Index of the category column
    pub fn category(&self) -> usize {
        self.category
    }

    /// Face value of the tile
    pub fn value(&self) -> u32 {
        self.value
    }
}

impl Display for TileKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.category, self.value)
    }
}

/// Errors produced when parsing a [`TileKey`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseTileKeyError {
    /// The text has no `-` separator
    #[error("tile key must look like `<category>-<value>`")]
    Format,
    /// One of the two halves is not a number
    #[error("tile key contains an invalid number: {0}")]
    Number(#[from] ParseIntError),
}

impl FromStr for TileKey {
    type Err = ParseTileKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (category, value) = s.split_once('-').ok_or(ParseTileKeyError::Format)?;
        Ok(Self {
            category: category.parse()?,
            value: value.parse()?,
        })
    }
}

/// Where a tile is in its lifecycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TileState {
    /// Showing its face value
    #[default]
    Hidden,
    /// Showing its question
    Revealed,
    /// Showing its answer, teams may now be scored
    AnswerShown,
    /// Played out, terminal until a reset
    Completed,
}

/// Result of marking a team wrong on a tile
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WrongAnswer {
    /// Nothing happened: the tile is not scoreable or the team is already out
    Ignored,
    /// The team is now locked out and the tile stays open
    LockedOut,
    /// The team was the last one left, so the tile completed
    Completed,
}

/// State of a single tile
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tile {
    state: TileState,
    locked_out: EnumMap<Team, bool>,
}

impl Tile {
    /// Current lifecycle state
    pub fn state(&self) -> TileState {
        self.state
    }

    /// Whether the tile has been played out
    pub fn is_completed(&self) -> bool {
        self.state == TileState::Completed
    }

    /// Whether `team` already answered this tile wrong
    pub fn is_locked_out(&self, team: Team) -> bool {
        self.locked_out[team]
    }

    /// Teams that already answered this tile wrong
    pub fn locked_out(&self) -> impl Iterator<Item = Team> + '_ {
        self.locked_out
            .iter()
            .filter(|(_, locked)| **locked)
            .map(|(team, _)| team)
    }

    /// Moves a hidden tile to `Revealed`, clearing its lockouts
    ///
    /// # Returns
    ///
    /// `true` if the tile was hidden and is now revealed
    pub fn reveal(&mut self) -> bool {
        if self.state != TileState::Hidden {
            return false;
        }
        self.state = TileState::Revealed;
        self.locked_out = EnumMap::default();
        true
    }

    /// Advances the tile one step, as a generic activation does
    ///
    /// An activation on a tile whose answer is already shown completes it
    /// without awarding anyone.
    ///
    /// # Returns
    ///
    /// The new state, or `None` if the tile was already completed
    pub fn activate(&mut self) -> Option<TileState> {
        match self.state {
            TileState::Hidden => {
                self.reveal();
            }
            TileState::Revealed => self.state = TileState::AnswerShown,
            TileState::AnswerShown => self.complete(),
            TileState::Completed => return None,
        }
        Some(self.state)
    }

    /// Whether `team` may be scored on this tile right now
    pub fn can_score(&self, team: Team) -> bool {
        self.state == TileState::AnswerShown && !self.locked_out[team]
    }

    /// Completes the tile in favour of `team`
    ///
    /// # Returns
    ///
    /// `true` if the team could be scored and the tile completed
    pub fn mark_correct(&mut self, team: Team) -> bool {
        if !self.can_score(team) {
            return false;
        }
        self.complete();
        true
    }

    /// Locks `team` out, completing the tile once every team is out
    pub fn mark_wrong(&mut self, team: Team) -> WrongAnswer {
        if !self.can_score(team) {
            return WrongAnswer::Ignored;
        }
        self.locked_out[team] = true;
        if self.locked_out.values().all(|locked| *locked) {
            self.complete();
            WrongAnswer::Completed
        } else {
            WrongAnswer::LockedOut
        }
    }

    /// Turns an unfinished tile face down again
    ///
    /// Completed tiles and lockouts are left alone.
    pub fn hide(&mut self) {
        if self.state != TileState::Completed {
            self.state = TileState::Hidden;
        }
    }

    fn complete(&mut self) {
        self.state = TileState::Completed;
        self.locked_out = EnumMap::default();
    }
}

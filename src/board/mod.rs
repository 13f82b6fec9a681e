//! The board store
//!
//! This module owns the state of every tile on the grid, the Daily Double
//! draw and the wagers placed on them. It knows nothing about input devices
//! or presentation mode; [`crate::game::Game`] decides which tile an event
//! targets and which team is acting.

pub mod config;
pub mod tile;
pub mod wager;

use std::collections::HashMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::scores::{Scoreboard, Team};

use config::BoardConfig;
use tile::{Tile, TileKey, TileState, WrongAnswer};

/// Alarm messages scheduled by board interactions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// The Daily Double splash for `key` has finished, open its wager dialog
    OpenWager {
        /// Tile captured when the splash started
        key: TileKey,
    },
}

/// Outcome of activating a tile
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activation {
    /// Completed tile or unknown key, nothing changed
    Ignored,
    /// Hidden Daily Double, the wager flow must run before it can reveal
    DailyDouble,
    /// The question is now showing
    Revealed,
    /// The answer is now showing
    AnswerShown,
    /// Nobody claimed it, the tile is done
    Completed,
}

/// What a tile currently displays
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub enum TileContent {
    /// Face down, showing its value
    Value(u32),
    /// Showing the question
    Question(String),
    /// Showing the answer
    Answer(String),
    /// Played out
    Done,
}

/// Render data for one tile
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TileView {
    /// Which tile this is
    pub key: TileKey,
    /// What the tile shows
    pub content: TileContent,
}

/// Runtime state of the whole grid
#[derive(Debug, Clone)]
pub struct Board {
    config: BoardConfig,
    tiles: HashMap<TileKey, Tile>,
    daily_doubles: Vec<TileKey>,
    wagers: HashMap<TileKey, i64>,
}

impl Board {
    /// Creates a fresh board and draws its Daily Doubles
    ///
    /// # Arguments
    ///
    /// * `config` - The clue table
    /// * `daily_double_count` - How many Daily Doubles to draw
    /// * `rng` - Source of randomness for the draw
    pub fn new(config: BoardConfig, daily_double_count: usize, rng: &mut fastrand::Rng) -> Self {
        let daily_doubles = wager::choose_daily_doubles(config.keys(), daily_double_count, rng);
        tracing::debug!(
            daily_doubles = %daily_doubles.iter().join(", "),
            "drew daily doubles"
        );
        let tiles = config.keys().map(|key| (key, Tile::default())).collect();
        Self {
            config,
            tiles,
            daily_doubles,
            wagers: HashMap::new(),
        }
    }

    /// The clue table
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// State of a tile
    pub fn tile(&self, key: TileKey) -> Option<&Tile> {
        self.tiles.get(&key)
    }

    /// Tiles drawn as Daily Doubles for this session
    pub fn daily_doubles(&self) -> &[TileKey] {
        &self.daily_doubles
    }

    /// Whether a tile is a Daily Double
    pub fn is_daily_double(&self, key: TileKey) -> bool {
        self.daily_doubles.contains(&key)
    }

    /// Wager placed on a Daily Double, if any
    pub fn wager(&self, key: TileKey) -> Option<i64> {
        self.wagers.get(&key).copied()
    }

    /// Points won or lost on a tile: the wager on a Daily Double, otherwise
    /// the face value
    pub fn award(&self, key: TileKey) -> i64 {
        let face_value = i64::from(key.value());
        if self.is_daily_double(key) {
            self.wager(key).unwrap_or(face_value)
        } else {
            face_value
        }
    }

    /// Applies a generic activation (click or space bar) to a tile
    ///
    /// A hidden Daily Double is left untouched and reported as
    /// [`Activation::DailyDouble`] so the caller can run the wager flow.
    pub fn activate(&mut self, key: TileKey) -> Activation {
        let is_daily_double = self.is_daily_double(key);
        let Some(tile) = self.tiles.get_mut(&key) else {
            return Activation::Ignored;
        };

        if is_daily_double && tile.state() == TileState::Hidden {
            return Activation::DailyDouble;
        }

        match tile.activate() {
            None | Some(TileState::Hidden) => Activation::Ignored,
            Some(TileState::Revealed) => Activation::Revealed,
            Some(TileState::AnswerShown) => Activation::AnswerShown,
            Some(TileState::Completed) => Activation::Completed,
        }
    }

    /// Locks in a Daily Double wager and reveals the tile
    ///
    /// Only a hidden tile accepts a wager; once revealed, the wager it was
    /// revealed with stands.
    ///
    /// # Returns
    ///
    /// `true` if the tile went from hidden to revealed
    pub fn place_wager(&mut self, key: TileKey, wager: i64) -> bool {
        let Some(tile) = self.tiles.get_mut(&key) else {
            return false;
        };
        if !tile.reveal() {
            return false;
        }
        self.wagers.insert(key, wager);
        true
    }

    /// Awards a tile to `team`
    ///
    /// # Returns
    ///
    /// The points awarded, or `None` if the team could not be scored
    pub fn mark_correct(&mut self, key: TileKey, team: Team, scores: &mut Scoreboard) -> Option<i64> {
        let award = self.award(key);
        let tile = self.tiles.get_mut(&key)?;
        if !tile.mark_correct(team) {
            return None;
        }
        scores.award(team, award);
        Some(award)
    }

    /// Deducts a tile's award from `team` and locks the team out
    pub fn mark_wrong(&mut self, key: TileKey, team: Team, scores: &mut Scoreboard) -> WrongAnswer {
        let award = self.award(key);
        let Some(tile) = self.tiles.get_mut(&key) else {
            return WrongAnswer::Ignored;
        };
        let outcome = tile.mark_wrong(team);
        if outcome != WrongAnswer::Ignored {
            scores.deduct(team, award);
        }
        outcome
    }

    /// Clears every tile and wager; the Daily Double draw is kept
    pub fn reset(&mut self) {
        self.tiles.values_mut().for_each(|tile| *tile = Tile::default());
        self.wagers.clear();
    }

    /// Turns every unfinished tile face down
    pub fn hide_all(&mut self) {
        self.tiles.values_mut().for_each(Tile::hide);
    }

    /// Render data for one tile
    ///
    /// Question and answer text only appear once the tile has reached the
    /// matching state.
    pub fn tile_view(&self, key: TileKey) -> Option<TileView> {
        let tile = self.tiles.get(&key)?;
        let clue = self.config.clue(key);
        let content = match tile.state() {
            TileState::Hidden => TileContent::Value(key.value()),
            TileState::Revealed => {
                TileContent::Question(clue.map(|c| c.question.clone()).unwrap_or_default())
            }
            TileState::AnswerShown => {
                TileContent::Answer(clue.map(|c| c.answer.clone()).unwrap_or_default())
            }
            TileState::Completed => TileContent::Done,
        };
        Some(TileView { key, content })
    }

    /// Render data for the whole grid, one row per face value
    pub fn rows(&self) -> Vec<Vec<TileView>> {
        (0..self.config.row_count())
            .map(|row| {
                (0..self.config.category_count())
                    .filter_map(|category| self.config.key_at(category, row))
                    .filter_map(|key| self.tile_view(key))
                    .collect_vec()
            })
            .collect_vec()
    }
}

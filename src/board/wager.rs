//! Daily Double selection and wagering
//!
//! Daily Doubles are drawn once when a game is created. Wagers are typed in
//! by the host as free text and are always coerced into range rather than
//! rejected.

use serde::Serialize;

use crate::constants::daily_double::MIN_WAGER;

use super::tile::TileKey;

/// Draws `count` distinct tiles uniformly at random
///
/// Returns fewer keys if the board has fewer tiles. The result is sorted so
/// it does not leak the draw order.
pub fn choose_daily_doubles<I: IntoIterator<Item = TileKey>>(
    keys: I,
    count: usize,
    rng: &mut fastrand::Rng,
) -> Vec<TileKey> {
    let mut keys: Vec<_> = keys.into_iter().collect();
    rng.shuffle(&mut keys);
    keys.truncate(count);
    keys.sort_unstable();
    keys
}

/// Highest wager a team may place on a Daily Double
///
/// A team can always risk at least the tile's face value, even when its own
/// score is lower. Without a selected team the cap is the face value.
pub fn wager_cap(team_score: Option<i64>, face_value: u32) -> i64 {
    let face_value = i64::from(face_value);
    team_score.map_or(face_value, |score| score.max(face_value))
}

/// Reads a number the way a numeric input field would
///
/// Fractions are truncated toward zero. Blank or non-numeric text yields
/// `None`.
pub fn parse_amount(input: &str) -> Option<i64> {
    let input = input.trim();
    input.parse::<i64>().ok().or_else(|| {
        input
            .parse::<f64>()
            .ok()
            .filter(|amount| amount.is_finite())
            .map(|amount| amount.trunc() as i64)
    })
}

/// Coerces host input into a legal Daily Double wager
///
/// Non-numeric input becomes the minimum wager.
pub fn clamp_wager(input: &str, cap: i64) -> i64 {
    parse_amount(input)
        .unwrap_or(MIN_WAGER)
        .clamp(MIN_WAGER, cap.max(MIN_WAGER))
}

/// The open wager entry dialog for a Daily Double
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WagerModal {
    key: TileKey,
    entered: Option<i64>,
}

/// What the surface shows in the wager dialog
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WagerModalMessage {
    /// The Daily Double tile being wagered on
    pub key: TileKey,
    /// Smallest allowed wager
    pub min: i64,
    /// Largest allowed wager for the currently selected team
    pub max: i64,
    /// Wager that a confirm would lock in
    pub wager: i64,
}

impl WagerModal {
    /// Opens the dialog for a tile
    pub fn new(key: TileKey) -> Self {
        Self { key, entered: None }
    }

    /// The tile being wagered on
    pub fn key(&self) -> TileKey {
        self.key
    }

    /// Records new input, clamped against `cap`
    ///
    /// # Returns
    ///
    /// The wager now pending
    pub fn enter(&mut self, input: &str, cap: i64) -> i64 {
        let wager = clamp_wager(input, cap);
        self.entered = Some(wager);
        wager
    }

    /// Wager to lock in on confirm
    ///
    /// Falls back to the tile's face value when nothing was entered.
    pub fn resolve(&self) -> i64 {
        self.entered.unwrap_or(i64::from(self.key.value()))
    }

    /// Message describing the dialog for a given cap
    pub fn message(&self, cap: i64) -> WagerModalMessage {
        WagerModalMessage {
            key: self.key,
            min: MIN_WAGER,
            max: cap.max(MIN_WAGER),
            wager: self.resolve(),
        }
    }
}

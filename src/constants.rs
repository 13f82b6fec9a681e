//! Rules and configuration limits for the quiz board
//!
//! This module contains the fixed game rules, such as the minimum wager,
//! and the bounds used to validate board configurations and game options.

/// Board layout limits
pub mod board {
    /// Maximum number of categories (columns) on a board
    pub const MAX_CATEGORY_COUNT: usize = 8;
    /// Maximum number of point rows on a board
    pub const MAX_VALUE_COUNT: usize = 10;
    /// Smallest face value a tile may carry
    pub const MIN_FACE_VALUE: u32 = 5;
    /// Largest face value a tile may carry
    pub const MAX_FACE_VALUE: u32 = 10_000;
    /// Maximum length of a category title in characters
    pub const MAX_TITLE_LENGTH: usize = 100;
    /// Maximum length of a question or answer in characters
    pub const MAX_CLUE_LENGTH: usize = 500;
}

/// Daily Double rules
pub mod daily_double {
    /// Number of Daily Double tiles drawn per session by default
    pub const DEFAULT_COUNT: usize = 2;
    /// Upper bound for the configurable Daily Double count
    pub const MAX_COUNT: usize = 4;
    /// Smallest wager a team may place on a Daily Double
    pub const MIN_WAGER: i64 = 5;
    /// Default length of the splash shown before the wager modal, in milliseconds
    pub const DEFAULT_SPLASH_MILLIS: u64 = 1500;
    /// Minimum splash length in seconds
    pub const MIN_SPLASH_SECONDS: u64 = 0;
    /// Maximum splash length in seconds
    pub const MAX_SPLASH_SECONDS: u64 = 10;
}

/// Final Jeopardy rules
pub mod final_round {
    /// Default countdown length in seconds
    pub const DEFAULT_COUNTDOWN_SECONDS: u32 = 45;
    /// Minimum configurable countdown length in seconds
    pub const MIN_COUNTDOWN_SECONDS: u32 = 5;
    /// Maximum configurable countdown length in seconds
    pub const MAX_COUNTDOWN_SECONDS: u32 = 300;
    /// Interval between countdown ticks in milliseconds
    pub const TICK_MILLIS: u64 = 1000;
}

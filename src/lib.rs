//! # Jeopardy Board Library
//!
//! This library provides the game logic for a host-operated Jeopardy style
//! quiz board. It keeps the board, scores, Daily Double wagers and the Final
//! Jeopardy round, and renders them through a [`session::Tunnel`] while
//! emitting sound cues through a [`sound::Speaker`].

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::similar_names)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::ignored_unit_patterns)]
#![allow(clippy::struct_field_names)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::wildcard_imports)]
use serde::{Deserialize, Serialize};

pub mod board;
pub mod constants;
pub mod final_round;
pub mod game;
pub mod presentation;
pub mod scores;
pub mod session;
pub mod sound;

#[cfg(test)]
mod testing;

/// Full screen snapshots
///
/// A snapshot replaces whatever the surface currently shows, e.g. after a
/// reset or when switching between the board and the final round.
#[derive(Debug, Serialize, Clone, derive_more::From)]
pub enum SyncMessage {
    /// The board screen
    Game(game::SyncMessage),
    /// The final round screen
    FinalRound(final_round::SyncMessage),
}

impl SyncMessage {
    /// Converts the sync message to a JSON string for transmission
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}

/// Incremental updates to the current screen
#[derive(Debug, Serialize, Clone, derive_more::From)]
pub enum UpdateMessage {
    /// Board updates
    Game(game::UpdateMessage),
    /// Final round updates
    FinalRound(final_round::UpdateMessage),
}

impl UpdateMessage {
    /// Converts the update message to a JSON string for transmission
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}

/// Delayed events scheduled by the game
///
/// The host environment fires these back through
/// [`game::Game::receive_alarm`] once their duration has elapsed.
#[derive(Debug, Clone, derive_more::From, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// Daily Double splash timeout
    Board(board::AlarmMessage),
    /// Final round countdown tick
    FinalRound(final_round::AlarmMessage),
}

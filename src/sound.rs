//! Sound cues
//!
//! Sounds are feedback for the room, never part of the game logic. The
//! embedding UI implements [`Speaker`]; the engine only ever reaches it
//! through [`play_cue`] and [`stop_cue`], which log and drop failures so a
//! blocked or missing sound cannot interrupt a transition.

use enum_map::Enum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A named sound resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum, Serialize, Deserialize)]
pub enum Cue {
    /// Played when a Daily Double is uncovered
    DailyDouble,
    /// Played when a question is revealed
    RevealQuestion,
    /// Played when an answer is revealed
    RevealAnswer,
    /// Played for a correct response
    Correct,
    /// Played for a wrong response or an unclaimed tile
    Incorrect,
    /// Looping music while teams write their Final Jeopardy response
    FinalThink,
    /// Played when the Final Jeopardy countdown starts
    TimerBeep,
}

impl Cue {
    /// Path of the audio file backing this cue
    pub fn resource(self) -> &'static str {
        match self {
            Self::DailyDouble => "/sounds/daily_double.mp3",
            Self::RevealQuestion => "/sounds/reveal_question.mp3",
            Self::RevealAnswer => "/sounds/reveal_answer.mp3",
            Self::Correct => "/sounds/correct.mp3",
            Self::Incorrect => "/sounds/incorrect.mp3",
            Self::FinalThink => "/sounds/final_think.mp3",
            Self::TimerBeep => "/sounds/timer_beep.mp3",
        }
    }

    /// Whether the cue repeats until stopped
    pub fn is_looping(self) -> bool {
        matches!(self, Self::FinalThink)
    }
}

/// Reasons a speaker may fail to play or stop a cue
#[derive(Debug, Error)]
pub enum Error {
    /// The platform refused playback, e.g. before any user gesture
    #[error("playback of {0:?} was blocked")]
    Blocked(Cue),
    /// The resource could not be loaded
    #[error("sound {cue:?} is unavailable: {reason}")]
    Unavailable {
        /// The cue that failed
        cue: Cue,
        /// Platform supplied description
        reason: String,
    },
}

/// Output device for sound cues
pub trait Speaker {
    /// Starts playing a cue from its current position
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the platform cannot play the cue.
    fn play(&self, cue: Cue) -> Result<(), Error>;

    /// Pauses a cue and rewinds it to the start
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the platform cannot stop the cue.
    fn stop(&self, cue: Cue) -> Result<(), Error>;
}

/// A speaker that plays nothing, for headless use
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Speaker for Silent {
    fn play(&self, _cue: Cue) -> Result<(), Error> {
        Ok(())
    }

    fn stop(&self, _cue: Cue) -> Result<(), Error> {
        Ok(())
    }
}

/// Plays a cue, logging instead of propagating any failure
pub fn play_cue<P: Speaker + ?Sized>(speaker: &P, cue: Cue) {
    if let Err(error) = speaker.play(cue) {
        tracing::warn!(?cue, %error, "failed to play sound cue");
    }
}

/// Stops and rewinds a cue, logging instead of propagating any failure
pub fn stop_cue<P: Speaker + ?Sized>(speaker: &P, cue: Cue) {
    if let Err(error) = speaker.stop(cue) {
        tracing::warn!(?cue, %error, "failed to stop sound cue");
    }
}

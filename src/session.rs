//! Rendering surface
//!
//! This module defines the trait through which the engine pushes what the
//! room should see. The board never renders itself: whatever shows it
//! implements [`Tunnel`] and draws from the messages it receives.

use super::{SyncMessage, UpdateMessage};

/// Trait for sending render messages to the surface showing the board
pub trait Tunnel {
    /// Sends an incremental update
    ///
    /// Update messages describe a single change, such as one tile flipping
    /// or the scores moving.
    ///
    /// # Arguments
    ///
    /// * `message` - The update message to send
    fn send_message(&self, message: &UpdateMessage);

    /// Sends a complete snapshot of what should be on screen
    ///
    /// Snapshots are sent when a surface attaches and after bulk changes
    /// such as a board reset or switching to the final round.
    ///
    /// # Arguments
    ///
    /// * `state` - The snapshot to send
    fn send_state(&self, state: &SyncMessage);
}

//! Presentation mode keyboard controls
//!
//! In presentation mode the host drives the board entirely from the
//! keyboard. Key names are the `KeyboardEvent.key` strings a browser
//! reports, so a front end can forward them untouched.

use serde::{Deserialize, Serialize};

use crate::scores::Team;

/// Cursor movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Toward cheaper rows
    Up,
    /// Toward more valuable rows
    Down,
    /// Toward the first category
    Left,
    /// Toward the last category
    Right,
}

/// Action bound to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Move the cursor
    Move(Direction),
    /// Make a team the acting team
    SelectTeam(Team),
    /// Advance the tile under the cursor
    Activate,
    /// Score the acting team correct
    Correct,
    /// Score the acting team wrong
    Wrong,
    /// Leave presentation mode
    Exit,
}

impl Command {
    /// Looks up the command bound to a key, if any
    pub fn from_key(key: &str) -> Option<Self> {
        Some(match key {
            "ArrowUp" => Self::Move(Direction::Up),
            "ArrowDown" => Self::Move(Direction::Down),
            "ArrowLeft" => Self::Move(Direction::Left),
            "ArrowRight" => Self::Move(Direction::Right),
            " " => Self::Activate,
            "Enter" => Self::Correct,
            "w" | "W" => Self::Wrong,
            "Escape" => Self::Exit,
            _ => {
                let mut chars = key.chars();
                let digit = chars.next()?;
                if chars.next().is_some() {
                    return None;
                }
                Self::SelectTeam(Team::from_digit(digit)?)
            }
        })
    }
}

/// The highlighted tile in presentation mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Cursor {
    category: usize,
    row: usize,
}

impl Cursor {
    /// Category column under the cursor
    pub fn category(&self) -> usize {
        self.category
    }

    /// Row under the cursor
    pub fn row(&self) -> usize {
        self.row
    }

    /// Moves one step, stopping at the edges of a `rows` by `categories` grid
    ///
    /// # Returns
    ///
    /// `true` if the cursor moved
    pub fn step(&mut self, direction: Direction, rows: usize, categories: usize) -> bool {
        let before = *self;
        match direction {
            Direction::Up => self.row = self.row.saturating_sub(1),
            Direction::Down => self.row = (self.row + 1).min(rows.saturating_sub(1)),
            Direction::Left => self.category = self.category.saturating_sub(1),
            Direction::Right => {
                self.category = (self.category + 1).min(categories.saturating_sub(1));
            }
        }
        *self != before
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_key_bindings() {
        assert_eq!(
            Command::from_key("ArrowUp"),
            Some(Command::Move(Direction::Up))
        );
        assert_eq!(
            Command::from_key("ArrowRight"),
            Some(Command::Move(Direction::Right))
        );
        assert_eq!(Command::from_key(" "), Some(Command::Activate));
        assert_eq!(Command::from_key("Enter"), Some(Command::Correct));
        assert_eq!(Command::from_key("w"), Some(Command::Wrong));
        assert_eq!(Command::from_key("W"), Some(Command::Wrong));
        assert_eq!(Command::from_key("Escape"), Some(Command::Exit));
        assert_eq!(
            Command::from_key("3"),
            Some(Command::SelectTeam(Team::Three))
        );
    }

    #[test]
    fn test_unbound_keys() {
        for key in ["5", "0", "12", "q", "Tab", "Shift", "", "Space"] {
            assert_eq!(Command::from_key(key), None, "{key:?}");
        }
    }

    #[test]
    fn test_cursor_clamps_without_wrapping() {
        let mut cursor = Cursor::default();
        assert!(!cursor.step(Direction::Up, 5, 4));
        assert!(!cursor.step(Direction::Left, 5, 4));

        for _ in 0..10 {
            cursor.step(Direction::Down, 5, 4);
            cursor.step(Direction::Right, 5, 4);
        }
        assert_eq!((cursor.row(), cursor.category()), (4, 3));
        assert!(!cursor.step(Direction::Down, 5, 4));
        assert!(!cursor.step(Direction::Right, 5, 4));

        assert!(cursor.step(Direction::Up, 5, 4));
        assert_eq!(cursor.row(), 3);
    }
}

//! Board configuration
//!
//! The clue table is static lookup data: categories, face values, one
//! question/answer pair per tile and the Final Jeopardy clue. It is read-only
//! for the whole session, so any dataset that passes [`BoardConfig::check`]
//! can be swapped in without touching the game logic.

use std::collections::HashMap;

use garde::Validate;
use itertools::{Itertools, iproduct};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::board::{
    MAX_CATEGORY_COUNT, MAX_CLUE_LENGTH, MAX_FACE_VALUE, MAX_TITLE_LENGTH, MAX_VALUE_COUNT,
    MIN_FACE_VALUE,
};

use super::tile::TileKey;

/// Bundled demonstration board
const DEMO_BOARD: &str = include_str!("demo.json");

/// Reasons a board configuration is rejected
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration is not valid JSON for a board
    #[error("board could not be decoded: {0}")]
    Json(#[from] serde_json::Error),
    /// A field is outside its allowed bounds
    #[error("board failed validation: {0}")]
    Invalid(#[from] garde::Report),
    /// Face values must go up row by row
    #[error("face values must be strictly increasing")]
    UnorderedValues,
    /// A tile on the grid has no clue
    #[error("no clue for tile {0}")]
    MissingClue(TileKey),
}

/// Question and answer shown on a tile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Clue {
    /// Prompt read to the teams
    #[garde(length(chars, max = MAX_CLUE_LENGTH))]
    pub question: String,
    /// Expected response
    #[garde(length(chars, max = MAX_CLUE_LENGTH))]
    pub answer: String,
}

/// The Final Jeopardy clue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct FinalClue {
    /// Category announced before wagers are placed
    #[garde(length(chars, max = MAX_TITLE_LENGTH))]
    pub category: String,
    /// Prompt revealed once wagers are locked
    #[garde(length(chars, max = MAX_CLUE_LENGTH))]
    pub question: String,
    /// Response revealed by the host
    #[garde(length(chars, max = MAX_CLUE_LENGTH))]
    pub answer: String,
}

fn validate_clues(clues: &HashMap<TileKey, Clue>, _ctx: &()) -> garde::Result {
    for (key, clue) in clues {
        clue.validate()
            .map_err(|report| garde::Error::new(format!("clue {key}: {report}")))?;
    }
    Ok(())
}

/// A complete board: the grid layout plus every clue on it
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BoardConfig {
    /// Category titles, one per column
    #[garde(
        length(min = 1, max = MAX_CATEGORY_COUNT),
        inner(length(chars, min = 1, max = MAX_TITLE_LENGTH))
    )]
    categories: Vec<String>,
    /// Face values, one per row, lowest first
    #[garde(
        length(min = 1, max = MAX_VALUE_COUNT),
        inner(range(min = MIN_FACE_VALUE, max = MAX_FACE_VALUE))
    )]
    values: Vec<u32>,
    /// Clue for every tile on the grid
    #[garde(custom(validate_clues))]
    clues: HashMap<TileKey, Clue>,
    /// Clue for the final round
    #[garde(dive)]
    final_clue: FinalClue,
}

impl BoardConfig {
    /// Builds and checks a board
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the board fails [`BoardConfig::check`].
    pub fn new(
        categories: Vec<String>,
        values: Vec<u32>,
        clues: HashMap<TileKey, Clue>,
        final_clue: FinalClue,
    ) -> Result<Self, Error> {
        let config = Self {
            categories,
            values,
            clues,
            final_clue,
        };
        config.check()?;
        Ok(config)
    }

    /// Decodes and checks a board from JSON
    ///
    /// Clues are keyed by `"<category>-<value>"` strings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] for malformed input, otherwise any error of
    /// [`BoardConfig::check`].
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(json)?;
        config.check()?;
        Ok(config)
    }

    /// The bundled demonstration board about artificial intelligence
    ///
    /// # Panics
    ///
    /// Never in practice: the bundled board is covered by tests.
    pub fn demo() -> Self {
        Self::from_json(DEMO_BOARD).expect("bundled demo board is valid")
    }

    /// Validates bounds, value ordering and clue coverage
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn check(&self) -> Result<(), Error> {
        self.validate()?;

        if !self.values.iter().tuple_windows().all(|(a, b)| a < b) {
            return Err(Error::UnorderedValues);
        }

        if let Some(key) = self.keys().find(|key| !self.clues.contains_key(key)) {
            return Err(Error::MissingClue(key));
        }

        Ok(())
    }

    /// Category titles, one per column
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Face values, one per row
    pub fn values(&self) -> &[u32] {
        &self.values
    }

    /// Number of point rows
    pub fn row_count(&self) -> usize {
        self.values.len()
    }

    /// Number of category columns
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Key of the tile at a grid position, if the position exists
    pub fn key_at(&self, category: usize, row: usize) -> Option<TileKey> {
        if category >= self.categories.len() {
            return None;
        }
        self.values
            .get(row)
            .map(|value| TileKey::new(category, *value))
    }

    /// Every tile key, row by row
    pub fn keys(&self) -> impl Iterator<Item = TileKey> + '_ {
        iproduct!(self.values.iter(), 0..self.categories.len())
            .map(|(value, category)| TileKey::new(category, *value))
    }

    /// Title of a category column
    pub fn category_title(&self, category: usize) -> Option<&str> {
        self.categories.get(category).map(String::as_str)
    }

    /// Clue behind a tile
    pub fn clue(&self, key: TileKey) -> Option<&Clue> {
        self.clues.get(&key)
    }

    /// The Final Jeopardy clue
    pub fn final_clue(&self) -> &FinalClue {
        &self.final_clue
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn clue(text: &str) -> Clue {
        Clue {
            question: format!("{text}?"),
            answer: format!("What is {text}?"),
        }
    }

    fn final_clue() -> FinalClue {
        FinalClue {
            category: "Finale".to_string(),
            question: "Last one".to_string(),
            answer: "What is the end?".to_string(),
        }
    }

    fn small_clues() -> HashMap<TileKey, Clue> {
        [
            (TileKey::new(0, 100), clue("a")),
            (TileKey::new(1, 100), clue("b")),
            (TileKey::new(0, 200), clue("c")),
            (TileKey::new(1, 200), clue("d")),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_demo_board_is_valid() {
        let config = BoardConfig::demo();
        assert_eq!(config.category_count(), 4);
        assert_eq!(config.values(), &[100, 200, 300, 400, 500]);
        assert_eq!(config.keys().count(), 20);
        assert_eq!(
            config.clue(TileKey::new(2, 300)).map(|c| c.answer.as_str()),
            Some("What is Watson?")
        );
        assert_eq!(config.final_clue().category, "Legendary Final Category");
    }

    #[test]
    fn test_new_small_board() {
        let config = BoardConfig::new(
            vec!["Left".to_string(), "Right".to_string()],
            vec![100, 200],
            small_clues(),
            final_clue(),
        )
        .unwrap();
        assert_eq!(config.row_count(), 2);
        assert_eq!(config.category_title(1), Some("Right"));
        assert_eq!(config.category_title(2), None);
    }

    #[test]
    fn test_keys_are_row_major() {
        let config = BoardConfig::new(
            vec!["Left".to_string(), "Right".to_string()],
            vec![100, 200],
            small_clues(),
            final_clue(),
        )
        .unwrap();
        assert_eq!(
            config.keys().collect_vec(),
            vec![
                TileKey::new(0, 100),
                TileKey::new(1, 100),
                TileKey::new(0, 200),
                TileKey::new(1, 200),
            ]
        );
    }

    #[test]
    fn test_key_at_bounds() {
        let config = BoardConfig::demo();
        assert_eq!(config.key_at(3, 4), Some(TileKey::new(3, 500)));
        assert_eq!(config.key_at(4, 0), None);
        assert_eq!(config.key_at(0, 5), None);
    }

    #[test]
    fn test_missing_clue() {
        let mut clues = small_clues();
        clues.remove(&TileKey::new(1, 200));
        let result = BoardConfig::new(
            vec!["Left".to_string(), "Right".to_string()],
            vec![100, 200],
            clues,
            final_clue(),
        );
        assert!(matches!(result, Err(Error::MissingClue(key)) if key == TileKey::new(1, 200)));
    }

    #[test]
    fn test_unordered_values() {
        let result = BoardConfig::new(
            vec!["Left".to_string(), "Right".to_string()],
            vec![200, 100],
            small_clues(),
            final_clue(),
        );
        assert!(matches!(result, Err(Error::UnorderedValues)));
    }

    #[test]
    fn test_face_value_below_minimum_wager() {
        let clues = [(TileKey::new(0, 1), clue("tiny"))].into_iter().collect();
        let result = BoardConfig::new(vec!["Only".to_string()], vec![1], clues, final_clue());
        assert!(matches!(result, Err(Error::Invalid(_))));
    }

    #[test]
    fn test_too_many_categories() {
        let categories = (0..=MAX_CATEGORY_COUNT).map(|i| format!("C{i}")).collect_vec();
        let clues = (0..=MAX_CATEGORY_COUNT)
            .map(|i| (TileKey::new(i, 100), clue("x")))
            .collect();
        let result = BoardConfig::new(categories, vec![100], clues, final_clue());
        assert!(matches!(result, Err(Error::Invalid(_))));
    }

    #[test]
    fn test_clue_too_long() {
        let mut clues = small_clues();
        clues.insert(
            TileKey::new(0, 100),
            Clue {
                question: "q".repeat(MAX_CLUE_LENGTH + 1),
                answer: "a".to_string(),
            },
        );
        let result = BoardConfig::new(
            vec!["Left".to_string(), "Right".to_string()],
            vec![100, 200],
            clues,
            final_clue(),
        );
        assert!(matches!(result, Err(Error::Invalid(_))));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            BoardConfig::from_json("{ not json"),
            Err(Error::Json(_))
        ));
        assert!(matches!(
            BoardConfig::from_json(r#"{"categories": [], "values": [], "clues": {"bad": {"question": "", "answer": ""}}, "final_clue": {"category": "", "question": "", "answer": ""}}"#),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_round_trips_through_json() {
        let config = BoardConfig::demo();
        let json = serde_json::to_string(&config).unwrap();
        let decoded = BoardConfig::from_json(&json).unwrap();
        assert_eq!(decoded.clue(TileKey::new(0, 100)), config.clue(TileKey::new(0, 100)));
    }
}

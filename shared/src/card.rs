//! Bingo number space and player cards.
//!
//! Numbers run from 1 to [`MAX_NUMBER`] and are split into five columns of
//! fifteen, labelled by [`COLUMN_LETTERS`]. A [`Card`] is stored column-major,
//! so `columns[c][r]` is the cell at row `r` of column `c`. The center cell is
//! the free cell and always holds [`FREE_CELL`].

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use thiserror::Error;

pub type Number = u8;

pub const MAX_NUMBER: Number = 75;
pub const NUMBERS_PER_COLUMN: Number = 15;
pub const CARD_SIZE: usize = 5;
pub const COLUMN_LETTERS: [char; CARD_SIZE] = ['B', 'I', 'N', 'G', 'O'];

/// Row and column of the free cell.
pub const FREE_INDEX: usize = 2;
/// Placeholder stored in the free cell.
pub const FREE_CELL: Number = 0;

/// Inclusive number range covered by a column.
pub fn column_range(column: usize) -> RangeInclusive<Number> {
    let start = column as Number * NUMBERS_PER_COLUMN + 1;
    start..=start + NUMBERS_PER_COLUMN - 1
}

/// Column a number belongs to, or `None` outside 1..=75.
pub fn column_of(number: Number) -> Option<usize> {
    if number == 0 || number > MAX_NUMBER {
        return None;
    }
    Some(((number - 1) / NUMBERS_PER_COLUMN) as usize)
}

/// Caller-facing label such as `"G52"`.
pub fn label(number: Number) -> Option<String> {
    column_of(number).map(|column| format!("{}{}", COLUMN_LETTERS[column], number))
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CardError {
    #[error("card must have {expected} columns, got {actual}", expected = CARD_SIZE)]
    WrongColumnCount { actual: usize },

    #[error("column {column} must have {expected} cells, got {actual}", expected = CARD_SIZE)]
    WrongColumnLength { column: char, actual: usize },

    #[error("{number} is outside the range of column {column}")]
    OutOfRange { column: char, number: Number },

    #[error("{number} appears more than once in column {column}")]
    Duplicate { column: char, number: Number },

    #[error("free cell must be empty, found {0}")]
    FreeCellOccupied(Number),
}

/// A player's 5x5 grid.
///
/// Cards decoded off the wire are not trusted; call [`Card::validate`] before
/// accepting one. The validator treats an incomplete card as losing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    columns: Vec<Vec<Number>>,
}

impl Card {
    /// Wraps raw column data without checking it.
    pub fn from_columns(columns: Vec<Vec<Number>>) -> Self {
        Self { columns }
    }

    /// Draws five distinct numbers per column from that column's range.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let columns = (0..CARD_SIZE)
            .map(|column| {
                let range: Vec<Number> = column_range(column).collect();
                let mut cells: Vec<Number> =
                    range.choose_multiple(rng, CARD_SIZE).copied().collect();
                if column == FREE_INDEX {
                    cells[FREE_INDEX] = FREE_CELL;
                }
                cells
            })
            .collect();

        Self { columns }
    }

    pub fn columns(&self) -> &[Vec<Number>] {
        &self.columns
    }

    /// Cell value at (row, column); `None` when the card is missing that cell.
    pub fn cell(&self, row: usize, column: usize) -> Option<Number> {
        self.columns.get(column)?.get(row).copied()
    }

    /// True when every column carries all five cells.
    pub fn is_complete(&self) -> bool {
        self.columns.len() == CARD_SIZE && self.columns.iter().all(|c| c.len() == CARD_SIZE)
    }

    pub fn is_free(row: usize, column: usize) -> bool {
        row == FREE_INDEX && column == FREE_INDEX
    }

    /// Every number on the card, free cell excluded.
    pub fn numbers(&self) -> impl Iterator<Item = Number> + '_ {
        self.columns
            .iter()
            .flat_map(|column| column.iter().copied())
            .filter(|&n| n != FREE_CELL)
    }

    pub fn contains(&self, number: Number) -> bool {
        number != FREE_CELL && self.numbers().any(|n| n == number)
    }

    pub fn validate(&self) -> Result<(), CardError> {
        if self.columns.len() != CARD_SIZE {
            return Err(CardError::WrongColumnCount {
                actual: self.columns.len(),
            });
        }

        for (index, cells) in self.columns.iter().enumerate() {
            let letter = COLUMN_LETTERS[index];
            if cells.len() != CARD_SIZE {
                return Err(CardError::WrongColumnLength {
                    column: letter,
                    actual: cells.len(),
                });
            }

            let range = column_range(index);
            let mut seen = Vec::with_capacity(CARD_SIZE);
            for (row, &number) in cells.iter().enumerate() {
                if Self::is_free(row, index) {
                    if number != FREE_CELL {
                        return Err(CardError::FreeCellOccupied(number));
                    }
                    continue;
                }
                if !range.contains(&number) {
                    return Err(CardError::OutOfRange {
                        column: letter,
                        number,
                    });
                }
                if seen.contains(&number) {
                    return Err(CardError::Duplicate {
                        column: letter,
                        number,
                    });
                }
                seen.push(number);
            }
        }

        Ok(())
    }
}

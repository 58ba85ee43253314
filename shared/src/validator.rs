//! Win detection.
//!
//! Everything here is a pure function of a card and a set of drawn numbers,
//! so the server and the client run the exact same check.

use crate::card::{Card, Number, CARD_SIZE};
use std::collections::HashSet;

/// Marks indexed `[row][column]`.
pub type MarkGrid = [[bool; CARD_SIZE]; CARD_SIZE];

/// Builds the mark grid for a card, or `None` when the card is incomplete.
pub fn mark_grid(card: &Card, drawn: &HashSet<Number>) -> Option<MarkGrid> {
    if !card.is_complete() {
        return None;
    }

    let mut grid = [[false; CARD_SIZE]; CARD_SIZE];
    for (row, cells) in grid.iter_mut().enumerate() {
        for (column, marked) in cells.iter_mut().enumerate() {
            *marked = Card::is_free(row, column)
                || card
                    .cell(row, column)
                    .map_or(false, |number| drawn.contains(&number));
        }
    }

    Some(grid)
}

/// True if any row, column or diagonal of the card is fully drawn.
///
/// An incomplete card never wins.
pub fn has_win(card: &Card, drawn: &HashSet<Number>) -> bool {
    match mark_grid(card, drawn) {
        Some(grid) => grid_has_line(&grid),
        None => false,
    }
}

pub fn grid_has_line(grid: &MarkGrid) -> bool {
    let any_row = grid.iter().any(|row| row.iter().all(|&m| m));
    let any_column = (0..CARD_SIZE).any(|c| (0..CARD_SIZE).all(|r| grid[r][c]));
    let main_diagonal = (0..CARD_SIZE).all(|i| grid[i][i]);
    let anti_diagonal = (0..CARD_SIZE).all(|i| grid[i][CARD_SIZE - 1 - i]);

    any_row || any_column || main_diagonal || anti_diagonal
}

use thiserror::Error;

use crate::tic_tac_toe::Position;

#[derive(Error, Debug, PartialEq, Eq)]
pub(crate) enum GameError {
    #[error("illegal move: {position} is already occupied")]
    IllegalMove { position: Position },

    #[error("position ({row}, {col}) is off the board")]
    OutOfBounds { row: usize, col: usize },

    #[error("invalid coordinate '{input}' (expected 'row,col' with each in 0..=2)")]
    InvalidInput { input: String },

    #[error("board string has {got} cells, expected {expected}")]
    InvalidBoardLength { expected: usize, got: usize },

    #[error("invalid character '{character}' at cell {position}")]
    InvalidCellCharacter { character: char, position: usize },

    #[error("no legal moves left on the board")]
    NoLegalMoves,
}

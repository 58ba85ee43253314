//! Per-action failures. None of these are fatal: the offending connection
//! gets a rejection and the session carries on.

use shared::{CardError, MIN_NAME_LEN};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("display name must be at least {min} characters", min = MIN_NAME_LEN)]
    NameTooShort,

    #[error("invalid card: {0}")]
    InvalidCard(#[from] CardError),

    #[error("draw pool is empty")]
    EmptyPool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            GameError::NameTooShort.to_string(),
            "display name must be at least 2 characters"
        );
        let err: GameError = CardError::FreeCellOccupied(33).into();
        assert_eq!(err.to_string(), "invalid card: free cell must be empty, found 33");
    }
}

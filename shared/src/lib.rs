pub mod card;
pub mod validator;

pub use card::{Card, CardError, Number, CARD_SIZE, COLUMN_LETTERS, FREE_CELL, MAX_NUMBER};
pub use validator::has_win;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const PROTOCOL_VERSION: u32 = 1;
pub const MIN_NAME_LEN: usize = 2;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum Packet {
    // Client to server
    Connect {
        client_version: u32,
    },
    Join {
        name: Option<String>,
        card: Option<Card>,
    },
    StartRound,
    SubmitCard {
        card: Card,
    },
    ClaimWin,
    ResetRound,
    Heartbeat,
    Disconnect,

    // Server to client
    Connected {
        client_id: u32,
    },
    Joined {
        name: String,
    },
    InitialState(InitialState),
    PlayerList {
        names: Vec<String>,
    },
    PhaseChanged {
        running: bool,
    },
    NumberDrawn {
        number: Number,
    },
    RoundWon {
        winner_name: String,
        message: String,
    },
    RoundExhausted {
        message: String,
    },
    ClaimRejected {
        reason: ClaimRejection,
    },
    RoundReset,
    Rejected {
        reason: String,
    },
    Disconnected {
        reason: String,
    },
}

/// Snapshot sent to a connection before anything else, so it can catch up
/// with a round already in progress.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct InitialState {
    pub history: Vec<Number>,
    pub last_drawn: Option<Number>,
    pub phase: GamePhase,
    pub running: bool,
    pub winner: Option<String>,
    pub players: Vec<String>,
}

/// Round state machine states.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    /// No round in progress
    #[default]
    Idle,
    /// Numbers are being drawn
    Running,
    /// A claim was accepted
    Won,
    /// Every number was drawn without a winner
    Exhausted,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Won => "won",
            Self::Exhausted => "exhausted",
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// Round over, waiting for a reset or a new start.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Won | Self::Exhausted)
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a bingo claim was turned down.
#[derive(Debug, Error, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum ClaimRejection {
    /// No round running, or the round already has a winner
    #[error("no round is accepting claims")]
    NotEligible,
    /// The claimant never submitted a card
    #[error("no card submitted")]
    NoCard,
    /// The card was checked and has no complete line
    #[error("card has no complete line")]
    NoWin,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_phase_flags() {
        assert!(GamePhase::Running.is_running());
        assert!(!GamePhase::Idle.is_running());
        assert!(GamePhase::Won.is_terminal());
        assert!(GamePhase::Exhausted.is_terminal());
        assert!(!GamePhase::Running.is_terminal());
        assert_eq!(GamePhase::default(), GamePhase::Idle);
        assert_eq!(GamePhase::Exhausted.to_string(), "exhausted");
    }

    #[test]
    fn test_packet_serialization_join() {
        let mut rng = StdRng::seed_from_u64(11);
        let card = Card::generate(&mut rng);
        let packet = Packet::Join {
            name: Some("Alice".to_string()),
            card: Some(card.clone()),
        };

        let serialized = bincode::serialize(&packet).unwrap();
        let deserialized: Packet = bincode::deserialize(&serialized).unwrap();

        match deserialized {
            Packet::Join { name, card: c } => {
                assert_eq!(name.as_deref(), Some("Alice"));
                assert_eq!(c, Some(card));
            }
            _ => panic!("Wrong packet type after deserialization"),
        }
    }

    #[test]
    fn test_packet_serialization_initial_state() {
        let packet = Packet::InitialState(InitialState {
            history: vec![7, 42, 63],
            last_drawn: Some(63),
            phase: GamePhase::Running,
            running: true,
            winner: None,
            players: vec!["Alice".to_string(), "Bob".to_string()],
        });

        let serialized = bincode::serialize(&packet).unwrap();
        let deserialized: Packet = bincode::deserialize(&serialized).unwrap();

        match deserialized {
            Packet::InitialState(state) => {
                assert_eq!(state.history, vec![7, 42, 63]);
                assert_eq!(state.last_drawn, Some(63));
                assert_eq!(state.phase, GamePhase::Running);
                assert!(state.running);
                assert_eq!(state.players.len(), 2);
            }
            _ => panic!("Wrong packet type after deserialization"),
        }
    }

    #[test]
    fn test_malformed_card_still_decodes() {
        // The server must be able to see a broken card to reject it.
        let packet = Packet::SubmitCard {
            card: Card::from_columns(vec![vec![1, 2], vec![]]),
        };
        let serialized = bincode::serialize(&packet).unwrap();
        let deserialized: Packet = bincode::deserialize(&serialized).unwrap();

        match deserialized {
            Packet::SubmitCard { card } => assert!(card.validate().is_err()),
            _ => panic!("Wrong packet type after deserialization"),
        }
    }

    #[test]
    fn test_claim_rejection_messages() {
        assert_eq!(
            ClaimRejection::NotEligible.to_string(),
            "no round is accepting claims"
        );
        assert_ne!(
            ClaimRejection::NoCard.to_string(),
            ClaimRejection::NoWin.to_string()
        );

        let err: Box<dyn std::error::Error> = Box::new(ClaimRejection::NoWin);
        assert_eq!(err.to_string(), "card has no complete line");
    }
}

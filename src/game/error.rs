//! Engine error types.
//!
//! The engine has no fatal error path: a `GameError` means the operation was
//! rejected and table state is unchanged. Only the join conflict is ever
//! surfaced to a client; everything else stays server-side.

use std::fmt;

/// Errors that can occur during table operations
#[derive(Debug, Clone, PartialEq)]
pub enum GameError {
    // Seating errors
    InvalidPosition { position: usize },
    PositionTaken { position: usize },
    NotAtTable,

    // Action errors
    NoHandInProgress,
    HandInProgress,
    NotYourTurn,
    CannotCheck { owed: i64 },
    RaiseTooSmall { minimum: i64, attempted: i64 },
    NotEnoughChips { required: i64, available: i64 },

    // Showdown-phase errors
    NotInShowdown,
    RunItTwiceUnavailable,

    // Privileged controls
    NotPrivileged,
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::InvalidPosition { position } => {
                write!(f, "Position {} is not a valid seat", position)
            }
            GameError::PositionTaken { position } => {
                write!(f, "Position {} is already taken", position)
            }
            GameError::NotAtTable => write!(f, "You are not seated at this table"),

            GameError::NoHandInProgress => write!(f, "No hand is in progress"),
            GameError::HandInProgress => write!(f, "A hand is already in progress"),
            GameError::NotYourTurn => write!(f, "Not your turn"),
            GameError::CannotCheck { owed } => {
                write!(f, "Cannot check, {} more to call", owed)
            }
            GameError::RaiseTooSmall { minimum, attempted } => {
                write!(
                    f,
                    "Raise to {} is too small. Minimum raise is to {}",
                    attempted, minimum
                )
            }
            GameError::NotEnoughChips {
                required,
                available,
            } => {
                write!(
                    f,
                    "Not enough chips. Required: {}, Available: {}",
                    required, available
                )
            }

            GameError::NotInShowdown => write!(f, "Cards can only be shown at showdown"),
            GameError::RunItTwiceUnavailable => {
                write!(f, "Run it twice is only available heads-up before the river")
            }

            GameError::NotPrivileged => write!(f, "You cannot do that"),
        }
    }
}

impl std::error::Error for GameError {}

/// Result type for engine operations. `Ok` doubles as the "state changed"
/// signal: the caller should broadcast a fresh snapshot.
pub type GameResult<T> = Result<T, GameError>;

//! Error types for tether analysis

use thiserror::Error;

/// Errors that abort an analysis run.
///
/// None of these are retried internally. Callers decide what to show the
/// user and whether to try again.
#[derive(Debug, Error)]
pub enum TetherError {
    #[error("log provider error: {message}")]
    Provider { message: String },

    #[error("unexpected log provider response code: {status}")]
    UnexpectedProvider { status: u16 },

    #[error("request to log provider failed")]
    Transport(#[from] reqwest::Error),

    #[error("fight {fight} not found in report {report}")]
    FightNotFound { report: String, fight: u32 },

    #[error("no tethers found in fight")]
    NoTethersFound,

    #[error("fight ID is required, select a fight first")]
    MissingFightSelector,

    #[error("{call} needs a start and end time")]
    MissingTimeWindow { call: &'static str },

    #[error("failed to load configuration")]
    Config(#[from] confy::ConfyError),
}

impl TetherError {
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }

    /// Whether the user can fix this by picking a different report or fight.
    pub fn is_user_actionable(&self) -> bool {
        matches!(
            self,
            Self::FightNotFound { .. }
                | Self::NoTethersFound
                | Self::MissingFightSelector
                | Self::MissingTimeWindow { .. }
        )
    }
}

pub type Result<T, E = TetherError> = std::result::Result<T, E>;

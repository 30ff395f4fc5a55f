//! Error taxonomy shared by the converter, the classifier and the shells.

use thiserror::Error;

/// Text shown to the user whenever a creature could not be displayed.
pub const RETRY_MESSAGE: &str = "Failed to catch that Pokémon! Try again?";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// The data source could not be reached or answered with a failure status.
    #[error("data unavailable: {0}")]
    DataUnavailable(String),

    #[error("creature {0} not found")]
    NotFound(u32),

    /// Required numeric fields missing, negative or non-finite.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// A reference constant is unusable. Fatal at start-up.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

pub type CalcResult<T> = Result<T, CalcError>;

impl CalcError {
    /// Failures the user can retry past. Configuration errors are not among them.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, CalcError::InvalidConfiguration(_))
    }

    /// User-facing text. Malformed records read exactly like an unreachable source.
    pub fn user_message(&self) -> String {
        match self {
            CalcError::DataUnavailable(_) | CalcError::NotFound(_) | CalcError::MalformedRecord(_) => {
                RETRY_MESSAGE.to_string()
            }
            CalcError::InvalidConfiguration(msg) => format!("Calculator misconfigured: {}", msg),
        }
    }
}

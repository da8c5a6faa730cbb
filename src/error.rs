//! Error taxonomy for the RiskGo client.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RiskError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("end of input while reading {label:?}")]
    EndOfInput { label: String },

    #[error("no valid input for {label:?} after {attempts} attempts")]
    TooManyAttempts { label: String, attempts: usize },

    /// Every network-phase failure: refused, timed out, bad status or an
    /// undecodable body. Deliberately not split further.
    #[error("{0}")]
    Transport(String),

    #[error("scenario label {0:?} is not numeric")]
    ScenarioLabel(String),

    #[error("malformed metrics for {ticker}: {reason}")]
    Metrics { ticker: String, reason: String },

    #[error("Config error: {0}")]
    Config(String),
}

pub type RiskResult<T> = Result<T, RiskError>;

impl RiskError {
    pub fn transport(msg: impl std::fmt::Display) -> Self {
        Self::Transport(msg.to_string())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn is_render(&self) -> bool {
        matches!(self, Self::ScenarioLabel(_) | Self::Metrics { .. })
    }
}

use thiserror::Error;

/// Why a remote call to the game server produced no usable answer
#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("game server unavailable: {0}")]
    RemoteUnavailable(#[from] reqwest::Error),
    #[error("unrecognized response from game server: {0}")]
    UnrecognizedOutcome(String),
    #[error("invalid server url: {0}")]
    InvalidServerUrl(#[from] url::ParseError),
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid server url {url:?}: {reason}")]
    InvalidServerUrl { url: String, reason: String },
    #[error("game length must be at least one second")]
    ZeroDuration,
}

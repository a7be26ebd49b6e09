use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid argument {flag}: {reason}")]
    InvalidArgument { flag: String, reason: String },
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("message channel disconnected")]
    Disconnected,
}

/// Rejected interactive input. Logged and ignored, never fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command {0:?}")]
    Unknown(String),
    #[error("`d` needs a lap number")]
    MissingLapNumber,
    #[error("bad lap number {0:?}")]
    BadLapNumber(String),
}

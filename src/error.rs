use thiserror::Error;

/// Errors raised while setting a logger up.
///
/// Writing never fails: a missing or stopped channel falls back to console
/// output. Only misconfiguration is reported.
#[derive(Error, Debug)]
pub enum LoggerError {
    /// Binding to a channel name that is not registered, under
    /// [`MissingChannelPolicy::Strict`](crate::MissingChannelPolicy::Strict).
    #[error("Log file channel {0} does not exist")]
    NonExistingChannel(String),

    /// Creating the channel directory or file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LoggerError>;

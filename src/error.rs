use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::session::SessionId;

#[derive(Error, Debug)]
pub enum EditorError {
    /// The destination could not be opened or written. The session is left
    /// open with its content intact.
    #[error("could not save {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no such window: {0}")]
    UnknownSession(SessionId),

    #[error("window {0} has no pending close prompt")]
    NoPendingPrompt(SessionId),

    #[error("invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, EditorError>;

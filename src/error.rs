// Error taxonomy for a setup run. A declined overwrite is not an error;
// it is reported through `ui::SetupOutcome::Declined` instead.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Token is required to continue")]
    MissingToken,

    #[error("Error saving configuration to {path}: {source}")]
    Save {
        path: PathBuf,
        source: io::Error,
    },

    #[error("Setup cancelled by user")]
    Cancelled,

    #[error("Terminal I/O failed: {0}")]
    Io(io::Error),

    #[error("Failed to build server entry: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl SetupError {
    /// Process exit status for this failure. Every failure terminates the
    /// run with status 1.
    pub fn exit_code(&self) -> u8 {
        1
    }
}

impl From<io::Error> for SetupError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::Interrupted {
            SetupError::Cancelled
        } else {
            SetupError::Io(err)
        }
    }
}

//! Error types and their mapping onto shell exit statuses.
//!
//! The `Display` of every error is the body of its diagnostic line.

use crate::command::{ExitCode, status};
use nix::errno::Errno;
use std::io;

/// Why a command name could not be turned into a runnable path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("not found")]
    NotFound,

    #[error("Permission denied")]
    PermissionDenied,
}

impl ResolveError {
    pub fn status(self) -> ExitCode {
        match self {
            ResolveError::NotFound => status::NOT_FOUND,
            ResolveError::PermissionDenied => status::PERMISSION_DENIED,
        }
    }
}

/// Failures while creating or waiting for a child process.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    /// The OS refused to create another process.
    #[error("Cannot fork: {0}")]
    Spawn(#[source] io::Error),

    /// The image could not be executed even though resolution succeeded.
    #[error(transparent)]
    Exec(ResolveError),

    #[error("Cannot wait for child: {0}")]
    Wait(#[source] io::Error),
}

impl LaunchError {
    /// Classify an error returned by `Command::spawn`.
    ///
    /// Exec-time failures reuse the resolver's diagnostics so that a file that
    /// disappears between the check and the exec reads the same as one that was
    /// never there.
    pub fn from_spawn(err: io::Error) -> Self {
        match err.raw_os_error().map(Errno::from_raw) {
            Some(Errno::EAGAIN | Errno::ENOMEM | Errno::EMFILE | Errno::ENFILE) => {
                LaunchError::Spawn(err)
            }
            Some(Errno::EACCES | Errno::EPERM | Errno::EISDIR) => {
                LaunchError::Exec(ResolveError::PermissionDenied)
            }
            _ => LaunchError::Exec(ResolveError::NotFound),
        }
    }

    pub fn status(&self) -> ExitCode {
        match self {
            LaunchError::Spawn(_) => status::SPAWN_FAILED,
            LaunchError::Wait(_) => status::FAILURE,
            LaunchError::Exec(err) => err.status(),
        }
    }
}

/// Errors reported by builtins.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuiltinError {
    #[error("Illegal number: {0}")]
    IllegalNumber(String),
}

impl BuiltinError {
    pub fn status(&self) -> ExitCode {
        match self {
            BuiltinError::IllegalNumber(_) => status::ILLEGAL_NUMBER,
        }
    }
}

// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for local command execution.

use std::fmt;
use std::io;
use std::process::ExitStatus;

use thiserror::Error;

/// Which child output stream an I/O failure occurred on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    /// The child's standard output.
    Stdout,
    /// The child's standard error.
    Stderr,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => f.write_str("stdout"),
            Self::Stderr => f.write_str("stderr"),
        }
    }
}

/// Errors from locating, spawning, draining, and reaping a local command.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The executable could not be found on the search path.
    #[error("executable `{program}` not found in PATH")]
    NotFound {
        /// Name the lookup was attempted for.
        program: String,
    },

    /// The child process could not be spawned.
    #[error("failed to start `{program}`: {source}")]
    Start {
        /// Program the spawn was attempted for.
        program: String,
        /// Underlying spawn failure.
        #[source]
        source: io::Error,
    },

    /// An I/O error occurred while draining one of the output streams.
    #[error("failed while capturing {stream}: {source}")]
    Stream {
        /// Stream the drain failed on.
        stream: StreamKind,
        /// Underlying read failure.
        #[source]
        source: io::Error,
    },

    /// The child ran to completion but reported failure.
    #[error("`{program}` exited with {status}")]
    Exit {
        /// Program that failed.
        program: String,
        /// The child's exit status.
        status: ExitStatus,
    },

    /// Waiting on the child failed.
    #[error("failed to wait for `{program}`: {source}")]
    Wait {
        /// Program that was being waited on.
        program: String,
        /// Underlying wait failure.
        #[source]
        source: io::Error,
    },

    /// A failed invocation enriched with the diagnostics captured from both
    /// streams, so callers of the merged-output path never lose context.
    #[error("{stderr}\nFull output:\n{stdout}\n{stderr}")]
    Failed {
        /// Trimmed stdout captured before the failure.
        stdout: String,
        /// Trimmed stderr captured before the failure.
        stderr: String,
        /// The failure itself.
        #[source]
        source: Box<ExecError>,
    },
}

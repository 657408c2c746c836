// SPDX-License-Identifier: MIT OR Apache-2.0
//! The command runner: a reusable description of one local executable.

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::drain::drain_pair;
use crate::error::ExecError;
use crate::output::{decode, trim_output};

/// A local executable plus the arguments and environment overlay applied to
/// every invocation.
///
/// The value is immutable once built and carries no state between runs; it
/// can be shared and invoked from any number of tasks at once. Each
/// invocation owns its child process, pipes, and buffers.
#[derive(Debug, Clone)]
pub struct LocalCommand {
    program: String,
    base_args: Vec<String>,
    env: BTreeMap<String, String>,
}

impl LocalCommand {
    /// Describe `program` with no fixed arguments and no environment
    /// overlay.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            base_args: Vec::new(),
            env: BTreeMap::new(),
        }
    }

    /// Add arguments that are prepended to every invocation, before the
    /// call-time arguments.
    pub fn with_base_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Overlay one environment variable on top of the inherited
    /// environment. Overlays win over inherited values on key collision.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// The executable name this command describes.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Resolve the executable against the search path.
    pub fn lookup(&self) -> Result<PathBuf, ExecError> {
        ck_which::which(&self.program).ok_or_else(|| ExecError::NotFound {
            program: self.program.clone(),
        })
    }

    /// Whether the executable can be resolved at all; the failure reason is
    /// discarded.
    pub fn is_available(&self) -> bool {
        self.lookup().is_ok()
    }

    /// Run the command and return stdout and stderr merged into one trimmed
    /// string, stdout first.
    ///
    /// Which stream produced which line is deliberately not recoverable
    /// here; use [`run_split`](Self::run_split) when that matters. On any
    /// failure the returned error embeds the trimmed output of both streams
    /// under a `Full output` section, so diagnostics survive even though
    /// the success path merges them.
    pub async fn run<I, S>(&self, args: I) -> Result<String, ExecError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (stdout, stderr, failure) = self.capture(self.argv(args)).await;
        if let Some(source) = failure {
            return Err(ExecError::Failed {
                stdout: trim_output(&stdout).to_owned(),
                stderr: trim_output(&stderr).to_owned(),
                source: Box::new(source),
            });
        }
        let merged = format!("{stdout}\n{stderr}");
        Ok(trim_output(&merged).to_owned())
    }

    /// Run the command and return the raw, untrimmed stdout and stderr.
    ///
    /// Failures are returned as-is, without the output embedding [`run`]
    /// performs.
    ///
    /// [`run`]: Self::run
    pub async fn run_split<I, S>(&self, args: I) -> Result<(String, String), ExecError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (stdout, stderr, failure) = self.capture(self.argv(args)).await;
        match failure {
            Some(err) => Err(err),
            None => Ok((stdout, stderr)),
        }
    }

    fn argv<I, S>(&self, args: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base_args
            .iter()
            .cloned()
            .chain(args.into_iter().map(Into::into))
            .collect()
    }

    /// Spawn, drain both streams, then reap. The child is waited on even
    /// when a drain fails, so no invocation leaks a zombie.
    async fn capture(&self, argv: Vec<String>) -> (String, String, Option<ExecError>) {
        let mut cmd = Command::new(&self.program);
        cmd.args(&argv)
            .envs(&self.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!(target: "ck_exec.run", program = %self.program, args = argv.len(), "spawning");

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(source) => {
                return (
                    String::new(),
                    String::new(),
                    Some(ExecError::Start {
                        program: self.program.clone(),
                        source,
                    }),
                );
            }
        };

        let (stdout_pipe, stderr_pipe) = match (child.stdout.take(), child.stderr.take()) {
            (Some(out), Some(err)) => (out, err),
            _ => {
                // Requested pipes were not attached; nothing to drain, but
                // the child must still be reaped.
                let _ = child.kill().await;
                let _ = child.wait().await;
                return (
                    String::new(),
                    String::new(),
                    Some(ExecError::Start {
                        program: self.program.clone(),
                        source: io::Error::other("child stdio pipes were not captured"),
                    }),
                );
            }
        };

        let (out_bytes, err_bytes, drain_failure) = drain_pair(stdout_pipe, stderr_pipe).await;

        // Reap on every path; a drain failure must not leak the child.
        let wait_outcome = child.wait().await;

        debug!(target: "ck_exec.run", program = %self.program, "child reaped");

        let failure = if let Some(err) = drain_failure {
            Some(err)
        } else {
            match wait_outcome {
                Ok(status) if status.success() => None,
                Ok(status) => Some(ExecError::Exit {
                    program: self.program.clone(),
                    status,
                }),
                Err(source) => Some(ExecError::Wait {
                    program: self.program.clone(),
                    source,
                }),
            }
        };

        (decode(&out_bytes), decode(&err_bytes), failure)
    }
}

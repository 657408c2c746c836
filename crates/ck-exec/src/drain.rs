// SPDX-License-Identifier: MIT OR Apache-2.0
//! Concurrent two-stream output collector.
//!
//! Reading a child's stdout and stderr one after the other deadlocks as
//! soon as the unread pipe fills: the child blocks on a full buffer while
//! the parent is stuck waiting on the other stream. The collector spawns
//! one drain task per stream and joins both, so neither pipe is ever left
//! unread.

use std::io;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::task::JoinError;

use crate::error::{ExecError, StreamKind};

/// Drain two byte streams to completion, concurrently.
///
/// Both streams are always read to end-of-stream, even when one of them
/// fails mid-drain; bytes collected before a failure are retained. When
/// both drains fail, the first stream's (stdout's) error wins. The relative
/// completion order of the two tasks is not observable in the result.
pub async fn drain_pair<A, B>(a: A, b: B) -> (Vec<u8>, Vec<u8>, Option<ExecError>)
where
    A: AsyncRead + Unpin + Send + 'static,
    B: AsyncRead + Unpin + Send + 'static,
{
    let task_a = tokio::spawn(drain(a));
    let task_b = tokio::spawn(drain(b));

    // Join barrier: suspend until both tasks are done, whatever their outcome.
    let (joined_a, joined_b) = tokio::join!(task_a, task_b);

    let (bytes_a, err_a) = flatten(joined_a, StreamKind::Stdout);
    let (bytes_b, err_b) = flatten(joined_b, StreamKind::Stderr);

    let error = match (err_a, err_b) {
        (Some(source), _) => Some(ExecError::Stream {
            stream: StreamKind::Stdout,
            source,
        }),
        (None, Some(source)) => Some(ExecError::Stream {
            stream: StreamKind::Stderr,
            source,
        }),
        (None, None) => None,
    };

    (bytes_a, bytes_b, error)
}

/// Read one stream to EOF, keeping everything read before an error.
async fn drain<R>(mut reader: R) -> (Vec<u8>, Option<io::Error>)
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];
    loop {
        match reader.read(&mut chunk).await {
            Ok(0) => return (buf, None),
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
            Err(err) => return (buf, Some(err)),
        }
    }
}

fn flatten(
    joined: Result<(Vec<u8>, Option<io::Error>), JoinError>,
    stream: StreamKind,
) -> (Vec<u8>, Option<io::Error>) {
    match joined {
        Ok(done) => done,
        Err(_panic) => (
            Vec::new(),
            Some(io::Error::other(format!("{stream} drain task panicked"))),
        ),
    }
}

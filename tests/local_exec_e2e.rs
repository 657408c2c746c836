// SPDX-License-Identifier: MIT OR Apache-2.0
//! Workspace-level end-to-end properties: pipe-deadlock absence under
//! multi-megabyte output, isolation of concurrent invocations, and
//! lookup consistency across the crates.

use ck_exec::LocalCommand;

/// Shell runner: base args carry `-c`, call args carry the script.
#[cfg(unix)]
fn sh() -> LocalCommand {
    LocalCommand::new("sh").with_base_args(["-c"])
}

// ---------------------------------------------------------------------------
// Deadlock absence
// ---------------------------------------------------------------------------

#[cfg(unix)]
#[tokio::test]
async fn megabyte_streams_on_both_pipes_do_not_deadlock() {
    // 3 MiB per stream, far beyond any OS pipe buffer. A sequential
    // reader would wedge here: the child blocks writing stderr while the
    // parent is still waiting on stdout.
    let script = "head -c 3145728 /dev/zero | tr '\\0' 'a'\n\
                  head -c 3145728 /dev/zero | tr '\\0' 'b' >&2";

    let (stdout, stderr) = sh().run_split([script]).await.expect("run_split");

    assert_eq!(stdout.len(), 3_145_728);
    assert_eq!(stderr.len(), 3_145_728);
    assert!(stdout.bytes().all(|b| b == b'a'));
    assert!(stderr.bytes().all(|b| b == b'b'));
}

#[cfg(unix)]
#[tokio::test]
async fn interleaved_chunks_are_collected_in_full() {
    // The child alternates between streams so both pipes fill repeatedly
    // while the other is being written.
    let script = "i=0; while [ $i -lt 512 ]; do\n\
                  head -c 4096 /dev/zero | tr '\\0' 'o'\n\
                  head -c 4096 /dev/zero | tr '\\0' 'e' >&2\n\
                  i=$((i+1)); done";

    let (stdout, stderr) = sh().run_split([script]).await.expect("run_split");

    assert_eq!(stdout.len(), 512 * 4096);
    assert_eq!(stderr.len(), 512 * 4096);
}

// ---------------------------------------------------------------------------
// Concurrent invocations
// ---------------------------------------------------------------------------

#[cfg(unix)]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_invocations_do_not_interfere() {
    let mut tasks = Vec::new();
    for i in 0..8 {
        tasks.push(tokio::spawn(async move {
            let expected = format!("probe-{i}");
            let out = sh()
                .run([format!("printf 'probe-{i}'")])
                .await
                .expect("run");
            (expected, out)
        }));
    }

    for task in tasks {
        let (expected, out) = task.await.expect("join");
        assert_eq!(out, expected);
    }
}

#[cfg(unix)]
#[tokio::test(flavor = "multi_thread")]
async fn one_value_runs_concurrently_against_itself() {
    let cmd = sh();
    let (a, b) = tokio::join!(cmd.run(["printf left"]), cmd.run(["printf right"]));
    assert_eq!(a.expect("left"), "left");
    assert_eq!(b.expect("right"), "right");
}

// ---------------------------------------------------------------------------
// Lookup consistency
// ---------------------------------------------------------------------------

#[test]
fn availability_matches_lookup() {
    #[cfg(unix)]
    {
        let sh = LocalCommand::new("sh");
        assert_eq!(sh.is_available(), sh.lookup().is_ok());
        assert!(sh.is_available());
    }

    let ghost = LocalCommand::new("ck-no-such-tool");
    assert_eq!(ghost.is_available(), ghost.lookup().is_ok());
    assert!(!ghost.is_available());
}

#[cfg(unix)]
#[test]
fn runner_lookup_agrees_with_which() {
    let sh = LocalCommand::new("sh");
    assert_eq!(sh.lookup().ok(), ck_which::which("sh"));
}

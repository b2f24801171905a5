//! Helpers for synchronous platform-tool invocations
//!
//! Every listing and lifecycle transition is one blocking `output()` call;
//! these wrappers normalize spawn failures (absent tool vs. IO error) and
//! non-zero exits into the shared error taxonomy.

use std::ffi::OsStr;
use std::process::Output;

use tokio::process::Command;

use vdev_core::prelude::*;

/// Run a tool to completion, capturing output.
///
/// A spawn failure with `ErrorKind::NotFound` becomes [`Error::ToolMissing`];
/// the exit status is left for the caller to interpret.
pub async fn run<I, S>(program: &str, args: I) -> Result<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let args: Vec<_> = args.into_iter().collect();
    trace!("running {}", rendered(program, &args));

    Command::new(program)
        .args(&args)
        .output()
        .await
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::tool_missing(program)
            } else {
                Error::Io(e)
            }
        })
}

/// Run a tool to completion and require a zero exit status.
pub async fn run_checked<I, S>(program: &str, args: I) -> Result<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let args: Vec<_> = args.into_iter().collect();
    let command = rendered(program, &args);

    let output = run(program, &args).await?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::command_failed(command, output.status.code(), stderr));
    }

    Ok(output)
}

/// Lossy UTF-8 view of a command's stdout
pub fn stdout_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn rendered<S: AsRef<OsStr>>(program: &str, args: &[S]) -> String {
    std::iter::once(program.to_string())
        .chain(
            args.iter()
                .map(|a| a.as_ref().to_string_lossy().into_owned()),
        )
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_tool_maps_to_tool_missing() {
        let err = run("definitely-not-a-real-tool-vdev", ["--version"])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ToolMissing { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_checked_surfaces_exit_code() {
        let err = run_checked("sh", ["-c", "echo boom >&2; exit 3"])
            .await
            .unwrap_err();
        match err {
            Error::CommandFailed { code, stderr, .. } => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_checked_success() {
        let output = run_checked("sh", ["-c", "printf hello"]).await.unwrap();
        assert_eq!(stdout_text(&output), "hello");
    }
}

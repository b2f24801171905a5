//! Clipboard placement of capture artifacts
//!
//! macOS gets proper image/file clipboard entries via osascript. Other
//! unixes fall back to copying the path text through whichever of the usual
//! clipboard tools is present.

use std::path::Path;

use vdev_core::prelude::*;

use crate::artifact::ArtifactKind;

/// Place an artifact on the system clipboard
///
/// Image artifacts get an image-typed clipboard entry, everything else a
/// generic file reference.
#[cfg_attr(not(target_os = "macos"), allow(unused_variables))]
pub async fn copy_file(path: &Path, kind: ArtifactKind) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        copy_file_macos(path, kind).await
    }

    #[cfg(not(target_os = "macos"))]
    {
        copy_path_text(path).await
    }
}

#[cfg(target_os = "macos")]
async fn copy_file_macos(path: &Path, kind: ArtifactKind) -> Result<()> {
    let script = match kind {
        ArtifactKind::Image => format!(
            "set the clipboard to (read (POSIX file \"{}\") as TIFF picture)",
            path.display()
        ),
        _ => format!("set the clipboard to POSIX file \"{}\"", path.display()),
    };

    vdev_devices::exec::run_checked("osascript", ["-e", script.as_str()]).await?;
    Ok(())
}

#[cfg(not(target_os = "macos"))]
async fn copy_path_text(path: &Path) -> Result<()> {
    use std::process::Stdio;
    use tokio::io::AsyncWriteExt;
    use tokio::process::Command;

    const TOOLS: &[(&str, &[&str])] = &[("wl-copy", &[]), ("xclip", &["-selection", "clipboard"])];

    for (tool, args) in TOOLS {
        if which::which(tool).is_err() {
            continue;
        }

        let mut child = Command::new(tool)
            .args(*args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        let mut stdin = child.stdin.take().expect("stdin was configured");
        stdin
            .write_all(path.as_os_str().as_encoded_bytes())
            .await?;
        drop(stdin);

        let status = child.wait().await?;
        if !status.success() {
            return Err(Error::command_failed(*tool, status.code(), ""));
        }

        debug!("copied path to clipboard via {}", tool);
        return Ok(());
    }

    Err(Error::tool_missing("wl-copy or xclip"))
}

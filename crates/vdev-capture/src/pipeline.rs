//! Post-processing of recording artifacts
//!
//! Runs only after a successful recording session: an optional GIF
//! transcode (which replaces the source video as the final artifact) and an
//! optional clipboard hand-off. Encoder problems abort post-processing with
//! the source video preserved; clipboard problems are only warnings.

use std::ffi::OsStr;

use vdev_core::prelude::*;
use vdev_devices::exec;

use crate::artifact::{Artifact, ArtifactKind};
use crate::clipboard;

/// ffmpeg filter chain: 10fps, 480px wide, aspect preserved, lanczos resample
const GIF_FILTER: &str = "fps=10,scale=480:-1:flags=lanczos";

/// Result of post-processing
#[derive(Debug)]
pub struct Finalized {
    /// The final artifact (the GIF when conversion ran)
    pub artifact: Artifact,

    /// Clipboard outcome: None when not requested
    pub clipboard_copied: Option<bool>,
}

/// Optional transcode and clipboard placement for a finished recording
#[derive(Debug, Clone, Copy, Default)]
pub struct Pipeline {
    pub convert_gif: bool,
    pub copy_to_clipboard: bool,
}

impl Pipeline {
    pub async fn finalize(&self, artifact: Artifact) -> Result<Finalized> {
        let mut artifact = artifact;

        if self.convert_gif {
            artifact = convert_to_gif(artifact).await?;
        }

        let clipboard_copied = if self.copy_to_clipboard {
            match clipboard::copy_file(&artifact.path, artifact.kind).await {
                Ok(()) => {
                    info!("copied {} to clipboard", artifact.path.display());
                    Some(true)
                }
                Err(err) => {
                    warn!("could not copy to clipboard: {}", err);
                    Some(false)
                }
            }
        } else {
            None
        };

        Ok(Finalized {
            artifact,
            clipboard_copied,
        })
    }
}

/// Transcode a video artifact to a sibling GIF and remove the source
///
/// The encoder must be present ([`Error::ToolMissing`] otherwise); on
/// encoder failure the source video is left untouched.
pub async fn convert_to_gif(artifact: Artifact) -> Result<Artifact> {
    which::which("ffmpeg").map_err(|_| Error::tool_missing("ffmpeg"))?;

    let gif_path = artifact.path.with_extension("gif");
    info!(
        "converting {} to {}",
        artifact.path.display(),
        gif_path.display()
    );

    exec::run_checked(
        "ffmpeg",
        [
            OsStr::new("-i"),
            artifact.path.as_os_str(),
            OsStr::new("-vf"),
            OsStr::new(GIF_FILTER),
            OsStr::new("-c"),
            OsStr::new("gif"),
            OsStr::new("-f"),
            OsStr::new("gif"),
            gif_path.as_os_str(),
        ],
    )
    .await?;

    if let Err(err) = std::fs::remove_file(&artifact.path) {
        warn!(
            "could not remove original video {}: {}",
            artifact.path.display(),
            err
        );
    }

    Ok(Artifact {
        path: gif_path,
        kind: ArtifactKind::Gif,
        device: artifact.device,
    })
}

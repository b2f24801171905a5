//! Screenshot and recording command handlers

use std::path::Path;

use vdev_capture::{
    capture_filename, clipboard, Artifact, ArtifactKind, Capture, DeviceCapturer, Pipeline,
    RecordingSession,
};
use vdev_core::prelude::*;
use vdev_devices::Resolver;

pub async fn screenshot(
    resolver: &Resolver<'_>,
    first: Option<String>,
    second: Option<String>,
    copy: bool,
) -> Result<()> {
    let (device, output) = split_target(resolver, first, second).await;
    let capturer = DeviceCapturer::resolve(resolver, device.as_deref()).await?;
    if device.is_none() {
        println!("Active device found: {}", capturer.name());
    }

    let output = output.unwrap_or_else(|| capture_filename("screenshot", capturer.name(), "png"));
    let path = capturer.screenshot(Path::new(&output)).await?;
    println!("Screenshot saved to: {}", path.display());

    if copy {
        match clipboard::copy_file(&path, ArtifactKind::from_path(&path)).await {
            Ok(()) => println!("Screenshot copied to clipboard."),
            Err(err) => eprintln!("Warning: could not copy to clipboard: {err}"),
        }
    }

    Ok(())
}

pub async fn record(
    resolver: &Resolver<'_>,
    first: Option<String>,
    second: Option<String>,
    copy: bool,
    duration: u64,
    gif: bool,
) -> Result<()> {
    let (device, output) = split_target(resolver, first, second).await;
    let capturer = DeviceCapturer::resolve(resolver, device.as_deref()).await?;
    if device.is_none() {
        println!("Active device found: {}", capturer.name());
    }

    let output = output.unwrap_or_else(|| capture_filename("recording", capturer.name(), "mp4"));

    if duration > 0 {
        println!("Recording for {duration} seconds...");
    }
    println!("Recording started. Press Ctrl+C to stop.");

    let session = RecordingSession::new(duration);
    let path = session.run(&capturer, Path::new(&output)).await?;
    println!("Recording saved to: {}", path.display());

    let pipeline = Pipeline {
        convert_gif: gif,
        copy_to_clipboard: copy,
    };
    let device_name = capturer.name().to_string();
    let finalized = pipeline.finalize(Artifact::new(path, device_name)).await?;

    if gif {
        println!("GIF saved to: {}", finalized.artifact.path.display());
    }

    match finalized.clipboard_copied {
        Some(true) => {
            let ext = finalized
                .artifact
                .path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("file")
                .to_ascii_uppercase();
            println!("{ext} file copied to clipboard.");
        }
        Some(false) => eprintln!("Warning: could not copy to clipboard"),
        None => {}
    }

    Ok(())
}

/// Disambiguate `[DEVICE] [OUTPUT]` positionals
///
/// A first argument that resolves to a running device is the target; one
/// that doesn't is the output file (and any second argument is dropped,
/// matching the two-positional surface).
async fn split_target(
    resolver: &Resolver<'_>,
    first: Option<String>,
    second: Option<String>,
) -> (Option<String>, Option<String>) {
    match first {
        None => (None, None),
        Some(arg) => {
            if DeviceCapturer::resolve(resolver, Some(&arg)).await.is_ok() {
                (Some(arg), second)
            } else {
                (None, Some(arg))
            }
        }
    }
}

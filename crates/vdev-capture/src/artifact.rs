//! Capture artifacts and file naming helpers

use std::path::{Path, PathBuf};

/// What kind of file a capture produced, inferred from the extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Image,
    Video,
    Gif,
}

impl ArtifactKind {
    /// Infer the kind from a path's extension (case-insensitive);
    /// anything unrecognized is treated as a generic video/file artifact.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("png" | "jpg" | "jpeg") => ArtifactKind::Image,
            Some("gif") => ArtifactKind::Gif,
            _ => ArtifactKind::Video,
        }
    }
}

/// A file produced by a capture operation
#[derive(Debug, Clone)]
pub struct Artifact {
    pub path: PathBuf,
    pub kind: ArtifactKind,

    /// Name of the device the capture was taken from
    pub device: String,
}

impl Artifact {
    pub fn new(path: impl Into<PathBuf>, device: impl Into<String>) -> Self {
        let path = path.into();
        let kind = ArtifactKind::from_path(&path);
        Self {
            path,
            kind,
            device: device.into(),
        }
    }
}

/// Normalize a path to carry the given extension
///
/// Case-insensitive and idempotent: an existing matching suffix (in any
/// case) is normalized rather than doubled, and a mismatching extension is
/// replaced. `ext` is given without the leading dot.
pub fn ensure_extension(path: impl AsRef<Path>, ext: &str) -> PathBuf {
    path.as_ref().with_extension(ext.to_ascii_lowercase())
}

/// Default capture filename: `<prefix>_<device>_<timestamp>.<ext>`
pub fn capture_filename(prefix: &str, device_name: &str, ext: &str) -> String {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let device = device_name.replace(' ', "_");
    format!("{prefix}_{device}_{timestamp}.{ext}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_extension_appends_when_missing() {
        assert_eq!(ensure_extension("clip", "mp4"), PathBuf::from("clip.mp4"));
    }

    #[test]
    fn test_ensure_extension_is_idempotent() {
        assert_eq!(ensure_extension("clip.mp4", "mp4"), PathBuf::from("clip.mp4"));
    }

    #[test]
    fn test_ensure_extension_normalizes_case() {
        assert_eq!(ensure_extension("clip.MP4", "mp4"), PathBuf::from("clip.mp4"));
    }

    #[test]
    fn test_ensure_extension_replaces_mismatched_extension() {
        assert_eq!(ensure_extension("clip.mov", "mp4"), PathBuf::from("clip.mp4"));
    }

    #[test]
    fn test_ensure_extension_keeps_directories() {
        assert_eq!(
            ensure_extension("captures/clip", "png"),
            PathBuf::from("captures/clip.png")
        );
    }

    #[test]
    fn test_artifact_kind_inference() {
        assert_eq!(ArtifactKind::from_path(Path::new("a.png")), ArtifactKind::Image);
        assert_eq!(ArtifactKind::from_path(Path::new("a.JPG")), ArtifactKind::Image);
        assert_eq!(ArtifactKind::from_path(Path::new("a.jpeg")), ArtifactKind::Image);
        assert_eq!(ArtifactKind::from_path(Path::new("a.gif")), ArtifactKind::Gif);
        assert_eq!(ArtifactKind::from_path(Path::new("a.mp4")), ArtifactKind::Video);
        assert_eq!(ArtifactKind::from_path(Path::new("a.mov")), ArtifactKind::Video);
        assert_eq!(ArtifactKind::from_path(Path::new("noext")), ArtifactKind::Video);
    }

    #[test]
    fn test_capture_filename_shape() {
        let name = capture_filename("screenshot", "iPhone 15 Pro", "png");

        assert!(name.starts_with("screenshot_iPhone_15_Pro_"));
        assert!(name.ends_with(".png"));
        // prefix + device + "%Y%m%d_%H%M%S" + extension
        assert_eq!(name.len(), "screenshot_iPhone_15_Pro_".len() + 15 + 4);
    }

    #[test]
    fn test_artifact_new_infers_kind() {
        let artifact = Artifact::new("recording_Pixel_20260806_101500.mp4", "Pixel");
        assert_eq!(artifact.kind, ArtifactKind::Video);
        assert_eq!(artifact.device, "Pixel");
    }
}

//! # vdev-capture - Screen Capture and Recording
//!
//! The capture side of vdev:
//!
//! - [`Capture`] - the screenshot/record/name capability, one implementation
//!   per platform, dispatched through [`DeviceCapturer`]
//! - [`RecordingSession`] - one cancellable recording per invocation, racing
//!   a duration timer against an OS interrupt
//! - [`Pipeline`] - optional GIF transcode and clipboard hand-off after a
//!   successful recording

pub mod artifact;
pub mod capturer;
pub mod clipboard;
pub mod pipeline;
pub mod session;

pub use artifact::{capture_filename, ensure_extension, Artifact, ArtifactKind};
pub use capturer::{Capture, DeviceCapturer, EmulatorCapturer, SimulatorCapturer};
pub use pipeline::{Finalized, Pipeline};
pub use session::{CancelSignal, RecordingSession, SessionState};

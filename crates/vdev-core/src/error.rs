//! Application error types with rich context

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Device Resolution Errors
    // ─────────────────────────────────────────────────────────────
    #[error("device '{identifier}' not found")]
    NotFound { identifier: String },

    #[error("device '{identifier}' is not a running simulator or emulator")]
    NotRunning { identifier: String },

    #[error("no active iOS simulator or Android emulator found")]
    NoActiveDevice,

    // ─────────────────────────────────────────────────────────────
    // External Tool Errors
    // ─────────────────────────────────────────────────────────────
    #[error("'{tool}' is not installed or not on PATH")]
    ToolMissing { tool: String },

    #[error("command `{command}` failed with exit code {code:?}: {stderr}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    // ─────────────────────────────────────────────────────────────
    // Operation-Level Errors
    // ─────────────────────────────────────────────────────────────
    #[error("'{identifier}' not found or failed to {verb}")]
    OperationFailed { identifier: String, verb: String },

    #[error("configuration error: {message}")]
    Config { message: String },
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            identifier: identifier.into(),
        }
    }

    pub fn not_running(identifier: impl Into<String>) -> Self {
        Self::NotRunning {
            identifier: identifier.into(),
        }
    }

    pub fn tool_missing(tool: impl Into<String>) -> Self {
        Self::ToolMissing { tool: tool.into() }
    }

    pub fn command_failed(
        command: impl Into<String>,
        code: Option<i32>,
        stderr: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            command: command.into(),
            code,
            stderr: stderr.into().trim().to_string(),
        }
    }

    pub fn operation_failed(identifier: impl Into<String>, verb: impl Into<String>) -> Self {
        Self::OperationFailed {
            identifier: identifier.into(),
            verb: verb.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = Error::not_found("Pixel_5");
        assert_eq!(err.to_string(), "device 'Pixel_5' not found");

        let err = Error::operation_failed("iPhone 15", "start");
        assert_eq!(err.to_string(), "'iPhone 15' not found or failed to start");

        let err = Error::tool_missing("ffmpeg");
        assert!(err.to_string().contains("ffmpeg"));
    }

    #[test]
    fn test_command_failed_trims_stderr() {
        let err = Error::command_failed("adb devices", Some(1), "  error: no devices\n");
        assert_eq!(
            err.to_string(),
            "command `adb devices` failed with exit code Some(1): error: no devices"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}

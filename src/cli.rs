//! Command-line surface

use clap::{Parser, Subcommand};

/// Manage iOS simulators and Android emulators from one CLI
#[derive(Debug, Parser)]
#[command(name = "vdev", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List available iOS simulators and Android emulators
    #[command(visible_aliases = ["l", "ls"])]
    List,

    /// Start a device by name or id; use 'lts' for the last started device
    #[command(visible_alias = "s")]
    Start {
        /// Device name, UDID, or AVD name
        #[arg(value_name = "DEVICE")]
        device: String,
    },

    /// Stop a running device
    #[command(visible_alias = "st")]
    Stop {
        #[arg(value_name = "DEVICE")]
        device: String,
    },

    /// Shutdown a running device
    #[command(visible_alias = "sd")]
    Shutdown {
        #[arg(value_name = "DEVICE")]
        device: String,
    },

    /// Restart a device (shutdown if needed, then boot)
    #[command(visible_alias = "r")]
    Restart {
        #[arg(value_name = "DEVICE")]
        device: String,
    },

    /// Permanently delete a device
    #[command(visible_aliases = ["d", "del"])]
    Delete {
        #[arg(value_name = "DEVICE")]
        device: String,
    },

    /// Show the last started device
    Last,

    /// Start the last started device
    Lts,

    /// Take a screenshot of a running device
    ///
    /// Without a device argument the active device is used; a single
    /// argument that doesn't resolve to a device is taken as the output
    /// file.
    #[command(visible_aliases = ["ss", "shot"])]
    Screenshot {
        #[arg(value_name = "DEVICE")]
        device: Option<String>,

        #[arg(value_name = "OUTPUT")]
        output: Option<String>,

        /// Copy the screenshot to the clipboard
        #[arg(short, long)]
        copy: bool,
    },

    /// Record the screen of a running device
    ///
    /// Stops after --duration seconds, or on Ctrl+C.
    #[command(visible_alias = "rec")]
    Record {
        #[arg(value_name = "DEVICE")]
        device: Option<String>,

        #[arg(value_name = "OUTPUT")]
        output: Option<String>,

        /// Copy the final artifact to the clipboard
        #[arg(short, long)]
        copy: bool,

        /// Recording duration in seconds (0 = until interrupted)
        #[arg(short, long, default_value_t = 0)]
        duration: u64,

        /// Convert the recording to a GIF
        #[arg(short, long)]
        gif: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parses() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_aliases() {
        let cli = Cli::try_parse_from(["vdev", "ls"]).unwrap();
        assert!(matches!(cli.command, Command::List));

        let cli = Cli::try_parse_from(["vdev", "s", "Pixel_5"]).unwrap();
        assert!(matches!(cli.command, Command::Start { device } if device == "Pixel_5"));

        let cli = Cli::try_parse_from(["vdev", "rec", "--gif", "-d", "5"]).unwrap();
        match cli.command {
            Command::Record { duration, gif, copy, .. } => {
                assert_eq!(duration, 5);
                assert!(gif);
                assert!(!copy);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_screenshot_positionals() {
        let cli = Cli::try_parse_from(["vdev", "screenshot", "Pixel_5", "out.png", "--copy"]).unwrap();
        match cli.command {
            Command::Screenshot { device, output, copy } => {
                assert_eq!(device.as_deref(), Some("Pixel_5"));
                assert_eq!(output.as_deref(), Some("out.png"));
                assert!(copy);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}

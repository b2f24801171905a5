//! Command handlers and the composition root
//!
//! Everything is wired explicitly at dispatch time: tool availability is
//! probed once, then the directory, resolver, lifecycle controller, and
//! capture pipeline are constructed on top of each other.

mod lifecycle;
mod list;
mod media;

use vdev_core::prelude::*;
use vdev_core::LastStartedStore;
use vdev_devices::{DeviceDirectory, LifecycleController, Resolver, ToolAvailability};

use crate::cli::{Cli, Command};

pub async fn run(cli: Cli) -> Result<()> {
    let tools = ToolAvailability::check().await;
    let directory = DeviceDirectory::new(tools);
    let store = LastStartedStore::default_location()?;
    let resolver = Resolver::new(&directory);
    let controller = LifecycleController::new(resolver, &store);

    match cli.command {
        Command::List => list::run(&directory).await,
        Command::Start { device } => lifecycle::start(&controller, &store, &device).await,
        Command::Stop { device } => lifecycle::stop(&controller, &device).await,
        Command::Shutdown { device } => lifecycle::shutdown(&controller, &device).await,
        Command::Restart { device } => lifecycle::restart(&controller, &device).await,
        Command::Delete { device } => lifecycle::delete(&controller, &device).await,
        Command::Last => lifecycle::last(&store),
        Command::Lts => lifecycle::start_last(&controller, &store).await,
        Command::Screenshot {
            device,
            output,
            copy,
        } => media::screenshot(&resolver, device, output, copy).await,
        Command::Record {
            device,
            output,
            copy,
            duration,
            gif,
        } => media::record(&resolver, device, output, copy, duration, gif).await,
    }
}

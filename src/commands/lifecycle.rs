//! Lifecycle command handlers

use vdev_core::prelude::*;
use vdev_core::LastStartedStore;
use vdev_devices::{LifecycleController, Started};

/// Magic identifier that resolves through the last-started record
const LAST_STARTED: &str = "lts";

pub async fn start(
    controller: &LifecycleController<'_>,
    store: &LastStartedStore,
    identifier: &str,
) -> Result<()> {
    let target = if identifier == LAST_STARTED {
        match last_started_name(store) {
            Some(name) => name,
            None => return Ok(()),
        }
    } else {
        identifier.to_string()
    };

    println!("Starting '{target}'...");
    report_started(controller.start(&target).await?);
    Ok(())
}

pub async fn start_last(
    controller: &LifecycleController<'_>,
    store: &LastStartedStore,
) -> Result<()> {
    let Some(target) = last_started_name(store) else {
        return Ok(());
    };

    report_started(controller.start(&target).await?);
    Ok(())
}

pub async fn stop(controller: &LifecycleController<'_>, identifier: &str) -> Result<()> {
    println!("Stopping '{identifier}'...");
    let device = controller.stop(identifier).await?;
    println!(
        "{} '{}' stopped successfully",
        device.platform.label(),
        device.name
    );
    Ok(())
}

pub async fn shutdown(controller: &LifecycleController<'_>, identifier: &str) -> Result<()> {
    println!("Shutting down '{identifier}'...");
    let device = controller.shutdown(identifier).await?;
    println!(
        "{} '{}' shut down successfully",
        device.platform.label(),
        device.name
    );
    Ok(())
}

pub async fn restart(controller: &LifecycleController<'_>, identifier: &str) -> Result<()> {
    println!("Restarting '{identifier}'...");
    let started = controller.restart(identifier).await?;
    println!(
        "{} '{}' restarted successfully",
        started.device.platform.label(),
        started.device.name
    );
    Ok(())
}

pub async fn delete(controller: &LifecycleController<'_>, identifier: &str) -> Result<()> {
    println!("Deleting '{identifier}'...");
    let device = controller.delete(identifier).await?;
    println!(
        "{} '{}' deleted successfully",
        device.platform.label(),
        device.name
    );
    Ok(())
}

pub fn last(store: &LastStartedStore) -> Result<()> {
    let Some(device) = store.load()? else {
        println!("No last started device found. Start a device first.");
        return Ok(());
    };

    println!("Last started device:");
    println!("  Name:    {}", device.name);
    println!("  Type:    {}", device.platform.label());
    println!("  Id:      {}", device.id);
    if let Some(runtime) = &device.runtime {
        println!("  Runtime: {runtime}");
    }

    Ok(())
}

fn last_started_name(store: &LastStartedStore) -> Option<String> {
    match store.load() {
        Ok(Some(device)) => {
            println!(
                "Starting last device: {} ({})",
                device.name,
                device.platform.label()
            );
            Some(device.name)
        }
        Ok(None) => {
            println!("No last started device found. Start a device first to use 'lts'.");
            None
        }
        Err(err) => {
            warn!("could not read last started device: {}", err);
            println!("No last started device found. Start a device first to use 'lts'.");
            None
        }
    }
}

fn report_started(started: Started) {
    let label = started.device.platform.label();
    if started.already_running {
        println!("{} '{}' is already running", label, started.device.name);
    } else {
        println!("{} '{}' started successfully", label, started.device.name);
    }
}

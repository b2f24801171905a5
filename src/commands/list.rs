//! Device listing with plain column rendering

use vdev_core::prelude::*;
use vdev_core::Device;
use vdev_devices::DeviceDirectory;

const HEADERS: [&str; 5] = ["TYPE", "NAME", "STATE", "UDID", "RUNTIME"];

pub async fn run(directory: &DeviceDirectory) -> Result<()> {
    if let Some(note) = directory.tools().ios_unavailable_message() {
        eprintln!("Note: {note}");
    }

    let listing = directory.list_all().await;
    for warning in &listing.warnings {
        eprintln!("Warning: {warning}");
    }

    if listing.devices.is_empty() {
        println!("No simulators or emulators found");
        return Ok(());
    }

    render(&listing.devices);
    Ok(())
}

fn render(devices: &[Device]) {
    let rows: Vec<[String; 5]> = devices.iter().map(row).collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    print_row(&HEADERS.map(str::to_string), &widths);
    for row in &rows {
        print_row(row, &widths);
    }
}

fn row(device: &Device) -> [String; 5] {
    [
        device.platform.label().to_string(),
        device.name.clone(),
        device.state.to_string(),
        device.id.clone(),
        device.runtime.clone().unwrap_or_else(|| "-".to_string()),
    ]
}

fn print_row(cells: &[String; 5], widths: &[usize; 5]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<w$}", w = *width))
        .collect::<Vec<_>>()
        .join("  ");
    println!("{}", line.trim_end());
}

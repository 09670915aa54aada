// SPDX-License-Identifier: MPL-2.0

//! Printer polling example.
//!
//! Polls one or more printers and prints every published change for the
//! given number of minutes (5 by default).
//!
//! # Usage
//!
//! ```bash
//! cargo run --example poll_printers -- <host[:port]>... [--minutes N]
//! ```
//!
//! # Examples
//!
//! ```bash
//! # Poll one printer on the default port
//! cargo run --example poll_printers -- 192.168.1.50
//!
//! # Poll two printers for ten minutes, with debug logging
//! RUST_LOG=picaso_lib=debug cargo run --example poll_printers -- \
//!     192.168.1.50 printer-lab.local:54321 --minutes 10
//! ```

use std::env;
use std::time::Duration;

use picaso_lib::event::DeviceEvent;
use picaso_lib::state::FieldValue;
use picaso_lib::{Coordinator, DeviceConfig, DeviceState, Subscribable};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args: Vec<String> = env::args().collect();
    let (configs, minutes) = parse_args(&args[1..])?;
    if configs.is_empty() {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    let mut coordinator = Coordinator::new(configs);
    for (config, error) in coordinator.rejected() {
        eprintln!("Skipping {}: {error}", config.host());
    }

    for id in coordinator.device_ids() {
        coordinator.subscribe(id.as_str(), print_state)?;
    }

    let mut events = coordinator.events();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                DeviceEvent::Identified { device_id, info } => {
                    println!(
                        "[{device_id}] {} ({}), firmware {}",
                        info.display_name().unwrap_or("unnamed"),
                        info.printer_type(),
                        info.firmware_version().as_deref().unwrap_or("unknown"),
                    );
                }
                DeviceEvent::AvailabilityChanged {
                    device_id,
                    available,
                    error,
                } => {
                    let reason = error.map(|e| format!(" ({e})")).unwrap_or_default();
                    println!("[{device_id}] available: {available}{reason}");
                }
                DeviceEvent::StateChanged { .. } => {}
            }
        }
    });

    coordinator.start();
    println!("Polling {} printer(s) for {minutes} minute(s)...", coordinator.device_ids().len());
    tokio::time::sleep(Duration::from_secs(minutes * 60)).await;
    coordinator.stop().await;

    Ok(())
}

fn print_state(state: &DeviceState) {
    println!("[{}] state changed", state.id());
    let Some(status) = state.last_status() else {
        return;
    };
    for (name, value) in status.fields() {
        if value != FieldValue::NotReported {
            println!("    {name:<26} {value}");
        }
    }
}

fn parse_args(args: &[String]) -> Result<(Vec<DeviceConfig>, u64), Box<dyn std::error::Error>> {
    let mut configs = Vec::new();
    let mut minutes = 5;
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        if arg == "--minutes" {
            minutes = iter.next().ok_or("--minutes needs a value")?.parse()?;
            continue;
        }

        let config = match arg.rsplit_once(':') {
            Some((host, port)) if !host.contains(':') => {
                DeviceConfig::new(host, host).with_port(port.parse()?)
            }
            _ => DeviceConfig::new(arg, arg),
        };
        configs.push(config);
    }

    Ok((configs, minutes))
}

fn print_usage(program: &str) {
    eprintln!("Usage: {program} <host[:port]>... [--minutes N]");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  RUST_LOG    Log filter, e.g. picaso_lib=debug");
}

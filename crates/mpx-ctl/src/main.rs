//! `mpx-ctl`: command-line control of multi-pointer seats and devices.
//!
//! Similar to `xinput` for X11 MPX.  Each invocation loads the configuration,
//! builds a registry with the configured seats, runs one subcommand and
//! persists any seat or mapping changes.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  ├─ Cli::parse()              -- clap derive
//!  ├─ init_tracing()            -- RUST_LOG, else --verbose / global.verbose
//!  ├─ MpxController::new()      -- config.toml → SeatRegistry
//!  └─ run(command)
//!       ├─ --json  → serde_json
//!       └─ text    → infrastructure::console
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use mpx_ctl::application::controller::{DeviceKind, MpxController};
use mpx_ctl::infrastructure::console;
use mpx_ctl::infrastructure::storage::config::ConfigStore;

const EXAMPLES: &str = "\
Examples:
  mpx-ctl list-seats              List all seats
  mpx-ctl list-devices            List all input devices
  mpx-ctl create-seat aux         Create a new seat named 'aux'
  mpx-ctl assign mouse1 aux       Assign device 'mouse1' to seat 'aux'
  mpx-ctl status                  Show system status

Similar to xinput for X11 Multi-Pointer X (MPX).";

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Wayland Multi-Pointer control utility.
#[derive(Debug, Parser)]
#[command(name = "mpx-ctl", version, after_help = EXAMPLES)]
struct Cli {
    /// Override the configuration directory.
    #[arg(long, global = true, env = "MPX_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Output in JSON format.
    #[arg(long, global = true)]
    json: bool,

    /// Log at debug level (stderr).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List all seats.
    ListSeats,
    /// List all input devices.
    ListDevices,
    /// Create a new seat.
    CreateSeat {
        /// Name for the new seat.
        name: String,
    },
    /// Destroy a seat.
    DestroySeat {
        /// Name of the seat to destroy.
        name: String,
    },
    /// Register an input device and place it on a seat.
    RegisterDevice {
        /// Unique device identifier.
        id: String,
        /// Human-readable device name.
        name: String,
        #[arg(long, value_enum, default_value_t = DeviceKind::Pointer)]
        kind: DeviceKind,
        /// USB vendor id (decimal, or hex with a 0x prefix).
        #[arg(long, value_parser = parse_usb_id, requires = "product")]
        vendor: Option<u16>,
        /// USB product id (decimal, or hex with a 0x prefix).
        #[arg(long, value_parser = parse_usb_id, requires = "vendor")]
        product: Option<u16>,
    },
    /// Assign a device to a seat.
    Assign {
        /// Device id to assign.
        device: String,
        /// Seat name to assign to.
        seat: String,
    },
    /// Unassign a device from its seat.
    Unassign {
        /// Device id to unassign.
        device: String,
    },
    /// Show system status.
    Status,
    /// Show configuration.
    Config,
    /// Overwrite the configuration with the stock two-seat setup.
    ResetConfig,
}

fn parse_usb_id(value: &str) -> Result<u16, String> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|e| format!("invalid USB id '{value}': {e}"))
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let store = match cli.config_dir {
        Some(dir) => ConfigStore::new(dir),
        None => ConfigStore::from_platform_dir().context("no config directory; pass --config-dir")?,
    };
    init_tracing(cli.verbose || store.peek_verbose());
    debug!(dir = %store.dir().display(), "using config directory");

    let mut controller = MpxController::new(store).context("failed to load configuration")?;
    run(&mut controller, command, cli.json)
}

/// Stderr logging.  `RUST_LOG` wins; otherwise `debug` when verbose, else `warn`.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with_writer(std::io::stderr)
        .init();
}

fn run(controller: &mut MpxController, command: Command, json: bool) -> anyhow::Result<()> {
    match command {
        Command::ListSeats => {
            let seats = controller.list_seats();
            emit(json, &seats, || console::format_seats(&seats))?;
        }
        Command::ListDevices => {
            let devices = controller.list_devices();
            emit(json, &devices, || console::format_devices(&devices))?;
        }
        Command::CreateSeat { name } => {
            let seat_id = controller.create_seat(&name, true)?;
            println!("Created seat '{name}' with ID {seat_id}");
        }
        Command::DestroySeat { name } => {
            controller.destroy_seat(&name, true)?;
            println!("Destroyed seat '{name}'");
        }
        Command::RegisterDevice {
            id,
            name,
            kind,
            vendor,
            product,
        } => {
            let mut device = kind.build(&id, &name);
            if let (Some(vendor), Some(product)) = (vendor, product) {
                device = device.with_usb_ids(vendor, product);
            }
            let placed = controller.register_device(device)?;
            let seat_name = placed
                .and_then(|seat_id| controller.registry().get_seat(seat_id).ok())
                .map(|seat| seat.name.clone());
            match seat_name {
                Some(seat_name) => println!("Registered device '{id}' on seat '{seat_name}'"),
                None => println!("Registered device '{id}' (unassigned)"),
            }
        }
        Command::Assign { device, seat } => {
            controller.assign_device(&device, &seat, true)?;
            println!("Assigned device '{device}' to seat '{seat}'");
        }
        Command::Unassign { device } => {
            controller.unassign_device(&device, true)?;
            println!("Unassigned device '{device}'");
        }
        Command::Status => {
            let status = controller.status();
            emit(json, &status, || console::format_status(&status))?;
        }
        Command::Config => {
            let report = controller.config_report()?;
            emit(json, &report, || console::format_config(&report))?;
        }
        Command::ResetConfig => {
            controller.reset_config()?;
            println!("Configuration reset to defaults");
        }
    }
    Ok(())
}

/// Prints `value` as pretty JSON, or the text produced by `text`.
fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", text());
    }
    Ok(())
}

//! `mpx-sim`: headless multi-pointer simulation.
//!
//! Runs the pre-built scenarios against fresh simulated compositors, prints
//! the scenario report plus an ASCII view of the last scenario's display,
//! then pushes a short scripted event stream through the async input pump.
//! Exits with a non-zero status if any scenario failed.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  ├─ Cli::parse()                 -- clap derive
//!  ├─ init_tracing()               -- RUST_LOG, else info / debug with --verbose
//!  ├─ ScenarioRunner::run_all()    -- one SimulatedCompositor per scenario
//!  │    └─ report / render_ascii / state_summary
//!  └─ pump_demo()
//!       ScriptedInputSource ─► forward_source() ─► InputPump ─► SharedRegistry
//!                                                                  └─► ChannelSink
//! ```

use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mpx_core::{
    ChannelSink, DisplayBounds, EventKind, InputDevice, SeatRegistry, SharedRegistry, DEFAULT_SEAT_NAME,
};
use mpx_sim::application::scenario::{builtin_scenarios, Scenario, ScenarioRunner};
use mpx_sim::infrastructure::input_source::{scripted::ScriptedInputSource, InputSource, RawInputEvent};
use mpx_sim::infrastructure::pump::{forward_source, InputPump, PumpStats, DEFAULT_PUMP_CAPACITY};

/// Headless simulator for Wayland multi-pointer seats.
#[derive(Debug, Parser)]
#[command(name = "mpx-sim", version)]
struct Cli {
    /// Simulated display width in pixels.
    #[arg(long, default_value_t = 1920)]
    width: u32,

    /// Simulated display height in pixels.
    #[arg(long, default_value_t = 1080)]
    height: u32,

    /// Width of the ASCII view in characters.
    #[arg(long, default_value_t = 80)]
    columns: usize,

    /// Height of the ASCII view in characters.
    #[arg(long, default_value_t = 24)]
    rows: usize,

    /// Run only the named scenario (repeatable).
    #[arg(long = "scenario", value_name = "NAME")]
    scenarios: Vec<String>,

    /// List the available scenarios and exit.
    #[arg(long)]
    list: bool,

    /// Print scenario results as JSON instead of the text report.
    #[arg(long)]
    json: bool,

    /// Log at debug level (stderr).
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let available = builtin_scenarios();
    if cli.list {
        for scenario in &available {
            println!("{:<26} {}", scenario.name, scenario.description);
        }
        return Ok(());
    }

    let selected = select_scenarios(available, &cli.scenarios)?;
    info!(count = selected.len(), "mpx-sim starting");

    let mut runner = ScenarioRunner::new(cli.width, cli.height);
    let all_passed = runner.run_all(&selected);

    if cli.json {
        let json = serde_json::to_string_pretty(runner.results())
            .context("failed to serialize scenario results")?;
        println!("{json}");
    } else {
        println!("{}", runner.report());
        if let Some(compositor) = runner.last_compositor() {
            println!("{}", compositor.render_ascii(cli.columns, cli.rows));
            println!();
            println!("{}", compositor.state_summary());
            println!();
        }
    }

    let stats = pump_demo(cli.width, cli.height).await?;
    if !cli.json {
        println!(
            "Input pump: {} events received, {} routed, {} dropped",
            stats.received, stats.routed, stats.dropped
        );
    }

    if !all_passed {
        bail!(
            "{} of {} scenarios failed",
            runner.results().len() - runner.passed_count(),
            runner.results().len()
        );
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with_writer(std::io::stderr)
        .init();
}

/// Keeps the scenarios named in `names` (all of them when `names` is empty).
fn select_scenarios(available: Vec<Scenario>, names: &[String]) -> anyhow::Result<Vec<Scenario>> {
    if names.is_empty() {
        return Ok(available);
    }
    if let Some(unknown) = names
        .iter()
        .find(|name| !available.iter().any(|s| s.name == name.as_str()))
    {
        bail!("unknown scenario '{unknown}' (use --list to see the available ones)");
    }
    Ok(available
        .into_iter()
        .filter(|s| names.iter().any(|name| name == s.name))
        .collect())
}

/// Replays a two-mouse script through the threaded input path.
async fn pump_demo(width: u32, height: u32) -> anyhow::Result<PumpStats> {
    let mut registry = SeatRegistry::new();
    registry.set_display_bounds(DisplayBounds::with_size(width, height));
    let aux = registry.create_seat("aux");
    registry.register_device(InputDevice::pointer("mouse1", "Virtual Mouse 1"));
    registry.register_device(InputDevice::pointer("mouse2", "Virtual Mouse 2"));
    registry.auto_assign_device("mouse1")?;
    registry.assign_device("mouse2", aux, false)?;
    let (sink, registry_events) = ChannelSink::new();
    registry.add_listener(Arc::new(sink));
    let shared = SharedRegistry::new(registry);

    let motion = |device: &str, dx: f64, dy: f64| RawInputEvent::Motion {
        device_id: device.to_string(),
        dx,
        dy,
    };
    let source = ScriptedInputSource::new([
        motion("mouse1", 100.0, 100.0),
        motion("mouse2", 500.0, 300.0),
        RawInputEvent::Button {
            device_id: "mouse2".to_string(),
            button: 1,
            pressed: true,
        },
        motion("mouse1", 50.0, 0.0),
        motion("unplugged", 1.0, 1.0),
    ]);

    let (tx, pump) = InputPump::new(shared.clone()).spawn(DEFAULT_PUMP_CAPACITY);
    let forwarder = forward_source(&source, tx)?;
    source.stop();

    let stats = pump.await.context("input pump task failed")?;
    forwarder
        .join()
        .map_err(|_| anyhow!("input forwarder thread panicked"))?;

    let published: Vec<EventKind> = registry_events.try_iter().map(|event| event.kind).collect();
    info!(
        motion = published.iter().filter(|kind| **kind == EventKind::PointerMotion).count(),
        button = published.iter().filter(|kind| **kind == EventKind::PointerButton).count(),
        "pump demo registry events"
    );

    shared.with(|registry| {
        for seat in registry.seats() {
            let position = seat.cursor.position();
            info!(
                seat = %seat.name,
                default = seat.name == DEFAULT_SEAT_NAME,
                x = position.x,
                y = position.y,
                "pump demo cursor"
            );
        }
    });
    Ok(stats)
}

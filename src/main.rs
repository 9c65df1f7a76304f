mod app;
mod config;
mod error;
mod event;
mod input;
mod ranking;
mod theme;
mod ui;
mod wifi;

use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::Mutex,
};

use clap::Parser;
use color_eyre::eyre::Result;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    app::AppState,
    config::IconSet,
    event::run,
    input::{Keymap, TerminalInput},
    ui::{TerminalRenderer, UiStyle},
    wifi::{Radio, SimNetwork, SimulatedRadio},
};

/// A keyboard-driven Wi-Fi picker: scan, pick the strongest network, join it
#[derive(Parser, Debug)]
#[command(
    name = "wifipick",
    author = "Soham Waghmare",
    about = "A keyboard-driven Wi-Fi picker for small screens.\n\nAuthor: Soham Waghmare",
    long_about = None,
    version = env!("CARGO_PKG_VERSION"),
    disable_version_flag = true
)]
struct Args {
    /// Print version information
    #[arg(short = 'v', long = "version", action = clap::ArgAction::Version)]
    version: (),

    /// Use ASCII icons (no Nerd Fonts required)
    #[arg(long)]
    ascii: bool,

    /// Key layout
    #[arg(long, value_enum, default_value_t = Keymap::Desktop)]
    keymap: Keymap,

    /// Use the simulated radio instead of the system WLAN service
    #[arg(long)]
    simulate: bool,

    /// Simulated network as NAME:DBM:CLASS[:PASSWORD] (repeatable, implies --simulate)
    #[arg(long = "network", value_name = "SPEC")]
    networks: Vec<SimNetwork>,

    /// Polls before a simulated join settles
    #[arg(long, default_value_t = config::DEFAULT_SIM_SETTLE_POLLS)]
    sim_settle_polls: u32,

    /// Write logs to this file (RUST_LOG filters, default info)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn simulated(args: &Args) -> Box<dyn Radio> {
    if args.networks.is_empty() {
        Box::new(SimulatedRadio::demo(args.sim_settle_polls))
    } else {
        Box::new(SimulatedRadio::new(
            args.networks.clone(),
            args.sim_settle_polls,
        ))
    }
}

#[cfg(windows)]
fn open_radio(args: &Args) -> Result<Box<dyn Radio>> {
    if args.simulate || !args.networks.is_empty() {
        return Ok(simulated(args));
    }
    Ok(Box::new(wifi::WlanRadio::open()?))
}

#[cfg(not(windows))]
fn open_radio(args: &Args) -> Result<Box<dyn Radio>> {
    if !args.simulate && args.networks.is_empty() {
        info!("no native radio on this platform, using the simulator");
    }
    Ok(simulated(args))
}

fn main() -> Result<()> {
    let args = Args::parse();

    color_eyre::install()?;
    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }
    info!(version = env!("CARGO_PKG_VERSION"), keymap = ?args.keymap, "starting");

    let mut radio = open_radio(&args)?;
    let style = UiStyle {
        icons: if args.ascii {
            IconSet::Ascii
        } else {
            IconSet::Nerd
        },
        keymap: args.keymap,
    };

    let mut state = AppState::new();
    let mut input = TerminalInput::new(args.keymap);

    let terminal = ratatui::init();
    enable_raw_mode()?;
    let mut renderer = TerminalRenderer::new(terminal, style);
    let result = run(&mut state, &mut input, radio.as_mut(), &mut renderer);
    disable_raw_mode()?;

    ratatui::restore();
    result
}

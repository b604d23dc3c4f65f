use std::path::PathBuf;

mod backend_bridge;
mod controller;
mod ui;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use client_core::{load_settings, Route};
use crossbeam_channel::bounded;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::CarsApp;

#[derive(Parser, Debug)]
#[command(name = "cars-gui", about = "Desktop car roster")]
struct Args {
    /// Settings file (defaults to ./cars.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    service_url: Option<String>,
    /// Follow changes made by other clients over the realtime feed.
    #[arg(long)]
    realtime: bool,
    /// Page to open on startup, e.g. `/cars-list`.
    #[arg(long, default_value = "/")]
    route: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let mut settings =
        load_settings(args.config.as_deref()).context("failed to load client settings")?;
    if let Some(service_url) = args.service_url {
        settings.service_url = service_url;
        settings = settings
            .normalized()
            .context("invalid --service-url value")?;
    }
    if args.realtime {
        settings.realtime_events = true;
    }
    tracing::info!(
        service_url = %settings.service_url,
        realtime = settings.realtime_events,
        "using record service"
    );

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, settings);

    let route = Route::from_path(&args.route);
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Cars")
            .with_inner_size([960.0, 720.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Cars",
        options,
        Box::new(move |_cc| Ok(Box::new(CarsApp::new(cmd_tx, ui_rx, route)))),
    )
    .map_err(|err| anyhow!("gui exited with error: {err}"))
}

use std::{fmt::Write as _, path::PathBuf, sync::Arc};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    form::DEFAULT_YEAR, load_settings, CarForm, CarsClient, CarsView, RecordService, Route,
};
use shared::domain::{Car, CarDraft, CarId};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cars", about = "Manage the car roster of a remote record service")]
struct Args {
    /// Settings file (defaults to ./cars.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    service_url: Option<String>,
    /// Follow changes made by other clients over the realtime feed.
    #[arg(long, global = true)]
    realtime: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the current cars.
    List,
    /// Add a car.
    Add {
        #[arg(long)]
        make: String,
        #[arg(long)]
        model: String,
        #[arg(long, default_value_t = DEFAULT_YEAR)]
        year: i32,
        #[arg(long)]
        plate: String,
    },
    /// Delete a car by id.
    Delete { id: i64 },
    /// Print the list again whenever it changes, until Ctrl-C.
    Watch,
    /// Print the application routes.
    Routes,
}

fn render_table(cars: &[Car]) -> String {
    let headers = ["ID", "Make", "Model", "Year", "Plate"];
    let rows: Vec<[String; 5]> = cars
        .iter()
        .map(|car| {
            [
                car.id.to_string(),
                car.make.clone(),
                car.model.clone(),
                car.year.to_string(),
                car.plate.clone(),
            ]
        })
        .collect();

    let mut widths = headers.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let mut push_row = |cells: &[&str]| {
        let line = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        let _ = writeln!(out, "{}", line.trim_end());
    };
    push_row(&headers);
    for row in &rows {
        push_row(&row.iter().map(String::as_str).collect::<Vec<_>>());
    }
    if rows.is_empty() {
        let _ = writeln!(out, "(no cars)");
    }
    out
}

fn filled_form(make: String, model: String, year: i32, plate: String) -> CarForm {
    let mut form = CarForm::new();
    form.make = make;
    form.model = model;
    form.year = Some(year);
    form.plate = plate;
    form
}

/// Runs the form constraints locally so an invalid car never reaches the service.
fn checked_draft(form: &mut CarForm) -> Result<CarDraft> {
    form.begin_submit().map_err(|errors| {
        let details = errors
            .iter()
            .map(|err| format!("  {}: {err}", err.field()))
            .collect::<Vec<_>>()
            .join("\n");
        anyhow!("car form is invalid:\n{details}")
    })
}

fn render_routes() -> String {
    Route::ALL
        .iter()
        .map(|route| format!("{:<10} {}\n", route.path(), route.title()))
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    if let Command::Routes = args.command {
        print!("{}", render_routes());
        return Ok(());
    }

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
    let realtime = settings.realtime_events;
    tracing::info!(service_url = %settings.service_url, realtime, "using record service");
    let client = Arc::new(CarsClient::new(settings).context("failed to build service client")?);

    match args.command {
        Command::List => {
            let page = client.find().await.context("failed to load cars")?;
            print!("{}", render_table(&page.data));
        }
        Command::Add {
            make,
            model,
            year,
            plate,
        } => {
            let mut form = filled_form(make, model, year, plate);
            let draft = checked_draft(&mut form)?;
            match client.create(&draft).await {
                Ok(car) => print!("{}", render_table(&[car])),
                Err(err) => {
                    form.apply_rejected(err.user_message());
                    bail!("plate: {}", form.plate_message());
                }
            }
        }
        Command::Delete { id } => {
            let removed = client
                .remove(CarId(id))
                .await
                .with_context(|| format!("failed to delete car {id}"))?;
            print!("{}", render_table(&[removed]));
        }
        Command::Watch => {
            let mut view = CarsView::mount(client.clone());
            if realtime {
                client
                    .connect_event_feed()
                    .await
                    .context("failed to open realtime feed")?;
            }
            loop {
                tokio::select! {
                    changed = view.list_mut().changed() => {
                        if !changed {
                            break;
                        }
                        println!("{}", render_table(&view.cars()));
                    }
                    _ = tokio::signal::ctrl_c() => break,
                }
            }
            view.unmount();
        }
        Command::Routes => {}
    }

    Ok(())
}

//! `gmind` - CLI for geominder
//!
//! This binary provides the command-line interface for creating, listing and
//! watching location-based reminders.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::BufRead;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, warn};

use geominder::cli::{
    parse_fix, AddCommand, Cli, Command, ConfigCommand, NearbyCommand, WatchCommand,
};
use geominder::{
    init_logging, Config, Coordinates, Geofence, GeofenceMonitor, LocalRepository, MonitorHandle,
    PointOfInterest, Reminder, ReminderDataSource, RemindersListViewModel, SaveReminderViewModel,
    ViewEvent,
};

/// Channel depth between the stdin reader, the monitor and the printer.
const WATCH_CHANNEL_CAPACITY: usize = 64;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Validation must work even when the default config is broken.
    if let Command::Config(ConfigCommand::Validate { file }) = &cli.command {
        return handle_validate(file.clone().or_else(|| cli.config.clone()));
    }

    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
        command => {
            let repository = Arc::new(LocalRepository::open(config.database_path())?);
            debug!("Opened reminders at {}", config.database_path().display());
            run(&config, repository, command).await
        }
    }
}

async fn run(
    config: &Config,
    repository: Arc<LocalRepository>,
    command: Command,
) -> anyhow::Result<()> {
    let source: Arc<dyn ReminderDataSource> = repository.clone();

    match command {
        Command::List(list_cmd) => handle_list(source, list_cmd.json).await,
        Command::Add(add_cmd) => handle_add(source, add_cmd).await,
        Command::Show(show_cmd) => {
            let reminder = source.get_reminder(&show_cmd.id).await?;
            if show_cmd.json {
                println!("{}", serde_json::to_string_pretty(&reminder)?);
            } else {
                print_reminder(&reminder);
            }
            Ok(())
        }
        Command::Clear(clear_cmd) => {
            if clear_cmd.yes {
                source.delete_all_reminders().await?;
                println!("All reminders deleted.");
            } else {
                println!("This will delete every saved reminder.");
                println!("Use --yes to confirm.");
            }
            Ok(())
        }
        Command::Nearby(nearby_cmd) => handle_nearby(config, source, &nearby_cmd).await,
        Command::Watch(watch_cmd) => handle_watch(config, source, &watch_cmd).await,
        Command::Status(status_cmd) => handle_status(config, &repository, status_cmd.json).await,
        Command::Config(config_cmd) => handle_config(config, config_cmd),
    }
}

/// Collect every event already queued on `events`.
fn drain_events(events: &mut broadcast::Receiver<ViewEvent>) -> Vec<ViewEvent> {
    let mut drained = Vec::new();
    while let Ok(event) = events.try_recv() {
        drained.push(event);
    }
    drained
}

fn print_reminder(reminder: &Reminder) {
    println!("{}", reminder.id());
    println!("  Title:       {}", reminder.display_title());
    if let Some(description) = &reminder.description {
        println!("  Description: {description}");
    }
    if let Some(location) = &reminder.location {
        println!("  Location:    {location}");
    }
    println!("  Coordinates: {}", reminder.coordinates());
}

fn summary_line(reminder: &Reminder) -> String {
    format!(
        "{}  {}  @ {} ({})",
        reminder.id(),
        reminder.display_title(),
        reminder.location.as_deref().unwrap_or("-"),
        reminder.coordinates()
    )
}

async fn handle_list(source: Arc<dyn ReminderDataSource>, json: bool) -> anyhow::Result<()> {
    let view_model = RemindersListViewModel::new(source);
    let mut events = view_model.base().subscribe_events();

    view_model.load_reminders().await;

    for event in drain_events(&mut events) {
        if let ViewEvent::Snackbar(message) = event {
            bail!(message);
        }
    }

    let state = view_model.state();
    if json {
        println!("{}", serde_json::to_string_pretty(&state.reminders)?);
    } else if state.show_no_data {
        println!("No Data");
    } else {
        for reminder in &state.reminders {
            println!("{}", summary_line(reminder));
        }
    }
    Ok(())
}

async fn handle_add(source: Arc<dyn ReminderDataSource>, cmd: AddCommand) -> anyhow::Result<()> {
    let view_model = SaveReminderViewModel::new(source);
    let mut events = view_model.base().subscribe_events();

    view_model.set_title(cmd.title);
    view_model.set_description(cmd.description);
    if let Some(name) = cmd.location {
        // Range checks happen in validation, after the title check.
        let coordinates = Coordinates::new(cmd.lat, cmd.lon);
        view_model.save_poi_location(PointOfInterest::new(coordinates, cmd.place_id, name));
    }

    let reminder = view_model.draft_reminder();
    let saved = view_model.validate_and_save_reminder(&reminder).await;

    for event in drain_events(&mut events) {
        match event {
            ViewEvent::Toast(message) => println!("{message}"),
            ViewEvent::Snackbar(message) => eprintln!("{message}"),
            ViewEvent::ValidationFailed(err) => eprintln!("{err}"),
            ViewEvent::Navigate(_) => {}
        }
    }

    if !saved {
        bail!("reminder was not saved");
    }
    println!("{}", reminder.id());
    Ok(())
}

/// Radius from the command line, or the configured one.
fn effective_radius(config: &Config, requested: Option<f64>) -> anyhow::Result<f64> {
    let radius = requested.unwrap_or(config.geofence.radius_meters);
    if !radius.is_finite() || radius <= 0.0 {
        bail!("radius must be a positive number of meters, got {radius}");
    }
    Ok(radius)
}

async fn handle_nearby(
    config: &Config,
    source: Arc<dyn ReminderDataSource>,
    cmd: &NearbyCommand,
) -> anyhow::Result<()> {
    let here = Coordinates::try_new(cmd.lat, cmd.lon)?;
    let radius = effective_radius(config, cmd.radius)?;

    let mut nearby: Vec<(Reminder, f64)> = source
        .get_reminders()
        .await?
        .into_iter()
        .filter(|reminder| reminder.coordinates().is_valid())
        .filter_map(|reminder| {
            Geofence::for_reminder(&reminder, radius)
                .distance_if_inside(here)
                .map(|distance| (reminder, distance))
        })
        .collect();
    nearby.sort_by(|a, b| a.1.total_cmp(&b.1));

    if cmd.json {
        let entries: Vec<_> = nearby
            .iter()
            .map(|(reminder, distance)| {
                serde_json::json!({
                    "reminder": reminder,
                    "distance_meters": distance,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else if nearby.is_empty() {
        println!("No reminders within {radius} m of {here}");
    } else {
        for (reminder, distance) in &nearby {
            println!("{:>8.1} m  {}", distance, summary_line(reminder));
        }
    }
    Ok(())
}

async fn handle_watch(
    config: &Config,
    source: Arc<dyn ReminderDataSource>,
    cmd: &WatchCommand,
) -> anyhow::Result<()> {
    let radius = effective_radius(config, cmd.radius)?;
    let monitor = GeofenceMonitor::new(source, radius)?
        .with_notify_on_start(config.geofence.notify_on_start);

    let (position_tx, position_rx) = mpsc::channel(WATCH_CHANNEL_CAPACITY);
    let (notification_tx, mut notification_rx) = mpsc::channel(WATCH_CHANNEL_CAPACITY);

    let monitor_task = tokio::spawn(monitor.run(
        position_rx,
        notification_tx,
        MonitorHandle::new(),
    ));

    // Plain thread: a blocked stdin read must not keep the runtime alive.
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            match parse_fix(&line) {
                Some(position) => {
                    if position_tx.blocking_send(position).is_err() {
                        break;
                    }
                }
                None if line.trim().is_empty() || line.trim_start().starts_with('#') => {}
                None => warn!("Ignoring unparseable position line: {line}"),
            }
        }
    });

    while let Some(notification) = notification_rx.recv().await {
        if cmd.json {
            println!("{}", serde_json::to_string(&notification)?);
        } else {
            println!(
                "[{}] Entered {} ({:.0} m): {}",
                notification.triggered_at.format("%H:%M:%S"),
                notification.reminder.location.as_deref().unwrap_or("-"),
                notification.distance_meters,
                notification.reminder.display_title()
            );
        }
    }

    monitor_task
        .await
        .context("geofence monitor task failed")??;
    Ok(())
}

async fn handle_status(
    config: &Config,
    repository: &LocalRepository,
    json: bool,
) -> anyhow::Result<()> {
    let stats = repository.stats().await?;

    if json {
        let status = serde_json::json!({
            "database_path": config.database_path(),
            "total_reminders": stats.total_reminders,
            "db_size_bytes": stats.db_size_bytes,
            "geofence_radius_meters": config.geofence.radius_meters,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("gmind status");
        println!("------------");
        println!("Database:      {}", config.database_path().display());
        println!("Reminders:     {}", stats.total_reminders);
        println!("Size:          {} bytes", stats.db_size_bytes);
        println!("Radius:        {} m", config.geofence.radius_meters);
    }
    Ok(())
}

fn handle_validate(file: Option<std::path::PathBuf>) -> anyhow::Result<()> {
    let path = file.unwrap_or_else(Config::default_config_path);
    println!("Validating configuration: {}", path.display());
    match Config::load_from(Some(path)) {
        Ok(_) => {
            println!("Configuration is valid.");
            Ok(())
        }
        Err(e) => bail!("Configuration error: {e}"),
    }
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:   {}", config.database_path().display());
                println!();
                println!("[Geofence]");
                println!("  Radius (m):      {}", config.geofence.radius_meters);
                println!("  Notify on start: {}", config.geofence.notify_on_start);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => handle_validate(file)?,
    }
    Ok(())
}

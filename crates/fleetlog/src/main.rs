//! `fleetlog` - CLI for the fleet log
//!
//! This binary registers vehicles and drivers, records vehicle exits, and
//! prints exit reports.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use fleetlog::cli::{
    Cli, Command, ConfigCommand, DeleteArgs, DriverCommand, ExitCommand, ListArgs, OutputFormat,
    ReportCommand, VehicleCommand,
};
use fleetlog::forms::{DriverForm, ExitForm, VehicleForm};
use fleetlog::listing;
use fleetlog::report::preview::{render_json, SectionedPreview, TablePreview};
use fleetlog::report::{acknowledge_save, Report};
use fleetlog::seed::seed_demo;
use fleetlog::storage::{self, Loaded};
use fleetlog::transfer::{export_collection, import_collection};
use fleetlog::{
    init_logging, CollectionKey, Config, Driver, Record, RecordId, RecordStore, SqliteStore,
    Vehicle, VehicleExit,
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(exit_status(&err))
        }
    }
}

/// Exit status for a failed command, taken from the underlying
/// [`fleetlog::Error`] when there is one.
fn exit_status(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<fleetlog::Error>()
        .map_or(1, fleetlog::Error::exit_code)
}

/// Configuration and store for commands that touch records.
#[derive(Debug)]
struct Session {
    config: Config,
    store: SqliteStore,
}

impl Session {
    fn open(config_path: Option<PathBuf>) -> anyhow::Result<Self> {
        let config = Config::load_from(config_path).context("failed to load configuration")?;
        let path = config.database_path();
        let store = SqliteStore::open(&path)
            .with_context(|| format!("failed to open store at {}", path.display()))?;
        Ok(Self { config, store })
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config;

    match cli.command {
        // Configuration commands must work when the configuration or the
        // database is broken.
        Command::Config(cmd) => handle_config(config_path, cmd),
        Command::Vehicle(cmd) => handle_vehicle(&Session::open(config_path)?.store, cmd),
        Command::Driver(cmd) => handle_driver(&Session::open(config_path)?.store, cmd),
        Command::Exit(cmd) => handle_exit(&Session::open(config_path)?.store, cmd),
        Command::Report(cmd) => {
            let session = Session::open(config_path)?;
            handle_report(&session.store, &session.config, &cmd)
        }
        Command::Status(cmd) => handle_status(&Session::open(config_path)?.store, cmd.json),
        Command::Seed => handle_seed(&Session::open(config_path)?.store),
        Command::Export(cmd) => {
            let session = Session::open(config_path)?;
            let json = export_collection(&session.store, cmd.collection.into())?;
            println!("{json}");
            Ok(())
        }
        Command::Import(cmd) => {
            let session = Session::open(config_path)?;
            let key = CollectionKey::from(cmd.collection);
            let json = std::fs::read_to_string(&cmd.file)
                .with_context(|| format!("failed to read {}", cmd.file.display()))?;
            let count = import_collection(&session.store, key, &json)
                .with_context(|| format!("failed to import {}", cmd.file.display()))?;
            println!("Imported {count} records into {key}.");
            Ok(())
        }
    }
}

fn handle_vehicle(store: &dyn RecordStore, cmd: VehicleCommand) -> anyhow::Result<()> {
    match cmd {
        VehicleCommand::Add(args) => {
            let vehicle = VehicleForm::from(args).submit(store)?;
            println!("Vehicle registered with id {}.", vehicle.id);
            Ok(())
        }
        VehicleCommand::List(args) => print_list::<Vehicle>(store, &args),
        VehicleCommand::Delete(args) => handle_delete::<Vehicle>(store, &args),
    }
}

fn handle_driver(store: &dyn RecordStore, cmd: DriverCommand) -> anyhow::Result<()> {
    match cmd {
        DriverCommand::Add(args) => {
            let driver = DriverForm::from(args).submit(store)?;
            println!("Driver registered with id {}.", driver.id);
            Ok(())
        }
        DriverCommand::List(args) => print_list::<Driver>(store, &args),
        DriverCommand::Delete(args) => handle_delete::<Driver>(store, &args),
    }
}

fn handle_exit(store: &dyn RecordStore, cmd: ExitCommand) -> anyhow::Result<()> {
    match cmd {
        ExitCommand::Add(args) => {
            let exit = ExitForm::from(args).submit(store)?;
            println!(
                "Exit of {} ({}) recorded with id {}.",
                exit.vehicle_name, exit.plate, exit.id
            );
            Ok(())
        }
        ExitCommand::List(args) => print_list::<VehicleExit>(store, &args),
        ExitCommand::Delete(args) => handle_delete::<VehicleExit>(store, &args),
    }
}

fn print_list<T: Record>(store: &dyn RecordStore, args: &ListArgs) -> anyhow::Result<()> {
    let Loaded { records, warning } = listing::list::<T>(store)?;
    if let Some(warning) = warning {
        eprintln!("Warning: {warning}");
    }

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        OutputFormat::Plain => {
            if records.is_empty() {
                println!("No {} recorded.", T::COLLECTION);
            }
            for record in &records {
                println!("{}  {}", record.id(), record.summary());
            }
        }
        OutputFormat::Table => {
            let width = records
                .iter()
                .map(|record| record.id().to_string().len())
                .max()
                .unwrap_or(0)
                .max(2);
            println!("{:<width$} | {}", "ID", T::COLLECTION);
            println!("{}-+-{}", "-".repeat(width), "-".repeat(40));
            for record in &records {
                println!("{:<width$} | {}", record.id().to_string(), record.summary());
            }
            println!("{} records", records.len());
        }
    }
    Ok(())
}

fn handle_delete<T: Record>(store: &dyn RecordStore, args: &DeleteArgs) -> anyhow::Result<()> {
    let pending = listing::request_delete::<T>(store, RecordId::new(args.id))?;

    if args.yes {
        let removed = pending.confirm(store)?;
        println!("Deleted {} {}.", T::COLLECTION, removed.id());
    } else {
        println!("This will delete: {}", pending.target().summary());
        println!("Use --yes to confirm.");
        let _ = pending.cancel();
    }
    Ok(())
}

fn handle_report(
    store: &dyn RecordStore,
    config: &Config,
    cmd: &ReportCommand,
) -> anyhow::Result<()> {
    let Loaded { records, warning } = storage::load::<VehicleExit>(store)?;
    if let Some(warning) = warning {
        eprintln!("Warning: {warning}");
    }

    let grouping = cmd.group_by.map_or(config.report.grouping, Into::into);
    let report = Report::build(&records, grouping);
    let options = config.preview_options();
    let generated_at = chrono::Local::now().naive_local();

    match cmd.format {
        OutputFormat::Plain => print!("{}", SectionedPreview::new(&report, &options, generated_at)),
        OutputFormat::Table => print!("{}", TablePreview::new(&report, &options, generated_at)),
        OutputFormat::Json => println!("{}", render_json(&report)?),
    }

    if cmd.save {
        println!();
        println!("{}", acknowledge_save(&report));
    }
    Ok(())
}

fn handle_status(store: &dyn RecordStore, json: bool) -> anyhow::Result<()> {
    let stats = storage::stats(store)?;

    if json {
        let status = serde_json::json!({
            "store": stats.location,
            "vehicles": stats.vehicles,
            "drivers": stats.drivers,
            "exits": stats.exits,
            "exits_in_progress": stats.exits_in_progress,
            "warnings": stats.warnings,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("fleetlog status");
        println!("---------------");
        println!("Store:         {}", stats.location);
        println!("Vehicles:      {}", stats.vehicles);
        println!("Drivers:       {}", stats.drivers);
        println!(
            "Exits:         {} ({} in progress)",
            stats.exits, stats.exits_in_progress
        );
        for warning in &stats.warnings {
            println!("Warning:       {warning}");
        }
    }
    Ok(())
}

fn handle_seed(store: &dyn RecordStore) -> anyhow::Result<()> {
    let outcome = seed_demo(store)?;
    if outcome.is_empty() {
        println!("Vehicles and drivers already exist; nothing seeded.");
    } else {
        println!(
            "Seeded {} vehicles and {} drivers.",
            outcome.vehicles, outcome.drivers
        );
    }
    Ok(())
}

fn handle_config(config_path: Option<PathBuf>, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config =
                Config::load_from(config_path).context("failed to load configuration")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Report]");
                println!("  Grouping:           {}", config.report.grouping);
                println!("  Title:              {}", config.report.title);
                println!("  In-progress label:  {}", config.report.in_progress_label);
                println!("  Show observations:  {}", config.report.show_observations);
            }
        }
        ConfigCommand::Path => {
            let path = config_path.unwrap_or_else(Config::default_config_path);
            println!("{}", path.display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            validate_config(path)?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}

fn validate_config(path: PathBuf) -> anyhow::Result<Config> {
    let display = path.display().to_string();
    Config::load_from(Some(path)).with_context(|| format!("configuration {display} is invalid"))
}

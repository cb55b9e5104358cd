//! Command-line interface for fleetlog.
//!
//! This module provides the CLI structure for the `fleetlog` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    CollectionArg, ConfigCommand, DeleteArgs, DriverArgs, DriverCommand, ExitArgs, ExitCommand,
    ExportCommand, GroupingArg, ImportCommand, ListArgs, OutputFormat, ReportCommand,
    StatusCommand, VehicleArgs, VehicleCommand,
};

use crate::logging::Verbosity;

/// fleetlog - Keep track of fleet vehicles, drivers and trips
///
/// Registers vehicles and drivers, records when vehicles leave and return,
/// and summarizes trips by month or by vehicle.
#[derive(Debug, Parser)]
#[command(name = "fleetlog")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage vehicles
    #[command(subcommand)]
    Vehicle(VehicleCommand),

    /// Manage drivers
    #[command(subcommand)]
    Driver(DriverCommand),

    /// Manage vehicle exits
    #[command(subcommand)]
    Exit(ExitCommand),

    /// Summarize exits by month or vehicle
    Report(ReportCommand),

    /// Show record counts and store location
    Status(StatusCommand),

    /// Load the demo fleet into empty collections
    Seed,

    /// Print a collection as JSON
    Export(ExportCommand),

    /// Replace a collection from a JSON file
    Import(ImportCommand),

    /// View configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.verbose, self.quiet)
    }
}

//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::forms::{DriverForm, ExitForm, VehicleForm};
use crate::record::CollectionKey;
use crate::report::Grouping;

/// Vehicle commands.
#[derive(Debug, Subcommand)]
pub enum VehicleCommand {
    /// Register a vehicle
    Add(VehicleArgs),

    /// List registered vehicles
    List(ListArgs),

    /// Delete a vehicle
    Delete(DeleteArgs),
}

/// Driver commands.
#[derive(Debug, Subcommand)]
pub enum DriverCommand {
    /// Register a driver
    Add(DriverArgs),

    /// List registered drivers
    List(ListArgs),

    /// Delete a driver
    Delete(DeleteArgs),
}

/// Vehicle exit commands.
#[derive(Debug, Subcommand)]
pub enum ExitCommand {
    /// Record a vehicle leaving, optionally with its return
    Add(ExitArgs),

    /// List recorded exits
    List(ListArgs),

    /// Delete an exit
    Delete(DeleteArgs),
}

/// Vehicle registration fields.
#[derive(Debug, Args)]
pub struct VehicleArgs {
    /// Manufacturer
    #[arg(long)]
    pub make: String,

    /// Model name
    #[arg(long)]
    pub model: String,

    /// License plate
    #[arg(long)]
    pub plate: String,

    /// Model year
    #[arg(long)]
    pub year: String,

    /// Body color
    #[arg(long)]
    pub color: String,

    /// Current odometer reading in km
    #[arg(long)]
    pub odometer: String,
}

impl From<VehicleArgs> for VehicleForm {
    fn from(args: VehicleArgs) -> Self {
        Self {
            make: args.make,
            model: args.model,
            plate: args.plate,
            year: args.year,
            color: args.color,
            odometer: args.odometer,
        }
    }
}

/// Driver registration fields.
#[derive(Debug, Args)]
pub struct DriverArgs {
    /// Full name
    #[arg(long)]
    pub name: String,

    /// Employee number
    #[arg(long)]
    pub employee_number: String,

    /// Contact phone
    #[arg(long)]
    pub phone: String,

    /// Department
    #[arg(long)]
    pub department: String,

    /// Driver's license number
    #[arg(long = "license")]
    pub license_number: String,
}

impl From<DriverArgs> for DriverForm {
    fn from(args: DriverArgs) -> Self {
        Self {
            name: args.name,
            employee_number: args.employee_number,
            phone: args.phone,
            department: args.department,
            license_number: args.license_number,
        }
    }
}

/// Vehicle exit fields.
#[derive(Debug, Args)]
pub struct ExitArgs {
    /// Identifier of the vehicle leaving
    #[arg(long = "vehicle", value_name = "ID")]
    pub vehicle_id: String,

    /// Identifier of the driver
    #[arg(long = "driver", value_name = "ID")]
    pub driver_id: String,

    /// Exit date (YYYY-MM-DD)
    #[arg(long = "date")]
    pub exit_date: String,

    /// Exit time (HH:MM)
    #[arg(long = "time")]
    pub exit_time: String,

    /// Destination
    #[arg(long)]
    pub destination: String,

    /// Odometer at exit in km
    #[arg(long = "odometer")]
    pub exit_odometer: String,

    /// Return date (YYYY-MM-DD)
    #[arg(long)]
    pub return_date: Option<String>,

    /// Return time (HH:MM)
    #[arg(long)]
    pub return_time: Option<String>,

    /// Odometer at return in km
    #[arg(long)]
    pub return_odometer: Option<String>,

    /// Free-text notes
    #[arg(long)]
    pub observations: Option<String>,
}

impl From<ExitArgs> for ExitForm {
    fn from(args: ExitArgs) -> Self {
        Self {
            vehicle_id: args.vehicle_id,
            driver_id: args.driver_id,
            exit_date: args.exit_date,
            exit_time: args.exit_time,
            destination: args.destination,
            exit_odometer: args.exit_odometer,
            return_date: args.return_date,
            return_time: args.return_time,
            return_odometer: args.return_odometer,
            observations: args.observations,
        }
    }
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Identifier of the record to delete
    pub id: i64,

    /// Skip confirmation and delete immediately
    #[arg(short, long)]
    pub yes: bool,
}

/// Report command arguments.
#[derive(Debug, Args)]
pub struct ReportCommand {
    /// Grouping; defaults to the configured `report.grouping`
    #[arg(short, long, value_enum)]
    pub group_by: Option<GroupingArg>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,

    /// Acknowledge a report save after the preview
    #[arg(short, long)]
    pub save: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Export command arguments.
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Collection to export
    #[arg(value_enum)]
    pub collection: CollectionArg,
}

/// Import command arguments.
#[derive(Debug, Args)]
pub struct ImportCommand {
    /// Collection to replace
    #[arg(value_enum)]
    pub collection: CollectionArg,

    /// JSON file holding an array of records
    pub file: PathBuf,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Report grouping argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GroupingArg {
    /// One group per calendar month
    Month,
    /// One group per vehicle and plate
    Vehicle,
}

impl From<GroupingArg> for Grouping {
    fn from(arg: GroupingArg) -> Self {
        match arg {
            GroupingArg::Month => Self::Month,
            GroupingArg::Vehicle => Self::Vehicle,
        }
    }
}

/// Collection argument for import and export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CollectionArg {
    /// Registered vehicles
    #[value(alias = "vehicleControlCars")]
    Vehicles,
    /// Registered drivers
    #[value(alias = "vehicleControlDrivers")]
    Drivers,
    /// Vehicle exits
    #[value(aliases = ["vehicleExits", "vehicleControlExits"])]
    Exits,
}

impl From<CollectionArg> for CollectionKey {
    fn from(arg: CollectionArg) -> Self {
        match arg {
            CollectionArg::Vehicles => Self::Vehicles,
            CollectionArg::Drivers => Self::Drivers,
            CollectionArg::Exits => Self::Exits,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}

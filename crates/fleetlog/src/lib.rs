//! `fleetlog` - Track fleet vehicles, drivers and vehicle exits
//!
//! This library provides the record store, entry forms, list and delete
//! views, and the exit report used by the `fleetlog` binary.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod forms;
pub mod listing;
pub mod logging;
pub mod record;
pub mod report;
pub mod seed;
pub mod storage;
pub mod transfer;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use record::{CollectionKey, Driver, Record, RecordId, Vehicle, VehicleExit};
pub use report::{Grouping, Report};
pub use storage::{MemoryStore, RecordStore, SqliteStore, StoreStats};

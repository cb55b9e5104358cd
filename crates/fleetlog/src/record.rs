//! Core record types for fleetlog.
//!
//! This module defines the three persisted record kinds (vehicles, drivers and
//! vehicle exits) together with the collection keys they are stored under.
//! Field names on the wire are kept exactly as the browser application wrote
//! them, so existing collections can be imported unchanged.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Identifier of a record within its collection.
///
/// Identifiers are creation timestamps in milliseconds, bumped forward when
/// needed so that they stay unique within a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// The raw integer value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Generate a fresh identifier that does not collide with `existing`.
    #[must_use]
    pub fn generate(existing: impl IntoIterator<Item = RecordId>) -> Self {
        Self::generate_at(Utc::now().timestamp_millis(), existing)
    }

    /// Generate an identifier as if the current time were `now_ms`.
    ///
    /// Returns `now_ms` unless an existing identifier is equal or greater, in
    /// which case the result is one past the highest existing identifier.
    #[must_use]
    pub fn generate_at(now_ms: i64, existing: impl IntoIterator<Item = RecordId>) -> Self {
        let next = existing
            .into_iter()
            .map(RecordId::get)
            .max()
            .map_or(now_ms, |highest| now_ms.max(highest.saturating_add(1)));
        Self(next)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RecordId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

/// The fixed keys the three collections are persisted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKey {
    /// The vehicle collection.
    Vehicles,
    /// The driver collection.
    Drivers,
    /// The vehicle exit collection.
    Exits,
}

impl CollectionKey {
    /// All collections, in dashboard order.
    pub const ALL: [CollectionKey; 3] = [Self::Vehicles, Self::Drivers, Self::Exits];

    /// The storage key for this collection.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vehicles => "vehicles",
            Self::Drivers => "drivers",
            Self::Exits => "vehicleExits",
        }
    }
}

impl fmt::Display for CollectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            // The browser application's local storage keys are accepted too.
            "vehicles" | "vehicleControlCars" => Ok(Self::Vehicles),
            "drivers" | "vehicleControlDrivers" => Ok(Self::Drivers),
            "vehicleExits" | "exits" | "vehicleControlExits" => Ok(Self::Exits),
            other => Err(Error::UnknownCollection(other.to_string())),
        }
    }
}

/// A flat record stored in one of the collections.
pub trait Record: Serialize + DeserializeOwned + Clone + fmt::Debug {
    /// The collection this record kind lives in.
    const COLLECTION: CollectionKey;

    /// The record's identifier.
    fn id(&self) -> RecordId;

    /// A one-line human readable summary for list views.
    fn summary(&self) -> String;
}

/// Availability of a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VehicleStatus {
    /// Parked and free to be checked out.
    #[default]
    #[serde(rename = "Disponível")]
    Available,
    /// Currently out on a trip.
    #[serde(rename = "Em Uso")]
    InUse,
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available => write!(f, "available"),
            Self::InUse => write!(f, "in use"),
        }
    }
}

/// A vehicle in the fleet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Record identifier.
    pub id: RecordId,
    /// Manufacturer.
    #[serde(rename = "marca")]
    pub make: String,
    /// Model name.
    #[serde(rename = "modelo")]
    pub model: String,
    /// License plate, stored uppercased.
    #[serde(rename = "placa")]
    pub plate: String,
    /// Model year.
    #[serde(rename = "ano")]
    pub year: i32,
    /// Body color.
    #[serde(rename = "cor")]
    pub color: String,
    /// Odometer reading in km.
    #[serde(rename = "hodometro")]
    pub odometer_km: u32,
    /// Availability.
    #[serde(default)]
    pub status: VehicleStatus,
}

impl Vehicle {
    /// Make and model, as shown on exit records.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.make, self.model)
    }
}

impl Record for Vehicle {
    const COLLECTION: CollectionKey = CollectionKey::Vehicles;

    fn id(&self) -> RecordId {
        self.id
    }

    fn summary(&self) -> String {
        format!(
            "{} ({}) {} {}, {} km, {}",
            self.display_name(),
            self.plate,
            self.year,
            self.color,
            self.odometer_km,
            self.status
        )
    }
}

/// Duty status of a driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DriverStatus {
    /// Available for trips.
    #[default]
    #[serde(rename = "Ativo")]
    Active,
    /// Currently on a trip.
    #[serde(rename = "Em Viagem")]
    Traveling,
}

impl fmt::Display for DriverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Traveling => write!(f, "traveling"),
        }
    }
}

/// A registered driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    /// Record identifier.
    pub id: RecordId,
    /// Full legal name.
    #[serde(rename = "nome")]
    pub name: String,
    /// Employee number, unique.
    #[serde(rename = "matricula")]
    pub employee_number: String,
    /// Contact phone.
    #[serde(rename = "telefone")]
    pub phone: String,
    /// Department.
    #[serde(rename = "setor")]
    pub department: String,
    /// Driver's license number, unique.
    #[serde(rename = "habilitacao")]
    pub license_number: String,
    /// Duty status.
    #[serde(default)]
    pub status: DriverStatus,
}

impl Record for Driver {
    const COLLECTION: CollectionKey = CollectionKey::Drivers;

    fn id(&self) -> RecordId {
        self.id
    }

    fn summary(&self) -> String {
        format!(
            "{} #{} ({}), license {}, {}, {}",
            self.name,
            self.employee_number,
            self.department,
            self.license_number,
            self.phone,
            self.status
        )
    }
}

/// A single vehicle checkout, optionally paired with its return.
///
/// `vehicle_id` and `driver_id` are weak references: nothing stops the
/// referenced records from being deleted. `vehicle_name`, `plate` and
/// `driver_name` are snapshots taken when the exit was recorded and are not
/// updated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleExit {
    /// Record identifier.
    pub id: RecordId,
    /// The vehicle that left.
    pub vehicle_id: RecordId,
    /// The driver who took it.
    pub driver_id: RecordId,
    /// Snapshot of the vehicle's make and model.
    pub vehicle_name: String,
    /// Snapshot of the driver's name.
    pub driver_name: String,
    /// Snapshot of the vehicle's plate.
    pub plate: String,
    /// Checkout date.
    pub exit_date: NaiveDate,
    /// Checkout time of day, `HH:MM`.
    pub exit_time: String,
    /// Where the vehicle went.
    pub destination: String,
    /// Odometer at checkout.
    pub exit_km: u32,
    /// Return date, if recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<NaiveDate>,
    /// Return time of day, if recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_time: Option<String>,
    /// Odometer at return, if recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_km: Option<u32>,
    /// Free-text notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
}

impl VehicleExit {
    /// Whether the vehicle has no recorded return odometer yet.
    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        self.return_km.is_none()
    }
}

impl Record for VehicleExit {
    const COLLECTION: CollectionKey = CollectionKey::Exits;

    fn id(&self) -> RecordId {
        self.id
    }

    fn summary(&self) -> String {
        let trip = match self.return_km {
            Some(km) => format!("{} -> {} km", self.exit_km, km),
            None => format!("{} km, in progress", self.exit_km),
        };
        format!(
            "{} {} {} ({}) driven by {} to {}, {}",
            self.exit_date, self.exit_time, self.vehicle_name, self.plate, self.driver_name,
            self.destination, trip
        )
    }
}

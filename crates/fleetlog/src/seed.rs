//! Demo fleet for trying the application out.
//!
//! Seeding only fills collections that are currently empty; populated
//! collections are left alone.

use tracing::info;

use crate::error::Result;
use crate::record::{Driver, DriverStatus, Record, RecordId, Vehicle, VehicleStatus};
use crate::storage::{self, RecordStore};

/// What [`seed_demo`] wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedOutcome {
    /// Vehicles inserted; zero when the collection already had records.
    pub vehicles: usize,
    /// Drivers inserted; zero when the collection already had records.
    pub drivers: usize,
}

impl SeedOutcome {
    /// Whether nothing was written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vehicles == 0 && self.drivers == 0
    }
}

/// Populate empty vehicle and driver collections with the demo fleet.
///
/// # Errors
///
/// Returns an error if the store fails, or if a collection holds data that
/// cannot be decoded.
pub fn seed_demo(store: &dyn RecordStore) -> Result<SeedOutcome> {
    Ok(SeedOutcome {
        vehicles: seed_if_empty(store, demo_vehicles())?,
        drivers: seed_if_empty(store, demo_drivers())?,
    })
}

fn seed_if_empty<T: Record>(store: &dyn RecordStore, records: Vec<T>) -> Result<usize> {
    if !storage::load::<T>(store)?.into_writable()?.is_empty() {
        info!("Collection {} already populated, not seeding", T::COLLECTION);
        return Ok(0);
    }

    storage::save(store, &records)?;
    info!("Seeded {} records into {}", records.len(), T::COLLECTION);
    Ok(records.len())
}

/// The demo vehicles.
#[must_use]
pub fn demo_vehicles() -> Vec<Vehicle> {
    let vehicle = |id, make: &str, model: &str, plate: &str, year, color: &str, km, status| {
        Vehicle {
            id: RecordId::new(id),
            make: make.to_string(),
            model: model.to_string(),
            plate: plate.to_string(),
            year,
            color: color.to_string(),
            odometer_km: km,
            status,
        }
    };

    vec![
        vehicle(1, "Chevrolet", "Onix", "ABC-1234", 2022, "Branco", 15_000, VehicleStatus::Available),
        vehicle(2, "Volkswagen", "Gol", "DEF-5678", 2021, "Prata", 22_000, VehicleStatus::InUse),
        vehicle(3, "Fiat", "Uno", "GHI-9012", 2020, "Azul", 35_000, VehicleStatus::Available),
        vehicle(4, "Ford", "Ka", "JKL-3456", 2023, "Vermelho", 8_000, VehicleStatus::InUse),
    ]
}

/// The demo drivers.
#[must_use]
pub fn demo_drivers() -> Vec<Driver> {
    let driver = |id, name: &str, number: &str, phone: &str, department: &str, license: &str, status| {
        Driver {
            id: RecordId::new(id),
            name: name.to_string(),
            employee_number: number.to_string(),
            phone: phone.to_string(),
            department: department.to_string(),
            license_number: license.to_string(),
            status,
        }
    };

    vec![
        driver(1, "João Silva", "12345", "(11) 99999-9999", "Administrativo", "04512378901", DriverStatus::Active),
        driver(2, "Maria Santos", "12346", "(11) 88888-8888", "Vendas", "04512378902", DriverStatus::Traveling),
        driver(3, "Pedro Costa", "12347", "(11) 77777-7777", "Operações", "04512378903", DriverStatus::Active),
        driver(4, "Ana Oliveira", "12348", "(11) 66666-6666", "RH", "04512378904", DriverStatus::Active),
        driver(5, "Carlos Ferreira", "12349", "(11) 55555-5555", "TI", "04512378905", DriverStatus::Traveling),
    ]
}

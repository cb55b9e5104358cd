//! Entry forms for vehicles, drivers and exits.
//!
//! Each form holds raw text input. Submitting a form validates it against a
//! freshly loaded collection, appends the new record and writes the whole
//! collection back. Any failure aborts before the write, so the store never
//! sees a partial change.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use tracing::info;

use crate::error::{Error, Result};
use crate::record::{
    Driver, DriverStatus, Record, RecordId, Vehicle, VehicleExit, VehicleStatus,
};
use crate::storage::{self, RecordStore};

/// Date format accepted for exit and return dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Time format accepted for exit and return times.
pub const TIME_FORMAT: &str = "%H:%M";

/// Input for registering a vehicle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleForm {
    /// Manufacturer.
    pub make: String,
    /// Model name.
    pub model: String,
    /// License plate, any case.
    pub plate: String,
    /// Model year.
    pub year: String,
    /// Body color.
    pub color: String,
    /// Current odometer reading in km.
    pub odometer: String,
}

impl VehicleForm {
    /// Validate the form and append a new vehicle to the store.
    ///
    /// The plate is stored uppercased and must not match an existing plate,
    /// compared case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty field, an unparseable number or
    /// a duplicate plate, or a storage error if the store fails.
    pub fn submit(&self, store: &dyn RecordStore) -> Result<Vehicle> {
        let make = required(&self.make, "make")?;
        let model = required(&self.model, "model")?;
        let plate = required(&self.plate, "plate")?;
        let year = required(&self.year, "year")?;
        let color = required(&self.color, "color")?;
        let odometer = required(&self.odometer, "odometer")?;

        let year: i32 = parse_number(year, "year")?;
        let odometer_km: u32 = parse_number(odometer, "odometer")?;

        let mut vehicles = storage::load::<Vehicle>(store)?.into_writable()?;

        let plate_lower = plate.to_lowercase();
        if vehicles
            .iter()
            .any(|vehicle| vehicle.plate.to_lowercase() == plate_lower)
        {
            return Err(Error::duplicate("plate", plate.to_uppercase()));
        }

        let vehicle = Vehicle {
            id: RecordId::generate(vehicles.iter().map(Record::id)),
            make: make.to_string(),
            model: model.to_string(),
            plate: plate.to_uppercase(),
            year,
            color: color.to_string(),
            odometer_km,
            status: VehicleStatus::Available,
        };

        vehicles.push(vehicle.clone());
        storage::save(store, &vehicles)?;

        info!(
            "Registered vehicle {} {} ({}) as {}",
            vehicle.make, vehicle.model, vehicle.plate, vehicle.id
        );
        Ok(vehicle)
    }
}

/// Input for registering a driver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriverForm {
    /// Full legal name.
    pub name: String,
    /// Employee number.
    pub employee_number: String,
    /// Contact phone.
    pub phone: String,
    /// Department.
    pub department: String,
    /// Driver's license number.
    pub license_number: String,
}

impl DriverForm {
    /// Validate the form and append a new driver to the store.
    ///
    /// Employee number and license number must each be unique (exact match).
    /// The employee number is checked first.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty field or a duplicate, or a
    /// storage error if the store fails.
    pub fn submit(&self, store: &dyn RecordStore) -> Result<Driver> {
        let name = required(&self.name, "name")?;
        let employee_number = required(&self.employee_number, "employee number")?;
        let phone = required(&self.phone, "phone")?;
        let department = required(&self.department, "department")?;
        let license_number = required(&self.license_number, "license number")?;

        let mut drivers = storage::load::<Driver>(store)?.into_writable()?;

        if drivers
            .iter()
            .any(|driver| driver.employee_number == employee_number)
        {
            return Err(Error::duplicate("employee number", employee_number));
        }
        if drivers
            .iter()
            .any(|driver| driver.license_number == license_number)
        {
            return Err(Error::duplicate("license number", license_number));
        }

        let driver = Driver {
            id: RecordId::generate(drivers.iter().map(Record::id)),
            name: name.to_string(),
            employee_number: employee_number.to_string(),
            phone: phone.to_string(),
            department: department.to_string(),
            license_number: license_number.to_string(),
            status: DriverStatus::Active,
        };

        drivers.push(driver.clone());
        storage::save(store, &drivers)?;

        info!("Registered driver {} as {}", driver.name, driver.id);
        Ok(driver)
    }
}

/// Input for recording a vehicle checkout.
///
/// The return fields are optional and can only be filled in here: an exit is
/// never edited after it is recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExitForm {
    /// Identifier of the vehicle leaving.
    pub vehicle_id: String,
    /// Identifier of the driver.
    pub driver_id: String,
    /// Checkout date, `YYYY-MM-DD`.
    pub exit_date: String,
    /// Checkout time, `HH:MM`.
    pub exit_time: String,
    /// Destination.
    pub destination: String,
    /// Odometer at checkout.
    pub exit_odometer: String,
    /// Return date, `YYYY-MM-DD`.
    pub return_date: Option<String>,
    /// Return time, `HH:MM`.
    pub return_time: Option<String>,
    /// Odometer at return.
    pub return_odometer: Option<String>,
    /// Free-text notes.
    pub observations: Option<String>,
}

impl ExitForm {
    /// Validate the form and append a new exit to the store.
    ///
    /// The referenced vehicle and driver must exist; their display fields are
    /// copied onto the exit as a snapshot.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty or unparseable field,
    /// [`Error::NotFound`] for an unknown vehicle or driver, or a storage error.
    pub fn submit(&self, store: &dyn RecordStore) -> Result<VehicleExit> {
        let vehicle_id = RecordId::new(parse_number(
            required(&self.vehicle_id, "vehicle")?,
            "vehicle",
        )?);
        let driver_id = RecordId::new(parse_number(
            required(&self.driver_id, "driver")?,
            "driver",
        )?);
        let exit_date = parse_date(required(&self.exit_date, "exit date")?, "exit date")?;
        let exit_time = parse_time(required(&self.exit_time, "exit time")?, "exit time")?;
        let destination = required(&self.destination, "destination")?;
        let exit_km: u32 = parse_number(
            required(&self.exit_odometer, "exit odometer")?,
            "exit odometer",
        )?;

        let return_date = optional(self.return_date.as_deref())
            .map(|value| parse_date(value, "return date"))
            .transpose()?;
        let return_time = optional(self.return_time.as_deref())
            .map(|value| parse_time(value, "return time"))
            .transpose()?;
        let return_km = optional(self.return_odometer.as_deref())
            .map(|value| parse_number::<u32>(value, "return odometer"))
            .transpose()?;
        let observations = optional(self.observations.as_deref()).map(str::to_string);

        let vehicle = find::<Vehicle>(store, vehicle_id)?;
        let driver = find::<Driver>(store, driver_id)?;

        let mut exits = storage::load::<VehicleExit>(store)?.into_writable()?;
        let exit = VehicleExit {
            id: RecordId::generate(exits.iter().map(Record::id)),
            vehicle_id,
            driver_id,
            vehicle_name: vehicle.display_name(),
            driver_name: driver.name,
            plate: vehicle.plate,
            exit_date,
            exit_time,
            destination: destination.to_string(),
            exit_km,
            return_date,
            return_time,
            return_km,
            observations,
        };

        exits.push(exit.clone());
        storage::save(store, &exits)?;

        info!(
            "Recorded exit {} of {} ({}) on {}",
            exit.id, exit.vehicle_name, exit.plate, exit.exit_date
        );
        Ok(exit)
    }
}

fn find<T: Record>(store: &dyn RecordStore, id: RecordId) -> Result<T> {
    storage::load::<T>(store)?
        .records
        .into_iter()
        .find(|record| record.id() == id)
        .ok_or(Error::NotFound {
            collection: T::COLLECTION.as_str(),
            id: id.get(),
        })
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(Error::missing_field(field))
    } else {
        Ok(trimmed)
    }
}

fn optional(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_number<T>(value: &str, field: &'static str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e: T::Err| Error::invalid_field(field, format!("'{value}': {e}")))
}

fn parse_date(value: &str, field: &'static str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| Error::invalid_field(field, format!("'{value}' is not YYYY-MM-DD: {e}")))
}

fn parse_time(value: &str, field: &'static str) -> Result<String> {
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .map(|time| time.format(TIME_FORMAT).to_string())
        .map_err(|e| Error::invalid_field(field, format!("'{value}' is not HH:MM: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::CollectionKey;
    use crate::storage::MemoryStore;

    fn onix() -> VehicleForm {
        VehicleForm {
            make: "Chevrolet".to_string(),
            model: "Onix".to_string(),
            plate: "abc-1234".to_string(),
            year: "2022".to_string(),
            color: "Branco".to_string(),
            odometer: "15000".to_string(),
        }
    }

    fn joao() -> DriverForm {
        DriverForm {
            name: "João Silva".to_string(),
            employee_number: "12345".to_string(),
            phone: "(11) 99999-9999".to_string(),
            department: "Administrativo".to_string(),
            license_number: "AB-001".to_string(),
        }
    }

    fn checkout(vehicle: &Vehicle, driver: &Driver) -> ExitForm {
        ExitForm {
            vehicle_id: vehicle.id.to_string(),
            driver_id: driver.id.to_string(),
            exit_date: "2024-01-05".to_string(),
            exit_time: "8:30".to_string(),
            destination: "Centro".to_string(),
            exit_odometer: "15000".to_string(),
            ..ExitForm::default()
        }
    }

    #[test]
    fn test_vehicle_submit_uppercases_plate() {
        let store = MemoryStore::new();
        let vehicle = onix().submit(&store).unwrap();

        assert_eq!(vehicle.plate, "ABC-1234");
        assert_eq!(vehicle.year, 2022);
        assert_eq!(vehicle.odometer_km, 15_000);
        assert_eq!(vehicle.status, VehicleStatus::Available);

        let stored = storage::load::<Vehicle>(&store).unwrap().records;
        assert_eq!(stored, vec![vehicle]);
    }

    #[test]
    fn test_vehicle_duplicate_plate_case_insensitive() {
        let store = MemoryStore::new();
        onix().submit(&store).unwrap();
        let before = storage::load::<Vehicle>(&store).unwrap().records;

        let mut again = onix();
        again.plate = "ABC-1234".to_string();
        again.model = "Prisma".to_string();
        let err = again.submit(&store).unwrap_err();

        assert!(matches!(err, Error::Duplicate { field: "plate", .. }));
        assert_eq!(storage::load::<Vehicle>(&store).unwrap().records, before);
    }

    #[test]
    fn test_vehicle_submit_leaves_unreadable_collection_alone() {
        let store = MemoryStore::new();
        store.save_raw(CollectionKey::Vehicles, "{broken").unwrap();

        let err = onix().submit(&store).unwrap_err();
        assert_eq!(err.exit_code(), 5);
        assert_eq!(
            store.load_raw(CollectionKey::Vehicles).unwrap().as_deref(),
            Some("{broken")
        );
    }

    #[test]
    fn test_vehicle_missing_field() {
        let store = MemoryStore::new();
        let mut form = onix();
        form.color = "   ".to_string();

        let err = form.submit(&store).unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "color" }));
        assert!(storage::load::<Vehicle>(&store).unwrap().records.is_empty());
    }

    #[test]
    fn test_vehicle_invalid_odometer() {
        let store = MemoryStore::new();
        let mut form = onix();
        form.odometer = "-5".to_string();

        let err = form.submit(&store).unwrap_err();
        assert!(matches!(err, Error::InvalidField { field: "odometer", .. }));
    }

    #[test]
    fn test_vehicle_ids_unique() {
        let store = MemoryStore::new();
        let first = onix().submit(&store).unwrap();
        let mut second = onix();
        second.plate = "XYZ-9999".to_string();
        let second = second.submit(&store).unwrap();

        assert_ne!(first.id, second.id);
        assert!(second.id > first.id);
    }

    #[test]
    fn test_driver_submit() {
        let store = MemoryStore::new();
        let driver = joao().submit(&store).unwrap();
        assert_eq!(driver.status, DriverStatus::Active);
        assert_eq!(storage::load::<Driver>(&store).unwrap().records, vec![driver]);
    }

    #[test]
    fn test_driver_duplicate_employee_number() {
        let store = MemoryStore::new();
        joao().submit(&store).unwrap();

        let mut form = joao();
        form.license_number = "OTHER".to_string();
        let err = form.submit(&store).unwrap_err();
        assert!(matches!(
            err,
            Error::Duplicate {
                field: "employee number",
                ..
            }
        ));
    }

    #[test]
    fn test_driver_duplicate_license_number() {
        let store = MemoryStore::new();
        joao().submit(&store).unwrap();

        let mut form = joao();
        form.employee_number = "99999".to_string();
        let err = form.submit(&store).unwrap_err();
        assert!(matches!(
            err,
            Error::Duplicate {
                field: "license number",
                ..
            }
        ));
        assert_eq!(storage::load::<Driver>(&store).unwrap().records.len(), 1);
    }

    #[test]
    fn test_driver_employee_number_checked_first() {
        let store = MemoryStore::new();
        joao().submit(&store).unwrap();

        let err = joao().submit(&store).unwrap_err();
        assert!(matches!(
            err,
            Error::Duplicate {
                field: "employee number",
                ..
            }
        ));
    }

    #[test]
    fn test_exit_snapshots_vehicle_and_driver() {
        let store = MemoryStore::new();
        let vehicle = onix().submit(&store).unwrap();
        let driver = joao().submit(&store).unwrap();

        let exit = checkout(&vehicle, &driver).submit(&store).unwrap();

        assert_eq!(exit.vehicle_id, vehicle.id);
        assert_eq!(exit.driver_id, driver.id);
        assert_eq!(exit.vehicle_name, "Chevrolet Onix");
        assert_eq!(exit.plate, "ABC-1234");
        assert_eq!(exit.driver_name, "João Silva");
        assert_eq!(exit.exit_time, "08:30");
        assert!(exit.is_in_progress());
    }

    #[test]
    fn test_exit_with_return() {
        let store = MemoryStore::new();
        let vehicle = onix().submit(&store).unwrap();
        let driver = joao().submit(&store).unwrap();

        let mut form = checkout(&vehicle, &driver);
        form.return_date = Some("2024-01-05".to_string());
        form.return_time = Some("17:45".to_string());
        form.return_odometer = Some("15100".to_string());
        form.observations = Some("  ".to_string());
        let exit = form.submit(&store).unwrap();

        assert_eq!(exit.return_km, Some(15_100));
        assert_eq!(exit.return_time.as_deref(), Some("17:45"));
        assert_eq!(exit.observations, None);
    }

    #[test]
    fn test_exit_unknown_vehicle() {
        let store = MemoryStore::new();
        let vehicle = onix().submit(&store).unwrap();
        let driver = joao().submit(&store).unwrap();

        let mut form = checkout(&vehicle, &driver);
        form.vehicle_id = "1".to_string();
        let err = form.submit(&store).unwrap_err();

        assert!(err.is_not_found());
        assert!(storage::load::<VehicleExit>(&store).unwrap().records.is_empty());
    }

    #[test]
    fn test_exit_invalid_date() {
        let store = MemoryStore::new();
        let vehicle = onix().submit(&store).unwrap();
        let driver = joao().submit(&store).unwrap();

        let mut form = checkout(&vehicle, &driver);
        form.exit_date = "05/01/2024".to_string();
        let err = form.submit(&store).unwrap_err();
        assert!(matches!(err, Error::InvalidField { field: "exit date", .. }));
    }

    #[test]
    fn test_exit_missing_destination() {
        let store = MemoryStore::new();
        let vehicle = onix().submit(&store).unwrap();
        let driver = joao().submit(&store).unwrap();

        let mut form = checkout(&vehicle, &driver);
        form.destination = String::new();
        let err = form.submit(&store).unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "destination" }));
    }

    #[test]
    fn test_exit_snapshot_survives_vehicle_deletion() {
        let store = MemoryStore::new();
        let vehicle = onix().submit(&store).unwrap();
        let driver = joao().submit(&store).unwrap();
        checkout(&vehicle, &driver).submit(&store).unwrap();

        storage::save::<Vehicle>(&store, &[]).unwrap();

        let exits = storage::load::<VehicleExit>(&store).unwrap().records;
        assert_eq!(exits.len(), 1);
        assert_eq!(exits[0].plate, "ABC-1234");
    }
}

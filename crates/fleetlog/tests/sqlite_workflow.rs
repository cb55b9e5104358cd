use fleetlog::forms::{DriverForm, ExitForm, VehicleForm};
use fleetlog::listing;
use fleetlog::report::preview::{SectionedPreview, TablePreview};
use fleetlog::report::{acknowledge_save, Grouping, PreviewOptions, Report};
use fleetlog::seed::seed_demo;
use fleetlog::storage::{self, RecordStore};
use fleetlog::transfer::{export_collection, import_collection};
use fleetlog::{CollectionKey, Driver, Error, SqliteStore, Vehicle, VehicleExit};
use tempfile::TempDir;

fn exit_form(vehicle: &Vehicle, driver: &Driver, date: &str, exit_km: &str) -> ExitForm {
    ExitForm {
        vehicle_id: vehicle.id.to_string(),
        driver_id: driver.id.to_string(),
        exit_date: date.to_string(),
        exit_time: "08:30".to_string(),
        destination: "Centro".to_string(),
        exit_odometer: exit_km.to_string(),
        ..ExitForm::default()
    }
}

#[test]
fn full_workflow_persists_across_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data").join("fleet.db");

    {
        let store = SqliteStore::open(&path).unwrap();
        let vehicle = VehicleForm {
            make: "Chevrolet".to_string(),
            model: "Onix".to_string(),
            plate: "abc-1234".to_string(),
            year: "2022".to_string(),
            color: "Branco".to_string(),
            odometer: "15000".to_string(),
        }
        .submit(&store)
        .unwrap();
        let driver = DriverForm {
            name: "João Silva".to_string(),
            employee_number: "12345".to_string(),
            phone: "(11) 99999-9999".to_string(),
            department: "Administrativo".to_string(),
            license_number: "04512378901".to_string(),
        }
        .submit(&store)
        .unwrap();

        let mut returned = exit_form(&vehicle, &driver, "2024-01-05", "15000");
        returned.return_date = Some("2024-01-05".to_string());
        returned.return_time = Some("17:00".to_string());
        returned.return_odometer = Some("15100".to_string());
        returned.submit(&store).unwrap();

        exit_form(&vehicle, &driver, "2024-02-01", "15100")
            .submit(&store)
            .unwrap();
    }

    let store = SqliteStore::open(&path).unwrap();
    let exits = storage::load::<VehicleExit>(&store).unwrap();
    assert!(exits.warning.is_none());
    assert_eq!(exits.records.len(), 2);
    assert_eq!(exits.records[0].vehicle_name, "Chevrolet Onix");
    assert_eq!(exits.records[0].plate, "ABC-1234");

    let report = Report::build(&exits.records, Grouping::Month);
    assert_eq!(report.period(), vec!["janeiro de 2024", "fevereiro de 2024"]);
    assert_eq!(report.totals.distance_km, 100);
    assert_eq!(report.totals.in_progress, 1);

    let options = PreviewOptions::default();
    let at = chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    let sectioned = SectionedPreview::new(&report, &options, at).to_string();
    assert!(sectioned.contains("janeiro de 2024"));
    assert!(sectioned.contains("in progress"));
    let table = TablePreview::new(&report, &options, at).to_string();
    assert!(table.contains("ABC-1234"));

    let ack = acknowledge_save(&report);
    assert_eq!(ack.exits, 2);
    assert_eq!(ack.groups, 2);
}

#[test]
fn seeded_store_supports_exits_and_deletes() {
    let dir = TempDir::new().unwrap();
    let store = SqliteStore::open(dir.path().join("fleet.db")).unwrap();
    seed_demo(&store).unwrap();

    let vehicles = listing::list::<Vehicle>(&store).unwrap().records;
    let drivers = listing::list::<Driver>(&store).unwrap().records;
    let exit = exit_form(&vehicles[2], &drivers[3], "2024-03-10", "35000")
        .submit(&store)
        .unwrap();
    assert_eq!(exit.driver_name, "Ana Oliveira");

    listing::request_delete::<Vehicle>(&store, vehicles[2].id)
        .unwrap()
        .confirm(&store)
        .unwrap();

    // Exits keep their snapshot after the vehicle is gone.
    let exits = listing::list::<VehicleExit>(&store).unwrap().records;
    assert_eq!(exits.len(), 1);
    assert_eq!(exits[0].plate, "GHI-9012");

    let stats = storage::stats(&store).unwrap();
    assert_eq!(stats.vehicles, 3);
    assert_eq!(stats.drivers, 5);
    assert_eq!(stats.exits_in_progress, 1);
}

#[test]
fn corrupt_collection_blocks_writes_until_imported() {
    let dir = TempDir::new().unwrap();
    let store = SqliteStore::open(dir.path().join("fleet.db")).unwrap();
    store.save_raw(CollectionKey::Drivers, "{broken").unwrap();

    let loaded = storage::load::<Driver>(&store).unwrap();
    assert!(loaded.records.is_empty());
    assert!(loaded.warning.is_some());

    let form = DriverForm {
        name: "Ana Oliveira".to_string(),
        employee_number: "12348".to_string(),
        phone: "(11) 66666-6666".to_string(),
        department: "RH".to_string(),
        license_number: "04512378904".to_string(),
    };
    let err = form.submit(&store).unwrap_err();
    assert!(matches!(err, Error::UnreadableCollection { .. }));
    assert_eq!(
        store.load_raw(CollectionKey::Drivers).unwrap().as_deref(),
        Some("{broken")
    );

    import_collection(&store, CollectionKey::Drivers, "[]").unwrap();
    form.submit(&store).unwrap();

    let loaded = storage::load::<Driver>(&store).unwrap();
    assert!(loaded.warning.is_none());
    assert_eq!(loaded.records.len(), 1);
}

#[test]
fn export_import_between_databases() {
    let dir = TempDir::new().unwrap();
    let source = SqliteStore::open(dir.path().join("source.db")).unwrap();
    let target = SqliteStore::open(dir.path().join("target.db")).unwrap();
    seed_demo(&source).unwrap();

    for key in [CollectionKey::Vehicles, CollectionKey::Drivers] {
        let json = export_collection(&source, key).unwrap();
        import_collection(&target, key, &json).unwrap();
    }

    assert_eq!(
        storage::load::<Vehicle>(&target).unwrap().records,
        storage::load::<Vehicle>(&source).unwrap().records
    );
    assert_eq!(storage::stats(&target).unwrap().drivers, 5);
}

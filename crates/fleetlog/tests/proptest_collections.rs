use chrono::NaiveDate;
use fleetlog::forms::VehicleForm;
use fleetlog::listing;
use fleetlog::report::{group_by_month, Grouping, Report};
use fleetlog::{MemoryStore, RecordId, Vehicle, VehicleExit};
use proptest::prelude::*;
use proptest::test_runner::Config;

fn vehicle_form(plate: &str) -> VehicleForm {
    VehicleForm {
        make: "Fiat".to_string(),
        model: "Uno".to_string(),
        plate: plate.to_string(),
        year: "2020".to_string(),
        color: "Azul".to_string(),
        odometer: "1000".to_string(),
    }
}

fn exit_strategy() -> impl Strategy<Value = VehicleExit> {
    (
        1_i64..1_000,
        2023_i32..2026,
        1_u32..13,
        1_u32..29,
        0_usize..3,
        0_u32..100_000,
        proptest::option::of(0_u32..1_000),
    )
        .prop_map(|(id, year, month, day, vehicle, exit_km, delta)| {
            let names = ["Chevrolet Onix", "Fiat Uno", "Ford Ka"];
            let plates = ["ABC-1234", "GHI-9012", "JKL-3456"];
            VehicleExit {
                id: RecordId::new(id),
                vehicle_id: RecordId::new(i64::try_from(vehicle).unwrap_or_default()),
                driver_id: RecordId::new(1),
                vehicle_name: names[vehicle].to_string(),
                driver_name: "Ana Oliveira".to_string(),
                plate: plates[vehicle].to_string(),
                exit_date: NaiveDate::from_ymd_opt(year, month, day).unwrap(),
                exit_time: "08:00".to_string(),
                destination: "Centro".to_string(),
                exit_km,
                return_date: None,
                return_time: None,
                return_km: delta.map(|d| exit_km + d),
                observations: None,
            }
        })
}

proptest! {
    #![proptest_config(Config::with_cases(32))]
    #[test]
    fn created_vehicles_list_in_creation_order(
        plates in proptest::collection::hash_set("[A-Z]{3}-[0-9]{4}", 1..8)
    ) {
        let plates: Vec<String> = plates.into_iter().collect();
        let store = MemoryStore::new();
        for plate in &plates {
            vehicle_form(plate).submit(&store).expect("submit vehicle");
        }

        let listed: Vec<String> = listing::list::<Vehicle>(&store)
            .expect("list vehicles")
            .records
            .into_iter()
            .map(|vehicle| vehicle.plate)
            .collect();
        prop_assert_eq!(listed, plates);
    }

    #[test]
    fn deleting_one_vehicle_keeps_the_rest(
        plates in proptest::collection::hash_set("[A-Z]{3}-[0-9]{4}", 1..8),
        pick in any::<prop::sample::Index>()
    ) {
        let store = MemoryStore::new();
        let created: Vec<Vehicle> = plates
            .iter()
            .map(|plate| vehicle_form(plate).submit(&store).expect("submit vehicle"))
            .collect();
        let target = &created[pick.index(created.len())];

        listing::request_delete::<Vehicle>(&store, target.id)
            .expect("request delete")
            .confirm(&store)
            .expect("confirm delete");

        let remaining = listing::list::<Vehicle>(&store).expect("list").records;
        let expected: Vec<Vehicle> = created
            .iter()
            .filter(|vehicle| vehicle.id != target.id)
            .cloned()
            .collect();
        prop_assert_eq!(remaining, expected);
    }

    #[test]
    fn month_grouping_is_stable_and_complete(
        exits in proptest::collection::vec(exit_strategy(), 0..20)
    ) {
        let first = group_by_month(&exits);
        let second = group_by_month(&exits);
        prop_assert_eq!(&first, &second);

        let grouped: usize = first.iter().map(|group| group.exits.len()).sum();
        prop_assert_eq!(grouped, exits.len());
        for pair in first.windows(2) {
            prop_assert!(pair[0].key < pair[1].key);
        }
    }

    #[test]
    fn report_totals_match_across_groupings(
        exits in proptest::collection::vec(exit_strategy(), 0..20)
    ) {
        let by_month = Report::build(&exits, Grouping::Month);
        let by_vehicle = Report::build(&exits, Grouping::Vehicle);
        prop_assert_eq!(by_month.totals, by_vehicle.totals);

        let in_progress = exits.iter().filter(|exit| exit.return_km.is_none()).count();
        prop_assert_eq!(by_month.totals.in_progress, in_progress);

        let group_distance: i64 = by_vehicle.groups.iter().map(|g| g.totals.distance_km).sum();
        prop_assert_eq!(group_distance, by_vehicle.totals.distance_km);
    }

    #[test]
    fn generated_ids_never_collide(
        now in 0_i64..1_000_000,
        existing in proptest::collection::vec(0_i64..2_000_000, 0..16)
    ) {
        let ids: Vec<RecordId> = existing.into_iter().map(RecordId::new).collect();
        let fresh = RecordId::generate_at(now, ids.iter().copied());
        prop_assert!(!ids.contains(&fresh));
        prop_assert!(fresh.get() >= now);
    }
}

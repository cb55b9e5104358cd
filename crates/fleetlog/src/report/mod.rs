//! Exit reports.
//!
//! A [`Report`] groups exits either by calendar month or by vehicle and
//! carries per-group and overall totals. Rendering lives in [`preview`].
//!
//! Distance for an exit is `return_km - exit_km` when a return odometer was
//! recorded. Exits without one count as in progress and add nothing to the
//! distance totals. A return reading below the exit reading yields a negative
//! distance, which is reported unchanged.

mod month;
pub mod preview;

use std::collections::BTreeMap;
use std::fmt;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::record::VehicleExit;

pub use month::month_label;
pub use preview::{acknowledge_save, PreviewOptions, SaveAcknowledgement};

/// How exits are bucketed in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grouping {
    /// One group per calendar month of the exit date.
    #[default]
    Month,
    /// One group per vehicle name and plate.
    Vehicle,
}

impl fmt::Display for Grouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Month => write!(f, "month"),
            Self::Vehicle => write!(f, "vehicle"),
        }
    }
}

/// The derived key an exit is grouped under.
///
/// Ordering is chronological for months and alphabetical for vehicles, and
/// determines the order of groups in a report.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GroupKey {
    /// A calendar month.
    Month {
        /// Calendar year.
        year: i32,
        /// Month number, 1 to 12.
        month: u32,
    },
    /// A vehicle, identified by its snapshot name and plate.
    Vehicle {
        /// Vehicle make and model.
        name: String,
        /// License plate.
        plate: String,
    },
}

impl GroupKey {
    /// The key `exit` falls under for `grouping`.
    #[must_use]
    pub fn for_exit(exit: &VehicleExit, grouping: Grouping) -> Self {
        match grouping {
            Grouping::Month => Self::Month {
                year: exit.exit_date.year(),
                month: exit.exit_date.month(),
            },
            Grouping::Vehicle => Self::Vehicle {
                name: exit.vehicle_name.clone(),
                plate: exit.plate.clone(),
            },
        }
    }

    /// Display label, e.g. `janeiro de 2024` or `Fiat Uno - GHI-9012`.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Month { year, month } => month_label(*year, *month),
            Self::Vehicle { name, plate } => format!("{name} - {plate}"),
        }
    }
}

/// Counts and distance over a set of exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Totals {
    /// Number of exits.
    pub exits: usize,
    /// Sum of distances over exits with a return reading.
    pub distance_km: i64,
    /// Exits without a return reading.
    pub in_progress: usize,
}

impl Totals {
    /// Compute totals over `exits`.
    #[must_use]
    pub fn of<'a>(exits: impl IntoIterator<Item = &'a VehicleExit>) -> Self {
        exits.into_iter().fold(Self::default(), |mut acc, exit| {
            acc.exits += 1;
            match distance_km(exit) {
                Some(km) => acc.distance_km += km,
                None => acc.in_progress += 1,
            }
            acc
        })
    }
}

/// Distance covered by one exit, or `None` while it is in progress.
#[must_use]
pub fn distance_km(exit: &VehicleExit) -> Option<i64> {
    exit.return_km
        .map(|back| i64::from(back) - i64::from(exit.exit_km))
}

/// One bucket of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExitGroup {
    /// The grouping key.
    pub key: GroupKey,
    /// Display label of the key.
    pub label: String,
    /// Totals over this group.
    pub totals: Totals,
    /// The exits in this group.
    pub exits: Vec<VehicleExit>,
}

impl ExitGroup {
    fn new(key: GroupKey, exits: Vec<VehicleExit>) -> Self {
        Self {
            label: key.label(),
            totals: Totals::of(&exits),
            key,
            exits,
        }
    }
}

/// Group exits by calendar month of their exit date.
///
/// Groups are in chronological order. Within a group, exits keep the order
/// they were given in.
#[must_use]
pub fn group_by_month(exits: &[VehicleExit]) -> Vec<ExitGroup> {
    bucket(exits, Grouping::Month)
        .into_iter()
        .map(|(key, exits)| ExitGroup::new(key, exits))
        .collect()
}

/// Group exits by vehicle name and plate.
///
/// Groups are ordered by name then plate. Within a group, exits are sorted by
/// exit date, keeping the given order for exits on the same date.
#[must_use]
pub fn group_by_vehicle(exits: &[VehicleExit]) -> Vec<ExitGroup> {
    bucket(exits, Grouping::Vehicle)
        .into_iter()
        .map(|(key, mut exits)| {
            exits.sort_by_key(|exit| exit.exit_date);
            ExitGroup::new(key, exits)
        })
        .collect()
}

fn bucket(exits: &[VehicleExit], grouping: Grouping) -> BTreeMap<GroupKey, Vec<VehicleExit>> {
    let mut buckets: BTreeMap<GroupKey, Vec<VehicleExit>> = BTreeMap::new();
    for exit in exits {
        buckets
            .entry(GroupKey::for_exit(exit, grouping))
            .or_default()
            .push(exit.clone());
    }
    buckets
}

/// Grouped exits with overall totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// How the exits were grouped.
    pub grouping: Grouping,
    /// The groups, in key order.
    pub groups: Vec<ExitGroup>,
    /// Totals over all exits.
    pub totals: Totals,
}

impl Report {
    /// Build a report over `exits`.
    #[must_use]
    pub fn build(exits: &[VehicleExit], grouping: Grouping) -> Self {
        let groups = match grouping {
            Grouping::Month => group_by_month(exits),
            Grouping::Vehicle => group_by_vehicle(exits),
        };
        Self {
            grouping,
            groups,
            totals: Totals::of(exits),
        }
    }

    /// Whether the report has no exits at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// All exits flattened and sorted by exit date only.
    ///
    /// The sort is stable, so exits on the same date stay in group order.
    #[must_use]
    pub fn chronological(&self) -> Vec<&VehicleExit> {
        let mut all: Vec<&VehicleExit> = self
            .groups
            .iter()
            .flat_map(|group| group.exits.iter())
            .collect();
        all.sort_by_key(|exit| exit.exit_date);
        all
    }

    /// Labels of every group, in order.
    #[must_use]
    pub fn period(&self) -> Vec<&str> {
        self.groups.iter().map(|group| group.label.as_str()).collect()
    }
}

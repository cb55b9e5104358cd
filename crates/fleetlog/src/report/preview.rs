//! Report preview rendering.
//!
//! Previews borrow a [`Report`] and only read it. "Saving" a report is
//! simulated: [`acknowledge_save`] produces the confirmation shown to the user
//! and writes nothing.

use std::fmt;
use std::iter;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::record::VehicleExit;

use super::{distance_km, Report, Totals};

/// Date format used in rendered reports.
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

const EMPTY_MESSAGE: &str = "No exits recorded yet.";

const TABLE_HEADERS: [&str; 12] = [
    "#",
    "Exit date",
    "Exit time",
    "Vehicle",
    "Plate",
    "Driver",
    "Destination",
    "Exit km",
    "Return date",
    "Return time",
    "Return km",
    "Distance",
];

/// Presentation settings for a preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewOptions {
    /// Heading printed above the report.
    pub title: String,
    /// Text shown instead of a distance for exits without a return.
    pub in_progress_label: String,
    /// Whether to print exit observations.
    pub show_observations: bool,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            title: "Vehicle exit report".to_string(),
            in_progress_label: "in progress".to_string(),
            show_observations: true,
        }
    }
}

/// One section per group, each with its own totals.
#[derive(Debug)]
pub struct SectionedPreview<'a> {
    report: &'a Report,
    options: &'a PreviewOptions,
    generated_at: NaiveDateTime,
}

impl<'a> SectionedPreview<'a> {
    /// Prepare a sectioned preview of `report`.
    #[must_use]
    pub fn new(report: &'a Report, options: &'a PreviewOptions, generated_at: NaiveDateTime) -> Self {
        Self {
            report,
            options,
            generated_at,
        }
    }
}

impl fmt::Display for SectionedPreview<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_header(f, self.report, self.options, self.generated_at)?;
        if self.report.is_empty() {
            return writeln!(f, "{EMPTY_MESSAGE}");
        }

        for group in &self.report.groups {
            writeln!(f)?;
            writeln!(f, "{} ({})", group.label, describe_totals(&group.totals))?;
            for (index, exit) in group.exits.iter().enumerate() {
                writeln!(
                    f,
                    "  {}. {} {}  {} - {}",
                    index + 1,
                    display_date(exit.exit_date),
                    exit.exit_time,
                    exit.vehicle_name,
                    exit.plate
                )?;
                writeln!(
                    f,
                    "     Driver: {} | Destination: {} | Exit km: {}",
                    exit.driver_name,
                    exit.destination,
                    format_km(i64::from(exit.exit_km))
                )?;
                match distance_km(exit) {
                    Some(km) => writeln!(
                        f,
                        "     Return: {} | Return km: {} | Distance: {} km",
                        display_return(exit),
                        exit.return_km
                            .map_or_else(|| "-".to_string(), |back| format_km(i64::from(back))),
                        format_km(km)
                    )?,
                    None => writeln!(f, "     Status: {}", self.options.in_progress_label)?,
                }
                if self.options.show_observations {
                    if let Some(notes) = &exit.observations {
                        writeln!(f, "     Observations: {notes}")?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// All exits in one chronological table.
#[derive(Debug)]
pub struct TablePreview<'a> {
    report: &'a Report,
    options: &'a PreviewOptions,
    generated_at: NaiveDateTime,
}

impl<'a> TablePreview<'a> {
    /// Prepare a table preview of `report`.
    #[must_use]
    pub fn new(report: &'a Report, options: &'a PreviewOptions, generated_at: NaiveDateTime) -> Self {
        Self {
            report,
            options,
            generated_at,
        }
    }

    fn row(&self, number: usize, exit: &VehicleExit) -> Vec<String> {
        let mut cells = vec![
            number.to_string(),
            display_date(exit.exit_date),
            exit.exit_time.clone(),
            exit.vehicle_name.clone(),
            exit.plate.clone(),
            exit.driver_name.clone(),
            exit.destination.clone(),
            format_km(i64::from(exit.exit_km)),
            exit.return_date.map_or_else(|| "-".to_string(), display_date),
            exit.return_time.clone().unwrap_or_else(|| "-".to_string()),
            exit.return_km
                .map_or_else(|| "-".to_string(), |back| format_km(i64::from(back))),
            distance_km(exit).map_or_else(|| self.options.in_progress_label.clone(), format_km),
        ];
        if self.options.show_observations {
            cells.push(exit.observations.clone().unwrap_or_default());
        }
        cells
    }
}

impl fmt::Display for TablePreview<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_header(f, self.report, self.options, self.generated_at)?;
        if self.report.is_empty() {
            return writeln!(f, "{EMPTY_MESSAGE}");
        }

        let mut headers: Vec<String> = TABLE_HEADERS.iter().map(ToString::to_string).collect();
        if self.options.show_observations {
            headers.push("Observations".to_string());
        }

        let rows: Vec<Vec<String>> = self
            .report
            .chronological()
            .into_iter()
            .enumerate()
            .map(|(index, exit)| self.row(index + 1, exit))
            .collect();

        let widths: Vec<usize> = (0..headers.len())
            .map(|column| {
                rows.iter()
                    .map(|row| row[column].chars().count())
                    .chain(iter::once(headers[column].chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        writeln!(f)?;
        write_row(f, &headers, &widths)?;
        let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
        writeln!(f, "{}", rule.join("-+-"))?;
        for row in &rows {
            write_row(f, row, &widths)?;
        }
        writeln!(
            f,
            "TOTAL: {} | {} km",
            plural(self.report.totals.exits, "exit", "exits"),
            format_km(self.report.totals.distance_km)
        )
    }
}

/// Render `report` as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_json(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Confirmation of a simulated report save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveAcknowledgement {
    /// Message for the user.
    pub message: String,
    /// Number of exits in the saved report.
    pub exits: usize,
    /// Number of groups in the saved report.
    pub groups: usize,
}

impl fmt::Display for SaveAcknowledgement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {})",
            self.message,
            plural(self.exits, "exit", "exits"),
            plural(self.groups, "group", "groups")
        )
    }
}

/// Acknowledge a report save. No file is produced.
#[must_use]
pub fn acknowledge_save(report: &Report) -> SaveAcknowledgement {
    info!(
        "Report with {} exits in {} groups marked as saved",
        report.totals.exits,
        report.groups.len()
    );
    SaveAcknowledgement {
        message: "Report saved successfully".to_string(),
        exits: report.totals.exits,
        groups: report.groups.len(),
    }
}

/// Format a kilometre figure with `.` as the thousands separator.
#[must_use]
pub fn format_km(km: i64) -> String {
    let digits = km.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if km < 0 {
        grouped.push('-');
    }
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    grouped
}

fn write_header(
    f: &mut fmt::Formatter<'_>,
    report: &Report,
    options: &PreviewOptions,
    generated_at: NaiveDateTime,
) -> fmt::Result {
    writeln!(f, "{}", options.title.to_uppercase())?;
    writeln!(
        f,
        "Generated {} at {}",
        generated_at.format(DISPLAY_DATE_FORMAT),
        generated_at.format("%H:%M:%S")
    )?;
    if report.is_empty() {
        return Ok(());
    }
    writeln!(
        f,
        "Grouped by {} | {}",
        report.grouping,
        describe_totals(&report.totals)
    )?;
    writeln!(f, "Period: {}", report.period().join(", "))
}

fn write_row(f: &mut fmt::Formatter<'_>, cells: &[String], widths: &[usize]) -> fmt::Result {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    writeln!(f, "{}", padded.join(" | ").trim_end())
}

fn describe_totals(totals: &Totals) -> String {
    let mut text = format!(
        "{}, {} km",
        plural(totals.exits, "exit", "exits"),
        format_km(totals.distance_km)
    );
    if totals.in_progress > 0 {
        text.push_str(&format!(", {} in progress", totals.in_progress));
    }
    text
}

fn display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

fn display_return(exit: &VehicleExit) -> String {
    match (exit.return_date, exit.return_time.as_deref()) {
        (Some(date), Some(time)) => format!("{} {time}", display_date(date)),
        (Some(date), None) => display_date(date),
        (None, Some(time)) => time.to_string(),
        (None, None) => "-".to_string(),
    }
}

fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{count} {one}")
    } else {
        format!("{count} {many}")
    }
}

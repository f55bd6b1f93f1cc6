use chrono::NaiveDate;
use std::fmt::{self, Write as _};
use std::fs;
use std::path::Path;

use crate::error::TimesheetError;
use crate::models::{DaySummary, MonthBuckets};

const DAY_DIVIDER: &str = "###################################";
const SECTION_DIVIDER: &str = "--------";

/// Which days of the month get a block in the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DayRange {
    /// Days 1 through 30 only, as the historical reports were produced.
    FirstThirty,
    /// Every day of the month.
    #[default]
    WholeMonth,
}

impl DayRange {
    fn last_day(self) -> u32 {
        match self {
            DayRange::FirstThirty => 30,
            DayRange::WholeMonth => 31,
        }
    }
}

/// Twelve significant digits in `%g` style, keeping `.0` on whole numbers
/// (`2.0`, `0.333333333333`, `1e+16`).
pub fn format_hours(hours: f64) -> String {
    const PRECISION: i32 = 12;

    if hours.is_nan() {
        return "nan".to_string();
    }
    if hours.is_infinite() {
        return if hours > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    // The exponent after rounding decides between fixed and scientific form.
    let scientific = format!("{:.*e}", (PRECISION - 1) as usize, hours);
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if (-4..PRECISION).contains(&exponent) {
        let decimals = (PRECISION - 1 - exponent) as usize;
        let fixed = format!("{:.*}", decimals, hours);
        let fixed = trim_fraction(&fixed);
        if fixed.contains('.') {
            fixed.to_string()
        } else {
            format!("{fixed}.0")
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exponent.abs())
    }
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

pub fn render(buckets: &MonthBuckets, year: i32, month: u32, range: DayRange) -> String {
    let mut out = String::new();
    for day in 1..=range.last_day() {
        // Stops at the end of short months.
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            break;
        };
        let empty = DaySummary::default();
        let summary = buckets.day(day).unwrap_or(&empty);
        write_day(&mut out, date, summary).expect("Failed to format day block");
    }
    out
}

fn write_day(out: &mut String, date: NaiveDate, summary: &DaySummary) -> fmt::Result {
    writeln!(out, "{DAY_DIVIDER}")?;
    writeln!(out, "{DAY_DIVIDER}")?;
    writeln!(out, "Day: {}", date.format("%A - %B %d, %Y"))?;
    writeln!(out, "{SECTION_DIVIDER}")?;

    for total in summary.totals.iter() {
        writeln!(out, "Project: {}", total.project)?;
        writeln!(out, "Hours: {}", format_hours(total.hours))?;
        writeln!(out, "Description: {}", total.description)?;
        writeln!(out, "{SECTION_DIVIDER}")?;
    }

    let day_total = if summary.totals.is_empty() {
        "0".to_string()
    } else {
        format_hours(summary.totals.total_hours())
    };
    write!(out, "\nTOTAL: {day_total}\n\n")
}

pub fn write_report(path: &Path, report: &str) -> Result<(), TimesheetError> {
    fs::write(path, report)?;
    Ok(())
}

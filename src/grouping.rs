use chrono::Datelike;

use crate::models::{DaySummary, MonthBuckets, TimesheetEntry};

/// Keeps entries starting in the given month, in their original order.
pub fn filter_month(entries: Vec<TimesheetEntry>, month: u32, year: i32) -> Vec<TimesheetEntry> {
    entries
        .into_iter()
        .filter(|e| e.start.month() == month && e.start.year() == year)
        .collect()
}

/// Buckets entries by the day of month they start on.
pub fn group_by_day(entries: Vec<TimesheetEntry>) -> MonthBuckets {
    let mut buckets = MonthBuckets::new();
    for entry in entries {
        if let Some(day) = buckets.day_mut(entry.start.day()) {
            day.entries.push(entry);
        }
    }
    buckets
}

/// Rebuilds a day's project totals from its entries.
pub fn summarize(day: &mut DaySummary) {
    day.totals.clear();
    for entry in &day.entries {
        day.totals.add(entry);
    }
}

pub fn summarize_month(buckets: &mut MonthBuckets) {
    for (_, day) in buckets.days_mut() {
        summarize(day);
    }
}

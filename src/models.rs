use chrono::DateTime;
use chrono_tz::Tz;
use std::collections::BTreeMap;
use std::fmt;

use crate::report::format_hours;

/// Summaries starting with this prefix are booked to a project named after the whole summary.
pub const ADMIN_PREFIX: &str = "Admin";

/// Day keys every `MonthBuckets` carries, whatever the month's real length.
pub const MAX_DAY_OF_MONTH: u32 = 31;

#[derive(Debug, Clone, PartialEq)]
pub struct TimesheetEntry {
    pub project: String,
    pub description: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    /// May be negative when the event ends before it starts.
    pub duration_hours: f64,
}

impl TimesheetEntry {
    pub fn is_admin(&self) -> bool {
        self.project.starts_with(ADMIN_PREFIX)
    }
}

impl fmt::Display for TimesheetEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = format_hours(self.duration_hours);
        if self.is_admin() {
            write!(f, "< {} ({} hours) >", self.project, hours)
        } else {
            write!(f, "< {} - {} ({} hours) >", self.project, self.description, hours)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectTotal {
    pub project: String,
    pub hours: f64,
    pub description: String,
}

/// Per-project totals for one day, iterated in the order projects were first seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectTotals {
    totals: Vec<ProjectTotal>,
}

impl ProjectTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry's hours to its project. A later description is put in
    /// front of the ones already collected.
    pub fn add(&mut self, entry: &TimesheetEntry) {
        match self.totals.iter_mut().find(|t| t.project == entry.project) {
            Some(total) => {
                total.hours += entry.duration_hours;
                total.description = format!("{} {}", entry.description, total.description);
            }
            None => self.totals.push(ProjectTotal {
                project: entry.project.clone(),
                hours: entry.duration_hours,
                description: entry.description.clone(),
            }),
        }
    }

    #[cfg(test)]
    pub fn get(&self, project: &str) -> Option<&ProjectTotal> {
        self.totals.iter().find(|t| t.project == project)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProjectTotal> {
        self.totals.iter()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn clear(&mut self) {
        self.totals.clear();
    }

    pub fn total_hours(&self) -> f64 {
        self.totals.iter().map(|t| t.hours).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DaySummary {
    /// Entries in calendar scan order.
    pub entries: Vec<TimesheetEntry>,
    pub totals: ProjectTotals,
}

/// One `DaySummary` per day key 1..=31.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthBuckets {
    days: BTreeMap<u32, DaySummary>,
}

impl Default for MonthBuckets {
    fn default() -> Self {
        Self::new()
    }
}

impl MonthBuckets {
    pub fn new() -> Self {
        let days = (1..=MAX_DAY_OF_MONTH)
            .map(|day| (day, DaySummary::default()))
            .collect();
        MonthBuckets { days }
    }

    pub fn day(&self, day: u32) -> Option<&DaySummary> {
        self.days.get(&day)
    }

    pub fn day_mut(&mut self, day: u32) -> Option<&mut DaySummary> {
        self.days.get_mut(&day)
    }

    pub fn days_mut(&mut self) -> impl Iterator<Item = (u32, &mut DaySummary)> {
        self.days.iter_mut().map(|(day, summary)| (*day, summary))
    }
}

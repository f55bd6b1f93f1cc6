pub mod calendar_ics;
pub mod error;
pub mod grouping;
pub mod models;
pub mod parser;
pub mod report;

use chrono::Month;
use chrono_tz::Tz;
use log::{debug, info};
use std::path::PathBuf;

use crate::calendar_ics::RawEvent;
pub use crate::error::{ParseError, TimesheetError};
pub use crate::models::{DaySummary, MonthBuckets, ProjectTotal, ProjectTotals, TimesheetEntry};
pub use crate::report::DayRange;

pub struct Config {
    pub month: Month,
    pub year: i32,
    pub time_zone: Tz,
    /// Where `<month>-<year>.ics` is read from and the report written to.
    pub directory: PathBuf,
    pub day_range: DayRange,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            month: Month::May,
            year: 2016,
            time_zone: Tz::US__Eastern,
            directory: PathBuf::from("."),
            day_range: DayRange::default(),
        }
    }
}

impl Config {
    /// Builds from `[program, month-name, year, time-zone]`; every argument
    /// after the program name is optional and falls back to the defaults.
    pub fn build(mut args: impl Iterator<Item = String>) -> Result<Config, &'static str> {
        args.next();
        let mut config = Config::default();

        if let Some(arg) = args.next() {
            config.month = arg
                .parse::<Month>()
                .map_err(|_| "Month must be an English month name")?;
        }

        if let Some(arg) = args.next() {
            config.year = arg.parse().map_err(|_| "Year must be a number")?;
        }

        if let Some(arg) = args.next() {
            config.time_zone = arg
                .parse::<Tz>()
                .map_err(|_| "Time zone must be an IANA name like US/Eastern")?;
        }

        Ok(config)
    }

    pub fn month_number(&self) -> u32 {
        self.month.number_from_month()
    }

    /// Lower-case English month name, as used in file names.
    pub fn month_name(&self) -> String {
        self.month.name().to_lowercase()
    }

    pub fn input_path(&self) -> PathBuf {
        self.directory
            .join(format!("{}-{}.ics", self.month_name(), self.year))
    }

    pub fn output_path(&self) -> PathBuf {
        self.directory
            .join(format!("{}-{}.txt", self.month_name(), self.year))
    }
}

/// Entries that parsed, and how many records were dropped.
#[derive(Debug, Default)]
pub struct ParsedEvents {
    pub entries: Vec<TimesheetEntry>,
    pub skipped: usize,
}

pub fn parse_events(events: &[RawEvent], zone: Tz) -> ParsedEvents {
    let mut parsed = ParsedEvents::default();
    for event in events {
        match parser::parse_event(event, zone) {
            Ok(entry) => {
                debug!("parsed {entry}");
                parsed.entries.push(entry);
            }
            Err(e) => {
                debug!("skipping event {:?}: {e}", event.summary);
                parsed.skipped += 1;
            }
        }
    }
    parsed
}

pub fn build_report(config: &Config, entries: Vec<TimesheetEntry>) -> String {
    let entries = grouping::filter_month(entries, config.month_number(), config.year);
    info!(
        "{} entries in {} {}",
        entries.len(),
        config.month.name(),
        config.year
    );

    let mut buckets = grouping::group_by_day(entries);
    grouping::summarize_month(&mut buckets);
    report::render(&buckets, config.year, config.month_number(), config.day_range)
}

pub fn run(config: Config) -> Result<(), TimesheetError> {
    let input = config.input_path();
    let events = calendar_ics::load_events(&input)?;

    let parsed = parse_events(&events, config.time_zone);
    info!(
        "read {} events from {}, skipped {}",
        events.len(),
        input.display(),
        parsed.skipped
    );

    let report = build_report(&config, parsed.entries);
    let output = config.output_path();
    report::write_report(&output, &report)?;
    info!("wrote {}", output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar_ics::IcsDateTime;
    use std::path::Path;

    fn args(values: &[&str]) -> impl Iterator<Item = String> {
        values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn test_config_build_defaults() {
        let config = Config::build(args(&["program_name"])).unwrap();
        assert_eq!(config.month, Month::May);
        assert_eq!(config.year, 2016);
        assert_eq!(config.time_zone, Tz::US__Eastern);
        assert_eq!(config.day_range, DayRange::WholeMonth);
        assert_eq!(config.input_path(), Path::new("./may-2016.ics"));
        assert_eq!(config.output_path(), Path::new("./may-2016.txt"));
    }

    #[test]
    fn test_config_build_success() {
        let config =
            Config::build(args(&["program_name", "February", "2020", "Europe/Paris"])).unwrap();
        assert_eq!(config.month_number(), 2);
        assert_eq!(config.month_name(), "february");
        assert_eq!(config.year, 2020);
        assert_eq!(config.time_zone, Tz::Europe__Paris);
    }

    #[test]
    fn test_config_build_invalid_args() {
        assert!(Config::build(args(&["program_name", "Smarch"])).is_err());
        assert!(Config::build(args(&["program_name", "may", "soon"])).is_err());
        assert!(Config::build(args(&["program_name", "may", "2016", "Nowhere"])).is_err());
    }

    #[test]
    fn test_parse_events_counts_skipped() {
        let valid = RawEvent {
            summary: Some("ProjectX - did work".to_string()),
            start: Some(IcsDateTime::new("20160503T130000Z")),
            end: Some(IcsDateTime::new("20160503T150000Z")),
        };
        let no_start = RawEvent {
            start: None,
            ..valid.clone()
        };

        let parsed = parse_events(&[valid.clone(), no_start, valid], Tz::US__Eastern);
        assert_eq!(parsed.entries.len(), 2);
        assert_eq!(parsed.skipped, 1);
    }
}

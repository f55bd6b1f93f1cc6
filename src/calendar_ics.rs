use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::{OffsetComponents, Tz};
use ical::IcalParser;
use log::{debug, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{ParseError, TimesheetError};

/// A VEVENT as read from the file, before any interpretation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEvent {
    pub summary: Option<String>,
    pub start: Option<IcsDateTime>,
    pub end: Option<IcsDateTime>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IcsDateTime {
    pub date_time: String,
    pub params: Vec<(String, Vec<String>)>,
}

impl IcsDateTime {
    pub fn new(date_time: &str) -> Self {
        IcsDateTime {
            date_time: date_time.to_string(),
            params: Vec::new(),
        }
    }

    pub fn with_param(mut self, key: &str, value: &str) -> Self {
        self.params.push((key.to_string(), vec![value.to_string()]));
        self
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.iter().find_map(|(k, values)| {
            if k.eq_ignore_ascii_case(key) {
                values.first().map(|v| v.trim_matches('"'))
            } else {
                None
            }
        })
    }

    /// Resolves the timestamp to an instant and expresses it in `zone`.
    pub fn to_zoned(&self, zone: Tz) -> Result<DateTime<Tz>, ParseError> {
        let raw = self.date_time.trim();
        let is_date = self
            .param("VALUE")
            .is_some_and(|v| v.eq_ignore_ascii_case("DATE"));
        if is_date || raw.len() == 8 {
            return Err(ParseError::DateOnly(raw.to_string()));
        }

        let (local, is_utc) = match raw.strip_suffix('Z') {
            Some(local) => (local, true),
            None => (raw, false),
        };
        let naive = date_time_to_naive(local)
            .ok_or_else(|| ParseError::InvalidTimestamp(raw.to_string()))?;

        if is_utc {
            return Ok(Utc.from_utc_datetime(&naive).with_timezone(&zone));
        }

        let tzid = self
            .param("TZID")
            .ok_or_else(|| ParseError::FloatingTime(raw.to_string()))?;
        let source = map_timezone_name(tzid)
            .ok_or_else(|| ParseError::UnknownTimeZone(tzid.to_string()))?;

        Ok(localize_standard(source, &naive).with_timezone(&zone))
    }
}

/// Places a wall-clock time in `tz`, reading it as standard time whenever the
/// DST switch makes it repeated or skipped.
fn localize_standard(tz: Tz, naive: &NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(first, second) => {
            if first.offset().dst_offset() == Duration::zero() {
                first
            } else {
                second
            }
        }
        LocalResult::None => {
            let standard = tz.offset_from_utc_datetime(naive).base_utc_offset();
            Utc.from_utc_datetime(&(*naive - standard)).with_timezone(&tz)
        }
    }
}

fn date_time_to_naive(date_str: &str) -> Option<NaiveDateTime> {
    if date_str.len() >= 15 {
        NaiveDateTime::parse_from_str(date_str, "%Y%m%dT%H%M%S").ok()
    } else {
        None
    }
}

/// IANA names are used as-is; Windows names (Outlook exports) are mapped.
pub fn map_timezone_name(tz_name: &str) -> Option<Tz> {
    if let Ok(tz) = tz_name.parse::<Tz>() {
        return Some(tz);
    }
    match tz_name {
        "Central America Standard Time" => Some(Tz::America__Guatemala),
        "Central Europe Standard Time" => Some(Tz::Europe__Budapest),
        "Central Standard Time" => Some(Tz::America__Chicago),
        "Eastern Standard Time" => Some(Tz::America__New_York),
        "GMT Standard Time" => Some(Tz::Europe__London),
        "Greenwich Standard Time" => Some(Tz::Etc__GMT),
        "Mountain Standard Time" => Some(Tz::America__Denver),
        "Pacific Standard Time" => Some(Tz::America__Los_Angeles),
        "Romance Standard Time" => Some(Tz::Europe__Paris),
        "SA Pacific Standard Time" => Some(Tz::America__Bogota),
        "US Mountain Standard Time" => Some(Tz::America__Phoenix),
        "W. Europe Standard Time" => Some(Tz::Europe__Berlin),
        _ => None,
    }
}

/// Undoes RFC 5545 TEXT escaping.
pub fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

pub fn load_events(path: &Path) -> Result<Vec<RawEvent>, TimesheetError> {
    let file = File::open(path).map_err(|source| TimesheetError::MissingFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(read_events(BufReader::new(file)))
}

pub fn read_events<R: BufRead>(reader: R) -> Vec<RawEvent> {
    let mut events = Vec::new();
    let parser = IcalParser::new(reader);

    for calendar in parser {
        match calendar {
            Ok(calendar) => {
                for ical_event in calendar.events {
                    let mut event = RawEvent::default();
                    for property in ical_event.properties {
                        match property.name.to_ascii_uppercase().as_str() {
                            "SUMMARY" => {
                                event.summary = property.value.as_deref().map(unescape_text)
                            }
                            "DTSTART" => {
                                event.start = Some(IcsDateTime {
                                    date_time: property.value.unwrap_or_default(),
                                    params: property.params.unwrap_or_default(),
                                })
                            }
                            "DTEND" => {
                                event.end = Some(IcsDateTime {
                                    date_time: property.value.unwrap_or_default(),
                                    params: property.params.unwrap_or_default(),
                                })
                            }
                            _ => {}
                        }
                    }
                    events.push(event);
                }
            }
            Err(e) => warn!("Error parsing calendar: {:?}", e),
        }
    }

    debug!("read {} VEVENT records", events.len());
    events
}

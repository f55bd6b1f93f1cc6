use chrono_tz::Tz;

use crate::calendar_ics::RawEvent;
use crate::error::ParseError;
use crate::models::{TimesheetEntry, ADMIN_PREFIX};

pub const DOUBLE_DELIMITER: &str = " -- ";
pub const SINGLE_DELIMITER: &str = " - ";

/// The project a summary books time against.
///
/// Admin summaries are their own project. Otherwise a summary with exactly one
/// `" -- "` splits there; failing that, everything before the first `" - "`.
pub fn project_of(summary: &str) -> &str {
    if summary.starts_with(ADMIN_PREFIX) {
        return summary;
    }
    if let Some((project, rest)) = summary.split_once(DOUBLE_DELIMITER) {
        if !rest.contains(DOUBLE_DELIMITER) {
            return project;
        }
    }
    summary
        .split_once(SINGLE_DELIMITER)
        .map_or(summary, |(project, _)| project)
}

/// The work description of a summary. Note the delimiters are tried in the
/// opposite order to `project_of`.
pub fn description_of(summary: &str) -> &str {
    summary
        .split(SINGLE_DELIMITER)
        .nth(1)
        .or_else(|| summary.split(DOUBLE_DELIMITER).nth(1))
        .unwrap_or(summary)
}

pub fn parse_event(event: &RawEvent, zone: Tz) -> Result<TimesheetEntry, ParseError> {
    let start = event
        .start
        .as_ref()
        .ok_or(ParseError::MissingProperty("DTSTART"))?
        .to_zoned(zone)?;
    let end = event
        .end
        .as_ref()
        .ok_or(ParseError::MissingProperty("DTEND"))?
        .to_zoned(zone)?;

    let summary = event.summary.as_deref().unwrap_or_default();
    let duration_hours = (end - start).num_seconds() as f64 / 3600.0;

    Ok(TimesheetEntry {
        project: project_of(summary).to_string(),
        description: description_of(summary).to_string(),
        start,
        end,
        duration_hours,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar_ics::IcsDateTime;
    use chrono_tz::US::Eastern;

    fn event(summary: &str, start: &str, end: &str) -> RawEvent {
        RawEvent {
            summary: Some(summary.to_string()),
            start: Some(IcsDateTime::new(start).with_param("TZID", "US/Eastern")),
            end: Some(IcsDateTime::new(end).with_param("TZID", "US/Eastern")),
        }
    }

    #[test]
    fn test_double_delimiter_wins_for_project() {
        assert_eq!(project_of("A -- B"), "A");
        assert_eq!(description_of("A -- B"), "B");
    }

    #[test]
    fn test_single_delimiter_split() {
        assert_eq!(project_of("A - B - C"), "A");
        assert_eq!(description_of("A - B - C"), "B");
    }

    #[test]
    fn test_repeated_double_delimiter_falls_back() {
        assert_eq!(project_of("A -- B -- C"), "A -- B -- C");
        assert_eq!(project_of("A -- B -- C - D"), "A -- B -- C");
        assert_eq!(description_of("A -- B -- C"), "B");
    }

    #[test]
    fn test_mixed_delimiters_are_asymmetric() {
        // Project splits on " -- " first, description on " - " first.
        assert_eq!(project_of("A -- B - C"), "A");
        assert_eq!(description_of("A -- B - C"), "C");
    }

    #[test]
    fn test_admin_summary_is_whole_project() {
        assert_eq!(project_of("Admin - email -- triage"), "Admin - email -- triage");
        assert_eq!(project_of("Administration"), "Administration");
        assert_eq!(description_of("Admin - email"), "email");
    }

    #[test]
    fn test_no_delimiter() {
        assert_eq!(project_of("Standup"), "Standup");
        assert_eq!(description_of("Standup"), "Standup");
        assert_eq!(project_of(""), "");
    }

    #[test]
    fn test_parse_event_duration() {
        let entry = parse_event(
            &event("ProjectX - did work", "20160503T090000", "20160503T173000"),
            Eastern,
        )
        .unwrap();
        assert_eq!(entry.project, "ProjectX");
        assert_eq!(entry.description, "did work");
        assert_eq!(entry.duration_hours, 8.5);
    }

    #[test]
    fn test_negative_duration_is_kept() {
        let entry = parse_event(
            &event("P - backwards", "20160503T110000", "20160503T090000"),
            Eastern,
        )
        .unwrap();
        assert_eq!(entry.duration_hours, -2.0);
    }

    #[test]
    fn test_missing_summary_is_empty() {
        let mut raw = event("", "20160503T090000", "20160503T100000");
        raw.summary = None;
        let entry = parse_event(&raw, Eastern).unwrap();
        assert_eq!(entry.project, "");
        assert_eq!(entry.description, "");
    }

    #[test]
    fn test_missing_times() {
        let mut raw = event("P - x", "20160503T090000", "20160503T100000");
        raw.start = None;
        assert_eq!(
            parse_event(&raw, Eastern),
            Err(ParseError::MissingProperty("DTSTART"))
        );

        let mut raw = event("P - x", "20160503T090000", "20160503T100000");
        raw.end = None;
        assert_eq!(
            parse_event(&raw, Eastern),
            Err(ParseError::MissingProperty("DTEND"))
        );
    }
}

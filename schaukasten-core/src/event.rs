//! Event types on both sides of the pipeline.
//!
//! [`EventSource`] is one VEVENT as read from the feed, with every field the
//! pipeline needs extracted once at the document boundary. [`Occurrence`] is a
//! concrete appearance of an event after recurrence expansion.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

use crate::bilingual::{BilingualText, split_description, split_title};

/// A timestamp as written in the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventTime {
    Date(NaiveDate),
    DateTimeUtc(DateTime<Utc>),
    DateTimeFloating(NaiveDateTime),
    DateTimeZoned { datetime: NaiveDateTime, tzid: String },
}

impl EventTime {
    pub fn is_date(&self) -> bool {
        matches!(self, EventTime::Date(_))
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventTime::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            EventTime::DateTimeUtc(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M UTC")),
            EventTime::DateTimeFloating(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M")),
            EventTime::DateTimeZoned { datetime, tzid } => {
                write!(f, "{} ({})", datetime.format("%Y-%m-%d %H:%M"), tzid)
            }
        }
    }
}

/// A single calendar entry as delivered by the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct EventSource {
    pub uid: String,
    pub start: EventTime,
    pub end: EventTime,
    /// Raw SUMMARY, bilingual with `|`.
    pub summary: String,
    /// Raw DESCRIPTION, bilingual with a `---` run.
    pub description: String,
    pub location: String,
    /// LAST-MODIFIED (or DTSTAMP when the feed omits it)
    pub last_modified: Option<DateTime<Utc>>,

    // Recurrence fields
    /// RRULE value without the property name
    pub rrule: Option<String>,
    pub exdates: Vec<EventTime>,
    /// Set on entries that replace one instance of a recurring series
    pub recurrence_id: Option<EventTime>,
}

/// Fields shared by every occurrence materialized from one [`EventSource`].
#[derive(Debug, Clone, PartialEq)]
pub struct EventDetails {
    pub title: BilingualText,
    pub description: BilingualText,
    pub place: String,
    pub identity: String,
    pub last_modified: Option<DateTime<Utc>>,
    /// Instant of the series instance this entry overrides, if any
    pub recurrence_id: Option<DateTime<Utc>>,
}

impl EventDetails {
    /// Decode the bilingual fields of a source.
    ///
    /// `recurrence_id` is resolved by the caller since it depends on the
    /// display timezone.
    pub fn from_source(source: &EventSource, recurrence_id: Option<DateTime<Utc>>) -> Self {
        EventDetails {
            title: split_title(&source.summary),
            description: split_description(&source.description),
            place: source.location.trim().to_string(),
            identity: source.uid.clone(),
            last_modified: source.last_modified,
            recurrence_id,
        }
    }
}

/// One concrete appearance of an event.
#[derive(Debug, Clone, PartialEq)]
pub struct Occurrence {
    details: EventDetails,
    start: DateTime<Tz>,
    end: DateTime<Tz>,
    all_day: bool,
}

impl Occurrence {
    /// # Panics
    ///
    /// Panics if `start > end`; the materializer never builds such a value.
    pub fn new(details: EventDetails, start: DateTime<Tz>, end: DateTime<Tz>, all_day: bool) -> Self {
        assert!(
            start <= end,
            "occurrence of '{}' ends before it starts ({} > {})",
            details.identity,
            start,
            end
        );
        Occurrence {
            details,
            start,
            end,
            all_day,
        }
    }

    pub fn start(&self) -> DateTime<Tz> {
        self.start
    }

    pub fn end(&self) -> DateTime<Tz> {
        self.end
    }

    pub fn is_all_day(&self) -> bool {
        self.all_day
    }

    pub fn title(&self) -> &BilingualText {
        &self.details.title
    }

    pub fn description(&self) -> &BilingualText {
        &self.details.description
    }

    pub fn place(&self) -> &str {
        &self.details.place
    }

    pub fn identity(&self) -> &str {
        &self.details.identity
    }

    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.details.last_modified
    }

    pub fn recurrence_id(&self) -> Option<DateTime<Utc>> {
        self.details.recurrence_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Europe::Berlin;

    fn details() -> EventDetails {
        EventDetails {
            title: BilingualText::new("Spieleabend", "Game Night"),
            description: BilingualText::monolingual("Brettspiele"),
            place: String::new(),
            identity: "uid-1".to_string(),
            last_modified: None,
            recurrence_id: None,
        }
    }

    #[test]
    fn test_details_decode_bilingual_fields() {
        let source = EventSource {
            uid: "abc".to_string(),
            start: EventTime::Date(NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()),
            end: EventTime::Date(NaiveDate::from_ymd_opt(2024, 5, 7).unwrap()),
            summary: "Filmabend | Movie Night".to_string(),
            description: "Hallo---Hello".to_string(),
            location: "  Gerlachstraße 20 ".to_string(),
            last_modified: None,
            rrule: None,
            exdates: vec![],
            recurrence_id: None,
        };

        let details = EventDetails::from_source(&source, None);
        assert_eq!(details.title.secondary(), "Movie Night");
        assert_eq!(details.description.primary(), "Hallo");
        assert_eq!(details.place, "Gerlachstraße 20");
        assert_eq!(details.identity, "abc");
    }

    #[test]
    #[should_panic(expected = "ends before it starts")]
    fn test_occurrence_rejects_inverted_range() {
        let start = Berlin.with_ymd_and_hms(2024, 5, 6, 20, 0, 0).unwrap();
        let end = Berlin.with_ymd_and_hms(2024, 5, 6, 19, 0, 0).unwrap();
        Occurrence::new(details(), start, end, false);
    }

    #[test]
    fn test_event_time_display() {
        let date = EventTime::Date(NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
        assert_eq!(date.to_string(), "2024-01-08");

        let zoned = EventTime::DateTimeZoned {
            datetime: NaiveDate::from_ymd_opt(2024, 1, 8)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            tzid: "Europe/Berlin".to_string(),
        };
        assert_eq!(zoned.to_string(), "2024-01-08 10:00 (Europe/Berlin)");
    }
}

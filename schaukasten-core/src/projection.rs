//! Per-language views of an event span.

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use serde::Serialize;

use crate::bilingual::Language;
use crate::span::EventSpan;

/// An occurrence with its texts resolved to one language.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalizedOccurrence {
    pub title: String,
    pub description: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub place: String,
    pub all_day: bool,
}

/// A span projected down to one language.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalizedSpan {
    pub language: Language,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub occurrences: Vec<LocalizedOccurrence>,
}

/// Resolve every occurrence's bilingual fields to `language`, keeping order.
pub fn project(span: &EventSpan, language: Language) -> Vec<LocalizedOccurrence> {
    span.occurrences()
        .iter()
        .map(|occurrence| LocalizedOccurrence {
            title: occurrence.title().get(language).to_string(),
            description: occurrence.description().get(language).to_string(),
            start: occurrence.start(),
            end: occurrence.end(),
            place: occurrence.place().to_string(),
            all_day: occurrence.is_all_day(),
        })
        .collect()
}

impl EventSpan {
    pub fn localize(&self, language: Language) -> LocalizedSpan {
        LocalizedSpan {
            language,
            start: self.start(),
            end: self.end(),
            occurrences: project(self, language),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_range::Window;
    use chrono_tz::Europe::Berlin;

    const FEED: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
UID:a\r\n\
DTSTART:20240508T170000Z\r\n\
DTEND:20240508T200000Z\r\n\
SUMMARY:Filmabend | Movie Night\r\n\
DESCRIPTION:Wir schauen einen Film.\\n----\\nWe watch a movie.\r\n\
LOCATION:Kino\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:b\r\n\
DTSTART:20240509T170000Z\r\n\
DTEND:20240509T200000Z\r\n\
SUMMARY:Plenum\r\n\
DESCRIPTION:Nur Deutsch\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

    fn span() -> EventSpan {
        let window = Window::week_of(NaiveDate::from_ymd_opt(2024, 5, 6).unwrap());
        EventSpan::build(FEED, window, Berlin).expect("Should build")
    }

    #[test]
    fn test_project_primary_language() {
        let events = project(&span(), Language::German);
        assert_eq!(events[0].title, "Filmabend");
        assert_eq!(events[0].description, "Wir schauen einen Film.");
        assert_eq!(events[0].place, "Kino");
        assert_eq!(events[0].start.to_rfc3339(), "2024-05-08T19:00:00+02:00");
    }

    #[test]
    fn test_project_secondary_language_defaults_to_primary() {
        let events = project(&span(), Language::English);
        assert_eq!(events[0].title, "Movie Night");
        assert_eq!(events[0].description, "We watch a movie.");
        assert_eq!(events[1].title, "Plenum");
        assert_eq!(events[1].description, "Nur Deutsch");
    }

    #[test]
    fn test_localized_span_serializes() {
        let localized = span().localize(Language::English);
        let json = serde_json::to_value(&localized).expect("Should serialize");
        assert_eq!(json["language"], "en");
        assert_eq!(json["start"], "2024-05-06");
        assert_eq!(json["occurrences"][0]["title"], "Movie Night");
        assert_eq!(json["occurrences"][0]["all_day"], false);
    }
}

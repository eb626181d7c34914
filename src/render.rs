//! Terminal rendering of event spans.

use chrono::{DateTime, Datelike, NaiveDate, Weekday};
use chrono_tz::Tz;
use owo_colors::OwoColorize;
use schaukasten_core::bilingual::LINE_BREAK;
use schaukasten_core::{Config, EventSpan, Language, Occurrence};

use crate::colors::ColorMap;

/// Fixed strings of the overview in one language.
struct Labels {
    heading: &'static str,
    heading_to: &'static str,
    all_day: &'static str,
    empty: &'static str,
    date_format: &'static str,
}

fn labels(language: Language) -> Labels {
    match language {
        Language::German => Labels {
            heading: "Veranstaltungen der Woche vom",
            heading_to: "bis",
            all_day: "ganztägig",
            empty: "Diese Woche keine Veranstaltungen",
            date_format: "%d.%m.%Y",
        },
        Language::English => Labels {
            heading: "Events of the week from",
            heading_to: "to",
            all_day: "all-day",
            empty: "No events this week",
            date_format: "%B %-d, %Y",
        },
    }
}

fn weekday_name(weekday: Weekday, language: Language) -> &'static str {
    match language {
        Language::German => match weekday {
            Weekday::Mon => "Montag",
            Weekday::Tue => "Dienstag",
            Weekday::Wed => "Mittwoch",
            Weekday::Thu => "Donnerstag",
            Weekday::Fri => "Freitag",
            Weekday::Sat => "Samstag",
            Weekday::Sun => "Sonntag",
        },
        Language::English => match weekday {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        },
    }
}

/// Renders spans for the terminal.
pub struct Renderer<'a> {
    language: Language,
    colors: &'a ColorMap,
    config: &'a Config,
}

impl<'a> Renderer<'a> {
    pub fn new(language: Language, colors: &'a ColorMap, config: &'a Config) -> Self {
        Renderer {
            language,
            colors,
            config,
        }
    }

    pub fn render(&self, span: &EventSpan) -> String {
        let labels = labels(self.language);
        let mut lines = vec![
            format!(
                "{} {} {} {}",
                labels.heading,
                span.start().format(labels.date_format),
                labels.heading_to,
                span.end().format(labels.date_format)
            )
            .bold()
            .to_string(),
        ];

        if span.is_empty() {
            lines.push(String::new());
            lines.push(format!("   {}", labels.empty.dimmed()));
            return lines.join("\n");
        }

        // Numbers follow span order so they can be used for exclusions
        let mut number = 0;
        for day in span.window().days() {
            let mut on_day = span.on(day).peekable();
            if on_day.peek().is_none() {
                continue;
            }

            lines.push(String::new());
            lines.push(self.render_day(day));
            for occurrence in on_day {
                number += 1;
                lines.extend(self.render_occurrence(number, occurrence, &labels));
            }
        }

        lines.join("\n")
    }

    fn render_day(&self, day: NaiveDate) -> String {
        let labels = labels(self.language);
        format!(
            "{} {}",
            weekday_name(day.weekday(), self.language),
            day.format(labels.date_format)
        )
        .underline()
        .to_string()
    }

    fn render_occurrence(&self, number: usize, occurrence: &Occurrence, labels: &Labels) -> Vec<String> {
        let title = occurrence.title().get(self.language);
        let color = self.colors.get(occurrence.title().primary());

        let time = if occurrence.is_all_day() {
            labels.all_day.to_string()
        } else {
            format_time_range(occurrence.start(), occurrence.end())
        };

        let mut lines = vec![format!(
            "{:>3}. {} {}",
            number,
            time.dimmed(),
            title.color(color).bold()
        )];

        let place = occurrence.place();
        if !place.is_empty() && !self.config.is_home(place) {
            lines.push(format!("     @ {}", place));
        }

        let description = occurrence.description().get(self.language);
        lines.extend(
            description
                .split(LINE_BREAK)
                .flat_map(str::lines)
                .map(str::trim_end)
                .filter(|line| !line.trim().is_empty())
                .map(|line| format!("     {}", line)),
        );

        lines
    }
}

/// Format the time portion of an occurrence (e.g. "19:00-22:00")
fn format_time_range(start: DateTime<Tz>, end: DateTime<Tz>) -> String {
    if start == end {
        return start.format("%H:%M").to_string();
    }
    format!("{}-{}", start.format("%H:%M"), end.format("%H:%M"))
}

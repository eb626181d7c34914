//! Event spans: the canonical occurrences of one date window.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use chrono_tz::Tz;
use tracing::debug;

use crate::canonical::canonicalize;
use crate::date_range::Window;
use crate::error::SchaukastenResult;
use crate::event::{EventSource, Occurrence};
use crate::ics::parse_calendar;
use crate::recurrence::Materializer;

/// The deduplicated, ordered occurrences starting inside a [`Window`].
///
/// Spans are never changed in place; filters return new spans.
#[derive(Debug, Clone, PartialEq)]
pub struct EventSpan {
    window: Window,
    occurrences: Vec<Occurrence>,
}

impl EventSpan {
    /// Parse a feed and build the span for `window`, with times in `zone`.
    pub fn build(document: &str, window: Window, zone: Tz) -> SchaukastenResult<Self> {
        let sources = parse_calendar(document)?;
        Ok(Self::from_sources(&sources, window, zone))
    }

    /// Span of the Monday-to-Sunday week containing `date`.
    pub fn build_week(document: &str, date: NaiveDate, zone: Tz) -> SchaukastenResult<Self> {
        Self::build(document, Window::week_of(date), zone)
    }

    pub fn from_sources(sources: &[EventSource], window: Window, zone: Tz) -> Self {
        let materializer = Materializer::new(window, zone).with_overrides(sources);

        // Every entry is materialized before anything is sorted
        let materialized: Vec<Occurrence> = sources
            .iter()
            .flat_map(|source| materializer.materialize(source))
            .collect();

        let occurrences: Vec<Occurrence> = canonicalize(materialized)
            .into_iter()
            .filter(|occurrence| {
                let starts_inside = window.contains(occurrence.start().date_naive());
                if !starts_inside {
                    debug!(uid = occurrence.identity(), "occurrence starts before the window");
                }
                starts_inside
            })
            .collect();

        debug!(
            start = %window.start(),
            end = %window.end(),
            count = occurrences.len(),
            "built event span"
        );

        EventSpan {
            window,
            occurrences,
        }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn start(&self) -> NaiveDate {
        self.window.start()
    }

    pub fn end(&self) -> NaiveDate {
        self.window.end()
    }

    pub fn occurrences(&self) -> &[Occurrence] {
        &self.occurrences
    }

    pub fn len(&self) -> usize {
        self.occurrences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }

    /// Occurrences starting on `date`.
    pub fn on(&self, date: NaiveDate) -> impl Iterator<Item = &Occurrence> {
        self.occurrences
            .iter()
            .filter(move |o| o.start().date_naive() == date)
    }

    /// A new span without the occurrences at the given positions.
    pub fn without(&self, positions: &BTreeSet<usize>) -> EventSpan {
        EventSpan {
            window: self.window,
            occurrences: self
                .occurrences
                .iter()
                .enumerate()
                .filter(|(index, _)| !positions.contains(index))
                .map(|(_, occurrence)| occurrence.clone())
                .collect(),
        }
    }
}

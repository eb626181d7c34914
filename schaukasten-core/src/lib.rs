//! Core of the schaukasten weekly overview.
//!
//! Turns a public iCalendar feed into the canonical occurrences of a date
//! window:
//! - `ics` reads the feed into [`EventSource`] values
//! - `recurrence` materializes them into [`Occurrence`]s inside a [`Window`]
//! - `canonical` deduplicates and orders them
//! - `span` wraps the result in an [`EventSpan`]
//! - `projection` resolves the bilingual texts for one [`Language`]
//!
//! No I/O happens here apart from reading the optional config file.

pub mod bilingual;
pub mod canonical;
pub mod config;
pub mod date_range;
pub mod error;
pub mod event;
pub mod ics;
pub mod projection;
pub mod recurrence;
pub mod span;
pub mod time;

pub use bilingual::{BilingualText, Language, split_description, split_title};
pub use canonical::canonicalize;
pub use config::Config;
pub use date_range::Window;
pub use error::{SchaukastenError, SchaukastenResult};
pub use event::{EventDetails, EventSource, EventTime, Occurrence};
pub use projection::{LocalizedOccurrence, LocalizedSpan, project};
pub use recurrence::Materializer;
pub use span::EventSpan;

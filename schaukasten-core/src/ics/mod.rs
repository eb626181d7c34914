//! ICS feed parsing.
//!
//! This is the document boundary: every field the pipeline reads is extracted
//! here into [`EventSource`](crate::event::EventSource) values.

mod parse;

pub use parse::parse_calendar;

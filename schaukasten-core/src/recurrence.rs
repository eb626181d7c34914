//! Occurrence materialization.
//!
//! Turns feed entries into concrete occurrences inside a [`Window`]. Single
//! events pass through when they overlap the window; recurring events are
//! expanded with the rrule crate on naive wall-clock values (see
//! [`crate::time`]) and only their instances are emitted, never the master.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use rrule::RRuleSet;
use tracing::{debug, warn};

use crate::date_range::Window;
use crate::error::{SchaukastenError, SchaukastenResult};
use crate::event::{EventDetails, EventSource, EventTime, Occurrence};
use crate::time::{anchor_zone, localize, to_display, wall_clock};

/// Upper bound of instances generated per entry and window.
const MAX_INSTANCES: u16 = 366;

/// Expands feed entries into occurrences for one window and display zone.
#[derive(Debug, Clone)]
pub struct Materializer {
    window: Window,
    zone: Tz,
    /// Instants replaced by RECURRENCE-ID entries, keyed by UID
    overrides: HashMap<String, HashSet<DateTime<Utc>>>,
}

impl Materializer {
    pub fn new(window: Window, zone: Tz) -> Self {
        Materializer {
            window,
            zone,
            overrides: HashMap::new(),
        }
    }

    /// Register the RECURRENCE-ID entries among `sources`, so that the
    /// instances they replace are not generated from the series.
    pub fn with_overrides(mut self, sources: &[EventSource]) -> Self {
        for source in sources {
            if let Some(recurrence_id) = &source.recurrence_id {
                self.overrides
                    .entry(source.uid.clone())
                    .or_default()
                    .insert(to_display(recurrence_id, self.zone).with_timezone(&Utc));
            }
        }
        self
    }

    /// Occurrences of `source` that intersect the window.
    ///
    /// An invalid RRULE is logged and yields no occurrences; it never stops
    /// the caller from processing the remaining entries.
    pub fn materialize(&self, source: &EventSource) -> Vec<Occurrence> {
        match (&source.rrule, &source.recurrence_id) {
            (Some(rule), None) => match self.expand(source, rule) {
                Ok(occurrences) => occurrences,
                Err(e) => {
                    warn!(uid = %source.uid, error = %e, "skipping event with invalid recurrence rule");
                    Vec::new()
                }
            },
            _ => self.single(source).into_iter().collect(),
        }
    }

    fn single(&self, source: &EventSource) -> Option<Occurrence> {
        let start = to_display(&source.start, self.zone);
        let mut end = to_display(&source.end, self.zone);
        if end < start {
            warn!(uid = %source.uid, "DTEND before DTSTART, treating event as zero length");
            end = start;
        }

        let window_start = localize(self.window.start_of_day(), self.zone);
        let window_end = localize(self.window.end_of_day(), self.zone);

        // DTEND of all-day events is exclusive
        let ends_before = if source.end.is_date() && end > start {
            end <= window_start
        } else {
            end < window_start
        };
        if start > window_end || ends_before {
            return None;
        }

        let recurrence_id = source
            .recurrence_id
            .as_ref()
            .map(|rid| to_display(rid, self.zone).with_timezone(&Utc));

        Some(Occurrence::new(
            EventDetails::from_source(source, recurrence_id),
            start,
            end,
            source.start.is_date(),
        ))
    }

    /// Expand a recurring entry into its instances within the window.
    pub fn expand(&self, source: &EventSource, rule: &str) -> SchaukastenResult<Vec<Occurrence>> {
        let rule_error = |reason: String| SchaukastenError::RecurrenceRule {
            uid: source.uid.clone(),
            reason,
        };

        let zone = anchor_zone(&source.start, self.zone);
        let anchor = wall_clock(&source.start, self.zone);
        let anchor_end = to_display(&source.end, self.zone)
            .with_timezone(&zone)
            .naive_local();
        let duration = (anchor_end - anchor).max(Duration::zero());

        let rrule_set = build_rrule_set(anchor, rule, zone).map_err(rule_error)?;

        // Window bounds are display-zone days, seen from the anchor's zone
        let from = localize(self.window.start_of_day(), self.zone)
            .with_timezone(&zone)
            .naive_local();
        let to = localize(self.window.end_of_day(), self.zone)
            .with_timezone(&zone)
            .naive_local();

        // after/before are exclusive, widen by one second
        let tz: rrule::Tz = Utc.into();
        let after = (from - Duration::seconds(1)).and_utc().with_timezone(&tz);
        let before = (to + Duration::seconds(1)).and_utc().with_timezone(&tz);

        let result = rrule_set.after(after).before(before).all(MAX_INSTANCES);
        if result.limited {
            debug!(uid = %source.uid, limit = MAX_INSTANCES, "recurrence expansion hit the instance limit");
        }

        let details = EventDetails::from_source(source, None);
        let overridden = self.overrides.get(&source.uid);
        let all_day = source.start.is_date();

        let mut occurrences = Vec::new();
        for occ_dt in &result.dates {
            let naive = occ_dt.naive_utc();
            if naive < from || naive > to {
                continue;
            }

            let start = localize(naive, zone).with_timezone(&self.zone);
            if self.is_excluded(start, &source.exdates) {
                continue;
            }
            if overridden.is_some_and(|instants| instants.contains(&start.with_timezone(&Utc))) {
                debug!(uid = %source.uid, %start, "instance replaced by RECURRENCE-ID entry");
                continue;
            }

            let end = localize(naive + duration, zone)
                .with_timezone(&self.zone)
                .max(start);
            occurrences.push(Occurrence::new(details.clone(), start, end, all_day));
        }

        Ok(occurrences)
    }

    fn is_excluded(&self, start: DateTime<Tz>, exdates: &[EventTime]) -> bool {
        exdates.iter().any(|exdate| match exdate {
            EventTime::Date(d) => start.date_naive() == *d,
            other => to_display(other, self.zone) == start,
        })
    }
}

/// Build the rrule input with the anchor as a naive value.
///
/// The anchor is written with a `Z` suffix so the rrule crate evaluates it
/// without applying any offset; `UNTIL` is moved into the same frame.
fn build_rrule_set(anchor: NaiveDateTime, rule: &str, zone: Tz) -> Result<RRuleSet, String> {
    let rule = normalize_rule(rule, zone)?;
    let rrule_str = format!("DTSTART:{}Z\nRRULE:{}", anchor.format("%Y%m%dT%H%M%S"), rule);
    rrule_str.parse::<RRuleSet>().map_err(|e| e.to_string())
}

/// Strip an `RRULE:` prefix and rewrite `UNTIL` into the naive frame.
fn normalize_rule(rule: &str, zone: Tz) -> Result<String, String> {
    let rule = rule.trim();
    let rule = rule.strip_prefix("RRULE:").unwrap_or(rule);
    if rule.is_empty() {
        return Err("empty rule".to_string());
    }

    let parts = rule
        .split(';')
        .filter(|part| !part.is_empty())
        .map(|part| match part.split_once('=') {
            Some((key, value)) if key.eq_ignore_ascii_case("UNTIL") => {
                normalize_until(value, zone).map(|v| format!("UNTIL={}", v))
            }
            _ => Ok(part.to_string()),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(parts.join(";"))
}

/// UNTIL as a `Z`-suffixed wall-clock value in `zone`.
///
/// - `YYYYMMDD`: end of that day
/// - `YYYYMMDDTHHMMSSZ`: converted from UTC into `zone`
/// - `YYYYMMDDTHHMMSS`: taken as-is
fn normalize_until(value: &str, zone: Tz) -> Result<String, String> {
    const FORMAT: &str = "%Y%m%dT%H%M%S";
    let invalid = || format!("invalid UNTIL value '{}'", value);

    let naive = if value.len() == 8 {
        NaiveDate::parse_from_str(value, "%Y%m%d")
            .ok()
            .and_then(|d| d.and_hms_opt(23, 59, 59))
            .ok_or_else(invalid)?
    } else if let Some(utc) = value.strip_suffix('Z') {
        NaiveDateTime::parse_from_str(utc, FORMAT)
            .map_err(|_| invalid())?
            .and_utc()
            .with_timezone(&zone)
            .naive_local()
    } else {
        NaiveDateTime::parse_from_str(value, FORMAT).map_err(|_| invalid())?
    };

    Ok(format!("{}Z", naive.format(FORMAT)))
}

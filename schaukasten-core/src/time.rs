//! Timezone resolution for feed timestamps.
//!
//! All coercion between naive wall-clock values and aware timestamps goes
//! through this module. Recurrence rules are evaluated on naive wall-clock
//! values ([`wall_clock`]) in the anchor's own zone ([`anchor_zone`]); the
//! results are turned back into aware timestamps with [`localize`].

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::warn;

use crate::event::EventTime;

/// Map a TZID parameter to a timezone, falling back to `fallback`.
///
/// Some producers prefix the IANA name with a vendor path
/// (`/freeassociation.sourceforge.net/Europe/Berlin`); the trailing
/// `Area/City` part is tried as well.
pub fn resolve_zone(tzid: &str, fallback: Tz) -> Tz {
    let tzid = tzid.trim().trim_matches('"');
    if let Ok(tz) = tzid.parse::<Tz>() {
        return tz;
    }

    let parts: Vec<&str> = tzid.split('/').filter(|p| !p.is_empty()).collect();
    if parts.len() > 2 {
        let tail = parts[parts.len() - 2..].join("/");
        if let Ok(tz) = tail.parse::<Tz>() {
            return tz;
        }
    }

    warn!(tzid, fallback = %fallback, "unknown TZID, using display timezone");
    fallback
}

/// The zone a timestamp's wall clock is expressed in.
///
/// UTC values stay in UTC, so rules anchored on them match `BYDAY` and
/// friends against the UTC weekday.
pub fn anchor_zone(time: &EventTime, display: Tz) -> Tz {
    match time {
        EventTime::DateTimeZoned { tzid, .. } => resolve_zone(tzid, display),
        EventTime::DateTimeUtc(_) => chrono_tz::UTC,
        _ => display,
    }
}

/// Wall-clock value of a timestamp in its [`anchor_zone`].
pub fn wall_clock(time: &EventTime, display: Tz) -> NaiveDateTime {
    match time {
        EventTime::Date(d) => d.and_time(NaiveTime::MIN),
        EventTime::DateTimeUtc(dt) => dt.naive_utc(),
        EventTime::DateTimeFloating(dt) => *dt,
        EventTime::DateTimeZoned { datetime, .. } => *datetime,
    }
}

/// Attach `zone` to a wall-clock value.
///
/// Ambiguous values (DST fall-back) resolve to the earlier instant; values in
/// a DST gap are moved forward by one hour.
pub fn localize(naive: NaiveDateTime, zone: Tz) -> DateTime<Tz> {
    match zone.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => zone
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .unwrap_or_else(|| Utc.from_utc_datetime(&naive).with_timezone(&zone)),
    }
}

/// Aware timestamp of a feed value, expressed in the display zone.
pub fn to_display(time: &EventTime, display: Tz) -> DateTime<Tz> {
    match time {
        EventTime::DateTimeUtc(dt) => dt.with_timezone(&display),
        other => {
            let zone = anchor_zone(other, display);
            localize(wall_clock(other, display), zone).with_timezone(&display)
        }
    }
}

//! Deduplication and ordering of materialized occurrences.
//!
//! Entries are grouped by `(identity, recurrence_id)`, the same key the feed
//! uses to tell a series apart from its overridden instances. Only occurrences
//! carrying the group's newest `last_modified` survive, so a re-delivered
//! series replaces the stale one as a whole, while all instances of the current
//! revision are kept. Exact repeats (same group and start) collapse to the
//! first one seen.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::event::Occurrence;

type GroupKey<'a> = (&'a str, Option<DateTime<Utc>>);

fn group_key(occurrence: &Occurrence) -> GroupKey<'_> {
    (occurrence.identity(), occurrence.recurrence_id())
}

/// Deduplicate and sort occurrences by `(start, description.primary)`.
///
/// The sort is stable, so occurrences tied on both keys keep their input
/// order. Applying this twice gives the same result as applying it once.
pub fn canonicalize(occurrences: Vec<Occurrence>) -> Vec<Occurrence> {
    let keep: HashSet<usize> = {
        let mut freshest: HashMap<GroupKey<'_>, Option<DateTime<Utc>>> = HashMap::new();
        for occurrence in &occurrences {
            let newest = freshest.entry(group_key(occurrence)).or_insert(None);
            *newest = (*newest).max(occurrence.last_modified());
        }

        let mut seen = HashSet::new();
        let mut keep = HashSet::with_capacity(occurrences.len());
        for (index, occurrence) in occurrences.iter().enumerate() {
            let key = group_key(occurrence);
            if occurrence.title().is_empty() {
                debug!(uid = occurrence.identity(), "dropping occurrence without title");
                continue;
            }
            if freshest.get(&key).copied().flatten() != occurrence.last_modified() {
                debug!(uid = occurrence.identity(), "dropping superseded occurrence");
                continue;
            }
            if !seen.insert((key, occurrence.start())) {
                debug!(uid = occurrence.identity(), start = %occurrence.start(), "dropping duplicate occurrence");
                continue;
            }
            keep.insert(index);
        }
        keep
    };

    let mut result: Vec<Occurrence> = occurrences
        .into_iter()
        .enumerate()
        .filter(|(index, _)| keep.contains(index))
        .map(|(_, occurrence)| occurrence)
        .collect();

    result.sort_by(|a, b| {
        a.start()
            .cmp(&b.start())
            .then_with(|| a.description().primary().cmp(b.description().primary()))
    });
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bilingual::BilingualText;
    use crate::event::EventDetails;
    use chrono::TimeZone;
    use chrono_tz::Europe::Berlin;
    use proptest::prelude::*;

    fn occurrence(uid: &str, day: u32, hour: u32, modified: u32, description: &str) -> Occurrence {
        occurrence_titled(uid, day, hour, modified, description, "Plenum")
    }

    fn occurrence_titled(
        uid: &str,
        day: u32,
        hour: u32,
        modified: u32,
        description: &str,
        title: &str,
    ) -> Occurrence {
        let start = Berlin.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap();
        Occurrence::new(
            EventDetails {
                title: BilingualText::monolingual(title),
                description: BilingualText::monolingual(description),
                place: String::new(),
                identity: uid.to_string(),
                last_modified: Some(Utc.with_ymd_and_hms(2024, 4, modified, 12, 0, 0).unwrap()),
                recurrence_id: None,
            },
            start,
            start + chrono::Duration::hours(2),
            false,
        )
    }

    #[test]
    fn test_newer_delivery_replaces_older() {
        let older = occurrence("x", 7, 19, 1, "alt");
        let newer = occurrence("x", 8, 19, 2, "neu");

        let result = canonicalize(vec![older, newer.clone()]);
        assert_eq!(result, vec![newer.clone()]);

        let older = occurrence("x", 7, 19, 1, "alt");
        let result = canonicalize(vec![newer.clone(), older]);
        assert_eq!(result, vec![newer]);
    }

    #[test]
    fn test_series_instances_with_same_timestamp_survive() {
        let instances = vec![
            occurrence("series", 6, 19, 1, "Kaffee"),
            occurrence("series", 8, 19, 1, "Kaffee"),
            occurrence("series", 10, 19, 1, "Kaffee"),
        ];

        let result = canonicalize(instances.clone());
        assert_eq!(result, instances);
    }

    #[test]
    fn test_exact_duplicates_collapse() {
        let a = occurrence("dup", 6, 19, 1, "Kaffee");
        let result = canonicalize(vec![a.clone(), a.clone()]);
        assert_eq!(result, vec![a]);
    }

    #[test]
    fn test_override_is_its_own_group() {
        let series = occurrence("series", 6, 19, 1, "Kaffee");
        let start = Berlin.with_ymd_and_hms(2024, 5, 9, 18, 0, 0).unwrap();
        let moved = Occurrence::new(
            EventDetails {
                title: BilingualText::monolingual("Plenum"),
                description: BilingualText::monolingual("verschoben"),
                place: String::new(),
                identity: "series".to_string(),
                last_modified: Some(Utc.with_ymd_and_hms(2024, 4, 20, 12, 0, 0).unwrap()),
                recurrence_id: Some(Utc.with_ymd_and_hms(2024, 5, 8, 17, 0, 0).unwrap()),
            },
            start,
            start,
            false,
        );

        let result = canonicalize(vec![series.clone(), moved.clone()]);
        assert_eq!(result, vec![series, moved]);
    }

    #[test]
    fn test_empty_titles_are_dropped() {
        let untitled = occurrence_titled("u", 6, 19, 1, "x", "");
        let titled = occurrence("t", 6, 20, 1, "y");
        assert_eq!(canonicalize(vec![untitled, titled.clone()]), vec![titled]);
    }

    #[test]
    fn test_same_start_sorted_by_description() {
        let b = occurrence("b", 6, 19, 1, "Beta");
        let a = occurrence("a", 6, 19, 1, "Alpha");
        let early = occurrence("c", 6, 18, 1, "Zeta");

        let result = canonicalize(vec![b.clone(), a.clone(), early.clone()]);
        assert_eq!(result, vec![early, a, b]);
    }

    #[test]
    fn test_missing_last_modified_loses_to_any_timestamp() {
        let stamped = occurrence("x", 7, 19, 1, "neu");
        let start = Berlin.with_ymd_and_hms(2024, 5, 6, 19, 0, 0).unwrap();
        let unstamped = Occurrence::new(
            EventDetails {
                title: BilingualText::monolingual("Plenum"),
                description: BilingualText::monolingual("alt"),
                place: String::new(),
                identity: "x".to_string(),
                last_modified: None,
                recurrence_id: None,
            },
            start,
            start,
            false,
        );

        assert_eq!(canonicalize(vec![unstamped, stamped.clone()]), vec![stamped]);
    }

    fn arbitrary_occurrence() -> impl Strategy<Value = Occurrence> {
        (
            prop::sample::select(vec!["a", "b", "c"]),
            6u32..13,
            17u32..22,
            1u32..4,
            prop::sample::select(vec!["", "Kaffee", "Film", "Plenum"]),
            prop::sample::select(vec!["", "Queercafé"]),
        )
            .prop_map(|(uid, day, hour, modified, description, title)| {
                occurrence_titled(uid, day, hour, modified, description, title)
            })
    }

    proptest! {
        #[test]
        fn prop_canonicalize_is_idempotent(input in prop::collection::vec(arbitrary_occurrence(), 0..24)) {
            let once = canonicalize(input.clone());
            let twice = canonicalize(once.clone());
            prop_assert_eq!(&once, &twice);
            prop_assert_eq!(canonicalize(input), once);
        }

        #[test]
        fn prop_output_is_sorted(input in prop::collection::vec(arbitrary_occurrence(), 0..24)) {
            let result = canonicalize(input);
            for pair in result.windows(2) {
                let key = |o: &Occurrence| (o.start(), o.description().primary().to_string());
                prop_assert!(key(&pair[0]) <= key(&pair[1]));
            }
        }
    }
}

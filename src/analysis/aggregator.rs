//! Weekly keyword aggregation.
//!
//! Buckets matched feed items by week-based (year, week) and counts the
//! Kotlin and Java postings in each bucket.

use super::week::{WeekFields, WeekKey};
use crate::error::AggregateError;
use crate::models::{FeedItem, WeekStat};
use chrono::{DateTime, FixedOffset, ParseError};
use std::collections::BTreeMap;
use tracing::{debug, info};

pub const KOTLIN: &str = "kotlin";
pub const JAVA: &str = "java";

/// Aggregate items into weekly Kotlin/Java counts.
///
/// `None` in gives `None` out; an empty slice gives an empty list. Rows are
/// ordered by ascending (year, week) and rows with no hits are dropped.
/// An item counts towards both keywords when its title contains both.
pub fn aggregate(
    items: Option<&[FeedItem]>,
    week_fields: WeekFields,
) -> Result<Option<Vec<WeekStat>>, AggregateError> {
    let Some(items) = items else {
        debug!("No items to aggregate");
        return Ok(None);
    };

    let mut buckets: BTreeMap<WeekKey, WeekStat> = BTreeMap::new();

    for item in items {
        let key = week_key(item, week_fields)?;
        debug!("Item {} falls in {}", item.id, key);
        let stat = buckets.entry(key).or_insert(WeekStat {
            year: key.year,
            week: key.week,
            kotlin_count: 0,
            java_count: 0,
        });

        if item.title_contains(KOTLIN) {
            stat.kotlin_count += 1;
        }
        if item.title_contains(JAVA) {
            stat.java_count += 1;
        }
    }

    let stats: Vec<WeekStat> = buckets
        .into_values()
        .filter(|s| s.kotlin_count > 0 || s.java_count > 0)
        .collect();

    info!(
        "Aggregated {} items into {} weekly rows",
        items.len(),
        stats.len()
    );

    Ok(Some(stats))
}

/// Bucket key for an item, from its `date_modified` in its own offset.
pub fn week_key(item: &FeedItem, week_fields: WeekFields) -> Result<WeekKey, AggregateError> {
    let modified = parse_date_modified(item)?;
    week_fields
        .week_of(modified.date_naive())
        .ok_or_else(|| AggregateError::OutOfRange {
            item_id: item.id.clone(),
            value: item.date_modified.clone(),
        })
}

/// Parse `date_modified` as an ISO-8601 timestamp with an offset.
///
/// Seconds are optional (`2025-01-06T10:00+01:00`). A trailing bracketed
/// zone id (`...+01:00[Europe/Oslo]`) is ignored; the explicit offset is
/// authoritative.
pub fn parse_date_modified(item: &FeedItem) -> Result<DateTime<FixedOffset>, AggregateError> {
    let raw = item.date_modified.trim();
    let value = match raw.find('[') {
        Some(idx) if raw.ends_with(']') => &raw[..idx],
        _ => raw,
    };

    parse_timestamp(value).map_err(|source| AggregateError::DateParse {
        item_id: item.id.clone(),
        value: item.date_modified.clone(),
        source,
    })
}

/// RFC 3339 first, then the minute-precision ISO-8601 form.
fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>, ParseError> {
    DateTime::parse_from_rfc3339(value).or_else(|err| {
        let with_offset = match value.strip_suffix(['Z', 'z']) {
            Some(local) => format!("{}+00:00", local),
            None => value.to_string(),
        };
        DateTime::parse_from_str(&with_offset, "%Y-%m-%dT%H:%M%:z").map_err(|_| err)
    })
}

/// Group weekly rows by year, keeping row order within each year.
pub fn group_by_year(stats: &[WeekStat]) -> BTreeMap<i32, Vec<WeekStat>> {
    let mut grouped: BTreeMap<i32, Vec<WeekStat>> = BTreeMap::new();

    for stat in stats {
        grouped.entry(stat.year).or_default().push(*stat);
    }

    grouped
}

/// Kotlin and Java totals for a set of rows.
pub fn totals(stats: &[WeekStat]) -> (usize, usize) {
    stats
        .iter()
        .fold((0, 0), |(k, j), s| (k + s.kotlin_count, j + s.java_count))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, title: &str, date_modified: &str) -> FeedItem {
        FeedItem {
            id: id.to_string(),
            title: title.to_string(),
            date_modified: date_modified.to_string(),
            ..FeedItem::default()
        }
    }

    fn stat(year: i32, week: u32, kotlin_count: usize, java_count: usize) -> WeekStat {
        WeekStat {
            year,
            week,
            kotlin_count,
            java_count,
        }
    }

    fn run(items: &[FeedItem]) -> Vec<WeekStat> {
        aggregate(Some(items), WeekFields::ISO).unwrap().unwrap()
    }

    #[test]
    fn test_single_week() {
        let items = vec![
            item("1", "Kotlin developer", "2025-01-06T09:00:00+01:00"),
            item("2", "Java guide", "2025-01-07T12:30:00Z"),
        ];

        assert_eq!(run(&items), vec![stat(2025, 2, 1, 1)]);
    }

    #[test]
    fn test_case_insensitive_counts() {
        let items = vec![
            item("1", "KOTLIN", "2025-01-06T09:00:00Z"),
            item("2", "kotlin", "2025-01-06T09:00:00Z"),
            item("3", "Kotlin", "2025-01-06T09:00:00Z"),
            item("4", "jAvA", "2025-01-06T09:00:00Z"),
        ];

        assert_eq!(run(&items), vec![stat(2025, 2, 3, 1)]);
    }

    #[test]
    fn test_both_keywords_count_twice() {
        let items = vec![item("1", "Java/Kotlin backend", "2025-03-12T08:00:00Z")];

        assert_eq!(run(&items), vec![stat(2025, 11, 1, 1)]);
    }

    #[test]
    fn test_iso_year_boundary_shares_bucket() {
        let items = vec![
            item("1", "Kotlin developer", "2024-12-30T10:00:00Z"),
            item("2", "Java developer", "2025-01-01T10:00:00Z"),
            item("3", "Java developer", "2024-12-23T10:00:00Z"),
        ];

        assert_eq!(
            run(&items),
            vec![stat(2024, 52, 0, 1), stat(2025, 1, 1, 1)]
        );
    }

    #[test]
    fn test_local_offset_decides_the_day() {
        // 2025-01-05T23:30-01:00 is already Monday in UTC but still Sunday locally.
        let items = vec![item("1", "Kotlin", "2025-01-05T23:30:00-01:00")];

        assert_eq!(run(&items), vec![stat(2025, 1, 1, 0)]);
    }

    #[test]
    fn test_rows_sorted_by_year_and_week() {
        let items = vec![
            item("1", "Java", "2025-02-10T10:00:00Z"),
            item("2", "Java", "2024-11-04T10:00:00Z"),
            item("3", "Java", "2025-01-13T10:00:00Z"),
        ];

        let keys: Vec<(i32, u32)> = run(&items).iter().map(|s| (s.year, s.week)).collect();
        assert_eq!(keys, vec![(2024, 45), (2025, 3), (2025, 7)]);
    }

    #[test]
    fn test_buckets_without_hits_are_dropped() {
        let items = vec![
            item("1", "Rust developer", "2025-01-06T10:00:00Z"),
            item("2", "Kotlin developer", "2025-01-13T10:00:00Z"),
        ];

        assert_eq!(run(&items), vec![stat(2025, 3, 1, 0)]);
    }

    #[test]
    fn test_empty_absent_and_error_are_distinct() {
        assert_eq!(aggregate(Some(&[][..]), WeekFields::ISO).unwrap(), Some(vec![]));
        assert_eq!(aggregate(None, WeekFields::ISO).unwrap(), None);

        let bad = vec![item("bad-1", "Kotlin", "not a date")];
        assert!(aggregate(Some(bad.as_slice()), WeekFields::ISO).is_err());
    }

    #[test]
    fn test_malformed_date_names_the_item() {
        let items = vec![
            item("ok", "Kotlin", "2025-01-06T10:00:00Z"),
            item("bad-7", "Java", "2025-01-06 10:00"),
        ];

        let err = aggregate(Some(items.as_slice()), WeekFields::ISO).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("bad-7"));
        assert!(message.contains("2025-01-06 10:00"));
    }

    #[test]
    fn test_missing_offset_is_rejected() {
        let items = vec![item("1", "Kotlin", "2025-01-06T10:00:00")];
        assert!(aggregate(Some(items.as_slice()), WeekFields::ISO).is_err());
    }

    #[test]
    fn test_zone_id_suffix_is_ignored() {
        let parsed =
            parse_date_modified(&item("1", "Kotlin", "2025-01-06T10:00:00+01:00[Europe/Oslo]"))
                .unwrap();
        assert_eq!(parsed.to_rfc3339(), "2025-01-06T10:00:00+01:00");
    }

    #[test]
    fn test_minute_precision_timestamps() {
        let cases = [
            ("2025-01-06T10:00+01:00", "2025-01-06T10:00:00+01:00"),
            ("2025-01-06T10:00Z", "2025-01-06T10:00:00+00:00"),
            ("2025-01-06T10:00Z[UTC]", "2025-01-06T10:00:00+00:00"),
            ("2025-01-06T10:00+01:00[Europe/Oslo]", "2025-01-06T10:00:00+01:00"),
        ];
        for (raw, expected) in cases {
            let parsed = parse_date_modified(&item("1", "Kotlin", raw)).unwrap();
            assert_eq!(parsed.to_rfc3339(), expected, "input {}", raw);
        }

        let items = vec![
            item("1", "Kotlin developer", "2025-01-06T10:00+01:00"),
            item("2", "Java guide", "2025-01-07T10:00Z[UTC]"),
        ];
        assert_eq!(run(&items), vec![stat(2025, 2, 1, 1)]);
    }

    #[test]
    fn test_minute_precision_without_offset_is_rejected() {
        let items = vec![item("1", "Kotlin", "2025-01-06T10:00")];
        let err = aggregate(Some(items.as_slice()), WeekFields::ISO).unwrap_err();
        assert!(err.to_string().contains("2025-01-06T10:00"));
    }

    #[test]
    fn test_group_by_year_and_totals() {
        let stats = vec![stat(2024, 52, 0, 1), stat(2025, 1, 1, 1), stat(2025, 2, 2, 0)];

        let grouped = group_by_year(&stats);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[&2024], vec![stat(2024, 52, 0, 1)]);
        assert_eq!(grouped[&2025].len(), 2);

        assert_eq!(totals(&grouped[&2025]), (3, 1));
        assert_eq!(totals(&[]), (0, 0));
    }
}

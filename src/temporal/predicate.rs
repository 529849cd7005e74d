//! Temporal predicate evaluation over two date intervals.
//!
//! Every temporal predicate is evaluated as a relation between a
//! candidate interval `[candidate_start, candidate_end]` (a single day for
//! every `ner_date` entry, but general enough for the temporal joiner
//! where both sides are still single dates in practice) and the query
//! interval `[query_start, query_end]` carried by the condition or join.

use time::Date;

use crate::condition::TemporalPredicate;

/// Evaluate `predicate` for a candidate interval against a query
/// interval. `window_days` is only consulted for `PROXIMITY`.
pub fn interval_matches(
    predicate: TemporalPredicate,
    candidate_start: Date,
    candidate_end: Date,
    query_start: Date,
    query_end: Date,
    window_days: Option<i64>,
) -> bool {
    match predicate {
        TemporalPredicate::Before => candidate_end < query_start,
        TemporalPredicate::After => candidate_start > query_end,
        TemporalPredicate::BeforeEqual => candidate_end <= query_end,
        TemporalPredicate::AfterEqual => candidate_start >= query_start,
        TemporalPredicate::Equal => candidate_start == query_start && candidate_end == query_end,
        TemporalPredicate::Contains => query_start <= candidate_start && candidate_end <= query_end,
        TemporalPredicate::ContainedBy => {
            candidate_start <= query_start && query_end <= candidate_end
        }
        TemporalPredicate::Intersect => candidate_start <= query_end && query_start <= candidate_end,
        TemporalPredicate::Proximity => {
            let window = window_days.unwrap_or(0);
            let gap_days = if candidate_end < query_start {
                (query_start - candidate_end).whole_days()
            } else if candidate_start > query_end {
                (candidate_start - query_end).whole_days()
            } else {
                0
            };
            gap_days <= window
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    fn d(y: i32, m: u8, day: u8) -> Date {
        Date::from_calendar_date(y, Month::try_from(m).unwrap(), day).unwrap()
    }

    #[test]
    fn contains_holds_when_query_range_contains_candidate_point() {
        let candidate = d(1879, 3, 14);
        assert!(interval_matches(
            TemporalPredicate::Contains,
            candidate,
            candidate,
            d(1875, 1, 1),
            d(1880, 12, 31),
            None,
        ));
    }

    #[test]
    fn before_and_after_are_strict() {
        let candidate = d(1879, 3, 14);
        assert!(interval_matches(
            TemporalPredicate::Before,
            candidate,
            candidate,
            d(1880, 1, 1),
            d(1880, 1, 1),
            None,
        ));
        assert!(!interval_matches(
            TemporalPredicate::After,
            candidate,
            candidate,
            d(1880, 1, 1),
            d(1880, 1, 1),
            None,
        ));
    }

    #[test]
    fn proximity_respects_window_in_days() {
        let candidate = d(2001, 1, 1);
        let query = d(2001, 1, 5);
        assert!(interval_matches(
            TemporalPredicate::Proximity,
            candidate,
            candidate,
            query,
            query,
            Some(4),
        ));
        assert!(!interval_matches(
            TemporalPredicate::Proximity,
            candidate,
            candidate,
            query,
            query,
            Some(3),
        ));
    }
}

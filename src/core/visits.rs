//! Day-granularity visit counting over the session store
//!
//! Runs once per request on the landing and about pages. Reads the visit
//! count and last-visit timestamp out of the session, bumps the count when
//! at least one full day has elapsed, and writes both values back.

use chrono::NaiveDateTime;

use crate::error::{AppError, AppResult};
use crate::types::SessionData;

/// Session key for the number of distinct days the visitor has shown up.
pub const VISITS_KEY: &str = "visits";

/// Session key for the serialized wall-clock time of the last counted visit.
pub const LAST_VISIT_KEY: &str = "last_visit";

/// Storage serialization of `last_visit`. The microsecond suffix is always
/// emitted, so the stored value ends in a fixed-width `.NNNNNN` tail.
pub const STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

const PARSE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Width of the fractional tail stripped off before parsing.
const FRACTION_WIDTH: usize = 7;

/// Serialize a timestamp the way the session stores it.
pub fn format_timestamp(value: NaiveDateTime) -> String {
    value.format(STORAGE_FORMAT).to_string()
}

/// Tracks per-session visit counts with day granularity.
#[derive(Debug, Clone, Copy, Default)]
pub struct VisitTracker;

impl VisitTracker {
    pub fn new() -> Self {
        Self
    }

    /// Update the session's visit bookkeeping for a request happening at
    /// `now`, returning the resulting visit count.
    ///
    /// Missing fields fall back to defaults (count 1, last visit now). A
    /// stored timestamp that does not parse after the fixed-width truncation
    /// is fatal for the request and bubbles up unhandled, as does a stored
    /// count that is not an integer. Each field is read once and written
    /// once per call.
    pub fn record(&self, session: &mut SessionData, now: NaiveDateTime) -> AppResult<u32> {
        let visits: u32 = match session.get(VISITS_KEY) {
            Some(raw) => raw.parse().map_err(|source| AppError::MalformedVisitCount {
                value: raw.to_string(),
                source,
            })?,
            None => 1,
        };

        let stored = session
            .get(LAST_VISIT_KEY)
            .map(str::to_owned)
            .unwrap_or_else(|| format_timestamp(now));

        // The stored shape carries a fixed-width fractional tail; strip it
        // before the fixed-format parse.
        let boundary = stored.len().saturating_sub(FRACTION_WIDTH);
        let last_visit = stored
            .get(..boundary)
            .and_then(|trimmed| NaiveDateTime::parse_from_str(trimmed, PARSE_FORMAT).ok())
            .ok_or_else(|| AppError::MalformedTimestamp {
                value: stored.clone(),
            })?;

        let visits = if now.signed_duration_since(last_visit).num_days() >= 1 {
            session.set(LAST_VISIT_KEY, format_timestamp(now));
            visits + 1
        } else {
            // idempotent re-store of the value that was read
            session.set(LAST_VISIT_KEY, stored);
            visits
        };

        session.set(VISITS_KEY, visits.to_string());
        Ok(visits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn fresh_session() -> SessionData {
        SessionData::new(Duration::hours(1))
    }

    fn sample_now() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2020-03-14 15:09:26", "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_first_visit_defaults() {
        let mut session = fresh_session();
        let now = sample_now();

        let visits = VisitTracker::new().record(&mut session, now).unwrap();

        assert_eq!(visits, 1);
        assert_eq!(session.get(VISITS_KEY), Some("1"));
        assert_eq!(session.get(LAST_VISIT_KEY), Some(format_timestamp(now).as_str()));
    }

    #[test]
    fn test_increments_after_two_days() {
        let mut session = fresh_session();
        let now = sample_now();
        session.set(VISITS_KEY, "3".to_string());
        session.set(LAST_VISIT_KEY, format_timestamp(now - Duration::days(2)));

        let visits = VisitTracker::new().record(&mut session, now).unwrap();

        assert_eq!(visits, 4);
        assert_eq!(session.get(VISITS_KEY), Some("4"));
        assert_eq!(session.get(LAST_VISIT_KEY), Some(format_timestamp(now).as_str()));
    }

    #[test]
    fn test_same_day_leaves_count_and_timestamp_unchanged() {
        let mut session = fresh_session();
        let now = sample_now();
        let an_hour_ago = format_timestamp(now - Duration::hours(1));
        session.set(VISITS_KEY, "3".to_string());
        session.set(LAST_VISIT_KEY, an_hour_ago.clone());

        let visits = VisitTracker::new().record(&mut session, now).unwrap();

        assert_eq!(visits, 3);
        assert_eq!(session.get(VISITS_KEY), Some("3"));
        assert_eq!(session.get(LAST_VISIT_KEY), Some(an_hour_ago.as_str()));
    }

    #[test]
    fn test_exactly_one_full_day_is_inclusive() {
        let mut session = fresh_session();
        let now = sample_now();
        session.set(VISITS_KEY, "1".to_string());
        session.set(LAST_VISIT_KEY, format_timestamp(now - Duration::days(1)));

        let visits = VisitTracker::new().record(&mut session, now).unwrap();

        assert_eq!(visits, 2);
    }

    #[test]
    fn test_just_under_one_day_does_not_increment() {
        let mut session = fresh_session();
        let now = sample_now();
        session.set(VISITS_KEY, "1".to_string());
        session.set(
            LAST_VISIT_KEY,
            format_timestamp(now - Duration::days(1) + Duration::seconds(1)),
        );

        let visits = VisitTracker::new().record(&mut session, now).unwrap();

        assert_eq!(visits, 1);
    }

    #[test]
    fn test_repeat_calls_within_a_day_increment_at_most_once() {
        let mut session = fresh_session();
        let tracker = VisitTracker::new();
        let first = sample_now();
        session.set(VISITS_KEY, "2".to_string());
        session.set(LAST_VISIT_KEY, format_timestamp(first - Duration::days(3)));

        let after_first = tracker.record(&mut session, first).unwrap();
        assert_eq!(after_first, 3);

        // a second request later the same day
        let second = first + Duration::minutes(40);
        let after_second = tracker.record(&mut session, second).unwrap();
        assert_eq!(after_second, 3);
    }

    #[test]
    fn test_written_timestamp_round_trips() {
        let mut session = fresh_session();
        let tracker = VisitTracker::new();
        let now = sample_now();

        tracker.record(&mut session, now).unwrap();

        // whatever was written must reparse on the next invocation
        let next = tracker.record(&mut session, now + Duration::minutes(5));
        assert!(next.is_ok());
    }

    #[test]
    fn test_malformed_timestamp_is_fatal() {
        let mut session = fresh_session();
        session.set(VISITS_KEY, "5".to_string());
        session.set(LAST_VISIT_KEY, "not a timestamp".to_string());

        let result = VisitTracker::new().record(&mut session, sample_now());

        assert!(matches!(result, Err(AppError::MalformedTimestamp { .. })));
        // the count field is untouched when the parse blows up
        assert_eq!(session.get(VISITS_KEY), Some("5"));
    }

    #[test]
    fn test_short_timestamp_is_fatal() {
        let mut session = fresh_session();
        session.set(LAST_VISIT_KEY, "short".to_string());

        let result = VisitTracker::new().record(&mut session, sample_now());

        assert!(matches!(result, Err(AppError::MalformedTimestamp { .. })));
    }

    #[test]
    fn test_malformed_count_is_fatal() {
        let mut session = fresh_session();
        session.set(VISITS_KEY, "many".to_string());

        let result = VisitTracker::new().record(&mut session, sample_now());

        assert!(matches!(result, Err(AppError::MalformedVisitCount { .. })));
    }

    #[test]
    fn test_future_timestamp_does_not_increment() {
        let mut session = fresh_session();
        let now = sample_now();
        session.set(VISITS_KEY, "2".to_string());
        session.set(LAST_VISIT_KEY, format_timestamp(now + Duration::hours(3)));

        let visits = VisitTracker::new().record(&mut session, now).unwrap();

        assert_eq!(visits, 2);
    }
}

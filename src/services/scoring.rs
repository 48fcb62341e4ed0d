//! Scoring helpers shared by the task and template recommenders.

use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Recommendation lists never return more than this many entries.
pub const RECOMMENDATION_LIMIT: usize = 5;

/// Neutral time fit for work with no stated duration.
pub const NEUTRAL_TIME_FIT: f64 = 0.5;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Fit of `available` minutes against an optional `[min, max]` estimate.
///
/// A missing lower bound is treated as 0 and a missing upper bound as the
/// lower bound.
pub fn time_fit(min: Option<i64>, max: Option<i64>, available: u32) -> f64 {
    if min.is_none() && max.is_none() {
        return NEUTRAL_TIME_FIT;
    }
    let lower = min.unwrap_or(0);
    let upper = max.unwrap_or(lower);
    time_fit_range(lower, upper, available)
}

/// Fit of `available` minutes against a required `[lower, upper]` range.
///
/// 1.0 inside the range, decaying linearly to 0 as the gap to the nearer
/// bound grows relative to that bound (floored at 1 minute).
#[allow(clippy::cast_precision_loss)]
pub fn time_fit_range(lower: i64, upper: i64, available: u32) -> f64 {
    let available = i64::from(available);
    if available >= lower && available <= upper {
        return 1.0;
    }
    let (delta, bound) = if available < lower {
        (lower - available, lower)
    } else {
        (available - upper, upper)
    };
    (1.0 - delta as f64 / bound.max(1) as f64).max(0.0)
}

/// Fractional days elapsed between `then` and `now`.
#[allow(clippy::cast_precision_loss)]
pub fn days_since(then: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let millis = (now - then).num_milliseconds() as f64;
    millis / 1000.0 / SECONDS_PER_DAY
}

/// Lowercased set for case-insensitive membership checks.
pub fn lowercase_set(tags: &[String]) -> HashSet<String> {
    tags.iter().map(|t| t.to_lowercase()).collect()
}

/// Sort descending by score, keeping input order among equal scores, and
/// keep the first [`RECOMMENDATION_LIMIT`].
pub fn rank<T>(mut scored: Vec<T>, score: impl Fn(&T) -> f64) -> Vec<T> {
    scored.sort_by(|a, b| score(b).total_cmp(&score(a)));
    scored.truncate(RECOMMENDATION_LIMIT);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_time_fit_neutral_without_range() {
        assert!(approx(time_fit(None, None, 45), 0.5));
    }

    #[test]
    fn test_time_fit_inside_range() {
        assert!(approx(time_fit(Some(30), Some(60), 30), 1.0));
        assert!(approx(time_fit(Some(30), Some(60), 45), 1.0));
        assert!(approx(time_fit(Some(30), Some(60), 60), 1.0));
    }

    #[test]
    fn test_time_fit_below_lower() {
        // 15 short of 30 -> 1 - 15/30
        assert!(approx(time_fit(Some(30), Some(60), 15), 0.5));
        assert!(approx(time_fit(Some(30), Some(60), 0), 0.0));
    }

    #[test]
    fn test_time_fit_above_upper() {
        // 30 over 60 -> 1 - 30/60
        assert!(approx(time_fit(Some(30), Some(60), 90), 0.5));
        assert!(approx(time_fit(Some(30), Some(60), 200), 0.0));
    }

    #[test]
    fn test_time_fit_missing_bounds() {
        // upper defaults to lower
        assert!(approx(time_fit(Some(40), None, 40), 1.0));
        assert!(approx(time_fit(Some(40), None, 60), 0.5));
        // lower defaults to 0
        assert!(approx(time_fit(None, Some(20), 10), 1.0));
        assert!(approx(time_fit(None, Some(20), 30), 0.5));
    }

    #[test]
    fn test_time_fit_zero_bound_floors_denominator() {
        assert!(approx(time_fit_range(0, 0, 1), 0.0));
        assert!(approx(time_fit_range(0, 0, 0), 1.0));
    }

    #[test]
    fn test_days_since() {
        let now = Utc::now();
        assert!(approx(days_since(now - Duration::hours(36), now), 1.5));
        assert!(approx(days_since(now, now), 0.0));
    }

    #[test]
    fn test_rank_is_stable_and_limited() {
        let items = vec![("a", 1.0), ("b", 2.0), ("c", 1.0), ("d", 0.5), ("e", 1.0), ("f", 3.0)];
        let ranked = rank(items, |(_, s)| *s);
        let names: Vec<_> = ranked.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["f", "b", "a", "c", "e"]);
    }
}

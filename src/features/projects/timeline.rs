use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const NOT_STARTED: &str = "Not started";
pub const COMPLETE: &str = "Complete";

/// Elapsed share of a project's schedule relative to a given day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProjectTimeline {
    /// 0..=100
    pub percentage: u8,
    /// Whole days until the end date, 0 once complete
    pub days_left: i64,
    pub time_left: String,
}

impl ProjectTimeline {
    /// `None` unless both dates are set.
    pub fn compute(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Option<Self> {
        let (start, end) = (start?, end?);

        if today < start {
            return Some(Self {
                percentage: 0,
                days_left: (end - today).num_days().max(0),
                time_left: NOT_STARTED.to_string(),
            });
        }

        if today >= end {
            return Some(Self {
                percentage: 100,
                days_left: 0,
                time_left: COMPLETE.to_string(),
            });
        }

        // start <= today < end, so total > 0
        let total = (end - start).num_days() as f64;
        let elapsed = (today - start).num_days() as f64;
        let days_left = (end - today).num_days();
        let percentage = (elapsed / total * 100.0).round().clamp(0.0, 100.0) as u8;

        Some(Self {
            percentage,
            days_left,
            time_left: format!("{} days left", days_left),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_midway_through_the_year() {
        let t = ProjectTimeline::compute(Some(d(2024, 1, 1)), Some(d(2024, 12, 31)), d(2024, 7, 1))
            .unwrap();
        assert_eq!(t.percentage, 50);
        assert_eq!(t.days_left, 183);
        assert_eq!(t.time_left, "183 days left");
    }

    #[test]
    fn test_before_start_is_not_started() {
        let t = ProjectTimeline::compute(Some(d(2024, 3, 1)), Some(d(2024, 4, 1)), d(2024, 2, 1))
            .unwrap();
        assert_eq!(t.percentage, 0);
        assert_eq!(t.time_left, NOT_STARTED);
    }

    #[test]
    fn test_on_or_after_end_is_complete() {
        for today in [d(2024, 4, 1), d(2025, 1, 1)] {
            let t = ProjectTimeline::compute(Some(d(2024, 3, 1)), Some(d(2024, 4, 1)), today)
                .unwrap();
            assert_eq!(t.percentage, 100);
            assert_eq!(t.days_left, 0);
            assert_eq!(t.time_left, COMPLETE);
        }
    }

    #[test]
    fn test_start_day_is_zero_percent() {
        let t = ProjectTimeline::compute(Some(d(2024, 3, 1)), Some(d(2024, 3, 11)), d(2024, 3, 1))
            .unwrap();
        assert_eq!(t.percentage, 0);
        assert_eq!(t.time_left, "10 days left");
    }

    #[test]
    fn test_single_day_project() {
        let day = d(2024, 5, 5);
        let t = ProjectTimeline::compute(Some(day), Some(day), day).unwrap();
        assert_eq!(t.percentage, 100);
        assert_eq!(t.time_left, COMPLETE);
    }

    #[test]
    fn test_missing_dates_give_no_timeline() {
        let today = d(2024, 1, 1);
        assert!(ProjectTimeline::compute(None, Some(today), today).is_none());
        assert!(ProjectTimeline::compute(Some(today), None, today).is_none());
        assert!(ProjectTimeline::compute(None, None, today).is_none());
    }
}

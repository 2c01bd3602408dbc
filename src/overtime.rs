//! Daily overtime classification.
//!
//! Splits the minutes worked on one day into [`WorkBuckets`] so they can be fed to
//! [`crate::billing::compute_billing_totals`]. Weekday minutes are tiered
//! (regular, then 50% overtime, then 100% overtime); weekend and holiday minutes
//! go entirely to their own bucket.

use chrono::{Datelike, NaiveDate, Weekday};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::billing::{Category, WorkBuckets};
use crate::error::{Error, Result};

/// Billing classification of a calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Enum))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DayKind {
    Weekday,
    Saturday,
    Sunday,
    Holiday,
}

impl DayKind {
    /// Classify a date. A holiday wins over the day of the week.
    pub fn from_date(date: NaiveDate, is_holiday: bool) -> Self {
        if is_holiday {
            return DayKind::Holiday;
        }
        match date.weekday() {
            Weekday::Sat => DayKind::Saturday,
            Weekday::Sun => DayKind::Sunday,
            _ => DayKind::Weekday,
        }
    }
}

/// Thresholds for tiering weekday minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct OvertimePolicy {
    /// Weekday minutes up to this count are regular. Default: 480 (8 h)
    pub regular_daily_min: u32,
    /// Minutes after the regular threshold billed at 50% overtime; the rest is
    /// 100% overtime. Default: 120 (2 h)
    pub ot50_window_min: u32,
}

impl Default for OvertimePolicy {
    fn default() -> Self {
        Self {
            regular_daily_min: 480,
            ot50_window_min: 120,
        }
    }
}

impl OvertimePolicy {
    pub fn new(regular_daily_min: u32, ot50_window_min: u32) -> Result<Self> {
        if regular_daily_min == 0 {
            return Err(Error::InvalidConfig(
                "regularDailyMin must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            regular_daily_min,
            ot50_window_min,
        })
    }
}

/// Split one day's worked minutes into billing buckets.
///
/// ```rust
/// use fieldtrack::overtime::{classify_day, DayKind, OvertimePolicy};
///
/// let buckets = classify_day(660, DayKind::Weekday, &OvertimePolicy::default());
/// assert_eq!(buckets.regular_min, 480);
/// assert_eq!(buckets.ot50_min, 120);
/// assert_eq!(buckets.ot100_min, 60);
/// ```
pub fn classify_day(worked_min: u32, kind: DayKind, policy: &OvertimePolicy) -> WorkBuckets {
    let worked = i64::from(worked_min);
    let mut buckets = WorkBuckets::default();

    match kind {
        DayKind::Weekday => {
            let regular = worked.min(i64::from(policy.regular_daily_min));
            let ot50 = (worked - regular).min(i64::from(policy.ot50_window_min));
            buckets.set(Category::Regular, regular);
            buckets.set(Category::Ot50, ot50);
            buckets.set(Category::Ot100, worked - regular - ot50);
        }
        DayKind::Saturday => buckets.set(Category::Saturday, worked),
        DayKind::Sunday => buckets.set(Category::Sunday, worked),
        DayKind::Holiday => buckets.set(Category::Holiday, worked),
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::{compute_billing_totals, RateTable};

    #[test]
    fn test_day_kind_from_date() {
        // 2024-05-06 is a Monday
        let monday = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
        let saturday = NaiveDate::from_ymd_opt(2024, 5, 11).unwrap();
        let sunday = NaiveDate::from_ymd_opt(2024, 5, 12).unwrap();

        assert_eq!(DayKind::from_date(monday, false), DayKind::Weekday);
        assert_eq!(DayKind::from_date(saturday, false), DayKind::Saturday);
        assert_eq!(DayKind::from_date(sunday, false), DayKind::Sunday);
        assert_eq!(DayKind::from_date(sunday, true), DayKind::Holiday);
    }

    #[test]
    fn test_weekday_tiers() {
        let policy = OvertimePolicy::default();

        let short = classify_day(300, DayKind::Weekday, &policy);
        assert_eq!((short.regular_min, short.ot50_min, short.ot100_min), (300, 0, 0));

        let some_ot = classify_day(540, DayKind::Weekday, &policy);
        assert_eq!((some_ot.regular_min, some_ot.ot50_min, some_ot.ot100_min), (480, 60, 0));

        let long = classify_day(720, DayKind::Weekday, &policy);
        assert_eq!((long.regular_min, long.ot50_min, long.ot100_min), (480, 120, 120));
        assert_eq!(long.total(), 720);
    }

    #[test]
    fn test_weekend_and_holiday_single_bucket() {
        let policy = OvertimePolicy::default();
        assert_eq!(classify_day(600, DayKind::Saturday, &policy).saturday_min, 600);
        assert_eq!(classify_day(600, DayKind::Sunday, &policy).sunday_min, 600);

        let holiday = classify_day(600, DayKind::Holiday, &policy);
        assert_eq!(holiday.holiday_min, 600);
        assert_eq!(holiday.regular_min, 0);
    }

    #[test]
    fn test_week_into_billing() {
        let policy = OvertimePolicy::default();
        let mut week = WorkBuckets::default();
        for _ in 0..5 {
            week += classify_day(540, DayKind::Weekday, &policy);
        }
        week += classify_day(240, DayKind::Saturday, &policy);

        let totals = compute_billing_totals(&week, &RateTable::default(), None);
        // 5 * 60 ot50 -> 150 premium, 240 saturday -> 120 premium
        assert_eq!(totals.base_min, 2940);
        assert_eq!(totals.premium_min, 270);
        assert_eq!(totals.payable_min, 3210);
    }

    #[test]
    fn test_policy_rejects_zero_threshold() {
        assert!(OvertimePolicy::new(0, 120).is_err());
        assert_eq!(OvertimePolicy::new(480, 120).unwrap(), OvertimePolicy::default());
    }
}

//! # Billing Engine
//!
//! Converts categorized work minutes into payable totals.
//!
//! Every worked minute falls into one of six [`Category`] buckets. Each bucket has a
//! rate multiplier; the part of a multiplier above 1.0 produces *premium minutes*,
//! which are added on top of the worked minutes to give *payable minutes*.
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`compute_billing_totals`] | Aggregate buckets and rates into [`BillingTotals`] |
//! | [`format_hm`] | `125` → `"2h 05m"` |
//! | [`format_hm_dec`] | `90` → `"1.50 h"` |
//!
//! ## Example
//!
//! ```rust
//! use fieldtrack::billing::{compute_billing_totals, Category, RateTable, WorkBuckets};
//!
//! let buckets = WorkBuckets::from_partial([(Category::Regular, 480), (Category::Ot50, 60)]);
//! let totals = compute_billing_totals(&buckets, &RateTable::default(), None);
//!
//! assert_eq!(totals.base_min, 540);
//! assert_eq!(totals.premium_min, 30);
//! assert_eq!(totals.payable_min, 570);
//! ```
//!
//! ## Rounding
//!
//! An optional rounding step is applied once, after all categories have been summed.
//! Base, premium and payable are each snapped to the nearest multiple of the step
//! on their own. `payable_min == base_min + premium_min` holds before rounding; after
//! rounding the three totals can disagree by one step.

use std::ops::{Add, AddAssign};

use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// =============================================================================
// Categories
// =============================================================================

/// A billing category. Iteration order is fixed by [`Category::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "ffi", derive(uniffi::Enum))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Category {
    Regular,
    Ot50,
    Ot100,
    Saturday,
    Sunday,
    Holiday,
}

impl Category {
    /// All categories in billing order.
    pub const ALL: [Category; 6] = [
        Category::Regular,
        Category::Ot50,
        Category::Ot100,
        Category::Saturday,
        Category::Sunday,
        Category::Holiday,
    ];

    /// Stable lowercase key, as used by the host app.
    pub fn key(self) -> &'static str {
        match self {
            Category::Regular => "regular",
            Category::Ot50 => "ot50",
            Category::Ot100 => "ot100",
            Category::Saturday => "saturday",
            Category::Sunday => "sunday",
            Category::Holiday => "holiday",
        }
    }

    /// Multiplier used when the caller supplies no rate for this category.
    pub fn default_factor(self) -> f64 {
        match self {
            Category::Regular => 1.0,
            Category::Ot50 | Category::Saturday => 1.5,
            Category::Ot100 | Category::Sunday | Category::Holiday => 2.0,
        }
    }
}

// =============================================================================
// Inputs
// =============================================================================

/// Rate multiplier per category.
///
/// Partial input is merged with the defaults exactly once, here at the boundary:
/// either through [`RateTable::from_partial`] or, with the `serde` feature, by
/// deserializing an object with missing keys.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RateTable {
    /// Default: 1.0. Never produces premium, whatever its value.
    pub regular: f64,
    /// Default: 1.5
    pub ot50: f64,
    /// Default: 2.0
    pub ot100: f64,
    /// Default: 1.5
    pub saturday: f64,
    /// Default: 2.0
    pub sunday: f64,
    /// Default: 2.0
    pub holiday: f64,
}

impl Default for RateTable {
    fn default() -> Self {
        Self {
            regular: Category::Regular.default_factor(),
            ot50: Category::Ot50.default_factor(),
            ot100: Category::Ot100.default_factor(),
            saturday: Category::Saturday.default_factor(),
            sunday: Category::Sunday.default_factor(),
            holiday: Category::Holiday.default_factor(),
        }
    }
}

impl RateTable {
    /// Build a table from the rates the caller knows; the rest keep their defaults.
    pub fn from_partial<I>(rates: I) -> Self
    where
        I: IntoIterator<Item = (Category, f64)>,
    {
        let mut table = Self::default();
        for (category, factor) in rates {
            table.set(category, factor);
        }
        table
    }

    pub fn factor(&self, category: Category) -> f64 {
        match category {
            Category::Regular => self.regular,
            Category::Ot50 => self.ot50,
            Category::Ot100 => self.ot100,
            Category::Saturday => self.saturday,
            Category::Sunday => self.sunday,
            Category::Holiday => self.holiday,
        }
    }

    pub fn set(&mut self, category: Category, factor: f64) {
        match category {
            Category::Regular => self.regular = factor,
            Category::Ot50 => self.ot50 = factor,
            Category::Ot100 => self.ot100 = factor,
            Category::Saturday => self.saturday = factor,
            Category::Sunday => self.sunday = factor,
            Category::Holiday => self.holiday = factor,
        }
    }
}

/// Minutes worked per category. Missing categories are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct WorkBuckets {
    pub regular_min: i64,
    pub ot50_min: i64,
    pub ot100_min: i64,
    pub saturday_min: i64,
    pub sunday_min: i64,
    pub holiday_min: i64,
}

impl WorkBuckets {
    /// Build buckets from the categories the caller has; the rest are zero.
    /// Repeated categories accumulate.
    pub fn from_partial<I>(minutes: I) -> Self
    where
        I: IntoIterator<Item = (Category, i64)>,
    {
        let mut buckets = Self::default();
        for (category, min) in minutes {
            buckets.add_minutes(category, min);
        }
        buckets
    }

    pub fn minutes(&self, category: Category) -> i64 {
        match category {
            Category::Regular => self.regular_min,
            Category::Ot50 => self.ot50_min,
            Category::Ot100 => self.ot100_min,
            Category::Saturday => self.saturday_min,
            Category::Sunday => self.sunday_min,
            Category::Holiday => self.holiday_min,
        }
    }

    fn slot(&mut self, category: Category) -> &mut i64 {
        match category {
            Category::Regular => &mut self.regular_min,
            Category::Ot50 => &mut self.ot50_min,
            Category::Ot100 => &mut self.ot100_min,
            Category::Saturday => &mut self.saturday_min,
            Category::Sunday => &mut self.sunday_min,
            Category::Holiday => &mut self.holiday_min,
        }
    }

    pub fn set(&mut self, category: Category, minutes: i64) {
        *self.slot(category) = minutes;
    }

    pub fn add_minutes(&mut self, category: Category, minutes: i64) {
        *self.slot(category) += minutes;
    }

    /// Unweighted sum over all categories.
    pub fn total(&self) -> i64 {
        Category::ALL.iter().map(|&c| self.minutes(c)).sum()
    }
}

impl AddAssign for WorkBuckets {
    fn add_assign(&mut self, rhs: Self) {
        for category in Category::ALL {
            self.add_minutes(category, rhs.minutes(category));
        }
    }
}

impl Add for WorkBuckets {
    type Output = WorkBuckets;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

// =============================================================================
// Results
// =============================================================================

/// Per-category breakdown.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CategoryResult {
    pub category: Category,
    /// Worked minutes
    pub minutes: i64,
    /// Rate multiplier that was applied
    pub factor: f64,
    /// Extra minutes from the part of the factor above 1.0 (always 0 for regular)
    pub premium_min: i64,
    /// `minutes + premium_min`
    pub payable_min: i64,
}

/// Aggregated billing result.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BillingTotals {
    /// Sum of worked minutes over all categories, unweighted
    pub base_min: i64,
    /// Sum of premium minutes over all categories
    pub premium_min: i64,
    /// `base_min + premium_min` before rounding, then rounded on its own
    pub payable_min: i64,
    /// One entry per category, in [`Category::ALL`] order
    pub by_category: Vec<CategoryResult>,
}

impl BillingTotals {
    pub fn category(&self, category: Category) -> Option<&CategoryResult> {
        self.by_category.iter().find(|r| r.category == category)
    }
}

// =============================================================================
// Computation
// =============================================================================

/// Round half up, matching the host app's `Math.round`.
#[inline]
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

#[inline]
fn round_to_step(value: i64, step: i64) -> i64 {
    round_half_up(value as f64 / step as f64) * step
}

/// Compute payable totals from worked minutes and rate multipliers.
///
/// Categories are processed in [`Category::ALL`] order. For every category except
/// regular, `premium = round(minutes * (factor - 1))`. Regular never earns premium.
///
/// `rounding_step_min` has an effect only when greater than 1. Rounding happens once,
/// after aggregation, and base, premium and payable are each rounded on their own.
/// Per-category values are left unrounded.
///
/// Negative minutes are not rejected and flow through the arithmetic unchanged.
///
/// # Example
///
/// ```rust
/// use fieldtrack::billing::{compute_billing_totals, Category, RateTable, WorkBuckets};
///
/// let buckets = WorkBuckets::from_partial([(Category::Regular, 473), (Category::Sunday, 61)]);
/// let totals = compute_billing_totals(&buckets, &RateTable::default(), Some(15));
///
/// assert_eq!(totals.base_min, 540); // 534
/// assert_eq!(totals.premium_min, 60); // 61
/// assert_eq!(totals.payable_min, 600); // 595
/// ```
pub fn compute_billing_totals(
    buckets: &WorkBuckets,
    rates: &RateTable,
    rounding_step_min: Option<u32>,
) -> BillingTotals {
    let mut base = 0i64;
    let mut premium = 0i64;
    let mut by_category = Vec::with_capacity(Category::ALL.len());

    for category in Category::ALL {
        let minutes = buckets.minutes(category);
        let factor = rates.factor(category);

        let (cat_premium, cat_payable) = match category {
            Category::Regular => (0, minutes),
            _ => {
                let p = round_half_up(minutes as f64 * (factor - 1.0));
                (p, minutes + p)
            }
        };

        base += minutes;
        premium += cat_premium;

        by_category.push(CategoryResult {
            category,
            minutes,
            factor,
            premium_min: cat_premium,
            payable_min: cat_payable,
        });
    }

    let mut payable = base + premium;

    if let Some(step) = rounding_step_min.filter(|&s| s > 1) {
        let step = i64::from(step);
        payable = round_to_step(payable, step);
        premium = round_to_step(premium, step);
        base = round_to_step(base, step);
    }

    debug!(
        "[Billing] base={}min premium={}min payable={}min (step={:?})",
        base, premium, payable, rounding_step_min
    );

    BillingTotals {
        base_min: base,
        premium_min: premium,
        payable_min: payable,
        by_category,
    }
}

// =============================================================================
// Formatting
// =============================================================================

/// Format minutes as decimal hours with a `" h"` suffix.
///
/// ```rust
/// use fieldtrack::billing::format_hm_dec;
///
/// assert_eq!(format_hm_dec(90, 2), "1.50 h");
/// assert_eq!(format_hm_dec(90, 1), "1.5 h");
/// ```
pub fn format_hm_dec(minutes: i64, decimals: usize) -> String {
    format!("{:.*} h", decimals, minutes as f64 / 60.0)
}

/// [`format_hm_dec`] with two decimals.
pub fn format_hm_dec_default(minutes: i64) -> String {
    format_hm_dec(minutes, 2)
}

/// Format minutes as `"{hours}h {minutes:02}m"`.
///
/// Negative values keep their sign in front: `-65` is `"-1h 05m"`.
///
/// ```rust
/// use fieldtrack::billing::format_hm;
///
/// assert_eq!(format_hm(125), "2h 05m");
/// assert_eq!(format_hm(-65), "-1h 05m");
/// ```
pub fn format_hm(minutes: i64) -> String {
    let sign = if minutes < 0 { "-" } else { "" };
    let abs = minutes.unsigned_abs();
    format!("{}{}h {:02}m", sign, abs / 60, abs % 60)
}

// =============================================================================
// Unit Tests
// =============================================================================

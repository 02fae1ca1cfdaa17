//! Numeric helpers: discounting and calendar-month durations
//!
//! Global invariants enforced:
//! - Pure functions, no clocks (dates come from the criteria only)
//! - Absent inputs map to fixed defaults, never to NaN

use chrono::{DateTime, Datelike, NaiveDate};
use std::collections::BTreeMap;

/// Discount rate used when a projection does not carry one
pub const DEFAULT_WACC: f64 = 0.12;

/// Duration assumed when either timeline date is missing
pub const DEFAULT_DURATION_MONTHS: i32 = 12;

/// Year-by-year cash flow projection (criterion #19)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinancialProjection {
    pub wacc: Option<f64>,
    /// Year offset (as written in the source record) to cash flow
    pub years: BTreeMap<String, f64>,
}

impl FinancialProjection {
    /// Effective discount rate. Zero, non-finite and rates that would divide
    /// by zero fall back to [`DEFAULT_WACC`].
    pub fn rate(&self) -> f64 {
        match self.wacc {
            Some(w) if w.is_finite() && w != 0.0 && w > -1.0 => w,
            _ => DEFAULT_WACC,
        }
    }
}

/// Present value of a single cash flow `year_offset` years out
pub fn present_value(cash_flow: f64, rate: f64, year_offset: i32) -> f64 {
    cash_flow / (1.0 + rate).powi(year_offset)
}

/// Net present value of a projection
///
/// Returns 0.0 when there is no projection or it lists no years. Year keys
/// are read up to their first non-digit; keys without leading digits are
/// skipped.
pub fn npv(projection: Option<&FinancialProjection>) -> f64 {
    let Some(projection) = projection else {
        return 0.0;
    };
    if projection.years.is_empty() {
        return 0.0;
    }

    let rate = projection.rate();
    let mut total = 0.0;
    for (year, cash_flow) in &projection.years {
        match year_offset(year) {
            Some(offset) => total += present_value(*cash_flow, rate, offset),
            None => tracing::debug!(year = %year, "skipping non-integer projection year"),
        }
    }
    total
}

/// Leading integer of a year key: `"2"`, `" 2"`, `"2.0"` and `"2y"` all read as 2
fn year_offset(key: &str) -> Option<i32> {
    let key = key.trim_start();
    let (sign, digits) = match key.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, key.strip_prefix('+').unwrap_or(key)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i32>().ok().map(|n| sign * n)
}

/// Whole calendar months between two dates, floored at 1
///
/// Day-of-month is ignored: 2025-01-31 to 2025-02-01 is one month. Missing
/// or unparseable dates yield [`DEFAULT_DURATION_MONTHS`].
pub fn months_between(start: Option<&str>, end: Option<&str>) -> i32 {
    let (Some(start), Some(end)) = (start.and_then(parse_date), end.and_then(parse_date)) else {
        return DEFAULT_DURATION_MONTHS;
    };

    let months = (end.year() - start.year()) * 12 + (end.month() as i32 - start.month() as i32);
    months.max(1)
}

/// Parse `YYYY-MM-DD`, `YYYY-MM` or an RFC 3339 timestamp
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{}-01", raw), "%Y-%m-%d") {
        return Some(date);
    }
    tracing::debug!(date = %raw, "unparseable timeline date");
    None
}

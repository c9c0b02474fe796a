use chrono::{DateTime, Utc};

const MS_PER_DAY: i64 = 86_400_000;

/// Inclusive-boundary interval overlap: touching endpoints count as a
/// conflict. Two ranges [s1,e1] and [s2,e2] overlap iff s1 <= e2 && s2 <= e1.
/// The SQL conflict queries encode the same rule.
pub fn overlaps(
    s1: DateTime<Utc>,
    e1: DateTime<Utc>,
    s2: DateTime<Utc>,
    e2: DateTime<Utc>,
) -> bool {
    s1 <= e2 && s2 <= e1
}

/// Inclusive day count: ceil((end - start) / 1 day) + 1. A booking starting
/// and ending the same instant is 1 day. Carried verbatim from the original
/// billing rule; it bills hourly-priced products as whole days as well.
pub fn billable_days(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let ms = (end - start).num_milliseconds();
    i64_div_ceil(ms, MS_PER_DAY) + 1
}

/// Stable-compiler equivalent of the unstable `i64::div_ceil` (`int_roundings`).
/// Mirrors the standard library algorithm exactly: ceiling division rounding
/// toward positive infinity.
fn i64_div_ceil(lhs: i64, rhs: i64) -> i64 {
    let d = lhs / rhs;
    let r = lhs % rhs;
    if (r > 0 && rhs > 0) || (r < 0 && rhs < 0) {
        d + 1
    } else {
        d
    }
}

pub fn compute_total_price(unit_price: i64, start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    unit_price * billable_days(start, end)
}

//! Locale-tolerant conversion of SAF-T text values.
//!
//! Exporters write amounts as `1 234,50`, `1234.50` or with non-breaking
//! space grouping. Nothing here ever turns unparsable text into zero: a
//! failure is `None` and the caller decides what that means.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Characters used as thousands separators by the exporters seen in practice.
const GROUP_SEPARATORS: [char; 3] = [' ', '\u{00A0}', '\u{202F}'];

/// Normalize locale-formatted numeric text into an exact decimal.
///
/// Strips spaces and (narrow) non-breaking spaces, treats `,` as the decimal
/// separator, and parses the rest exactly. Returns `None` for empty or
/// non-numeric text.
///
/// ```
/// use saft_ledger::normalize_decimal;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(normalize_decimal("1 234,50"), Some(dec!(1234.50)));
/// assert_eq!(normalize_decimal("-10.00"), Some(dec!(-10.00)));
/// assert_eq!(normalize_decimal("n/a"), None);
/// ```
pub fn normalize_decimal(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| !GROUP_SEPARATORS.contains(c))
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if cleaned.is_empty() || !cleaned.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    // `Decimal::from_str` tolerates `_`, which is never a SAF-T digit separator.
    if cleaned.contains('_') {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

/// Parse a SAF-T date or date-time into a calendar date.
///
/// Accepts `YYYY-MM-DD` (optionally followed by a time part) and the
/// `DD.MM.YYYY` form some Nordic exporters emit.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let head = text.get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(head, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(head, "%d.%m.%Y"))
        .ok()
}

/// Parse a non-negative count such as `NumberOfEntries`.
pub fn parse_count(text: &str) -> Option<u64> {
    text.trim().parse().ok()
}

//! Timezone offset labels.

/// Largest offset accepted on either side of UTC.
const MAX_OFFSET_HOURS: u8 = 14;

/// Whether `label` is `UTC` or `UTC+N`/`UTC-N` with N in 1..=14.
pub fn is_valid_timezone_label(label: &str) -> bool {
    let Some(offset) = label.strip_prefix("UTC") else {
        return false;
    };
    if offset.is_empty() {
        return true;
    }

    let digits = match offset.strip_prefix('+').or_else(|| offset.strip_prefix('-')) {
        Some(digits) => digits,
        None => return false,
    };
    if digits.is_empty() || digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    digits
        .parse::<u8>()
        .is_ok_and(|hours| hours <= MAX_OFFSET_HOURS)
}

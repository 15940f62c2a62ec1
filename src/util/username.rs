//! Username identity.

/// Username used for identity comparison: all whitespace removed, lowercased.
///
/// Only ever used to compare; the display form stored on the member is left untouched.
pub fn normalize_username(username: &str) -> String {
    username
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

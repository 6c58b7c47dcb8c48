use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Lower-case, trimmed, whitespace runs replaced by `-`.
/// `"  Acme  Corp "` → `"acme-corp"`
pub fn slugify(name: &str) -> String {
    WHITESPACE
        .replace_all(&name.trim().to_lowercase(), "-")
        .into_owned()
}

/// Initials for avatar fallbacks: first letter of the first and last word.
pub fn initials(name: &str) -> String {
    let parts: Vec<&str> = name.split_whitespace().collect();
    let first_char = |s: &str| s.chars().next().map(|c| c.to_uppercase().to_string());
    match parts.as_slice() {
        [] => String::new(),
        [only] => first_char(only).unwrap_or_default(),
        [first, .., last] => format!(
            "{}{}",
            first_char(first).unwrap_or_default(),
            first_char(last).unwrap_or_default()
        ),
    }
}

/// Avatar image reference for a display name.
pub fn avatar_url(name: &str) -> String {
    format!("/avatars/{}.png", slugify(name))
}

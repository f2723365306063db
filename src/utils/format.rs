use regex::Regex;
use std::sync::LazyLock;

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("valid date pattern"));

static UNSAFE_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_.\-]").expect("valid filename pattern"));

/// Converts `YYYY-MM-DD` into `DD.MM.YYYY`.
///
/// Input that does not match the pattern is returned unchanged.
pub fn format_display_date(iso: &str) -> String {
    match ISO_DATE.captures(iso) {
        Some(caps) => format!("{}.{}.{}", &caps[3], &caps[2], &caps[1]),
        None => iso.to_string(),
    }
}

/// Replaces every character outside `[A-Za-z0-9_.-]` with `_`.
pub fn safe_filename(name: &str) -> String {
    UNSAFE_FILENAME_CHARS.replace_all(name, "_").into_owned()
}

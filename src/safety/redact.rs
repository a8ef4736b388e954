use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

pub const SSN_REPLACEMENT: &str = "[SSN REMOVED]";
pub const CARD_REPLACEMENT: &str = "[CARD NUMBER REMOVED]";

static SSN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    // 123-45-6789, 123 45 6789, 123456789
    Regex::new(r"\b(?:\d{3}-\d{2}-\d{4}|\d{3} \d{2} \d{4}|\d{9})\b").expect("hardcoded regex")
});

static CARD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    // 13-19 digits, optionally grouped with spaces or hyphens.
    Regex::new(r"\b(?:\d[ -]?){12,18}\d\b").expect("hardcoded regex")
});

/// Remove structured personal data from `text`.
///
/// SSN shapes are replaced first so a grouped SSN followed by more digits is
/// not taken for a card number. Replacement markers carry no digits, which
/// makes the function idempotent.
pub fn redact(text: &str) -> Cow<'_, str> {
    if !text.bytes().any(|b| b.is_ascii_digit()) {
        return Cow::Borrowed(text);
    }

    let after_ssns = SSN_PATTERN.replace_all(text, SSN_REPLACEMENT);
    if let Cow::Owned(replaced) = CARD_PATTERN.replace_all(&after_ssns, CARD_REPLACEMENT) {
        return Cow::Owned(replaced);
    }
    after_ssns
}

//! Field-level checks used by the validator pipeline.

use std::sync::LazyLock;

use regex::Regex;

pub const NAME_MAX_CHARS: usize = 60;
pub const NAME_MAX_WORDS: usize = 3;
pub const INSTRUMENT_MAX_CHARS: usize = 80;
pub const MESSAGE_MAX_CHARS: usize = 400;

static LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:https?://|www\.|t\.me/|telegram\.me/|(?:[a-z0-9-]+\.)+[a-z]{2,})")
        .expect("link pattern compiles")
});

static NAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\s]+$").expect("name pattern compiles"));

static INSTRUMENT_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\s(),-]+$").expect("instrument pattern compiles"));

static MESSAGE_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^[\p{L}\p{N}\s.,!?():;"-]+$"#).expect("message pattern compiles")
});

static CANONICAL_PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{10,15}$").expect("phone pattern compiles"));

/// True if the text contains a URL scheme, `www.`, a Telegram link or
/// anything shaped like a domain name.
pub fn contains_link(value: &str) -> bool {
    LINK.is_match(value)
}

pub fn word_count(value: &str) -> usize {
    value.split_whitespace().count()
}

/// Length in Unicode scalar values.
pub fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// Letters and whitespace only.
pub fn is_name_text(value: &str) -> bool {
    NAME_CHARS.is_match(value)
}

/// Letters, whitespace, parentheses, comma and hyphen.
pub fn is_instrument_text(value: &str) -> bool {
    INSTRUMENT_CHARS.is_match(value)
}

/// Letters, digits, whitespace and `.,!?():;"-`.
pub fn is_message_text(value: &str) -> bool {
    MESSAGE_CHARS.is_match(value)
}

/// Optional `+` followed by 10 to 15 ASCII digits.
pub fn is_canonical_phone(value: &str) -> bool {
    CANONICAL_PHONE.is_match(value)
}

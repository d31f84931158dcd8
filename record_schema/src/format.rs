//! Assertion of the `format` values this crate knows about.

use crate::schema::Format;
use regress::Regex;
use std::sync::LazyLock;

/// Local part, then at least two non-empty dot-separated domain labels.
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$";

const DATE_TIME_PATTERN: &str = r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])[Tt]([01]\d|2[0-3]):[0-5]\d:([0-5]\d|60)(\.\d+)?([Zz]|[+-]([01]\d|2[0-3]):[0-5]\d)$";

static EMAIL: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(EMAIL_PATTERN).ok());

static DATE_TIME: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(DATE_TIME_PATTERN).ok());

/// Returns true if `value` satisfies `format`. `Format::Other` always matches.
#[must_use]
pub fn matches(format: &Format, value: &str) -> bool {
    match format {
        Format::Email => full_match(&EMAIL, value),
        Format::DateTime => full_match(&DATE_TIME, value),
        Format::Uuid => value.len() == 36 && uuid::Uuid::parse_str(value).is_ok(),
        Format::Other(_) => true,
    }
}

fn full_match(regex: &LazyLock<Option<Regex>>, value: &str) -> bool {
    regex
        .as_ref()
        .is_some_and(|re| re.find(value).is_some())
}

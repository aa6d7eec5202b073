#![forbid(unsafe_code)]

//! Built-in predicates
//!
//! Every predicate has the signature `(candidate, constraint, type_hint) -> bool`
//! and is stateless. Candidates and constraints are dynamic JSON values; a
//! predicate that receives a value it cannot interpret fails rather than
//! panicking.

use regex::Regex;
use serde_json::Value;
use std::borrow::Cow;
use std::sync::LazyLock;

static NUMBER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:-?\d+|-?\d{1,3}(?:,\d{3})+)?(?:\.\d+)?$").expect("Invalid number regex")
});

static INTEGER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+$").expect("Invalid integer regex"));

static TELEPHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^1[3-9]\d{9}$").expect("Invalid telephone regex"));

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("Invalid email regex")
});

static LANDLINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(([0+]\d{2,3}-)?(0\d{2,3})-)(\d{7,8})(-(\d{3,}))?$")
        .expect("Invalid landline regex")
});

static TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("Invalid tag regex"));

/// Returns true if `value` counts as supplied
///
/// `null` and empty or whitespace-only strings are absent; everything else,
/// including `false` and `0`, is present.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

/// Text form of a scalar candidate (strings and numbers)
pub(crate) fn as_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        _ => None,
    }
}

/// Length of a candidate: characters of a string, elements of an array
fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

/// Numeric form of a candidate or constraint; numeric strings are parsed
///
/// Only finite values count, so `"inf"` and `"NaN"` are not numbers.
fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// A `[low, high]` constraint pair
fn as_pair(param: &Value) -> Option<(f64, f64)> {
    match param.as_array()?.as_slice() {
        [low, high, ..] => Some((as_number(low)?, as_number(high)?)),
        _ => None,
    }
}

fn text_matches(value: &Value, regex: &Regex) -> bool {
    as_text(value).is_some_and(|text| regex.is_match(&text))
}

/// Required-ness
///
/// With the `array` type hint the candidate must be a non-empty array.
/// Otherwise `null` and whitespace-only strings fail and anything else passes.
pub fn required(value: &Value, _param: &Value, type_hint: &str) -> bool {
    if type_hint == "array" {
        return value.as_array().is_some_and(|items| !items.is_empty());
    }
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

/// Decimal number, optionally signed and comma-grouped (`-1,234.5`)
pub fn number(value: &Value, _param: &Value, _type_hint: &str) -> bool {
    text_matches(value, &NUMBER_REGEX)
}

/// Whole number
pub fn digits(value: &Value, _param: &Value, _type_hint: &str) -> bool {
    text_matches(value, &INTEGER_REGEX)
}

/// Candidate contains every element of the constraint
///
/// Strings (and numbers) are searched for substrings; arrays for elements.
pub fn contains(value: &Value, param: &Value, _type_hint: &str) -> bool {
    let needles: Vec<&Value> = match param {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };

    match value {
        Value::Array(items) => needles.iter().all(|needle| items.contains(needle)),
        other => match as_text(other) {
            Some(text) => needles
                .iter()
                .all(|needle| text.contains(&crate::template::display_value(needle))),
            None => false,
        },
    }
}

pub fn minlength(value: &Value, param: &Value, _type_hint: &str) -> bool {
    match (length_of(value), as_number(param)) {
        (Some(len), Some(min)) => len as f64 >= min,
        _ => false,
    }
}

pub fn maxlength(value: &Value, param: &Value, _type_hint: &str) -> bool {
    match (length_of(value), as_number(param)) {
        (Some(len), Some(max)) => len as f64 <= max,
        _ => false,
    }
}

/// Length within `[min, max]`, both inclusive
pub fn rangelength(value: &Value, param: &Value, _type_hint: &str) -> bool {
    match (length_of(value), as_pair(param)) {
        (Some(len), Some((min, max))) => len as f64 >= min && len as f64 <= max,
        _ => false,
    }
}

pub fn min(value: &Value, param: &Value, _type_hint: &str) -> bool {
    match (as_number(value), as_number(param)) {
        (Some(n), Some(min)) => n >= min,
        _ => false,
    }
}

pub fn max(value: &Value, param: &Value, _type_hint: &str) -> bool {
    match (as_number(value), as_number(param)) {
        (Some(n), Some(max)) => n <= max,
        _ => false,
    }
}

/// Value within `[low, high]`, both inclusive
pub fn range(value: &Value, param: &Value, _type_hint: &str) -> bool {
    match (as_number(value), as_pair(param)) {
        (Some(n), Some((low, high))) => n >= low && n <= high,
        _ => false,
    }
}

/// No HTML tags
pub fn xss(value: &Value, _param: &Value, _type_hint: &str) -> bool {
    match as_text(value) {
        Some(text) => !TAG_REGEX.is_match(&text),
        None => true,
    }
}

/// Mainland-China mobile number
pub fn telephone(value: &Value, _param: &Value, _type_hint: &str) -> bool {
    text_matches(value, &TELEPHONE_REGEX)
}

pub fn email(value: &Value, _param: &Value, _type_hint: &str) -> bool {
    text_matches(value, &EMAIL_REGEX)
}

/// Landline number with area code, e.g. `0592-5966633` or `0592-5966633-123`
pub fn landline(value: &Value, _param: &Value, _type_hint: &str) -> bool {
    text_matches(value, &LANDLINE_REGEX)
}

/// Absolute http(s) URL with a host
pub fn url(value: &Value, _param: &Value, _type_hint: &str) -> bool {
    let Some(text) = as_text(value) else {
        return false;
    };
    match ::url::Url::parse(&text) {
        Ok(parsed) => {
            matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some()
        }
        Err(_) => false,
    }
}

#![forbid(unsafe_code)]

//! Message template formatting
//!
//! Templates are plain strings with two kinds of slots:
//!
//! - `[0]` is the field-label slot. One whitespace character on either side of
//!   it is consumed together with the placeholder, so `"[0] 不能为空"` with the
//!   label `密码` becomes `"密码不能为空"`.
//! - `{0}`, `{1}`, ... are positional slots filled from the constraint value
//!   (or the candidate value for rules that inject it).

use regex::{NoExpand, Regex};
use serde_json::Value;
use std::sync::LazyLock;

/// Label placeholder, including one optional whitespace character on each side.
static LABEL_SLOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s?\[0\]\s?").expect("Invalid label placeholder regex"));

/// Format a message template
///
/// Every label placeholder is replaced with `label` (empty when `None`). When
/// `values` is `None` no positional interpolation happens; otherwise the value
/// is coerced to a sequence (arrays are used as-is, `null` is empty, any other
/// value is a one-element sequence) and each `{i}` is replaced with the string
/// form of the i-th element.
///
/// ```
/// use formrules::template::format;
/// use serde_json::json;
///
/// assert_eq!(format("密码不能为空", None, None), "密码不能为空");
/// assert_eq!(format("[0] 不能为空", None, Some("密码")), "密码不能为空");
/// assert_eq!(
///     format("[0] 字符在 {0} 到 {1} 长度之间", Some(&json!([10, 20])), Some("密码")),
///     "密码字符在 10 到 20 长度之间"
/// );
/// ```
pub fn format(template: &str, values: Option<&Value>, label: Option<&str>) -> String {
    let label = label.unwrap_or("");
    let mut output = LABEL_SLOT.replace_all(template, NoExpand(label)).into_owned();

    let Some(values) = values else {
        return output;
    };

    for (index, value) in positional(values).iter().enumerate() {
        let slot = format!("{{{}}}", index);
        if output.contains(&slot) {
            output = output.replace(&slot, &display_value(value));
        }
    }

    output
}

/// Coerce a value to its positional sequence
fn positional(values: &Value) -> Vec<&Value> {
    match values {
        Value::Array(items) => items.iter().collect(),
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

/// String form of a dynamic value as it appears in messages
///
/// Strings are inserted without quotes and arrays are joined with commas.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

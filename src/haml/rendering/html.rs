//! HTML output helpers shared by both back ends
//!
//! The tree walker calls these directly; generated programs reach them through the engine's
//! `escape`, `str`, `attr` and `raw_attr` intrinsics.

use crate::haml::expr::value::stringify;
use serde_json::Value;

/// Replace `& < > " '` with their entities.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// The escaped string form of a value (`null` escapes to nothing).
pub fn escape_value(value: &Value) -> String {
    escape_html(&stringify(value))
}

/// One dynamic attribute, including its leading space.
///
/// `false` and `null` omit the attribute, `true` renders a bare `key`, anything else renders
/// `key="value"` with the value escaped unless `raw`.
pub fn render_attribute(key: &str, value: &Value, raw: bool) -> String {
    match value {
        Value::Null | Value::Bool(false) => String::new(),
        Value::Bool(true) => format!(" {}", key),
        other => {
            let text = if raw {
                stringify(other)
            } else {
                escape_value(other)
            };
            format!(" {}=\"{}\"", key, text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_escape_all_reserved() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_escape_value() {
        assert_eq!(escape_value(&json!(null)), "");
        assert_eq!(escape_value(&json!(false)), "false");
        assert_eq!(escape_value(&json!("<b>")), "&lt;b&gt;");
    }

    #[test]
    fn test_attribute_forms() {
        assert_eq!(render_attribute("disabled", &json!(false), false), "");
        assert_eq!(render_attribute("disabled", &json!(null), false), "");
        assert_eq!(render_attribute("disabled", &json!(true), false), " disabled");
        assert_eq!(render_attribute("n", &json!(0), false), " n=\"0\"");
        assert_eq!(render_attribute("t", &json!(""), false), " t=\"\"");
        assert_eq!(
            render_attribute("title", &json!("a\"b"), false),
            " title=\"a&quot;b\""
        );
        assert_eq!(
            render_attribute("data", &json!("<i>"), true),
            " data=\"<i>\""
        );
    }
}

//! Body payloads, content classification, and size formatting.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

/// Payload of a request, response, or failed exchange.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Body {
    /// No body. Serializes as `null`.
    #[default]
    Empty,
    /// Raw text as received or sent.
    Text(String),
    /// Structured JSON value.
    Json(Value),
}

impl Body {
    /// Builds a body from response text, decoding it as JSON when the content
    /// type declares JSON and the text parses.
    #[must_use]
    pub fn from_payload(text: String, content_type: Option<&str>) -> Self {
        if text.is_empty() {
            return Self::Empty;
        }
        let declares_json =
            content_type.is_some_and(|ct| ct.to_ascii_lowercase().contains("json"));
        if declares_json && let Ok(value) = serde_json::from_str::<Value>(&text) {
            return Self::Json(value);
        }
        Self::Text(text)
    }

    /// Whether the body counts as absent: empty, `""`, `null`, `false`, or `0`.
    #[must_use]
    pub fn is_falsy(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(text) => text.is_empty(),
            Self::Json(value) => json_is_falsy(value),
        }
    }

    /// Text written to a body log file: strings as-is, values as pretty JSON.
    #[must_use]
    pub fn to_log_string(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(text) | Self::Json(Value::String(text)) => text.clone(),
            Self::Json(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
        }
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

fn json_is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n == 0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Logical format of a body, used as the extension of its log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentExt {
    Json,
    Html,
    Text,
}

impl ContentExt {
    /// Extension string without the leading dot.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Html => "html",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for ContentExt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a body as html, json, or text.
///
/// The declared content type wins over sniffing: `html` in the header means
/// html, then `json` means json. Otherwise strings are sniffed for a leading
/// `<!`/`<html` or `{`/`[`, structured values are json, and everything else
/// is text.
#[must_use]
pub fn detect_ext(body: &Body, content_type: Option<&str>) -> ContentExt {
    if let Some(content_type) = content_type {
        let content_type = content_type.to_ascii_lowercase();
        if content_type.contains("html") {
            return ContentExt::Html;
        }
        if content_type.contains("json") {
            return ContentExt::Json;
        }
    }

    match body {
        Body::Text(text) | Body::Json(Value::String(text)) => sniff_text(text),
        Body::Json(Value::Object(_) | Value::Array(_)) => ContentExt::Json,
        Body::Json(_) | Body::Empty => ContentExt::Text,
    }
}

fn sniff_text(text: &str) -> ContentExt {
    let trimmed = text.trim();
    if trimmed.starts_with("<!") || trimmed.starts_with("<html") {
        ContentExt::Html
    } else if trimmed.starts_with('{') || trimmed.starts_with('[') {
        ContentExt::Json
    } else {
        ContentExt::Text
    }
}

/// Formats a byte count as `B`, `KB` (one decimal), or `MB` (two decimals).
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    if bytes < KIB {
        format!("{bytes}B")
    } else if bytes < MIB {
        format!("{:.1}KB", bytes as f64 / KIB as f64)
    } else {
        format!("{:.2}MB", bytes as f64 / MIB as f64)
    }
}

/// Size of a body for console summaries.
///
/// Zero for falsy bodies, byte length for strings, serialized length for
/// structured values.
#[must_use]
pub fn data_size(body: &Body) -> usize {
    if body.is_falsy() {
        return 0;
    }
    match body {
        Body::Empty => 0,
        Body::Text(text) | Body::Json(Value::String(text)) => text.len(),
        Body::Json(value) => serialized_size(value),
    }
}

/// Length of the JSON serialization of `value`, or 0 if serialization fails.
#[must_use]
pub fn serialized_size<T: Serialize + ?Sized>(value: &T) -> usize {
    serde_json::to_string(value).map_or(0, |json| json.len())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;

    use super::*;

    #[test]
    fn test_detect_ext_header_wins_over_sniffing() {
        let body = Body::from(r#"{"id":1}"#);
        assert_eq!(detect_ext(&body, Some("text/html")), ContentExt::Html);
        assert_eq!(
            detect_ext(&Body::from("<html></html>"), Some("application/json")),
            ContentExt::Json
        );
    }

    #[test]
    fn test_detect_ext_header_html_checked_before_json() {
        assert_eq!(
            detect_ext(&Body::Empty, Some("application/json+html")),
            ContentExt::Html
        );
    }

    #[test]
    fn test_detect_ext_header_is_case_insensitive() {
        assert_eq!(
            detect_ext(&Body::Empty, Some("Text/HTML; charset=UTF-8")),
            ContentExt::Html
        );
        assert_eq!(
            detect_ext(&Body::Empty, Some("Application/JSON")),
            ContentExt::Json
        );
    }

    #[test]
    fn test_detect_ext_sniffs_strings() {
        assert_eq!(
            detect_ext(&Body::from("  <!DOCTYPE html><p>"), None),
            ContentExt::Html
        );
        assert_eq!(detect_ext(&Body::from("<html>"), None), ContentExt::Html);
        assert_eq!(detect_ext(&Body::from("\n{\"a\":1}"), None), ContentExt::Json);
        assert_eq!(detect_ext(&Body::from("[1,2]"), None), ContentExt::Json);
        assert_eq!(detect_ext(&Body::from("plain words"), None), ContentExt::Text);
        assert_eq!(
            detect_ext(&Body::from("<div>fragment</div>"), Some("text/plain")),
            ContentExt::Text
        );
    }

    #[test]
    fn test_detect_ext_structured_and_primitive_values() {
        assert_eq!(detect_ext(&Body::Json(json!({"a": 1})), None), ContentExt::Json);
        assert_eq!(detect_ext(&Body::Json(json!([])), None), ContentExt::Json);
        assert_eq!(detect_ext(&Body::Json(json!(42)), None), ContentExt::Text);
        assert_eq!(detect_ext(&Body::Json(json!(true)), None), ContentExt::Text);
        assert_eq!(detect_ext(&Body::Json(Value::Null), None), ContentExt::Text);
        assert_eq!(detect_ext(&Body::Empty, None), ContentExt::Text);
        assert_eq!(
            detect_ext(&Body::Json(json!("<html>")), None),
            ContentExt::Html
        );
    }

    #[test]
    fn test_format_size_units() {
        assert_eq!(format_size(0), "0B");
        assert_eq!(format_size(1023), "1023B");
        assert_eq!(format_size(1024), "1.0KB");
        assert_eq!(format_size(1536), "1.5KB");
        assert_eq!(format_size(1_048_575), "1024.0KB");
        assert_eq!(format_size(1_048_576), "1.00MB");
        assert_eq!(format_size(5 * 1_048_576 + 524_288), "5.50MB");
    }

    #[test]
    fn test_data_size_by_body_shape() {
        assert_eq!(data_size(&Body::Empty), 0);
        assert_eq!(data_size(&Body::from("")), 0);
        assert_eq!(data_size(&Body::from("hello")), 5);
        assert_eq!(data_size(&Body::Json(json!({"a": 1}))), r#"{"a":1}"#.len());
        assert_eq!(data_size(&Body::Json(json!(0))), 0);
        assert_eq!(data_size(&Body::Json(json!(false))), 0);
        assert_eq!(data_size(&Body::Json(Value::Null)), 0);
        assert_eq!(data_size(&Body::Json(json!(12))), 2);
    }

    #[test]
    fn test_serialized_size_returns_zero_when_serialization_fails() {
        // JSON object keys must be strings; tuple keys make serde_json bail out.
        let mut unserializable = HashMap::new();
        unserializable.insert((1_u8, 2_u8), "value");
        assert_eq!(serialized_size(&unserializable), 0);
    }

    #[test]
    fn test_body_from_payload_decodes_declared_json() {
        assert_eq!(
            Body::from_payload(r#"{"ok":true}"#.to_string(), Some("application/json")),
            Body::Json(json!({"ok": true}))
        );
        assert_eq!(
            Body::from_payload("not json".to_string(), Some("application/json")),
            Body::Text("not json".to_string())
        );
        assert_eq!(
            Body::from_payload(r#"{"ok":true}"#.to_string(), Some("text/plain")),
            Body::Text(r#"{"ok":true}"#.to_string())
        );
        assert_eq!(Body::from_payload(String::new(), None), Body::Empty);
    }

    #[test]
    fn test_body_to_log_string() {
        assert_eq!(Body::Empty.to_log_string(), "");
        assert_eq!(Body::from("<p>raw</p>").to_log_string(), "<p>raw</p>");
        let pretty = Body::Json(json!({"a": 1})).to_log_string();
        assert_eq!(serde_json::from_str::<Value>(&pretty).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_body_serializes_untagged() {
        assert_eq!(serde_json::to_value(Body::Empty).unwrap(), Value::Null);
        assert_eq!(serde_json::to_value(Body::from("x")).unwrap(), json!("x"));
        assert_eq!(
            serde_json::to_value(Body::Json(json!([1]))).unwrap(),
            json!([1])
        );
    }
}

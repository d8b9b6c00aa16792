//! System-info snapshot: the static property table next to the charts.
//!
//! Unlike the metric series this is stateless: each successful fetch wholly
//! replaces the previous snapshot, and a failed fetch leaves the previous one
//! on screen.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Shown in place of a JSON null.
pub const NULL_MARKER: &str = "n/a";

/// One `/system_info` response, wire shape `{"system_info": {...}}`.
///
/// Property values stay as raw JSON; rendering policy lives in
/// [`render_value`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemInfoSnapshot {
    #[serde(rename = "system_info")]
    pub properties: BTreeMap<String, Value>,
}

impl SystemInfoSnapshot {
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// `(property, rendered value)` rows in key order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, String)> {
        self.properties
            .iter()
            .map(|(k, v)| (k.as_str(), render_value(v)))
    }
}

/// Render one property value for the table.
///
/// Nulls get a fixed marker, strings render bare (no quotes), structured
/// values pretty-print, and remaining scalars use their default display form.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Null => NULL_MARKER.to_string(),
        Value::String(s) => s.clone(),
        Value::Object(_) | Value::Array(_) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_shape_round_trips() {
        let snap =
            SystemInfoSnapshot::from_json(r#"{"system_info": {"a": null, "b": {"x": 1}, "c": 5}}"#)
                .unwrap();
        assert_eq!(snap.len(), 3);

        let rows: Vec<(&str, String)> = snap.rows().collect();
        assert_eq!(rows[0].0, "a");
        assert_eq!(rows[0].1, NULL_MARKER);
        assert!(rows[1].1.contains("x") && rows[1].1.contains('1'));
        assert_eq!(rows[2].1, "5");
    }

    #[test]
    fn missing_envelope_is_an_error() {
        assert!(SystemInfoSnapshot::from_json(r#"{"a": 1}"#).is_err());
        assert!(SystemInfoSnapshot::from_json("not json").is_err());
    }

    #[test]
    fn null_renders_as_marker() {
        assert_eq!(render_value(&Value::Null), NULL_MARKER);
    }

    #[test]
    fn strings_render_bare() {
        assert_eq!(render_value(&json!("llama-3-8b")), "llama-3-8b");
    }

    #[test]
    fn scalars_use_default_display() {
        assert_eq!(render_value(&json!(5)), "5");
        assert_eq!(render_value(&json!(2.5)), "2.5");
        assert_eq!(render_value(&json!(true)), "true");
    }

    #[test]
    fn structured_values_pretty_print() {
        let rendered = render_value(&json!({"x": 1}));
        assert!(rendered.contains('\n'), "expected multi-line, got {rendered}");
        assert!(rendered.contains("\"x\": 1"));

        let rendered = render_value(&json!([1, 2]));
        assert!(rendered.starts_with('['));
    }
}

//! `AnyValue` stringification and type detection.

use otx_core::enums::ValueType;
use otx_core::record::AnyValue;

/// Render a value the way it is shown in the display tree.
///
/// Scalars render raw, arrays as a JSON array of rendered elements, and
/// key/value lists as a JSON object with keys in insertion order.
#[must_use]
pub fn value_to_string(value: &AnyValue) -> String {
    match value {
        AnyValue::StringValue(s) | AnyValue::IntValue(s) | AnyValue::BytesValue(s) => s.clone(),
        AnyValue::DoubleValue(d) => d.to_string(),
        AnyValue::BoolValue(b) => b.to_string(),
        AnyValue::ArrayValue(array) => {
            let rendered: Vec<String> = array.values.iter().map(value_to_string).collect();
            serde_json::Value::from(rendered).to_string()
        }
        AnyValue::KvlistValue(list) => {
            // Later duplicates overwrite the value but keep the first position.
            let mut entries: Vec<(&str, String)> = Vec::with_capacity(list.values.len());
            for kv in &list.values {
                let rendered = value_to_string(&kv.value);
                match entries.iter_mut().find(|(k, _)| *k == kv.key) {
                    Some(entry) => entry.1 = rendered,
                    None => entries.push((&kv.key, rendered)),
                }
            }
            let body: Vec<String> = entries
                .iter()
                .map(|(k, v)| {
                    format!(
                        "{}:{}",
                        serde_json::Value::from(*k),
                        serde_json::Value::from(v.as_str())
                    )
                })
                .collect();
            format!("{{{}}}", body.join(","))
        }
    }
}

#[must_use]
pub const fn detect_value_type(value: &AnyValue) -> ValueType {
    match value {
        AnyValue::StringValue(_) | AnyValue::BytesValue(_) => ValueType::String,
        AnyValue::IntValue(_) | AnyValue::DoubleValue(_) => ValueType::Number,
        AnyValue::BoolValue(_) => ValueType::Boolean,
        AnyValue::ArrayValue(_) => ValueType::Array,
        AnyValue::KvlistValue(_) => ValueType::Object,
    }
}

//! OTLP-shaped telemetry record.
//!
//! Mirrors the OTLP v1 JSON encoding of a single `ResourceSpans` element
//! (camelCase field names, externally tagged `AnyValue`). Pure data: the only
//! behavior here is locating an attribute collection by [`CollectionRef`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::path::CollectionRef;

/// One element of an OTLP `resourceSpans` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSpan {
    pub resource: Resource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_url: Option<String>,
    #[serde(default)]
    pub scope_spans: Vec<ScopeSpan>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    #[serde(default)]
    pub attributes: Vec<KeyValue>,
    #[serde(default)]
    pub dropped_attributes_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScopeSpan {
    pub scope: Scope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_url: Option<String>,
    #[serde(default)]
    pub spans: Vec<Span>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Scope {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub attributes: Vec<KeyValue>,
    #[serde(default)]
    pub dropped_attributes_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Span {
    pub trace_id: String,
    pub span_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_span_id: Option<String>,
    pub name: String,
    /// OTLP span kind (0 unspecified, 1 internal, 2 server, 3 client,
    /// 4 producer, 5 consumer).
    #[serde(default)]
    pub kind: i32,
    pub start_time_unix_nano: String,
    pub end_time_unix_nano: String,
    #[serde(default)]
    pub attributes: Vec<KeyValue>,
    #[serde(default)]
    pub dropped_attributes_count: u32,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub dropped_events_count: u32,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub dropped_links_count: u32,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub flags: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_state: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Status {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub time_unix_nano: String,
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<KeyValue>,
    #[serde(default)]
    pub dropped_attributes_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub trace_id: String,
    pub span_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_state: Option<String>,
    #[serde(default)]
    pub attributes: Vec<KeyValue>,
    #[serde(default)]
    pub dropped_attributes_count: u32,
}

/// A single `(key, typed value)` attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct KeyValue {
    pub key: String,
    pub value: AnyValue,
}

impl KeyValue {
    #[must_use]
    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: AnyValue::StringValue(value.into()),
        }
    }
}

/// OTLP `AnyValue`, encoded as a single-key object (`{"stringValue": "..."}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum AnyValue {
    StringValue(String),
    BoolValue(bool),
    /// 64-bit integers travel as decimal strings in OTLP JSON.
    IntValue(String),
    DoubleValue(f64),
    ArrayValue(ArrayValue),
    KvlistValue(KeyValueList),
    BytesValue(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ArrayValue {
    #[serde(default)]
    pub values: Vec<AnyValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct KeyValueList {
    #[serde(default)]
    pub values: Vec<KeyValue>,
}

impl ResourceSpan {
    /// Locate an attribute collection.
    ///
    /// A `ResourceSpan` is a single element of the `resourceSpans` array, so the
    /// collection's resource index is not consulted here.
    #[must_use]
    pub fn attributes(&self, collection: CollectionRef) -> Option<&Vec<KeyValue>> {
        match collection {
            CollectionRef::Resource { .. } => Some(&self.resource.attributes),
            CollectionRef::Scope { scope, .. } => {
                self.scope_spans.get(scope).map(|ss| &ss.scope.attributes)
            }
            CollectionRef::Span { scope, span, .. } => self
                .scope_spans
                .get(scope)
                .and_then(|ss| ss.spans.get(span))
                .map(|s| &s.attributes),
        }
    }

    /// Mutable counterpart of [`ResourceSpan::attributes`].
    pub fn attributes_mut(&mut self, collection: CollectionRef) -> Option<&mut Vec<KeyValue>> {
        match collection {
            CollectionRef::Resource { .. } => Some(&mut self.resource.attributes),
            CollectionRef::Scope { scope, .. } => self
                .scope_spans
                .get_mut(scope)
                .map(|ss| &mut ss.scope.attributes),
            CollectionRef::Span { scope, span, .. } => self
                .scope_spans
                .get_mut(scope)
                .and_then(|ss| ss.spans.get_mut(span))
                .map(|s| &mut s.attributes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn any_value_uses_otlp_json_shape() {
        let kv = KeyValue::string("service.name", "frontendproxy");
        let json = serde_json::to_value(&kv).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"key": "service.name", "value": {"stringValue": "frontendproxy"}})
        );

        let int: AnyValue = serde_json::from_str(r#"{"intValue":"42"}"#).unwrap();
        assert_eq!(int, AnyValue::IntValue("42".into()));

        let list: AnyValue =
            serde_json::from_str(r#"{"kvlistValue":{"values":[{"key":"a","value":{"boolValue":true}}]}}"#)
                .unwrap();
        assert_eq!(
            list,
            AnyValue::KvlistValue(KeyValueList {
                values: vec![KeyValue {
                    key: "a".into(),
                    value: AnyValue::BoolValue(true)
                }]
            })
        );
    }

    #[test]
    fn missing_scope_or_span_yields_none() {
        let record = ResourceSpan {
            resource: Resource::default(),
            schema_url: None,
            scope_spans: Vec::new(),
        };
        assert!(record.attributes(CollectionRef::Resource { resource: 0 }).is_some());
        assert!(
            record
                .attributes(CollectionRef::Span {
                    resource: 0,
                    scope: 0,
                    span: 0
                })
                .is_none()
        );
    }
}

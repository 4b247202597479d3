//! Bundled sample record.
//!
//! A single `ResourceSpans` element captured from the OpenTelemetry demo's
//! frontend proxy pod: 22 resource attributes, one anonymous scope, and one
//! `ingress` server span with 20 attributes. Used by tests across the
//! workspace and as the default record of a fresh session.

use crate::record::{KeyValue, Resource, ResourceSpan, Scope, ScopeSpan, Span, Status};

/// Schema URL carried by the sample record and its scope span.
pub const SAMPLE_SCHEMA_URL: &str = "https://opentelemetry.io/schemas/1.36.0";

const RESOURCE_ATTRIBUTES: [(&str, &str); 22] = [
    ("test.resource.id", "17955346340932591855"),
    (
        "test.resource.name",
        "opentelemetry-demo-frontendproxy-58b488b55d-g7c4t",
    ),
    ("test.resource.type", "k8s.pod"),
    ("app.kubernetes.io/component", "frontendproxy"),
    ("app.kubernetes.io/instance", "opentelemetry-demo"),
    ("app.kubernetes.io/name", "opentelemetry-demo-frontendproxy"),
    ("test.auth.token", "hxZyXot"),
    ("k8s.deployment.name", "opentelemetry-demo-frontendproxy"),
    ("k8s.deployment.uid", "79e597ce-4ece-45cc-8672-401819073dd5"),
    ("k8s.namespace.name", "otel-demo"),
    ("k8s.node.name", "ip-10-1-47-83.eu-west-1.compute.internal"),
    ("k8s.pod.ip", "10.1.47.177"),
    (
        "k8s.pod.name",
        "opentelemetry-demo-frontendproxy-58b488b55d-g7c4t",
    ),
    ("k8s.pod.start_time", "2025-08-29T02:18:34Z"),
    ("k8s.pod.uid", "653ac4b8-40f5-4776-b5fe-9047e53daf09"),
    (
        "k8s.replicaset.name",
        "opentelemetry-demo-frontendproxy-58b488b55d",
    ),
    ("k8s.replicaset.uid", "35fd8bf2-07d2-4282-8409-30239b3e021d"),
    ("kubectl.kubernetes.io/restartedAt", "2025-08-29T12:18:33+10:00"),
    ("opentelemetry.io/name", "opentelemetry-demo-frontendproxy"),
    ("pod-template-hash", "58b488b55d"),
    ("service.name", "frontendproxy"),
    ("service.namespace", "opentelemetry-demo"),
];

const SPAN_ATTRIBUTES: [(&str, &str); 20] = [
    ("component", "proxy"),
    ("test.operation.name", "GET /ping"),
    ("test.operation.ruleId", "http with url"),
    ("test.operation.type", "http"),
    ("test.span.type", "http"),
    ("downstream_cluster", "-"),
    ("guid:x-request-id", "17f5e324-a633-9a19-a06f-a7b8e08fb1a4"),
    ("http.protocol", "HTTP/1.1"),
    ("http.request.method", "GET"),
    ("http.response.status_code", "404"),
    ("node_id", ""),
    ("peer.address", "10.1.217.83"),
    ("request_size", "0"),
    ("response_flags", "-"),
    ("response_size", "4144"),
    ("upstream_cluster", "frontend"),
    ("upstream_cluster.name", "frontend"),
    ("url.full", "http://10.1.217.83:443/ping"),
    ("user_agent", "ELB-HealthChecker/2.0"),
    ("zone", ""),
];

fn string_attributes(pairs: &[(&str, &str)]) -> Vec<KeyValue> {
    pairs.iter().map(|(k, v)| KeyValue::string(*k, *v)).collect()
}

/// The frontend proxy resource span.
#[must_use]
pub fn sample_resource_span() -> ResourceSpan {
    ResourceSpan {
        resource: Resource {
            attributes: string_attributes(&RESOURCE_ATTRIBUTES),
            dropped_attributes_count: 0,
        },
        schema_url: Some(SAMPLE_SCHEMA_URL.to_string()),
        scope_spans: vec![ScopeSpan {
            scope: Scope::default(),
            schema_url: Some(SAMPLE_SCHEMA_URL.to_string()),
            spans: vec![Span {
                trace_id: "7Wix1az2dfew4KtQKYRLFg==".to_string(),
                span_id: "7HNRdwr51gU=".to_string(),
                parent_span_id: Some(String::new()),
                name: "ingress".to_string(),
                kind: 2,
                start_time_unix_nano: "1758885889803164000".to_string(),
                end_time_unix_nano: "1758885889809946000".to_string(),
                attributes: string_attributes(&SPAN_ATTRIBUTES),
                dropped_attributes_count: 0,
                events: Vec::new(),
                dropped_events_count: 0,
                links: Vec::new(),
                dropped_links_count: 0,
                status: Status::default(),
                flags: 0,
                trace_state: Some(String::new()),
            }],
        }],
    }
}

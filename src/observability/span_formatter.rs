//! Compact JSON rendering of finished spans.
//!
//! One span becomes one flat JSON object, which keeps the trace file greppable and
//! easy to load line by line:
//!
//! ```json
//! {"service":"service-finder","trace_id":"…","span_id":"…","parent_span_id":"…",
//!  "name":"http_request","start_unix_nano":"…","duration_us":1234,
//!  "attributes":{"method":"GET","url":"…"},"events":[…],"status":"unset"}
//! ```

use opentelemetry::trace::{SpanId, Status};
use opentelemetry::{KeyValue, Value};
use opentelemetry_sdk::export::trace::SpanData;
use serde_json::{json, Map, Value as JsonValue};
use std::time::{Duration, SystemTime};

/// Renders spans for one service.
#[derive(Debug, Clone)]
pub struct SpanFormatter {
    service_name: String,
}

impl SpanFormatter {
    #[must_use]
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }

    #[must_use]
    pub fn format_span(&self, span: &SpanData) -> JsonValue {
        let parent_span_id = if span.parent_span_id == SpanId::INVALID {
            JsonValue::Null
        } else {
            JsonValue::String(format!("{:016x}", span.parent_span_id))
        };

        let duration_us = span
            .end_time
            .duration_since(span.start_time)
            .unwrap_or_default()
            .as_micros();

        let events: Vec<JsonValue> = span
            .events
            .iter()
            .map(|event| {
                json!({
                    "name": event.name,
                    "unix_nano": unix_nanos(event.timestamp),
                    "attributes": attributes(&event.attributes),
                })
            })
            .collect();

        json!({
            "service": self.service_name,
            "trace_id": format!("{:032x}", span.span_context.trace_id()),
            "span_id": format!("{:016x}", span.span_context.span_id()),
            "parent_span_id": parent_span_id,
            "name": span.name,
            "start_unix_nano": unix_nanos(span.start_time),
            "duration_us": u64::try_from(duration_us).unwrap_or(u64::MAX),
            "attributes": attributes(&span.attributes),
            "events": events,
            "status": status(&span.status),
        })
    }
}

fn unix_nanos(time: SystemTime) -> String {
    time.duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_nanos()
        .to_string()
}

fn attributes(attributes: &[KeyValue]) -> JsonValue {
    let map: Map<String, JsonValue> = attributes
        .iter()
        .map(|kv| (kv.key.to_string(), value(&kv.value)))
        .collect();
    JsonValue::Object(map)
}

fn value(value: &Value) -> JsonValue {
    match value {
        Value::Bool(b) => json!(b),
        Value::I64(i) => json!(i),
        Value::F64(f) => json!(f),
        Value::String(s) => json!(s.to_string()),
        Value::Array(_) => json!(value.to_string()),
    }
}

fn status(status: &Status) -> JsonValue {
    match status {
        Status::Unset => json!("unset"),
        Status::Ok => json!("ok"),
        Status::Error { description } => json!({ "error": description.to_string() }),
    }
}

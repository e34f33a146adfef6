//! Result normalizer: lifts the uniform envelope out of raw tool payloads.

use serde_json::Value;

/// Envelope fields extracted from one raw tool payload.
#[derive(Debug, Clone, Default)]
pub struct Envelope {
    pub message: Option<String>,
    pub ui_action: Option<Value>,
    pub navigation_target: Option<String>,
    pub data: Option<Value>,
}

/// Normalize a raw handler return value.
///
/// Structured objects get `message` / `uiAction` / `navigationTarget` lifted
/// out; `data` is the object's `data` field when present, otherwise the
/// whole object. Primitives and arrays pass through as `data` unchanged; a
/// JSON `null` normalizes to no data at all. Running the extracted `data`
/// through again yields the same `data`.
pub fn normalize(raw: Value) -> Envelope {
    match raw {
        Value::Object(mut obj) => {
            let message = match obj.get("message") {
                Some(Value::String(s)) => Some(s.clone()),
                _ => None,
            };
            let ui_action = obj.get("uiAction").cloned();
            let navigation_target = match obj.get("navigationTarget") {
                Some(Value::String(s)) => Some(s.clone()),
                _ => None,
            };

            let data = match obj.remove("data") {
                Some(Value::Null) => None,
                Some(inner) => Some(inner),
                None => Some(Value::Object(obj)),
            };

            Envelope {
                message,
                ui_action,
                navigation_target,
                data,
            }
        }
        Value::Null => Envelope::default(),
        other => Envelope {
            data: Some(other),
            ..Envelope::default()
        },
    }
}

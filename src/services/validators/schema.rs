use serde_json::Value;

use crate::services::validators::types::{Validators, Verdict};

/// Structural validator for provider payloads.
///
/// - item: a JSON object with a non-empty string `title`
/// - list: a JSON object with a `visualizations` array of items
///
/// Errors are reported as `<json pointer>: <reason>`.
#[derive(Clone, Debug, Default)]
pub struct SchemaValidators;

impl SchemaValidators {
    pub fn new() -> Self {
        Self
    }
}

fn check_item(value: &Value, pointer: &str, errors: &mut Vec<String>) {
    let Some(obj) = value.as_object() else {
        let at = if pointer.is_empty() { "/" } else { pointer };
        errors.push(format!("{at}: expected object"));
        return;
    };

    match obj.get("title") {
        Some(Value::String(s)) if !s.trim().is_empty() => {}
        Some(Value::String(_)) => errors.push(format!("{pointer}/title: must not be empty")),
        Some(_) => errors.push(format!("{pointer}/title: expected string")),
        None => errors.push(format!("{pointer}/title: is required")),
    }
}

impl Validators for SchemaValidators {
    fn list(&self, body: &Value) -> Verdict {
        let mut errors = Vec::new();

        let Some(obj) = body.as_object() else {
            return Verdict::invalid(vec!["/: expected object".to_string()]);
        };

        match obj.get("visualizations") {
            Some(Value::Array(items)) => {
                for (i, item) in items.iter().enumerate() {
                    check_item(item, &format!("/visualizations/{i}"), &mut errors);
                }
            }
            Some(_) => errors.push("/visualizations: expected array".to_string()),
            None => errors.push("/visualizations: is required".to_string()),
        }

        Verdict::from_errors(errors)
    }

    fn item(&self, body: &Value) -> Verdict {
        let mut errors = Vec::new();
        check_item(body, "", &mut errors);
        Verdict::from_errors(errors)
    }
}

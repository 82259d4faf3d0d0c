//! Structural schema validation
//!
//! Validates candidate marketplace manifests and registry entries before
//! anything touches disk persistently. Checks are structural only: field
//! presence, type, enum membership, the no-whitespace name pattern, and
//! RFC 3339 timestamp format. On failure every violated field is reported.

use serde_json::Value;

/// Validation outcome: pass, or a non-empty list of field-level messages
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    pub errors: Vec<String>,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate a candidate marketplace manifest
pub fn validate_manifest(candidate: &Value) -> ValidationOutcome {
    let mut errors = Vec::new();

    let Some(obj) = candidate.as_object() else {
        return ValidationOutcome {
            errors: vec!["manifest: must be an object".to_string()],
        };
    };

    check_name(obj.get("name"), "name", &mut errors);

    match obj.get("owner") {
        Some(Value::Object(owner)) => {
            if !matches!(owner.get("name"), Some(Value::String(s)) if !s.is_empty()) {
                errors.push("owner.name: required non-empty string".to_string());
            }
        }
        Some(_) => errors.push("owner: must be an object".to_string()),
        None => errors.push("owner: required field missing".to_string()),
    }

    if let Some(description) = obj.get("description") {
        if !description.is_string() && !description.is_null() {
            errors.push("description: must be a string".to_string());
        }
    }

    match obj.get("plugins") {
        None | Some(Value::Null) => {}
        Some(Value::Array(plugins)) => {
            for (i, plugin) in plugins.iter().enumerate() {
                validate_plugin_entry(plugin, i, &mut errors);
            }
        }
        Some(_) => errors.push("plugins: must be an array".to_string()),
    }

    ValidationOutcome { errors }
}

/// Validate one plugin declaration inside a manifest
fn validate_plugin_entry(candidate: &Value, index: usize, errors: &mut Vec<String>) {
    let Some(obj) = candidate.as_object() else {
        errors.push(format!("plugins[{index}]: must be an object"));
        return;
    };

    if !matches!(obj.get("name"), Some(Value::String(s)) if !s.is_empty()) {
        errors.push(format!("plugins[{index}].name: required non-empty string"));
    }
    if !matches!(obj.get("source"), Some(Value::String(s)) if !s.is_empty()) {
        errors.push(format!(
            "plugins[{index}].source: required non-empty string"
        ));
    }
}

/// Validate a candidate registry entry
pub fn validate_registry_entry(candidate: &Value) -> ValidationOutcome {
    let mut errors = Vec::new();

    let Some(obj) = candidate.as_object() else {
        return ValidationOutcome {
            errors: vec!["entry: must be an object".to_string()],
        };
    };

    match obj.get("source") {
        Some(Value::Object(source)) => {
            match source.get("kind") {
                Some(Value::String(kind)) if kind == "github" || kind == "directory" => {}
                Some(Value::String(kind)) => errors.push(format!(
                    "source.kind: '{kind}' is not one of github, directory"
                )),
                _ => errors.push("source.kind: required string".to_string()),
            }
            if !matches!(source.get("identifier"), Some(Value::String(s)) if !s.is_empty()) {
                errors.push("source.identifier: required non-empty string".to_string());
            }
        }
        Some(_) => errors.push("source: must be an object".to_string()),
        None => errors.push("source: required field missing".to_string()),
    }

    if !matches!(obj.get("installLocation"), Some(Value::String(s)) if !s.is_empty()) {
        errors.push("installLocation: required non-empty string".to_string());
    }

    match obj.get("lastUpdated") {
        Some(Value::String(ts)) => {
            if chrono::DateTime::parse_from_rfc3339(ts).is_err() {
                errors.push(format!("lastUpdated: '{ts}' is not an ISO-8601 timestamp"));
            }
        }
        _ => errors.push("lastUpdated: required string".to_string()),
    }

    ValidationOutcome { errors }
}

/// Marketplace/plugin name pattern: non-empty, no internal whitespace
fn check_name(value: Option<&Value>, field: &str, errors: &mut Vec<String>) {
    match value {
        Some(Value::String(name)) if name.is_empty() => {
            errors.push(format!("{field}: must not be empty"));
        }
        Some(Value::String(name)) if name.chars().any(char::is_whitespace) => {
            errors.push(format!("{field}: '{name}' must not contain whitespace"));
        }
        Some(Value::String(_)) => {}
        Some(_) => errors.push(format!("{field}: must be a string")),
        None => errors.push(format!("{field}: required field missing")),
    }
}

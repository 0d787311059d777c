//! Typed decoding of language-model replies.
//!
//! Both reply shapes are walked by hand so that every mismatch is reported
//! at once, instead of stopping at the first field serde trips over.

use crate::error::{ValidationError, ValidationIssue};
use crate::logw;
use serde_json::Value;

pub const VARIATION_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedPrompt {
    pub base_prompt: String,
    pub aspects: Vec<String>,
}

/// One entry of the `variations` reply; `text` is read from `variation`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variation {
    pub text: String,
    pub reasoning: String,
}

/// Parses the raw completion text as JSON, logging the body when it is not.
pub fn parse_reply(raw: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(raw).inspect_err(|err| {
        let snippet: String = raw.chars().take(800).collect();
        logw(format!("JSON parse error: {} (raw content: {})", err, snippet));
    })
}

#[derive(Default)]
struct Issues(Vec<ValidationIssue>);

impl Issues {
    fn push(&mut self, path: impl Into<String>, problem: impl Into<String>) {
        self.0.push(ValidationIssue {
            path: path.into(),
            problem: problem.into(),
        });
    }

    fn finish<T>(self, value: T) -> Result<T, ValidationError> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(ValidationError { issues: self.0 })
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn non_empty_string(value: Option<&Value>, path: &str, issues: &mut Issues) -> String {
    match value {
        None => {
            issues.push(path, "required field is missing");
            String::new()
        }
        Some(Value::String(s)) if s.is_empty() => {
            issues.push(path, "must be a non-empty string");
            String::new()
        }
        Some(Value::String(s)) => s.clone(),
        Some(other) => {
            issues.push(path, format!("expected string, got {}", kind_of(other)));
            String::new()
        }
    }
}

fn exact_array<'a>(value: Option<&'a Value>, path: &str, issues: &mut Issues) -> &'a [Value] {
    match value {
        None => {
            issues.push(path, "required field is missing");
            &[][..]
        }
        Some(Value::Array(items)) => {
            if items.len() != VARIATION_COUNT {
                issues.push(
                    path,
                    format!(
                        "expected exactly {} items, got {}",
                        VARIATION_COUNT,
                        items.len()
                    ),
                );
            }
            items.as_slice()
        }
        Some(other) => {
            issues.push(path, format!("expected array, got {}", kind_of(other)));
            &[][..]
        }
    }
}

/// Decodes `{ "basePrompt": string, "aspects": [string; 5] }`.
pub fn decode_expansion(value: &Value) -> Result<ExpandedPrompt, ValidationError> {
    let mut issues = Issues::default();
    let Some(root) = value.as_object() else {
        issues.push("/", format!("expected object, got {}", kind_of(value)));
        return issues.finish(ExpandedPrompt {
            base_prompt: String::new(),
            aspects: Vec::new(),
        });
    };

    let base_prompt = non_empty_string(root.get("basePrompt"), "/basePrompt", &mut issues);
    let aspects = exact_array(root.get("aspects"), "/aspects", &mut issues)
        .iter()
        .enumerate()
        .map(|(idx, item)| non_empty_string(Some(item), &format!("/aspects/{idx}"), &mut issues))
        .collect();

    issues.finish(ExpandedPrompt {
        base_prompt,
        aspects,
    })
}

/// Decodes `{ "variations": [{ "variation": string, "reasoning": string }; 5] }`.
pub fn decode_variations(value: &Value) -> Result<Vec<Variation>, ValidationError> {
    let mut issues = Issues::default();
    let Some(root) = value.as_object() else {
        issues.push("/", format!("expected object, got {}", kind_of(value)));
        return issues.finish(Vec::new());
    };

    let mut variations = Vec::with_capacity(VARIATION_COUNT);
    for (idx, item) in exact_array(root.get("variations"), "/variations", &mut issues)
        .iter()
        .enumerate()
    {
        let path = format!("/variations/{idx}");
        let Some(entry) = item.as_object() else {
            issues.push(path, format!("expected object, got {}", kind_of(item)));
            continue;
        };
        let text = non_empty_string(entry.get("variation"), &format!("{path}/variation"), &mut issues);
        let reasoning =
            non_empty_string(entry.get("reasoning"), &format!("{path}/reasoning"), &mut issues);
        variations.push(Variation { text, reasoning });
    }

    issues.finish(variations)
}

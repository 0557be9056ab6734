//! Helpers for emitting JavaScript source fragments.

use serde_json::Value;

/// Scope through which visibility conditions read answers (template bindings).
pub const TEMPLATE_ANSWERS: &str = "answers";

/// Scope through which component getters (rules, controls) read answers.
pub const COMPONENT_ANSWERS: &str = "this.answers";

/// Quote a string as a JavaScript string literal.
pub(crate) fn string(value: &str) -> String {
    Value::String(value.to_string()).to_string()
}

/// Format a list of strings as a JavaScript array literal.
pub(crate) fn string_array(values: &[String]) -> String {
    Value::Array(values.iter().cloned().map(Value::String).collect()).to_string()
}

/// `scope["question_id"]`
pub(crate) fn answer(scope: &str, question_id: &str) -> String {
    format!("{scope}[{}]", string(question_id))
}

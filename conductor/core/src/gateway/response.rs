//! Prompt construction and answer parsing shared by all gateways

use serde_json::{Map, Value};

use super::traits::{CalculationResult, RemoteFailure};

/// Wrap a user prompt in the calculator instruction template
#[must_use]
pub fn build_prompt(input: &str) -> String {
    format!(
        "Calculate or solve the following math problem: \"{input}\".\n\
         If it is a simple calculation, provide the number.\n\
         If it is a word problem, solve it.\n\
         Provide a brief, one-sentence explanation for the result."
    )
}

/// Parse the model's text into a [`CalculationResult`].
///
/// The text must be a JSON object with string fields `result` and
/// `explanation`. A surrounding markdown code fence is tolerated since some
/// models add one even when asked for raw JSON.
pub fn parse_calculation(text: &str) -> Result<CalculationResult, RemoteFailure> {
    let body = strip_code_fence(text.trim());
    if body.is_empty() {
        return Err(RemoteFailure::EmptyResponse);
    }

    let value: Value = serde_json::from_str(body)
        .map_err(|e| RemoteFailure::MalformedResponse(e.to_string()))?;
    let object = value
        .as_object()
        .ok_or_else(|| RemoteFailure::MalformedResponse("expected a JSON object".to_string()))?;

    Ok(CalculationResult {
        result: required_string(object, "result")?,
        explanation: required_string(object, "explanation")?,
    })
}

fn required_string(object: &Map<String, Value>, field: &'static str) -> Result<String, RemoteFailure> {
    match object.get(field) {
        None | Some(Value::Null) => Err(RemoteFailure::MissingField(field)),
        Some(Value::String(text)) => Ok(text.clone()),
        Some(other) => Err(RemoteFailure::MalformedResponse(format!(
            "field `{field}` should be a string, got {other}"
        ))),
    }
}

/// Remove a leading ```` ``` ```` / ```` ```json ```` line and the closing fence
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => return "",
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

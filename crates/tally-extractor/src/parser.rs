//! Parse model replies into transaction candidates

use crate::error::ExtractorError;
use serde_json::{Map, Value};
use tally_domain::{TransactionCandidate, UNKNOWN_SOURCE};
use tracing::warn;

/// Parse a model reply into transaction candidates
///
/// The reply is fence-stripped first. It must then be a JSON array; anything else is
/// an error. Array elements that are not well-formed transactions are skipped with a
/// warning and the rest are kept.
pub fn parse_reply(reply: &str) -> Result<Vec<TransactionCandidate>, ExtractorError> {
    let json_str = strip_code_fences(reply);

    let json: Value = serde_json::from_str(&json_str)?;

    let elements = json
        .as_array()
        .ok_or_else(|| ExtractorError::InvalidFormat(format!("Expected JSON array, got {}", kind_of(&json))))?;

    let mut candidates = Vec::with_capacity(elements.len());
    for (idx, element) in elements.iter().enumerate() {
        match parse_candidate(element) {
            Ok(candidate) => candidates.push(candidate),
            Err(e) => warn!("Skipping transaction {}: {}", idx, e),
        }
    }

    Ok(candidates)
}

/// Remove markdown code fences and surrounding whitespace
///
/// Every "```json" and "```" marker is removed wherever it appears, so nested or
/// repeated fences collapse to the same payload. Applying this twice is a no-op.
///
/// # Examples
///
/// ```
/// use tally_extractor::strip_code_fences;
///
/// assert_eq!(strip_code_fences("```json\n[1]\n```"), "[1]");
/// assert_eq!(strip_code_fences("  [1]  "), "[1]");
/// ```
pub fn strip_code_fences(reply: &str) -> String {
    reply
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

fn parse_candidate(json: &Value) -> Result<TransactionCandidate, String> {
    let obj = json
        .as_object()
        .ok_or_else(|| format!("not a JSON object ({})", kind_of(json)))?;

    let source = match obj.get("source") {
        None | Some(Value::Null) => UNKNOWN_SOURCE.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => return Err(format!("'source' is {}, expected string", kind_of(other))),
    };

    Ok(TransactionCandidate {
        date_time: required_str(obj, "date_time")?,
        vendor: required_str(obj, "vendor")?,
        amount: required_amount(obj)?,
        kind: required_str(obj, "type")?,
        category: required_str(obj, "category")?,
        source,
    })
}

fn required_str(obj: &Map<String, Value>, field: &str) -> Result<String, String> {
    match obj.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(format!("'{}' is {}, expected string", field, kind_of(other))),
        None => Err(format!("missing '{}'", field)),
    }
}

/// Numbers are taken as-is; numeric strings such as "1,250.00" are accepted too
fn required_amount(obj: &Map<String, Value>) -> Result<f64, String> {
    let amount = match obj.get("amount") {
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| format!("'amount' {} is not representable", n))?,
        Some(Value::String(s)) => {
            let cleaned: String = s.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
            cleaned
                .parse::<f64>()
                .map_err(|_| format!("'amount' \"{}\" is not a number", s))?
        }
        Some(other) => return Err(format!("'amount' is {}, expected number", kind_of(other))),
        None => return Err("missing 'amount'".to_string()),
    };

    if !amount.is_finite() {
        return Err(format!("'amount' {} is not finite", amount));
    }
    Ok(amount)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

use regex::Regex;
use serde_json::Value;

/// Returns the first pattern match in a string value
///
/// The first capture group when the pattern has one, the whole match
/// otherwise. Non-string input, an invalid pattern or an empty match all
/// yield an absent value.
pub fn apply(value: &Value, pattern: &str) -> Option<Value> {
    let haystack = value.as_str()?;
    let re = Regex::new(pattern).ok()?;

    let captures = re.captures(haystack)?;
    let matched = if captures.len() > 1 {
        captures.get(1)?
    } else {
        captures.get(0)?
    };

    Some(matched.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| Value::String(s.to_string()))
}

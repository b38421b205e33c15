use serde_json::Value;

/// Returns the array element at the given position
///
/// Negative indices count from the end. Non-array input, an unparseable
/// index or one out of range all yield an absent value.
pub fn apply(value: &Value, index: &str) -> Option<Value> {
    let index: i64 = index.trim().parse().ok()?;
    let items = value.as_array()?;

    let index = if index < 0 {
        index.checked_add(items.len() as i64)?
    } else {
        index
    };

    items.get(usize::try_from(index).ok()?).cloned()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn picks_by_position() {
        let pair = json!(["59.95", "USD"]);
        assert_eq!(apply(&pair, "0"), Some(json!("59.95")));
        assert_eq!(apply(&pair, "1"), Some(json!("USD")));
    }

    #[test]
    fn negative_index_counts_from_the_end() {
        assert_eq!(apply(&json!(["a", "b", "c"]), "-1"), Some(json!("c")));
    }

    #[test]
    fn out_of_range_is_absent() {
        assert_eq!(apply(&json!(["a"]), "3"), None);
        assert_eq!(apply(&json!(["a"]), "-2"), None);
    }

    #[test]
    fn non_array_input_is_absent() {
        assert_eq!(apply(&json!("not a list"), "0"), None);
        assert_eq!(apply(&json!({"a": 1}), "0"), None);
    }

    #[test]
    fn unparseable_index_is_absent() {
        assert_eq!(apply(&json!(["a"]), "first"), None);
    }
}

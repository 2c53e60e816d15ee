use serde_json::Value;

/// Sum rubric points. Empty input is 0; a non-finite result degrades to 0.
pub fn sum(numbers: &[f64]) -> f64 {
    let total: f64 = numbers.iter().sum();
    if total.is_finite() {
        total
    } else {
        tracing::warn!(count = numbers.len(), "non-finite sum, reporting 0");
        0.0
    }
}

/// Tool entry point for `add_multiple_numbers`.
///
/// Accepts `{"numbers": [...]}`; numeric strings are accepted because models
/// sometimes quote them. Anything malformed yields 0 instead of an error.
pub fn add_multiple_numbers(input: &Value) -> f64 {
    let Some(items) = input.get("numbers").and_then(Value::as_array) else {
        tracing::warn!(%input, "add_multiple_numbers called without a numbers list");
        return 0.0;
    };

    let mut numbers = Vec::with_capacity(items.len());
    for item in items {
        let parsed = match item {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        match parsed {
            Some(n) => numbers.push(n),
            None => {
                tracing::warn!(%item, "add_multiple_numbers got a non-numeric value");
                return 0.0;
            }
        }
    }

    sum(&numbers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_sum_is_zero() {
        assert_eq!(sum(&[]), 0.0);
    }

    #[test]
    fn rubric_points_total_exactly() {
        let total = sum(&[0.5, 1.0, 0.5, 2.0, 1.0]);
        assert!((total - 5.0).abs() < 1e-9, "total={total}");
    }

    #[test]
    fn fractional_points_are_not_truncated() {
        assert_eq!(sum(&[1.0, 0.5]), 1.5);
    }

    #[test]
    fn overflow_degrades_to_zero() {
        assert_eq!(sum(&[f64::MAX, f64::MAX]), 0.0);
    }

    #[test]
    fn tool_accepts_numbers_and_numeric_strings() {
        assert_eq!(add_multiple_numbers(&json!({ "numbers": [1, 2, 0.5] })), 3.5);
        assert_eq!(add_multiple_numbers(&json!({ "numbers": ["1.5", 1] })), 2.5);
        assert_eq!(add_multiple_numbers(&json!({ "numbers": [] })), 0.0);
    }

    #[test]
    fn tool_degrades_malformed_input_to_zero() {
        assert_eq!(add_multiple_numbers(&json!({})), 0.0);
        assert_eq!(add_multiple_numbers(&json!({ "numbers": "1,2" })), 0.0);
        assert_eq!(add_multiple_numbers(&json!({ "numbers": [1, "two"] })), 0.0);
        assert_eq!(add_multiple_numbers(&json!({ "numbers": [1, null] })), 0.0);
    }
}

use std::collections::BTreeMap;

/// Variable name → value mapping
///
/// Ordered so that generated cases and their descriptions are deterministic.
pub type Assignment = BTreeMap<String, f64>;

/// Normalise a computed value before surfacing it (`-0` becomes `0`,
/// non-finite results become `0`)
pub fn normalize(value: f64) -> f64 {
    if value == 0.0 || !value.is_finite() {
        0.0
    } else {
        value
    }
}

/// Render a number the way rule documents write it: integer-valued floats
/// without a fractional part
pub fn format_number(value: f64) -> String {
    let value = normalize(value);
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Boolean coercion used by conditions
pub fn truthy(value: f64) -> bool {
    value != 0.0
}

/// Boolean to `1.0` / `0.0`
pub fn from_bool(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// Render `k=v` pairs, skipping any key rejected by `keep`, at most `limit`
pub fn describe_pairs<F>(assignment: &Assignment, limit: usize, keep: F) -> Vec<String>
where
    F: Fn(&str, f64) -> bool,
{
    assignment
        .iter()
        .filter(|(k, v)| keep(k, **v))
        .take(limit)
        .map(|(k, v)| format!("{}={}", k, format_number(*v)))
        .collect()
}

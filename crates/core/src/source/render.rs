//! Per-rank value rendering shared by both adapters.

use serde_json::Number;

/// Render per-rank values as display text.
///
/// Identical values collapse to `"<value> all ranks"`; anything else is
/// joined with `" / "`. Returns `None` when there are no values.
pub fn render_ranks(values: &[Number]) -> Option<String> {
    let first = values.first()?;
    if values.iter().all(|value| same_value(value, first)) {
        return Some(format!("{first} all ranks"));
    }

    Some(
        values
            .iter()
            .map(Number::to_string)
            .collect::<Vec<_>>()
            .join(" / "),
    )
}

fn same_value(a: &Number, b: &Number) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(values: serde_json::Value) -> Vec<Number> {
        serde_json::from_value(values).expect("numeric fixture")
    }

    #[test]
    fn equal_ranks_collapse() {
        let values = numbers(serde_json::json!([60, 60, 60, 60, 60]));
        assert_eq!(render_ranks(&values).as_deref(), Some("60 all ranks"));
    }

    #[test]
    fn distinct_ranks_are_joined() {
        let values = numbers(serde_json::json!([80, 75, 70, 65, 60]));
        assert_eq!(
            render_ranks(&values).as_deref(),
            Some("80 / 75 / 70 / 65 / 60")
        );
    }

    #[test]
    fn fractional_values_keep_their_form() {
        let values = numbers(serde_json::json!([0.5, 0.25]));
        assert_eq!(render_ranks(&values).as_deref(), Some("0.5 / 0.25"));
        assert_eq!(render_ranks(&[]), None);
    }
}

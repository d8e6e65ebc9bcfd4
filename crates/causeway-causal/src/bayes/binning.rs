//! Fit-time discretization of numeric columns into four equal-width
//! bins labeled low/medium/high/very_high.
//!
//! Equal-width binning is a deliberate simplification carried over from
//! the reference pipeline; substituting quantile bins changes every
//! downstream inference result and must be treated as a model change.

use causeway_core::constants::GENERIC_BUCKETS;
use causeway_core::dataset::Column;

/// Discretize a column into categorical labels. Categorical columns
/// pass through lowercased; numeric columns get equal-width bins.
pub fn discretize_column(column: &Column) -> Vec<String> {
    match column {
        Column::Categorical(values) => values.iter().map(|v| v.to_lowercase()).collect(),
        Column::Numeric(values) => equal_width_bins(values),
    }
}

fn equal_width_bins(values: &[f64]) -> Vec<String> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = (max - min) / GENERIC_BUCKETS.len() as f64;

    values
        .iter()
        .map(|&v| {
            // Degenerate (constant or empty) columns collapse to one bin.
            if width <= 0.0 || !width.is_finite() {
                return GENERIC_BUCKETS[0].to_string();
            }
            let bin = ((v - min) / width) as usize;
            GENERIC_BUCKETS[bin.min(GENERIC_BUCKETS.len() - 1)].to_string()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_equal_width_bins() {
        let labels = equal_width_bins(&[0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(labels, vec!["low", "medium", "high", "very_high", "very_high"]);
    }

    #[test]
    fn constant_column_collapses() {
        let labels = equal_width_bins(&[5.0, 5.0, 5.0]);
        assert!(labels.iter().all(|l| l == "low"));
    }

    #[test]
    fn categorical_passthrough_lowercases() {
        let col = Column::Categorical(vec!["Air".to_string(), "OCEAN".to_string()]);
        assert_eq!(discretize_column(&col), vec!["air", "ocean"]);
    }
}

//! Conditional probability tables. One row per parent-state
//! combination; every row must sum to 1.

use causeway_core::errors::{CausalError, CausewayResult};

/// Tolerance for row-stochastic validation.
pub const ROW_SUM_TOLERANCE: f64 = 1e-6;

/// P(variable = state | parent combination) for one variable.
#[derive(Debug, Clone)]
pub struct Cpd {
    pub variable: String,
    /// Ordered states of the variable.
    pub states: Vec<String>,
    /// Ordered parent names. Empty for root variables.
    pub parents: Vec<String>,
    /// Cardinality of each parent, aligned with `parents`.
    pub parent_cards: Vec<usize>,
    /// `values[combo][state]`; `combo` indexes parent states in
    /// mixed radix with the last parent varying fastest.
    pub values: Vec<Vec<f64>>,
}

impl Cpd {
    /// Unconditional uniform distribution: flat 1/|domain|.
    pub fn uniform(variable: &str, states: &[String]) -> Self {
        let card = states.len().max(1);
        Self {
            variable: variable.to_string(),
            states: states.to_vec(),
            parents: Vec::new(),
            parent_cards: Vec::new(),
            values: vec![vec![1.0 / card as f64; card]],
        }
    }

    /// Uniform distribution conditioned on every parent combination.
    pub fn uniform_with_parents(
        variable: &str,
        states: &[String],
        parents: &[String],
        parent_cards: &[usize],
    ) -> Self {
        let card = states.len().max(1);
        let combos: usize = parent_cards.iter().product::<usize>().max(1);
        Self {
            variable: variable.to_string(),
            states: states.to_vec(),
            parents: parents.to_vec(),
            parent_cards: parent_cards.to_vec(),
            values: vec![vec![1.0 / card as f64; card]; combos],
        }
    }

    /// Number of parent-state combinations (1 for roots).
    pub fn combo_count(&self) -> usize {
        self.parent_cards.iter().product::<usize>().max(1)
    }

    /// Mixed-radix index of a parent-state assignment.
    pub fn combo_index(&self, parent_states: &[usize]) -> usize {
        let mut idx = 0;
        for (state, card) in parent_states.iter().zip(&self.parent_cards) {
            idx = idx * card + state;
        }
        idx
    }

    /// Check shape and row-stochasticity.
    pub fn validate(&self) -> CausewayResult<()> {
        if self.states.is_empty() {
            return Err(CausalError::InvalidCpd {
                variable: self.variable.clone(),
                reason: "empty state space".to_string(),
            }
            .into());
        }
        if self.values.len() != self.combo_count() {
            return Err(CausalError::InvalidCpd {
                variable: self.variable.clone(),
                reason: format!(
                    "expected {} rows, found {}",
                    self.combo_count(),
                    self.values.len()
                ),
            }
            .into());
        }
        for (i, row) in self.values.iter().enumerate() {
            if row.len() != self.states.len() {
                return Err(CausalError::InvalidCpd {
                    variable: self.variable.clone(),
                    reason: format!("row {i} has {} entries", row.len()),
                }
                .into());
            }
            let sum: f64 = row.iter().sum();
            if (sum - 1.0).abs() > ROW_SUM_TOLERANCE {
                return Err(CausalError::InvalidCpd {
                    variable: self.variable.clone(),
                    reason: format!("row {i} sums to {sum}"),
                }
                .into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn states(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn uniform_rows_sum_to_one() {
        let cpd = Cpd::uniform("x", &states(&["a", "b", "c"]));
        cpd.validate().unwrap();
        assert_eq!(cpd.values.len(), 1);

        let cond = Cpd::uniform_with_parents(
            "y",
            &states(&["a", "b"]),
            &states(&["p", "q"]),
            &[3, 4],
        );
        cond.validate().unwrap();
        assert_eq!(cond.values.len(), 12);
    }

    #[test]
    fn combo_index_is_mixed_radix() {
        let cpd = Cpd::uniform_with_parents(
            "y",
            &states(&["a", "b"]),
            &states(&["p", "q"]),
            &[3, 4],
        );
        assert_eq!(cpd.combo_index(&[0, 0]), 0);
        assert_eq!(cpd.combo_index(&[0, 3]), 3);
        assert_eq!(cpd.combo_index(&[1, 0]), 4);
        assert_eq!(cpd.combo_index(&[2, 3]), 11);
    }

    #[test]
    fn validate_rejects_bad_rows() {
        let mut cpd = Cpd::uniform("x", &states(&["a", "b"]));
        cpd.values[0] = vec![0.9, 0.9];
        assert!(cpd.validate().is_err());
    }
}

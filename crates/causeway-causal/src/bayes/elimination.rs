//! Exact inference by sum-product variable elimination over discrete
//! factors. Small networks only; factor sizes are kept down by a greedy
//! min-width elimination order.

use std::collections::HashMap;

use causeway_core::errors::{CausalError, CausewayResult};

use super::cpd::Cpd;

/// A discrete factor over an ordered set of variables. Values are
/// row-major with the last variable varying fastest.
#[derive(Debug, Clone)]
pub struct Factor {
    pub vars: Vec<String>,
    pub cards: Vec<usize>,
    pub values: Vec<f64>,
}

impl Factor {
    /// Build a factor from a CPD: variables are the parents followed by
    /// the child, matching the CPD's combo-major value layout.
    pub fn from_cpd(cpd: &Cpd) -> Self {
        let mut vars = cpd.parents.clone();
        vars.push(cpd.variable.clone());
        let mut cards = cpd.parent_cards.clone();
        cards.push(cpd.states.len());
        let values = cpd.values.iter().flatten().copied().collect();
        Self { vars, cards, values }
    }

    fn size(&self) -> usize {
        self.cards.iter().product::<usize>().max(1)
    }

    /// Decode a flat index into per-variable state indices.
    fn decode(&self, mut index: usize, out: &mut Vec<usize>) {
        out.clear();
        out.resize(self.cards.len(), 0);
        for i in (0..self.cards.len()).rev() {
            out[i] = index % self.cards[i];
            index /= self.cards[i];
        }
    }

    /// Flat index of an assignment given per-variable state indices.
    fn encode(cards: &[usize], states: &[usize]) -> usize {
        let mut idx = 0;
        for (s, c) in states.iter().zip(cards) {
            idx = idx * c + s;
        }
        idx
    }

    /// Fix one variable to a state, dropping it from the factor.
    pub fn reduce(&self, var: &str, state: usize) -> Factor {
        let Some(pos) = self.vars.iter().position(|v| v == var) else {
            return self.clone();
        };
        let new_vars: Vec<String> = self
            .vars
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != pos)
            .map(|(_, v)| v.clone())
            .collect();
        let new_cards: Vec<usize> = self
            .cards
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != pos)
            .map(|(_, c)| *c)
            .collect();

        let new_size: usize = new_cards.iter().product::<usize>().max(1);
        let mut values = vec![0.0; new_size];
        let mut assign = Vec::new();
        for flat in 0..self.size() {
            self.decode(flat, &mut assign);
            if assign[pos] != state {
                continue;
            }
            let mut reduced = assign.clone();
            reduced.remove(pos);
            values[Self::encode(&new_cards, &reduced)] = self.values[flat];
        }
        Factor {
            vars: new_vars,
            cards: new_cards,
            values,
        }
    }

    /// Pointwise product of two factors over the union of their variables.
    pub fn multiply(&self, other: &Factor) -> Factor {
        let mut vars = self.vars.clone();
        let mut cards = self.cards.clone();
        for (v, c) in other.vars.iter().zip(&other.cards) {
            if !vars.contains(v) {
                vars.push(v.clone());
                cards.push(*c);
            }
        }

        let self_pos: Vec<usize> = self
            .vars
            .iter()
            .map(|v| vars.iter().position(|u| u == v).unwrap())
            .collect();
        let other_pos: Vec<usize> = other
            .vars
            .iter()
            .map(|v| vars.iter().position(|u| u == v).unwrap())
            .collect();

        let size: usize = cards.iter().product::<usize>().max(1);
        let mut values = vec![0.0; size];
        let mut assign = vec![0usize; cards.len()];
        for (flat, value) in values.iter_mut().enumerate() {
            let mut rest = flat;
            for i in (0..cards.len()).rev() {
                assign[i] = rest % cards[i];
                rest /= cards[i];
            }
            let a: Vec<usize> = self_pos.iter().map(|&p| assign[p]).collect();
            let b: Vec<usize> = other_pos.iter().map(|&p| assign[p]).collect();
            *value = self.values[Self::encode(&self.cards, &a)]
                * other.values[Self::encode(&other.cards, &b)];
        }
        Factor { vars, cards, values }
    }

    /// Sum a variable out of the factor.
    pub fn marginalize(&self, var: &str) -> Factor {
        let Some(pos) = self.vars.iter().position(|v| v == var) else {
            return self.clone();
        };
        let new_vars: Vec<String> = self
            .vars
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != pos)
            .map(|(_, v)| v.clone())
            .collect();
        let new_cards: Vec<usize> = self
            .cards
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != pos)
            .map(|(_, c)| *c)
            .collect();

        let new_size: usize = new_cards.iter().product::<usize>().max(1);
        let mut values = vec![0.0; new_size];
        let mut assign = Vec::new();
        for flat in 0..self.size() {
            self.decode(flat, &mut assign);
            let mut reduced = assign.clone();
            reduced.remove(pos);
            values[Self::encode(&new_cards, &reduced)] += self.values[flat];
        }
        Factor {
            vars: new_vars,
            cards: new_cards,
            values,
        }
    }
}

/// Compute the posterior marginal P(target | evidence) over the given
/// CPDs. Evidence maps variable names to state indices; variables not
/// present in any factor are ignored by construction.
pub fn query(
    cpds: &HashMap<String, Cpd>,
    target: &str,
    evidence: &HashMap<String, usize>,
) -> CausewayResult<Vec<f64>> {
    let target_cpd = cpds.get(target).ok_or_else(|| CausalError::UnknownVariable {
        name: target.to_string(),
    })?;
    let target_card = target_cpd.states.len();

    // Degenerate case: the target itself is observed.
    if let Some(&state) = evidence.get(target) {
        let mut dist = vec![0.0; target_card];
        if state < target_card {
            dist[state] = 1.0;
        }
        return Ok(dist);
    }

    // Build factors and apply evidence by reduction.
    let mut factors: Vec<Factor> = Vec::with_capacity(cpds.len());
    for cpd in cpds.values() {
        let mut factor = Factor::from_cpd(cpd);
        for (var, &state) in evidence {
            factor = factor.reduce(var, state);
        }
        factors.push(factor);
    }

    // Hidden variables: everything still mentioned except the target.
    let mut hidden: Vec<String> = Vec::new();
    for factor in &factors {
        for var in &factor.vars {
            if var != target && !hidden.contains(var) {
                hidden.push(var.clone());
            }
        }
    }

    // Greedy min-width elimination: repeatedly pick the hidden variable
    // whose elimination produces the smallest intermediate factor.
    while !hidden.is_empty() {
        let (pick, _) = hidden
            .iter()
            .enumerate()
            .map(|(i, var)| (i, elimination_width(&factors, var)))
            .min_by_key(|(_, width)| *width)
            .unwrap_or((0, 0));
        let var = hidden.swap_remove(pick);

        let (with_var, rest): (Vec<Factor>, Vec<Factor>) =
            factors.into_iter().partition(|f| f.vars.contains(&var));
        let product = with_var
            .into_iter()
            .reduce(|a, b| a.multiply(&b))
            .map(|f| f.marginalize(&var));
        factors = rest;
        if let Some(f) = product {
            factors.push(f);
        }
    }

    // Multiply what is left (all over the target or empty) and normalize.
    let joint = factors
        .into_iter()
        .reduce(|a, b| a.multiply(&b))
        .ok_or_else(|| CausalError::InferenceFailed {
            variable: target.to_string(),
            reason: "no factors remain".to_string(),
        })?;

    let mut dist = vec![0.0; target_card];
    if joint.vars.len() == 1 && joint.vars[0] == target {
        dist.copy_from_slice(&joint.values);
    } else if joint.vars.is_empty() {
        return Err(CausalError::InferenceFailed {
            variable: target.to_string(),
            reason: "target eliminated".to_string(),
        }
        .into());
    } else {
        // Stray variables should have been eliminated.
        return Err(CausalError::InferenceFailed {
            variable: target.to_string(),
            reason: format!("unexpected residual scope {:?}", joint.vars),
        }
        .into());
    }

    let total: f64 = dist.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return Err(CausalError::InferenceFailed {
            variable: target.to_string(),
            reason: "evidence has zero probability".to_string(),
        }
        .into());
    }
    for v in &mut dist {
        *v /= total;
    }
    Ok(dist)
}

/// Size of the factor produced by eliminating `var` right now.
fn elimination_width(factors: &[Factor], var: &str) -> usize {
    let mut vars: Vec<&str> = Vec::new();
    let mut width = 1usize;
    for factor in factors {
        if !factor.vars.iter().any(|v| v == var) {
            continue;
        }
        for (v, c) in factor.vars.iter().zip(&factor.cards) {
            if v != var && !vars.contains(&v.as_str()) {
                vars.push(v);
                width = width.saturating_mul(*c);
            }
        }
    }
    width
}

#[cfg(test)]
mod tests {
    use super::*;

    fn states(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    /// Two-node network A -> B with B a noisy copy of A.
    fn two_node() -> HashMap<String, Cpd> {
        let mut cpds = HashMap::new();
        cpds.insert(
            "a".to_string(),
            Cpd {
                variable: "a".to_string(),
                states: states(&["s0", "s1"]),
                parents: vec![],
                parent_cards: vec![],
                values: vec![vec![0.6, 0.4]],
            },
        );
        cpds.insert(
            "b".to_string(),
            Cpd {
                variable: "b".to_string(),
                states: states(&["s0", "s1"]),
                parents: states(&["a"]),
                parent_cards: vec![2],
                values: vec![vec![0.9, 0.1], vec![0.2, 0.8]],
            },
        );
        cpds
    }

    #[test]
    fn prior_marginal_matches_hand_computation() {
        let cpds = two_node();
        let dist = query(&cpds, "b", &HashMap::new()).unwrap();
        // P(b=s0) = 0.6*0.9 + 0.4*0.2 = 0.62
        assert!((dist[0] - 0.62).abs() < 1e-9);
        assert!((dist[1] - 0.38).abs() < 1e-9);
    }

    #[test]
    fn conditioning_on_parent() {
        let cpds = two_node();
        let evidence = HashMap::from([("a".to_string(), 1usize)]);
        let dist = query(&cpds, "b", &evidence).unwrap();
        assert!((dist[0] - 0.2).abs() < 1e-9);
        assert!((dist[1] - 0.8).abs() < 1e-9);
    }

    #[test]
    fn posterior_by_bayes_rule() {
        let cpds = two_node();
        let evidence = HashMap::from([("b".to_string(), 0usize)]);
        let dist = query(&cpds, "a", &evidence).unwrap();
        // P(a=s0 | b=s0) = 0.54 / 0.62
        assert!((dist[0] - 0.54 / 0.62).abs() < 1e-9);
    }

    #[test]
    fn impossible_evidence_is_an_error() {
        let mut cpds = two_node();
        // Make b deterministically s0 regardless of a.
        cpds.get_mut("b").unwrap().values = vec![vec![1.0, 0.0], vec![1.0, 0.0]];
        let evidence = HashMap::from([("b".to_string(), 1usize)]);
        assert!(query(&cpds, "a", &evidence).is_err());
    }
}

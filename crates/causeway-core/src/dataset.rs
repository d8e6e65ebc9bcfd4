//! Column-oriented observation table used at the Bayesian-network fit
//! boundary. The environment's feature pipeline is responsible for
//! producing one; this crate only reads it.

use std::collections::HashMap;

/// One column of observations.
#[derive(Debug, Clone)]
pub enum Column {
    Numeric(Vec<f64>),
    Categorical(Vec<String>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named collection of equal-length columns.
#[derive(Debug, Clone, Default)]
pub struct ObservationTable {
    columns: HashMap<String, Column>,
    rows: usize,
}

impl ObservationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a column. The first column fixes the row count; later
    /// columns of a different length are truncated or ignored by callers
    /// at their own risk, so we enforce equality here.
    pub fn insert(&mut self, name: &str, column: Column) -> bool {
        if self.columns.is_empty() {
            self.rows = column.len();
        } else if column.len() != self.rows {
            return false;
        }
        self.columns.insert(name.to_string(), column);
        true
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_ragged_columns() {
        let mut table = ObservationTable::new();
        assert!(table.insert("a", Column::Numeric(vec![1.0, 2.0, 3.0])));
        assert!(!table.insert("b", Column::Numeric(vec![1.0])));
        assert_eq!(table.row_count(), 3);
        assert!(table.column("b").is_none());
    }
}

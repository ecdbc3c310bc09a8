//! In-memory tables with named columns
//!
//! The formatter works on small column-oriented tables supplied by an
//! external data-loading layer. Columns keep their insertion order and
//! must all share one row count.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{FormatterError, Result};

/// A single column of values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Column {
    /// Continuous or integer-coded values
    Numeric(Vec<f64>),
    /// Raw label values
    Text(Vec<String>),
}

impl Column {
    /// Number of rows in the column
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(values) => values.len(),
            Column::Text(values) => values.len(),
        }
    }

    /// Whether the column has no rows
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric values, if this is a numeric column
    pub fn as_numeric(&self) -> Option<&[f64]> {
        match self {
            Column::Numeric(values) => Some(values),
            Column::Text(_) => None,
        }
    }

    /// Values stringified for label encoding.
    ///
    /// Numeric values with no fractional part render without a decimal
    /// point, so a column holding `7.0` and one holding `"7"` produce
    /// the same labels.
    pub fn to_labels(&self) -> Vec<String> {
        match self {
            Column::Numeric(values) => values.iter().map(|&v| format_label(v)).collect(),
            Column::Text(values) => values.clone(),
        }
    }
}

fn format_label(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 9e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Column-oriented table with ordered named columns.
///
/// Transforms never change the row count or column set of a table; they
/// replace column contents in place on a copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataTable {
    names: Vec<String>,
    index: HashMap<String, usize>,
    columns: Vec<Column>,
}

impl DataTable {
    /// Creates an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column.
    ///
    /// The name must be new and the length must match existing columns.
    pub fn push_column(&mut self, name: &str, column: Column) -> Result<()> {
        if self.index.contains_key(name) {
            return Err(FormatterError::ConfigError(format!(
                "duplicate column '{}'",
                name
            )));
        }
        if !self.columns.is_empty() && column.len() != self.num_rows() {
            return Err(FormatterError::ConfigError(format!(
                "column '{}' has {} rows, table has {}",
                name,
                column.len(),
                self.num_rows()
            )));
        }
        self.index.insert(name.to_string(), self.columns.len());
        self.names.push(name.to_string());
        self.columns.push(column);
        Ok(())
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    /// Number of columns
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Column names in insertion order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Looks up a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.index.get(name).map(|&i| &self.columns[i])
    }

    /// Numeric column contents, erroring if absent or non-numeric
    pub fn numeric_column(&self, name: &str) -> Result<&[f64]> {
        let column = self.column(name).ok_or_else(|| {
            FormatterError::ConfigError(format!("missing column '{}'", name))
        })?;
        column.as_numeric().ok_or_else(|| {
            FormatterError::ConfigError(format!("column '{}' is not numeric", name))
        })
    }

    /// Replaces the contents of an existing column.
    ///
    /// The replacement must have the table's row count.
    pub fn replace_column(&mut self, name: &str, column: Column) -> Result<()> {
        if column.len() != self.num_rows() {
            return Err(FormatterError::ConfigError(format!(
                "replacement for '{}' has {} rows, table has {}",
                name,
                column.len(),
                self.num_rows()
            )));
        }
        let slot = *self.index.get(name).ok_or_else(|| {
            FormatterError::ConfigError(format!("missing column '{}'", name))
        })?;
        self.columns[slot] = column;
        Ok(())
    }

    /// Rows for which `predicate` holds on the named numeric column,
    /// as a new table with the same column set
    pub fn filter_rows<F>(&self, column: &str, predicate: F) -> Result<DataTable>
    where
        F: Fn(f64) -> bool,
    {
        let key = self.numeric_column(column)?;
        let mask: Vec<bool> = key.iter().map(|&v| predicate(v)).collect();

        let mut output = DataTable::new();
        for (name, column) in self.names.iter().zip(&self.columns) {
            let filtered = match column {
                Column::Numeric(values) => Column::Numeric(
                    values
                        .iter()
                        .zip(&mask)
                        .filter(|(_, &keep)| keep)
                        .map(|(&v, _)| v)
                        .collect(),
                ),
                Column::Text(values) => Column::Text(
                    values
                        .iter()
                        .zip(&mask)
                        .filter(|(_, &keep)| keep)
                        .map(|(v, _)| v.clone())
                        .collect(),
                ),
            };
            output.push_column(name, filtered)?;
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> DataTable {
        let mut table = DataTable::new();
        table
            .push_column("day", Column::Numeric(vec![5.0, 6.0, 7.0, 8.0]))
            .unwrap();
        table
            .push_column(
                "stock",
                Column::Text(vec![
                    "AAA".to_string(),
                    "BBB".to_string(),
                    "AAA".to_string(),
                    "CCC".to_string(),
                ]),
            )
            .unwrap();
        table
    }

    #[test]
    fn test_push_and_lookup() {
        let table = sample_table();
        assert_eq!(table.num_rows(), 4);
        assert_eq!(table.num_columns(), 2);
        assert_eq!(table.names(), &["day".to_string(), "stock".to_string()]);
        assert_eq!(
            table.numeric_column("day").unwrap(),
            &[5.0, 6.0, 7.0, 8.0]
        );
    }

    #[test]
    fn test_ragged_column_is_error() {
        let mut table = sample_table();
        let result = table.push_column("bad", Column::Numeric(vec![1.0]));
        assert!(matches!(result, Err(FormatterError::ConfigError(_))));
    }

    #[test]
    fn test_duplicate_column_is_error() {
        let mut table = sample_table();
        let result = table.push_column("day", Column::Numeric(vec![0.0; 4]));
        assert!(result.is_err());
    }

    #[test]
    fn test_numeric_column_type_error() {
        let table = sample_table();
        assert!(table.numeric_column("stock").is_err());
        assert!(table.numeric_column("nope").is_err());
    }

    #[test]
    fn test_replace_column_checks_length() {
        let mut table = sample_table();
        assert!(table
            .replace_column("day", Column::Numeric(vec![1.0, 2.0, 3.0, 4.0]))
            .is_ok());
        assert!(table
            .replace_column("day", Column::Numeric(vec![1.0]))
            .is_err());
    }

    #[test]
    fn test_filter_rows() {
        let table = sample_table();
        let filtered = table.filter_rows("day", |d| d >= 7.0).unwrap();

        assert_eq!(filtered.num_rows(), 2);
        assert_eq!(filtered.numeric_column("day").unwrap(), &[7.0, 8.0]);
        assert_eq!(
            filtered.column("stock").unwrap().to_labels(),
            vec!["AAA".to_string(), "CCC".to_string()]
        );
    }

    #[test]
    fn test_label_formatting() {
        let column = Column::Numeric(vec![7.0, -3.0, 2.5]);
        assert_eq!(
            column.to_labels(),
            vec!["7".to_string(), "-3".to_string(), "2.5".to_string()]
        );
    }
}

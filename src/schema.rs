//! Column schema for the volatility dataset
//!
//! Declares the name, semantic data type and input role of every column
//! used in the experiment, and provides ordered accessors over them.

use serde::{Deserialize, Serialize};

use crate::error::{FormatterError, Result};

/// Semantic data type of a column, independent of storage representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Continuous numeric values
    RealValued,
    /// Discrete labels
    Categorical,
}

/// Role a column plays in the modeling task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputType {
    /// Entity identifier
    Id,
    /// Position within an entity's series
    Time,
    /// Prediction target
    Target,
    /// Input known ahead of forecast time
    KnownInput,
    /// Static per-entity input
    StaticInput,
}

impl std::fmt::Display for InputType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputType::Id => write!(f, "id"),
            InputType::Time => write!(f, "time"),
            InputType::Target => write!(f, "target"),
            InputType::KnownInput => write!(f, "known_input"),
            InputType::StaticInput => write!(f, "static_input"),
        }
    }
}

/// Declaration of a single column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name as it appears in input tables
    pub name: String,
    /// Semantic data type
    pub data_type: DataType,
    /// Role in the modeling task
    pub input_type: InputType,
}

impl ColumnSpec {
    /// Creates a column declaration
    pub fn new(name: &str, data_type: DataType, input_type: InputType) -> Self {
        Self {
            name: name.to_string(),
            data_type,
            input_type,
        }
    }
}

/// Ordered column declarations for one dataset.
///
/// Construction validates the schema: column names must be unique and
/// exactly one column must carry each of the `Id`, `Time` and `Target`
/// roles. All derived column lists preserve declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<ColumnSpec>,
}

impl Schema {
    /// Builds a schema, validating uniqueness and singleton roles
    pub fn new(columns: Vec<ColumnSpec>) -> Result<Self> {
        let mut seen = std::collections::HashSet::new();
        for spec in &columns {
            if !seen.insert(spec.name.as_str()) {
                return Err(FormatterError::ConfigError(format!(
                    "duplicate column name '{}'",
                    spec.name
                )));
            }
        }

        let schema = Self { columns };
        for role in [InputType::Id, InputType::Time, InputType::Target] {
            schema.single_column(role)?;
        }
        Ok(schema)
    }

    /// All column declarations, in order
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// The unique column carrying a singleton role.
    ///
    /// Zero or multiple matches is a configuration error.
    pub fn single_column(&self, input_type: InputType) -> Result<&str> {
        let mut matches = self
            .columns
            .iter()
            .filter(|spec| spec.input_type == input_type);

        let first = matches.next().ok_or_else(|| {
            FormatterError::ConfigError(format!("no column with role '{}'", input_type))
        })?;
        if matches.next().is_some() {
            return Err(FormatterError::ConfigError(format!(
                "multiple columns with role '{}'",
                input_type
            )));
        }
        Ok(&first.name)
    }

    /// Names of columns with the given data type, excluding the given
    /// roles, in declaration order
    pub fn columns_of_type(&self, data_type: DataType, exclude: &[InputType]) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|spec| spec.data_type == data_type && !exclude.contains(&spec.input_type))
            .map(|spec| spec.name.as_str())
            .collect()
    }

    /// Names of columns with the given role, in declaration order
    pub fn columns_with_role(&self, input_type: InputType) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|spec| spec.input_type == input_type)
            .map(|spec| spec.name.as_str())
            .collect()
    }
}

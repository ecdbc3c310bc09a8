//! Categorical label encoding

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{FormatterError, Result};

/// Maps distinct string labels to dense integer codes.
///
/// Codes are assigned over the sorted distinct label set, so repeated
/// fits on identical data always produce identical mappings. Labels not
/// seen at fit time are a fatal error at transform time; there is no
/// fallback bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Fits an encoder on the labels of one training column
    pub fn fit(labels: &[String]) -> Result<Self> {
        if labels.is_empty() {
            return Err(FormatterError::ConfigError(
                "cannot fit label encoder on an empty column".to_string(),
            ));
        }

        let distinct: BTreeSet<&str> = labels.iter().map(String::as_str).collect();
        Ok(Self {
            classes: distinct.into_iter().map(str::to_string).collect(),
        })
    }

    /// Distinct labels in code order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Number of distinct labels
    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    /// Code for a single label, if it was seen at fit time
    pub fn code_of(&self, label: &str) -> Option<usize> {
        // classes are sorted, so codes are binary-searchable
        self.classes.binary_search_by(|c| c.as_str().cmp(label)).ok()
    }

    /// Encodes labels to dense codes.
    ///
    /// `column` names the source column for error reporting.
    pub fn transform(&self, labels: &[String], column: &str) -> Result<Vec<i64>> {
        labels
            .iter()
            .map(|label| {
                self.code_of(label)
                    .map(|code| code as i64)
                    .ok_or_else(|| FormatterError::UnseenLabel {
                        column: column.to_string(),
                        label: label.clone(),
                    })
            })
            .collect()
    }

    /// Decodes codes back to labels
    pub fn inverse_transform(&self, codes: &[i64]) -> Result<Vec<String>> {
        codes
            .iter()
            .map(|&code| {
                usize::try_from(code)
                    .ok()
                    .and_then(|i| self.classes.get(i))
                    .cloned()
                    .ok_or_else(|| {
                        FormatterError::ConfigError(format!(
                            "label code {} out of range ({} classes)",
                            code,
                            self.num_classes()
                        ))
                    })
            })
            .collect()
    }
}

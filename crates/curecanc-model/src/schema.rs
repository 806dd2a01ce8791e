//! Ordered feature-name list shared by reconciliation and prediction.

use std::collections::HashSet;

use curecanc_common::{CureError, Result};
use serde::Serialize;

/// The exact column order the scaler and classifier were fitted on.
///
/// Reconciled vectors hold an `Arc` to the schema they were built against,
/// and the predictor refuses vectors built against any other schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FeatureSchema {
    names: Vec<String>,
}

impl FeatureSchema {
    /// Build a schema. Rejects an empty list, blank names and duplicates.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(CureError::InvalidInput("feature-name list is empty".into()));
        }
        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if name.trim().is_empty() {
                return Err(CureError::InvalidInput("feature-name list contains a blank name".into()));
            }
            if !seen.insert(name.as_str()) {
                return Err(CureError::InvalidInput(format!("duplicate feature name {name:?}")));
            }
        }
        Ok(Self { names })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }
}

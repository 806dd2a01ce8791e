//! Binary tumour classifiers: logistic regression and random forest.
//! Class 0 is benign, class 1 is malignant.

use std::fmt;

use curecanc_common::{CureError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Diagnosis {
    Benign,
    Malignant,
}

impl Diagnosis {
    pub fn from_class(class: u8) -> Option<Self> {
        match class {
            0 => Some(Diagnosis::Benign),
            1 => Some(Diagnosis::Malignant),
            _ => None,
        }
    }

    pub fn class_index(self) -> usize {
        match self {
            Diagnosis::Benign => 0,
            Diagnosis::Malignant => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Diagnosis::Benign => "Benign",
            Diagnosis::Malignant => "Malignant",
        }
    }

    pub fn is_malignant(self) -> bool {
        self == Diagnosis::Malignant
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A fitted binary classifier over already-scaled rows.
pub trait Classifier: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    fn n_features(&self) -> usize;

    /// `[p_benign, p_malignant]`, summing to 1.
    fn predict_proba(&self, row: &[f64]) -> Result<[f64; 2]>;

    /// The more probable class; ties resolve to benign.
    fn predict(&self, row: &[f64]) -> Result<Diagnosis> {
        let [benign, malignant] = self.predict_proba(row)?;
        Ok(if malignant > benign { Diagnosis::Malignant } else { Diagnosis::Benign })
    }
}

fn check_width(expected: usize, row: &[f64]) -> Result<()> {
    if row.len() != expected {
        return Err(CureError::InvalidInput(format!(
            "classifier expects {} features, got {}",
            expected,
            row.len()
        )));
    }
    Ok(())
}

// ── Logistic regression ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl LogisticRegression {
    pub fn decision_function(&self, row: &[f64]) -> f64 {
        self.coefficients.iter().zip(row).map(|(w, x)| w * x).sum::<f64>() + self.intercept
    }

    fn validate(&self) -> Result<()> {
        if self.coefficients.is_empty() {
            return Err(CureError::InvalidInput("logistic regression has no coefficients".into()));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|w| !w.is_finite()) {
            return Err(CureError::InvalidInput("logistic regression weights must be finite".into()));
        }
        Ok(())
    }
}

impl Classifier for LogisticRegression {
    fn name(&self) -> &'static str { "logistic_regression" }

    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn predict_proba(&self, row: &[f64]) -> Result<[f64; 2]> {
        check_width(self.n_features(), row)?;
        let malignant = sigmoid(self.decision_function(row));
        Ok([1.0 - malignant, malignant])
    }
}

// ── Random forest ────────────────────────────────────────────────────────────

/// One tree in flat-array form. Node `i` is a leaf when `children_left[i] < 0`;
/// otherwise rows with `x[feature[i]] <= threshold[i]` go left.
/// `value[i]` holds the `[benign, malignant]` weight at that node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<[f64; 2]>,
}

impl DecisionTree {
    pub fn node_count(&self) -> usize {
        self.children_left.len()
    }

    fn is_leaf(&self, node: usize) -> bool {
        self.children_left[node] < 0
    }

    fn validate(&self, n_features: usize) -> Result<()> {
        let n = self.node_count();
        if n == 0 {
            return Err(CureError::InvalidInput("decision tree has no nodes".into()));
        }
        if [self.children_right.len(), self.feature.len(), self.threshold.len(), self.value.len()]
            .iter()
            .any(|&len| len != n)
        {
            return Err(CureError::InvalidInput("decision tree arrays differ in length".into()));
        }
        for node in 0..n {
            if self.is_leaf(node) {
                let [b, m] = self.value[node];
                if !(b.is_finite() && m.is_finite()) || b < 0.0 || m < 0.0 || b + m <= 0.0 {
                    return Err(CureError::InvalidInput(format!("leaf {node} has no usable class weights")));
                }
                continue;
            }
            let (left, right) = (self.children_left[node], self.children_right[node]);
            // Children must come after their parent, which also rules out cycles.
            for child in [left, right] {
                if child <= node as i64 || child as usize >= n {
                    return Err(CureError::InvalidInput(format!("node {node} has invalid child {child}")));
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(CureError::InvalidInput(format!("node {node} splits on unknown feature {feature}")));
            }
            if !self.threshold[node].is_finite() {
                return Err(CureError::InvalidInput(format!("node {node} has a non-finite threshold")));
            }
        }
        Ok(())
    }

    /// Normalised class distribution of the leaf `row` falls into.
    pub fn leaf_distribution(&self, row: &[f64]) -> [f64; 2] {
        let mut node = 0usize;
        while !self.is_leaf(node) {
            let feature = self.feature[node] as usize;
            node = if row[feature] <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        let [b, m] = self.value[node];
        let total = b + m;
        [b / total, m / total]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub n_features: usize,
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    fn validate(&self) -> Result<()> {
        if self.trees.is_empty() {
            return Err(CureError::InvalidInput("random forest has no trees".into()));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features)
                .map_err(|e| CureError::InvalidInput(format!("tree {i}: {e}")))?;
        }
        Ok(())
    }
}

impl Classifier for RandomForest {
    fn name(&self) -> &'static str { "random_forest" }

    fn n_features(&self) -> usize {
        self.n_features
    }

    /// Mean of the per-tree leaf distributions.
    fn predict_proba(&self, row: &[f64]) -> Result<[f64; 2]> {
        check_width(self.n_features, row)?;
        let mut sum = [0.0f64; 2];
        for tree in &self.trees {
            let [b, m] = tree.leaf_distribution(row);
            sum[0] += b;
            sum[1] += m;
        }
        let n = self.trees.len() as f64;
        Ok([sum[0] / n, sum[1] / n])
    }
}

// ── Serialized form ──────────────────────────────────────────────────────────

/// On-disk classifier document, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    LogisticRegression(LogisticRegression),
    RandomForest(RandomForest),
}

impl ClassifierArtifact {
    pub fn kind(&self) -> &'static str {
        match self {
            ClassifierArtifact::LogisticRegression(_) => "logistic_regression",
            ClassifierArtifact::RandomForest(_) => "random_forest",
        }
    }

    pub fn n_features(&self) -> usize {
        match self {
            ClassifierArtifact::LogisticRegression(m) => m.n_features(),
            ClassifierArtifact::RandomForest(m) => m.n_features(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            ClassifierArtifact::LogisticRegression(m) => m.validate(),
            ClassifierArtifact::RandomForest(m) => m.validate(),
        }
    }

    pub fn into_classifier(self) -> Box<dyn Classifier> {
        match self {
            ClassifierArtifact::LogisticRegression(m) => Box::new(m),
            ClassifierArtifact::RandomForest(m) => Box::new(m),
        }
    }
}

//! Feature vector builder: the twelve input controls, the partial vector they
//! produce, and reconciliation against the model's feature schema.

use std::sync::Arc;

use curecanc_common::{CureError, Result};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::schema::FeatureSchema;

/// A bounded numeric input the caller can set.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct FeatureControl {
    /// Column name in the feature record (may contain a space).
    pub name: &'static str,
    /// HTML form field name.
    pub field: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
}

impl FeatureControl {
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    fn matches(&self, key: &str) -> bool {
        key == self.name || key == self.field
    }
}

const fn control(
    name: &'static str,
    field: &'static str,
    label: &'static str,
    min: f64,
    max: f64,
    default: f64,
    step: f64,
) -> FeatureControl {
    FeatureControl { name, field, label, min, max, default, step }
}

/// The only inputs the dashboard accepts, in display order.
#[rustfmt::skip]
pub const INPUT_CONTROLS: [FeatureControl; 12] = [
    control("radius_mean",            "radius_mean",            "Radius Mean",            0.0, 30.0,   14.0,  0.01),
    control("texture_mean",           "texture_mean",           "Texture Mean",           0.0, 40.0,   19.0,  0.01),
    control("perimeter_mean",         "perimeter_mean",         "Perimeter Mean",         0.0, 200.0,  90.0,  0.1),
    control("area_mean",              "area_mean",              "Area Mean",              0.0, 2500.0, 700.0, 1.0),
    control("smoothness_mean",        "smoothness_mean",        "Smoothness Mean",        0.0, 0.2,    0.1,   0.001),
    control("compactness_mean",       "compactness_mean",       "Compactness Mean",       0.0, 1.0,    0.2,   0.01),
    control("concavity_mean",         "concavity_mean",         "Concavity Mean",         0.0, 1.0,    0.3,   0.01),
    control("concave points_mean",    "concave_points_mean",    "Concave Points Mean",    0.0, 1.0,    0.2,   0.01),
    control("symmetry_mean",          "symmetry_mean",          "Symmetry Mean",          0.0, 1.0,    0.2,   0.01),
    control("fractal_dimension_mean", "fractal_dimension_mean", "Fractal Dimension Mean", 0.0, 0.1,    0.05,  0.001),
    control("radius_se",              "radius_se",              "Radius SE",              0.0, 5.0,    1.0,   0.01),
    control("texture_se",             "texture_se",             "Texture SE",             0.0, 5.0,    1.0,   0.01),
];

pub fn find_control(key: &str) -> Option<&'static FeatureControl> {
    INPUT_CONTROLS.iter().find(|c| c.matches(key))
}

/// Single-row record of the caller-controlled features, keyed by column name
/// in control order.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialVector {
    entries: Vec<(String, f64)>,
}

impl PartialVector {
    /// Every control at its default value.
    pub fn defaults() -> Self {
        Self {
            entries: INPUT_CONTROLS
                .iter()
                .map(|c| (c.name.to_string(), c.default))
                .collect(),
        }
    }

    /// Build from numeric values keyed by column or form-field name.
    ///
    /// Missing controls take their default, out-of-range values are clamped,
    /// unknown keys are ignored. Non-finite values are rejected.
    pub fn from_values<'a, I>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut partial = Self::defaults();
        for (key, value) in values {
            partial.set(key, value)?;
        }
        Ok(partial)
    }

    /// Build from raw form strings. Blank fields keep their default.
    pub fn from_form<'a, I>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut partial = Self::defaults();
        for (key, raw) in fields {
            if find_control(key).is_none() || raw.trim().is_empty() {
                continue;
            }
            let value: f64 = raw.trim().parse().map_err(|_| {
                CureError::InvalidInput(format!("{key} must be a number, got {raw:?}"))
            })?;
            partial.set(key, value)?;
        }
        Ok(partial)
    }

    /// Like [`PartialVector::from_form`] but never fails: fields that do not
    /// parse keep their default. Used to echo a rejected form back.
    pub fn from_form_lossy<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut partial = Self::defaults();
        for (key, raw) in fields {
            if let Ok(value) = raw.trim().parse::<f64>() {
                let _ = partial.set(key, value);
            }
        }
        partial
    }

    fn set(&mut self, key: &str, value: f64) -> Result<()> {
        let Some(control) = find_control(key) else {
            tracing::debug!(key, "ignoring value for unknown input control");
            return Ok(());
        };
        if !value.is_finite() {
            return Err(CureError::InvalidInput(format!("{key} must be a finite number")));
        }
        let clamped = control.clamp(value);
        if let Some(entry) = self.entries.iter_mut().find(|(name, _)| name == control.name) {
            entry.1 = clamped;
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A feature row whose columns are exactly the schema's names, in schema order.
///
/// Only [`reconcile`] constructs one, so the invariant holds by construction.
#[derive(Debug, Clone)]
pub struct ReconciledVector {
    schema: Arc<FeatureSchema>,
    values: Vec<f64>,
    zero_filled: Vec<String>,
}

impl ReconciledVector {
    pub fn schema(&self) -> &Arc<FeatureSchema> {
        &self.schema
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Schema names that had no caller value and were set to 0.0.
    ///
    /// Zero fill is not imputation: missing clinical measurements become
    /// literal zeros, which the classifier may read as extreme values.
    pub fn zero_filled(&self) -> &[String] {
        &self.zero_filled
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.schema.position(name).map(|i| self.values[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.schema
            .names()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Serialize for ReconciledVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}

/// Align a partial vector with the schema: pass through known values, fill
/// the rest with 0.0, drop keys the schema does not name.
pub fn reconcile(partial: &PartialVector, schema: &Arc<FeatureSchema>) -> ReconciledVector {
    let mut values = Vec::with_capacity(schema.len());
    let mut zero_filled = Vec::new();

    for name in schema.names() {
        match partial.get(name) {
            Some(value) => values.push(value),
            None => {
                values.push(0.0);
                zero_filled.push(name.clone());
            }
        }
    }

    let dropped: Vec<&str> = partial
        .iter()
        .map(|(name, _)| name)
        .filter(|name| !schema.contains(name))
        .collect();
    if !dropped.is_empty() {
        tracing::debug!(?dropped, "inputs not used by the model");
    }
    if !zero_filled.is_empty() {
        tracing::debug!(count = zero_filled.len(), zero_filled = ?zero_filled, "features zero-filled");
    }

    ReconciledVector {
        schema: Arc::clone(schema),
        values,
        zero_filled,
    }
}

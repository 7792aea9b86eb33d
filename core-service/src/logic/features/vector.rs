//! Feature Vector - Core data structure for model input
//!
//! **Versioned feature vector with layout validation**
//!
//! Uses centralized layout from `layout.rs` for:
//! - Consistent feature ordering between training and inference
//! - Version tracking
//! - Layout hash for compatibility checks
//!
//! Request values enter only through [`build_feature_vector`], which resolves
//! them by name, so the order keys arrive in never matters.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::layout::{
    feature_index, layout_hash, validate_layout, LayoutMismatchError, FEATURE_COUNT,
    FEATURE_LAYOUT, FEATURE_VERSION,
};
use crate::logic::error::SchemaError;

/// Raw request payload: field name → JSON value as sent by the form
pub type RawInputs = serde_json::Map<String, Value>;

// ============================================================================
// VERSIONED FEATURE VECTOR
// ============================================================================

/// Versioned Feature Vector with layout metadata
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Feature layout version
    pub version: u8,
    /// CRC32 hash of the feature layout (for mismatch detection)
    pub layout_hash: u32,
    /// Feature values in order defined by FEATURE_LAYOUT
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// Create from raw values already in layout order
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self {
            version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            values,
        }
    }

    /// Get values as array reference
    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    /// Get values as slice
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Get feature by index
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Get feature by name
    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        feature_index(name).and_then(|i| self.get(i))
    }

    /// Validate that this vector is compatible with current layout
    pub fn validate(&self) -> Result<(), LayoutMismatchError> {
        validate_layout(self.version, self.layout_hash)
    }

    /// Get feature names for this vector
    pub fn feature_names(&self) -> &'static [&'static str] {
        FEATURE_LAYOUT
    }

    /// Convert to JSON-serializable format for logging
    pub fn to_log_entry(&self) -> Value {
        serde_json::json!({
            "feature_version": self.version,
            "layout_hash": self.layout_hash,
            "named_values": FEATURE_LAYOUT.iter()
                .zip(self.values.iter())
                .map(|(name, value)| (name.to_string(), Value::from(*value)))
                .collect::<serde_json::Map<_, _>>(),
        })
    }
}

impl From<[f64; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self::from_values(values)
    }
}

/// Slices of the wrong length are rejected rather than padded
impl TryFrom<&[f64]> for FeatureVector {
    type Error = SchemaError;

    fn try_from(values: &[f64]) -> Result<Self, Self::Error> {
        let array: [f64; FEATURE_COUNT] =
            values.try_into().map_err(|_| SchemaError::FeatureCount {
                expected: FEATURE_COUNT,
                actual: values.len(),
            })?;
        Ok(Self::from_values(array))
    }
}

// ============================================================================
// REQUEST VALIDATION
// ============================================================================

/// Build a feature vector from a named request payload.
///
/// Fields are checked in layout order and the first problem is reported:
/// absent keys, `null` and blank strings are `MissingField`; anything that
/// is not a finite number (or a string holding one) is `InvalidType`.
/// Unknown keys are ignored.
pub fn build_feature_vector(raw_inputs: &RawInputs) -> Result<FeatureVector, SchemaError> {
    let mut values = [0.0f64; FEATURE_COUNT];

    for (index, &name) in FEATURE_LAYOUT.iter().enumerate() {
        let value = raw_inputs.get(name).ok_or(SchemaError::MissingField(name))?;
        values[index] = coerce_numeric(name, value)?;
    }

    for key in raw_inputs.keys() {
        if feature_index(key).is_none() {
            log::debug!("Ignoring unknown input field '{}'", key);
        }
    }

    Ok(FeatureVector::from_values(values))
}

fn coerce_numeric(field: &'static str, value: &Value) -> Result<f64, SchemaError> {
    let number = match value {
        Value::Null => return Err(SchemaError::MissingField(field)),
        Value::Number(n) => n.as_f64().ok_or_else(|| SchemaError::InvalidType {
            field,
            reason: format!("{} is not representable as a float", n),
        })?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Err(SchemaError::MissingField(field));
            }
            trimmed.parse::<f64>().map_err(|_| SchemaError::InvalidType {
                field,
                reason: format!("'{}' is not a number", trimmed),
            })?
        }
        Value::Bool(_) => {
            return Err(SchemaError::InvalidType {
                field,
                reason: "expected a number, got a boolean".to_string(),
            })
        }
        Value::Array(_) | Value::Object(_) => {
            return Err(SchemaError::InvalidType {
                field,
                reason: "expected a number, got a structured value".to_string(),
            })
        }
    };

    if !number.is_finite() {
        return Err(SchemaError::InvalidType {
            field,
            reason: format!("{} is not finite", number),
        });
    }

    Ok(number)
}

// ============================================================================
// BUILDER PATTERN
// ============================================================================

/// Builder for creating FeatureVector with named setters
#[derive(Debug, Default)]
pub struct FeatureVectorBuilder {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVectorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn temperature(self, value: f64) -> Self {
        self.set("temperature", value)
    }

    pub fn humidity(self, value: f64) -> Self {
        self.set("humidity", value)
    }

    pub fn precipitation(self, value: f64) -> Self {
        self.set("precipitation", value)
    }

    pub fn trees_replanted(self, value: f64) -> Self {
        self.set("trees_replanted", value)
    }

    pub fn trees_infected(self, value: f64) -> Self {
        self.set("trees_infected", value)
    }

    fn set(mut self, name: &str, value: f64) -> Self {
        if let Some(index) = feature_index(name) {
            self.values[index] = value;
        }
        self
    }

    pub fn build(self) -> FeatureVector {
        FeatureVector::from_values(self.values)
    }
}

use crate::descriptor::lenient_text;
use crate::error::AtlasError;
use serde::{Deserialize, Serialize};

/// A named reference condition (`low`, `mid`, `high`, ...) and the value
/// the sensor should read there.
///
/// Absent keys are kept as `None` and numbers as text; request validation
/// decides whether they were usable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationPoint {
    #[serde(deserialize_with = "lenient_text")]
    pub point: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub actual_value: Option<String>,
}

impl CalibrationPoint {
    pub fn new(point: impl Into<String>, actual_value: impl Into<String>) -> Self {
        Self {
            point: Some(point.into()),
            actual_value: Some(actual_value.into()),
        }
    }

    pub fn from_descriptor(descriptor: &serde_json::Value) -> Result<Self, AtlasError> {
        Ok(Self::deserialize(descriptor)?)
    }

    /// Whether this point has the given name.
    pub fn is_named(&self, name: &str) -> bool {
        self.point.as_deref() == Some(name)
    }
}

use crate::descriptor::lenient_text;
use crate::error::AtlasError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// An environmental correction a device accepts, e.g. salinity for DO.
///
/// Built leniently from a descriptor: absent keys become `None`, numbers
/// become text, and request validation rejects whatever is unusable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompensationFactor {
    #[serde(deserialize_with = "lenient_text")]
    pub factor: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub symbol: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub value: Option<String>,
}

impl CompensationFactor {
    pub fn new(factor: impl Into<String>, symbol: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            factor: Some(factor.into()),
            symbol: Some(symbol.into()),
            value: Some(value.into()),
        }
    }

    /// Build from a JSON object. Keys other than `factor`, `symbol` and
    /// `value` are ignored.
    pub fn from_descriptor(descriptor: &serde_json::Value) -> Result<Self, AtlasError> {
        Ok(Self::deserialize(descriptor)?)
    }
}

/// Compensation factors supported by one device type, keyed by factor name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CompensationFactorSet {
    factors: BTreeMap<String, CompensationFactor>,
}

impl CompensationFactorSet {
    /// Index descriptors by factor name.
    ///
    /// Fails if a descriptor has no factor name, or if a name repeats.
    pub fn new(descriptors: impl IntoIterator<Item = CompensationFactor>) -> Result<Self, AtlasError> {
        let mut factors = BTreeMap::new();
        for descriptor in descriptors {
            let name = descriptor.factor.clone().ok_or(AtlasError::UnnamedCompensationFactor)?;
            if factors.contains_key(&name) {
                warn!(factor = %name, "Duplicate compensation factor in configuration");
                return Err(AtlasError::DuplicateCompensationFactor(name));
            }
            factors.insert(name, descriptor);
        }
        Ok(Self { factors })
    }

    pub fn get(&self, factor: &str) -> Option<&CompensationFactor> {
        self.factors.get(factor)
    }

    pub fn contains(&self, factor: &str) -> bool {
        self.factors.contains_key(factor)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factors.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_descriptor_missing_keys_are_none() {
        let factor = CompensationFactor::from_descriptor(&json!({ "symbol": "μS", "value": "50000" })).unwrap();
        assert_eq!(factor.factor, None);
        assert_eq!(factor.symbol.as_deref(), Some("μS"));
        assert_eq!(factor.value.as_deref(), Some("50000"));

        let empty = CompensationFactor::from_descriptor(&json!({})).unwrap();
        assert_eq!(empty, CompensationFactor::default());
    }

    #[test]
    fn test_descriptor_accepts_numeric_value() {
        let factor =
            CompensationFactor::from_descriptor(&json!({ "factor": "salinity", "symbol": "μS", "value": 50000 })).unwrap();
        assert_eq!(factor, CompensationFactor::new("salinity", "μS", "50000"));
    }

    #[test]
    fn test_descriptor_keeps_wrong_typed_factor_as_text() {
        let factor = CompensationFactor::from_descriptor(&json!({ "factor": 7, "symbol": "μS" })).unwrap();
        assert_eq!(factor.factor.as_deref(), Some("7"));
        assert_eq!(factor.value, None);
    }

    #[test]
    fn test_descriptor_must_be_an_object() {
        let result = CompensationFactor::from_descriptor(&json!(["salinity"]));
        assert!(matches!(result, Err(AtlasError::Json(_))));
    }

    #[test]
    fn test_set_is_keyed_by_factor() {
        let set = CompensationFactorSet::new([
            CompensationFactor::new("salinity", "μS", "0"),
            CompensationFactor::new("pressure", "kPa", "101.3"),
        ])
        .unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains("salinity"));
        assert_eq!(set.get("pressure").and_then(|f| f.symbol.as_deref()), Some("kPa"));
        assert_eq!(set.names().collect::<Vec<_>>(), ["pressure", "salinity"]);
    }

    #[test]
    fn test_set_rejects_duplicate_names() {
        let result = CompensationFactorSet::new([
            CompensationFactor::new("temperature", "°C", "25"),
            CompensationFactor::new("temperature", "°F", "77"),
        ]);
        assert!(matches!(result, Err(AtlasError::DuplicateCompensationFactor(name)) if name == "temperature"));
    }

    #[test]
    fn test_set_rejects_unnamed_descriptor() {
        let unnamed = CompensationFactor {
            symbol: Some("μS".to_string()),
            ..Default::default()
        };
        let result = CompensationFactorSet::new([unnamed]);
        assert!(matches!(result, Err(AtlasError::UnnamedCompensationFactor)));
    }
}

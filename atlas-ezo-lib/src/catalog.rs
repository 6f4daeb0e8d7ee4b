//! Per device type configuration: what a sample response contains and
//! which compensation factors and calibration points a circuit accepts.

use crate::calibration::CalibrationPoint;
use crate::compensation::{CompensationFactor, CompensationFactorSet};
use crate::device::OutputUnitSpec;
use crate::error::AtlasError;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

const BUILTIN_CATALOG: &str = include_str!("../catalog/devices.json");

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceProfile {
    /// One entry per field of a sample response, in response order
    pub output_units: Vec<OutputUnitSpec>,
    pub compensation_factors: Vec<CompensationFactor>,
    pub calibration_points: Vec<CalibrationPoint>,
}

impl DeviceProfile {
    pub fn compensation_factor_set(&self) -> Result<CompensationFactorSet, AtlasError> {
        CompensationFactorSet::new(self.compensation_factors.iter().cloned())
    }
}

/// Device profiles keyed by the device type a circuit reports in its info
/// response (`pH`, `DO`, `EC`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DeviceCatalog {
    profiles: BTreeMap<String, DeviceProfile>,
}

impl<'de> Deserialize<'de> for DeviceCatalog {
    /// Device types are unique ignoring ASCII case; a repeated key is an
    /// error rather than a silent overwrite.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CatalogVisitor;

        impl<'de> Visitor<'de> for CatalogVisitor {
            type Value = DeviceCatalog;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from device type to device profile")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<DeviceCatalog, A::Error> {
                let mut profiles: BTreeMap<String, DeviceProfile> = BTreeMap::new();
                while let Some((name, profile)) = map.next_entry::<String, DeviceProfile>()? {
                    if profiles.keys().any(|known: &String| known.eq_ignore_ascii_case(&name)) {
                        return Err(de::Error::custom(format!("device type {name:?} is listed twice")));
                    }
                    profiles.insert(name, profile);
                }
                Ok(DeviceCatalog { profiles })
            }
        }

        deserializer.deserialize_map(CatalogVisitor)
    }
}

impl DeviceCatalog {
    /// Profiles for the EZO circuits shipped with this crate.
    pub fn builtin() -> Result<Self, AtlasError> {
        Self::from_json_str(BUILTIN_CATALOG)
    }

    pub fn from_json_str(json: &str) -> Result<Self, AtlasError> {
        let catalog: DeviceCatalog = serde_json::from_str(json)?;
        catalog.check()?;
        debug!(device_types = catalog.profiles.len(), "Loaded device catalog");
        Ok(catalog)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AtlasError> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading device catalog");
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Look up a profile. Device types are matched ignoring ASCII case,
    /// since circuits report them inconsistently (`?I,pH` vs `?i,PH`).
    pub fn profile(&self, device_type: &str) -> Result<&DeviceProfile, AtlasError> {
        self.profiles
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(device_type))
            .map(|(_, profile)| profile)
            .ok_or_else(|| AtlasError::UnknownDeviceType(device_type.to_string()))
    }

    pub fn device_types(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    fn check(&self) -> Result<(), AtlasError> {
        for (name, profile) in &self.profiles {
            if profile.output_units.is_empty() {
                return Err(AtlasError::Catalog(format!("device type {name:?} has no output units")));
            }
            profile
                .compensation_factor_set()
                .map_err(|err| AtlasError::Catalog(format!("device type {name:?}: {err}")))?;
        }
        Ok(())
    }
}

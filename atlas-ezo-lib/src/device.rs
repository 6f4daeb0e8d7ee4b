use crate::constants::VENDOR;
use crate::error::ResponseError;
use crate::frame::{FieldAccessor, ResponseFrame};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::Display;
use tracing::debug;

/// Identity of a circuit, decoded from its `i` (info) response.
///
/// Expected payload: `?I,<device type>,<firmware version>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub device_type: String,
    pub version: String,
    pub address: u8,
    pub vendor: &'static str,
}

impl DeviceInfo {
    pub fn from_frame(frame: &ResponseFrame, address: u8) -> Result<Self, ResponseError> {
        let device_type = frame.get_field("device_type", 1)?.to_string();
        let version = frame.get_field("version", 2)?.to_string();
        debug!(%device_type, %version, address, "Decoded device info");
        Ok(Self {
            device_type,
            version,
            address,
            vendor: VENDOR,
        })
    }
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} v{} at {:#04x}",
            self.vendor, self.device_type, self.version, self.address
        )
    }
}

/// Output units currently enabled on a circuit, decoded from `O,?`.
///
/// Expected payload: `?O,<unit>,<unit>,...`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceOutputUnits {
    pub units: Vec<String>,
}

impl DeviceOutputUnits {
    pub fn from_frame(frame: &ResponseFrame) -> Result<Self, ResponseError> {
        let units = frame.get_fields("output", 1, None)?.to_vec();
        Ok(Self { units })
    }
}

/// How a sample value should be interpreted by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ValueType {
    Float,
    Integer,
    String,
}

/// Meaning of one position in a sample response, per device type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputUnitSpec {
    pub symbol: String,
    pub value_type: ValueType,
}

impl OutputUnitSpec {
    pub fn new(symbol: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            symbol: symbol.into(),
            value_type,
        }
    }
}

/// One reading taken from a sample (`R`) response.
///
/// The value is kept as the device sent it; converting it is up to the
/// consumer, guided by `value_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceSample {
    pub symbol: String,
    pub value: String,
    pub value_type: ValueType,
    pub timestamp: DateTime<Utc>,
}

impl DeviceSample {
    /// Pair each expected output with the field at the same position.
    ///
    /// All or nothing: if the frame holds fewer fields than `expected`
    /// describes, no samples are returned.
    pub fn from_expected_output(
        frame: &ResponseFrame,
        expected: &[OutputUnitSpec],
    ) -> Result<Vec<Self>, ResponseError> {
        let samples = expected
            .iter()
            .enumerate()
            .map(|(index, spec)| -> Result<DeviceSample, ResponseError> {
                let value = frame.get_field("sample", index)?;
                Ok(DeviceSample {
                    symbol: spec.symbol.clone(),
                    value: value.to_string(),
                    value_type: spec.value_type,
                    timestamp: frame.received_at(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = samples.len(), "Decoded samples");
        Ok(samples)
    }

    /// Parse the value as a float, reporting failures against the `sample` field.
    pub fn as_f64(&self) -> Result<f64, ResponseError> {
        self.value
            .trim()
            .parse::<f64>()
            .map_err(|err| ResponseError::malformed("sample", format!("{:?} is not a number: {}", self.value, err)))
    }
}

impl fmt::Display for DeviceSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.value, self.symbol, self.value_type)
    }
}

//! Validation of user requests against what a device type supports.
//!
//! Descriptors are built leniently (see [`CompensationFactor`] and
//! [`CalibrationPoint`]); this is where absent or malformed keys are
//! rejected, before any command goes out on the bus.

use crate::calibration::CalibrationPoint;
use crate::compensation::{CompensationFactor, CompensationFactorSet};
use crate::error::RequestError;
use serde::Serialize;
use tracing::warn;

/// A compensation request that passed validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Compensation {
    pub factor: String,
    pub symbol: String,
    pub value: f64,
}

/// A calibration request that passed validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Calibration {
    pub point: String,
    pub actual_value: f64,
}

/// Check every requested factor against the device's supported set.
pub fn validate_compensation(
    supported: &CompensationFactorSet,
    requested: &[CompensationFactor],
) -> Result<Vec<Compensation>, RequestError> {
    if requested.is_empty() {
        return Err(RequestError::new("factor", "no compensation factors given"));
    }
    let mut accepted: Vec<Compensation> = Vec::with_capacity(requested.len());
    for factor in requested {
        let compensation = validate_factor(supported, factor)?;
        if accepted.iter().any(|c| c.factor == compensation.factor) {
            return Err(RequestError::new(
                "factor",
                format!("{:?} is given more than once", compensation.factor),
            ));
        }
        accepted.push(compensation);
    }
    Ok(accepted)
}

fn validate_factor(supported: &CompensationFactorSet, requested: &CompensationFactor) -> Result<Compensation, RequestError> {
    let name = required("factor", requested.factor.as_deref())?;
    let symbol = required("symbol", requested.symbol.as_deref())?;
    let value = required("value", requested.value.as_deref())?;

    let expected = supported.get(name).ok_or_else(|| {
        warn!(factor = name, "Compensation factor not supported by device");
        RequestError::new("factor", format!("{name:?} is not supported by this device"))
    })?;

    if expected.symbol.as_deref() != Some(symbol) {
        return Err(RequestError::new(
            "symbol",
            format!(
                "{symbol:?} does not match the expected unit {:?}",
                expected.symbol.as_deref().unwrap_or_default()
            ),
        ));
    }

    Ok(Compensation {
        factor: name.to_string(),
        symbol: symbol.to_string(),
        value: parse_float("value", value)?,
    })
}

/// Check a calibration request against the device's calibration points.
pub fn validate_calibration(
    expected: &[CalibrationPoint],
    requested: &CalibrationPoint,
) -> Result<Calibration, RequestError> {
    let point = required("point", requested.point.as_deref())?;
    let actual_value = required("actual_value", requested.actual_value.as_deref())?;

    if !expected.iter().any(|p| p.is_named(point)) {
        warn!(point, "Calibration point not supported by device");
        return Err(RequestError::new(
            "point",
            format!("{point:?} is not a calibration point of this device"),
        ));
    }

    Ok(Calibration {
        point: point.to_string(),
        actual_value: parse_float("actual_value", actual_value)?,
    })
}

fn required<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, RequestError> {
    value.ok_or_else(|| RequestError::missing(field))
}

fn parse_float(field: &str, value: &str) -> Result<f64, RequestError> {
    match value.trim().parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => Ok(parsed),
        _ => Err(RequestError::new(field, format!("{value:?} is not a number"))),
    }
}

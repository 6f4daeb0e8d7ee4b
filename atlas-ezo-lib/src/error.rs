use crate::constants::{INVALID_REQUEST_ERROR_CODE, MISSING_FIELDS_MESSAGE, MISSING_FIELD_MESSAGE};
use std::io;
use thiserror::Error;

/// A raw response could not be turned into a frame or a domain object.
///
/// Every variant names the field that failed, so the request layer can
/// report which part of the device response was unusable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResponseError {
    #[error("status: {detail}")]
    InvalidStatusByte { byte: Option<u8>, detail: String },

    #[error("{field}: {}", missing_message(*.range))]
    MissingField { field: String, range: bool },

    #[error("{field}: {detail}")]
    MalformedField { field: String, detail: String },
}

fn missing_message(range: bool) -> &'static str {
    if range { MISSING_FIELDS_MESSAGE } else { MISSING_FIELD_MESSAGE }
}

impl ResponseError {
    pub fn missing(field: impl Into<String>) -> Self {
        ResponseError::MissingField {
            field: field.into(),
            range: false,
        }
    }

    pub fn missing_range(field: impl Into<String>) -> Self {
        ResponseError::MissingField {
            field: field.into(),
            range: true,
        }
    }

    pub fn malformed(field: impl Into<String>, detail: impl Into<String>) -> Self {
        ResponseError::MalformedField {
            field: field.into(),
            detail: detail.into(),
        }
    }

    /// Name of the response field that failed.
    pub fn field(&self) -> &str {
        match self {
            ResponseError::InvalidStatusByte { .. } => "status",
            ResponseError::MissingField { field, .. } => field,
            ResponseError::MalformedField { field, .. } => field,
        }
    }

    /// Human readable description, without the field name.
    pub fn message(&self) -> String {
        match self {
            ResponseError::InvalidStatusByte { detail, .. } => detail.clone(),
            ResponseError::MissingField { range, .. } => missing_message(*range).to_string(),
            ResponseError::MalformedField { detail, .. } => detail.clone(),
        }
    }
}

/// A user request did not match what the addressed device accepts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid request field {field}: {message}")]
pub struct RequestError {
    pub field: String,
    pub message: String,
}

impl RequestError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn missing(field: impl Into<String>) -> Self {
        Self::new(field, "required field is missing")
    }

    /// Code the HTTP layer puts in its error envelope.
    pub fn error_code(&self) -> &'static str {
        INVALID_REQUEST_ERROR_CODE
    }
}

/// The primary error type for the `atlas-ezo-lib` library.
#[derive(Error, Debug)]
pub enum AtlasError {
    #[error("Response syntax error: {0}")]
    Response(#[from] ResponseError),

    #[error("Device is still processing the previous command")]
    DeviceNotReady,

    #[error("Device rejected the command as a syntax error")]
    DeviceSyntaxError,

    #[error("Compensation factor {0:?} is configured more than once")]
    DuplicateCompensationFactor(String),

    #[error("Compensation factor descriptor has no factor name")]
    UnnamedCompensationFactor,

    #[error("No configuration for device type {0:?}")]
    UnknownDeviceType(String),

    #[error("Invalid device catalog: {0}")]
    Catalog(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    InvalidRequest(#[from] RequestError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_carries_name_and_message() {
        let err = ResponseError::missing("version");
        assert_eq!(err.field(), "version");
        assert_eq!(err.message(), MISSING_FIELD_MESSAGE);
        assert_eq!(err.to_string(), "version: expected field missing from response");
    }

    #[test]
    fn test_missing_range_uses_plural_message() {
        let err = ResponseError::missing_range("output");
        assert_eq!(err.field(), "output");
        assert_eq!(err.message(), MISSING_FIELDS_MESSAGE);
    }

    #[test]
    fn test_status_error_is_reported_against_status_field() {
        let err = ResponseError::InvalidStatusByte {
            byte: Some(7),
            detail: "unknown status byte 0x07".to_string(),
        };
        assert_eq!(err.field(), "status");
        assert_eq!(err.message(), "unknown status byte 0x07");
    }

    #[test]
    fn test_request_error_code() {
        let err = RequestError::missing("factor");
        assert_eq!(err.error_code(), "INVALID_REQUEST_ERROR");
        assert_eq!(err.field, "factor");
    }
}

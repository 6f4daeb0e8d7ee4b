use crate::error::ResponseError;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::Serialize;
use strum_macros::Display;

/// Outcome reported in the first byte of every EZO response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, TryFromPrimitive, IntoPrimitive)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum StatusCode {
    #[strum(to_string = "ok")]
    Ok = 1,
    #[strum(to_string = "syntax error")]
    SyntaxError = 2,
    #[strum(to_string = "not ready")]
    NotReady = 254,
    /// Accepted, but the command produces no payload
    #[strum(to_string = "ack")]
    AckNoBody = 255,
}

impl StatusCode {
    /// Resolve the status from the first byte of a raw response.
    pub fn from_response(raw: &[u8]) -> Result<Self, ResponseError> {
        let byte = *raw.first().ok_or_else(|| ResponseError::InvalidStatusByte {
            byte: None,
            detail: "response is empty, no status byte".to_string(),
        })?;
        StatusCode::try_from(byte).map_err(|err| ResponseError::InvalidStatusByte {
            byte: Some(byte),
            detail: err.to_string(),
        })
    }

    /// Whether a payload follows the status byte.
    pub fn has_payload(&self) -> bool {
        matches!(self, StatusCode::Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_bytes_round_trip() {
        for (byte, expected) in [
            (1u8, StatusCode::Ok),
            (2, StatusCode::SyntaxError),
            (254, StatusCode::NotReady),
            (255, StatusCode::AckNoBody),
        ] {
            let status = StatusCode::from_response(&[byte]).unwrap();
            assert_eq!(status, expected);
            assert_eq!(u8::from(status), byte);
        }
    }

    #[test]
    fn test_every_other_byte_is_rejected() {
        for byte in (0u8..=255).filter(|b| ![1, 2, 254, 255].contains(b)) {
            match StatusCode::from_response(&[byte, b'x']) {
                Err(ResponseError::InvalidStatusByte { byte: Some(got), .. }) => assert_eq!(got, byte),
                other => panic!("byte {byte:#04x}: expected InvalidStatusByte, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_empty_response_has_no_status() {
        let err = StatusCode::from_response(&[]).unwrap_err();
        assert!(matches!(err, ResponseError::InvalidStatusByte { byte: None, .. }));
        assert_eq!(err.field(), "status");
    }

    #[test]
    fn test_only_ok_carries_payload() {
        assert!(StatusCode::Ok.has_payload());
        assert!(!StatusCode::SyntaxError.has_payload());
        assert!(!StatusCode::NotReady.has_payload());
        assert!(!StatusCode::AckNoBody.has_payload());
    }
}

use crate::constants::{FIELD_DELIMITER, PAYLOAD_OFFSET, PAYLOAD_SENTINEL};
use crate::error::{AtlasError, ResponseError};
use crate::status::StatusCode;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::{debug, trace};

/// Decoded view of one raw EZO response: the status plus the
/// comma separated payload fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseFrame {
    status: StatusCode,
    fields: Vec<String>,
    received_at: DateTime<Utc>,
}

impl ResponseFrame {
    /// Decode a raw response captured at `received_at`.
    ///
    /// Only an `Ok` status carries a payload. The payload ends at the first
    /// NUL byte, or at the end of the buffer if there is none.
    pub fn parse(raw: &[u8], received_at: DateTime<Utc>) -> Result<Self, ResponseError> {
        let status = StatusCode::from_response(raw)?;

        let fields = if status.has_payload() {
            split_fields(payload(raw))?
        } else {
            Vec::new()
        };

        debug!(%status, field_count = fields.len(), "Decoded response frame");
        Ok(Self {
            status,
            fields,
            received_at,
        })
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }

    /// Turn device-side rejections into errors, passing through frames the
    /// device accepted (with or without a payload).
    pub fn ensure_accepted(self) -> Result<Self, AtlasError> {
        match self.status {
            StatusCode::Ok | StatusCode::AckNoBody => Ok(self),
            StatusCode::NotReady => Err(AtlasError::DeviceNotReady),
            StatusCode::SyntaxError => Err(AtlasError::DeviceSyntaxError),
        }
    }
}

impl TryFrom<Bytes> for ResponseFrame {
    type Error = ResponseError;

    /// Decode a response that was just read off the bus.
    fn try_from(bytes: Bytes) -> Result<Self, Self::Error> {
        ResponseFrame::parse(&bytes, Utc::now())
    }
}

/// Bytes between the status byte and the sentinel (exclusive).
fn payload(raw: &[u8]) -> &[u8] {
    let body = raw.get(PAYLOAD_OFFSET..).unwrap_or_default();
    match body.iter().position(|&b| b == PAYLOAD_SENTINEL) {
        Some(end) => {
            trace!(
                payload_len = end,
                discarded = body.len() - end,
                "Trimmed response at sentinel"
            );
            &body[..end]
        }
        None => body,
    }
}

fn split_fields(payload: &[u8]) -> Result<Vec<String>, ResponseError> {
    if let Some(pos) = payload.iter().position(|b| !b.is_ascii()) {
        return Err(ResponseError::malformed(
            "body",
            format!("non-ASCII byte {:#04x} at payload offset {}", payload[pos], pos),
        ));
    }
    let text: String = payload.iter().copied().map(char::from).collect();
    Ok(text.split(FIELD_DELIMITER).map(str::to_owned).collect())
}

/// Named access to the fields of a decoded response.
///
/// Out of range reads fail with the caller's field name, never with a
/// bare index error.
pub trait FieldAccessor {
    fn fields(&self) -> &[String];

    fn get_field(&self, name: &str, index: usize) -> Result<&str, ResponseError> {
        match self.fields().get(index) {
            Some(value) => {
                trace!(field = name, index, value = %value, "Read response field");
                Ok(value)
            }
            None => Err(ResponseError::missing(name)),
        }
    }

    /// Fields `start..end`, or `start..` when `end` is `None`. An empty or
    /// out of range selection is reported as missing.
    fn get_fields(&self, name: &str, start: usize, end: Option<usize>) -> Result<&[String], ResponseError> {
        let fields = self.fields();
        let end = end.unwrap_or(fields.len());
        match fields.get(start..end) {
            Some(selected) if !selected.is_empty() => {
                trace!(field = name, start, end, "Read response field range");
                Ok(selected)
            }
            _ => Err(ResponseError::missing_range(name)),
        }
    }
}

impl FieldAccessor for ResponseFrame {
    fn fields(&self) -> &[String] {
        &self.fields
    }
}

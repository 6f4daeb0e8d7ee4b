// Protocol constants for Atlas Scientific EZO circuits in I2C mode

/// Offset of the first payload byte (the status byte precedes it)
pub const PAYLOAD_OFFSET: usize = 1;

/// Terminates the meaningful payload. The bus may hand back more bytes
/// than the device wrote; everything after the first NUL is padding.
pub const PAYLOAD_SENTINEL: u8 = 0x00;

/// Separator between payload fields
pub const FIELD_DELIMITER: char = ',';

/// Vendor reported for every device decoded by this crate
pub const VENDOR: &str = "atlas-scientific";

/// Error code the request layer reports for rejected requests
pub const INVALID_REQUEST_ERROR_CODE: &str = "INVALID_REQUEST_ERROR";

/// Message used when a required response field is absent
pub const MISSING_FIELD_MESSAGE: &str = "expected field missing from response";

/// Message used when a required response field range is absent
pub const MISSING_FIELDS_MESSAGE: &str = "expected fields missing from response";

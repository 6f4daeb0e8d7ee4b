//! Common test utilities and shared imports

// Allow unused imports and dead code since this is a shared module
// used across multiple test files - not all items are used in every test file
#[allow(unused_imports)]
pub use atlas_ezo_lib::error::{AtlasError, RequestError, ResponseError};
#[allow(unused_imports)]
pub use atlas_ezo_lib::{
    CalibrationPoint, CompensationFactor, CompensationFactorSet, DeviceCatalog, DeviceInfo, DeviceOutputUnits,
    DeviceSample, FieldAccessor, ResponseFrame, StatusCode,
};
#[allow(unused_imports)]
pub use bytes::Bytes;
#[allow(unused_imports)]
pub use chrono::{DateTime, TimeZone, Utc};

/// Decode hex string to bytes for testing
#[allow(dead_code)]
pub fn hex_to_bytes(hex_data: &str) -> Bytes {
    Bytes::from(hex::decode(hex_data).expect("Failed to decode hex"))
}

/// Fixed capture time so decoded timestamps can be compared
#[allow(dead_code)]
pub fn captured_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

/// Decode a hex fixture into a frame captured at [`captured_at`]
#[allow(dead_code)]
pub fn frame_from_hex(hex_data: &str) -> ResponseFrame {
    ResponseFrame::parse(&hex_to_bytes(hex_data), captured_at()).expect("Failed to parse frame")
}

/// Route library logs to the test harness output
#[allow(dead_code)]
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// `\x01?I,DO,1.98\x00` - info response from a dissolved oxygen circuit
#[allow(dead_code)]
pub const DO_INFO_RESPONSE: &str = "013f492c444f2c312e393800";

/// `\x01?I,pH,1.98\x00` - info response from a pH circuit
#[allow(dead_code)]
pub const PH_INFO_RESPONSE: &str = "013f492c70482c312e393800";

/// `\x01?O,%,mg/L\x00` - output configuration of a DO circuit
#[allow(dead_code)]
pub const DO_OUTPUT_RESPONSE: &str = "013f4f2c252c6d672f4c00";

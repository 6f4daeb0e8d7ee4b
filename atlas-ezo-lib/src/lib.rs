pub mod calibration;
pub mod catalog;
pub mod compensation;
pub mod constants;
mod descriptor;
pub mod device;
pub mod error;
pub mod frame;
pub mod request;
pub mod status;

// Re-export the types most callers need
pub use calibration::CalibrationPoint;
pub use catalog::{DeviceCatalog, DeviceProfile};
pub use compensation::{CompensationFactor, CompensationFactorSet};
pub use device::{DeviceInfo, DeviceOutputUnits, DeviceSample, OutputUnitSpec, ValueType};
pub use error::{AtlasError, RequestError, ResponseError};
pub use frame::{FieldAccessor, ResponseFrame};
pub use status::StatusCode;

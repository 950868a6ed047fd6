//! Error types for driving configuration.
//!
//! Only host-supplied tuning can fail. The per-tick integrator and the
//! camera update have no error paths.

use std::fmt;

/// A tuning value is out of range.
#[derive(Debug, Clone, PartialEq)]
pub struct DriveConfigError {
    /// Name of the offending parameter.
    pub field: &'static str,
    /// Description of what was invalid.
    pub detail: String,
}

impl DriveConfigError {
    pub(crate) fn new(field: &'static str, detail: impl Into<String>) -> Self {
        Self {
            field,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for DriveConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid drive parameter {}: {}", self.field, self.detail)
    }
}

impl std::error::Error for DriveConfigError {}

/// Result type for driving configuration.
pub type DriveConfigResult<T> = Result<T, DriveConfigError>;

/// Fail with `field` unless `ok` holds.
pub(crate) fn ensure(
    field: &'static str,
    ok: bool,
    detail: impl FnOnce() -> String,
) -> DriveConfigResult<()> {
    if ok {
        Ok(())
    } else {
        Err(DriveConfigError::new(field, detail()))
    }
}

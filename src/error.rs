//! Validation errors raised before any drawing happens.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IconError {
    #[error("Icon size must be positive, got {0}")]
    InvalidSize(u32),

    #[error("Blur sigma must be a finite, non-negative number, got {0}")]
    InvalidBlur(f32),

    #[error("--icns packs the standard icon set and cannot be combined with custom --png sizes")]
    IcnsWithCustomSizes,

    #[error("Unrecognised color: {0}")]
    InvalidColor(String),

    #[error("Unknown ICNS OSType: {0}")]
    UnknownOsType(String),
}

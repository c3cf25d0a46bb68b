#![deny(missing_docs)]
//! Planar multi-channel raster types for image processing

/// raster representation for image processing.
pub mod raster;

/// Error types for the image module.
pub mod error;

/// elementwise raster operations.
pub mod ops;

pub use crate::error::ImageError;
pub use crate::raster::{ImageSize, Raster};

#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the linalg module.
pub mod error;

/// 2x2 matrix types.
pub mod mat2;

/// 2D vector types.
pub mod vec2;

pub use crate::error::LinalgError;
pub use crate::mat2::Mat2F64;
pub use crate::vec2::Vec2F64;

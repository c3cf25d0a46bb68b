//! Filter operations
//!
//! This module provides convolution, kernel generators and smoothing filters.

/// Filter kernels
pub mod kernels;

/// Generic 2D convolution
mod convolution;
pub use convolution::*;

/// Summed area table and box filter
mod integral;
pub use integral::*;

/// Separable filter operations
mod separable;
pub use separable::*;

/// Sobel gradient analysis
mod sobel;
pub use sobel::*;

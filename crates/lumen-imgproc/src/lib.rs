#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// color transformations module.
pub mod color;

/// utilities to draw on images.
pub mod draw;

/// feature detection module.
pub mod features;

/// image filtering module.
pub mod filter;

/// optical flow estimation module.
pub mod flow;

/// utility functions for resizing images.
pub mod resize;

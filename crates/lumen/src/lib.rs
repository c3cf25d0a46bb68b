//! Image filtering, Harris corners and optical flow on planar `f32` rasters.
//!
//! This crate re-exports the workspace crates under short names.

#[doc(inline)]
pub use lumen_image as image;

#[doc(inline)]
pub use lumen_imgproc as imgproc;

#[doc(inline)]
pub use lumen_linalg as linalg;

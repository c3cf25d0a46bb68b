//! Feature detection and description.
//!
//! The Harris detector builds a smoothed structure tensor from Sobel gradients, scores
//! every pixel with the cornerness `det(S) - α·trace(S)²`, suppresses non-maximal
//! responses and describes each surviving pixel with a small patch of differences to its
//! centre.
//!
//! # Example
//!
//! ```
//! use lumen_image::{ImageSize, Raster};
//! use lumen_imgproc::features::{harris_corner_detector, HarrisConfig};
//!
//! let image = Raster::zeros(ImageSize { width: 32, height: 32 }, 3);
//! let corners = harris_corner_detector(&image, &HarrisConfig::default()).unwrap();
//!
//! assert!(corners.is_empty());
//! ```

mod descriptor;
pub use descriptor::*;

mod harris;
pub use harris::*;

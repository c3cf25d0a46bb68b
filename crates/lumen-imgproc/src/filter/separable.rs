use lumen_image::{ImageError, Raster};

use super::{convolve, kernels};

/// Apply a separable filter to a raster.
///
/// The row kernel is convolved first and the column kernel second, both keeping every
/// channel. For kernels that are the two factors of an outer product this matches a single
/// 2D convolution with that product, borders included.
///
/// # Arguments
///
/// * `src` - The source raster.
/// * `kernel_x` - A single row kernel.
/// * `kernel_y` - A single column kernel.
pub fn separable_filter(
    src: &Raster,
    kernel_x: &Raster,
    kernel_y: &Raster,
) -> Result<Raster, ImageError> {
    let tmp = convolve(src, kernel_x, true)?;
    convolve(&tmp, kernel_y, true)
}

/// Blur a raster with a separable gaussian filter.
///
/// The 1D kernel from [`kernels::gaussian_kernel_1d`] is applied along rows and then, transposed,
/// along columns. A non-positive sigma has no kernel and returns an unfiltered copy.
///
/// # Example
///
/// ```
/// use lumen_image::{ImageSize, Raster};
/// use lumen_imgproc::filter::gaussian_blur;
///
/// let mut image = Raster::zeros(ImageSize { width: 9, height: 9 }, 1);
/// image.set(4, 4, 0, 1.0);
///
/// let blurred = gaussian_blur(&image, 1.0).unwrap();
/// let total = blurred.as_slice().iter().sum::<f32>();
///
/// assert!((total - 1.0).abs() < 1e-5);
/// assert!(blurred.get(4, 4, 0) < 1.0);
/// ```
pub fn gaussian_blur(src: &Raster, sigma: f32) -> Result<Raster, ImageError> {
    let kernel_x = kernels::gaussian_kernel_1d(sigma);
    if kernel_x.is_empty() {
        return Ok(src.clone());
    }
    let kernel_y = kernel_x.transpose();
    separable_filter(src, &kernel_x, &kernel_y)
}

/// Blur a raster with a full 2D gaussian kernel.
///
/// Numerically equivalent to [`gaussian_blur`] at a higher cost per pixel.
pub fn gaussian_blur_2d(src: &Raster, sigma: f32) -> Result<Raster, ImageError> {
    let kernel = kernels::gaussian_kernel(sigma);
    if kernel.is_empty() {
        return Ok(src.clone());
    }
    convolve(src, &kernel, true)
}

use lumen_image::{ImageError, Raster};

/// Define the RGB weights for the grayscale conversion.
const RW: f32 = 0.299;
const GW: f32 = 0.587;
const BW: f32 = 0.114;

/// Convert an RGB raster to grayscale using the formula:
///
/// Y = 0.299 * R + 0.587 * G + 0.114 * B
///
/// # Arguments
///
/// * `src` - The input RGB raster.
///
/// # Returns
///
/// A new single channel raster with the same size.
///
/// # Errors
///
/// The input raster must have 3 channels.
///
/// # Example
///
/// ```
/// use lumen_image::{ImageSize, Raster};
/// use lumen_imgproc::color::gray_from_rgb;
///
/// let image = Raster::from_size_val(ImageSize { width: 4, height: 5 }, 3, 1.0);
/// let gray = gray_from_rgb(&image).unwrap();
///
/// assert_eq!(gray.num_channels(), 1);
/// assert!((gray.get(0, 0, 0) - 1.0).abs() < 1e-6);
/// ```
pub fn gray_from_rgb(src: &Raster) -> Result<Raster, ImageError> {
    if src.num_channels() != 3 {
        return Err(ImageError::InvalidChannelCount(src.num_channels(), 3));
    }

    let plane = src.size().area();
    let rgb = src.as_slice();
    let (r, rest) = rgb.split_at(plane);
    let (g, b) = rest.split_at(plane);

    let data = r
        .iter()
        .zip(g)
        .zip(b)
        .map(|((&r, &g), &b)| RW * r + GW * g + BW * b)
        .collect();

    Raster::new(src.size(), 1, data)
}

use lumen_image::{ImageError, Raster};

use super::{convolve, gaussian_blur, kernels};
use crate::color::rgb_from_hsv;

/// Compute the gradient magnitude and direction of a raster with the Sobel operator.
///
/// The horizontal and vertical responses are summed over channels before combining them.
///
/// # Returns
///
/// A pair of single channel rasters: `sqrt(gx² + gy²)` and `atan2(gy, gx)` in radians.
pub fn sobel_image(src: &Raster) -> Result<(Raster, Raster), ImageError> {
    let gx = convolve(src, &kernels::sobel_x_kernel(), false)?;
    let gy = convolve(src, &kernels::sobel_y_kernel(), false)?;

    let (magnitude, direction): (Vec<f32>, Vec<f32>) = gx
        .as_slice()
        .iter()
        .zip(gy.as_slice())
        .map(|(&x, &y)| (x.hypot(y), y.atan2(x)))
        .unzip();

    Ok((
        Raster::new(src.size(), 1, magnitude)?,
        Raster::new(src.size(), 1, direction)?,
    ))
}

/// Render the Sobel gradient of a raster as a colour image.
///
/// Hue encodes the normalized gradient direction and saturation the normalized magnitude,
/// with the value channel at twice the magnitude. The HSV image is rescaled to `[0, 1]`,
/// converted to RGB and smoothed with a gaussian of sigma 2.
pub fn colorize_sobel(src: &Raster) -> Result<Raster, ImageError> {
    let (mut magnitude, mut direction) = sobel_image(src)?;
    magnitude.feature_normalize();
    direction.feature_normalize();

    let mut data = Vec::with_capacity(3 * magnitude.size().area());
    data.extend_from_slice(direction.as_slice());
    data.extend_from_slice(magnitude.as_slice());
    data.extend(magnitude.as_slice().iter().map(|m| 2.0 * m));

    let mut colorized = Raster::new(src.size(), 3, data)?;
    colorized.feature_normalize();
    rgb_from_hsv(&mut colorized)?;

    gaussian_blur(&colorized, 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use lumen_image::ImageSize;
    use std::f32::consts::FRAC_PI_2;

    fn vertical_edge() -> Raster {
        let mut image = Raster::zeros(ImageSize { width: 8, height: 6 }, 1);
        for y in 0..6 {
            for x in 4..8 {
                image.set(x, y, 0, 1.0);
            }
        }
        image
    }

    #[test]
    fn sobel_vertical_edge() -> Result<(), ImageError> {
        let (magnitude, direction) = sobel_image(&vertical_edge())?;
        // gx = 1 + 2 + 1 across the edge, gy vanishes
        assert_relative_eq!(magnitude.get(3, 2, 0), 4.0, epsilon = 1e-6);
        assert_relative_eq!(magnitude.get(4, 2, 0), 4.0, epsilon = 1e-6);
        assert_relative_eq!(direction.get(4, 2, 0), 0.0, epsilon = 1e-6);
        assert_eq!(magnitude.get(1, 2, 0), 0.0);
        Ok(())
    }

    #[test]
    fn sobel_horizontal_edge_direction() -> Result<(), ImageError> {
        let image = vertical_edge().transpose();
        let (_, direction) = sobel_image(&image)?;
        assert_relative_eq!(direction.get(2, 4, 0), FRAC_PI_2, epsilon = 1e-6);
        Ok(())
    }

    #[test]
    fn colorize_sobel_shape_and_range() -> Result<(), ImageError> {
        let image = vertical_edge();
        let colorized = colorize_sobel(&image)?;
        assert_eq!(colorized.num_channels(), 3);
        assert_eq!(colorized.size(), image.size());
        assert!(colorized
            .as_slice()
            .iter()
            .all(|v| (-1e-5..=1.0 + 1e-5).contains(v)));
        Ok(())
    }
}

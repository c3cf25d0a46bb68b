use lumen_image::{ImageSize, Raster};

/// Interpolation used by [`resize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationMode {
    /// Nearest neighbor.
    Nearest,
    /// Bilinear interpolation.
    #[default]
    Bilinear,
}

/// Sample a raster at a fractional position with the nearest pixel.
pub fn nn_interpolate(src: &Raster, x: f32, y: f32, ch: usize) -> f32 {
    src.get(x.round() as isize, y.round() as isize, ch as isize)
}

/// Sample a raster at a fractional position with bilinear weights.
///
/// Neighbours outside the raster are read with edge clamping.
pub fn bilinear_interpolate(src: &Raster, x: f32, y: f32, ch: usize) -> f32 {
    let (x0, y0) = (x.floor(), y.floor());
    let (dx, dy) = (x - x0, y - y0);
    let (x0, y0, ch) = (x0 as isize, y0 as isize, ch as isize);

    let top = (1.0 - dx) * src.get(x0, y0, ch) + dx * src.get(x0 + 1, y0, ch);
    let bottom = (1.0 - dx) * src.get(x0, y0 + 1, ch) + dx * src.get(x0 + 1, y0 + 1, ch);

    (1.0 - dy) * top + dy * bottom
}

/// Resize a raster to `new_size`, keeping all channels.
///
/// Pixel centres are aligned: destination pixel `x` samples the source at
/// `x * (W / w) - 0.5 + 0.5 * (W / w)`.
///
/// # Example
///
/// ```
/// use lumen_image::{ImageSize, Raster};
/// use lumen_imgproc::resize::{resize, InterpolationMode};
///
/// let image = Raster::from_size_val(ImageSize { width: 4, height: 4 }, 3, 0.5);
/// let small = resize(&image, ImageSize { width: 2, height: 2 }, InterpolationMode::Nearest);
///
/// assert_eq!(small.width(), 2);
/// assert_eq!(small.num_channels(), 3);
/// assert_eq!(small.get(1, 1, 2), 0.5);
/// ```
pub fn resize(src: &Raster, new_size: ImageSize, interpolation: InterpolationMode) -> Raster {
    let mut dst = Raster::zeros(new_size, src.num_channels());
    if dst.is_empty() || src.is_empty() {
        return dst;
    }

    let ax = src.width() as f32 / new_size.width as f32;
    let bx = -0.5 + 0.5 * ax;
    let ay = src.height() as f32 / new_size.height as f32;
    let by = -0.5 + 0.5 * ay;

    let plane = new_size.area();
    for (ch, dst_plane) in dst.as_slice_mut().chunks_exact_mut(plane).enumerate() {
        for (i, px) in dst_plane.iter_mut().enumerate() {
            let x = (i % new_size.width) as f32 * ax + bx;
            let y = (i / new_size.width) as f32 * ay + by;
            *px = match interpolation {
                InterpolationMode::Nearest => nn_interpolate(src, x, y, ch),
                InterpolationMode::Bilinear => bilinear_interpolate(src, x, y, ch),
            };
        }
    }

    dst
}

/// Nearest neighbor resize.
pub fn nn_resize(src: &Raster, width: usize, height: usize) -> Raster {
    resize(src, ImageSize { width, height }, InterpolationMode::Nearest)
}

/// Bilinear resize.
pub fn bilinear_resize(src: &Raster, width: usize, height: usize) -> Raster {
    resize(src, ImageSize { width, height }, InterpolationMode::Bilinear)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use lumen_image::ImageError;

    fn ramp_x(width: usize, height: usize) -> Result<Raster, ImageError> {
        let data = (0..width * height).map(|i| (i % width) as f32).collect();
        Raster::new(ImageSize { width, height }, 1, data)
    }

    #[test]
    fn nn_resize_upscale_repeats_pixels() -> Result<(), ImageError> {
        let image = ramp_x(2, 1)?;
        let up = nn_resize(&image, 4, 1);
        assert_eq!(up.as_slice(), &[0.0, 0.0, 1.0, 1.0]);
        Ok(())
    }

    #[test]
    fn bilinear_resize_interpolates() -> Result<(), ImageError> {
        let image = ramp_x(4, 2)?;
        let down = bilinear_resize(&image, 2, 1);
        // destination centres land halfway between source pixels
        assert_relative_eq!(down.get(0, 0, 0), 0.5, epsilon = 1e-6);
        assert_relative_eq!(down.get(1, 0, 0), 2.5, epsilon = 1e-6);
        Ok(())
    }

    #[test]
    fn bilinear_identity_size() -> Result<(), ImageError> {
        let image = ramp_x(5, 3)?;
        let same = bilinear_resize(&image, 5, 3);
        for (a, b) in same.as_slice().iter().zip(image.as_slice()) {
            assert_relative_eq!(a, b, epsilon = 1e-6);
        }
        Ok(())
    }

    #[test]
    fn resize_to_empty() -> Result<(), ImageError> {
        let image = ramp_x(5, 3)?;
        assert!(nn_resize(&image, 0, 3).is_empty());
        Ok(())
    }
}

use lumen_image::{ImageError, Raster};
use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

/// Convolve a raster with a kernel raster.
///
/// For every output pixel `(x, y, z)` the kernel footprint is summed as
/// `kernel(xf, yf, kz) * src(x + xf - kw / 2, y + yf - kh / 2, z)`, where `kz` is `0` for a
/// single channel kernel (broadcast to every channel) or `z` otherwise. Samples outside the
/// source replicate the nearest border pixel.
///
/// # Arguments
///
/// * `src` - The source raster with `C` channels.
/// * `kernel` - The kernel raster with 1 or `C` channels.
/// * `preserve_channels` - Keep the `C` result channels, or sum them into a single channel.
///
/// # Errors
///
/// The kernel must have 1 channel or as many channels as the source.
///
/// # Example
///
/// ```
/// use lumen_image::{ImageSize, Raster};
/// use lumen_imgproc::filter::{convolve, kernels};
///
/// let image = Raster::from_size_val(ImageSize { width: 8, height: 6 }, 3, 0.5);
/// let blurred = convolve(&image, &kernels::box_kernel(3), true).unwrap();
/// let edges = convolve(&image, &kernels::highpass_kernel(), false).unwrap();
///
/// assert_eq!(blurred.num_channels(), 3);
/// assert_eq!(edges.num_channels(), 1);
/// assert!((blurred.get(4, 3, 1) - 0.5).abs() < 1e-6);
/// assert!(edges.get(4, 3, 0).abs() < 1e-6);
/// ```
pub fn convolve(
    src: &Raster,
    kernel: &Raster,
    preserve_channels: bool,
) -> Result<Raster, ImageError> {
    let channels = src.num_channels();
    let kernel_channels = kernel.num_channels();
    if kernel_channels != 1 && kernel_channels != channels {
        return Err(ImageError::InvalidChannelCount(kernel_channels, channels));
    }

    let mut dst = Raster::zeros(src.size(), channels);

    if !dst.is_empty() && !kernel.is_empty() {
        let (width, height) = (src.width(), src.height());
        let (kw, kh) = (kernel.width(), kernel.height());
        let (half_w, half_h) = ((kw / 2) as isize, (kh / 2) as isize);
        let kernel_plane = kw * kh;
        let kernel_data = kernel.as_slice();

        // every row of every channel plane is independent
        dst.as_slice_mut()
            .par_chunks_exact_mut(width)
            .enumerate()
            .for_each(|(row_idx, row)| {
                let z = row_idx / height;
                let y = (row_idx % height) as isize;
                let kz = if kernel_channels == 1 { 0 } else { z };
                let weights = &kernel_data[kz * kernel_plane..(kz + 1) * kernel_plane];

                for (x, dst_pixel) in row.iter_mut().enumerate() {
                    let x = x as isize;
                    let mut value = 0.0;
                    for (yf, weights_row) in weights.chunks_exact(kw).enumerate() {
                        let sy = y + yf as isize - half_h;
                        for (xf, &w) in weights_row.iter().enumerate() {
                            let sx = x + xf as isize - half_w;
                            value += w * src.get(sx, sy, z as isize);
                        }
                    }
                    *dst_pixel = value;
                }
            });
    }

    if preserve_channels {
        return Ok(dst);
    }

    Ok(collapse_channels(&dst))
}

/// Sum all channels of a raster pixel by pixel into a single channel raster.
pub fn collapse_channels(src: &Raster) -> Raster {
    let mut dst = Raster::zeros(src.size(), 1);
    let plane = src.size().area();
    if plane == 0 {
        return dst;
    }
    for channel in src.as_slice().chunks_exact(plane) {
        dst.as_slice_mut()
            .iter_mut()
            .zip(channel)
            .for_each(|(d, &s)| *d += s);
    }
    dst
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::kernels;
    use approx::assert_relative_eq;
    use lumen_image::ImageSize;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn random_raster(width: usize, height: usize, channels: usize, seed: u64) -> Raster {
        let mut rng = StdRng::seed_from_u64(seed);
        let data = (0..width * height * channels)
            .map(|_| rng.random_range(0.0..1.0))
            .collect();
        Raster::new(ImageSize { width, height }, channels, data).unwrap()
    }

    /// Straight transcription of the convolution sum, no parallelism.
    fn convolve_naive(src: &Raster, kernel: &Raster) -> Raster {
        let mut dst = Raster::zeros(src.size(), src.num_channels());
        let (kw, kh) = (kernel.width() as isize, kernel.height() as isize);
        for z in 0..src.num_channels() as isize {
            for y in 0..src.height() as isize {
                for x in 0..src.width() as isize {
                    let mut v = 0.0;
                    for yf in 0..kh {
                        for xf in 0..kw {
                            let kz = if kernel.num_channels() == 1 { 0 } else { z };
                            v += kernel.get(xf, yf, kz)
                                * src.get(x + xf - kw / 2, y + yf - kh / 2, z);
                        }
                    }
                    dst.set(x, y, z, v);
                }
            }
        }
        dst
    }

    #[test]
    fn convolve_identity() -> Result<(), ImageError> {
        let image = random_raster(9, 7, 3, 0);
        let identity = Raster::from_size_val(ImageSize { width: 1, height: 1 }, 1, 1.0);
        let out = convolve(&image, &identity, true)?;
        for (a, b) in out.as_slice().iter().zip(image.as_slice()) {
            assert_relative_eq!(a, b, epsilon = 1e-6);
        }
        Ok(())
    }

    #[test]
    fn convolve_matches_naive() -> Result<(), ImageError> {
        let image = random_raster(11, 8, 2, 1);
        for kernel in [
            kernels::box_kernel(3),
            kernels::gaussian_kernel(1.0),
            kernels::sobel_x_kernel(),
            kernels::emboss_kernel(),
            kernels::gaussian_kernel_1d(0.7),
        ] {
            let out = convolve(&image, &kernel, true)?;
            let expected = convolve_naive(&image, &kernel);
            for (a, b) in out.as_slice().iter().zip(expected.as_slice()) {
                assert_relative_eq!(a, b, epsilon = 1e-5);
            }
        }
        Ok(())
    }

    #[test]
    fn convolve_replicates_border() -> Result<(), ImageError> {
        // a single row ramp; a horizontal box filter at x = 0 sees [0, 0, 1]
        let image = Raster::new(ImageSize { width: 3, height: 1 }, 1, vec![0.0, 1.0, 2.0])?;
        let kernel = Raster::from_size_val(ImageSize { width: 3, height: 1 }, 1, 1.0);
        let out = convolve(&image, &kernel, true)?;
        assert_eq!(out.as_slice(), &[1.0, 3.0, 5.0]);
        Ok(())
    }

    #[test]
    fn convolve_multichannel_kernel() -> Result<(), ImageError> {
        let image = Raster::from_size_val(ImageSize { width: 4, height: 4 }, 2, 1.0);
        let kernel = Raster::new(ImageSize { width: 1, height: 1 }, 2, vec![2.0, -3.0])?;

        let out = convolve(&image, &kernel, true)?;
        assert_eq!(out.get(1, 1, 0), 2.0);
        assert_eq!(out.get(1, 1, 1), -3.0);

        let collapsed = convolve(&image, &kernel, false)?;
        assert_eq!(collapsed.num_channels(), 1);
        assert_eq!(collapsed.get(2, 3, 0), -1.0);
        Ok(())
    }

    #[test]
    fn convolve_rejects_kernel_channels() {
        let image = Raster::zeros(ImageSize { width: 4, height: 4 }, 3);
        let kernel = Raster::zeros(ImageSize { width: 3, height: 3 }, 2);
        assert_eq!(
            convolve(&image, &kernel, true),
            Err(ImageError::InvalidChannelCount(2, 3))
        );
    }

    #[test]
    fn convolve_empty_inputs() -> Result<(), ImageError> {
        let empty = Raster::zeros(ImageSize { width: 0, height: 0 }, 1);
        let out = convolve(&empty, &kernels::box_kernel(3), false)?;
        assert!(out.is_empty());

        // an empty kernel sums nothing
        let image = random_raster(4, 4, 1, 2);
        let out = convolve(&image, &kernels::gaussian_kernel(0.0), true)?;
        assert!(out.as_slice().iter().all(|&v| v == 0.0));
        Ok(())
    }

    #[test]
    fn highpass_flat_is_zero() -> Result<(), ImageError> {
        let image = Raster::from_size_val(ImageSize { width: 6, height: 5 }, 3, 0.3);
        let out = convolve(&image, &kernels::highpass_kernel(), false)?;
        assert!(out.as_slice().iter().all(|v| v.abs() < 1e-6));

        let sharp = convolve(&image, &kernels::sharpen_kernel(), true)?;
        for v in sharp.as_slice() {
            assert_relative_eq!(*v, 0.3, epsilon = 1e-6);
        }
        Ok(())
    }
}

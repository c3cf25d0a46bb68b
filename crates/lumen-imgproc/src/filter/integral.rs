use lumen_image::Raster;
use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::{ParallelSlice, ParallelSliceMut},
};

/// Compute the summed area table of a raster.
///
/// Each output value is the inclusive sum of all pixels above and to the left of it in the
/// same channel:
///
/// `I(x, y) = im(x, y) + I(x, y - 1) + I(x - 1, y) - I(x - 1, y - 1)`
///
/// with neighbours outside the raster counted as zero.
///
/// # Example
///
/// ```
/// use lumen_image::{ImageSize, Raster};
/// use lumen_imgproc::filter::integral_image;
///
/// let image = Raster::from_size_val(ImageSize { width: 3, height: 2 }, 1, 1.0);
/// let integral = integral_image(&image);
///
/// assert_eq!(integral.as_slice(), &[1.0, 2.0, 3.0, 2.0, 4.0, 6.0]);
/// ```
pub fn integral_image(src: &Raster) -> Raster {
    let mut dst = Raster::zeros(src.size(), src.num_channels());
    let (width, plane) = (src.width(), src.size().area());
    if plane == 0 {
        return dst;
    }

    dst.as_slice_mut()
        .par_chunks_exact_mut(plane)
        .zip(src.as_slice().par_chunks_exact(plane))
        .for_each(|(integ, im)| {
            for i in 0..plane {
                let (x, y) = (i % width, i / width);
                let up = if y > 0 { integ[i - width] } else { 0.0 };
                let left = if x > 0 { integ[i - 1] } else { 0.0 };
                let diag = if x > 0 && y > 0 {
                    integ[i - width - 1]
                } else {
                    0.0
                };
                integ[i] = im[i] + up + left - diag;
            }
        });

    dst
}

/// Box filter a raster in constant time per pixel using its integral image.
///
/// The window around `(x, y)` is `[x - r, x + r] × [y - r, y + r]` with `r = kernel_size / 2`,
/// clipped to the raster. The window sum comes from four corner lookups into the summed
/// area table, where corners outside the raster contribute zero, and is divided by the
/// number of pixels actually inside the clipped window, so border pixels get an unbiased
/// local mean.
///
/// # Arguments
///
/// * `src` - The source raster, any number of channels.
/// * `kernel_size` - The nominal window size.
pub fn box_filter_integral(src: &Raster, kernel_size: usize) -> Raster {
    let integ = integral_image(src);
    let mut dst = Raster::zeros(src.size(), src.num_channels());
    let (width, height, plane) = (src.width(), src.height(), src.size().area());
    if plane == 0 {
        return dst;
    }

    let radius = kernel_size / 2;

    dst.as_slice_mut()
        .par_chunks_exact_mut(plane)
        .zip(integ.as_slice().par_chunks_exact(plane))
        .for_each(|(out, table)| {
            let at = |x: usize, y: usize| table[x + y * width];
            for (i, px) in out.iter_mut().enumerate() {
                let (x, y) = (i % width, i / width);
                let x0 = x.saturating_sub(radius);
                let y0 = y.saturating_sub(radius);
                let x1 = (x + radius).min(width - 1);
                let y1 = (y + radius).min(height - 1);

                let mut sum = at(x1, y1);
                if x0 > 0 {
                    sum -= at(x0 - 1, y1);
                }
                if y0 > 0 {
                    sum -= at(x1, y0 - 1);
                }
                if x0 > 0 && y0 > 0 {
                    sum += at(x0 - 1, y0 - 1);
                }

                let count = (x1 - x0 + 1) * (y1 - y0 + 1);
                *px = sum / count as f32;
            }
        });

    dst
}

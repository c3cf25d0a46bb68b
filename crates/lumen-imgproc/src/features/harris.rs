use lumen_image::{ImageError, Raster};
use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

use super::{describe_index, Descriptor};
use crate::{
    draw,
    filter::{convolve, gaussian_blur, kernels},
};

/// The `α` weight of the trace term in the cornerness response.
pub const HARRIS_ALPHA: f32 = 0.06;

/// Value written over suppressed responses by [`nms_response`].
pub const NMS_SENTINEL: f32 = -999_999.0;

/// Starting capacity of the corner index buffer.
pub const INITIAL_CORNER_CAPACITY: usize = 100;

/// Neighbourhood visited by [`nms_response`] around each pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NmsWindow {
    /// The full `[x - w, x + w] × [y - w, y + w]` window clipped to the image.
    #[default]
    Symmetric,
    /// The half-open `[x - w, x + w) × [y - w, y + w)` window, skipping negative
    /// coordinates and clamping past the far edges.
    Legacy,
}

/// Parameters of the Harris corner detector.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HarrisConfig {
    /// Standard deviation of the gaussian window over the structure tensor.
    pub sigma: f32,
    /// Minimum cornerness to keep a pixel.
    pub threshold: f32,
    /// Half size of the non-maximum suppression window.
    pub nms_radius: usize,
    /// Shape of the non-maximum suppression window.
    pub nms_window: NmsWindow,
}

impl Default for HarrisConfig {
    fn default() -> Self {
        Self {
            sigma: 2.0,
            threshold: 50.0,
            nms_radius: 3,
            nms_window: NmsWindow::Symmetric,
        }
    }
}

impl HarrisConfig {
    /// Set the structure tensor smoothing.
    pub fn with_sigma(mut self, sigma: f32) -> Self {
        self.sigma = sigma;
        self
    }

    /// Set the response threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the suppression radius.
    pub fn with_nms_radius(mut self, nms_radius: usize) -> Self {
        self.nms_radius = nms_radius;
        self
    }

    /// Set the suppression window shape.
    pub fn with_nms_window(mut self, nms_window: NmsWindow) -> Self {
        self.nms_window = nms_window;
        self
    }
}

/// Compute the smoothed structure tensor of a raster.
///
/// Sobel gradients are summed over the input channels, giving `Ix` and `Iy`.
///
/// # Returns
///
/// A 3 channel raster holding `Ix²`, `Iy²` and `Ix·Iy`, blurred with a separable gaussian
/// of standard deviation `sigma`. A non-positive `sigma` leaves the tensor unsmoothed.
pub fn structure_matrix(src: &Raster, sigma: f32) -> Result<Raster, ImageError> {
    let ix = convolve(src, &kernels::sobel_x_kernel(), false)?;
    let iy = convolve(src, &kernels::sobel_y_kernel(), false)?;

    let plane = src.size().area();
    let mut data = vec![0.0; 3 * plane];
    {
        let (ixx, rest) = data.split_at_mut(plane);
        let (iyy, ixy) = rest.split_at_mut(plane);
        for (i, (&gx, &gy)) in ix.as_slice().iter().zip(iy.as_slice()).enumerate() {
            ixx[i] = gx * gx;
            iyy[i] = gy * gy;
            ixy[i] = gx * gy;
        }
    }

    let tensor = Raster::new(src.size(), 3, data)?;
    gaussian_blur(&tensor, sigma)
}

/// Compute the Harris cornerness `det(S) - α·trace(S)²` of a structure tensor.
///
/// # Errors
///
/// The tensor must have 3 channels, as produced by [`structure_matrix`].
pub fn cornerness_response(tensor: &Raster) -> Result<Raster, ImageError> {
    if tensor.num_channels() != 3 {
        return Err(ImageError::InvalidChannelCount(tensor.num_channels(), 3));
    }

    let plane = tensor.size().area();
    let s = tensor.as_slice();
    let (sxx, rest) = s.split_at(plane);
    let (syy, sxy) = rest.split_at(plane);

    let data = sxx
        .iter()
        .zip(syy)
        .zip(sxy)
        .map(|((&xx, &yy), &xy)| {
            let det = xx * yy - xy * xy;
            let trace = xx + yy;
            det - HARRIS_ALPHA * trace * trace
        })
        .collect();

    Raster::new(tensor.size(), 1, data)
}

/// Suppress responses that are not local maxima.
///
/// Every pixel with a strictly greater raw response inside its window is replaced by
/// [`NMS_SENTINEL`]; ties survive. Comparisons always use the input values, so the result
/// does not depend on the visiting order.
///
/// # Arguments
///
/// * `response` - A single channel response map.
/// * `radius` - Half size of the window.
/// * `window` - The window shape.
pub fn nms_response(response: &Raster, radius: usize, window: NmsWindow) -> Raster {
    let mut dst = response.clone();
    let (width, height) = (response.width(), response.height());
    if width == 0 || height == 0 {
        return dst;
    }

    let plane = response.size().area();
    // a window wider than the image covers all of it
    let w = radius.min(width.max(height)) as isize;

    dst.as_slice_mut()[..plane]
        .par_chunks_exact_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            let y = y as isize;
            for (x, px) in row.iter_mut().enumerate() {
                let x = x as isize;
                let value = response.get(x, y, 0);
                let (ys, xs) = match window {
                    NmsWindow::Symmetric => (
                        (y - w).max(0)..(y + w + 1).min(height as isize),
                        (x - w).max(0)..(x + w + 1).min(width as isize),
                    ),
                    NmsWindow::Legacy => ((y - w).max(0)..y + w, (x - w).max(0)..x + w),
                };
                let suppressed = ys
                    .flat_map(|wy| xs.clone().map(move |wx| (wx, wy)))
                    .any(|(wx, wy)| response.get(wx, wy, 0) > value);
                if suppressed {
                    *px = NMS_SENTINEL;
                }
            }
        });

    dst
}

/// Detect and describe Harris corners.
///
/// Pixels are visited in raster order and kept when their suppressed response reaches
/// `config.threshold`, so the descriptors come out sorted by row and then column.
///
/// # Example
///
/// ```
/// use lumen_image::{ImageSize, Raster};
/// use lumen_imgproc::features::{harris_corner_detector, HarrisConfig};
///
/// let mut image = Raster::zeros(ImageSize { width: 21, height: 21 }, 1);
/// for y in 6..15 {
///     for x in 6..15 {
///         image.set(x, y, 0, 1.0);
///     }
/// }
///
/// let config = HarrisConfig::default()
///     .with_sigma(1.0)
///     .with_threshold(1.0)
///     .with_nms_radius(2);
/// let corners = harris_corner_detector(&image, &config).unwrap();
///
/// assert_eq!(corners.len(), 4);
/// assert_eq!((corners[0].x(), corners[0].y()), (6, 6));
/// ```
pub fn harris_corner_detector(
    src: &Raster,
    config: &HarrisConfig,
) -> Result<Vec<Descriptor>, ImageError> {
    let tensor = structure_matrix(src, config.sigma)?;
    let response = cornerness_response(&tensor)?;
    let suppressed = nms_response(&response, config.nms_radius, config.nms_window);

    let mut indices = Vec::with_capacity(INITIAL_CORNER_CAPACITY);
    for (i, &r) in suppressed.as_slice().iter().enumerate() {
        if r >= config.threshold {
            if indices.len() == indices.capacity() {
                indices.reserve_exact(indices.capacity());
            }
            indices.push(i);
        }
    }

    log::debug!(
        "harris: {} corners in {} image (sigma {}, threshold {}, nms {})",
        indices.len(),
        src.size(),
        config.sigma,
        config.threshold,
        config.nms_radius
    );

    Ok(indices.into_iter().map(|i| describe_index(src, i)).collect())
}

/// Detect and describe Harris corners with positional parameters.
///
/// Same as [`harris_corner_detector`] with a symmetric suppression window.
pub fn harris_detect(
    src: &Raster,
    sigma: f32,
    threshold: f32,
    nms_radius: usize,
) -> Result<Vec<Descriptor>, ImageError> {
    let config = HarrisConfig {
        sigma,
        threshold,
        nms_radius,
        nms_window: NmsWindow::Symmetric,
    };
    harris_corner_detector(src, &config)
}

/// Detect Harris corners and mark each one on the image.
///
/// # Returns
///
/// The number of corners drawn.
pub fn detect_and_draw_corners(
    image: &mut Raster,
    config: &HarrisConfig,
) -> Result<usize, ImageError> {
    let corners = harris_corner_detector(image, config)?;
    draw::mark_corners(image, &corners);
    Ok(corners.len())
}

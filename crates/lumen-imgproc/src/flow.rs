//! Dense Lucas–Kanade optical flow between two frames.
//!
//! The estimator builds a five channel time structure tensor `{Ix², Iy², IxIy, IxIt, IyIt}`,
//! averages it over a square window with [`box_filter_integral`], and at every sampled pixel
//! solves
//!
//! ```text
//! | Ix²  IxIy | |vx|     |IxIt|
//! | IxIy Iy²  | |vy| = - |IyIt|
//! ```
//!
//! Pixels where the 2×2 system has no inverse get zero velocity and are reported as
//! [`DegenerateFlowRegion`]s.
//!
//! # Example
//!
//! ```
//! use lumen_image::{ImageSize, Raster};
//! use lumen_imgproc::flow::{estimate_flow, FlowConfig};
//!
//! let frame = Raster::from_size_val(ImageSize { width: 64, height: 48 }, 3, 0.5);
//! let estimate = estimate_flow(&frame, &frame, &FlowConfig::default()).unwrap();
//!
//! assert_eq!(estimate.velocity.width(), 8);
//! assert_eq!(estimate.velocity.height(), 6);
//! assert!(estimate.velocity.as_slice().iter().all(|&v| v == 0.0));
//! ```

use std::borrow::Cow;

use lumen_image::{ImageError, ImageSize, Raster};
use lumen_linalg::{LinalgError, Mat2F64, Vec2F64};
use rayon::prelude::*;

use crate::{
    color::gray_from_rgb,
    draw,
    filter::{box_filter_integral, convolve, gaussian_blur, kernels},
};

/// Number of channels of the time structure tensor.
pub const TENSOR_CHANNELS: usize = 5;

/// An error type for the flow module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum FlowError {
    /// Error from an image operation.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Error when the two frames differ in size or channel count.
    #[error("Frame geometry differs: current {0} with {1} channels, previous {2} with {3} channels")]
    FrameMismatch(ImageSize, usize, ImageSize, usize),

    /// Error when the sampling stride is zero.
    #[error("Velocity stride must be positive")]
    InvalidStride,
}

/// Parameters of the flow estimator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlowConfig {
    /// Window size of the box filter over the time structure tensor.
    pub smooth_window: usize,
    /// Distance in pixels between velocity samples.
    pub stride: usize,
    /// Bound on each velocity component before smoothing.
    pub max_velocity: f32,
    /// Standard deviation of the gaussian applied to the velocity field.
    pub velocity_sigma: f32,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            smooth_window: 15,
            stride: 8,
            max_velocity: 6.0,
            velocity_sigma: 2.0,
        }
    }
}

impl FlowConfig {
    /// Set the tensor smoothing window.
    pub fn with_smooth_window(mut self, smooth_window: usize) -> Self {
        self.smooth_window = smooth_window;
        self
    }

    /// Set the sampling stride.
    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    /// Set the velocity bound.
    pub fn with_max_velocity(mut self, max_velocity: f32) -> Self {
        self.max_velocity = max_velocity;
        self
    }

    /// Set the velocity smoothing.
    pub fn with_velocity_sigma(mut self, velocity_sigma: f32) -> Self {
        self.velocity_sigma = velocity_sigma;
        self
    }
}

/// A sampled tensor pixel whose flow system could not be solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DegenerateFlowRegion {
    /// Column in the tensor.
    pub x: usize,
    /// Row in the tensor.
    pub y: usize,
}

/// Result of a flow estimation.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowEstimate {
    /// Velocity field with `vx`, `vy` and a zero third channel.
    pub velocity: Raster,
    /// Samples that fell back to zero velocity, in raster order.
    pub degenerate: Vec<DegenerateFlowRegion>,
}

fn to_gray(frame: &Raster) -> Result<Cow<'_, Raster>, ImageError> {
    match frame.num_channels() {
        1 => Ok(Cow::Borrowed(frame)),
        3 => Ok(Cow::Owned(gray_from_rgb(frame)?)),
        c => Err(ImageError::InvalidChannelCount(c, 3)),
    }
}

/// Compute the windowed time structure tensor of a frame pair.
///
/// RGB frames are converted to grayscale first. Spatial gradients come from the Sobel
/// operator on the current frame and the temporal gradient is `current - previous`.
///
/// # Arguments
///
/// * `current` - The current frame, 1 or 3 channels.
/// * `previous` - The previous frame, same geometry as `current`.
/// * `smooth_window` - Window size of the box filter.
///
/// # Errors
///
/// * [`FlowError::FrameMismatch`] if the frames differ in size or channel count.
/// * [`FlowError::Image`] if the frames have neither 1 nor 3 channels.
pub fn time_structure_matrix(
    current: &Raster,
    previous: &Raster,
    smooth_window: usize,
) -> Result<Raster, FlowError> {
    if current.size() != previous.size() || current.num_channels() != previous.num_channels() {
        return Err(FlowError::FrameMismatch(
            current.size(),
            current.num_channels(),
            previous.size(),
            previous.num_channels(),
        ));
    }

    let current = to_gray(current)?;
    let previous = to_gray(previous)?;

    let ix = convolve(&current, &kernels::sobel_x_kernel(), false)?;
    let iy = convolve(&current, &kernels::sobel_y_kernel(), false)?;

    let plane = current.size().area();
    let mut data = vec![0.0; TENSOR_CHANNELS * plane];
    let it = current
        .as_slice()
        .iter()
        .zip(previous.as_slice())
        .map(|(c, p)| c - p);
    for (i, ((&x, &y), t)) in ix.as_slice().iter().zip(iy.as_slice()).zip(it).enumerate() {
        data[i] = x * x;
        data[i + plane] = y * y;
        data[i + 2 * plane] = x * y;
        data[i + 3 * plane] = x * t;
        data[i + 4 * plane] = y * t;
    }

    let tensor = Raster::new(current.size(), TENSOR_CHANNELS, data)?;
    Ok(box_filter_integral(&tensor, smooth_window))
}

/// Solve the flow equation on a regular grid of tensor pixels.
///
/// Sample `(kx, ky)` reads the tensor at `((stride - 1) / 2 + kx · stride, (stride - 1) / 2 + ky · stride)`,
/// and the field has `width / stride × height / stride` samples.
///
/// # Errors
///
/// * [`FlowError::InvalidStride`] if `stride` is zero.
/// * [`FlowError::Image`] if the tensor does not have 5 channels.
pub fn velocity_image(tensor: &Raster, stride: usize) -> Result<FlowEstimate, FlowError> {
    if stride == 0 {
        return Err(FlowError::InvalidStride);
    }
    if tensor.num_channels() != TENSOR_CHANNELS {
        return Err(ImageError::InvalidChannelCount(tensor.num_channels(), TENSOR_CHANNELS).into());
    }

    let out_size = ImageSize {
        width: tensor.width() / stride,
        height: tensor.height() / stride,
    };
    let offset = (stride - 1) / 2;

    let rows = (0..out_size.height)
        .into_par_iter()
        .map(|ky| {
            (0..out_size.width)
                .map(|kx| solve_flow(tensor, offset + kx * stride, offset + ky * stride))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    let plane = out_size.area();
    let mut data = vec![0.0; 3 * plane];
    let mut degenerate = Vec::new();
    for (i, (v, region)) in rows.into_iter().flatten().enumerate() {
        if let Some(region) = region {
            log::trace!("flow: singular system at ({}, {})", region.x, region.y);
            degenerate.push(region);
        }
        data[i] = v[0];
        data[i + plane] = v[1];
    }

    Ok(FlowEstimate {
        velocity: Raster::new(out_size, 3, data)?,
        degenerate,
    })
}

fn solve_flow(tensor: &Raster, x: usize, y: usize) -> ([f32; 2], Option<DegenerateFlowRegion>) {
    let (xi, yi) = (x as isize, y as isize);
    let s = |ch: isize| tensor.get(xi, yi, ch) as f64;
    let (ixx, iyy, ixy, ixt, iyt) = (s(0), s(1), s(2), s(3), s(4));

    // symmetric, so columns and rows coincide
    let m = Mat2F64::from_cols(Vec2F64::new(ixx, ixy), Vec2F64::new(ixy, iyy));

    match m.solve(Vec2F64::new(-ixt, -iyt)) {
        Ok(v) => ([v.x as f32, v.y as f32], None),
        Err(LinalgError::Singular) => ([0.0, 0.0], Some(DegenerateFlowRegion { x, y })),
    }
}

/// Estimate the optical flow from `previous` to `current`.
///
/// The raw velocity field is bounded to `[-max_velocity, max_velocity]` and smoothed with a
/// gaussian of `velocity_sigma`.
pub fn estimate_flow(
    current: &Raster,
    previous: &Raster,
    config: &FlowConfig,
) -> Result<FlowEstimate, FlowError> {
    if config.stride == 0 {
        return Err(FlowError::InvalidStride);
    }

    let tensor = time_structure_matrix(current, previous, config.smooth_window)?;
    let FlowEstimate {
        mut velocity,
        degenerate,
    } = velocity_image(&tensor, config.stride)?;

    velocity.constrain(config.max_velocity);
    let velocity = gaussian_blur(&velocity, config.velocity_sigma)?;

    log::debug!(
        "flow: {} velocity field from {} frames, {} degenerate samples",
        velocity.size(),
        current.size(),
        degenerate.len()
    );

    Ok(FlowEstimate {
        velocity,
        degenerate,
    })
}

/// Estimate the optical flow with positional parameters and the default post-processing.
///
/// # Returns
///
/// The smoothed velocity field.
pub fn optical_flow(
    current: &Raster,
    previous: &Raster,
    smooth_window: usize,
    stride: usize,
) -> Result<Raster, FlowError> {
    let config = FlowConfig::default()
        .with_smooth_window(smooth_window)
        .with_stride(stride);
    Ok(estimate_flow(current, previous, &config)?.velocity)
}

/// Draw a velocity field over an image in place.
///
/// The sampling stride is recovered as `image width / field width`. Each sample draws a
/// line of `scale · v` from its pixel; a component longer than the image width (for `dx`)
/// or height (for `dy`) is dropped.
///
/// # Errors
///
/// The image must have 3 channels.
pub fn draw_flow(image: &mut Raster, velocity: &Raster, scale: f32) -> Result<(), ImageError> {
    if image.num_channels() != 3 {
        return Err(ImageError::InvalidChannelCount(image.num_channels(), 3));
    }
    if velocity.width() == 0 || velocity.height() == 0 {
        return Ok(());
    }

    let stride = (image.width() / velocity.width()).max(1);
    let (w, h) = (image.width() as f32, image.height() as f32);

    for y in ((stride - 1) / 2..image.height()).step_by(stride) {
        for x in ((stride - 1) / 2..image.width()).step_by(stride) {
            let (vx, vy) = ((x / stride) as isize, (y / stride) as isize);
            let mut dx = scale * velocity.get(vx, vy, 0);
            let mut dy = scale * velocity.get(vx, vy, 1);
            if dx.abs() > w {
                dx = 0.0;
            }
            if dy.abs() > h {
                dy = 0.0;
            }
            draw::draw_line(image, x as f32, y as f32, dx, dy)?;
        }
    }

    Ok(())
}

use lumen_image::{ImageSize, Raster};

fn fixed_kernel3(vals: [[f32; 3]; 3]) -> Raster {
    let mut kernel = Raster::zeros(ImageSize { width: 3, height: 3 }, 1);
    for (y, row) in vals.iter().enumerate() {
        for (x, &v) in row.iter().enumerate() {
            kernel.set(x as isize, y as isize, 0, v);
        }
    }
    kernel
}

/// Side length of the gaussian kernels for `sigma`: `round(6σ) + 1`.
///
/// Returns zero for non-positive or non-finite sigma.
pub fn gaussian_kernel_size(sigma: f32) -> usize {
    if !(sigma.is_finite() && sigma > 0.0) {
        return 0;
    }
    (6.0 * sigma).round() as usize + 1
}

/// Create a box blur kernel.
///
/// # Arguments
///
/// * `kernel_size` - The side length of the square kernel.
///
/// # Returns
///
/// A `kernel_size × kernel_size` single channel kernel whose values sum to one.
pub fn box_kernel(kernel_size: usize) -> Raster {
    let mut kernel = Raster::from_size_val(
        ImageSize {
            width: kernel_size,
            height: kernel_size,
        },
        1,
        1.0,
    );
    kernel.l1_normalize();
    kernel
}

/// Create a 2D gaussian kernel.
///
/// # Arguments
///
/// * `sigma` - The standard deviation of the gaussian.
///
/// # Returns
///
/// A square kernel of side [`gaussian_kernel_size`], sampled around its midpoint and
/// normalized to sum to one. Degenerate sigma gives an empty kernel.
pub fn gaussian_kernel(sigma: f32) -> Raster {
    let size = gaussian_kernel_size(sigma);
    let mut kernel = Raster::zeros(
        ImageSize {
            width: size,
            height: size,
        },
        1,
    );

    let half = (size / 2) as f32;
    let two_sigma_sq = 2.0 * sigma * sigma;
    for y in 0..size {
        for x in 0..size {
            let gx = x as f32 - half;
            let gy = y as f32 - half;
            kernel.set(
                x as isize,
                y as isize,
                0,
                (-(gx * gx + gy * gy) / two_sigma_sq).exp(),
            );
        }
    }

    kernel.l1_normalize();
    kernel
}

/// Create a 1D gaussian kernel as a single row.
///
/// Its [`Raster::transpose`] is the matching column kernel for separable filtering.
pub fn gaussian_kernel_1d(sigma: f32) -> Raster {
    let size = gaussian_kernel_size(sigma);
    let height = if size == 0 { 0 } else { 1 };
    let mut kernel = Raster::zeros(
        ImageSize {
            width: size,
            height,
        },
        1,
    );

    let half = (size / 2) as f32;
    let two_sigma_sq = 2.0 * sigma * sigma;
    for x in 0..size {
        let gx = x as f32 - half;
        kernel.set(x as isize, 0, 0, (-(gx * gx) / two_sigma_sq).exp());
    }

    kernel.l1_normalize();
    kernel
}

/// The 3×3 sobel kernel for horizontal gradients.
pub fn sobel_x_kernel() -> Raster {
    fixed_kernel3([[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]])
}

/// The 3×3 sobel kernel for vertical gradients.
pub fn sobel_y_kernel() -> Raster {
    fixed_kernel3([[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]])
}

/// Identity plus laplacian. Use with `preserve_channels = true`.
pub fn sharpen_kernel() -> Raster {
    fixed_kernel3([[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]])
}

/// Laplacian edge kernel. Use with `preserve_channels = false`.
pub fn highpass_kernel() -> Raster {
    fixed_kernel3([[0.0, -1.0, 0.0], [-1.0, 4.0, -1.0], [0.0, -1.0, 0.0]])
}

/// Diagonal emboss kernel. Use with `preserve_channels = true`.
pub fn emboss_kernel() -> Raster {
    fixed_kernel3([[-2.0, -1.0, 0.0], [-1.0, 1.0, 1.0], [0.0, 1.0, 2.0]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_box_kernel() {
        for size in [1, 3, 4, 7] {
            let kernel = box_kernel(size);
            assert_eq!(kernel.width(), size);
            assert_eq!(kernel.height(), size);
            assert_relative_eq!(kernel.as_slice().iter().sum::<f32>(), 1.0, epsilon = 1e-5);
            assert_relative_eq!(kernel.get(0, 0, 0), 1.0 / (size * size) as f32);
        }
        assert!(box_kernel(0).is_empty());
    }

    #[test]
    fn test_gaussian_kernel() {
        for sigma in [0.5, 1.0, 1.4, 2.0, 3.0] {
            let kernel = gaussian_kernel(sigma);
            let size = gaussian_kernel_size(sigma);
            assert_eq!(kernel.width(), size);
            assert_eq!(kernel.height(), size);
            assert_relative_eq!(kernel.as_slice().iter().sum::<f32>(), 1.0, epsilon = 1e-5);

            // peak at the midpoint, symmetric around it
            let mid = (size / 2) as isize;
            let peak = kernel.get(mid, mid, 0);
            assert!(kernel.as_slice().iter().all(|&v| v <= peak));
            assert_relative_eq!(kernel.get(0, mid, 0), kernel.get(mid, 0, 0));
        }
        assert_eq!(gaussian_kernel_size(1.0), 7);
        assert_eq!(gaussian_kernel_size(2.0), 13);
    }

    #[test]
    fn test_gaussian_kernel_1d() {
        let kernel = gaussian_kernel_1d(1.0);
        assert_eq!(kernel.width(), 7);
        assert_eq!(kernel.height(), 1);
        assert_relative_eq!(kernel.as_slice().iter().sum::<f32>(), 1.0, epsilon = 1e-6);

        let column = kernel.transpose();
        assert_eq!(column.width(), 1);
        assert_eq!(column.height(), 7);

        // the outer product of the 1d kernel is the 2d kernel
        let full = gaussian_kernel(1.0);
        for y in 0..7 {
            for x in 0..7 {
                assert_relative_eq!(
                    full.get(x, y, 0),
                    kernel.get(x, 0, 0) * kernel.get(y, 0, 0),
                    epsilon = 1e-6
                );
            }
        }
    }

    #[test]
    fn test_degenerate_sigma() {
        for sigma in [0.0, -1.0, f32::NAN] {
            assert!(gaussian_kernel(sigma).is_empty());
            assert!(gaussian_kernel_1d(sigma).is_empty());
        }
    }

    #[test]
    fn test_fixed_kernels() {
        let gx = sobel_x_kernel();
        let gy = sobel_y_kernel();
        assert_eq!(gx.as_slice(), &[-1.0, 0.0, 1.0, -2.0, 0.0, 2.0, -1.0, 0.0, 1.0]);
        assert_eq!(gy.as_slice(), &[-1.0, -2.0, -1.0, 0.0, 0.0, 0.0, 1.0, 2.0, 1.0]);
        assert_eq!(gy, gx.transpose());

        assert_eq!(sharpen_kernel().as_slice().iter().sum::<f32>(), 1.0);
        assert_eq!(highpass_kernel().as_slice().iter().sum::<f32>(), 0.0);
        assert_eq!(emboss_kernel().as_slice().iter().sum::<f32>(), 1.0);
    }
}

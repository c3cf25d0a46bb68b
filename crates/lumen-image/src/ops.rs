use crate::{ImageError, Raster};

impl Raster {
    /// Add `v` to every value of channel `ch` in place.
    ///
    /// Channels that do not exist are left alone.
    pub fn shift(&mut self, ch: usize, v: f32) {
        if let Some(plane) = self.channel_slice_mut(ch) {
            plane.iter_mut().for_each(|p| *p += v);
        }
    }

    /// Multiply every value of channel `ch` by `v` in place.
    pub fn scale(&mut self, ch: usize, v: f32) {
        if let Some(plane) = self.channel_slice_mut(ch) {
            plane.iter_mut().for_each(|p| *p *= v);
        }
    }

    /// Clamp every value to the displayable range `[0, 1]` in place.
    pub fn clamp_unit(&mut self) {
        self.as_slice_mut()
            .iter_mut()
            .for_each(|p| *p = p.clamp(0.0, 1.0));
    }

    /// Saturate every value to `[-v, v]` in place.
    ///
    /// # Examples
    ///
    /// ```
    /// use lumen_image::{ImageSize, Raster};
    ///
    /// let mut raster =
    ///     Raster::new(ImageSize { width: 3, height: 1 }, 1, vec![-9.0, 0.5, 9.0]).unwrap();
    /// raster.constrain(6.0);
    ///
    /// assert_eq!(raster.as_slice(), &[-6.0, 0.5, 6.0]);
    /// ```
    pub fn constrain(&mut self, v: f32) {
        let v = v.abs();
        self.as_slice_mut().iter_mut().for_each(|p| {
            if *p < -v {
                *p = -v;
            }
            if *p > v {
                *p = v;
            }
        });
    }

    /// Divide every value by the sum of all values so that they sum to one.
    ///
    /// A raster summing to zero is left unchanged.
    pub fn l1_normalize(&mut self) {
        let sum = self.as_slice().iter().sum::<f32>();
        if sum == 0.0 {
            return;
        }
        self.as_slice_mut().iter_mut().for_each(|p| *p /= sum);
    }

    /// Linearly rescale all values to `[0, 1]` using the raster's min and max.
    ///
    /// A constant raster becomes all zeros.
    pub fn feature_normalize(&mut self) {
        let (low, high) = self
            .as_slice()
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });

        let range = high - low;
        if range != 0.0 && range.is_finite() {
            self.as_slice_mut()
                .iter_mut()
                .for_each(|p| *p = (*p - low) / range);
        } else {
            self.as_slice_mut().iter_mut().for_each(|p| *p = 0.0);
        }
    }
}

fn check_same_geometry(a: &Raster, b: &Raster) -> Result<(), ImageError> {
    if a.size() != b.size() {
        return Err(ImageError::InvalidImageSize(
            a.width(),
            a.height(),
            b.width(),
            b.height(),
        ));
    }
    if a.num_channels() != b.num_channels() {
        return Err(ImageError::InvalidChannelCount(
            b.num_channels(),
            a.num_channels(),
        ));
    }
    Ok(())
}

/// Pixelwise sum of two rasters with the same geometry.
pub fn add(a: &Raster, b: &Raster) -> Result<Raster, ImageError> {
    check_same_geometry(a, b)?;
    let data = a
        .as_slice()
        .iter()
        .zip(b.as_slice())
        .map(|(x, y)| x + y)
        .collect();
    Raster::new(a.size(), a.num_channels(), data)
}

/// Pixelwise difference `a - b` of two rasters with the same geometry.
pub fn sub(a: &Raster, b: &Raster) -> Result<Raster, ImageError> {
    check_same_geometry(a, b)?;
    let data = a
        .as_slice()
        .iter()
        .zip(b.as_slice())
        .map(|(x, y)| x - y)
        .collect();
    Raster::new(a.size(), a.num_channels(), data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ImageSize;
    use approx::assert_relative_eq;

    fn raster(values: &[f32], channels: usize) -> Result<Raster, ImageError> {
        let width = values.len() / channels;
        Raster::new(ImageSize { width, height: 1 }, channels, values.to_vec())
    }

    #[test]
    fn shift_and_scale_touch_one_channel() -> Result<(), ImageError> {
        let mut im = raster(&[1.0, 2.0, 3.0, 4.0], 2)?;
        im.shift(0, 0.5);
        im.scale(1, 2.0);
        assert_eq!(im.as_slice(), &[1.5, 2.5, 6.0, 8.0]);

        im.shift(5, 100.0);
        assert_eq!(im.as_slice(), &[1.5, 2.5, 6.0, 8.0]);
        Ok(())
    }

    #[test]
    fn clamp_unit_range() -> Result<(), ImageError> {
        let mut im = raster(&[-0.5, 0.25, 1.5], 1)?;
        im.clamp_unit();
        assert_eq!(im.as_slice(), &[0.0, 0.25, 1.0]);
        Ok(())
    }

    #[test]
    fn l1_normalize_sums_to_one() -> Result<(), ImageError> {
        let mut im = raster(&[1.0, 2.0, 3.0, 4.0], 1)?;
        im.l1_normalize();
        assert_relative_eq!(im.as_slice().iter().sum::<f32>(), 1.0, epsilon = 1e-6);

        let mut zero = raster(&[1.0, -1.0], 1)?;
        zero.l1_normalize();
        assert_eq!(zero.as_slice(), &[1.0, -1.0]);
        Ok(())
    }

    #[test]
    fn feature_normalize_range() -> Result<(), ImageError> {
        let mut im = raster(&[-2.0, 0.0, 2.0], 1)?;
        im.feature_normalize();
        assert_eq!(im.as_slice(), &[0.0, 0.5, 1.0]);

        let mut flat = raster(&[3.0, 3.0], 1)?;
        flat.feature_normalize();
        assert_eq!(flat.as_slice(), &[0.0, 0.0]);
        Ok(())
    }

    #[test]
    fn add_sub_geometry() -> Result<(), ImageError> {
        let a = raster(&[1.0, 2.0], 1)?;
        let b = raster(&[0.5, 0.5], 1)?;
        assert_eq!(add(&a, &b)?.as_slice(), &[1.5, 2.5]);
        assert_eq!(sub(&a, &b)?.as_slice(), &[0.5, 1.5]);

        let c = raster(&[1.0, 2.0], 2)?;
        assert!(matches!(
            add(&a, &c),
            Err(ImageError::InvalidImageSize(2, 1, 1, 1))
        ));
        Ok(())
    }
}

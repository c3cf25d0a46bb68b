use lumen_image::{ImageError, Raster};

fn check_three_channels(image: &Raster) -> Result<(), ImageError> {
    if image.num_channels() != 3 {
        return Err(ImageError::InvalidChannelCount(image.num_channels(), 3));
    }
    Ok(())
}

/// Convert an RGB raster to HSV in place.
///
/// All three components are kept in `[0, 1]`: hue is a fraction of a full turn.
///
/// # Errors
///
/// The raster must have 3 channels.
pub fn hsv_from_rgb(image: &mut Raster) -> Result<(), ImageError> {
    check_three_channels(image)?;

    let plane = image.size().area();
    let data = image.as_slice_mut();
    for i in 0..plane {
        let (r, g, b) = (data[i], data[i + plane], data[i + 2 * plane]);

        let v = r.max(g).max(b);
        let c = v - r.min(g).min(b);
        let s = if v != 0.0 { c / v } else { 0.0 };

        let mut h = 0.0;
        if c != 0.0 {
            h = if r == v {
                ((g - b) / c % 6.0) / 6.0
            } else if g == v {
                ((b - r) / c + 2.0) / 6.0
            } else {
                ((r - g) / c + 4.0) / 6.0
            };
            if h < 0.0 {
                h += 1.0;
            }
        }

        data[i] = h;
        data[i + plane] = s;
        data[i + 2 * plane] = v;
    }

    Ok(())
}

/// Convert an HSV raster back to RGB in place.
///
/// # Errors
///
/// The raster must have 3 channels.
pub fn rgb_from_hsv(image: &mut Raster) -> Result<(), ImageError> {
    check_three_channels(image)?;

    let plane = image.size().area();
    let data = image.as_slice_mut();
    for i in 0..plane {
        let (h, s, v) = (data[i], data[i + plane], data[i + 2 * plane]);

        let c = s * v;
        let h6 = h * 6.0;
        let x = c * (1.0 - ((h6 % 2.0) - 1.0).abs());
        let m = v - c;

        let (r, g, b) = if (0.0..1.0).contains(&h6) {
            (c, x, 0.0)
        } else if (1.0..2.0).contains(&h6) {
            (x, c, 0.0)
        } else if (2.0..3.0).contains(&h6) {
            (0.0, c, x)
        } else if (3.0..4.0).contains(&h6) {
            (0.0, x, c)
        } else if (4.0..5.0).contains(&h6) {
            (x, 0.0, c)
        } else {
            (c, 0.0, x)
        };

        data[i] = r + m;
        data[i + plane] = g + m;
        data[i + 2 * plane] = b + m;
    }

    Ok(())
}

use std::f32::consts::TAU;

use lumen_image::{ImageError, Raster};

use crate::features::Descriptor;

/// Colour of the corner markers, written to channels 0, 1 and 2.
pub const MARKER_COLOR: [f32; 3] = [1.0, 0.0, 1.0];

/// Half length of the corner marker arms.
pub const MARKER_RADIUS: isize = 9;

#[inline]
fn set_color(img: &mut Raster, x: isize, y: isize, color: [f32; 3]) {
    for (ch, v) in color.into_iter().enumerate() {
        img.set(x, y, ch as isize, v);
    }
}

/// Draw a cross centred on `(x, y)` in place.
///
/// Both arms are `2 · MARKER_RADIUS + 1` pixels long and painted with [`MARKER_COLOR`].
/// Pixels and channels outside the image are skipped.
pub fn mark_spot(img: &mut Raster, x: isize, y: isize) {
    for i in -MARKER_RADIUS..=MARKER_RADIUS {
        set_color(img, x + i, y, MARKER_COLOR);
        set_color(img, x, y + i, MARKER_COLOR);
    }
}

/// Mark the location of every descriptor with [`mark_spot`].
pub fn mark_corners(img: &mut Raster, corners: &[Descriptor]) {
    for d in corners {
        mark_spot(img, d.x() as isize, d.y() as isize);
    }
}

/// Map a direction to a colour on a six sector hue wheel.
///
/// The angle `atan2(dy, dx)` is scaled to `[0, 6]`; the integer part selects the sector and
/// the fraction blends within it.
pub fn direction_color(dx: f32, dy: f32) -> [f32; 3] {
    let angle = 6.0 * (dy.atan2(dx) / TAU + 0.5);
    let sector = angle.floor();
    let f = angle - sector;
    match sector as i32 {
        0 => [1.0, f, 0.0],
        1 => [1.0 - f, 1.0, 0.0],
        2 => [0.0, 1.0, f],
        3 => [0.0, 1.0 - f, 1.0],
        4 => [f, 0.0, 1.0],
        _ => [1.0, 0.0, 1.0 - f],
    }
}

/// Draw a line from `(x, y)` along `(dx, dy)` in place, coloured by its direction.
///
/// One pixel is painted per unit of length, starting at the origin; sample positions are
/// truncated towards zero. A zero length or non-finite vector draws nothing, and samples
/// that can no longer reach the image are skipped.
///
/// # Errors
///
/// The image must have 3 channels.
pub fn draw_line(img: &mut Raster, x: f32, y: f32, dx: f32, dy: f32) -> Result<(), ImageError> {
    if img.num_channels() != 3 {
        return Err(ImageError::InvalidChannelCount(img.num_channels(), 3));
    }

    let length = dx.hypot(dy);
    if !length.is_finite() || !x.is_finite() || !y.is_finite() {
        return Ok(());
    }

    // farthest distance from the origin to a pixel that truncation can land on
    let reach = (x.abs() + img.width() as f32 + 1.0).hypot(y.abs() + img.height() as f32 + 1.0);
    let steps = length.min(reach).ceil() as usize;

    let color = direction_color(dx, dy);
    for step in 0..steps {
        let i = step as f32;
        let xi = (x + dx * i / length) as isize;
        let yi = (y + dy * i / length) as isize;
        set_color(img, xi, yi, color);
    }

    Ok(())
}

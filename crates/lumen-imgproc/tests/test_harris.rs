use lumen_image::{ImageError, ImageSize, Raster};
use lumen_imgproc::draw::mark_corners;
use lumen_imgproc::features::{
    cornerness_response, detect_and_draw_corners, harris_corner_detector, harris_detect,
    nms_response, structure_matrix, HarrisConfig, NmsWindow, DESCRIPTOR_WINDOW, NMS_SENTINEL,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// A bright square covering `[lo, hi)` in both axes on a dark 21×21 background.
fn square(lo: isize, hi: isize, channels: usize) -> Raster {
    let mut image = Raster::zeros(ImageSize { width: 21, height: 21 }, channels);
    for ch in 0..channels as isize {
        for y in lo..hi {
            for x in lo..hi {
                image.set(x, y, ch, 1.0);
            }
        }
    }
    image
}

fn scenario_config() -> HarrisConfig {
    HarrisConfig::default()
        .with_sigma(1.0)
        .with_threshold(1.0)
        .with_nms_radius(2)
}

#[test]
fn test_flat_image_has_no_corners() -> Result<(), ImageError> {
    let image = Raster::from_size_val(ImageSize { width: 24, height: 16 }, 3, 0.7);
    for threshold in [1e-3, 1.0, 50.0] {
        let corners = harris_detect(&image, 2.0, threshold, 3)?;
        assert!(corners.is_empty());
    }
    Ok(())
}

#[test]
fn test_square_has_four_corners() -> Result<(), ImageError> {
    let image = square(6, 15, 1);

    for window in [NmsWindow::Symmetric, NmsWindow::Legacy] {
        let config = scenario_config().with_nms_window(window);
        let corners = harris_corner_detector(&image, &config)?;

        let locations = corners.iter().map(|d| (d.x(), d.y())).collect::<Vec<_>>();
        assert_eq!(locations, vec![(6, 6), (14, 6), (6, 14), (14, 14)]);
    }
    Ok(())
}

#[test]
fn test_small_square_collapses_to_center() -> Result<(), ImageError> {
    // a 3×3 blob is smaller than the smoothing window and responds as a single peak
    let image = square(9, 12, 1);
    let corners = harris_detect(&image, 1.0, 1.0, 2)?;

    assert_eq!(corners.len(), 1);
    assert_eq!((corners[0].x(), corners[0].y()), (10, 10));
    Ok(())
}

#[test]
fn test_descriptor_length_follows_channels() -> Result<(), ImageError> {
    for channels in [1, 3] {
        let corners = harris_corner_detector(&square(6, 15, channels), &scenario_config())?;
        assert!(!corners.is_empty());
        for d in &corners {
            assert_eq!(d.len(), DESCRIPTOR_WINDOW * DESCRIPTOR_WINDOW * channels);
        }
    }
    Ok(())
}

#[test]
fn test_nms_output_is_raw_or_sentinel() -> Result<(), ImageError> {
    let mut rng = StdRng::seed_from_u64(3);
    let data = (0..40 * 30).map(|_| rng.random_range(0.0..1.0)).collect();
    let image = Raster::new(ImageSize { width: 40, height: 30 }, 1, data)?;

    let response = cornerness_response(&structure_matrix(&image, 1.5)?)?;
    for window in [NmsWindow::Symmetric, NmsWindow::Legacy] {
        let suppressed = nms_response(&response, 3, window);
        let mut survivors = 0;
        for (&s, &r) in suppressed.as_slice().iter().zip(response.as_slice()) {
            assert!(s == r || s == NMS_SENTINEL);
            if s == r {
                survivors += 1;
            }
        }
        // the global maximum always survives
        assert!(survivors > 0);
    }
    Ok(())
}

#[test]
fn test_detect_and_draw_corners() -> Result<(), ImageError> {
    let mut image = square(6, 15, 3);
    let count = detect_and_draw_corners(&mut image, &scenario_config())?;
    assert_eq!(count, 4);

    // marker colour at a corner
    assert_eq!(image.get(6, 6, 0), 1.0);
    assert_eq!(image.get(6, 6, 1), 0.0);
    assert_eq!(image.get(6, 6, 2), 1.0);
    // arm of the cross on the dark background
    assert_eq!(image.get(6, 0, 1), 0.0);
    assert_eq!(image.get(6, 0, 2), 1.0);
    Ok(())
}

#[test]
fn test_detect_once_then_mark() -> Result<(), ImageError> {
    let config = scenario_config();
    let mut drawn = square(6, 15, 3);
    detect_and_draw_corners(&mut drawn, &config)?;

    let mut marked = square(6, 15, 3);
    let corners = harris_corner_detector(&marked, &config)?;
    assert_eq!(corners.len(), 4);
    mark_corners(&mut marked, &corners);

    assert_eq!(marked, drawn);
    Ok(())
}

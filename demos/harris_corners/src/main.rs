use argh::FromArgs;
use lumen::{
    image::{ImageSize, Raster},
    imgproc::{
        draw::mark_corners,
        features::{harris_corner_detector, HarrisConfig, NmsWindow},
    },
};

/// Detect Harris corners on a synthetic image of bright rectangles
#[derive(FromArgs)]
struct Args {
    /// image width
    #[argh(option, short = 'w', default = "96")]
    width: usize,

    /// image height
    #[argh(option, default = "64")]
    height: usize,

    /// standard deviation of the structure tensor window
    #[argh(option, short = 's', default = "2.0")]
    sigma: f32,

    /// minimum cornerness response
    #[argh(option, short = 't', default = "50.0")]
    threshold: f32,

    /// non-maximum suppression radius
    #[argh(option, short = 'n', default = "3")]
    nms: usize,

    /// use the half-open suppression window
    #[argh(switch, short = 'l')]
    legacy_nms: bool,
}

fn synthetic_scene(size: ImageSize) -> Raster {
    let mut image = Raster::zeros(size, 3);
    let (w, h) = (size.width as isize, size.height as isize);
    let rects = [
        (w / 8, h / 8, w / 3, h / 2, [1.0, 0.8, 0.2]),
        (w / 2, h / 4, w - w / 8, h - h / 6, [0.2, 0.6, 1.0]),
    ];
    for (x0, y0, x1, y1, color) in rects {
        for y in y0..y1 {
            for x in x0..x1 {
                for (ch, v) in color.iter().enumerate() {
                    image.set(x, y, ch as isize, *v);
                }
            }
        }
    }
    image
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let size = ImageSize {
        width: args.width,
        height: args.height,
    };
    let mut image = synthetic_scene(size);

    let window = if args.legacy_nms {
        NmsWindow::Legacy
    } else {
        NmsWindow::Symmetric
    };
    let config = HarrisConfig::default()
        .with_sigma(args.sigma)
        .with_threshold(args.threshold)
        .with_nms_radius(args.nms)
        .with_nms_window(window);

    let corners = harris_corner_detector(&image, &config)?;
    for corner in &corners {
        println!("corner at ({}, {})", corner.x(), corner.y());
    }

    mark_corners(&mut image, &corners);
    log::info!("marked {} corners on a {} image", corners.len(), size);

    Ok(())
}

use argh::FromArgs;
use lumen::{
    image::{ImageSize, Raster},
    imgproc::flow::{draw_flow, estimate_flow, FlowConfig},
};

/// Estimate the optical flow between two synthetic frames
#[derive(FromArgs)]
struct Args {
    /// frame width
    #[argh(option, short = 'w', default = "160")]
    width: usize,

    /// frame height
    #[argh(option, default = "120")]
    height: usize,

    /// horizontal motion between the frames in pixels
    #[argh(option, short = 'x', default = "1.0")]
    dx: f32,

    /// vertical motion between the frames in pixels
    #[argh(option, short = 'y', default = "0.0")]
    dy: f32,

    /// box filter window over the structure tensor
    #[argh(option, short = 's', default = "15")]
    smooth: usize,

    /// distance between velocity samples
    #[argh(option, short = 't', default = "8")]
    stride: usize,

    /// length multiplier for the drawn vectors
    #[argh(option, default = "20.0")]
    scale: f32,
}

fn textured_frame(size: ImageSize, dx: f32, dy: f32) -> Raster {
    let mut frame = Raster::zeros(size, 3);
    for y in 0..size.height {
        for x in 0..size.width {
            let (u, v) = (x as f32 - dx, y as f32 - dy);
            let base = 0.5 + 0.1 * ((0.3 * u).sin() + (0.25 * v).cos());
            for (ch, tint) in [1.0, 0.9, 0.8].iter().enumerate() {
                frame.set(x as isize, y as isize, ch as isize, base * tint);
            }
        }
    }
    frame
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let size = ImageSize {
        width: args.width,
        height: args.height,
    };
    let previous = textured_frame(size, 0.0, 0.0);
    let current = textured_frame(size, args.dx, args.dy);

    let config = FlowConfig::default()
        .with_smooth_window(args.smooth)
        .with_stride(args.stride);
    let estimate = estimate_flow(&current, &previous, &config)?;

    let velocity = &estimate.velocity;
    let samples = velocity.size().area().max(1) as f32;
    let mean = |ch: usize| {
        velocity
            .channel_slice(ch)
            .map(|c| c.iter().sum::<f32>() / samples)
            .unwrap_or(0.0)
    };
    println!(
        "mean velocity ({:.4}, {:.4}) over {} samples, {} degenerate",
        mean(0),
        mean(1),
        velocity.size().area(),
        estimate.degenerate.len()
    );

    let mut canvas = current.clone();
    draw_flow(&mut canvas, velocity, args.scale)?;
    log::info!("drew flow field on a {} frame", canvas.size());

    Ok(())
}

use lumen_image::Raster;

/// Side of the square patch sampled by [`describe_index`].
pub const DESCRIPTOR_WINDOW: usize = 5;

/// A described feature point.
///
/// Holds the pixel location and the patch features; it is never modified after creation.
#[derive(Clone, Debug, PartialEq)]
pub struct Descriptor {
    x: usize,
    y: usize,
    data: Vec<f32>,
}

impl Descriptor {
    /// Create a descriptor at `(x, y)` with the given features.
    pub fn new(x: usize, y: usize, data: Vec<f32>) -> Self {
        Self { x, y, data }
    }

    /// Column of the feature point.
    pub fn x(&self) -> usize {
        self.x
    }

    /// Row of the feature point.
    pub fn y(&self) -> usize {
        self.y
    }

    /// The feature vector.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the descriptor has no features.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Describe the pixel at linear index `index` of a raster.
///
/// For every channel the [`DESCRIPTOR_WINDOW`]² neighbourhood is visited with `dx` in the
/// outer loop and `dy` in the inner loop, storing `pixel - centre`. Neighbours outside the
/// raster are read with edge clamping, so the descriptor always has
/// `DESCRIPTOR_WINDOW² · channels` features.
///
/// # Arguments
///
/// * `src` - The raster to sample.
/// * `index` - The row-major pixel index `x + y · width`.
pub fn describe_index(src: &Raster, index: usize) -> Descriptor {
    let width = src.width().max(1);
    let (x, y) = (index % width, index / width);
    let half = (DESCRIPTOR_WINDOW / 2) as isize;

    let mut data = Vec::with_capacity(DESCRIPTOR_WINDOW * DESCRIPTOR_WINDOW * src.num_channels());
    let (cx, cy) = (x as isize, y as isize);
    for ch in 0..src.num_channels() as isize {
        let center = src.get(cx, cy, ch);
        for dx in -half..=half {
            for dy in -half..=half {
                data.push(src.get(cx + dx, cy + dy, ch) - center);
            }
        }
    }

    Descriptor::new(x, y, data)
}

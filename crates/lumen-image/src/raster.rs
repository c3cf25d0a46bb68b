use crate::error::ImageError;

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use lumen_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl ImageSize {
    /// Number of pixels covered by the size.
    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// Clamp a signed index into `[0, len)`. Empty axes map to zero.
#[inline]
fn clamp_index(v: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    v.clamp(0, len as isize - 1) as usize
}

/// A dense multi-channel floating point raster.
///
/// Pixels are stored in planar order: all of channel 0 row by row, then channel 1 and so
/// on, i.e. the value at `(x, y, ch)` lives at `x + y * width + ch * width * height`.
///
/// Reads never fail: coordinates outside the raster are clamped to the nearest edge per
/// axis, which gives the convolutions in this workspace their replicate-border behavior.
/// Writes outside the raster are ignored.
#[derive(Clone, Debug, PartialEq)]
pub struct Raster {
    size: ImageSize,
    channels: usize,
    data: Vec<f32>,
}

impl Raster {
    /// Create a new raster from planar pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the raster in pixels.
    /// * `channels` - The number of channels.
    /// * `data` - The pixel data in planar order.
    ///
    /// # Errors
    ///
    /// If the length of the pixel data does not match the raster geometry, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use lumen_image::{ImageSize, Raster};
    ///
    /// let raster = Raster::new(
    ///     ImageSize {
    ///         width: 10,
    ///         height: 20,
    ///     },
    ///     3,
    ///     vec![0f32; 10 * 20 * 3],
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(raster.width(), 10);
    /// assert_eq!(raster.height(), 20);
    /// assert_eq!(raster.num_channels(), 3);
    /// ```
    pub fn new(size: ImageSize, channels: usize, data: Vec<f32>) -> Result<Self, ImageError> {
        let expected = size.area() * channels;
        if data.len() != expected {
            return Err(ImageError::InvalidChannelShape(data.len(), expected));
        }

        Ok(Self {
            size,
            channels,
            data,
        })
    }

    /// Create a new raster filled with a constant value.
    pub fn from_size_val(size: ImageSize, channels: usize, val: f32) -> Self {
        Self {
            size,
            channels,
            data: vec![val; size.area() * channels],
        }
    }

    /// Create a new raster filled with zeros.
    pub fn zeros(size: ImageSize, channels: usize) -> Self {
        Self::from_size_val(size, channels, 0.0)
    }

    /// Create a raster from interleaved (HWC) pixel data, casting and scaling each value.
    ///
    /// This is the layout produced by most image decoders.
    ///
    /// # Examples
    ///
    /// ```
    /// use lumen_image::{ImageSize, Raster};
    ///
    /// let raster = Raster::from_interleaved(
    ///     ImageSize { width: 2, height: 1 },
    ///     3,
    ///     &[255u8, 0, 0, 0, 0, 255],
    ///     1.0 / 255.0,
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(raster.get(0, 0, 0), 1.0);
    /// assert_eq!(raster.get(1, 0, 2), 1.0);
    /// ```
    pub fn from_interleaved<T>(
        size: ImageSize,
        channels: usize,
        data: &[T],
        scale: f32,
    ) -> Result<Self, ImageError>
    where
        T: Copy + num_traits::NumCast,
    {
        let expected = size.area() * channels;
        if data.len() != expected {
            return Err(ImageError::InvalidChannelShape(data.len(), expected));
        }

        let mut raster = Self::zeros(size, channels);
        let plane = size.area();
        for (i, pixel) in data.chunks_exact(channels.max(1)).enumerate() {
            for (ch, &v) in pixel.iter().enumerate() {
                let v: f32 = num_traits::cast(v).ok_or(ImageError::CastError)?;
                raster.data[i + ch * plane] = v * scale;
            }
        }

        Ok(raster)
    }

    /// Copy the pixel data out in interleaved (HWC) order.
    pub fn to_interleaved(&self) -> Vec<f32> {
        let plane = self.size.area();
        let mut out = Vec::with_capacity(self.data.len());
        for i in 0..plane {
            for ch in 0..self.channels {
                out.push(self.data[i + ch * plane]);
            }
        }
        out
    }

    /// Get the size of the raster in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the width of the raster in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the raster in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of columns of the raster.
    pub fn cols(&self) -> usize {
        self.width()
    }

    /// Get the number of rows of the raster.
    pub fn rows(&self) -> usize {
        self.height()
    }

    /// Get the number of channels in the raster.
    pub fn num_channels(&self) -> usize {
        self.channels
    }

    /// True if the raster holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The whole planar buffer.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// The whole planar buffer, mutable.
    pub fn as_slice_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Consume the raster and return its planar buffer.
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// The contiguous plane of one channel, or `None` if the channel does not exist.
    pub fn channel_slice(&self, ch: usize) -> Option<&[f32]> {
        if ch >= self.channels {
            return None;
        }
        let plane = self.size.area();
        Some(&self.data[ch * plane..(ch + 1) * plane])
    }

    /// The contiguous plane of one channel, mutable.
    pub fn channel_slice_mut(&mut self, ch: usize) -> Option<&mut [f32]> {
        if ch >= self.channels {
            return None;
        }
        let plane = self.size.area();
        Some(&mut self.data[ch * plane..(ch + 1) * plane])
    }

    /// Read a pixel value with edge clamping.
    ///
    /// Each of `x`, `y` and `ch` is clamped independently to the valid range, so any
    /// integer input is accepted. An empty raster reads as `0.0`.
    ///
    /// # Examples
    ///
    /// ```
    /// use lumen_image::{ImageSize, Raster};
    ///
    /// let raster = Raster::new(ImageSize { width: 2, height: 1 }, 1, vec![1.0, 2.0]).unwrap();
    ///
    /// assert_eq!(raster.get(-5, 0, 0), 1.0);
    /// assert_eq!(raster.get(7, 3, 9), 2.0);
    /// ```
    #[inline]
    pub fn get(&self, x: isize, y: isize, ch: isize) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        let x = clamp_index(x, self.size.width);
        let y = clamp_index(y, self.size.height);
        let ch = clamp_index(ch, self.channels);
        self.data[x + y * self.size.width + ch * self.size.area()]
    }

    /// Write a pixel value. Writes outside the raster are ignored.
    #[inline]
    pub fn set(&mut self, x: isize, y: isize, ch: isize, val: f32) {
        if x < 0 || y < 0 || ch < 0 {
            return;
        }
        let (x, y, ch) = (x as usize, y as usize, ch as usize);
        if x >= self.size.width || y >= self.size.height || ch >= self.channels {
            return;
        }
        let idx = x + y * self.size.width + ch * self.size.area();
        self.data[idx] = val;
    }

    /// Get a single channel of the raster as a new 1-channel raster.
    ///
    /// # Errors
    ///
    /// If the channel index is out of bounds, an error is returned.
    pub fn channel(&self, ch: usize) -> Result<Raster, ImageError> {
        let plane = self
            .channel_slice(ch)
            .ok_or(ImageError::ChannelIndexOutOfBounds(ch, self.channels))?;
        Raster::new(self.size, 1, plane.to_vec())
    }

    /// Swap the x and y axes of every channel.
    ///
    /// A single-row kernel becomes a single-column kernel.
    pub fn transpose(&self) -> Raster {
        let size = ImageSize {
            width: self.size.height,
            height: self.size.width,
        };
        let mut out = Raster::zeros(size, self.channels);
        let plane = self.size.area();
        for ch in 0..self.channels {
            let offset = ch * plane;
            for y in 0..self.size.height {
                for x in 0..self.size.width {
                    out.data[offset + y + x * size.width] =
                        self.data[offset + x + y * self.size.width];
                }
            }
        }
        out
    }
}

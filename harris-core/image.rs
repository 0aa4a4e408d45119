use crate::error::{ImageError, ImageResult};

/// Rec.601 luma weights for R, G, B
const LUMA: [f32; 3] = [0.299, 0.587, 0.114];

/// Dense multi-channel `f32` pixel buffer.
///
/// Samples are stored channel-planar: channel `c` occupies
/// `data[c * w * h..(c + 1) * w * h]`, each plane row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<f32>,
}

impl Image {
    /// Zero-filled image
    pub fn new(width: usize, height: usize, channels: usize) -> ImageResult<Self> {
        let len = Self::sample_count(width, height, channels)?;
        Ok(Self {
            width,
            height,
            channels,
            data: vec![0.0; len],
        })
    }

    /// Wraps existing planar samples, checking the length against the shape
    pub fn from_vec(
        width: usize,
        height: usize,
        channels: usize,
        data: Vec<f32>,
    ) -> ImageResult<Self> {
        let expected_len = Self::sample_count(width, height, channels)?;
        if data.len() != expected_len {
            return Err(ImageError::InvalidImageData {
                expected_len,
                actual_len: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Builds an image by evaluating `f(x, y, c)` at every sample
    pub fn from_fn<F>(width: usize, height: usize, channels: usize, f: F) -> ImageResult<Self>
    where
        F: Fn(usize, usize, usize) -> f32,
    {
        let mut img = Self::new(width, height, channels)?;
        for c in 0..channels {
            for y in 0..height {
                for x in 0..width {
                    img.set(x, y, c, f(x, y, c));
                }
            }
        }
        Ok(img)
    }

    /// Total sample count of a valid shape
    fn sample_count(width: usize, height: usize, channels: usize) -> ImageResult<usize> {
        if width == 0 || height == 0 {
            return Err(ImageError::InvalidImageSize { width, height });
        }
        if channels == 0 {
            return Err(ImageError::InvalidChannels(channels));
        }
        width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(channels))
            .ok_or(ImageError::ImageTooLarge {
                width,
                height,
                channels,
            })
    }

    /// `(width, height, channels)`
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.width, self.height, self.channels)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Number of samples in one channel plane
    pub fn plane_len(&self) -> usize {
        self.width * self.height
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Borrow one channel plane
    pub fn channel(&self, c: usize) -> ImageResult<&[f32]> {
        self.check_channel(c)?;
        let n = self.plane_len();
        Ok(&self.data[c * n..(c + 1) * n])
    }

    /// Mutably borrow one channel plane
    pub fn channel_mut(&mut self, c: usize) -> ImageResult<&mut [f32]> {
        self.check_channel(c)?;
        let n = self.plane_len();
        Ok(&mut self.data[c * n..(c + 1) * n])
    }

    fn check_channel(&self, c: usize) -> ImageResult<()> {
        if c >= self.channels {
            return Err(ImageError::ChannelOutOfRange {
                channel: c,
                channels: self.channels,
            });
        }
        Ok(())
    }

    #[inline]
    fn index(&self, x: usize, y: usize, c: usize) -> usize {
        debug_assert!(x < self.width && y < self.height && c < self.channels);
        c * self.plane_len() + y * self.width + x
    }

    /// Sample at (x, y, c). Panics when out of bounds.
    #[inline]
    pub fn get(&self, x: usize, y: usize, c: usize) -> f32 {
        self.data[self.index(x, y, c)]
    }

    /// Sample with edge-clamped coordinates, so any (x, y) is readable
    #[inline]
    pub fn get_clamped(&self, x: isize, y: isize, c: usize) -> f32 {
        let xx = x.clamp(0, self.width as isize - 1) as usize;
        let yy = y.clamp(0, self.height as isize - 1) as usize;
        self.get(xx, yy, c)
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, c: usize, value: f32) {
        let i = self.index(x, y, c);
        self.data[i] = value;
    }

    /// Single-channel intensity image.
    ///
    /// 1 channel is copied as is, 3 or 4 channels use Rec.601 luma on the
    /// first three (alpha is ignored), anything else averages the channels.
    pub fn to_luminance(&self) -> Image {
        let n = self.plane_len();
        let data = match self.channels {
            1 => self.data.clone(),
            3 | 4 => (0..n)
                .map(|i| {
                    LUMA.iter()
                        .enumerate()
                        .map(|(c, w)| w * self.data[c * n + i])
                        .sum()
                })
                .collect(),
            channels => (0..n)
                .map(|i| (0..channels).map(|c| self.data[c * n + i]).sum::<f32>() / channels as f32)
                .collect(),
        };
        Image {
            width: self.width,
            height: self.height,
            channels: 1,
            data,
        }
    }

    /// Element-wise `alpha * self + beta * other` for images of equal shape
    pub fn linear_combination(&self, alpha: f32, other: &Image, beta: f32) -> ImageResult<Image> {
        if self.shape() != other.shape() {
            return Err(ImageError::ShapeMismatch {
                expected: self.shape(),
                actual: other.shape(),
            });
        }
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| alpha * a + beta * b)
            .collect();
        Ok(Image {
            width: self.width,
            height: self.height,
            channels: self.channels,
            data,
        })
    }
}

use harris_core::Image;

use crate::convolution::Convolution;
use crate::error::{DetectError, DetectResult};
use crate::kernel::Kernel;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Derivative filter used for Ix and Iy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GradientOperator {
    /// 3x3 Sobel, central difference smoothed across the other axis
    #[default]
    Sobel,
    /// Plain `(I(x+1) - I(x-1)) / 2`
    CentralDifference,
}

impl GradientOperator {
    fn kernels(self) -> (Kernel, Kernel) {
        match self {
            GradientOperator::Sobel => (Kernel::sobel_x(), Kernel::sobel_y()),
            GradientOperator::CentralDifference => {
                (Kernel::central_difference_x(), Kernel::central_difference_y())
            }
        }
    }
}

/// Smoothed second-moment matrix per pixel.
///
/// Stored as a 3-channel image: channel 0 is Ixx, 1 is Iyy, 2 is Ixy.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureTensor {
    planes: Image,
}

impl StructureTensor {
    pub fn width(&self) -> usize {
        self.planes.width()
    }

    pub fn height(&self) -> usize {
        self.planes.height()
    }

    /// `(Ixx, Iyy, Ixy)` at a pixel
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> (f32, f32, f32) {
        (
            self.planes.get(x, y, 0),
            self.planes.get(x, y, 1),
            self.planes.get(x, y, 2),
        )
    }

    pub fn as_image(&self) -> &Image {
        &self.planes
    }
}

pub struct StructureTensorBuilder;

impl StructureTensorBuilder {
    /// Horizontal and vertical derivatives of the image intensity.
    ///
    /// Multi-channel input is reduced with [`Image::to_luminance`] first, so
    /// both outputs are single-channel.
    pub fn gradients(img: &Image, op: GradientOperator) -> DetectResult<(Image, Image)> {
        let gray = img.to_luminance();
        let (kx, ky) = op.kernels();
        let ix = Convolution::convolve(&gray, &kx)?;
        let iy = Convolution::convolve(&gray, &ky)?;
        Ok((ix, iy))
    }

    /// Structure tensor aggregated with a Gaussian of `sigma`.
    ///
    /// `sigma <= 0` leaves the raw per-pixel outer product.
    pub fn structure_tensor(
        img: &Image,
        sigma: f32,
        op: GradientOperator,
    ) -> DetectResult<StructureTensor> {
        if !sigma.is_finite() {
            return Err(DetectError::InvalidSigma(sigma));
        }
        let (ix, iy) = Self::gradients(img, op)?;
        let (gx, gy) = (ix.data(), iy.data());
        let n = ix.plane_len();

        let mut products = Vec::with_capacity(3 * n);
        products.extend(gx.iter().map(|v| v * v));
        products.extend(gy.iter().map(|v| v * v));
        products.extend(gx.iter().zip(gy).map(|(a, b)| a * b));
        let raw = Image::from_vec(ix.width(), ix.height(), 3, products)?;

        let planes = Convolution::gaussian_blur(&raw, sigma)?;
        Ok(StructureTensor { planes })
    }
}

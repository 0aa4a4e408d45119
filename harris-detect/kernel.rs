use crate::error::{DetectError, DetectResult};

/// Largest accepted Gaussian sigma. The kernel then has `6 * 10_000 + 1` taps,
/// already far wider than any image the detector processes.
pub const MAX_GAUSSIAN_SIGMA: f32 = 10_000.0;

/// Dense 2D convolution kernel with an anchor.
///
/// Weights are row-major. The anchor is the kernel cell aligned with the
/// output pixel; it defaults to the center, which is why both dimensions
/// must be odd.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    width: usize,
    height: usize,
    anchor_x: usize,
    anchor_y: usize,
    weights: Vec<f32>,
}

impl Kernel {
    /// Centered kernel from row-major weights
    pub fn new(width: usize, height: usize, weights: Vec<f32>) -> DetectResult<Self> {
        Self::with_anchor(width, height, width / 2, height / 2, weights)
    }

    pub fn with_anchor(
        width: usize,
        height: usize,
        anchor_x: usize,
        anchor_y: usize,
        weights: Vec<f32>,
    ) -> DetectResult<Self> {
        let invalid = |reason| DetectError::InvalidKernel {
            width,
            height,
            reason,
        };
        if width == 0 || height == 0 {
            return Err(invalid("dimensions must be positive"));
        }
        if width % 2 == 0 || height % 2 == 0 {
            return Err(invalid("dimensions must be odd"));
        }
        if weights.len() != width * height {
            return Err(invalid("weight count does not match dimensions"));
        }
        if anchor_x >= width || anchor_y >= height {
            return Err(invalid("anchor outside kernel"));
        }
        Ok(Self {
            width,
            height,
            anchor_x,
            anchor_y,
            weights,
        })
    }

    /// Unit impulse of the given odd size: convolving with it is the identity
    pub fn impulse(size: usize) -> DetectResult<Self> {
        let mut weights = vec![0.0; size * size];
        if let Some(center) = weights.get_mut(size * size / 2) {
            *center = 1.0;
        }
        Self::new(size, size, weights)
    }

    /// Square averaging kernel, L1-normalized
    pub fn box_filter(size: usize) -> DetectResult<Self> {
        let n = size * size;
        Self::new(size, size, vec![1.0 / n.max(1) as f32; n])
    }

    pub fn sobel_x() -> Self {
        Self {
            width: 3,
            height: 3,
            anchor_x: 1,
            anchor_y: 1,
            weights: vec![-1.0, 0.0, 1.0, -2.0, 0.0, 2.0, -1.0, 0.0, 1.0],
        }
    }

    pub fn sobel_y() -> Self {
        Self {
            width: 3,
            height: 3,
            anchor_x: 1,
            anchor_y: 1,
            weights: vec![-1.0, -2.0, -1.0, 0.0, 0.0, 0.0, 1.0, 2.0, 1.0],
        }
    }

    /// `(I(x+1) - I(x-1)) / 2`
    pub fn central_difference_x() -> Self {
        Self {
            width: 3,
            height: 1,
            anchor_x: 1,
            anchor_y: 0,
            weights: vec![-0.5, 0.0, 0.5],
        }
    }

    /// `(I(y+1) - I(y-1)) / 2`
    pub fn central_difference_y() -> Self {
        Self {
            width: 1,
            height: 3,
            anchor_x: 0,
            anchor_y: 1,
            weights: vec![-0.5, 0.0, 0.5],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn anchor(&self) -> (usize, usize) {
        (self.anchor_x, self.anchor_y)
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    #[inline]
    pub fn weight(&self, kx: usize, ky: usize) -> f32 {
        self.weights[ky * self.width + kx]
    }
}

/// Kernel expressed as the outer product `col * row^T`
#[derive(Debug, Clone, PartialEq)]
pub struct SeparableKernel {
    row: Vec<f32>,
    col: Vec<f32>,
}

impl SeparableKernel {
    pub fn new(row: Vec<f32>, col: Vec<f32>) -> DetectResult<Self> {
        let invalid = |reason| DetectError::InvalidKernel {
            width: row.len(),
            height: col.len(),
            reason,
        };
        if row.is_empty() || col.is_empty() {
            return Err(invalid("dimensions must be positive"));
        }
        if row.len() % 2 == 0 || col.len() % 2 == 0 {
            return Err(invalid("dimensions must be odd"));
        }
        Ok(Self { row, col })
    }

    /// Normalized Gaussian, `ceil(6 * sigma)` taps rounded up to odd.
    /// `sigma` must lie in `(0, MAX_GAUSSIAN_SIGMA]`.
    pub fn gaussian(sigma: f32) -> DetectResult<Self> {
        let taps = gaussian_taps(sigma)?;
        Ok(Self {
            row: taps.clone(),
            col: taps,
        })
    }

    pub fn row(&self) -> &[f32] {
        &self.row
    }

    pub fn col(&self) -> &[f32] {
        &self.col
    }

    /// Equivalent dense kernel
    pub fn to_kernel(&self) -> Kernel {
        let weights = self
            .col
            .iter()
            .flat_map(|cy| self.row.iter().map(move |rx| cy * rx))
            .collect();
        Kernel {
            width: self.row.len(),
            height: self.col.len(),
            anchor_x: self.row.len() / 2,
            anchor_y: self.col.len() / 2,
            weights,
        }
    }
}

fn gaussian_taps(sigma: f32) -> DetectResult<Vec<f32>> {
    if !sigma.is_finite() || sigma <= 0.0 || sigma > MAX_GAUSSIAN_SIGMA {
        return Err(DetectError::InvalidSigma(sigma));
    }
    let mut len = (6.0 * sigma).ceil() as usize;
    if len % 2 == 0 {
        len += 1;
    }
    let half = (len / 2) as f32;
    let two_sigma_sq = 2.0 * sigma * sigma;
    let mut taps: Vec<f32> = (0..len)
        .map(|i| {
            let x = i as f32 - half;
            (-x * x / two_sigma_sq).exp()
        })
        .collect();
    let sum: f32 = taps.iter().sum();
    for t in &mut taps {
        *t /= sum;
    }
    Ok(taps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rejects_even_and_empty_dimensions() {
        assert!(matches!(
            Kernel::new(2, 3, vec![0.0; 6]),
            Err(DetectError::InvalidKernel { width: 2, height: 3, .. })
        ));
        assert!(matches!(
            Kernel::new(0, 3, vec![]),
            Err(DetectError::InvalidKernel { .. })
        ));
        assert!(matches!(
            Kernel::new(3, 3, vec![0.0; 8]),
            Err(DetectError::InvalidKernel { .. })
        ));
        assert!(SeparableKernel::new(vec![1.0, 2.0], vec![1.0]).is_err());
        assert!(SeparableKernel::new(vec![1.0], vec![]).is_err());
    }

    #[test]
    fn test_anchor_bounds() {
        assert!(Kernel::with_anchor(3, 3, 2, 0, vec![0.0; 9]).is_ok());
        assert!(Kernel::with_anchor(3, 3, 3, 0, vec![0.0; 9]).is_err());
        assert_eq!(Kernel::new(5, 3, vec![0.0; 15]).unwrap().anchor(), (2, 1));
    }

    #[test]
    fn test_gaussian_properties() {
        let g = SeparableKernel::gaussian(1.0).unwrap();
        assert_eq!(g.row().len(), 7);
        assert_relative_eq!(g.row().iter().sum::<f32>(), 1.0, epsilon = 1e-6);
        assert!(g.row()[3] > g.row()[2] && g.row()[2] > g.row()[1]);
        assert_relative_eq!(g.row()[0], g.row()[6]);

        assert_eq!(SeparableKernel::gaussian(2.0).unwrap().row().len(), 13);
        assert_eq!(SeparableKernel::gaussian(0.1).unwrap().row(), &[1.0]);
        assert!(matches!(
            SeparableKernel::gaussian(0.0),
            Err(DetectError::InvalidSigma(_))
        ));
    }

    #[test]
    fn test_gaussian_sigma_upper_bound() {
        let widest = SeparableKernel::gaussian(MAX_GAUSSIAN_SIGMA).unwrap();
        assert_eq!(widest.row().len(), 60_001);
        for sigma in [MAX_GAUSSIAN_SIGMA * 1.01, 1e30, f32::MAX, f32::INFINITY] {
            assert!(matches!(
                SeparableKernel::gaussian(sigma),
                Err(DetectError::InvalidSigma(_))
            ));
        }
    }

    #[test]
    fn test_outer_product() {
        let k = SeparableKernel::new(vec![1.0, 2.0, 3.0], vec![1.0, 0.0, -1.0])
            .unwrap()
            .to_kernel();
        assert_eq!((k.width(), k.height()), (3, 3));
        assert_eq!(k.weight(2, 0), 3.0);
        assert_eq!(k.weight(1, 2), -2.0);
        assert_eq!(k.weight(0, 1), 0.0);
    }

    #[test]
    fn test_box_filter_normalized() {
        let k = Kernel::box_filter(3).unwrap();
        assert_relative_eq!(k.weights().iter().sum::<f32>(), 1.0, epsilon = 1e-6);
        assert!(Kernel::box_filter(4).is_err());
    }
}

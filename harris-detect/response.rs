use harris_core::Image;
use rayon::prelude::*;

use crate::error::{DetectError, DetectResult};
use crate::gradient::StructureTensor;

/// Empirical trace penalty for the Harris response
pub const DEFAULT_K: f32 = 0.06;

/// Per-pixel cornerness. Positive for corners, negative for edges, about
/// zero in flat regions.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseMap {
    map: Image,
}

impl ResponseMap {
    /// Wraps precomputed responses (row-major, one value per pixel)
    pub fn from_vec(width: usize, height: usize, data: Vec<f32>) -> DetectResult<Self> {
        Ok(Self {
            map: Image::from_vec(width, height, 1, data)?,
        })
    }

    pub fn width(&self) -> usize {
        self.map.width()
    }

    pub fn height(&self) -> usize {
        self.map.height()
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.map.get(x, y, 0)
    }

    pub fn data(&self) -> &[f32] {
        self.map.data()
    }

    /// Largest finite response, `None` if there is none
    pub fn max(&self) -> Option<f32> {
        self.map
            .data()
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .reduce(f32::max)
    }

    pub fn as_image(&self) -> &Image {
        &self.map
    }
}

pub struct CornerResponse;

impl CornerResponse {
    /// `det(M) - k * trace(M)^2` for every pixel of the tensor
    pub fn compute(tensor: &StructureTensor, k: f32) -> DetectResult<ResponseMap> {
        if !k.is_finite() {
            return Err(DetectError::InvalidK(k));
        }
        let planes = tensor.as_image();
        let n = planes.plane_len();
        let (ixx, iyy, ixy) = (planes.channel(0)?, planes.channel(1)?, planes.channel(2)?);

        let data: Vec<f32> = (0..n)
            .into_par_iter()
            .map(|i| Self::harris(ixx[i], iyy[i], ixy[i], k))
            .collect();

        ResponseMap::from_vec(tensor.width(), tensor.height(), data)
    }

    #[inline]
    pub fn harris(ixx: f32, iyy: f32, ixy: f32, k: f32) -> f32 {
        let det = ixx * iyy - ixy * ixy;
        let trace = ixx + iyy;
        det - k * trace * trace
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gradient::{GradientOperator, StructureTensorBuilder};
    use approx::assert_relative_eq;

    #[test]
    fn test_closed_form() {
        assert_relative_eq!(CornerResponse::harris(4.0, 4.0, 0.0, 0.06), 16.0 - 0.06 * 64.0);
        // pure edge: one direction only
        assert!(CornerResponse::harris(9.0, 0.0, 0.0, DEFAULT_K) < 0.0);
        assert_eq!(CornerResponse::harris(0.0, 0.0, 0.0, DEFAULT_K), 0.0);
        // rank-one tensor from a diagonal edge
        assert!(CornerResponse::harris(1.0, 1.0, 1.0, DEFAULT_K) < 0.0);
    }

    #[test]
    fn test_corner_edge_flat_classification() {
        let img = Image::from_fn(20, 20, 1, |x, y, _| {
            if x >= 10 && y >= 10 { 1.0 } else { 0.0 }
        })
        .unwrap();
        let s = StructureTensorBuilder::structure_tensor(&img, 1.0, GradientOperator::Sobel)
            .unwrap();
        let r = CornerResponse::compute(&s, DEFAULT_K).unwrap();
        assert_eq!((r.width(), r.height()), (20, 20));

        let corner = (8..=11)
            .flat_map(|y| (8..=11).map(move |x| (x, y)))
            .map(|(x, y)| r.get(x, y))
            .fold(f32::MIN, f32::max);
        assert!(corner > 0.0);
        assert_eq!(r.max(), Some(corner));
        // along the vertical edge, far from the corner
        assert!(r.get(10, 17) < 0.0);
        // flat background
        assert_eq!(r.get(2, 2), 0.0);
    }

    #[test]
    fn test_rejects_non_finite_k() {
        let img = Image::new(4, 4, 1).unwrap();
        let s = StructureTensorBuilder::structure_tensor(&img, 0.0, GradientOperator::Sobel)
            .unwrap();
        assert!(matches!(
            CornerResponse::compute(&s, f32::INFINITY),
            Err(DetectError::InvalidK(_))
        ));
    }

    #[test]
    fn test_max_skips_non_finite() {
        let r = ResponseMap::from_vec(2, 2, vec![1.0, f32::NAN, 3.0, -2.0]).unwrap();
        assert_eq!(r.max(), Some(3.0));
        assert!(ResponseMap::from_vec(2, 2, vec![0.0; 3]).is_err());
    }
}

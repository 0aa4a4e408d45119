mod error;
mod image;

pub use error::{ImageError, ImageResult};
pub use image::Image;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Harris corner at integer pixel coordinates with its response score
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InterestPoint {
    pub x: usize,
    pub y: usize,
    pub response: f32,
}

impl InterestPoint {
    pub fn new(x: usize, y: usize, response: f32) -> Self {
        Self { x, y, response }
    }

    /// Chebyshev (chessboard) distance to another point
    pub fn chebyshev_distance(&self, other: &InterestPoint) -> usize {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

/// Flattened neighborhood patch attached to the point it describes
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Descriptor {
    pub point: InterestPoint,
    pub data: Vec<f32>,
}

impl Descriptor {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Pairing of a point in image A with a point in image B.
///
/// `a_index` and `b_index` index the descriptor slices that were matched;
/// `distance` is lower for more similar patches.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Correspondence {
    pub a: InterestPoint,
    pub b: InterestPoint,
    pub a_index: usize,
    pub b_index: usize,
    pub distance: f32,
}

/// Caller parameters shared by detection and matching
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HarrisConfig {
    /// Gaussian standard deviation used to aggregate the structure tensor.
    /// Values <= 0 disable smoothing.
    pub sigma: f32,
    /// Minimum corner response kept by the extractor
    pub threshold: f32,
    /// Non-maximum suppression radius (Chebyshev distance, in pixels)
    pub window: i32,
    /// Trace penalty of the response, det(M) - k * trace(M)^2
    pub k: f32,
    pub n_threads: usize,
}

impl Default for HarrisConfig {
    fn default() -> Self {
        Self {
            sigma: 2.0,
            threshold: 50.0,
            window: 3,
            k: 0.06,
            n_threads: num_cpus::get().max(1),
        }
    }
}

/// Initialize Rayon thread pool with the specified number of threads
pub fn init_thread_pool(n_threads: usize) -> Result<(), rayon::ThreadPoolBuildError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(n_threads)
        .build_global()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = HarrisConfig::default();
        assert_eq!(cfg.window, 3);
        assert!(cfg.sigma > 0.0);
        assert!(cfg.n_threads >= 1);
    }

    #[test]
    fn test_chebyshev_distance() {
        let a = InterestPoint::new(4, 10, 1.0);
        let b = InterestPoint::new(7, 8, 2.0);
        assert_eq!(a.chebyshev_distance(&b), 3);
        assert_eq!(b.chebyshev_distance(&a), 3);
        assert_eq!(a.chebyshev_distance(&a), 0);
    }

    #[test]
    fn test_descriptor_len() {
        let d = Descriptor {
            point: InterestPoint::new(0, 0, 0.0),
            data: vec![0.0; 25],
        };
        assert_eq!(d.len(), 25);
        assert!(!d.is_empty());
    }
}

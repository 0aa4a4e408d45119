pub mod builder;
pub mod config;
pub mod convolution;
pub mod detector;
pub mod error;
pub mod extractor;
pub mod gradient;
pub mod kernel;
pub mod response;

pub use builder::DetectorBuilder;
pub use config::DetectorConfig;
pub use convolution::Convolution;
pub use detector::HarrisDetector;
pub use error::{DetectError, DetectResult};
pub use extractor::PointExtractor;
pub use gradient::{GradientOperator, StructureTensor, StructureTensorBuilder};
pub use kernel::{Kernel, SeparableKernel, MAX_GAUSSIAN_SIGMA};
pub use response::{CornerResponse, ResponseMap, DEFAULT_K};

use harris_core::{HarrisConfig, Image, InterestPoint};

/// One-shot Harris detection with the three caller parameters.
///
/// `window` is a suppression radius in Chebyshev distance.
pub fn detect_corners(
    img: &Image,
    sigma: f32,
    threshold: f32,
    window: i32,
) -> DetectResult<Vec<InterestPoint>> {
    let detector = HarrisDetector::from_core(HarrisConfig {
        sigma,
        threshold,
        window,
        ..HarrisConfig::default()
    })?;
    detector.detect(img)
}

pub mod draw;
pub mod io;

use std::time::Instant;

use harris_core::{Correspondence, Descriptor, Image, InterestPoint};
use harris_detect::{DetectError, DetectorConfig, HarrisDetector};
use harris_match::{
    BruteForceMatcher, DescriptorConfig, MatchConfig, MatchError, PatchDescriptorGenerator,
};
use image::RgbImage;

pub use harris_core::{self, init_thread_pool, HarrisConfig};
pub use harris_detect;
pub use harris_match;

#[derive(thiserror::Error, Debug)]
pub enum HarrisError {
    #[error("Detection error: {0}")]
    Detect(#[from] DetectError),

    #[error("Matching error: {0}")]
    Match(#[from] MatchError),

    #[error("Image error: {0}")]
    Image(#[from] harris_core::ImageError),

    #[error("Image codec error: {0}")]
    Codec(#[from] image::ImageError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type HarrisResult<T> = Result<T, HarrisError>;

/// Interest points and descriptors of both images with their correspondences
#[derive(Debug, Clone)]
pub struct PairMatches {
    pub points_a: Vec<InterestPoint>,
    pub points_b: Vec<InterestPoint>,
    pub matches: Vec<Correspondence>,
}

/// High-level pipeline that combines Harris detection, patch descriptors and
/// brute-force matching
pub struct HarrisPipeline {
    detector: HarrisDetector,
    descriptors: PatchDescriptorGenerator,
    matcher: BruteForceMatcher,
}

impl HarrisPipeline {
    pub fn new(
        detect: DetectorConfig,
        describe: DescriptorConfig,
        matching: MatchConfig,
    ) -> HarrisResult<Self> {
        Ok(Self {
            detector: HarrisDetector::new(detect)?,
            descriptors: PatchDescriptorGenerator::new(describe)?,
            matcher: BruteForceMatcher::new(matching),
        })
    }

    /// Pipeline with default descriptor and matcher settings
    pub fn with_detector(detect: DetectorConfig) -> HarrisResult<Self> {
        Self::new(detect, DescriptorConfig::default(), MatchConfig::default())
    }

    /// Detect interest points in row-major order
    pub fn detect(&self, img: &Image) -> HarrisResult<Vec<InterestPoint>> {
        Ok(self.detector.detect(img)?)
    }

    /// Describe the given points; points too close to the border are dropped
    pub fn describe(&self, img: &Image, points: &[InterestPoint]) -> Vec<Descriptor> {
        self.descriptors.generate_descriptors(img, points)
    }

    /// Detect points and describe them in one step
    pub fn detect_and_describe(
        &self,
        img: &Image,
    ) -> HarrisResult<(Vec<InterestPoint>, Vec<Descriptor>)> {
        let points = self.detect(img)?;
        let descriptors = self.describe(img, &points);
        Ok((points, descriptors))
    }

    /// Detect, describe and match two images
    pub fn match_images(&self, a: &Image, b: &Image) -> HarrisResult<PairMatches> {
        let t0 = Instant::now();
        let (points_a, desc_a) = self.detect_and_describe(a)?;
        let (points_b, desc_b) = self.detect_and_describe(b)?;
        let matches = self.matcher.match_descriptors(&desc_a, &desc_b)?;
        log::info!(
            "{} + {} corners, {} correspondences in {:.2?}",
            points_a.len(),
            points_b.len(),
            matches.len(),
            t0.elapsed()
        );
        Ok(PairMatches {
            points_a,
            points_b,
            matches,
        })
    }

    /// Copy of `img` with a cross on every detected corner
    pub fn draw_corners(&self, img: &Image) -> HarrisResult<RgbImage> {
        let points = self.detect(img)?;
        log::info!("{} corners", points.len());
        let mut canvas = io::to_rgb8(img);
        draw::mark_corners(&mut canvas, &points, draw::CORNER_COLOR);
        Ok(canvas)
    }

    /// Both images side by side with corners marked and a line per match
    pub fn draw_matches(&self, a: &Image, b: &Image) -> HarrisResult<RgbImage> {
        let result = self.match_images(a, b)?;
        let mut canvas_a = io::to_rgb8(a);
        let mut canvas_b = io::to_rgb8(b);
        draw::mark_corners(&mut canvas_a, &result.points_a, draw::CORNER_COLOR);
        draw::mark_corners(&mut canvas_b, &result.points_b, draw::CORNER_COLOR);
        Ok(draw::draw_matches(
            &canvas_a,
            &canvas_b,
            &result.matches,
            draw::MATCH_COLOR,
        ))
    }

    pub fn detector_config(&self) -> &DetectorConfig {
        self.detector.config()
    }

    pub fn descriptor_config(&self) -> &DescriptorConfig {
        self.descriptors.config()
    }

    pub fn match_config(&self) -> &MatchConfig {
        self.matcher.config()
    }
}

/// Load a `DetectorConfig` from a `.json` or `.toml` file
#[cfg(feature = "serde")]
pub fn load_detector_config<P: AsRef<std::path::Path>>(path: P) -> HarrisResult<DetectorConfig> {
    let path = path.as_ref();
    let loaded = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => DetectorConfig::load_json(path),
        Some("toml") => DetectorConfig::load_toml(path),
        _ => {
            return Err(HarrisError::Config(format!(
                "{}: expected a .json or .toml file",
                path.display()
            )))
        }
    };
    loaded.map_err(|e| HarrisError::Config(format!("{}: {}", path.display(), e)))
}

#[cfg(not(feature = "serde"))]
pub fn load_detector_config<P: AsRef<std::path::Path>>(path: P) -> HarrisResult<DetectorConfig> {
    Err(HarrisError::Config(format!(
        "{}: configuration files require the `serde` feature",
        path.as_ref().display()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use harris_match::MatchFilter;

    fn create_test_config() -> DetectorConfig {
        DetectorConfig {
            core: HarrisConfig {
                sigma: 1.0,
                threshold: 1.0,
                window: 3,
                k: 0.06,
                n_threads: 1,
            },
            ..DetectorConfig::new()
        }
    }

    /// Bright quadrant whose corner pixel is at (cx, cy)
    fn create_corner_image(width: usize, height: usize, cx: usize, cy: usize) -> Image {
        Image::from_fn(width, height, 1, |x, y, _| {
            if x >= cx && y >= cy { 1.0 } else { 0.0 }
        })
        .unwrap()
    }

    #[test]
    fn test_detect_single_corner() {
        let pipeline = HarrisPipeline::with_detector(create_test_config()).unwrap();
        let points = pipeline.detect(&create_corner_image(20, 20, 10, 10)).unwrap();
        assert_eq!(points.len(), 1);
        assert!(points[0].x.abs_diff(10) <= 1 && points[0].y.abs_diff(10) <= 1);
    }

    #[test]
    fn test_shifted_copy_matches_with_zero_distance() {
        let pipeline = HarrisPipeline::with_detector(create_test_config()).unwrap();
        let a = create_corner_image(20, 20, 10, 10);
        let b = create_corner_image(20, 20, 13, 10);

        let result = pipeline.match_images(&a, &b).unwrap();
        assert_eq!(result.points_a.len(), 1);
        assert_eq!(result.points_b.len(), 1);
        assert_eq!(result.matches.len(), 1);

        let m = result.matches[0];
        assert_eq!(m.distance, 0.0);
        assert_eq!((m.b.x, m.b.y), (m.a.x + 3, m.a.y));
    }

    #[test]
    fn test_match_against_blank_image() {
        let pipeline = HarrisPipeline::with_detector(create_test_config()).unwrap();
        let a = create_corner_image(20, 20, 10, 10);
        let blank = Image::from_fn(20, 20, 1, |_, _, _| 0.25).unwrap();
        let result = pipeline.match_images(&a, &blank).unwrap();
        assert!(result.points_b.is_empty());
        assert!(result.matches.is_empty());
    }

    #[test]
    fn test_detect_and_describe_lengths() {
        let pipeline = HarrisPipeline::new(
            create_test_config(),
            DescriptorConfig {
                patch_size: 3,
                center_relative: false,
            },
            MatchConfig {
                filter: MatchFilter::BestOnly,
                ..MatchConfig::default()
            },
        )
        .unwrap();
        let gray = create_corner_image(20, 20, 10, 10);
        let rgb = Image::from_fn(20, 20, 3, |x, y, _| gray.get(x, y, 0)).unwrap();
        let (points, descriptors) = pipeline.detect_and_describe(&rgb).unwrap();
        assert_eq!(points.len(), descriptors.len());
        assert!(descriptors.iter().all(|d| d.len() == 27));
    }

    #[test]
    fn test_invalid_configuration() {
        let err = HarrisPipeline::new(
            create_test_config(),
            DescriptorConfig {
                patch_size: 6,
                center_relative: true,
            },
            MatchConfig::default(),
        );
        assert!(matches!(
            err,
            Err(HarrisError::Match(MatchError::InvalidPatchSize(6)))
        ));

        let mut cfg = create_test_config();
        cfg.core.window = -1;
        assert!(matches!(
            HarrisPipeline::with_detector(cfg),
            Err(HarrisError::Detect(DetectError::InvalidWindow(-1)))
        ));
    }

    #[test]
    fn test_draw_outputs() {
        let pipeline = HarrisPipeline::with_detector(create_test_config()).unwrap();
        let a = create_corner_image(20, 20, 10, 10);
        let b = create_corner_image(24, 16, 13, 8);

        let corners = pipeline.draw_corners(&a).unwrap();
        assert_eq!(corners.dimensions(), (20, 20));
        let both = pipeline.draw_matches(&a, &b).unwrap();
        assert_eq!(both.dimensions(), (44, 20));
    }

    #[test]
    fn test_config_file_extension() {
        assert!(matches!(
            load_detector_config("detector.yaml"),
            Err(HarrisError::Config(_))
        ));
    }
}

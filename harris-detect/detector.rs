use std::time::Instant;

use harris_core::{HarrisConfig, Image, InterestPoint};

use crate::config::DetectorConfig;
use crate::convolution::Convolution;
use crate::error::DetectResult;
use crate::extractor::PointExtractor;
use crate::gradient::{StructureTensor, StructureTensorBuilder};
use crate::response::{CornerResponse, ResponseMap};

/// Harris corner detector over a validated configuration
#[derive(Debug, Clone)]
pub struct HarrisDetector {
    cfg: DetectorConfig,
}

impl HarrisDetector {
    /// Creates a new detector with validation
    pub fn new(cfg: DetectorConfig) -> DetectResult<Self> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    /// Detector with default gradient and no pre-smoothing
    pub fn from_core(core: HarrisConfig) -> DetectResult<Self> {
        Self::new(DetectorConfig {
            core,
            ..DetectorConfig::new()
        })
    }

    /// Smoothed structure tensor of the (optionally pre-smoothed) intensity
    pub fn structure_tensor(&self, img: &Image) -> DetectResult<StructureTensor> {
        let intensity = if self.cfg.presmooth_sigma > 0.0 {
            Convolution::gaussian_blur(&img.to_luminance(), self.cfg.presmooth_sigma)?
        } else {
            img.to_luminance()
        };
        StructureTensorBuilder::structure_tensor(&intensity, self.cfg.core.sigma, self.cfg.gradient)
    }

    pub fn response_map(&self, img: &Image) -> DetectResult<ResponseMap> {
        let tensor = self.structure_tensor(img)?;
        CornerResponse::compute(&tensor, self.cfg.core.k)
    }

    /// Interest points in row-major order
    pub fn detect(&self, img: &Image) -> DetectResult<Vec<InterestPoint>> {
        let t0 = Instant::now();
        let response = self.response_map(img)?;
        let t_response = t0.elapsed();

        let points = PointExtractor::extract(&response, self.cfg.core.threshold, self.cfg.core.window)?;
        log::debug!(
            "detected {} corners in {}x{}x{} image (response {:.2?}, total {:.2?})",
            points.len(),
            img.width(),
            img.height(),
            img.channels(),
            t_response,
            t0.elapsed()
        );
        Ok(points)
    }

    /// Get detector configuration
    pub fn config(&self) -> &DetectorConfig {
        &self.cfg
    }
}

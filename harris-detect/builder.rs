use harris_core::HarrisConfig;
use crate::error::DetectResult;
use crate::config::DetectorConfig;
use crate::detector::HarrisDetector;
use crate::gradient::GradientOperator;

/// Builder for creating a `HarrisDetector`
#[derive(Debug, Clone)]
pub struct DetectorBuilder {
    config: HarrisConfig,
    gradient: GradientOperator,
    presmooth_sigma: f32,
}

impl Default for DetectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectorBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            config: HarrisConfig::default(),
            gradient: GradientOperator::Sobel,
            presmooth_sigma: 0.0,
        }
    }

    /// Set the Gaussian sigma of the structure tensor (<= 0 disables smoothing)
    pub fn sigma(mut self, sigma: f32) -> Self {
        self.config.sigma = sigma;
        self
    }

    /// Set the minimum corner response
    pub fn threshold(mut self, threshold: f32) -> Self {
        self.config.threshold = threshold;
        self
    }

    /// Set the non-maximum suppression radius
    pub fn window(mut self, window: i32) -> Self {
        self.config.window = window;
        self
    }

    /// Set the Harris trace penalty
    pub fn k(mut self, k: f32) -> Self {
        self.config.k = k;
        self
    }

    /// Set the number of threads for parallel processing
    pub fn threads(mut self, n_threads: usize) -> Self {
        self.config.n_threads = n_threads;
        self
    }

    /// Set the derivative filter
    pub fn gradient(mut self, gradient: GradientOperator) -> Self {
        self.gradient = gradient;
        self
    }

    /// Blur the intensity with this sigma before differentiating
    pub fn presmooth(mut self, sigma: f32) -> Self {
        self.presmooth_sigma = sigma;
        self
    }

    /// Apply the sensitive preset
    pub fn preset_sensitive(self) -> Self {
        self.apply_preset(DetectorConfig::sensitive_preset())
    }

    /// Apply the balanced preset
    pub fn preset_balanced(self) -> Self {
        self.apply_preset(DetectorConfig::balanced_preset())
    }

    /// Apply the strict preset
    pub fn preset_strict(self) -> Self {
        self.apply_preset(DetectorConfig::strict_preset())
    }

    fn apply_preset(mut self, preset: DetectorConfig) -> Self {
        let n_threads = self.config.n_threads;
        self.config = preset.core;
        self.config.n_threads = n_threads;
        self.gradient = preset.gradient;
        self.presmooth_sigma = preset.presmooth_sigma;
        self
    }

    /// Build the `HarrisDetector`
    pub fn build(self) -> DetectResult<HarrisDetector> {
        HarrisDetector::new(self.to_config())
    }

    /// Generate a summary of the builder's configuration
    pub fn summary(&self) -> String {
        self.clone().to_config().summary()
    }

    /// Create a builder from an existing `DetectorConfig`
    pub fn from_config(config: DetectorConfig) -> Self {
        Self {
            config: config.core,
            gradient: config.gradient,
            presmooth_sigma: config.presmooth_sigma,
        }
    }

    /// Convert the builder into a `DetectorConfig`
    pub fn to_config(self) -> DetectorConfig {
        DetectorConfig {
            core: self.config,
            gradient: self.gradient,
            presmooth_sigma: self.presmooth_sigma,
            name: None,
            description: None,
            version: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DetectError;

    #[test]
    fn test_fluent_setters() {
        let cfg = DetectorBuilder::new()
            .sigma(1.5)
            .threshold(12.0)
            .window(4)
            .k(0.05)
            .threads(2)
            .gradient(GradientOperator::CentralDifference)
            .presmooth(0.5)
            .to_config();
        assert_eq!(cfg.core.sigma, 1.5);
        assert_eq!(cfg.core.threshold, 12.0);
        assert_eq!(cfg.core.window, 4);
        assert_eq!(cfg.core.k, 0.05);
        assert_eq!(cfg.core.n_threads, 2);
        assert_eq!(cfg.gradient, GradientOperator::CentralDifference);
        assert_eq!(cfg.presmooth_sigma, 0.5);
    }

    #[test]
    fn test_preset_keeps_thread_count() {
        let cfg = DetectorBuilder::new().threads(3).preset_strict().to_config();
        assert_eq!(cfg.core.n_threads, 3);
        assert_eq!(cfg.core.window, DetectorConfig::strict_preset().core.window);
        assert_eq!(cfg.presmooth_sigma, 1.0);
    }

    #[test]
    fn test_config_round_trip() {
        let original = DetectorConfig::sensitive_preset();
        let back = original.clone().to_builder().to_config();
        assert_eq!(back.core, original.core);
        assert_eq!(back.gradient, original.gradient);
    }

    #[test]
    fn test_build_validates() {
        assert!(DetectorBuilder::new().preset_balanced().build().is_ok());
        assert!(matches!(
            DetectorBuilder::new().window(-2).build(),
            Err(DetectError::InvalidWindow(-2))
        ));
        assert!(DetectorBuilder::new().summary().contains("gradient=Sobel"));
    }
}

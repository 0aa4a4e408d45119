use harris_core::HarrisConfig;
use crate::builder::DetectorBuilder;
use crate::error::{DetectError, DetectResult};
use crate::gradient::GradientOperator;
use crate::kernel::MAX_GAUSSIAN_SIGMA;
use crate::response::DEFAULT_K;

#[cfg(feature = "serde")]
use serde::{Serialize, Deserialize};

/// Complete detector configuration with all settings
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DetectorConfig {
    /// Core Harris parameters (sigma, threshold, window, k)
    pub core: HarrisConfig,
    /// Derivative filter
    #[cfg_attr(feature = "serde", serde(default))]
    pub gradient: GradientOperator,
    /// Gaussian blur applied to the intensity before differentiation (<= 0 disables)
    #[cfg_attr(feature = "serde", serde(default))]
    pub presmooth_sigma: f32,
    /// Metadata
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub name: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub description: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub version: Option<String>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectorConfig {
    /// Create new configuration with default settings
    pub fn new() -> Self {
        Self {
            core: HarrisConfig::default(),
            gradient: GradientOperator::Sobel,
            presmooth_sigma: 0.0,
            name: None,
            description: None,
            version: None,
        }
    }

    /// Many weak corners: narrow aggregation, low threshold, tight suppression
    pub fn sensitive_preset() -> Self {
        Self {
            core: HarrisConfig {
                sigma: 1.0,
                threshold: 5.0,
                window: 2,
                k: DEFAULT_K,
                ..HarrisConfig::default()
            },
            gradient: GradientOperator::Sobel,
            presmooth_sigma: 0.0,
            name: Some("Sensitive".to_string()),
            description: Some("Low threshold and small suppression window for sparse texture".to_string()),
            version: Some("1.0".to_string()),
        }
    }

    /// Parameters of the classic panorama pipeline (sigma 2, threshold 50, window 3)
    pub fn balanced_preset() -> Self {
        Self {
            core: HarrisConfig::default(),
            gradient: GradientOperator::Sobel,
            presmooth_sigma: 0.0,
            name: Some("Balanced".to_string()),
            description: Some("Default panorama stitching parameters".to_string()),
            version: Some("1.0".to_string()),
        }
    }

    /// Few strong, well separated corners on noisy input
    pub fn strict_preset() -> Self {
        Self {
            core: HarrisConfig {
                sigma: 2.0,
                threshold: 200.0,
                window: 7,
                k: DEFAULT_K,
                ..HarrisConfig::default()
            },
            gradient: GradientOperator::Sobel,
            presmooth_sigma: 1.0,
            name: Some("Strict".to_string()),
            description: Some("Pre-smoothed input, high threshold and wide suppression".to_string()),
            version: Some("1.0".to_string()),
        }
    }

    /// Add metadata to configuration
    pub fn with_metadata(mut self, name: &str, description: &str) -> Self {
        self.name = Some(name.to_string());
        self.description = Some(description.to_string());
        self.version = Some("1.0".to_string());
        self
    }

    /// Convert to DetectorBuilder for further customization
    pub fn to_builder(self) -> DetectorBuilder {
        DetectorBuilder::from_config(self)
    }

    /// Generate human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "DetectorConfig: sigma={}, threshold={}, window={}, k={}, gradient={:?}, presmooth={}, threads={}",
            self.core.sigma, self.core.threshold, self.core.window, self.core.k,
            self.gradient, self.presmooth_sigma, self.core.n_threads
        )
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> DetectResult<()> {
        for sigma in [self.core.sigma, self.presmooth_sigma] {
            if !sigma.is_finite() || sigma > MAX_GAUSSIAN_SIGMA {
                return Err(DetectError::InvalidSigma(sigma));
            }
        }
        if !self.core.threshold.is_finite() {
            return Err(DetectError::InvalidThreshold(self.core.threshold));
        }
        if self.core.window < 0 {
            return Err(DetectError::InvalidWindow(self.core.window));
        }
        if !self.core.k.is_finite() {
            return Err(DetectError::InvalidK(self.core.k));
        }
        Ok(())
    }

    /// Save configuration to JSON file
    #[cfg(feature = "serde")]
    pub fn save_json<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load configuration from JSON file
    #[cfg(feature = "serde")]
    pub fn load_json<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Save configuration to TOML file
    #[cfg(feature = "serde")]
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Load configuration from TOML file
    #[cfg(feature = "serde")]
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Serialize to JSON string
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML string
    #[cfg(feature = "serde")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Deserialize from TOML string
    #[cfg(feature = "serde")]
    pub fn from_toml(toml_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        for cfg in [
            DetectorConfig::new(),
            DetectorConfig::sensitive_preset(),
            DetectorConfig::balanced_preset(),
            DetectorConfig::strict_preset(),
        ] {
            assert!(cfg.validate().is_ok(), "{}", cfg.summary());
        }
        assert!(DetectorConfig::sensitive_preset().core.threshold < DetectorConfig::strict_preset().core.threshold);
    }

    #[test]
    fn test_validation_errors() {
        let mut cfg = DetectorConfig::new();
        cfg.core.window = -3;
        assert_eq!(cfg.validate(), Err(DetectError::InvalidWindow(-3)));

        let mut cfg = DetectorConfig::new();
        cfg.presmooth_sigma = f32::NAN;
        assert!(matches!(cfg.validate(), Err(DetectError::InvalidSigma(_))));

        let mut cfg = DetectorConfig::new();
        cfg.core.k = f32::NEG_INFINITY;
        assert!(matches!(cfg.validate(), Err(DetectError::InvalidK(_))));

        let mut cfg = DetectorConfig::new();
        cfg.core.sigma = 1e30;
        assert_eq!(cfg.validate(), Err(DetectError::InvalidSigma(1e30)));

        let mut cfg = DetectorConfig::new();
        cfg.presmooth_sigma = f32::MAX;
        assert!(matches!(cfg.validate(), Err(DetectError::InvalidSigma(_))));

        // non-positive sigma only disables smoothing
        let mut cfg = DetectorConfig::new();
        cfg.core.sigma = -1.0;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_metadata_and_summary() {
        let cfg = DetectorConfig::new().with_metadata("Rainier", "mountain panorama");
        assert_eq!(cfg.name.as_deref(), Some("Rainier"));
        assert!(cfg.summary().contains("window=3"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_and_toml_round_trip() {
        let cfg = DetectorConfig::strict_preset();
        let json = cfg.to_json().unwrap();
        assert_eq!(DetectorConfig::from_json(&json).unwrap(), cfg);
        let toml = cfg.to_toml().unwrap();
        assert_eq!(DetectorConfig::from_toml(&toml).unwrap(), cfg);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_rejects_invalid_window() {
        let mut cfg = DetectorConfig::new();
        cfg.core.window = -1;
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(DetectorConfig::from_json(&json).is_err());
    }
}

use harris_core::{Descriptor, Image, InterestPoint};
use rayon::prelude::*;

use crate::error::{MatchError, MatchResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Patch descriptor settings
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DescriptorConfig {
    /// Side length of the square patch, odd
    pub patch_size: usize,
    /// Store `center - value` per channel instead of raw values, which
    /// cancels a uniform brightness offset between images
    pub center_relative: bool,
}

impl Default for DescriptorConfig {
    fn default() -> Self {
        Self {
            patch_size: 5,
            center_relative: true,
        }
    }
}

/// Extracts flattened square patches around interest points
pub struct PatchDescriptorGenerator {
    cfg: DescriptorConfig,
}

impl PatchDescriptorGenerator {
    pub fn new(cfg: DescriptorConfig) -> MatchResult<Self> {
        if cfg.patch_size == 0 || cfg.patch_size % 2 == 0 {
            return Err(MatchError::InvalidPatchSize(cfg.patch_size));
        }
        Ok(Self { cfg })
    }

    /// Number of values per descriptor for an image with `channels` channels
    pub fn descriptor_len(&self, channels: usize) -> usize {
        self.cfg.patch_size * self.cfg.patch_size * channels
    }

    /// One descriptor per point whose patch lies fully inside the image,
    /// in the order of `points`.
    ///
    /// Values are laid out channel by channel, each patch row-major.
    pub fn generate_descriptors(&self, img: &Image, points: &[InterestPoint]) -> Vec<Descriptor> {
        let half = self.cfg.patch_size / 2;
        let descriptors: Vec<Descriptor> = points
            .par_iter()
            .filter(|p| {
                p.x >= half
                    && p.y >= half
                    && p.x + half < img.width()
                    && p.y + half < img.height()
            })
            .map(|p| Descriptor {
                point: *p,
                data: self.patch(img, p.x, p.y),
            })
            .collect();

        let dropped = points.len() - descriptors.len();
        if dropped > 0 {
            log::warn!(
                "dropped {} of {} points whose {}x{} patch leaves the image",
                dropped,
                points.len(),
                self.cfg.patch_size,
                self.cfg.patch_size
            );
        }
        descriptors
    }

    fn patch(&self, img: &Image, cx: usize, cy: usize) -> Vec<f32> {
        let half = self.cfg.patch_size / 2;
        let mut data = Vec::with_capacity(self.descriptor_len(img.channels()));
        for c in 0..img.channels() {
            let center = if self.cfg.center_relative {
                img.get(cx, cy, c)
            } else {
                0.0
            };
            for y in cy - half..=cy + half {
                for x in cx - half..=cx + half {
                    let v = img.get(x, y, c);
                    data.push(if self.cfg.center_relative { center - v } else { v });
                }
            }
        }
        data
    }

    pub fn config(&self) -> &DescriptorConfig {
        &self.cfg
    }
}

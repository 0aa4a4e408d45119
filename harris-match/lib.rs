pub mod descriptor;
pub mod error;
pub mod matcher;

pub use descriptor::{DescriptorConfig, PatchDescriptorGenerator};
pub use error::{MatchError, MatchResult};
pub use matcher::{BruteForceMatcher, DistanceMetric, MatchConfig, MatchFilter};

use harris_core::{Correspondence, Descriptor, Image, InterestPoint};

/// Patch descriptors for `points`; points too close to the border are dropped
pub fn describe(
    img: &Image,
    points: &[InterestPoint],
    cfg: &DescriptorConfig,
) -> MatchResult<Vec<Descriptor>> {
    Ok(PatchDescriptorGenerator::new(cfg.clone())?.generate_descriptors(img, points))
}

/// Brute-force correspondences from `a` to `b`, sorted by ascending distance
pub fn match_descriptors(
    a: &[Descriptor],
    b: &[Descriptor],
    cfg: &MatchConfig,
) -> MatchResult<Vec<Correspondence>> {
    BruteForceMatcher::new(cfg.clone()).match_descriptors(a, b)
}

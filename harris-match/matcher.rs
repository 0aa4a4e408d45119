use harris_core::{Correspondence, Descriptor};
use rayon::prelude::*;

use crate::error::{MatchError, MatchResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Distance between two descriptors of equal length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DistanceMetric {
    /// Sum of absolute differences
    #[default]
    L1,
    /// Sum of squared differences
    SquaredL2,
}

impl DistanceMetric {
    #[inline]
    pub fn distance(self, a: &[f32], b: &[f32]) -> f32 {
        debug_assert_eq!(a.len(), b.len());
        match self {
            DistanceMetric::L1 => a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum(),
            DistanceMetric::SquaredL2 => a
                .iter()
                .zip(b)
                .map(|(x, y)| {
                    let d = x - y;
                    d * d
                })
                .sum(),
        }
    }
}

impl std::str::FromStr for DistanceMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "l1" => Ok(DistanceMetric::L1),
            "l2" | "squared-l2" | "ssd" => Ok(DistanceMetric::SquaredL2),
            other => Err(format!("unknown distance metric '{}' (expected l1 or l2)", other)),
        }
    }
}

/// Which nearest-neighbor pairs are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MatchFilter {
    /// Every descriptor in A paired with its nearest descriptor in B
    BestOnly,
    /// Nearest pairs taken in order of distance, each B used at most once
    OneToOne,
    /// Only pairs that are each other's nearest neighbor
    #[default]
    Mutual,
}

impl std::str::FromStr for MatchFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "best" | "best-only" => Ok(MatchFilter::BestOnly),
            "one-to-one" | "greedy" => Ok(MatchFilter::OneToOne),
            "mutual" | "cross-check" => Ok(MatchFilter::Mutual),
            other => Err(format!(
                "unknown match filter '{}' (expected best, one-to-one or mutual)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MatchConfig {
    #[cfg_attr(feature = "serde", serde(default))]
    pub metric: DistanceMetric,
    #[cfg_attr(feature = "serde", serde(default))]
    pub filter: MatchFilter,
}

/// Exhaustive nearest-neighbor matcher.
///
/// Equal descriptor distances are resolved in favor of the candidate whose
/// interest point lies closest in the image, then by lowest index. Results
/// are deterministic regardless of thread count, and a set matched against
/// itself pairs every descriptor with itself even when patches repeat.
#[derive(Debug, Clone, Default)]
pub struct BruteForceMatcher {
    cfg: MatchConfig,
}

impl BruteForceMatcher {
    pub fn new(cfg: MatchConfig) -> Self {
        Self { cfg }
    }

    /// Correspondences sorted by ascending distance, ties by index into `a`
    pub fn match_descriptors(
        &self,
        a: &[Descriptor],
        b: &[Descriptor],
    ) -> MatchResult<Vec<Correspondence>> {
        Self::check_lengths(a, b)?;
        if a.is_empty() || b.is_empty() {
            return Ok(Vec::new());
        }

        let distances = self.distance_matrix(a, b);
        let forward: Vec<(usize, f32)> = distances
            .par_iter()
            .enumerate()
            .map(|(i, row)| {
                Self::nearest(
                    row.iter()
                        .enumerate()
                        .map(|(j, &d)| (j, d, Self::spatial_gap(&a[i], &b[j]))),
                )
            })
            .collect();

        let mut matches: Vec<Correspondence> = match self.cfg.filter {
            MatchFilter::BestOnly | MatchFilter::OneToOne => forward
                .iter()
                .enumerate()
                .map(|(i, &(j, d))| Self::correspondence(a, b, i, j, d))
                .collect(),
            MatchFilter::Mutual => {
                let backward: Vec<usize> = (0..b.len())
                    .into_par_iter()
                    .map(|j| {
                        Self::nearest(
                            distances
                                .iter()
                                .enumerate()
                                .map(|(i, row)| (i, row[j], Self::spatial_gap(&a[i], &b[j]))),
                        )
                        .0
                    })
                    .collect();
                forward
                    .iter()
                    .enumerate()
                    .filter(|&(i, &(j, _))| backward[j] == i)
                    .map(|(i, &(j, d))| Self::correspondence(a, b, i, j, d))
                    .collect()
            }
        };

        matches.sort_by(|x, y| {
            x.distance
                .total_cmp(&y.distance)
                .then(x.a_index.cmp(&y.a_index))
        });

        if self.cfg.filter == MatchFilter::OneToOne {
            let mut taken = vec![false; b.len()];
            matches.retain(|m| !std::mem::replace(&mut taken[m.b_index], true));
        }

        log::debug!(
            "{} correspondences from {} x {} descriptors ({:?}, {:?})",
            matches.len(),
            a.len(),
            b.len(),
            self.cfg.metric,
            self.cfg.filter
        );
        Ok(matches)
    }

    pub fn config(&self) -> &MatchConfig {
        &self.cfg
    }

    fn check_lengths(a: &[Descriptor], b: &[Descriptor]) -> MatchResult<()> {
        let Some(expected) = a.iter().chain(b).map(Descriptor::len).next() else {
            return Ok(());
        };
        match a.iter().chain(b).find(|d| d.len() != expected) {
            Some(d) => Err(MatchError::DescriptorLengthMismatch {
                expected,
                actual: d.len(),
            }),
            None => Ok(()),
        }
    }

    fn distance_matrix(&self, a: &[Descriptor], b: &[Descriptor]) -> Vec<Vec<f32>> {
        let metric = self.cfg.metric;
        a.par_iter()
            .map(|da| b.iter().map(|db| metric.distance(&da.data, &db.data)).collect())
            .collect()
    }

    /// Candidate `(index, distance, spatial gap)` with the smallest distance,
    /// then the smallest gap, then the first index
    fn nearest(candidates: impl Iterator<Item = (usize, f32, u64)>) -> (usize, f32) {
        candidates
            .min_by(|x, y| x.1.total_cmp(&y.1).then(x.2.cmp(&y.2)))
            .map_or((0, f32::INFINITY), |(j, d, _)| (j, d))
    }

    /// Squared pixel distance between the two interest points
    fn spatial_gap(a: &Descriptor, b: &Descriptor) -> u64 {
        let dx = a.point.x.abs_diff(b.point.x) as u64;
        let dy = a.point.y.abs_diff(b.point.y) as u64;
        dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy))
    }

    fn correspondence(
        a: &[Descriptor],
        b: &[Descriptor],
        i: usize,
        j: usize,
        distance: f32,
    ) -> Correspondence {
        Correspondence {
            a: a[i].point,
            b: b[j].point,
            a_index: i,
            b_index: j,
            distance,
        }
    }
}

use harris_core::InterestPoint;
use rayon::prelude::*;

use crate::error::{DetectError, DetectResult};
use crate::response::ResponseMap;

/// Thresholding and non-maximum suppression over a response map.
///
/// `window` is a radius in Chebyshev distance: the neighborhood of `(x, y)`
/// is the `(2 * window + 1)` square centered on it. A thresholded pixel
/// survives unless a thresholded neighbor is strictly stronger, or equally
/// strong and earlier in row-major order.
pub struct PointExtractor;

impl PointExtractor {
    /// Surviving points in row-major order
    pub fn extract(
        response: &ResponseMap,
        threshold: f32,
        window: i32,
    ) -> DetectResult<Vec<InterestPoint>> {
        if window < 0 {
            return Err(DetectError::InvalidWindow(window));
        }
        if !threshold.is_finite() {
            return Err(DetectError::InvalidThreshold(threshold));
        }
        let radius = window as usize;

        let points: Vec<InterestPoint> = (0..response.height())
            .into_par_iter()
            .flat_map_iter(|y| {
                let mut v = Vec::new();
                for x in 0..response.width() {
                    let r = response.get(x, y);
                    if Self::passes(r, threshold)
                        && Self::is_local_maximum(response, x, y, threshold, radius)
                    {
                        v.push(InterestPoint::new(x, y, r));
                    }
                }
                v
            })
            .collect();

        log::trace!(
            "extracted {} points (threshold={}, window={})",
            points.len(),
            threshold,
            window
        );
        Ok(points)
    }

    /// NaN never passes
    #[inline]
    fn passes(r: f32, threshold: f32) -> bool {
        r >= threshold
    }

    fn is_local_maximum(
        response: &ResponseMap,
        x: usize,
        y: usize,
        threshold: f32,
        radius: usize,
    ) -> bool {
        let r = response.get(x, y);
        let x0 = x.saturating_sub(radius);
        let y0 = y.saturating_sub(radius);
        let x1 = x.saturating_add(radius).min(response.width() - 1);
        let y1 = y.saturating_add(radius).min(response.height() - 1);

        for yy in y0..=y1 {
            for xx in x0..=x1 {
                if (xx, yy) == (x, y) {
                    continue;
                }
                let q = response.get(xx, yy);
                if !Self::passes(q, threshold) {
                    continue;
                }
                if q > r || (q == r && (yy, xx) < (y, x)) {
                    return false;
                }
            }
        }
        true
    }
}

//! Exhaustive nearest-neighbour search.

use crate::metric::{Feature, WeightedMetric};

use super::NearestSearch;

/// Evaluates every control point; the reference all search strategies are
/// checked against.
#[derive(Debug)]
pub struct BruteForce<'a> {
    metric: WeightedMetric,
    points: &'a [Feature],
}

impl<'a> BruteForce<'a> {
    /// `points` must be non-empty.
    pub fn new(metric: WeightedMetric, points: &'a [Feature]) -> Self {
        debug_assert!(!points.is_empty(), "brute force search needs at least one point");
        Self { metric, points }
    }
}

impl NearestSearch for BruteForce<'_> {
    fn nearest(&self, query: &Feature) -> usize {
        let mut best = 0;
        let mut best_d = f64::INFINITY;
        for (i, point) in self.points.iter().enumerate() {
            let d = self.metric.squared(query, point);
            // Strict comparison keeps the first of equal distances
            if d < best_d {
                best_d = d;
                best = i;
            }
        }
        best
    }
}

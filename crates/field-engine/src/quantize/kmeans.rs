//! Seeded, parallel Lloyd iteration.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::color::Color;
use crate::error::{EngineError, Result};
use crate::field::PixelField;

/// Default cluster count.
pub const DEFAULT_K: usize = 10;
/// Default relocation budget.
pub const DEFAULT_ITERATIONS: usize = 10;
/// Seed used unless [`Quantizer::seed`] overrides it.
pub const DEFAULT_SEED: u64 = 0x5eed;

/// Pixels per parallel work unit in the assignment step.
const CHUNK: usize = 4096;
/// Random draws per requested cluster before falling back to a scan.
const SEED_DRAWS_PER_CLUSTER: usize = 32;

/// Result of one quantization: representatives plus per-pixel assignment.
///
/// Local to a single [`Quantizer::run`] call; nothing is retained between
/// calls.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterPalette {
    centers: Vec<Color>,
    assignments: Vec<usize>,
    width: usize,
    height: usize,
    iterations_run: usize,
    converged: bool,
}

impl ClusterPalette {
    /// Representative colors, one per cluster.
    ///
    /// Holds `min(k, distinct colors)` entries: clusters beyond the number
    /// of distinct colors could never receive a pixel and are not kept.
    #[inline]
    pub fn centers(&self) -> &[Color] {
        &self.centers
    }

    /// Cluster index of every pixel, row-major.
    #[inline]
    pub fn assignments(&self) -> &[usize] {
        &self.assignments
    }

    /// Relocation passes actually performed.
    #[inline]
    pub fn iterations_run(&self) -> usize {
        self.iterations_run
    }

    /// Whether iteration stopped because no pixel changed cluster.
    #[inline]
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Image with every pixel replaced by its cluster's representative.
    pub fn apply(&self) -> PixelField {
        // One assignment per source pixel
        let pixels = self
            .assignments
            .iter()
            .map(|&i| self.centers[i])
            .collect();
        PixelField::from_parts(pixels, self.width, self.height)
    }
}

/// Palette quantizer builder.
///
/// ```
/// use field_engine::{Color, PixelField, Quantizer};
///
/// let image = PixelField::filled(4, 4, Color::new(30, 60, 90));
/// let palette = Quantizer::new(3).iterations(5).seed(7).run(&image).unwrap();
///
/// assert!(palette.converged());
/// assert_eq!(palette.apply(), image);
/// ```
#[derive(Debug, Clone)]
pub struct Quantizer {
    k: usize,
    iterations: usize,
    seed: u64,
}

impl Quantizer {
    /// Quantizer for `k` clusters with the default budget and seed.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            iterations: DEFAULT_ITERATIONS,
            seed: DEFAULT_SEED,
        }
    }

    /// Set the maximum number of relocation passes.
    #[inline]
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the RNG seed used to pick initial representatives.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(EngineError::invalid("k", "cluster count must be at least 1"));
        }
        if self.iterations == 0 {
            return Err(EngineError::invalid(
                "iterations",
                "iteration budget must be at least 1",
            ));
        }
        Ok(())
    }

    /// Cluster the pixels of `image`.
    pub fn run(&self, image: &PixelField) -> Result<ClusterPalette> {
        self.validate()?;
        let pixels = image.pixels();
        let (width, height) = image.dimensions();

        if pixels.is_empty() {
            return Ok(ClusterPalette {
                centers: Vec::new(),
                assignments: Vec::new(),
                width,
                height,
                iterations_run: 0,
                converged: true,
            });
        }

        let mut centers: Vec<[f64; 3]> = seed_centers(pixels, self.k, self.seed)
            .into_iter()
            .map(|c| c.0.map(f64::from))
            .collect();
        let mut assignments = vec![usize::MAX; pixels.len()];
        let mut iterations_run = 0;
        let mut converged = false;

        for _ in 0..self.iterations {
            let acc = assign(pixels, &mut assignments, &centers);
            if acc.changed == 0 {
                converged = true;
                break;
            }
            for (center, (sum, &count)) in centers.iter_mut().zip(acc.sums.iter().zip(&acc.counts)) {
                if count > 0 {
                    *center = sum.map(|s| s as f64 / count as f64);
                }
            }
            iterations_run += 1;
        }

        let centers = centers
            .into_iter()
            .map(|c| Color(c.map(|v| v.round().clamp(0.0, 255.0) as u8)))
            .collect();

        Ok(ClusterPalette {
            centers,
            assignments,
            width,
            height,
            iterations_run,
            converged,
        })
    }
}

/// Pick `min(k, distinct colors)` distinct pixel colors.
///
/// Random draws come first; a linear scan fills in when draws keep hitting
/// colors already chosen, which also guarantees every color is found when
/// the image has fewer than `k` of them. Work and memory are bounded by the
/// pixel count, not by `k`.
fn seed_centers(pixels: &[Color], k: usize, seed: u64) -> Vec<Color> {
    let target = k.min(pixels.len());
    let mut rng = StdRng::seed_from_u64(seed);
    let mut chosen: Vec<Color> = Vec::with_capacity(target);
    let mut seen: HashSet<Color> = HashSet::with_capacity(target);

    for _ in 0..target.saturating_mul(SEED_DRAWS_PER_CLUSTER) {
        if chosen.len() == target {
            break;
        }
        let color = pixels[rng.gen_range(0..pixels.len())];
        if seen.insert(color) {
            chosen.push(color);
        }
    }

    for &color in pixels {
        if chosen.len() == target {
            break;
        }
        if seen.insert(color) {
            chosen.push(color);
        }
    }
    chosen
}

/// Per-chunk partial sums of one assignment pass.
struct Accumulator {
    sums: Vec<[u64; 3]>,
    counts: Vec<usize>,
    changed: usize,
}

impl Accumulator {
    fn new(k: usize) -> Self {
        Self {
            sums: vec![[0; 3]; k],
            counts: vec![0; k],
            changed: 0,
        }
    }

    fn add(&mut self, cluster: usize, color: Color) {
        let sum = &mut self.sums[cluster];
        for (s, &c) in sum.iter_mut().zip(color.0.iter()) {
            *s += c as u64;
        }
        self.counts[cluster] += 1;
    }

    fn merge(mut self, other: Accumulator) -> Accumulator {
        for (a, b) in self.sums.iter_mut().zip(other.sums.iter()) {
            for (x, y) in a.iter_mut().zip(b.iter()) {
                *x += y;
            }
        }
        for (a, b) in self.counts.iter_mut().zip(other.counts.iter()) {
            *a += b;
        }
        self.changed += other.changed;
        self
    }
}

fn nearest_center(centers: &[[f64; 3]], color: Color) -> usize {
    let [r, g, b] = color.0.map(f64::from);
    let mut best = 0;
    let mut best_d = f64::INFINITY;
    for (i, c) in centers.iter().enumerate() {
        let d = (r - c[0]).powi(2) + (g - c[1]).powi(2) + (b - c[2]).powi(2);
        if d < best_d {
            best_d = d;
            best = i;
        }
    }
    best
}

fn assign(pixels: &[Color], assignments: &mut [usize], centers: &[[f64; 3]]) -> Accumulator {
    let k = centers.len();
    pixels
        .par_chunks(CHUNK)
        .zip(assignments.par_chunks_mut(CHUNK))
        .map(|(chunk, slots)| {
            let mut acc = Accumulator::new(k);
            for (&color, slot) in chunk.iter().zip(slots.iter_mut()) {
                let cluster = nearest_center(centers, color);
                if *slot != cluster {
                    *slot = cluster;
                    acc.changed += 1;
                }
                acc.add(cluster, color);
            }
            acc
        })
        .reduce(|| Accumulator::new(k), Accumulator::merge)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_tone(width: usize, height: usize) -> PixelField {
        let pixels = (0..width * height)
            .map(|i| {
                if i % 2 == 0 {
                    Color::new(10 + (i % 3) as u8, 0, 0)
                } else {
                    Color::new(0, 0, 200 + (i % 5) as u8)
                }
            })
            .collect();
        PixelField::new(pixels, width, height).unwrap()
    }

    #[test]
    fn test_rejects_zero_parameters() {
        let image = PixelField::filled(2, 2, Color::BLACK);
        assert!(matches!(
            Quantizer::new(0).run(&image),
            Err(EngineError::InvalidParameter { name: "k", .. })
        ));
        assert!(matches!(
            Quantizer::new(2).iterations(0).run(&image),
            Err(EngineError::InvalidParameter { name: "iterations", .. })
        ));
    }

    #[test]
    fn test_seed_centers_are_distinct_when_possible() {
        let image = two_tone(8, 8);
        let centers = seed_centers(image.pixels(), 4, DEFAULT_SEED);
        assert_eq!(centers.len(), 4);
        for (i, a) in centers.iter().enumerate() {
            for b in &centers[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_seed_centers_stop_at_distinct_colors() {
        let pixels = [Color::BLACK, Color::WHITE, Color::BLACK];
        let centers = seed_centers(&pixels, 5, 1);
        assert_eq!(centers.len(), 2);
        assert!(centers.contains(&Color::BLACK));
        assert!(centers.contains(&Color::WHITE));
    }

    #[test]
    fn test_two_clusters_separate_tones() {
        let image = two_tone(8, 8);
        let palette = Quantizer::new(2).run(&image).unwrap();
        let output = palette.apply();

        // Every even pixel shares one color, every odd pixel the other
        let even = output.pixels()[0];
        let odd = output.pixels()[1];
        assert_ne!(even, odd);
        for (i, &c) in output.pixels().iter().enumerate() {
            assert_eq!(c, if i % 2 == 0 { even } else { odd });
        }
        assert!(even.0[0] >= 10 && even.0[0] <= 12);
        assert!(odd.0[2] >= 200 && odd.0[2] <= 204);
    }

    #[test]
    fn test_more_clusters_than_colors() {
        let image = PixelField::new(vec![Color::BLACK, Color::WHITE], 2, 1).unwrap();
        let palette = Quantizer::new(6).run(&image).unwrap();
        assert_eq!(palette.centers().len(), 2);
        assert_eq!(palette.apply(), image);
        assert!(palette.converged());
    }

    #[test]
    fn test_cluster_count_far_beyond_pixel_count() {
        let image = PixelField::new(vec![Color::BLACK, Color::WHITE], 2, 1).unwrap();
        let palette = Quantizer::new(usize::MAX / 4).run(&image).unwrap();
        assert_eq!(palette.centers().len(), 2);
        assert_eq!(palette.apply(), image);

        let palette = Quantizer::new(usize::MAX).iterations(3).run(&image).unwrap();
        assert_eq!(palette.apply(), image);
    }

    #[test]
    fn test_deterministic_for_same_seed() {
        let image = two_tone(16, 9);
        let a = Quantizer::new(3).seed(99).run(&image).unwrap();
        let b = Quantizer::new(3).seed(99).run(&image).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_image() {
        let image = PixelField::filled(0, 0, Color::BLACK);
        let palette = Quantizer::new(3).run(&image).unwrap();
        assert!(palette.apply().is_empty());
    }

    #[test]
    fn test_budget_limits_iterations() {
        let image = two_tone(32, 32);
        let palette = Quantizer::new(4).iterations(1).run(&image).unwrap();
        assert_eq!(palette.iterations_run(), 1);
        assert!(!palette.converged());
    }

    #[test]
    fn test_spans_multiple_chunks() {
        // Larger than one parallel chunk so the reduction merges partials
        let width = 100;
        let height = (CHUNK / width) * 3;
        let pixels = (0..width * height)
            .map(|i| Color::new((i % 256) as u8, 0, 0))
            .collect();
        let image = PixelField::new(pixels, width, height).unwrap();
        let palette = Quantizer::new(1).run(&image).unwrap();

        let mean = (0..width * height).map(|i| (i % 256) as f64).sum::<f64>()
            / (width * height) as f64;
        assert_eq!(palette.centers()[0].0[0], mean.round() as u8);
    }
}

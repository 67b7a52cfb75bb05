//! Regression tests for the properties the engine promises across modules.
//!
//! Each test names the class of bug it would catch.

#[cfg(test)]
mod domain_tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::color::Color;
    use crate::control::{ControlPoint, ControlPoints, Position};
    use crate::difference::compute_difference;
    use crate::field::PixelField;
    use crate::metric::ParameterMask;
    use crate::quantize::{quantize_palette, Quantizer};
    use crate::reconstruct::{
        nearest_control_point, reconstruct_assignments, reconstruct_field, reconstruct_field_with,
        SearchStrategy,
    };

    fn noise(width: usize, height: usize, seed: u64) -> PixelField {
        let mut rng = StdRng::seed_from_u64(seed);
        let pixels = (0..width * height)
            .map(|_| Color::new(rng.gen(), rng.gen(), rng.gen()))
            .collect();
        PixelField::new(pixels, width, height).unwrap()
    }

    fn distinct_positions(count: usize, width: usize, height: usize, seed: u64) -> Vec<Position> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut positions = Vec::with_capacity(count);
        while positions.len() < count {
            let p = Position::new(rng.gen_range(0..height), rng.gen_range(0..width));
            if !positions.contains(&p) {
                positions.push(p);
            }
        }
        positions
    }

    fn masks() -> Vec<ParameterMask> {
        ["11111", "00011", "11100", "00000", "10101", "00010", "01001"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect()
    }

    // ========================================================================
    // Reconstruction and nearest query agree
    // ========================================================================

    /// If this breaks, it means: the per-pixel reconstruction loop and the
    /// single-point probe disagree on scaling, dimension order or tie-break,
    /// so what a user probes is not what the field shows.
    #[test]
    fn test_reconstruction_matches_nearest_query_everywhere() {
        let (width, height) = (23, 17);
        let image = noise(width, height, 1);
        let positions = distinct_positions(7, width, height, 2);
        let points = ControlPoints::sample(&positions, &image).unwrap();

        for mask in masks() {
            let field = reconstruct_field(&points, mask, &image, width, height).unwrap();
            for row in 0..height {
                for col in 0..width {
                    let idx =
                        nearest_control_point(&points, mask, &image, Position::new(row, col))
                            .unwrap();
                    assert_eq!(
                        field.get(row, col),
                        Some(points.colors()[idx]),
                        "mask {} disagrees at ({}, {})",
                        mask,
                        row,
                        col
                    );
                }
            }
        }
    }

    /// If this breaks, it means: the grid accelerator returned a different
    /// index than brute force, most likely on an equidistant pixel.
    #[test]
    fn test_grid_and_brute_force_agree_on_lattice_ties() {
        let (width, height) = (40, 30);
        let image = PixelField::filled(width, height, Color::BLACK);
        // Regular lattice produces many exact ties
        let positions: Vec<Position> = (0..4)
            .flat_map(|r| (0..5).map(move |c| Position::new(r * 8 + 2, c * 8 + 2)))
            .collect();
        let points = ControlPoints::sample(&positions, &image).unwrap();

        let brute = reconstruct_assignments(
            &points,
            ParameterMask::SPATIAL,
            &image,
            width,
            height,
            SearchStrategy::BruteForce,
        )
        .unwrap();
        let grid = reconstruct_assignments(
            &points,
            ParameterMask::SPATIAL,
            &image,
            width,
            height,
            SearchStrategy::SpatialGrid,
        )
        .unwrap();
        assert_eq!(brute, grid);
    }

    // ========================================================================
    // Partition
    // ========================================================================

    /// If this breaks, it means: some pixel was left unassigned or a control
    /// point lost its own pixel, so regions no longer tile the canvas.
    #[test]
    fn test_full_mask_partitions_canvas() {
        let (width, height) = (31, 19);
        let image = noise(width, height, 3);
        let positions = distinct_positions(9, width, height, 4);
        let points = ControlPoints::sample(&positions, &image).unwrap();

        let assignments = reconstruct_assignments(
            &points,
            ParameterMask::ALL,
            &image,
            width,
            height,
            SearchStrategy::Auto,
        )
        .unwrap();

        assert_eq!(assignments.len(), width * height);
        assert!(assignments.iter().all(|&i| i < points.len()));

        let mut region_sizes = vec![0usize; points.len()];
        for &i in &assignments {
            region_sizes[i] += 1;
        }
        assert_eq!(region_sizes.iter().sum::<usize>(), width * height);

        // Each point is at distance zero from its own pixel
        for (i, p) in positions.iter().enumerate() {
            assert_eq!(assignments[p.row * width + p.col], i);
            assert!(region_sizes[i] >= 1);
        }
    }

    // ========================================================================
    // Nearest query scenario
    // ========================================================================

    /// If this breaks, it means: row and column are swapped somewhere in the
    /// spatial terms.
    #[test]
    fn test_three_corner_scenario() {
        let source = PixelField::filled(10, 10, Color::WHITE);
        let points = ControlPoints::new(vec![
            ControlPoint::new(Position::new(0, 0), Color::new(255, 0, 0)),
            ControlPoint::new(Position::new(0, 9), Color::new(0, 255, 0)),
            ControlPoint::new(Position::new(9, 0), Color::new(0, 0, 255)),
        ]);
        let mask = ParameterMask::from_flags([false, false, false, true, true]);

        let query = |row, col| {
            nearest_control_point(&points, mask, &source, Position::new(row, col)).unwrap()
        };
        assert_eq!(query(1, 1), 0);
        assert_eq!(query(8, 1), 2);
        assert_eq!(query(1, 8), 1);

        let field = reconstruct_field_with(
            &points,
            mask,
            &source,
            10,
            10,
            SearchStrategy::SpatialGrid,
        )
        .unwrap();
        assert_eq!(field.get(8, 1), Some(Color::new(0, 0, 255)));
        assert_eq!(field.get(1, 8), Some(Color::new(0, 255, 0)));
    }

    // ========================================================================
    // Difference
    // ========================================================================

    /// If this breaks, it means: identical inputs are reported as anything
    /// other than fully similar.
    #[test]
    fn test_identical_fields_always_full_match() {
        let image = noise(12, 9, 5);
        for threshold in [0.0, 0.5, 12.5, 50.0, 100.0] {
            let diff = compute_difference(&image, &image, threshold).unwrap();
            assert_eq!(diff.percentage(), 100.0);
            assert_eq!(diff.mismatching(), 0);
        }
    }

    /// If this breaks, it means: a one-channel, one-pixel change slips
    /// through at zero tolerance.
    #[test]
    fn test_zero_threshold_detects_any_change() {
        let a = noise(16, 16, 6);
        let mut b = a.clone();
        let c = b.get(7, 3).unwrap();
        b.set(7, 3, Color::new(c.0[0], c.0[1], c.0[2].wrapping_add(1)));

        let diff = compute_difference(&a, &b, 0.0).unwrap();
        assert!(diff.percentage() < 100.0);
        assert_eq!(diff.mismatching(), 1);
    }

    #[test]
    fn test_black_two_by_two_scenario() {
        let a = PixelField::filled(2, 2, Color::BLACK);
        let b = PixelField::filled(2, 2, Color::BLACK);
        let diff = compute_difference(&a, &b, 0.0).unwrap();
        assert_eq!(diff.rounded_percentage(), 100);
        assert_eq!(diff.mismatching(), 0);
        assert!(diff
            .visualization()
            .pixels()
            .iter()
            .all(|&c| c == Color::WHITE));
    }

    // ========================================================================
    // Quantization
    // ========================================================================

    /// If this breaks, it means: initialization or empty-cluster handling
    /// moves representatives even when every color already has its own
    /// cluster.
    #[test]
    fn test_quantization_idempotent() {
        for (seed, k) in [(7, 5), (8, 10), (9, 1), (10, 3)] {
            let image = noise(20, 14, seed);
            let once = quantize_palette(&image, k, 10).unwrap();
            let twice = quantize_palette(&once, k, 10).unwrap();
            assert_eq!(once, twice, "k = {}", k);
        }
    }

    /// If this breaks, it means: the mean update or the parallel reduction
    /// lost pixels.
    #[test]
    fn test_single_cluster_is_mean_color() {
        let image = noise(13, 7, 11);
        let n = image.len() as f64;
        let mut mean = [0.0f64; 3];
        for c in image.pixels() {
            for (m, &v) in mean.iter_mut().zip(c.0.iter()) {
                *m += v as f64;
            }
        }
        let expected = Color(mean.map(|m| (m / n).round() as u8));

        let quantized = quantize_palette(&image, 1, 10).unwrap();
        assert!(quantized.pixels().iter().all(|&c| c == expected));
    }

    /// If this breaks, it means: asking for more clusters than colors turned
    /// into an error or altered the image.
    #[test]
    fn test_more_clusters_than_colors_is_valid() {
        let image = PixelField::new(
            vec![Color::BLACK, Color::WHITE, Color::BLACK, Color::new(9, 9, 9)],
            2,
            2,
        )
        .unwrap();
        let palette = Quantizer::new(10).run(&image).unwrap();
        assert_eq!(palette.apply(), image);
    }
}

//! Normalized box filter.

use rayon::prelude::*;

use crate::color::Color;
use crate::error::{EngineError, Result};
use crate::field::PixelField;

/// Map an out-of-range coordinate back into `0..len` by mirroring around
/// the edge pixels without repeating them.
fn reflect_101(index: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let len = len as isize;
    let period = 2 * (len - 1);
    let mut i = index.rem_euclid(period);
    if i >= len {
        i = period - i;
    }
    i as usize
}

/// `kernel²`, as long as a full window of 255s plus the rounding half
/// still sums within `u64`.
fn window_area(kernel: usize) -> Option<u64> {
    let kernel = u64::try_from(kernel).ok()?;
    let area = kernel.checked_mul(kernel)?;
    area.checked_mul(256)?;
    isize::try_from(kernel / 2).ok()?;
    Some(area)
}

/// Blur `image` with a `kernel × kernel` mean filter.
///
/// Each output channel is the rounded mean of the window. Kernel 1 returns
/// a copy.
///
/// Kernels wider than the image keep reflecting across it, so the window
/// may count a pixel several times.
///
/// # Errors
///
/// [`EngineError::InvalidParameter`] if `kernel` is zero, even, or so wide
/// that the window sum no longer fits in 64 bits.
pub fn box_blur(image: &PixelField, kernel: usize) -> Result<PixelField> {
    if kernel == 0 || kernel % 2 == 0 {
        return Err(EngineError::invalid(
            "smooth_kernel",
            format!("kernel size must be odd and at least 1, got {}", kernel),
        ));
    }
    let area = window_area(kernel).ok_or_else(|| {
        EngineError::invalid(
            "smooth_kernel",
            format!("kernel size {} is too large", kernel),
        )
    })?;
    let (width, height) = image.dimensions();
    if kernel == 1 || image.is_empty() {
        return Ok(image.clone());
    }

    let radius = (kernel / 2) as isize;
    let pixels = image.pixels();

    // Horizontal window sums per channel
    let mut horizontal = vec![[0u64; 3]; width * height];
    horizontal
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(row, out)| {
            let line = &pixels[row * width..(row + 1) * width];
            for (col, slot) in out.iter_mut().enumerate() {
                let mut sum = [0u64; 3];
                for offset in -radius..=radius {
                    let c = line[reflect_101(col as isize + offset, width)];
                    for (s, &v) in sum.iter_mut().zip(c.0.iter()) {
                        *s += u64::from(v);
                    }
                }
                *slot = sum;
            }
        });

    let mut output = vec![Color::BLACK; width * height];
    output
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(row, out)| {
            for (col, slot) in out.iter_mut().enumerate() {
                let mut sum = [0u64; 3];
                for offset in -radius..=radius {
                    let r = reflect_101(row as isize + offset, height);
                    let h = horizontal[r * width + col];
                    for (s, v) in sum.iter_mut().zip(h.iter()) {
                        *s += v;
                    }
                }
                *slot = Color(sum.map(|s| ((s + area / 2) / area) as u8));
            }
        });

    PixelField::new(output, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect_101() {
        assert_eq!(reflect_101(-1, 4), 1);
        assert_eq!(reflect_101(-2, 4), 2);
        assert_eq!(reflect_101(4, 4), 2);
        assert_eq!(reflect_101(5, 4), 1);
        assert_eq!(reflect_101(2, 4), 2);
        assert_eq!(reflect_101(-3, 1), 0);
        // Kernel wider than the image keeps bouncing
        assert_eq!(reflect_101(-4, 3), 0);
        assert_eq!(reflect_101(6, 3), 2);
    }

    #[test]
    fn test_rejects_even_and_zero_kernel() {
        let image = PixelField::filled(3, 3, Color::WHITE);
        assert!(box_blur(&image, 0).is_err());
        assert!(box_blur(&image, 4).is_err());
    }

    #[test]
    fn test_kernel_wider_than_image() {
        // Window sums of 4105² x 255 overflow 32 bits
        let white = PixelField::filled(3, 3, Color::WHITE);
        assert_eq!(box_blur(&white, 4105).unwrap(), white);

        let image = PixelField::new(
            vec![Color::BLACK, Color::new(90, 90, 90), Color::BLACK],
            3,
            1,
        )
        .unwrap();
        // Reflection makes every window hold one 90 per two pixels
        let blurred = box_blur(&image, 4105).unwrap();
        assert!(blurred
            .pixels()
            .iter()
            .all(|c| c.0[0].abs_diff(45) <= 1 && c.0 == [c.0[0]; 3]));
    }

    #[test]
    fn test_rejects_kernel_with_overflowing_area() {
        let image = PixelField::filled(2, 2, Color::WHITE);
        assert!(matches!(
            box_blur(&image, usize::MAX),
            Err(EngineError::InvalidParameter { name: "smooth_kernel", .. })
        ));
        assert!(window_area(4105).is_some());
    }

    #[test]
    fn test_kernel_one_is_identity() {
        let image = PixelField::new(
            vec![Color::BLACK, Color::WHITE, Color::new(1, 2, 3), Color::new(9, 8, 7)],
            2,
            2,
        )
        .unwrap();
        assert_eq!(box_blur(&image, 1).unwrap(), image);
    }

    #[test]
    fn test_uniform_image_unchanged() {
        let image = PixelField::filled(7, 5, Color::new(12, 200, 77));
        assert_eq!(box_blur(&image, 5).unwrap(), image);
    }

    #[test]
    fn test_single_bright_pixel_spreads() {
        // 1x3 row [0, 90, 0] blurred with kernel 3:
        // col 0 window reflects to [90, 0, 90] -> 180 / 9 over 3 identical rows
        let image = PixelField::new(
            vec![Color::BLACK, Color::new(90, 90, 90), Color::BLACK],
            3,
            1,
        )
        .unwrap();
        let blurred = box_blur(&image, 3).unwrap();
        assert_eq!(blurred.get(0, 0), Some(Color::new(60, 60, 60)));
        assert_eq!(blurred.get(0, 1), Some(Color::new(30, 30, 30)));
        assert_eq!(blurred.get(0, 2), Some(Color::new(60, 60, 60)));
    }
}

//! Test fixtures: synthetic images and request bodies.

use field_engine::{Color, PixelField};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};

pub const RED: Color = Color::new(220, 30, 30);
pub const BLUE: Color = Color::new(30, 30, 220);

/// Left half red, right half blue
pub fn halves(width: usize, height: usize) -> PixelField {
    let mut field = PixelField::filled(width, height, RED);
    for row in 0..height {
        for col in width / 2..width {
            field.set(row, col, BLUE);
        }
    }
    field
}

/// Seeded random colors
pub fn noise(width: usize, height: usize, seed: u64) -> PixelField {
    let mut rng = StdRng::seed_from_u64(seed);
    let pixels = (0..width * height)
        .map(|_| Color::new(rng.gen(), rng.gen(), rng.gen()))
        .collect();
    PixelField::new(pixels, width, height).unwrap()
}

/// Base64 PNG for a JSON request
pub fn b64(field: &PixelField) -> String {
    sparsefield::services::encode_base64_png(field).unwrap()
}

/// `[{row, col}, ...]`
pub fn positions(points: &[(usize, usize)]) -> Value {
    Value::Array(
        points
            .iter()
            .map(|&(row, col)| json!({ "row": row, "col": col }))
            .collect(),
    )
}

//! Control point positions as semicolon-separated CSV.
//!
//! ```text
//! Pos;X;Y
//! 1;0.25;0.5
//! 2;1;0
//! ```
//!
//! `X` and `Y` are normalized to `[0, 1]` against `width - 1` and
//! `height - 1`, so a file can be reapplied to a resized canvas.

use field_engine::Position;
use std::fmt::Write as _;
use std::path::Path;
use thiserror::Error;

pub const HEADER: &str = "Pos;X;Y";

#[derive(Debug, Error)]
pub enum PositionsError {
    #[error("missing `Pos;X;Y` header")]
    MissingHeader,

    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("line {line}: coordinate {value} outside [0, 1]")]
    OutOfRange { line: usize, value: f64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn normalize(value: usize, extent: usize) -> f64 {
    if extent <= 1 {
        0.0
    } else {
        value as f64 / (extent - 1) as f64
    }
}

fn denormalize(value: f64, extent: usize) -> usize {
    if extent <= 1 {
        0
    } else {
        let max = (extent - 1) as f64;
        (value * max).round().clamp(0.0, max) as usize
    }
}

/// Serialize positions for a `width x height` canvas.
pub fn to_csv(positions: &[Position], width: usize, height: usize) -> String {
    let mut out = String::with_capacity(16 * (positions.len() + 1));
    out.push_str(HEADER);
    out.push('\n');
    for (i, p) in positions.iter().enumerate() {
        let _ = writeln!(
            out,
            "{};{};{}",
            i + 1,
            normalize(p.col, width),
            normalize(p.row, height)
        );
    }
    out
}

fn parse_coordinate(token: Option<&str>, line: usize, name: &str) -> Result<f64, PositionsError> {
    let token = token.ok_or_else(|| PositionsError::Malformed {
        line,
        reason: format!("missing {name} column"),
    })?;
    let value: f64 = token.trim().parse().map_err(|_| PositionsError::Malformed {
        line,
        reason: format!("{name} value '{}' is not a number", token.trim()),
    })?;
    if !(0.0..=1.0).contains(&value) {
        return Err(PositionsError::OutOfRange { line, value });
    }
    Ok(value)
}

/// Parse positions for a `width x height` canvas. Blank lines are skipped.
pub fn from_csv(text: &str, width: usize, height: usize) -> Result<Vec<Position>, PositionsError> {
    let mut lines = text.lines().enumerate();

    match lines.find(|(_, l)| !l.trim().is_empty()) {
        Some((_, header)) if header.trim().eq_ignore_ascii_case(HEADER) => {}
        _ => return Err(PositionsError::MissingHeader),
    }

    let mut positions = Vec::new();
    for (idx, raw) in lines {
        let line = idx + 1;
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let mut tokens = raw.split(';');
        let _index = tokens.next();
        let x = parse_coordinate(tokens.next(), line, "X")?;
        let y = parse_coordinate(tokens.next(), line, "Y")?;
        if tokens.next().is_some() {
            return Err(PositionsError::Malformed {
                line,
                reason: "expected three columns".to_string(),
            });
        }
        positions.push(Position::new(
            denormalize(y, height),
            denormalize(x, width),
        ));
    }

    tracing::debug!(count = positions.len(), width, height, "Parsed positions");
    Ok(positions)
}

/// Write positions to a CSV file.
pub fn save(
    path: &Path,
    positions: &[Position],
    width: usize,
    height: usize,
) -> Result<(), PositionsError> {
    std::fs::write(path, to_csv(positions, width, height))?;
    Ok(())
}

/// Read positions from a CSV file.
pub fn load(path: &Path, width: usize, height: usize) -> Result<Vec<Position>, PositionsError> {
    let text = std::fs::read_to_string(path)?;
    from_csv(&text, width, height)
}

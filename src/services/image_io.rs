//! PNG and base64 transport for pixel fields.
//!
//! Every PNG layout decodes to 8-bit RGB: palette and low bit depths are
//! expanded, 16-bit samples are stripped to 8 bits, gray is replicated into
//! three channels and alpha is dropped.

use base64::Engine;
use field_engine::PixelField;
use std::io::Cursor;
use std::path::Path;

use crate::error::PersistError;

/// Decode PNG bytes into a pixel field.
pub fn decode_png(bytes: &[u8]) -> Result<PixelField, PersistError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| PersistError::PngDecode(e.to_string()))?;

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let frame = reader
        .next_frame(&mut buf)
        .map_err(|e| PersistError::PngDecode(e.to_string()))?;
    buf.truncate(frame.buffer_size());

    if frame.bit_depth != png::BitDepth::Eight {
        return Err(PersistError::Unsupported(format!(
            "bit depth {:?} after expansion",
            frame.bit_depth
        )));
    }

    let rgb: Vec<u8> = match frame.color_type {
        png::ColorType::Rgb => buf,
        png::ColorType::Rgba => buf
            .chunks_exact(4)
            .flat_map(|c| [c[0], c[1], c[2]])
            .collect(),
        png::ColorType::Grayscale => buf.iter().flat_map(|&v| [v, v, v]).collect(),
        png::ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .flat_map(|c| [c[0], c[0], c[0]])
            .collect(),
        png::ColorType::Indexed => {
            return Err(PersistError::Unsupported(
                "indexed color was not expanded".to_string(),
            ))
        }
    };

    let width = frame.width as usize;
    let height = frame.height as usize;
    PixelField::from_rgb_bytes(&rgb, width, height)
        .map_err(|e| PersistError::PngDecode(e.to_string()))
}

/// Encode a pixel field as an 8-bit RGB PNG.
pub fn encode_png(field: &PixelField) -> Result<Vec<u8>, PersistError> {
    let (width, height) = field.dimensions();
    let too_large = || PersistError::TooLarge { width, height };
    let png_width = u32::try_from(width).map_err(|_| too_large())?;
    let png_height = u32::try_from(height).map_err(|_| too_large())?;

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, png_width, png_height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder
            .write_header()
            .map_err(|e| PersistError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(&field.to_rgb_bytes())
            .map_err(|e| PersistError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

/// Read and decode a PNG file.
pub fn read_png(path: &Path) -> Result<PixelField, PersistError> {
    let bytes = std::fs::read(path)?;
    decode_png(&bytes)
}

/// Encode and write a PNG file.
pub fn write_png(path: &Path, field: &PixelField) -> Result<(), PersistError> {
    let bytes = encode_png(field)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Decode a base64 string carrying PNG bytes.
pub fn decode_base64_png(data: &str) -> Result<PixelField, PersistError> {
    let bytes = base64::engine::general_purpose::STANDARD.decode(data.trim())?;
    decode_png(&bytes)
}

/// Encode a pixel field as base64 PNG.
pub fn encode_base64_png(field: &PixelField) -> Result<String, PersistError> {
    Ok(base64::engine::general_purpose::STANDARD.encode(encode_png(field)?))
}

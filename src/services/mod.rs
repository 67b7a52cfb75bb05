pub mod export;
pub mod image_io;
pub mod positions;

pub use export::{export_outputs, ExportPaths};
pub use image_io::{decode_base64_png, decode_png, encode_base64_png, encode_png, read_png, write_png};
pub use positions::PositionsError;

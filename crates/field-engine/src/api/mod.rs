//! High-level API: the [`FieldPipeline`] builder.

mod pipeline;

pub use pipeline::{FieldPipeline, PipelineOutput};

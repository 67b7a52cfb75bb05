pub mod difference;
pub mod nearest;
pub mod pipeline;
pub mod quantize;
pub mod reconstruct;
pub mod types;

pub use difference::{handle_difference, DifferenceRequest, DifferenceResponse, __path_handle_difference};
pub use nearest::{handle_nearest, NearestRequest, NearestResponse, __path_handle_nearest};
pub use pipeline::{handle_pipeline, PipelineRequest, PipelineResponse, __path_handle_pipeline};
pub use quantize::{handle_quantize, QuantizeRequest, QuantizeResponse, __path_handle_quantize};
pub use reconstruct::{
    handle_reconstruct, ReconstructRequest, ReconstructResponse, __path_handle_reconstruct,
};
pub use types::{ControlPointDto, PositionDto};

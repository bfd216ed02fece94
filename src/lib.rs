//! detdecode turns the raw output tensor of an object-detection network into
//! a filtered, de-duplicated list of detections.
//!
//! The decoder scores every candidate row (optionally weighting class scores
//! by an objectness term), drops rows below a confidence threshold, maps boxes
//! from model input space back to the captured image, and runs per-class
//! non-maximum suppression. It is pure and deterministic: identical inputs give
//! bit-identical outputs. Optional features add parallel decoding (`rayon`),
//! SIMD argmax (`simd`), image metadata helpers (`image-io`) and spans/events
//! (`tracing`).

mod candidate;
pub mod config;
pub mod decode;
pub mod geometry;
pub mod infer;
pub mod io;
mod kernel;
pub mod labels;
pub mod lowlevel;
pub mod tensor;
mod trace;
pub mod util;

pub use candidate::Detection;
pub use config::{Activation, CoordinateSpace, DecodeConfig, ImageSize, ResizeMode, ScoreMode};
pub use decode::{decode, Decoder};
pub use geometry::{iou, BoundingBox};
pub use infer::{detect, DetectError, InferenceEngine};
pub use tensor::{OwnedTensor, RawDetectionTensor, TensorLayout};
pub use util::{DecodeError, DecodeResult};

//! Low-level building blocks for custom decoding pipelines.
//!
//! These expose the individual stages behind [`crate::Decoder`] for callers
//! that need a different stage order, e.g. class-agnostic suppression or a
//! custom cap. Most users should prefer [`crate::decode`] or `Decoder`.

pub use crate::candidate::nms::{nms_greedy, nms_per_class};
pub use crate::candidate::Candidate;
pub use crate::decode::transform::BoxTransform;
pub use crate::kernel::scalar::BestClassScalar;
pub use crate::kernel::{extract_candidates, extract_range, ClassKernel, DefaultKernel};

#[cfg(feature = "simd")]
pub use crate::kernel::simd::BestClassSimd;

#[cfg(feature = "rayon")]
pub use crate::kernel::rayon::{extract_candidates_par, nms_per_class_par};

//! Scored candidates, deterministic ordering and non-maximum suppression.

pub(crate) mod nms;
pub(crate) mod order;

use crate::geometry::BoundingBox;

/// A candidate that passed score extraction, still in model input space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    /// Row of the candidate in the raw tensor.
    pub index: usize,
    /// Best class (argmax, lowest index on ties).
    pub class_id: usize,
    /// Final confidence for `class_id`, in [0, 1].
    pub confidence: f32,
    /// Box in model input coordinates, as stored in the tensor.
    pub bbox: BoundingBox,
}

/// A decoded detection in original image pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detection {
    /// Box with top-left origin, in image pixels.
    pub bbox: BoundingBox,
    /// Class index in `[0, num_classes)`.
    pub class_id: usize,
    /// Confidence in [0, 1].
    pub confidence: f32,
    /// Row of the originating candidate in the raw tensor.
    pub candidate_index: usize,
}

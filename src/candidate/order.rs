//! Total ordering used for every sort in the decoder.

use crate::candidate::Detection;
use std::cmp::Ordering;

/// Descending confidence, then ascending class, then ascending candidate row.
pub(crate) fn detection_cmp_desc(a: &Detection, b: &Detection) -> Ordering {
    b.confidence
        .total_cmp(&a.confidence)
        .then_with(|| a.class_id.cmp(&b.class_id))
        .then_with(|| a.candidate_index.cmp(&b.candidate_index))
}

/// Sorts detections into output order.
pub(crate) fn sort_detections_desc(dets: &mut [Detection]) {
    dets.sort_by(detection_cmp_desc);
}

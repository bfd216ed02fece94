//! Score extraction kernels.
//!
//! A kernel only answers "which class scores highest in this row"; the
//! surrounding extraction loop handles objectness, activation and thresholds so
//! every kernel shares one definition of a candidate's confidence.

use crate::candidate::Candidate;
use crate::config::{Activation, DecodeConfig, ScoreMode};
use crate::geometry::BoundingBox;
use crate::tensor::RawDetectionTensor;
use crate::util::math::{sigmoid, unit_confidence};
use crate::util::DecodeResult;
use std::ops::Range;

/// Argmax over a row of class scores.
pub trait ClassKernel {
    /// Returns `(class_index, score)` of the highest score.
    ///
    /// Ties resolve to the lowest index and NaN never wins. Returns `None` for
    /// an empty or all-NaN row.
    fn best_class(scores: &[f32]) -> Option<(usize, f32)>;
}

pub mod scalar;

#[cfg(feature = "simd")]
pub mod simd;

#[cfg(feature = "rayon")]
pub mod rayon;

#[cfg(not(feature = "simd"))]
pub use scalar::BestClassScalar as DefaultKernel;
#[cfg(feature = "simd")]
pub use simd::BestClassSimd as DefaultKernel;

#[inline]
fn activate(value: f32, activation: Activation) -> f32 {
    match activation {
        Activation::None => value,
        Activation::Sigmoid => sigmoid(value),
    }
}

/// Scores one candidate row and applies the confidence threshold.
#[inline]
fn score_candidate<K: ClassKernel>(
    tensor: &RawDetectionTensor<'_>,
    cfg: &DecodeConfig,
    index: usize,
    scratch: &mut Vec<f32>,
) -> Option<Candidate> {
    let offset = cfg.class_offset();
    let (class_id, raw_score) = K::best_class(tensor.tail(index, offset, scratch))?;
    let class_score = activate(raw_score, cfg.activation);
    let confidence = match cfg.score_mode {
        ScoreMode::ObjectnessTimesClass => {
            let objectness = activate(tensor.value(index, 4)?, cfg.activation);
            objectness * class_score
        }
        ScoreMode::ClassOnly => class_score,
    };
    let confidence = unit_confidence(confidence)?;
    if confidence < cfg.confidence_threshold {
        return None;
    }

    let cx = tensor.value(index, 0)?;
    let cy = tensor.value(index, 1)?;
    let w = tensor.value(index, 2)?;
    let h = tensor.value(index, 3)?;
    if !(cx.is_finite() && cy.is_finite() && w.is_finite() && h.is_finite()) {
        return None;
    }

    Some(Candidate {
        index,
        class_id,
        confidence,
        bbox: BoundingBox::from_center(cx, cy, w, h),
    })
}

/// Scores rows in `range` without re-checking the tensor shape.
pub(crate) fn extract_rows<K: ClassKernel>(
    tensor: &RawDetectionTensor<'_>,
    cfg: &DecodeConfig,
    range: Range<usize>,
) -> Vec<Candidate> {
    let mut scratch = Vec::with_capacity(cfg.num_classes);
    let end = range.end.min(tensor.num_candidates());
    (range.start..end)
        .filter_map(|index| score_candidate::<K>(tensor, cfg, index, &mut scratch))
        .collect()
}

/// Extracts thresholded candidates for rows in `range`, in row order.
///
/// Fails with `ShapeMismatch` when the tensor's row width or candidate count
/// disagrees with `cfg`.
pub fn extract_range<K: ClassKernel>(
    tensor: &RawDetectionTensor<'_>,
    cfg: &DecodeConfig,
    range: Range<usize>,
) -> DecodeResult<Vec<Candidate>> {
    cfg.check_shape(tensor.num_candidates(), tensor.row_width())?;
    Ok(extract_rows::<K>(tensor, cfg, range))
}

/// Extracts thresholded candidates for the whole tensor.
pub fn extract_candidates<K: ClassKernel>(
    tensor: &RawDetectionTensor<'_>,
    cfg: &DecodeConfig,
) -> DecodeResult<Vec<Candidate>> {
    extract_range::<K>(tensor, cfg, 0..tensor.num_candidates())
}

#[cfg(test)]
mod tests {
    use super::{extract_candidates, extract_range};
    use crate::config::{Activation, DecodeConfig, ScoreMode};
    use crate::kernel::scalar::BestClassScalar;
    use crate::tensor::RawDetectionTensor;
    use crate::util::DecodeError;

    fn class_only(num_classes: usize) -> DecodeConfig {
        DecodeConfig {
            num_classes,
            score_mode: ScoreMode::ClassOnly,
            ..DecodeConfig::default()
        }
    }

    #[test]
    fn objectness_multiplies_class_score() {
        let cfg = DecodeConfig {
            num_classes: 2,
            ..DecodeConfig::default()
        };
        let data = [10.0f32, 10.0, 4.0, 4.0, 0.5, 0.2, 0.8];
        let t = RawDetectionTensor::candidate_major(&data, 1, 7).unwrap();
        let cands = extract_candidates::<BestClassScalar>(&t, &cfg).unwrap();
        assert_eq!(cands.len(), 1);
        assert_eq!(cands[0].class_id, 1);
        assert!((cands[0].confidence - 0.4).abs() < 1e-6);
        assert_eq!(cands[0].bbox.x, 8.0);
    }

    #[test]
    fn thresholding_filters_low_rows() {
        let cfg = class_only(1);
        let data = [
            0.0f32, 0.0, 1.0, 1.0, 0.1, //
            0.0, 0.0, 1.0, 1.0, 0.3, //
            0.0, 0.0, 1.0, 1.0, 0.9,
        ];
        let t = RawDetectionTensor::candidate_major(&data, 3, 5).unwrap();
        let idx: Vec<_> = extract_candidates::<BestClassScalar>(&t, &cfg).unwrap()
            .iter()
            .map(|c| c.index)
            .collect();
        assert_eq!(idx, vec![1, 2]);
    }

    #[test]
    fn sigmoid_activation_applies_to_logits() {
        let cfg = DecodeConfig {
            activation: Activation::Sigmoid,
            ..class_only(2)
        };
        let data = [0.0f32, 0.0, 2.0, 2.0, -4.0, 0.0];
        let t = RawDetectionTensor::candidate_major(&data, 1, 6).unwrap();
        let cands = extract_candidates::<BestClassScalar>(&t, &cfg).unwrap();
        assert_eq!(cands.len(), 1);
        assert_eq!(cands[0].class_id, 1);
        assert!((cands[0].confidence - 0.5).abs() < 1e-6);
    }

    #[test]
    fn non_finite_rows_are_dropped() {
        let cfg = class_only(1);
        let data = [
            f32::NAN, 0.0, 1.0, 1.0, 0.9, //
            0.0, 0.0, 1.0, 1.0, f32::NAN,
        ];
        let t = RawDetectionTensor::candidate_major(&data, 2, 5).unwrap();
        assert!(extract_candidates::<BestClassScalar>(&t, &cfg).unwrap().is_empty());
    }

    #[test]
    fn narrow_rows_are_shape_mismatch() {
        // Three values per row cannot hold a box plus one class score.
        let cfg = class_only(1);
        let data = [0.0f32; 3];
        let t = RawDetectionTensor::candidate_major(&data, 1, 3).unwrap();
        assert_eq!(
            extract_candidates::<BestClassScalar>(&t, &cfg),
            Err(DecodeError::shape("row width", 5, 3))
        );
        assert_eq!(
            extract_range::<BestClassScalar>(&t, &cfg, 0..1),
            Err(DecodeError::shape("row width", 5, 3))
        );
    }
}

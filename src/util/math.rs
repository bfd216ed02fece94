//! Scalar helpers for score post-processing.

/// Logistic sigmoid, used when the network emits raw logits.
#[inline]
pub(crate) fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Clamps a confidence into [0, 1]; non-finite values map to `None`.
#[inline]
pub(crate) fn unit_confidence(value: f32) -> Option<f32> {
    if value.is_finite() {
        Some(value.clamp(0.0, 1.0))
    } else {
        None
    }
}

/// Returns true when `value` is finite and lies in [0, 1].
#[inline]
pub(crate) fn in_unit_range(value: f32) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}

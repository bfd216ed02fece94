//! SIMD argmax kernel using the `wide` crate.
//!
//! The row maximum is reduced 8 lanes at a time with `f32x8`; the winning
//! index is then the first position holding that maximum, which keeps the
//! lowest-index tie rule of the scalar kernel.

use crate::kernel::scalar::BestClassScalar;
use crate::kernel::ClassKernel;
use wide::f32x8;

const LANES: usize = 8;

#[inline]
fn load_f32x8(slice: &[f32]) -> f32x8 {
    f32x8::from([
        slice[0], slice[1], slice[2], slice[3], slice[4], slice[5], slice[6], slice[7],
    ])
}

/// Horizontal max of f32x8.
#[inline]
fn hmax(v: f32x8) -> f32 {
    v.to_array().into_iter().fold(f32::NEG_INFINITY, f32::max)
}

/// SIMD-accelerated argmax.
pub struct BestClassSimd;

impl ClassKernel for BestClassSimd {
    fn best_class(scores: &[f32]) -> Option<(usize, f32)> {
        let neg_inf = f32x8::splat(f32::NEG_INFINITY);
        let simd_end = scores.len() / LANES * LANES;

        let mut max_vec = neg_inf;
        let mut i = 0;
        while i < simd_end {
            let v = load_f32x8(&scores[i..]);
            // NaN lanes must never win.
            let v = v.is_nan().blend(neg_inf, v);
            max_vec = max_vec.max(v);
            i += LANES;
        }

        let mut max = hmax(max_vec);
        for &s in &scores[simd_end..] {
            if s > max {
                max = s;
            }
        }

        if max == f32::NEG_INFINITY {
            // All -inf or NaN: defer to the scalar definition.
            return BestClassScalar::best_class(scores);
        }
        let idx = scores.iter().position(|&s| s == max)?;
        Some((idx, max))
    }
}

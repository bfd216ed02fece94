//! Scalar argmax kernel.

use crate::kernel::ClassKernel;

/// Reference argmax; always available.
pub struct BestClassScalar;

impl ClassKernel for BestClassScalar {
    #[inline]
    fn best_class(scores: &[f32]) -> Option<(usize, f32)> {
        let mut best: Option<(usize, f32)> = None;
        for (idx, &score) in scores.iter().enumerate() {
            if score.is_nan() {
                continue;
            }
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((idx, score)),
            }
        }
        best
    }
}

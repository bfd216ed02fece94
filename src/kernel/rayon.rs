//! Rayon-parallel extraction and suppression (feature-gated).
//!
//! Work is split into fixed candidate chunks and per-class groups; results are
//! concatenated in input order so the output is identical to the sequential
//! path.

use crate::candidate::nms::{group_by_class, nms_greedy};
use crate::candidate::{Candidate, Detection};
use crate::config::DecodeConfig;
use crate::kernel::{extract_rows, ClassKernel};
use crate::tensor::RawDetectionTensor;
use crate::util::DecodeResult;
use rayon::prelude::*;

/// Candidates scored per rayon task.
const CHUNK: usize = 2048;

/// Chunk-parallel variant of [`crate::kernel::extract_candidates`].
pub fn extract_candidates_par<K: ClassKernel>(
    tensor: &RawDetectionTensor<'_>,
    cfg: &DecodeConfig,
) -> DecodeResult<Vec<Candidate>> {
    cfg.check_shape(tensor.num_candidates(), tensor.row_width())?;
    let n = tensor.num_candidates();
    let chunks: Vec<Vec<Candidate>> = (0..n.div_ceil(CHUNK))
        .into_par_iter()
        .map(|chunk| {
            let start = chunk * CHUNK;
            extract_rows::<K>(tensor, cfg, start..(start + CHUNK).min(n))
        })
        .collect();
    Ok(chunks.into_iter().flatten().collect())
}

/// Class-parallel variant of [`crate::candidate::nms::nms_per_class`].
pub fn nms_per_class_par(dets: Vec<Detection>, iou_threshold: f32, limit: usize) -> Vec<Detection> {
    let kept: Vec<Vec<Detection>> = group_by_class(dets)
        .into_par_iter()
        .map(|(_, mut group)| nms_greedy(&mut group, iou_threshold, limit))
        .collect();
    kept.into_iter().flatten().collect()
}

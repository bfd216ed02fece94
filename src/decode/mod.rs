//! Decoding raw detection tensors into detections.
//!
//! The pipeline is score extraction and thresholding, coordinate transform,
//! per-class NMS, then a global confidence-ordered cap. All validation happens
//! before any of those stages run.

pub mod transform;

use crate::candidate::nms::nms_per_class;
use crate::candidate::order::sort_detections_desc;
use crate::candidate::{Candidate, Detection};
use crate::config::DecodeConfig;
use crate::kernel::{extract_candidates, DefaultKernel};
use crate::tensor::{OwnedTensor, RawDetectionTensor};
use crate::trace::{trace_event, trace_span};
use crate::util::DecodeResult;
use transform::BoxTransform;

#[cfg(feature = "rayon")]
use crate::kernel::rayon::{extract_candidates_par, nms_per_class_par};

/// Reusable decoder bound to a validated config.
#[derive(Clone, Debug)]
pub struct Decoder {
    config: DecodeConfig,
    transform: BoxTransform,
}

impl Decoder {
    /// Validates `config` and builds a decoder.
    pub fn new(config: DecodeConfig) -> DecodeResult<Self> {
        config.validate()?;
        let transform = BoxTransform::from_config(&config);
        Ok(Self { config, transform })
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    /// Decodes a borrowed tensor.
    ///
    /// Returns detections in descending confidence, ties broken by lower class
    /// index and then lower candidate row.
    pub fn decode(&self, tensor: &RawDetectionTensor<'_>) -> DecodeResult<Vec<Detection>> {
        let cfg = &self.config;

        let _span = trace_span!(
            "decode",
            candidates = tensor.num_candidates(),
            classes = cfg.num_classes
        )
        .entered();

        let candidates = self.extract(tensor)?;
        trace_event!(
            "thresholded",
            candidates = tensor.num_candidates(),
            survivors = candidates.len()
        );
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let dets: Vec<Detection> = candidates
            .iter()
            .filter_map(|c| self.to_detection(c))
            .collect();

        let mut kept = self.suppress(dets);
        sort_detections_desc(&mut kept);
        kept.truncate(cfg.max_detections);
        trace_event!("decoded", detections = kept.len());
        Ok(kept)
    }

    /// Decodes an owned tensor.
    pub fn decode_owned(&self, tensor: &OwnedTensor) -> DecodeResult<Vec<Detection>> {
        self.decode(&tensor.view())
    }

    /// Maps a candidate into image space; boxes that overflow are dropped.
    fn to_detection(&self, candidate: &Candidate) -> Option<Detection> {
        let bbox = self.transform.apply(&candidate.bbox);
        if !bbox.is_finite() {
            return None;
        }
        Some(Detection {
            bbox,
            class_id: candidate.class_id,
            confidence: candidate.confidence,
            candidate_index: candidate.index,
        })
    }

    #[cfg(feature = "rayon")]
    fn extract(&self, tensor: &RawDetectionTensor<'_>) -> DecodeResult<Vec<Candidate>> {
        if self.config.parallel {
            extract_candidates_par::<DefaultKernel>(tensor, &self.config)
        } else {
            extract_candidates::<DefaultKernel>(tensor, &self.config)
        }
    }

    #[cfg(not(feature = "rayon"))]
    fn extract(&self, tensor: &RawDetectionTensor<'_>) -> DecodeResult<Vec<Candidate>> {
        extract_candidates::<DefaultKernel>(tensor, &self.config)
    }

    #[cfg(feature = "rayon")]
    fn suppress(&self, dets: Vec<Detection>) -> Vec<Detection> {
        let cfg = &self.config;
        if cfg.parallel {
            nms_per_class_par(dets, cfg.iou_threshold, cfg.max_detections)
        } else {
            nms_per_class(dets, cfg.iou_threshold, cfg.max_detections)
        }
    }

    #[cfg(not(feature = "rayon"))]
    fn suppress(&self, dets: Vec<Detection>) -> Vec<Detection> {
        let cfg = &self.config;
        nms_per_class(dets, cfg.iou_threshold, cfg.max_detections)
    }
}

/// Decodes `tensor` with `config` in one call.
pub fn decode(tensor: &RawDetectionTensor<'_>, config: &DecodeConfig) -> DecodeResult<Vec<Detection>> {
    Decoder::new(config.clone())?.decode(tensor)
}

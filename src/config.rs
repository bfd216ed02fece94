//! Decoder configuration.

use crate::util::math::in_unit_range;
use crate::util::{DecodeError, DecodeResult};

/// Width and height in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// How the final per-class confidence is formed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScoreMode {
    /// Rows are `[cx, cy, w, h, objectness, class scores...]`; confidence is
    /// `objectness * class_score`.
    #[default]
    ObjectnessTimesClass,
    /// Rows are `[cx, cy, w, h, class scores...]`; confidence is the class score.
    ClassOnly,
}

/// Activation applied to raw scores before they are combined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Activation {
    /// Scores are already probabilities.
    #[default]
    None,
    /// Scores are logits.
    Sigmoid,
}

/// Resize strategy used when the image was preprocessed for the model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResizeMode {
    /// Independent per-axis resize to the model input size.
    #[default]
    Stretch,
    /// Uniform scale preserving aspect ratio, centered with padding.
    Letterbox,
}

/// Units of the box values in the tensor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CoordinateSpace {
    /// Pixels of the model input.
    #[default]
    Pixels,
    /// Fractions in [0, 1] of the model input.
    Normalized,
}

/// Parameters for a decode call.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodeConfig {
    /// Minimum best-class confidence for a candidate to survive.
    pub confidence_threshold: f32,
    /// Same-class boxes overlapping at or above this IoU are suppressed.
    pub iou_threshold: f32,
    /// Upper bound on the number of returned detections.
    pub max_detections: usize,
    /// Size of the original captured image.
    pub input_image_size: ImageSize,
    /// Size of the tensor the network was fed.
    pub model_input_size: ImageSize,
    /// Number of classes (C).
    pub num_classes: usize,
    pub score_mode: ScoreMode,
    pub activation: Activation,
    pub resize: ResizeMode,
    pub coordinates: CoordinateSpace,
    /// When set, the tensor must carry exactly this many candidates.
    pub expected_candidates: Option<usize>,
    /// Clamp output boxes to the original image rectangle.
    pub clip_to_image: bool,
    /// Use the rayon path when the `rayon` feature is enabled.
    pub parallel: bool,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.25,
            iou_threshold: 0.45,
            max_detections: 100,
            input_image_size: ImageSize::new(320, 320),
            model_input_size: ImageSize::new(320, 320),
            num_classes: 80,
            score_mode: ScoreMode::ObjectnessTimesClass,
            activation: Activation::None,
            resize: ResizeMode::Stretch,
            coordinates: CoordinateSpace::Pixels,
            expected_candidates: None,
            clip_to_image: true,
            parallel: false,
        }
    }
}

impl DecodeConfig {
    /// Index of the first class score within a candidate row.
    pub fn class_offset(&self) -> usize {
        match self.score_mode {
            ScoreMode::ObjectnessTimesClass => 5,
            ScoreMode::ClassOnly => 4,
        }
    }

    /// Number of values per candidate this config implies.
    pub fn expected_row_width(&self) -> usize {
        self.class_offset() + self.num_classes
    }

    /// Checks thresholds, limits and sizes.
    pub fn validate(&self) -> DecodeResult<()> {
        if !in_unit_range(self.confidence_threshold) {
            return Err(DecodeError::config(
                "confidence_threshold",
                "must lie in [0, 1]",
            ));
        }
        if !in_unit_range(self.iou_threshold) {
            return Err(DecodeError::config("iou_threshold", "must lie in [0, 1]"));
        }
        if self.max_detections == 0 {
            return Err(DecodeError::config("max_detections", "must be positive"));
        }
        if self.num_classes == 0 {
            return Err(DecodeError::config("num_classes", "must be positive"));
        }
        if self.input_image_size.width == 0 || self.input_image_size.height == 0 {
            return Err(DecodeError::config("input_image_size", "must be non-zero"));
        }
        if self.model_input_size.width == 0 || self.model_input_size.height == 0 {
            return Err(DecodeError::config("model_input_size", "must be non-zero"));
        }
        Ok(())
    }

    /// Checks a tensor's candidate count and row width against this config.
    pub fn check_shape(&self, num_candidates: usize, row_width: usize) -> DecodeResult<()> {
        let expected = self.expected_row_width();
        if row_width != expected {
            return Err(DecodeError::shape("row width", expected, row_width));
        }
        if let Some(expected) = self.expected_candidates {
            if num_candidates != expected {
                return Err(DecodeError::shape("candidate count", expected, num_candidates));
            }
        }
        Ok(())
    }
}

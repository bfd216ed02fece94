//! Mapping boxes from model input space back to the captured image.
//!
//! The transform is the inverse of the preprocessing resize. For a stretch
//! resize each axis has its own factor; a letterbox resize shares one factor
//! and shifts by the centered padding.

use crate::config::{CoordinateSpace, DecodeConfig, ResizeMode};
use crate::geometry::BoundingBox;

/// Inverse preprocessing transform for one config.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxTransform {
    /// Multiplier turning tensor units into model input pixels.
    unit_x: f32,
    unit_y: f32,
    /// Padding added on the left/top of the model input.
    pad_x: f32,
    pad_y: f32,
    /// Model pixels to image pixels.
    inv_scale_x: f32,
    inv_scale_y: f32,
    /// Image rectangle for clamping, if enabled.
    clip: Option<(f32, f32)>,
}

impl BoxTransform {
    /// Builds the transform implied by a (validated) config.
    pub fn from_config(cfg: &DecodeConfig) -> Self {
        let iw = cfg.input_image_size.width as f32;
        let ih = cfg.input_image_size.height as f32;
        let mw = cfg.model_input_size.width as f32;
        let mh = cfg.model_input_size.height as f32;

        let (unit_x, unit_y) = match cfg.coordinates {
            CoordinateSpace::Pixels => (1.0, 1.0),
            CoordinateSpace::Normalized => (mw, mh),
        };

        let (pad_x, pad_y, inv_scale_x, inv_scale_y) = match cfg.resize {
            ResizeMode::Stretch => (0.0, 0.0, iw / mw, ih / mh),
            ResizeMode::Letterbox => {
                let scale = (mw / iw).min(mh / ih);
                let pad_x = (mw - iw * scale) * 0.5;
                let pad_y = (mh - ih * scale) * 0.5;
                (pad_x, pad_y, 1.0 / scale, 1.0 / scale)
            }
        };

        Self {
            unit_x,
            unit_y,
            pad_x,
            pad_y,
            inv_scale_x,
            inv_scale_y,
            clip: cfg.clip_to_image.then_some((iw, ih)),
        }
    }

    /// Maps a model-space box (top-left form, tensor units) to image pixels.
    pub fn apply(&self, bbox: &BoundingBox) -> BoundingBox {
        let x = (bbox.x * self.unit_x - self.pad_x) * self.inv_scale_x;
        let y = (bbox.y * self.unit_y - self.pad_y) * self.inv_scale_y;
        let width = bbox.width * self.unit_x * self.inv_scale_x;
        let height = bbox.height * self.unit_y * self.inv_scale_y;
        let out = BoundingBox::new(x, y, width, height);
        match self.clip {
            Some((w, h)) => out.clamp_to(w, h),
            None => out,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BoxTransform;
    use crate::config::{CoordinateSpace, DecodeConfig, ImageSize, ResizeMode};
    use crate::geometry::BoundingBox;

    fn close(a: BoundingBox, b: BoundingBox) -> bool {
        (a.x - b.x).abs() < 1e-3
            && (a.y - b.y).abs() < 1e-3
            && (a.width - b.width).abs() < 1e-3
            && (a.height - b.height).abs() < 1e-3
    }

    #[test]
    fn stretch_scales_each_axis() {
        let cfg = DecodeConfig {
            input_image_size: ImageSize::new(640, 480),
            model_input_size: ImageSize::new(320, 320),
            ..DecodeConfig::default()
        };
        let t = BoxTransform::from_config(&cfg);
        let out = t.apply(&BoundingBox::new(100.0, 100.0, 20.0, 40.0));
        assert!(close(out, BoundingBox::new(200.0, 150.0, 40.0, 60.0)));
    }

    #[test]
    fn letterbox_removes_padding() {
        // 640x480 into 320x320: scale 0.5, image occupies 320x240, pad_y = 40.
        let cfg = DecodeConfig {
            input_image_size: ImageSize::new(640, 480),
            model_input_size: ImageSize::new(320, 320),
            resize: ResizeMode::Letterbox,
            ..DecodeConfig::default()
        };
        let t = BoxTransform::from_config(&cfg);
        let out = t.apply(&BoundingBox::new(50.0, 60.0, 10.0, 20.0));
        assert!(close(out, BoundingBox::new(100.0, 40.0, 20.0, 40.0)));
    }

    #[test]
    fn normalized_coordinates_scale_by_model_size() {
        let cfg = DecodeConfig {
            input_image_size: ImageSize::new(320, 320),
            model_input_size: ImageSize::new(320, 320),
            coordinates: CoordinateSpace::Normalized,
            ..DecodeConfig::default()
        };
        let t = BoxTransform::from_config(&cfg);
        let out = t.apply(&BoundingBox::new(0.25, 0.5, 0.1, 0.1));
        assert!(close(out, BoundingBox::new(80.0, 160.0, 32.0, 32.0)));
    }

    #[test]
    fn clipping_is_optional() {
        let cfg = DecodeConfig {
            clip_to_image: false,
            ..DecodeConfig::default()
        };
        let raw = BoundingBox::new(-10.0, 300.0, 40.0, 40.0);
        assert_eq!(BoxTransform::from_config(&cfg).apply(&raw), raw);
        let clipped = BoxTransform::from_config(&DecodeConfig::default()).apply(&raw);
        assert_eq!(clipped, BoundingBox::new(0.0, 300.0, 30.0, 20.0));
    }
}

//! Axis-aligned boxes and overlap measures.

/// Axis-aligned box stored as top-left corner plus size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoundingBox {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width (non-negative for well-formed boxes).
    pub width: f32,
    /// Height (non-negative for well-formed boxes).
    pub height: f32,
}

impl BoundingBox {
    /// Creates a box from its top-left corner and size.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a box from its center and size.
    pub fn from_center(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self::new(cx - width * 0.5, cy - height * 0.5, width, height)
    }

    /// Creates a box from corner coordinates `[x_min, y_min, x_max, y_max]`.
    pub fn from_corners(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Self {
        Self::new(x_min, y_min, x_max - x_min, y_max - y_min)
    }

    /// Right edge.
    pub fn x_max(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn y_max(&self) -> f32 {
        self.y + self.height
    }

    /// True when the corners and size are all finite.
    pub fn is_finite(&self) -> bool {
        self.width.is_finite()
            && self.height.is_finite()
            && self.x.is_finite()
            && self.y.is_finite()
            && self.x_max().is_finite()
            && self.y_max().is_finite()
    }

    /// Box area; degenerate (negative-size) boxes have zero area.
    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Area of the overlap with `other`.
    pub fn intersection(&self, other: &Self) -> f32 {
        let w = self.x_max().min(other.x_max()) - self.x.max(other.x);
        let h = self.y_max().min(other.y_max()) - self.y.max(other.y);
        if w <= 0.0 || h <= 0.0 {
            return 0.0;
        }
        w * h
    }

    /// Intersection-over-union with `other`.
    ///
    /// Returns 0 when the union has zero area.
    pub fn iou(&self, other: &Self) -> f32 {
        let inter = self.intersection(other);
        let union = self.area() + other.area() - inter;
        if union <= 0.0 || !union.is_finite() {
            return 0.0;
        }
        inter / union
    }

    /// Clamps the box to `[0, width] x [0, height]`.
    pub fn clamp_to(&self, width: f32, height: f32) -> Self {
        let x0 = self.x.clamp(0.0, width);
        let y0 = self.y.clamp(0.0, height);
        let x1 = self.x_max().clamp(0.0, width);
        let y1 = self.y_max().clamp(0.0, height);
        Self::from_corners(x0, y0, x1.max(x0), y1.max(y0))
    }
}

/// Intersection-over-union of two boxes.
pub fn iou(a: &BoundingBox, b: &BoundingBox) -> f32 {
    a.iou(b)
}

#[cfg(test)]
mod tests {
    use super::BoundingBox;

    #[test]
    fn identical_boxes_have_unit_iou() {
        let a = BoundingBox::new(10.0, 10.0, 20.0, 20.0);
        assert!((a.iou(&a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn disjoint_and_touching_boxes_have_zero_iou() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(10.0, 0.0, 10.0, 10.0);
        let c = BoundingBox::new(50.0, 50.0, 1.0, 1.0);
        assert_eq!(a.iou(&b), 0.0);
        assert_eq!(a.iou(&c), 0.0);
    }

    #[test]
    fn half_overlap_matches_hand_computation() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(5.0, 0.0, 10.0, 10.0);
        // 50 / (100 + 100 - 50)
        assert!((a.iou(&b) - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn zero_area_union_is_zero() {
        let a = BoundingBox::new(3.0, 3.0, 0.0, 0.0);
        assert_eq!(a.iou(&a), 0.0);
    }

    #[test]
    fn overflowing_edges_are_not_finite() {
        assert!(BoundingBox::new(1.0, 2.0, 3.0, 4.0).is_finite());
        assert!(!BoundingBox::new(3e38, 0.0, 3e38, 1.0).is_finite());
        assert!(!BoundingBox::new(0.0, f32::NAN, 1.0, 1.0).is_finite());
    }

    #[test]
    fn from_center_and_clamp() {
        let b = BoundingBox::from_center(5.0, 5.0, 20.0, 4.0);
        assert_eq!(b, BoundingBox::new(-5.0, 3.0, 20.0, 4.0));
        let c = b.clamp_to(8.0, 8.0);
        assert_eq!(c, BoundingBox::new(0.0, 3.0, 8.0, 4.0));
    }
}

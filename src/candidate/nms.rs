//! Per-class greedy non-maximum suppression.

use crate::candidate::order::sort_detections_desc;
use crate::candidate::Detection;
use crate::trace::trace_debug;
use std::collections::BTreeMap;

/// Greedy IoU suppression within a single group.
///
/// Detections are sorted by descending confidence; each one is kept unless a
/// previously kept detection overlaps it with IoU `>= iou_threshold`. At most
/// `limit` detections are kept.
pub fn nms_greedy(dets: &mut [Detection], iou_threshold: f32, limit: usize) -> Vec<Detection> {
    sort_detections_desc(dets);
    let mut kept: Vec<Detection> = Vec::new();

    'outer: for det in dets.iter().copied() {
        if kept.len() >= limit {
            break;
        }
        for kept_det in kept.iter() {
            if kept_det.bbox.iou(&det.bbox) >= iou_threshold {
                continue 'outer;
            }
        }
        kept.push(det);
    }

    kept
}

/// Splits detections into per-class groups, ordered by class index.
pub(crate) fn group_by_class(dets: Vec<Detection>) -> Vec<(usize, Vec<Detection>)> {
    let mut groups: BTreeMap<usize, Vec<Detection>> = BTreeMap::new();
    for det in dets {
        groups.entry(det.class_id).or_default().push(det);
    }
    groups.into_iter().collect()
}

/// Runs [`nms_greedy`] independently for every class.
///
/// Overlapping detections of different classes never suppress each other. The
/// result is unordered across classes.
pub fn nms_per_class(dets: Vec<Detection>, iou_threshold: f32, limit: usize) -> Vec<Detection> {
    let mut out = Vec::new();
    for (class_id, mut group) in group_by_class(dets) {
        let before = group.len();
        let kept = nms_greedy(&mut group, iou_threshold, limit);
        trace_debug!("nms_class", class_id = class_id, before = before, kept = kept.len());
        out.extend(kept);
    }
    out
}

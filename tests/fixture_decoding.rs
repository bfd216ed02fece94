//! Decodes hand-checked JSON fixtures and compares against their expectations.

use detdecode::{DecodeConfig, Decoder, ImageSize, RawDetectionTensor};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

const BOX_TOLERANCE_PX: f32 = 1e-3;

#[derive(Debug, Deserialize)]
struct FixtureCandidate {
    #[serde(rename = "box")]
    bbox: [f32; 4],
    objectness: f32,
    scores: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct Expected {
    candidate: usize,
    class_id: usize,
    #[serde(rename = "box")]
    bbox: [f32; 4],
}

#[derive(Debug, Deserialize)]
struct Fixture {
    num_classes: usize,
    model_input_size: [u32; 2],
    input_image_size: [u32; 2],
    confidence_threshold: f32,
    iou_threshold: f32,
    max_detections: usize,
    candidates: Vec<FixtureCandidate>,
    expected: Vec<Expected>,
}

fn load_fixture(name: &str) -> Fixture {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    let text = fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {path:?}: {e}"));
    serde_json::from_str(&text).unwrap()
}

fn flatten(fixture: &Fixture) -> Vec<f32> {
    let mut data = Vec::new();
    for cand in &fixture.candidates {
        assert_eq!(cand.scores.len(), fixture.num_classes);
        data.extend_from_slice(&cand.bbox);
        data.push(cand.objectness);
        data.extend_from_slice(&cand.scores);
    }
    data
}

#[test]
fn street_scene_fixture() {
    let fixture = load_fixture("street_scene.json");
    let data = flatten(&fixture);
    let tensor =
        RawDetectionTensor::candidate_major(&data, fixture.candidates.len(), 5 + fixture.num_classes)
            .unwrap();

    let decoder = Decoder::new(DecodeConfig {
        confidence_threshold: fixture.confidence_threshold,
        iou_threshold: fixture.iou_threshold,
        max_detections: fixture.max_detections,
        input_image_size: ImageSize::new(fixture.input_image_size[0], fixture.input_image_size[1]),
        model_input_size: ImageSize::new(fixture.model_input_size[0], fixture.model_input_size[1]),
        num_classes: fixture.num_classes,
        ..DecodeConfig::default()
    })
    .unwrap();

    let dets = decoder.decode(&tensor).unwrap();
    assert_eq!(dets.len(), fixture.expected.len(), "got {dets:?}");
    for (det, exp) in dets.iter().zip(&fixture.expected) {
        assert_eq!(det.candidate_index, exp.candidate);
        assert_eq!(det.class_id, exp.class_id);
        let got = [det.bbox.x, det.bbox.y, det.bbox.width, det.bbox.height];
        for (g, e) in got.iter().zip(exp.bbox.iter()) {
            assert!(
                (g - e).abs() <= BOX_TOLERANCE_PX,
                "candidate {}: expected {:?}, got {:?}",
                exp.candidate,
                exp.bbox,
                got
            );
        }
    }
}

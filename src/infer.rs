//! Inference as an opaque capability.
//!
//! The network runtime is external: anything that turns an input into an
//! `OwnedTensor` can drive the decoder. Engines take `&mut self` because they
//! are expected to be invoked sequentially per captured image.

use crate::candidate::Detection;
use crate::decode::Decoder;
use crate::tensor::OwnedTensor;
use crate::util::DecodeError;
use thiserror::Error;

/// Something that runs a detection network.
pub trait InferenceEngine {
    /// Preprocessed model input (e.g. a resized RGB buffer).
    type Input;
    /// Engine-specific failure.
    type Error;

    /// Runs the network and returns its raw output tensor.
    fn infer(&mut self, input: &Self::Input) -> Result<OwnedTensor, Self::Error>;
}

/// Failure of [`detect`].
#[derive(Debug, Error)]
pub enum DetectError<E> {
    /// The engine failed.
    #[error("inference failed: {0}")]
    Inference(E),
    /// The engine output could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Runs `engine` on `input` and decodes the output.
pub fn detect<E: InferenceEngine>(
    engine: &mut E,
    input: &E::Input,
    decoder: &Decoder,
) -> Result<Vec<Detection>, DetectError<E::Error>> {
    let output = engine.infer(input).map_err(DetectError::Inference)?;
    Ok(decoder.decode_owned(&output)?)
}

#[cfg(test)]
mod tests {
    use super::{detect, DetectError, InferenceEngine};
    use crate::config::{DecodeConfig, ScoreMode};
    use crate::decode::Decoder;
    use crate::tensor::{OwnedTensor, TensorLayout};

    /// Replays a fixed tensor and counts invocations.
    struct Replay {
        tensor: OwnedTensor,
        calls: usize,
    }

    impl InferenceEngine for Replay {
        type Input = ();
        type Error = &'static str;

        fn infer(&mut self, _input: &()) -> Result<OwnedTensor, Self::Error> {
            self.calls += 1;
            Ok(self.tensor.clone())
        }
    }

    struct Broken;

    impl InferenceEngine for Broken {
        type Input = ();
        type Error = &'static str;

        fn infer(&mut self, _input: &()) -> Result<OwnedTensor, Self::Error> {
            Err("accelerator unavailable")
        }
    }

    fn class_only_decoder() -> Decoder {
        Decoder::new(DecodeConfig {
            num_classes: 1,
            score_mode: ScoreMode::ClassOnly,
            ..DecodeConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn detect_runs_engine_then_decoder() {
        let tensor = OwnedTensor::new(
            vec![160.0, 160.0, 32.0, 32.0, 0.8],
            vec![1, 1, 5],
            TensorLayout::CandidateMajor,
        )
        .unwrap();
        let mut engine = Replay { tensor, calls: 0 };
        let dets = detect(&mut engine, &(), &class_only_decoder()).unwrap();
        assert_eq!(engine.calls, 1);
        assert_eq!(dets.len(), 1);
        assert_eq!(dets[0].bbox.x, 144.0);
    }

    #[test]
    fn engine_errors_are_wrapped() {
        let err = detect(&mut Broken, &(), &class_only_decoder()).unwrap_err();
        assert!(matches!(err, DetectError::Inference("accelerator unavailable")));
    }

    #[test]
    fn shape_errors_surface_as_decode() {
        let tensor = OwnedTensor::zeros(vec![1, 3, 85], TensorLayout::CandidateMajor).unwrap();
        let mut engine = Replay { tensor, calls: 0 };
        let err = detect(&mut engine, &(), &class_only_decoder()).unwrap_err();
        assert!(matches!(err, DetectError::Decode(_)));
    }
}

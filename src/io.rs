//! Loading raw tensors and image metadata from disk.
//!
//! Raw tensor files are headerless little-endian f32 dumps, the format most
//! runtimes write when asked to save an output buffer. Image helpers need the
//! `image-io` feature.

#[cfg(feature = "image-io")]
use crate::config::ImageSize;
use crate::tensor::{OwnedTensor, TensorLayout};
use crate::util::{DecodeError, DecodeResult};
use std::path::Path;

/// Interprets `bytes` as little-endian f32 values.
pub fn read_f32_le(bytes: &[u8]) -> DecodeResult<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(DecodeError::shape(
            "byte length multiple of 4",
            bytes.len() / 4 * 4 + 4,
            bytes.len(),
        ));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

/// Loads a raw tensor file and checks it against `shape`.
pub fn load_tensor_file<P: AsRef<Path>>(
    path: P,
    shape: Vec<usize>,
    layout: TensorLayout,
) -> DecodeResult<OwnedTensor> {
    let bytes = std::fs::read(path)?;
    let data = read_f32_le(&bytes)?;
    OwnedTensor::new(data, shape, layout)
}

/// Reads the pixel dimensions of an image file without decoding pixels.
#[cfg(feature = "image-io")]
pub fn image_size<P: AsRef<Path>>(path: P) -> DecodeResult<ImageSize> {
    let (width, height) = image::image_dimensions(path).map_err(|err| DecodeError::ImageIo {
        reason: err.to_string(),
    })?;
    Ok(ImageSize::new(width, height))
}

#[cfg(test)]
mod tests {
    use super::{load_tensor_file, read_f32_le};
    use crate::tensor::TensorLayout;
    use crate::util::DecodeError;

    #[test]
    fn reads_little_endian_values() {
        let mut bytes = Vec::new();
        for v in [1.0f32, -2.5, 0.25] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        assert_eq!(read_f32_le(&bytes).unwrap(), vec![1.0, -2.5, 0.25]);
    }

    #[test]
    fn rejects_truncated_buffers() {
        assert!(matches!(
            read_f32_le(&[0u8; 7]),
            Err(DecodeError::ShapeMismatch { got: 7, .. })
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_tensor_file(
            "/nonexistent/detdecode/tensor.bin",
            vec![1, 1, 85],
            TensorLayout::CandidateMajor,
        )
        .unwrap_err();
        assert!(matches!(err, DecodeError::Io { .. }));
    }
}

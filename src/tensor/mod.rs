//! Raw detection tensors.
//!
//! `RawDetectionTensor` is a borrowed 2D view over the flat f32 buffer produced
//! by an inference engine. One logical row per candidate holds box geometry,
//! an optional objectness term and the per-class scores. Exports differ in how
//! that table is laid out in memory, so the view records a `TensorLayout` and
//! every accessor goes through `(candidate, attribute)` indexing.

use crate::util::{DecodeError, DecodeResult};

/// Memory layout of the candidate table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TensorLayout {
    /// Shape `[1, N, W]`: each candidate's attributes are contiguous.
    #[default]
    CandidateMajor,
    /// Shape `[1, W, N]`: each attribute is contiguous across candidates.
    AttributeMajor,
}

/// Borrowed view of a raw detection output tensor.
#[derive(Copy, Clone, Debug)]
pub struct RawDetectionTensor<'a> {
    data: &'a [f32],
    num_candidates: usize,
    row_width: usize,
    layout: TensorLayout,
}

impl<'a> RawDetectionTensor<'a> {
    /// Creates a view with explicit candidate count, row width and layout.
    pub fn new(
        data: &'a [f32],
        num_candidates: usize,
        row_width: usize,
        layout: TensorLayout,
    ) -> DecodeResult<Self> {
        if row_width == 0 {
            return Err(DecodeError::shape("row width", 1, 0));
        }
        let needed = num_candidates
            .checked_mul(row_width)
            .ok_or(DecodeError::shape("buffer length", usize::MAX, data.len()))?;
        if data.len() != needed {
            return Err(DecodeError::shape("buffer length", needed, data.len()));
        }
        Ok(Self {
            data,
            num_candidates,
            row_width,
            layout,
        })
    }

    /// Creates a `[N, W]` candidate-major view.
    pub fn candidate_major(
        data: &'a [f32],
        num_candidates: usize,
        row_width: usize,
    ) -> DecodeResult<Self> {
        Self::new(data, num_candidates, row_width, TensorLayout::CandidateMajor)
    }

    /// Creates a view from a declared tensor shape.
    ///
    /// Accepts `[1, A, B]` or `[A, B]`. For `CandidateMajor` the shape reads as
    /// `[N, W]`, for `AttributeMajor` as `[W, N]`.
    pub fn from_shape(data: &'a [f32], shape: &[usize], layout: TensorLayout) -> DecodeResult<Self> {
        let (rows, cols) = match *shape {
            [batch, rows, cols] => {
                if batch != 1 {
                    return Err(DecodeError::shape("batch", 1, batch));
                }
                (rows, cols)
            }
            [rows, cols] => (rows, cols),
            _ => return Err(DecodeError::shape("rank", 3, shape.len())),
        };
        match layout {
            TensorLayout::CandidateMajor => Self::new(data, rows, cols, layout),
            TensorLayout::AttributeMajor => Self::new(data, cols, rows, layout),
        }
    }

    /// Returns the number of candidates (N).
    pub fn num_candidates(&self) -> usize {
        self.num_candidates
    }

    /// Returns the number of values per candidate (W).
    pub fn row_width(&self) -> usize {
        self.row_width
    }

    /// Returns the memory layout.
    pub fn layout(&self) -> TensorLayout {
        self.layout
    }

    /// Returns the backing buffer.
    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }

    /// Returns attribute `attr` of candidate `candidate`, if in bounds.
    #[inline]
    pub fn value(&self, candidate: usize, attr: usize) -> Option<f32> {
        if candidate >= self.num_candidates || attr >= self.row_width {
            return None;
        }
        let idx = match self.layout {
            TensorLayout::CandidateMajor => candidate * self.row_width + attr,
            TensorLayout::AttributeMajor => attr * self.num_candidates + candidate,
        };
        self.data.get(idx).copied()
    }

    /// Returns the contiguous row of a candidate (candidate-major only).
    pub fn row(&self, candidate: usize) -> Option<&'a [f32]> {
        if self.layout != TensorLayout::CandidateMajor || candidate >= self.num_candidates {
            return None;
        }
        let start = candidate * self.row_width;
        self.data.get(start..start + self.row_width)
    }

    /// Returns attributes `[start, row_width)` of a candidate.
    ///
    /// Borrows the row directly for candidate-major tensors and gathers into
    /// `scratch` for attribute-major ones.
    pub(crate) fn tail<'s>(
        &self,
        candidate: usize,
        start: usize,
        scratch: &'s mut Vec<f32>,
    ) -> &'s [f32]
    where
        'a: 's,
    {
        let data: &'a [f32] = self.data;
        match self.layout {
            TensorLayout::CandidateMajor => {
                let base = candidate * self.row_width;
                &data[base + start..base + self.row_width]
            }
            TensorLayout::AttributeMajor => {
                let n = self.num_candidates;
                scratch.clear();
                scratch.extend((start..self.row_width).map(|attr| data[attr * n + candidate]));
                scratch.as_slice()
            }
        }
    }
}

/// Owned tensor buffer, as returned by an inference engine.
#[derive(Clone, Debug, PartialEq)]
pub struct OwnedTensor {
    data: Vec<f32>,
    shape: Vec<usize>,
    layout: TensorLayout,
    num_candidates: usize,
    row_width: usize,
}

impl OwnedTensor {
    /// Wraps a buffer after checking it against `shape`.
    pub fn new(data: Vec<f32>, shape: Vec<usize>, layout: TensorLayout) -> DecodeResult<Self> {
        let view = RawDetectionTensor::from_shape(&data, &shape, layout)?;
        let (num_candidates, row_width) = (view.num_candidates, view.row_width);
        Ok(Self {
            data,
            shape,
            layout,
            num_candidates,
            row_width,
        })
    }

    /// Creates an all-zero tensor of the given shape.
    pub fn zeros(shape: Vec<usize>, layout: TensorLayout) -> DecodeResult<Self> {
        let len = shape
            .iter()
            .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
            .ok_or(DecodeError::shape("buffer length", usize::MAX, 0))?;
        Self::new(vec![0.0; len], shape, layout)
    }

    /// Returns a borrowed view.
    pub fn view(&self) -> RawDetectionTensor<'_> {
        RawDetectionTensor {
            data: &self.data,
            num_candidates: self.num_candidates,
            row_width: self.row_width,
            layout: self.layout,
        }
    }

    /// Returns the declared shape.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Returns the backing buffer.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Returns the backing buffer mutably so an engine can fill it in place.
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }
}

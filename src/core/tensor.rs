//! Reusable input and output buffers.
//!
//! The detector allocates one [`InputTensor`] and one [`OutputVector`] when it
//! is built and rewrites them on every call. The input tensor behaves like a
//! rewindable write cursor over a fixed `[batch, height, width, channels]`
//! array; the output vector holds one row of class scores per batch element.

use crate::core::constants::{
    DIM_BATCH_SIZE, DIM_IMG_SIZE_X, DIM_IMG_SIZE_Y, DIM_PIXEL_SIZE, NUMBER_LENGTH,
};
use crate::core::errors::{DetectorError, DetectorResult};
use ndarray::{Array2, Array4, ArrayView1, ArrayView4};

/// A 2D tensor of `f32` values.
pub type Tensor2D = Array2<f32>;

/// A 4D tensor of `f32` values.
pub type Tensor4D = Array4<f32>;

/// Fixed-capacity input buffer, laid out as `[batch, height, width, channels]`.
#[derive(Debug, Clone)]
pub struct InputTensor {
    data: Tensor4D,
    cursor: usize,
}

impl InputTensor {
    /// Creates a zeroed buffer sized for the MNIST model (1x28x28x1).
    pub fn new() -> Self {
        Self::with_shape(DIM_BATCH_SIZE, DIM_IMG_SIZE_Y, DIM_IMG_SIZE_X, DIM_PIXEL_SIZE)
    }

    /// Creates a zeroed buffer with an explicit shape.
    pub fn with_shape(batch: usize, height: usize, width: usize, channels: usize) -> Self {
        Self {
            data: Tensor4D::zeros((batch, height, width, channels)),
            cursor: 0,
        }
    }

    /// Total number of slots.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Number of slots written since the last rewind.
    pub fn written(&self) -> usize {
        self.cursor
    }

    /// Returns true when every slot has been written since the last rewind.
    pub fn is_full(&self) -> bool {
        self.cursor == self.capacity()
    }

    /// Moves the write cursor back to the first slot.
    ///
    /// Existing values are kept until overwritten.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Writes `value` into the next slot and advances the cursor.
    pub fn put(&mut self, value: f32) -> DetectorResult<()> {
        let capacity = self.capacity();
        let slot = self
            .data
            .as_slice_mut()
            .and_then(|data| data.get_mut(self.cursor))
            .ok_or_else(|| {
                DetectorError::invalid_input(format!(
                    "input tensor overflow: capacity is {} values",
                    capacity
                ))
            })?;
        *slot = value;
        self.cursor += 1;
        Ok(())
    }

    /// The shape as `(batch, height, width, channels)`.
    pub fn dims(&self) -> (usize, usize, usize, usize) {
        self.data.dim()
    }

    /// Flat row-major view of every slot.
    pub fn as_slice(&self) -> &[f32] {
        self.data.as_slice().unwrap_or(&[])
    }

    /// 4D view of the buffer.
    pub fn view(&self) -> ArrayView4<'_, f32> {
        self.data.view()
    }

    /// Value of the single-channel pixel at (`row`, `col`) of the first image.
    pub fn pixel(&self, row: usize, col: usize) -> Option<f32> {
        self.data.get((0, row, col, 0)).copied()
    }
}

impl Default for InputTensor {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-class scores, one row per batch element.
#[derive(Debug, Clone)]
pub struct OutputVector {
    data: Tensor2D,
}

impl OutputVector {
    /// Creates a zeroed buffer of `DIM_BATCH_SIZE` rows by 10 classes.
    pub fn new() -> Self {
        Self::with_shape(DIM_BATCH_SIZE, NUMBER_LENGTH)
    }

    /// Creates a zeroed buffer with an explicit shape.
    pub fn with_shape(batch: usize, classes: usize) -> Self {
        Self {
            data: Tensor2D::zeros((batch, classes)),
        }
    }

    /// Number of scores per row.
    pub fn num_classes(&self) -> usize {
        self.data.ncols()
    }

    /// Number of rows.
    pub fn batch_size(&self) -> usize {
        self.data.nrows()
    }

    /// Scores of the first (and, for this model, only) batch row.
    pub fn first_row(&self) -> ArrayView1<'_, f32> {
        self.data.row(0)
    }

    /// Overwrites the whole buffer from a flat row-major slice.
    ///
    /// Fails without touching the buffer when `values` has the wrong length.
    pub fn copy_from(&mut self, values: &[f32]) -> DetectorResult<()> {
        if values.len() != self.data.len() {
            return Err(DetectorError::invalid_input(format!(
                "expected {} output scores ({}x{}), got {}",
                self.data.len(),
                self.batch_size(),
                self.num_classes(),
                values.len()
            )));
        }
        self.data
            .iter_mut()
            .zip(values)
            .for_each(|(slot, &value)| *slot = value);
        Ok(())
    }

    /// Flat row-major view of every score.
    pub fn as_slice(&self) -> &[f32] {
        self.data.as_slice().unwrap_or(&[])
    }
}

impl Default for OutputVector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_tensor_has_model_capacity() {
        let tensor = InputTensor::new();
        assert_eq!(tensor.capacity(), 784);
        assert_eq!(tensor.dims(), (1, 28, 28, 1));
        assert_eq!(tensor.written(), 0);
    }

    #[test]
    fn test_put_fills_in_row_major_order() {
        let mut tensor = InputTensor::with_shape(1, 2, 3, 1);
        for i in 0..6 {
            tensor.put(i as f32).unwrap();
        }
        assert!(tensor.is_full());
        assert_eq!(tensor.pixel(0, 2), Some(2.0));
        assert_eq!(tensor.pixel(1, 0), Some(3.0));
        assert_eq!(tensor.as_slice(), &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_put_past_capacity_fails() {
        let mut tensor = InputTensor::with_shape(1, 1, 2, 1);
        tensor.put(1.0).unwrap();
        tensor.put(2.0).unwrap();
        let err = tensor.put(3.0).unwrap_err();
        assert!(matches!(err, DetectorError::InvalidInput { .. }));
        assert_eq!(tensor.written(), 2);
    }

    #[test]
    fn test_rewind_overwrites_from_start() {
        let mut tensor = InputTensor::with_shape(1, 1, 2, 1);
        tensor.put(1.0).unwrap();
        tensor.put(2.0).unwrap();
        tensor.rewind();
        assert_eq!(tensor.written(), 0);
        tensor.put(9.0).unwrap();
        assert_eq!(tensor.as_slice(), &[9.0, 2.0]);
    }

    #[test]
    fn test_output_copy_from() {
        let mut output = OutputVector::new();
        let scores: Vec<f32> = (0..10).map(|i| i as f32 / 10.0).collect();
        output.copy_from(&scores).unwrap();
        assert_eq!(output.first_row().to_vec(), scores);
        assert_eq!(output.num_classes(), 10);
        assert_eq!(output.batch_size(), 1);
    }

    #[test]
    fn test_output_copy_from_wrong_length_keeps_old_scores() {
        let mut output = OutputVector::new();
        output.copy_from(&[1.0; 10]).unwrap();
        assert!(output.copy_from(&[0.5; 9]).is_err());
        assert_eq!(output.as_slice(), &[1.0; 10]);
    }
}

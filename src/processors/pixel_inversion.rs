//! Pixel inversion pre-processing.
//!
//! The digit model was trained on white ink over a black background, with raw
//! intensities in `0.0..=255.0`. Bitmaps drawn by users are usually the reverse:
//! black strokes on white. The pre-processor takes the blue byte of each packed
//! pixel and writes `255 - blue` into the input tensor, row by row.

use crate::core::constants::{DIM_IMG_SIZE_X, DIM_IMG_SIZE_Y};
use crate::core::errors::{DetectorError, DetectorResult};
use crate::core::tensor::InputTensor;
use crate::core::traits::PixelSource;

/// Converts a packed `0xAARRGGBB` pixel into the model's ink intensity.
///
/// Only the blue byte is read: a white pixel (`0xFF`) becomes `0.0` and a
/// black pixel (`0x00`) becomes `255.0`.
#[inline]
pub fn invert_blue_channel(packed: u32) -> f32 {
    (0xFF - (packed & 0xFF)) as f32
}

/// Fills an [`InputTensor`] from a bitmap of the expected size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigitPreprocessor {
    width: u32,
    height: u32,
}

impl DigitPreprocessor {
    /// Creates a pre-processor for the 28x28 MNIST input.
    pub fn new() -> Self {
        Self::with_size(DIM_IMG_SIZE_X as u32, DIM_IMG_SIZE_Y as u32)
    }

    /// Creates a pre-processor for another input size.
    pub fn with_size(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Expected `(width, height)` of input images.
    pub fn input_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Checks that `image` has exactly the expected dimensions.
    pub fn validate_input<I: PixelSource + ?Sized>(&self, image: &I) -> DetectorResult<()> {
        let (width, height) = image.dimensions();
        if (width, height) != (self.width, self.height) {
            return Err(DetectorError::validation_error(
                "DigitPreprocessor",
                "dimensions",
                &format!("{}x{}", self.width, self.height),
                &format!("{}x{}", width, height),
            ));
        }
        Ok(())
    }

    /// Rewinds `tensor` and writes one inverted intensity per pixel.
    ///
    /// Returns `Ok(false)` without touching the tensor when `image` is `None`;
    /// the caller should treat that as "no classification performed".
    ///
    /// # Errors
    ///
    /// Returns [`DetectorError::InvalidInput`] if the image dimensions differ
    /// from the expected size, or if the tensor capacity does not match the
    /// number of pixels. Nothing is written in either case.
    pub fn prepare<I: PixelSource + ?Sized>(
        &self,
        image: Option<&I>,
        tensor: &mut InputTensor,
    ) -> DetectorResult<bool> {
        let Some(image) = image else {
            return Ok(false);
        };
        self.validate_input(image)?;

        let pixels = self.width as usize * self.height as usize;
        if tensor.capacity() != pixels {
            return Err(DetectorError::invalid_input(format!(
                "input tensor holds {} values but the image has {} pixels",
                tensor.capacity(),
                pixels
            )));
        }

        tensor.rewind();
        for y in 0..self.height {
            for x in 0..self.width {
                tensor.put(invert_blue_channel(image.packed_pixel(x, y)))?;
            }
        }
        Ok(true)
    }
}

impl Default for DigitPreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::image::PackedBitmap;

    fn bitmap(color: u32) -> PackedBitmap {
        PackedBitmap::filled(28, 28, color)
    }

    #[test]
    fn test_invert_blue_channel() {
        assert_eq!(invert_blue_channel(0xFFFF_FFFF), 0.0);
        assert_eq!(invert_blue_channel(0xFF00_0000), 255.0);
        assert_eq!(invert_blue_channel(0xFF12_3480), 127.0);
        // red and green bytes are ignored
        assert_eq!(invert_blue_channel(0x00FF_FF00), 255.0);
    }

    #[test]
    fn test_white_image_maps_to_zero() {
        let mut tensor = InputTensor::new();
        let prepared = DigitPreprocessor::new()
            .prepare(Some(&bitmap(0xFFFF_FFFF)), &mut tensor)
            .unwrap();

        assert!(prepared);
        assert!(tensor.is_full());
        assert!(tensor.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_black_image_maps_to_255() {
        let mut tensor = InputTensor::new();
        DigitPreprocessor::new()
            .prepare(Some(&bitmap(0xFF00_0000)), &mut tensor)
            .unwrap();

        assert_eq!(tensor.written(), 784);
        assert!(tensor.as_slice().iter().all(|&v| v == 255.0));
    }

    #[test]
    fn test_row_major_order() {
        // blue byte encodes the pixel position so every slot is distinct
        let image = PackedBitmap::from_fn(28, 28, |x, y| 0xFF00_0000 | ((y * 28 + x) % 256));
        let mut tensor = InputTensor::new();
        DigitPreprocessor::new()
            .prepare(Some(&image), &mut tensor)
            .unwrap();

        for r in 0..28u32 {
            for c in 0..28u32 {
                let index = (r * 28 + c) as usize;
                let expected = (255 - (index % 256)) as f32;
                assert_eq!(tensor.as_slice()[index], expected);
                assert_eq!(tensor.pixel(r as usize, c as usize), Some(expected));
            }
        }
    }

    #[test]
    fn test_missing_image_is_noop() {
        let mut tensor = InputTensor::new();
        tensor.put(42.0).unwrap();

        let prepared = DigitPreprocessor::new()
            .prepare(None::<&PackedBitmap>, &mut tensor)
            .unwrap();

        assert!(!prepared);
        assert_eq!(tensor.written(), 1);
        assert_eq!(tensor.as_slice()[0], 42.0);
    }

    #[test]
    fn test_dimension_mismatch_is_rejected_before_writing() {
        let mut tensor = InputTensor::new();
        let err = DigitPreprocessor::new()
            .prepare(Some(&PackedBitmap::filled(32, 28, 0xFF00_0000)), &mut tensor)
            .unwrap_err();

        assert!(matches!(err, DetectorError::InvalidInput { .. }));
        assert!(err.to_string().contains("expected 28x28"));
        assert_eq!(tensor.written(), 0);
    }

    #[test]
    fn test_capacity_mismatch_is_rejected() {
        let mut tensor = InputTensor::with_shape(1, 14, 14, 1);
        let result = DigitPreprocessor::new().prepare(Some(&bitmap(0xFFFF_FFFF)), &mut tensor);
        assert!(result.is_err());
    }

    #[test]
    fn test_repeated_prepare_rewinds() {
        let mut tensor = InputTensor::new();
        let preprocessor = DigitPreprocessor::new();
        preprocessor
            .prepare(Some(&bitmap(0xFF00_0000)), &mut tensor)
            .unwrap();
        preprocessor
            .prepare(Some(&bitmap(0xFFFF_FFFF)), &mut tensor)
            .unwrap();

        assert!(tensor.is_full());
        assert!(tensor.as_slice().iter().all(|&v| v == 0.0));
    }
}

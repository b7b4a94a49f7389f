use super::*;
use crate::core::errors::DetectorResult;
use crate::core::tensor::{InputTensor, OutputVector};
use crate::core::traits::InferenceEngine;
use ndarray::ArrayView4;
use ort::value::TensorRef;
use std::sync::atomic::Ordering;

/// Views the NHWC input buffer in the layout the model declares.
///
/// NCHW is only a reshape, so it is limited to single-channel input.
pub(super) fn layout_view(
    input: &InputTensor,
    layout: InputLayout,
) -> DetectorResult<ArrayView4<'_, f32>> {
    let view = input.view();
    match layout {
        InputLayout::Nhwc => Ok(view),
        InputLayout::Nchw => {
            let (batch, height, width, channels) = input.dims();
            if channels != 1 {
                return Err(DetectorError::invalid_input(format!(
                    "NCHW reshape only supports single-channel input, got {} channels",
                    channels
                )));
            }
            Ok(view.into_shape_with_order((batch, channels, height, width))?)
        }
    }
}

impl InferenceEngine for OrtInfer {
    fn infer(&self, input: &InputTensor, output: &mut OutputVector) -> DetectorResult<()> {
        let view = layout_view(input, self.input_layout)?;
        let input_shape = view.shape().to_vec();

        let input_tensor = TensorRef::from_array_view(view).map_err(|e| {
            DetectorError::inference_error(
                &self.model_name,
                &format!("Failed to convert input tensor with shape {:?}", input_shape),
                e,
            )
        })?;
        let inputs = ort::inputs![self.input_name.as_str() => input_tensor];

        let idx = self.next_idx.fetch_add(1, Ordering::Relaxed) % self.sessions.len();
        let mut session_guard = self.sessions[idx]
            .lock()
            .map_err(|_| self.lock_error(idx))?;

        let outputs = session_guard.run(inputs).map_err(|e| {
            DetectorError::inference_error(
                &self.model_name,
                &format!(
                    "ONNX Runtime inference failed with input '{}' -> output '{}'",
                    self.input_name, self.output_name
                ),
                e,
            )
        })?;

        let (_, scores) = outputs[self.output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| {
                DetectorError::inference_error(
                    &self.model_name,
                    &format!("Failed to extract output tensor '{}' as f32", self.output_name),
                    e,
                )
            })?;

        output.copy_from(scores).map_err(|e| {
            DetectorError::inference_error(
                &self.model_name,
                &format!("Output tensor '{}' does not fit the score buffer", self.output_name),
                e,
            )
        })
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn engine_info(&self) -> String {
        format!(
            "{} (ONNX Runtime, {} session(s), input '{}' {:?}, output '{}')",
            self.model_name,
            self.sessions.len(),
            self.input_name,
            self.input_layout,
            self.output_name
        )
    }
}

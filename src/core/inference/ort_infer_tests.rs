use super::ort_infer_builders::resolve_tensor_name;
use super::ort_infer_execution::layout_view;
use super::*;
use crate::core::tensor::InputTensor;

fn artifact() -> ModelArtifact {
    ModelArtifact::from_bytes("mnist", vec![0u8; 4]).unwrap()
}

fn counting_tensor() -> InputTensor {
    let mut tensor = InputTensor::new();
    for i in 0..tensor.capacity() {
        tensor.put(i as f32).unwrap();
    }
    tensor
}

#[test]
fn test_new_with_missing_model_is_model_load_error() {
    let result = OrtInfer::new("dummy_path.onnx");
    assert!(matches!(result, Err(DetectorError::ModelLoad { .. })));
}

#[test]
fn test_resolve_tensor_name_defaults_to_first() {
    let name = resolve_tensor_name(&artifact(), "input", None, &["conv2d_input", "aux"]).unwrap();
    assert_eq!(name, "conv2d_input");
}

#[test]
fn test_resolve_tensor_name_accepts_configured_name() {
    let name = resolve_tensor_name(&artifact(), "output", Some("probs"), &["logits", "probs"]).unwrap();
    assert_eq!(name, "probs");
}

#[test]
fn test_resolve_tensor_name_rejects_unknown_name() {
    let err = resolve_tensor_name(&artifact(), "input", Some("x"), &["input_1"]).unwrap_err();
    assert!(err.is_model_load());
    assert!(err.to_string().contains("no input tensor named 'x'"));
}

#[test]
fn test_resolve_tensor_name_without_tensors() {
    let err = resolve_tensor_name(&artifact(), "output", None, &[]).unwrap_err();
    assert!(err.to_string().contains("declares no output tensors"));
}

#[test]
fn test_layout_view_nhwc_is_unchanged() {
    let tensor = counting_tensor();
    let view = layout_view(&tensor, InputLayout::Nhwc).unwrap();
    assert_eq!(view.shape(), &[1, 28, 28, 1]);
    assert_eq!(view[[0, 3, 5, 0]], 89.0);
}

#[test]
fn test_layout_view_nchw_reshapes_single_channel() {
    let tensor = counting_tensor();
    let view = layout_view(&tensor, InputLayout::Nchw).unwrap();
    assert_eq!(view.shape(), &[1, 1, 28, 28]);
    for r in 0..28 {
        for c in 0..28 {
            assert_eq!(view[[0, 0, r, c]], (r * 28 + c) as f32);
        }
    }
}

#[test]
fn test_layout_view_nchw_rejects_multi_channel() {
    let tensor = InputTensor::with_shape(1, 28, 28, 3);
    let err = layout_view(&tensor, InputLayout::Nchw).unwrap_err();
    assert!(matches!(err, DetectorError::InvalidInput { .. }));
    assert!(err.to_string().contains("3 channels"));

    assert!(layout_view(&tensor, InputLayout::Nhwc).is_ok());
}

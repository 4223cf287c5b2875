mod graph_backward;
mod graph_basic;
mod state_io;
mod update_plan;

use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;

/// 逐元素近似比较张量与期望数据
fn assert_tensor_close(actual: &Tensor, expected: &[f32], epsilon: f32) {
    let data = actual.data_as_slice();
    assert_eq!(data.len(), expected.len());
    for (a, e) in data.iter().zip(expected) {
        assert_abs_diff_eq!(*a, *e, epsilon = epsilon);
    }
}

use approx::assert_abs_diff_eq;

use super::assert_tensor_close;
use crate::nn::{Graph, GraphError, Init, VarMathOps};
use crate::tensor::Tensor;

#[test]
fn test_backward_quadratic() {
    let graph = Graph::new();
    let p = graph.parameter(&[3], Init::Zeros, "p").unwrap();
    p.set_value(&Tensor::new(&[1.0, 2.0, 3.0], &[3])).unwrap();

    // loss = sum(p^2)，梯度应为 2p
    let loss = p.square().unwrap().sum().unwrap();
    let loss_value = loss.backward().unwrap();

    assert_abs_diff_eq!(loss_value, 14.0, epsilon = 1e-6);
    let grad = p.grad().unwrap().unwrap();
    assert_tensor_close(&grad, &[2.0, 4.0, 6.0], 1e-6);
}

#[test]
fn test_backward_diamond_graph() {
    // a 被两条路径共享：loss = sum(a + 3a)，a = 2p => dloss/dp = 8
    let graph = Graph::new();
    let p = graph.parameter(&[2], Init::Zeros, "p").unwrap();
    p.set_value(&Tensor::new(&[1.0, -1.0], &[2])).unwrap();

    let a = p.mul_scalar(2.0).unwrap();
    let loss = a.try_add(&a.mul_scalar(3.0).unwrap()).unwrap().sum().unwrap();
    loss.backward().unwrap();

    let grad = p.grad().unwrap().unwrap();
    assert_tensor_close(&grad, &[8.0, 8.0], 1e-6);
}

#[test]
fn test_backward_duplicate_parent_add() {
    // loss = sum(p + p) => 梯度为2
    let graph = Graph::new();
    let p = graph.parameter(&[2], Init::Zeros, "p").unwrap();
    p.set_value(&Tensor::new(&[3.0, 4.0], &[2])).unwrap();

    let loss = p.try_add(&p).unwrap().sum().unwrap();
    loss.backward().unwrap();
    assert_tensor_close(&p.grad().unwrap().unwrap(), &[2.0, 2.0], 1e-6);
}

#[test]
fn test_backward_duplicate_parent_mul() {
    // loss = sum(p * p) => 梯度为2p
    let graph = Graph::new();
    let p = graph.parameter(&[2], Init::Zeros, "p").unwrap();
    p.set_value(&Tensor::new(&[3.0, -4.0], &[2])).unwrap();

    let loss = p.try_mul(&p).unwrap().sum().unwrap();
    loss.backward().unwrap();
    assert_tensor_close(&p.grad().unwrap().unwrap(), &[6.0, -8.0], 1e-6);
}

#[test]
fn test_backward_duplicate_parent_cancellation() {
    let graph = Graph::new();
    let p = graph.parameter(&[2], Init::Zeros, "p").unwrap();
    p.set_value(&Tensor::new(&[3.0, 4.0], &[2])).unwrap();

    // loss = sum(p - p) => 梯度为0
    let loss = p.try_sub(&p).unwrap().sum().unwrap();
    let value = loss.backward().unwrap();
    assert_abs_diff_eq!(value, 0.0, epsilon = 1e-6);
    assert_tensor_close(&p.grad().unwrap().unwrap(), &[0.0, 0.0], 1e-6);

    // loss = sum(p / p) => 对p的梯度同样为0
    let loss2 = p.try_div(&p).unwrap().sum().unwrap();
    loss2.backward().unwrap();
    assert_tensor_close(&p.grad().unwrap().unwrap(), &[0.0, 0.0], 1e-6);
}

#[test]
fn test_backward_divide() {
    let graph = Graph::new();
    let a = graph.parameter(&[2], Init::Zeros, "a").unwrap();
    let b = graph.parameter(&[2], Init::Zeros, "b").unwrap();
    a.set_value(&Tensor::new(&[1.0, 6.0], &[2])).unwrap();
    b.set_value(&Tensor::new(&[2.0, 3.0], &[2])).unwrap();

    // loss = sum(a/b)：dloss/da = 1/b；dloss/db = -a/b^2
    let loss = a.try_div(&b).unwrap().sum().unwrap();
    loss.backward().unwrap();

    assert_tensor_close(&a.grad().unwrap().unwrap(), &[0.5, 1.0 / 3.0], 1e-6);
    assert_tensor_close(&b.grad().unwrap().unwrap(), &[-0.25, -6.0 / 9.0], 1e-6);
}

#[test]
fn test_backward_sqrt_and_clip() {
    let graph = Graph::new();
    let p = graph.parameter(&[3], Init::Zeros, "p").unwrap();
    p.set_value(&Tensor::new(&[4.0, 9.0, 16.0], &[3])).unwrap();

    // d sqrt(x)/dx = 0.5/sqrt(x)
    let loss = p.sqrt().unwrap().sum().unwrap();
    loss.backward().unwrap();
    assert_tensor_close(&p.grad().unwrap().unwrap(), &[0.25, 1.0 / 6.0, 0.125], 1e-6);

    // clip 的梯度：区间内为1，区间外为0
    let clipped = p.clip(5.0, 10.0).unwrap().sum().unwrap();
    clipped.backward().unwrap();
    assert_tensor_close(&p.grad().unwrap().unwrap(), &[0.0, 1.0, 0.0], 1e-6);
}

#[test]
fn test_backward_sum_keepdims() {
    let graph = Graph::new();
    let p = graph.parameter(&[2, 3], Init::Zeros, "p").unwrap();
    p.set_value(&Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]))
        .unwrap();

    // 沿轴0求和再全量求和：每个元素的梯度都是1
    let loss = p.sum_keepdims(&[0]).unwrap().sum().unwrap();
    let value = loss.backward().unwrap();
    assert_abs_diff_eq!(value, 21.0, epsilon = 1e-6);
    assert_tensor_close(&p.grad().unwrap().unwrap(), &[1.0; 6], 1e-6);
}

#[test]
fn test_backward_requires_scalar_loss() {
    let graph = Graph::new();
    let p = graph.parameter(&[2], Init::Ones, "p").unwrap();

    let loss = p.mul_scalar(2.0).unwrap();
    assert!(matches!(
        loss.backward(),
        Err(GraphError::InvalidOperation(_))
    ));
}

#[test]
fn test_backward_truncates_at_input() {
    let graph = Graph::new();
    let x = graph.input(&Tensor::new(&[2.0, 3.0], &[2])).unwrap();
    let p = graph.parameter(&[2], Init::Ones, "p").unwrap();

    // loss = sum(x*p)：p的梯度是x的值；输入节点没有梯度
    let loss = x.try_mul(&p).unwrap().sum().unwrap();
    loss.backward().unwrap();

    assert_tensor_close(&p.grad().unwrap().unwrap(), &[2.0, 3.0], 1e-6);
    assert!(matches!(x.grad(), Err(GraphError::InvalidOperation(_))));
}

#[test]
fn test_zero_grad_clears_all() {
    let graph = Graph::new();
    let p = graph.parameter(&[2], Init::Zeros, "p").unwrap();
    p.set_value(&Tensor::new(&[1.0, 2.0], &[2])).unwrap();

    let loss = p.square().unwrap().sum().unwrap();
    loss.backward().unwrap();
    assert!(p.grad().unwrap().is_some());

    graph.zero_grad().unwrap();
    assert!(p.grad().unwrap().is_none());
}

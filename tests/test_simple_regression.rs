/*
 * @Author       : 老董
 * @Date         : 2026-02-12
 * @Description  : 简单回归任务集成测试
 *
 * 演示符号更新规则的完整训练流程：
 * 1. 构建模型 y_pred = w ∘ x（逐元素）
 * 2. loss = sum((y_pred - y)^2)
 * 3. 用 sgd 构建一次更新计划，每个训练步只需 plan.apply()
 * 4. 验证学习到的参数接近真实值 (w = 2)
 */

use approx::assert_abs_diff_eq;
use only_updates::nn::updates::sgd;
use only_updates::nn::{Graph, Init, VarMathOps};
use only_updates::tensor::Tensor;

#[test]
fn test_elementwise_regression_with_sgd() {
    let graph = Graph::new();

    // 数据：y = 2x
    let x = graph
        .input_named(&Tensor::new(&[1.0, 2.0, 3.0, 4.0], &[4]), "x")
        .unwrap();
    let y = graph
        .input_named(&Tensor::new(&[2.0, 4.0, 6.0, 8.0], &[4]), "y")
        .unwrap();

    let w = graph.parameter(&[4], Init::Zeros, "w").unwrap();

    // y_pred = w ∘ x；loss = sum((y_pred - y)^2)
    let y_pred = w.try_mul(&x).unwrap();
    let loss = y_pred.try_sub(&y).unwrap().square().unwrap().sum().unwrap();

    // 更新计划只构建一次，训练循环里反复应用
    let plan = sgd(&loss, &[w.clone()], 0.01).unwrap();

    loss.forward().unwrap();
    let initial_loss = loss.item().unwrap();
    assert_abs_diff_eq!(initial_loss, 120.0, epsilon = 1e-4);

    for _ in 0..800 {
        plan.apply().unwrap();
    }

    loss.forward().unwrap();
    let final_loss = loss.item().unwrap();
    assert!(
        final_loss < 1e-3,
        "训练后loss应接近0，实际为{final_loss}"
    );

    // 每个分量的 w 都学到了 2
    let w_value = w.value().unwrap().unwrap();
    for &v in w_value.data_as_slice() {
        assert_abs_diff_eq!(v, 2.0, epsilon = 1e-2);
    }
}

#[test]
fn test_regression_with_new_data_between_steps() {
    let graph = Graph::new();

    // 同一计划在数据变化时复用：每步喂入新的x/y
    let x = graph.input_shape(&[2], Some("x")).unwrap();
    let y = graph.input_shape(&[2], Some("y")).unwrap();
    let w = graph.parameter(&[2], Init::Zeros, "w").unwrap();

    let loss = w
        .try_mul(&x)
        .unwrap()
        .try_sub(&y)
        .unwrap()
        .square()
        .unwrap()
        .sum()
        .unwrap();
    let plan = sgd(&loss, &[w.clone()], 0.05).unwrap();

    // 两份"批次"都来自 y = 3x
    let batches = [
        ([1.0f32, 2.0], [3.0f32, 6.0]),
        ([2.0f32, 1.0], [6.0f32, 3.0]),
    ];
    for _ in 0..400 {
        for (bx, by) in &batches {
            x.set_value(&Tensor::new(bx, &[2])).unwrap();
            y.set_value(&Tensor::new(by, &[2])).unwrap();
            plan.apply().unwrap();
        }
    }

    let w_value = w.value().unwrap().unwrap();
    for &v in w_value.data_as_slice() {
        assert_abs_diff_eq!(v, 3.0, epsilon = 1e-2);
    }
}

use super::assert_tensor_close;
use crate::nn::updates::UpdatePlan;
use crate::nn::{Graph, GraphError, Init, VarMathOps};
use crate::tensor::Tensor;

#[test]
fn test_plan_push_and_inspect() {
    let graph = Graph::new();
    let p = graph.parameter(&[2], Init::Ones, "p").unwrap();
    let expr = p.mul_scalar(2.0).unwrap();

    let mut plan = UpdatePlan::new();
    assert!(plan.is_empty());

    plan.push(p.clone(), expr).unwrap();
    assert_eq!(plan.len(), 1);
    assert_eq!(plan.targets()[0].node_id(), p.node_id());
    assert_eq!(plan.entries()[0].target.node_id(), p.node_id());
}

#[test]
fn test_plan_rejects_duplicate_target() {
    let graph = Graph::new();
    let p = graph.parameter(&[2], Init::Ones, "p").unwrap();

    let mut plan = UpdatePlan::new();
    plan.push(p.clone(), p.mul_scalar(2.0).unwrap()).unwrap();
    assert!(matches!(
        plan.push(p.clone(), p.mul_scalar(3.0).unwrap()),
        Err(GraphError::InvalidOperation(_))
    ));
}

#[test]
fn test_plan_rejects_shape_mismatch() {
    let graph = Graph::new();
    let p = graph.parameter(&[2], Init::Ones, "p").unwrap();

    // sum的输出形状[1]与目标形状[2]不符
    let mut plan = UpdatePlan::new();
    assert!(matches!(
        plan.push(p.clone(), p.sum().unwrap()),
        Err(GraphError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_plan_rejects_cross_graph() {
    let graph1 = Graph::new();
    let graph2 = Graph::new();
    let p1 = graph1.parameter(&[1], Init::Ones, "p").unwrap();
    let p2 = graph2.parameter(&[1], Init::Ones, "p").unwrap();

    let mut plan = UpdatePlan::new();
    assert!(matches!(
        plan.push(p1.clone(), p2.mul_scalar(2.0).unwrap()),
        Err(GraphError::InvalidOperation(_))
    ));

    // 条目之间也必须同图
    plan.push(p1.clone(), p1.mul_scalar(2.0).unwrap()).unwrap();
    assert!(matches!(
        plan.push(p2.clone(), p2.mul_scalar(2.0).unwrap()),
        Err(GraphError::InvalidOperation(_))
    ));
}

#[test]
fn test_apply_empty_plan() {
    let plan = UpdatePlan::new();
    assert!(plan.apply().is_ok());
}

#[test]
fn test_apply_simultaneous_substitution() {
    // 经典测试：b ← a 与 a ← a+b 同时代换，b 必须拿到旧的 a
    let graph = Graph::new();
    let a = graph.parameter(&[1], Init::Constant(1.0), "a").unwrap();
    let b = graph.parameter(&[1], Init::Constant(10.0), "b").unwrap();

    let mut plan = UpdatePlan::new();
    plan.push(a.clone(), a.try_add(&b).unwrap()).unwrap();
    plan.push(b.clone(), a.clone()).unwrap();
    plan.apply().unwrap();

    assert_tensor_close(&a.value().unwrap().unwrap(), &[11.0], 1e-6);
    assert_tensor_close(&b.value().unwrap().unwrap(), &[1.0], 1e-6);
}

#[test]
fn test_apply_twice_uses_updated_state() {
    let graph = Graph::new();
    let p = graph.parameter(&[2], Init::Zeros, "p").unwrap();
    p.set_value(&Tensor::new(&[1.0, 2.0], &[2])).unwrap();

    let mut plan = UpdatePlan::new();
    plan.push(p.clone(), p.mul_scalar(2.0).unwrap()).unwrap();

    plan.apply().unwrap();
    assert_tensor_close(&p.value().unwrap().unwrap(), &[2.0, 4.0], 1e-6);

    // 第二次应用读到的是第一次写回后的值
    plan.apply().unwrap();
    assert_tensor_close(&p.value().unwrap().unwrap(), &[4.0, 8.0], 1e-6);
}

#[test]
fn test_plan_extend() {
    let graph = Graph::new();
    let a = graph.parameter(&[1], Init::Constant(1.0), "a").unwrap();
    let b = graph.parameter(&[1], Init::Constant(2.0), "b").unwrap();

    let mut plan_a = UpdatePlan::new();
    plan_a.push(a.clone(), a.add_scalar(1.0).unwrap()).unwrap();

    let mut plan_b = UpdatePlan::new();
    plan_b.push(b.clone(), b.add_scalar(1.0).unwrap()).unwrap();

    plan_a.extend(plan_b).unwrap();
    assert_eq!(plan_a.len(), 2);

    plan_a.apply().unwrap();
    assert_tensor_close(&a.value().unwrap().unwrap(), &[2.0], 1e-6);
    assert_tensor_close(&b.value().unwrap().unwrap(), &[3.0], 1e-6);
}

#[test]
fn test_plan_extend_detects_duplicate_target() {
    let graph = Graph::new();
    let a = graph.parameter(&[1], Init::Constant(1.0), "a").unwrap();

    let mut plan1 = UpdatePlan::new();
    plan1.push(a.clone(), a.add_scalar(1.0).unwrap()).unwrap();

    let mut plan2 = UpdatePlan::new();
    plan2.push(a.clone(), a.add_scalar(2.0).unwrap()).unwrap();

    assert!(matches!(
        plan1.extend(plan2),
        Err(GraphError::InvalidOperation(_))
    ));
}

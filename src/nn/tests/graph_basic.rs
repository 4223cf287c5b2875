use crate::nn::{Graph, GraphError, GraphInner, Init};
use crate::tensor::Tensor;

#[test]
fn test_node_auto_naming() {
    let mut graph = GraphInner::new();

    // 1. 测试自动命名：type_1、type_2……
    let p1 = graph
        .new_parameter_node(&[2], &Init::Zeros, None)
        .unwrap();
    let p2 = graph
        .new_parameter_node(&[2], &Init::Zeros, None)
        .unwrap();
    assert_eq!(graph.get_node_name(p1).unwrap(), "parameter_1");
    assert_eq!(graph.get_node_name(p2).unwrap(), "parameter_2");

    // 2. 测试显式命名
    let w = graph
        .new_parameter_node(&[2], &Init::Zeros, Some("w"))
        .unwrap();
    assert_eq!(graph.get_node_name(w).unwrap(), "w");

    // 3. 测试名称重复
    let result = graph.new_parameter_node(&[2], &Init::Zeros, Some("w"));
    assert_eq!(
        result,
        Err(GraphError::DuplicateNodeName(
            "节点w在图default_graph中重复".to_string()
        ))
    );
}

#[test]
fn test_node_id_and_lookup_by_name() {
    let mut graph = GraphInner::new();
    let a = graph.new_input_node(&[1], Some("a")).unwrap();
    let b = graph.new_input_node(&[1], Some("b")).unwrap();

    // ID 从1开始递增
    assert_eq!(a.0, 1);
    assert_eq!(b.0, 2);

    assert_eq!(graph.get_node_by_name("a"), Some(a));
    assert_eq!(graph.get_node_by_name("b"), Some(b));
    assert_eq!(graph.get_node_by_name("c"), None);
    assert_eq!(graph.nodes_count(), 2);
}

#[test]
fn test_parent_child_edges() {
    let mut graph = GraphInner::new();
    let x = graph.new_input_node(&[2], Some("x")).unwrap();
    let y = graph.new_input_node(&[2], Some("y")).unwrap();
    let sum = graph.new_add_node(&[x, y], Some("sum")).unwrap();

    assert_eq!(graph.get_node_parents(sum).unwrap(), vec![x, y]);
    assert_eq!(graph.get_node_children(x).unwrap(), vec![sum]);
    assert_eq!(graph.get_node_children(sum).unwrap().len(), 0);
}

#[test]
fn test_set_value_only_on_leaf_nodes() {
    let mut graph = GraphInner::new();
    let x = graph.new_input_node(&[2], Some("x")).unwrap();
    let p = graph
        .new_parameter_node(&[2], &Init::Zeros, Some("p"))
        .unwrap();
    let acc = graph.new_accumulator_node(&[2], Some("acc")).unwrap();
    let sum = graph.new_add_node(&[x, p], Some("sum")).unwrap();

    let value = Tensor::new(&[1.0, 2.0], &[2]);

    // 叶子节点（输入/参数/累积量）可被外部赋值
    assert!(graph.set_node_value(x, Some(&value)).is_ok());
    assert!(graph.set_node_value(p, Some(&value)).is_ok());
    assert!(graph.set_node_value(acc, Some(&value)).is_ok());

    // 计算节点的值只能由前向传播得出
    assert!(matches!(
        graph.set_node_value(sum, Some(&value)),
        Err(GraphError::InvalidOperation(_))
    ));
}

#[test]
fn test_set_value_shape_checked() {
    let mut graph = GraphInner::new();
    let x = graph.new_input_node(&[2, 3], Some("x")).unwrap();

    let wrong = Tensor::new(&[1.0, 2.0], &[2]);
    assert!(matches!(
        graph.set_node_value(x, Some(&wrong)),
        Err(GraphError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_accumulator_zero_initialized() {
    let mut graph = GraphInner::new();
    let acc = graph.new_accumulator_node(&[2, 2], Some("acc")).unwrap();

    // 累积量创建即有值（全零），可直接参与前向传播
    let value = graph.get_node_value(acc).unwrap().unwrap();
    assert_eq!(value.shape(), &[2, 2]);
    assert!(value.data_as_slice().iter().all(|&v| v == 0.0));
}

#[test]
fn test_forward_requires_fed_inputs() {
    let mut graph = GraphInner::new();
    let x = graph.new_input_node(&[2], Some("x")).unwrap();
    let p = graph
        .new_parameter_node(&[2], &Init::Ones, Some("p"))
        .unwrap();
    let sum = graph.new_add_node(&[x, p], Some("sum")).unwrap();

    // 输入未喂值时前向传播失败
    assert!(matches!(
        graph.forward(sum),
        Err(GraphError::InvalidOperation(_))
    ));

    graph
        .set_node_value(x, Some(&Tensor::new(&[1.0, 2.0], &[2])))
        .unwrap();
    graph.forward(sum).unwrap();
    assert_eq!(
        graph.get_node_value(sum).unwrap().unwrap().data_as_slice(),
        &[2.0, 3.0]
    );
}

#[test]
fn test_forward_recomputes_after_value_change() {
    let mut graph = GraphInner::new();
    let p = graph
        .new_parameter_node(&[1], &Init::Constant(2.0), Some("p"))
        .unwrap();
    let doubled = graph.new_scalar_multiply_node(p, 3.0, Some("tripled")).unwrap();

    graph.forward(doubled).unwrap();
    assert_eq!(
        graph.get_node_value(doubled).unwrap().unwrap().number(),
        Some(6.0)
    );

    // 改变参数值后，新的前向pass重新计算
    graph
        .set_node_value(p, Some(&Tensor::new(&[5.0], &[1])))
        .unwrap();
    graph.forward(doubled).unwrap();
    assert_eq!(
        graph.get_node_value(doubled).unwrap().unwrap().number(),
        Some(15.0)
    );
}

#[test]
fn test_forward_nodes_shares_one_pass() {
    let mut graph = GraphInner::new();
    let p = graph
        .new_parameter_node(&[1], &Init::Constant(1.0), Some("p"))
        .unwrap();
    let a = graph.new_scalar_add_node(p, 1.0, Some("a")).unwrap();
    let b = graph.new_scalar_add_node(p, 2.0, Some("b")).unwrap();

    let before = graph.last_forward_pass_id();
    graph.forward_nodes(&[a, b]).unwrap();
    // 两个根只消耗一个前向pass
    assert_eq!(graph.last_forward_pass_id(), before + 1);
    assert_eq!(graph.get_node_value(a).unwrap().unwrap().number(), Some(2.0));
    assert_eq!(graph.get_node_value(b).unwrap().unwrap().number(), Some(3.0));
}

#[test]
fn test_stateful_nodes_collect_parameters_and_accumulators() {
    let mut graph = GraphInner::new();
    let x = graph.new_input_node(&[1], Some("x")).unwrap();
    let p = graph
        .new_parameter_node(&[1], &Init::Zeros, Some("p"))
        .unwrap();
    let acc = graph.new_accumulator_node(&[1], Some("acc")).unwrap();
    let _op = graph.new_add_node(&[x, p], None).unwrap();

    let mut stateful = graph.get_stateful_nodes();
    stateful.sort();
    assert_eq!(stateful, vec![p, acc]);

    assert_eq!(graph.get_parameter_nodes(), vec![p]);
}

#[test]
fn test_seeded_graph_parameter_init_is_deterministic() {
    let make = || {
        let mut graph = GraphInner::new_with_seed(42);
        let p = graph
            .new_parameter_node(&[3, 3], &Init::Normal { mean: 0.0, std: 1.0 }, Some("p"))
            .unwrap();
        graph.get_node_value(p).unwrap().unwrap().clone()
    };
    assert_eq!(make(), make());
}

#[test]
fn test_graph_handle_shares_inner() {
    let graph = Graph::new();
    let p = graph
        .parameter(&[2], Init::Constant(1.5), "p")
        .unwrap();

    // handle clone 与 Var 引用同一个 GraphInner
    let graph2 = graph.clone();
    assert_eq!(graph2.inner().nodes_count(), 1);
    assert_eq!(
        p.value().unwrap().unwrap().data_as_slice(),
        &[1.5, 1.5]
    );

    // 原 handle drop 后 Var 仍持有图
    drop(graph);
    drop(graph2);
    let revived = p.get_graph();
    assert_eq!(revived.inner().nodes_count(), 1);
}

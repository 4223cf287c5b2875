use super::op_node_common_methods;
use crate::nn::nodes::raw_node::{parent_value, TraitNode};
use crate::nn::nodes::{NodeHandle, NodeId};
use crate::nn::GraphError;
use crate::tensor::Tensor;

/// 标量乘法节点：x * factor，factor是创建时固化的f32常量（如学习率）
#[derive(Clone)]
pub(crate) struct ScalarMultiply {
    id: Option<NodeId>,
    name: Option<String>,
    value: Option<Tensor>,
    grad: Option<Tensor>,
    factor: f32,
    shape: Vec<usize>,
}

impl ScalarMultiply {
    pub(crate) fn new(parent: &NodeHandle, factor: f32) -> Self {
        Self {
            id: None,
            name: None,
            value: None,
            grad: None,
            factor,
            shape: parent.value_expected_shape().to_vec(),
        }
    }
}

impl TraitNode for ScalarMultiply {
    op_node_common_methods!();

    fn type_name(&self) -> &'static str {
        "ScalarMultiply"
    }

    fn calc_value_by_parents(&mut self, parents: &[NodeHandle]) -> Result<(), GraphError> {
        let x = parent_value(&self.display_node(), &parents[0])?;
        self.value = Some(x * self.factor);
        Ok(())
    }

    fn calc_grad_to_parent(
        &self,
        _target_parent: &NodeHandle,
        upstream_grad: &Tensor,
        _assistant_parent: Option<&NodeHandle>,
    ) -> Result<Tensor, GraphError> {
        Ok(upstream_grad * self.factor)
    }
}

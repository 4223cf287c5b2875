use super::op_node_common_methods;
use crate::nn::nodes::raw_node::{parent_value, TraitNode};
use crate::nn::nodes::{NodeHandle, NodeId};
use crate::nn::GraphError;
use crate::tensor::Tensor;

/// 标量加法节点：x + offset，offset是创建时固化的f32常量（如epsilon）
#[derive(Clone)]
pub(crate) struct ScalarAdd {
    id: Option<NodeId>,
    name: Option<String>,
    value: Option<Tensor>,
    grad: Option<Tensor>,
    offset: f32,
    shape: Vec<usize>,
}

impl ScalarAdd {
    pub(crate) fn new(parent: &NodeHandle, offset: f32) -> Self {
        Self {
            id: None,
            name: None,
            value: None,
            grad: None,
            offset,
            shape: parent.value_expected_shape().to_vec(),
        }
    }
}

impl TraitNode for ScalarAdd {
    op_node_common_methods!();

    fn type_name(&self) -> &'static str {
        "ScalarAdd"
    }

    fn calc_value_by_parents(&mut self, parents: &[NodeHandle]) -> Result<(), GraphError> {
        let x = parent_value(&self.display_node(), &parents[0])?;
        self.value = Some(x + self.offset);
        Ok(())
    }

    fn calc_grad_to_parent(
        &self,
        _target_parent: &NodeHandle,
        upstream_grad: &Tensor,
        _assistant_parent: Option<&NodeHandle>,
    ) -> Result<Tensor, GraphError> {
        Ok(upstream_grad.clone())
    }
}

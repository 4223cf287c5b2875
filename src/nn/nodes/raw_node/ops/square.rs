use super::op_node_common_methods;
use crate::nn::nodes::raw_node::{parent_value, TraitNode};
use crate::nn::nodes::{NodeHandle, NodeId};
use crate::nn::GraphError;
use crate::tensor::Tensor;

/// 逐元素平方节点
#[derive(Clone)]
pub(crate) struct Square {
    id: Option<NodeId>,
    name: Option<String>,
    value: Option<Tensor>,
    grad: Option<Tensor>,
    shape: Vec<usize>,
}

impl Square {
    pub(crate) fn new(parent: &NodeHandle) -> Self {
        Self {
            id: None,
            name: None,
            value: None,
            grad: None,
            shape: parent.value_expected_shape().to_vec(),
        }
    }
}

impl TraitNode for Square {
    op_node_common_methods!();

    fn type_name(&self) -> &'static str {
        "Square"
    }

    fn calc_value_by_parents(&mut self, parents: &[NodeHandle]) -> Result<(), GraphError> {
        let x = parent_value(&self.display_node(), &parents[0])?;
        self.value = Some(x.square());
        Ok(())
    }

    fn calc_grad_to_parent(
        &self,
        target_parent: &NodeHandle,
        upstream_grad: &Tensor,
        _assistant_parent: Option<&NodeHandle>,
    ) -> Result<Tensor, GraphError> {
        // d(x^2)/dx = 2x
        let x = parent_value(&self.display_node(), target_parent)?;
        Ok(upstream_grad * &(x * 2.0))
    }
}

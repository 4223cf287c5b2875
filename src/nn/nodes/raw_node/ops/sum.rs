use super::op_node_common_methods;
use crate::nn::nodes::raw_node::{parent_value, TraitNode};
use crate::nn::nodes::{NodeHandle, NodeId};
use crate::nn::GraphError;
use crate::tensor::Tensor;

/// 全元素求和节点：输出形状固定为[1]，常用于把损失压成标量
#[derive(Clone)]
pub(crate) struct Sum {
    id: Option<NodeId>,
    name: Option<String>,
    value: Option<Tensor>,
    grad: Option<Tensor>,
    input_shape: Vec<usize>,
    shape: Vec<usize>,
}

impl Sum {
    pub(crate) fn new(parent: &NodeHandle) -> Self {
        Self {
            id: None,
            name: None,
            value: None,
            grad: None,
            input_shape: parent.value_expected_shape().to_vec(),
            shape: vec![1],
        }
    }
}

impl TraitNode for Sum {
    op_node_common_methods!();

    fn type_name(&self) -> &'static str {
        "Sum"
    }

    fn calc_value_by_parents(&mut self, parents: &[NodeHandle]) -> Result<(), GraphError> {
        let x = parent_value(&self.display_node(), &parents[0])?;
        self.value = Some(x.sum());
        Ok(())
    }

    fn calc_grad_to_parent(
        &self,
        _target_parent: &NodeHandle,
        upstream_grad: &Tensor,
        _assistant_parent: Option<&NodeHandle>,
    ) -> Result<Tensor, GraphError> {
        // 求和对每个输入元素的梯度都是1，上游梯度按输入形状铺开
        upstream_grad
            .broadcast_to(&self.input_shape)
            .map_err(|e| GraphError::ComputationError(format!("{e}")))
    }
}

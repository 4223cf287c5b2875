use super::op_node_common_methods;
use crate::nn::nodes::raw_node::{parent_value, TraitNode};
use crate::nn::nodes::{NodeHandle, NodeId};
use crate::nn::GraphError;
use crate::tensor::Tensor;

/// 逐元素减法节点：minuend - subtrahend，两父节点须同形状
#[derive(Clone)]
pub(crate) struct Subtract {
    id: Option<NodeId>,
    name: Option<String>,
    value: Option<Tensor>,
    grad: Option<Tensor>,
    minuend_id: NodeId,
    subtrahend_id: NodeId,
    shape: Vec<usize>,
}

impl Subtract {
    pub(crate) fn new(minuend: &NodeHandle, subtrahend: &NodeHandle) -> Result<Self, GraphError> {
        let shape = minuend.value_expected_shape().to_vec();
        if subtrahend.value_expected_shape() != shape {
            return Err(GraphError::ShapeMismatch {
                expected: shape,
                got: subtrahend.value_expected_shape().to_vec(),
                message: "Subtract节点的两个父节点形状必须相同".to_string(),
            });
        }
        Ok(Self {
            id: None,
            name: None,
            value: None,
            grad: None,
            minuend_id: minuend.id(),
            subtrahend_id: subtrahend.id(),
            shape,
        })
    }
}

impl TraitNode for Subtract {
    op_node_common_methods!();

    fn type_name(&self) -> &'static str {
        "Subtract"
    }

    fn calc_value_by_parents(&mut self, parents: &[NodeHandle]) -> Result<(), GraphError> {
        let minuend = parent_value(&self.display_node(), &parents[0])?;
        let subtrahend = parent_value(&self.display_node(), &parents[1])?;
        self.value = Some(minuend - subtrahend);
        Ok(())
    }

    fn calc_grad_to_parent(
        &self,
        target_parent: &NodeHandle,
        upstream_grad: &Tensor,
        _assistant_parent: Option<&NodeHandle>,
    ) -> Result<Tensor, GraphError> {
        let target_id = target_parent.id();
        if self.minuend_id == self.subtrahend_id && target_id == self.minuend_id {
            // x - x对x的总梯度为0
            return Ok(Tensor::zeros(upstream_grad.shape()));
        }
        if target_id == self.minuend_id {
            Ok(upstream_grad.clone())
        } else if target_id == self.subtrahend_id {
            Ok(-upstream_grad)
        } else {
            Err(GraphError::InvalidOperation(format!(
                "{}不是{}的父节点",
                target_parent,
                self.display_node()
            )))
        }
    }
}

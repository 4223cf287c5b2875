use super::op_node_common_methods;
use crate::nn::nodes::raw_node::{parent_value, TraitNode};
use crate::nn::nodes::{NodeHandle, NodeId};
use crate::nn::GraphError;
use crate::tensor::Tensor;

/// 逐元素除法节点：numerator / denominator，两父节点须同形状
#[derive(Clone)]
pub(crate) struct Divide {
    id: Option<NodeId>,
    name: Option<String>,
    value: Option<Tensor>,
    grad: Option<Tensor>,
    numerator_id: NodeId,
    denominator_id: NodeId,
    shape: Vec<usize>,
}

impl Divide {
    pub(crate) fn new(numerator: &NodeHandle, denominator: &NodeHandle) -> Result<Self, GraphError> {
        let shape = numerator.value_expected_shape().to_vec();
        if denominator.value_expected_shape() != shape {
            return Err(GraphError::ShapeMismatch {
                expected: shape,
                got: denominator.value_expected_shape().to_vec(),
                message: "Divide节点的两个父节点形状必须相同".to_string(),
            });
        }
        Ok(Self {
            id: None,
            name: None,
            value: None,
            grad: None,
            numerator_id: numerator.id(),
            denominator_id: denominator.id(),
            shape,
        })
    }
}

impl TraitNode for Divide {
    op_node_common_methods!();

    fn type_name(&self) -> &'static str {
        "Divide"
    }

    fn calc_value_by_parents(&mut self, parents: &[NodeHandle]) -> Result<(), GraphError> {
        let numerator = parent_value(&self.display_node(), &parents[0])?;
        let denominator = parent_value(&self.display_node(), &parents[1])?;
        if denominator.has_zero_value() {
            return Err(GraphError::ComputationError(format!(
                "{}的除数中含有0元素",
                self.display_node()
            )));
        }
        self.value = Some(numerator / denominator);
        Ok(())
    }

    fn calc_grad_to_parent(
        &self,
        target_parent: &NodeHandle,
        upstream_grad: &Tensor,
        assistant_parent: Option<&NodeHandle>,
    ) -> Result<Tensor, GraphError> {
        let target_id = target_parent.id();
        if self.numerator_id == self.denominator_id && target_id == self.numerator_id {
            // x / x对x的总梯度为0
            return Ok(Tensor::zeros(upstream_grad.shape()));
        }
        let other = assistant_parent.ok_or_else(|| {
            GraphError::ComputationError(format!(
                "{}求梯度缺少另一父节点。不该触及本错误，否则说明crate代码有问题",
                self.display_node()
            ))
        })?;
        let target_value = parent_value(&self.display_node(), target_parent)?;
        let other_value = parent_value(&self.display_node(), other)?;
        if target_id == self.numerator_id {
            // d(a/b)/da = 1/b
            Ok(upstream_grad / other_value)
        } else if target_id == self.denominator_id {
            // d(a/b)/db = -a/b^2
            Ok(-(upstream_grad * &(other_value / &target_value.square())))
        } else {
            Err(GraphError::InvalidOperation(format!(
                "{}不是{}的父节点",
                target_parent,
                self.display_node()
            )))
        }
    }
}

use super::op_node_common_methods;
use crate::nn::nodes::raw_node::{parent_value, TraitNode};
use crate::nn::nodes::{NodeHandle, NodeId};
use crate::nn::GraphError;
use crate::tensor::{shape_broadcastable_to, Tensor};

/// 逐元素乘法节点：lhs * rhs。
/// 前向允许rhs向lhs广播（范数约束里“张量×缩放比”会用到），
/// 但广播形态下不支持求导。
#[derive(Clone)]
pub(crate) struct Multiply {
    id: Option<NodeId>,
    name: Option<String>,
    value: Option<Tensor>,
    grad: Option<Tensor>,
    lhs_id: NodeId,
    rhs_id: NodeId,
    broadcasting: bool,
    shape: Vec<usize>,
}

impl Multiply {
    pub(crate) fn new(lhs: &NodeHandle, rhs: &NodeHandle) -> Result<Self, GraphError> {
        let shape = lhs.value_expected_shape().to_vec();
        let rhs_shape = rhs.value_expected_shape();
        let broadcasting = rhs_shape != shape;
        if broadcasting && !shape_broadcastable_to(rhs_shape, &shape) {
            return Err(GraphError::ShapeMismatch {
                expected: shape,
                got: rhs_shape.to_vec(),
                message: "Multiply节点要求rhs与lhs同形状，或可广播到lhs的形状".to_string(),
            });
        }
        Ok(Self {
            id: None,
            name: None,
            value: None,
            grad: None,
            lhs_id: lhs.id(),
            rhs_id: rhs.id(),
            broadcasting,
            shape,
        })
    }
}

impl TraitNode for Multiply {
    op_node_common_methods!();

    fn type_name(&self) -> &'static str {
        "Multiply"
    }

    fn calc_value_by_parents(&mut self, parents: &[NodeHandle]) -> Result<(), GraphError> {
        let lhs = parent_value(&self.display_node(), &parents[0])?;
        let rhs = parent_value(&self.display_node(), &parents[1])?;
        self.value = Some(lhs * rhs);
        Ok(())
    }

    fn calc_grad_to_parent(
        &self,
        target_parent: &NodeHandle,
        upstream_grad: &Tensor,
        assistant_parent: Option<&NodeHandle>,
    ) -> Result<Tensor, GraphError> {
        if self.broadcasting {
            return Err(GraphError::InvalidOperation(format!(
                "{}的rhs经过了广播，暂不支持对广播乘法求导",
                self.display_node()
            )));
        }
        if self.lhs_id == self.rhs_id && target_parent.id() == self.lhs_id {
            // x * x对x的梯度为2x
            let x = parent_value(&self.display_node(), target_parent)?;
            return Ok(upstream_grad * &(x * 2.0));
        }
        let other = assistant_parent.ok_or_else(|| {
            GraphError::ComputationError(format!(
                "{}求梯度缺少另一父节点。不该触及本错误，否则说明crate代码有问题",
                self.display_node()
            ))
        })?;
        let other_value = parent_value(&self.display_node(), other)?;
        Ok(upstream_grad * other_value)
    }
}

use super::op_node_common_methods;
use crate::nn::nodes::raw_node::{parent_value, TraitNode};
use crate::nn::nodes::{NodeHandle, NodeId};
use crate::nn::GraphError;
use crate::tensor::Tensor;

/// 逐元素裁剪节点：把值限制在[min, max]区间内
#[derive(Clone)]
pub(crate) struct Clip {
    id: Option<NodeId>,
    name: Option<String>,
    value: Option<Tensor>,
    grad: Option<Tensor>,
    min: f32,
    max: f32,
    shape: Vec<usize>,
}

impl Clip {
    pub(crate) fn new(parent: &NodeHandle, min: f32, max: f32) -> Result<Self, GraphError> {
        if min > max {
            return Err(GraphError::InvalidOperation(format!(
                "Clip节点的下界({min})不能大于上界({max})"
            )));
        }
        Ok(Self {
            id: None,
            name: None,
            value: None,
            grad: None,
            min,
            max,
            shape: parent.value_expected_shape().to_vec(),
        })
    }
}

impl TraitNode for Clip {
    op_node_common_methods!();

    fn type_name(&self) -> &'static str {
        "Clip"
    }

    fn calc_value_by_parents(&mut self, parents: &[NodeHandle]) -> Result<(), GraphError> {
        let x = parent_value(&self.display_node(), &parents[0])?;
        self.value = Some(x.clamp(self.min, self.max));
        Ok(())
    }

    fn calc_grad_to_parent(
        &self,
        target_parent: &NodeHandle,
        upstream_grad: &Tensor,
        _assistant_parent: Option<&NodeHandle>,
    ) -> Result<Tensor, GraphError> {
        // 区间内梯度为1，区间外为0
        let x = parent_value(&self.display_node(), target_parent)?;
        let mask = x.map(|v| {
            if v >= self.min && v <= self.max {
                1.0
            } else {
                0.0
            }
        });
        Ok(upstream_grad * &mask)
    }
}

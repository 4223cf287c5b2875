use super::op_node_common_methods;
use crate::nn::nodes::raw_node::{parent_value, TraitNode};
use crate::nn::nodes::{NodeHandle, NodeId};
use crate::nn::GraphError;
use crate::tensor::Tensor;

/// 逐元素开平方节点
#[derive(Clone)]
pub(crate) struct Sqrt {
    id: Option<NodeId>,
    name: Option<String>,
    value: Option<Tensor>,
    grad: Option<Tensor>,
    shape: Vec<usize>,
}

impl Sqrt {
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

impl TraitNode for Sqrt {
    op_node_common_methods!();

    fn type_name(&self) -> &'static str {
        "Sqrt"
    }

    fn calc_value_by_parents(&mut self, parents: &[NodeHandle]) -> Result<(), GraphError> {
        let x = parent_value(&self.display_node(), &parents[0])?;
        self.value = Some(x.sqrt());
        Ok(())
    }

    fn calc_grad_to_parent(
        &self,
        _target_parent: &NodeHandle,
        upstream_grad: &Tensor,
        _assistant_parent: Option<&NodeHandle>,
    ) -> Result<Tensor, GraphError> {
        // d(sqrt(x))/dx = 0.5 / sqrt(x)，其中sqrt(x)就是本节点的值
        let y = self.value().ok_or_else(|| {
            GraphError::ComputationError(format!(
                "{}没有值。不该触及本错误，否则说明crate代码有问题",
                self.display_node()
            ))
        })?;
        Ok(upstream_grad * &y.map(|v| 0.5 / v))
    }
}

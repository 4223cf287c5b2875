use super::op_node_common_methods;
use crate::nn::nodes::raw_node::{parent_value, TraitNode};
use crate::nn::nodes::{NodeHandle, NodeId};
use crate::nn::GraphError;
use crate::tensor::Tensor;

/// 逐元素加法节点，支持2个及以上的同形状父节点
#[derive(Clone)]
pub(crate) struct Add {
    id: Option<NodeId>,
    name: Option<String>,
    value: Option<Tensor>,
    grad: Option<Tensor>,
    parents_ids: Vec<NodeId>,
    shape: Vec<usize>,
}

impl Add {
    pub(crate) fn new(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        // 1. 必要的验证
        // 1.1 父节点数量验证
        if parents.len() < 2 {
            return Err(GraphError::InvalidOperation(
                "Add节点至少需要2个父节点".to_string(),
            ));
        }

        // 1.2 验证所有父节点形状相同
        let shape = parents[0].value_expected_shape().to_vec();
        for parent in parents.iter().skip(1) {
            if parent.value_expected_shape() != shape {
                return Err(GraphError::ShapeMismatch {
                    expected: shape.clone(),
                    got: parent.value_expected_shape().to_vec(),
                    message: "Add节点的所有父节点形状必须相同".to_string(),
                });
            }
        }

        // 2. 返回
        Ok(Self {
            id: None,
            name: None,
            value: None,
            grad: None,
            parents_ids: parents.iter().map(|p| p.id()).collect(),
            shape,
        })
    }
}

impl TraitNode for Add {
    op_node_common_methods!();

    fn type_name(&self) -> &'static str {
        "Add"
    }

    fn calc_value_by_parents(&mut self, parents: &[NodeHandle]) -> Result<(), GraphError> {
        let mut result: Option<Tensor> = None;
        for parent in parents {
            let parent_value = parent_value(&self.display_node(), parent)?;
            match &mut result {
                None => result = Some(parent_value.clone()),
                Some(sum) => *sum = &*sum + parent_value,
            }
        }
        self.value = result;
        Ok(())
    }

    fn calc_grad_to_parent(
        &self,
        target_parent: &NodeHandle,
        upstream_grad: &Tensor,
        _assistant_parent: Option<&NodeHandle>,
    ) -> Result<Tensor, GraphError> {
        // 同一父节点可能在加法中出现多次（如x+x），梯度按出现次数累加
        let occurrences = self
            .parents_ids
            .iter()
            .filter(|id| **id == target_parent.id())
            .count();
        if occurrences == 0 {
            return Err(GraphError::InvalidOperation(format!(
                "{}不是{}的父节点",
                target_parent,
                self.display_node()
            )));
        }
        Ok(upstream_grad * occurrences as f32)
    }
}

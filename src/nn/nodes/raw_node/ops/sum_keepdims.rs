use super::op_node_common_methods;
use crate::nn::nodes::raw_node::{parent_value, TraitNode};
use crate::nn::nodes::{NodeHandle, NodeId};
use crate::nn::GraphError;
use crate::tensor::Tensor;

/// 沿指定轴求和并保留维度的节点：被求和的轴在输出中变为1。
/// 保留维度使输出可以直接与输入做广播运算（范数约束依赖这一点）。
#[derive(Clone)]
pub(crate) struct SumKeepDims {
    id: Option<NodeId>,
    name: Option<String>,
    value: Option<Tensor>,
    grad: Option<Tensor>,
    axes: Vec<usize>,
    input_shape: Vec<usize>,
    shape: Vec<usize>,
}

impl SumKeepDims {
    pub(crate) fn new(parent: &NodeHandle, axes: &[usize]) -> Result<Self, GraphError> {
        let input_shape = parent.value_expected_shape().to_vec();
        if axes.is_empty() {
            return Err(GraphError::InvalidOperation(
                "SumKeepDims节点至少需要1个求和轴".to_string(),
            ));
        }
        for (i, axis) in axes.iter().enumerate() {
            if *axis >= input_shape.len() {
                return Err(GraphError::InvalidOperation(format!(
                    "SumKeepDims节点的求和轴{}超出了输入的维度数{}",
                    axis,
                    input_shape.len()
                )));
            }
            if axes[..i].contains(axis) {
                return Err(GraphError::InvalidOperation(format!(
                    "SumKeepDims节点的求和轴{axis}重复出现"
                )));
            }
        }
        let mut shape = input_shape.clone();
        for axis in axes {
            shape[*axis] = 1;
        }
        Ok(Self {
            id: None,
            name: None,
            value: None,
            grad: None,
            axes: axes.to_vec(),
            input_shape,
            shape,
        })
    }
}

impl TraitNode for SumKeepDims {
    op_node_common_methods!();

    fn type_name(&self) -> &'static str {
        "SumKeepDims"
    }

    fn calc_value_by_parents(&mut self, parents: &[NodeHandle]) -> Result<(), GraphError> {
        let x = parent_value(&self.display_node(), &parents[0])?;
        let summed = x
            .sum_axes_keepdims(&self.axes)
            .map_err(|e| GraphError::ComputationError(format!("{e}")))?;
        self.value = Some(summed);
        Ok(())
    }

    fn calc_grad_to_parent(
        &self,
        _target_parent: &NodeHandle,
        upstream_grad: &Tensor,
        _assistant_parent: Option<&NodeHandle>,
    ) -> Result<Tensor, GraphError> {
        // 保留的1维使上游梯度可直接广播回输入形状
        upstream_grad
            .broadcast_to(&self.input_shape)
            .map_err(|e| GraphError::ComputationError(format!("{e}")))
    }
}

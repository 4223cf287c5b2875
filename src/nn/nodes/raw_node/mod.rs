mod accumulator;
mod gradient;
mod input;
mod ops;
mod parameter;

pub(in crate::nn) use accumulator::Accumulator;
pub(in crate::nn) use gradient::Gradient;
pub(in crate::nn) use input::Input;
pub(in crate::nn) use ops::*;
pub(in crate::nn) use parameter::Parameter;

use enum_dispatch::enum_dispatch;

#[enum_dispatch]
#[derive(Clone)]
pub(in crate::nn) enum NodeType {
    Input(Input),
    Parameter(Parameter),
    Accumulator(Accumulator),
    Gradient(Gradient),
    Add(Add),
    Subtract(Subtract),
    Multiply(Multiply),
    Divide(Divide),
    ScalarMultiply(ScalarMultiply),
    ScalarAdd(ScalarAdd),
    Square(Square),
    Sqrt(Sqrt),
    Clip(Clip),
    Sum(Sum),
    SumKeepDims(SumKeepDims),
}

use super::{NodeHandle, NodeId};
use crate::nn::GraphError;
use crate::tensor::Tensor;

#[enum_dispatch(NodeType)]
pub(in crate::nn) trait TraitNode {
    fn id(&self) -> NodeId;

    fn set_id(&mut self, id: NodeId);

    fn name(&self) -> &str;

    fn set_name(&mut self, name: &str);

    fn type_name(&self) -> &'static str;

    /// 本节点值的预期形状（构造时即可确定，与是否已计算无关）
    fn value_expected_shape(&self) -> &[usize];

    // 根据父节点的值计算本节点的值（注意：由于该接口只在Graph中使用，所以实现时不用关心父节点的值是否已被计算，所有父节点的值可以已预先被计算过了）
    fn calc_value_by_parents(&mut self, parents: &[NodeHandle]) -> Result<(), GraphError>;

    fn value(&self) -> Option<&Tensor>;

    fn set_value(&mut self, _value: Option<&Tensor>) -> Result<(), GraphError> {
        Err(GraphError::InvalidOperation(format!(
            "{}的值由图前向计算得出，不应被手动设置",
            self.display_node()
        )))
    }

    /// 计算“上游梯度经本节点传到`target_parent`”的梯度（VJP）。
    /// 当某算子对一个父节点的梯度依赖另一个父节点的值时，由`assistant_parent`传入。
    fn calc_grad_to_parent(
        &self,
        target_parent: &NodeHandle,
        upstream_grad: &Tensor,
        assistant_parent: Option<&NodeHandle>,
    ) -> Result<Tensor, GraphError>;

    fn grad(&self) -> Option<&Tensor>;

    fn set_grad(&mut self, grad: Option<&Tensor>) -> Result<(), GraphError>;

    fn display_node(&self) -> String {
        format!(
            "节点[id={}, name={}, type={}]",
            self.id().0,
            self.name(),
            self.type_name()
        )
    }
}

// 多数算子节点在取父/自身值时都要做同样的“值必须已存在”检查，统一在此
pub(in crate::nn) fn parent_value<'a>(
    node_display: &str,
    parent: &'a NodeHandle,
) -> Result<&'a Tensor, GraphError> {
    parent.value().ok_or_else(|| {
        GraphError::ComputationError(format!(
            "{node_display}的父节点{parent}没有值。不该触及本错误，否则说明crate代码有问题"
        ))
    })
}

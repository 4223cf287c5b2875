/*
 * @Author       : 老董
 * @Date         : 2026-02-10
 * @Description  : 节点层：NodeId、NodeHandle 与各原始节点（raw node）类型
 */

pub(in crate::nn) mod raw_node;

use std::fmt;

use crate::nn::GraphError;
use crate::tensor::Tensor;

pub(in crate::nn) use raw_node::{NodeType, TraitNode};

/// 节点的全图唯一标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// 节点句柄：原始节点 + 图簿记（前向pass id）
///
/// 图（`GraphInner`）通过本句柄统一访问各类节点。
#[derive(Clone)]
pub(in crate::nn) struct NodeHandle {
    raw_node: NodeType,
    /// 本节点值最后一次参与的前向pass id（0表示从未参与）
    last_forward_pass_id: u64,
}

impl NodeHandle {
    fn new<T: Into<NodeType>>(raw_node: T) -> Self {
        Self {
            raw_node: raw_node.into(),
            last_forward_pass_id: 0,
        }
    }

    // ========== 各类节点的构造 ==========

    pub(in crate::nn) fn new_input(shape: &[usize]) -> Self {
        Self::new(raw_node::Input::new(shape))
    }

    pub(in crate::nn) fn new_parameter(init_value: Tensor) -> Self {
        Self::new(raw_node::Parameter::new(init_value))
    }

    pub(in crate::nn) fn new_accumulator(shape: &[usize]) -> Self {
        Self::new(raw_node::Accumulator::new(shape))
    }

    pub(in crate::nn) fn new_gradient(
        loss: &NodeHandle,
        param: &NodeHandle,
    ) -> Result<Self, GraphError> {
        Ok(Self::new(raw_node::Gradient::new(loss, param)?))
    }

    pub(in crate::nn) fn new_add(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        Ok(Self::new(raw_node::Add::new(parents)?))
    }

    pub(in crate::nn) fn new_subtract(
        minuend: &NodeHandle,
        subtrahend: &NodeHandle,
    ) -> Result<Self, GraphError> {
        Ok(Self::new(raw_node::Subtract::new(minuend, subtrahend)?))
    }

    pub(in crate::nn) fn new_multiply(
        lhs: &NodeHandle,
        rhs: &NodeHandle,
    ) -> Result<Self, GraphError> {
        Ok(Self::new(raw_node::Multiply::new(lhs, rhs)?))
    }

    pub(in crate::nn) fn new_divide(
        numerator: &NodeHandle,
        denominator: &NodeHandle,
    ) -> Result<Self, GraphError> {
        Ok(Self::new(raw_node::Divide::new(numerator, denominator)?))
    }

    pub(in crate::nn) fn new_scalar_multiply(parent: &NodeHandle, factor: f32) -> Self {
        Self::new(raw_node::ScalarMultiply::new(parent, factor))
    }

    pub(in crate::nn) fn new_scalar_add(parent: &NodeHandle, offset: f32) -> Self {
        Self::new(raw_node::ScalarAdd::new(parent, offset))
    }

    pub(in crate::nn) fn new_square(parent: &NodeHandle) -> Self {
        Self::new(raw_node::Square::new(parent))
    }

    pub(in crate::nn) fn new_sqrt(parent: &NodeHandle) -> Self {
        Self::new(raw_node::Sqrt::new(parent))
    }

    pub(in crate::nn) fn new_clip(
        parent: &NodeHandle,
        min: f32,
        max: f32,
    ) -> Result<Self, GraphError> {
        Ok(Self::new(raw_node::Clip::new(parent, min, max)?))
    }

    pub(in crate::nn) fn new_sum(parent: &NodeHandle) -> Self {
        Self::new(raw_node::Sum::new(parent))
    }

    pub(in crate::nn) fn new_sum_keepdims(
        parent: &NodeHandle,
        axes: &[usize],
    ) -> Result<Self, GraphError> {
        Ok(Self::new(raw_node::SumKeepDims::new(parent, axes)?))
    }

    // ========== 通用访问 ==========

    pub(in crate::nn) fn bind_id_and_name(&mut self, id: NodeId, name: &str) {
        self.raw_node.set_id(id);
        self.raw_node.set_name(name);
    }

    pub(in crate::nn) fn id(&self) -> NodeId {
        self.raw_node.id()
    }

    pub(in crate::nn) fn name(&self) -> &str {
        self.raw_node.name()
    }

    pub(in crate::nn) fn type_name(&self) -> &'static str {
        self.raw_node.type_name()
    }

    pub(in crate::nn) const fn node_type(&self) -> &NodeType {
        &self.raw_node
    }

    pub(in crate::nn) fn value(&self) -> Option<&Tensor> {
        self.raw_node.value()
    }

    pub(in crate::nn) fn has_value(&self) -> bool {
        self.raw_node.value().is_some()
    }

    pub(in crate::nn) fn set_value(&mut self, value: Option<&Tensor>) -> Result<(), GraphError> {
        self.raw_node.set_value(value)
    }

    pub(in crate::nn) fn value_expected_shape(&self) -> &[usize] {
        self.raw_node.value_expected_shape()
    }

    pub(in crate::nn) fn grad(&self) -> Option<&Tensor> {
        self.raw_node.grad()
    }

    pub(in crate::nn) fn set_grad(&mut self, grad: Option<&Tensor>) -> Result<(), GraphError> {
        self.raw_node.set_grad(grad)
    }

    pub(in crate::nn) fn clear_grad(&mut self) -> Result<(), GraphError> {
        self.raw_node.set_grad(None)
    }

    pub(in crate::nn) fn calc_value_by_parents(
        &mut self,
        parents: &[NodeHandle],
    ) -> Result<(), GraphError> {
        self.raw_node.calc_value_by_parents(parents)
    }

    pub(in crate::nn) fn calc_grad_to_parent(
        &self,
        target_parent: &NodeHandle,
        upstream_grad: &Tensor,
        assistant_parent: Option<&NodeHandle>,
    ) -> Result<Tensor, GraphError> {
        self.raw_node
            .calc_grad_to_parent(target_parent, upstream_grad, assistant_parent)
    }

    pub(in crate::nn) const fn last_forward_pass_id(&self) -> u64 {
        self.last_forward_pass_id
    }

    pub(in crate::nn) fn set_last_forward_pass_id(&mut self, pass_id: u64) {
        self.last_forward_pass_id = pass_id;
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "节点[id={}, name={}, type={}]",
            self.id().0,
            self.name(),
            self.type_name()
        )
    }
}

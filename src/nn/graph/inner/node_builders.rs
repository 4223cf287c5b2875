/*
 * @Author       : 老董
 * @Date         : 2026-02-10
 * @Description  : GraphInner 节点构建方法（new_*_node）
 */

use super::super::error::GraphError;
use super::GraphInner;
use crate::nn::nodes::NodeHandle;
use crate::nn::var::Init;
use crate::nn::NodeId;

impl GraphInner {
    /// 添加节点到列表
    pub(in crate::nn::graph) fn add_node_to_list(
        &mut self,
        mut node_handle: NodeHandle,
        name: Option<&str>,
        node_type: &str,
        parents: &[NodeId],
    ) -> Result<NodeId, GraphError> {
        let node_id = self.generate_valid_node_id();
        let node_name = self.generate_valid_new_node_name(name.unwrap_or(""), node_type)?;

        for &parent_id in parents {
            self.forward_edges
                .entry(parent_id)
                .or_default()
                .push(node_id);
        }
        self.backward_edges
            .entry(node_id)
            .or_default()
            .extend(parents);

        node_handle.bind_id_and_name(node_id, &node_name);
        self.nodes.insert(node_id, node_handle);
        Ok(node_id)
    }

    /// 创建输入节点
    pub fn new_input_node(
        &mut self,
        shape: &[usize],
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node = NodeHandle::new_input(shape);
        self.add_node_to_list(node, name, "input", &[])
    }

    /// 创建参数节点（初始值由`Init`策略给出，带种子的图得到确定性的初始化）
    pub fn new_parameter_node(
        &mut self,
        shape: &[usize],
        init: &Init,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let init_value = if let Some(rng) = self.rng.as_mut() {
            init.generate_with_rng(shape, rng)
        } else {
            init.generate(shape)
        };
        let node = NodeHandle::new_parameter(init_value);
        self.add_node_to_list(node, name, "parameter", &[])
    }

    /// 创建累积量节点（零初始化，供更新规则存放速度、梯度平方累积等状态）
    pub fn new_accumulator_node(
        &mut self,
        shape: &[usize],
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node = NodeHandle::new_accumulator(shape);
        self.add_node_to_list(node, name, "accumulator", &[])
    }

    /// 创建以给定前缀命名的累积量节点（如 base="w_velocity" 得到"w_velocity_1"）
    pub fn new_accumulator_node_with_base(
        &mut self,
        shape: &[usize],
        base: &str,
    ) -> Result<NodeId, GraphError> {
        let node = NodeHandle::new_accumulator(shape);
        self.add_node_to_list(node, None, base, &[])
    }

    /// 创建梯度节点：表示“loss对param的梯度”这一延迟量
    pub fn new_gradient_node(
        &mut self,
        loss_id: NodeId,
        param_id: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let parents = self.get_nodes(&[loss_id, param_id])?;
        let handle = NodeHandle::new_gradient(parents[0], parents[1])?;
        self.add_node_to_list(handle, name, "gradient", &[loss_id, param_id])
    }

    pub fn new_add_node(
        &mut self,
        parents: &[NodeId],
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let handle = NodeHandle::new_add(&self.get_nodes(parents)?)?;
        self.add_node_to_list(handle, name, "add", parents)
    }

    pub fn new_subtract_node(
        &mut self,
        minuend_id: NodeId,
        subtrahend_id: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let parents = self.get_nodes(&[minuend_id, subtrahend_id])?;
        let handle = NodeHandle::new_subtract(parents[0], parents[1])?;
        self.add_node_to_list(handle, name, "subtract", &[minuend_id, subtrahend_id])
    }

    pub fn new_multiply_node(
        &mut self,
        lhs_id: NodeId,
        rhs_id: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let parents = self.get_nodes(&[lhs_id, rhs_id])?;
        let handle = NodeHandle::new_multiply(parents[0], parents[1])?;
        self.add_node_to_list(handle, name, "multiply", &[lhs_id, rhs_id])
    }

    pub fn new_divide_node(
        &mut self,
        numerator_id: NodeId,
        denominator_id: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let parents = self.get_nodes(&[numerator_id, denominator_id])?;
        let handle = NodeHandle::new_divide(parents[0], parents[1])?;
        self.add_node_to_list(handle, name, "divide", &[numerator_id, denominator_id])
    }

    pub fn new_scalar_multiply_node(
        &mut self,
        parent_id: NodeId,
        factor: f32,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let handle = NodeHandle::new_scalar_multiply(self.get_node(parent_id)?, factor);
        self.add_node_to_list(handle, name, "scalar_multiply", &[parent_id])
    }

    pub fn new_scalar_add_node(
        &mut self,
        parent_id: NodeId,
        offset: f32,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let handle = NodeHandle::new_scalar_add(self.get_node(parent_id)?, offset);
        self.add_node_to_list(handle, name, "scalar_add", &[parent_id])
    }

    pub fn new_square_node(
        &mut self,
        parent_id: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let handle = NodeHandle::new_square(self.get_node(parent_id)?);
        self.add_node_to_list(handle, name, "square", &[parent_id])
    }

    pub fn new_sqrt_node(
        &mut self,
        parent_id: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let handle = NodeHandle::new_sqrt(self.get_node(parent_id)?);
        self.add_node_to_list(handle, name, "sqrt", &[parent_id])
    }

    pub fn new_clip_node(
        &mut self,
        parent_id: NodeId,
        min: f32,
        max: f32,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let handle = NodeHandle::new_clip(self.get_node(parent_id)?, min, max)?;
        self.add_node_to_list(handle, name, "clip", &[parent_id])
    }

    pub fn new_sum_node(
        &mut self,
        parent_id: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let handle = NodeHandle::new_sum(self.get_node(parent_id)?);
        self.add_node_to_list(handle, name, "sum", &[parent_id])
    }

    pub fn new_sum_keepdims_node(
        &mut self,
        parent_id: NodeId,
        axes: &[usize],
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let handle = NodeHandle::new_sum_keepdims(self.get_node(parent_id)?, axes)?;
        self.add_node_to_list(handle, name, "sum_keepdims", &[parent_id])
    }
}

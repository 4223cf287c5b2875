/*
 * @Author       : 老董
 * @Date         : 2026-02-10
 * @Description  : GraphInner 核心操作 + 前向传播
 */

use super::super::error::GraphError;
use super::GraphInner;
use crate::nn::nodes::{NodeHandle, NodeType};
use crate::nn::NodeId;
use crate::tensor::Tensor;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;

impl GraphInner {
    // ========== 创建 ==========

    pub fn new() -> Self {
        Self::with_name("default_graph")
    }

    /// 创建一个带固定种子的计算图（确保可重复性）
    pub fn new_with_seed(seed: u64) -> Self {
        let mut graph = Self::with_name("default_graph");
        graph.rng = Some(StdRng::seed_from_u64(seed));
        graph
    }

    pub fn with_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            nodes: HashMap::new(),
            forward_edges: HashMap::new(),
            backward_edges: HashMap::new(),
            last_forward_pass_id: 0,
            next_id: 0,
            rng: None,
            vjp_done: HashMap::new(),
        }
    }

    /// 创建一个带名称和固定种子的计算图
    pub fn with_name_and_seed(name: &str, seed: u64) -> Self {
        let mut graph = Self::with_name(name);
        graph.rng = Some(StdRng::seed_from_u64(seed));
        graph
    }

    // ========== 基础访问器 ==========

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nodes(&self) -> Vec<NodeId> {
        self.nodes.keys().copied().collect()
    }

    pub fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    /// 设置/重置图的随机种子
    pub fn set_seed(&mut self, seed: u64) {
        self.rng = Some(StdRng::seed_from_u64(seed));
    }

    /// 检查图是否有固定种子
    pub const fn has_seed(&self) -> bool {
        self.rng.is_some()
    }

    #[cfg(test)]
    pub(in crate::nn) const fn last_forward_pass_id(&self) -> u64 {
        self.last_forward_pass_id
    }

    pub(in crate::nn) fn get_node(&self, id: NodeId) -> Result<&NodeHandle, GraphError> {
        self.nodes.get(&id).ok_or(GraphError::NodeNotFound(id))
    }

    pub(in crate::nn) fn get_node_mut(&mut self, id: NodeId) -> Result<&mut NodeHandle, GraphError> {
        self.nodes.get_mut(&id).ok_or(GraphError::NodeNotFound(id))
    }

    pub(in crate::nn) fn get_nodes(&self, ids: &[NodeId]) -> Result<Vec<&NodeHandle>, GraphError> {
        ids.iter().map(|&id| self.get_node(id)).collect()
    }

    pub fn get_node_parents(&self, id: NodeId) -> Result<Vec<NodeId>, GraphError> {
        // 先检查节点是否存在
        let _ = self.get_node(id)?;
        Ok(self.backward_edges.get(&id).cloned().unwrap_or_default())
    }

    pub fn get_node_children(&self, id: NodeId) -> Result<Vec<NodeId>, GraphError> {
        // 先检查节点是否存在
        let _ = self.get_node(id)?;
        Ok(self.forward_edges.get(&id).cloned().unwrap_or_default())
    }

    pub fn get_node_name(&self, id: NodeId) -> Result<&str, GraphError> {
        Ok(self.get_node(id)?.name())
    }

    pub fn get_node_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, node)| node.name() == name)
            .map(|(&id, _)| id)
    }

    pub fn has_node_value(&self, node_id: NodeId) -> Result<bool, GraphError> {
        self.nodes
            .get(&node_id)
            .map(NodeHandle::has_value)
            .ok_or(GraphError::NodeNotFound(node_id))
    }

    pub fn get_node_value(&self, id: NodeId) -> Result<Option<&Tensor>, GraphError> {
        Ok(self.get_node(id)?.value())
    }

    /// 获取节点值的预期形状（创建时即确定，与是否已计算无关）
    pub fn get_node_value_expected_shape(&self, id: NodeId) -> Result<&[usize], GraphError> {
        Ok(self.get_node(id)?.value_expected_shape())
    }

    /// 为节点赋值。只有Input/Parameter/Accumulator这类叶子节点允许被外部赋值
    pub fn set_node_value(&mut self, id: NodeId, value: Option<&Tensor>) -> Result<(), GraphError> {
        let node = self.get_node_mut(id)?;
        match node.node_type() {
            NodeType::Input(_) | NodeType::Parameter(_) | NodeType::Accumulator(_) => {
                node.set_value(value)
            }
            _ => Err(GraphError::InvalidOperation(format!(
                "{node}的值由图计算得出，不能手动设置"
            ))),
        }
    }

    pub fn get_node_grad(&self, id: NodeId) -> Result<Option<Tensor>, GraphError> {
        let node = self.get_node(id)?;
        // 输入节点不参与求导
        if let NodeType::Input(_) = node.node_type() {
            return Err(GraphError::InvalidOperation(format!(
                "输入{node}不应该有梯度"
            )));
        }
        Ok(node.grad().cloned())
    }

    /// 获取所有参数节点
    pub fn get_parameter_nodes(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter_map(|(&id, node)| {
                if let NodeType::Parameter(_) = node.node_type() {
                    Some(id)
                } else {
                    None
                }
            })
            .collect()
    }

    /// 获取所有携带训练状态的节点（参数与累积量）
    pub fn get_stateful_nodes(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter_map(|(&id, node)| match node.node_type() {
                NodeType::Parameter(_) | NodeType::Accumulator(_) => Some(id),
                _ => None,
            })
            .collect()
    }

    // ========== ID/名称生成 ==========

    pub(in crate::nn::graph) fn generate_valid_node_id(&mut self) -> NodeId {
        // 生成唯一的节点ID（先递增再返回，所以第一个节点 ID 是 1）
        self.next_id += 1;
        NodeId(self.next_id)
    }

    pub(in crate::nn::graph) fn check_duplicate_node_name(&self, name: &str) -> Result<(), GraphError> {
        if self.nodes.values().any(|node| node.name() == name) {
            return Err(GraphError::DuplicateNodeName(format!(
                "节点{}在图{}中重复",
                name,
                self.name()
            )));
        }
        Ok(())
    }

    pub(in crate::nn::graph) fn generate_valid_new_node_name(
        &self,
        base_name: &str,
        node_type: &str,
    ) -> Result<String, GraphError> {
        if !base_name.is_empty() {
            self.check_duplicate_node_name(base_name)?;
            return Ok(base_name.to_string());
        }

        let mut counter = 1;
        loop {
            let name = format!("{node_type}_{counter}");
            if self.check_duplicate_node_name(&name).is_ok() {
                return Ok(name);
            }
            counter += 1;
        }
    }

    // ========== 前向传播 ==========

    pub fn forward(&mut self, node_id: NodeId) -> Result<(), GraphError> {
        self.forward_nodes(&[node_id])
    }

    /// 在同一个前向pass中求值多个节点。
    /// 更新计划会用它一次性求出所有新值表达式，使共享的子表达式
    /// （尤其是Gradient节点背后的反向传播）只计算一次。
    pub fn forward_nodes(&mut self, node_ids: &[NodeId]) -> Result<(), GraphError> {
        for &node_id in node_ids {
            let node = self.get_node(node_id)?;
            if let NodeType::Input(_) | NodeType::Parameter(_) | NodeType::Accumulator(_) =
                node.node_type()
            {
                if !node.has_value() {
                    return Err(GraphError::InvalidOperation(format!(
                        "{node}是叶子节点，其值应通过 set_value 设置，而非通过前向传播计算"
                    )));
                }
            }
        }

        let new_graph_forward_pass_id = self.last_forward_pass_id + 1;
        self.last_forward_pass_id = new_graph_forward_pass_id;
        for &node_id in node_ids {
            self.forward_node_internal(node_id, new_graph_forward_pass_id)?;
        }
        Ok(())
    }

    fn forward_node_internal(
        &mut self,
        node_id: NodeId,
        new_graph_forward_pass_id: u64,
    ) -> Result<(), GraphError> {
        let node = self.get_node_mut(node_id)?;

        match node.node_type() {
            NodeType::Input(_) | NodeType::Parameter(_) | NodeType::Accumulator(_) => {
                if node.has_value() {
                    node.set_last_forward_pass_id(new_graph_forward_pass_id);
                    return Ok(());
                }
                return Err(GraphError::InvalidOperation(format!(
                    "{node}没有值，不能参与前向传播"
                )));
            }
            NodeType::Gradient(_) => {
                if node.last_forward_pass_id() == new_graph_forward_pass_id {
                    return Ok(());
                }
                return self.forward_gradient_node(node_id, new_graph_forward_pass_id);
            }
            _ => {
                if node.last_forward_pass_id() == new_graph_forward_pass_id {
                    return Ok(());
                }
            }
        }

        let parents_ids = self.get_node_parents(node_id)?;
        for parent_id in &parents_ids {
            self.forward_node_internal(*parent_id, new_graph_forward_pass_id)?;
        }

        let parent_nodes = parents_ids
            .iter()
            .map(|id| self.get_node(*id).unwrap().clone())
            .collect::<Vec<NodeHandle>>();

        let node = self.get_node_mut(node_id)?;
        node.calc_value_by_parents(&parent_nodes)?;
        node.set_last_forward_pass_id(new_graph_forward_pass_id);

        Ok(())
    }

    /// Gradient节点的按需求值：先算出loss，再做一次VJP反向传播，
    /// 最后把param上累积的梯度作为本节点的值。
    /// 同一前向pass内以同一loss为源的多个Gradient节点共享一次反向传播。
    fn forward_gradient_node(
        &mut self,
        node_id: NodeId,
        new_graph_forward_pass_id: u64,
    ) -> Result<(), GraphError> {
        let (loss_id, param_id) = match self.get_node(node_id)?.node_type() {
            NodeType::Gradient(gradient) => (gradient.loss_id(), gradient.param_id()),
            _ => unreachable!(),
        };

        self.forward_node_internal(loss_id, new_graph_forward_pass_id)?;

        if self.vjp_done.get(&loss_id) != Some(&new_graph_forward_pass_id) {
            self.backward_vjp_core(loss_id)?;
            self.vjp_done.insert(loss_id, new_graph_forward_pass_id);
        }

        let param_grad = self
            .get_node(param_id)?
            .grad()
            .cloned()
            .ok_or_else(|| {
                GraphError::InvalidOperation(format!(
                    "loss（id={}）与{}之间没有可导路径，无法求梯度",
                    loss_id.0,
                    self.nodes[&param_id]
                ))
            })?;

        let node = self.get_node_mut(node_id)?;
        node.set_value(Some(&param_grad))?;
        node.set_last_forward_pass_id(new_graph_forward_pass_id);
        Ok(())
    }
}

/*
 * @Author       : 老董
 * @Date         : 2026-02-10
 * @Description  : GraphInner VJP 反向传播
 */

use super::super::error::GraphError;
use super::GraphInner;
use crate::nn::nodes::NodeType;
use crate::nn::NodeId;
use crate::tensor::Tensor;
use std::collections::{HashMap, HashSet, VecDeque};

impl GraphInner {
    // ========== VJP 反向传播核心 ==========

    /// 反向传播，返回损失的标量值
    pub fn backward(&mut self, loss: NodeId) -> Result<f32, GraphError> {
        let loss_node = self.get_node(loss)?;
        let loss_value = loss_node.value().ok_or_else(|| {
            GraphError::ComputationError(format!("损失{loss_node}没有值，请先执行 forward"))
        })?;
        let loss_scalar = loss_value.number().ok_or_else(|| {
            GraphError::ComputationError(format!(
                "无法从损失节点获取标量值，形状: {:?}",
                loss_value.shape()
            ))
        })?;

        self.backward_vjp_core(loss)?;
        Ok(loss_scalar)
    }

    /// VJP 反向传播核心实现
    ///
    /// 上游梯度按“子节点先于父节点”的拓扑序逐层下推；一个节点只有在
    /// 收齐它所有（可达的）子节点的梯度贡献之后才向父节点传播。
    pub(in crate::nn::graph) fn backward_vjp_core(&mut self, loss_id: NodeId) -> Result<(), GraphError> {
        for node in self.nodes.values_mut() {
            let _ = node.clear_grad();
        }

        let loss_node = self.get_node(loss_id)?;
        let loss_value = loss_node.value().ok_or_else(|| {
            GraphError::ComputationError(format!("损失{loss_node}没有值，请先执行 forward"))
        })?;

        if loss_value.size() != 1 {
            return Err(GraphError::InvalidOperation(format!(
                "反向传播要求损失为标量（元素数为1），但得到形状{:?}",
                loss_value.shape()
            )));
        }

        let loss_grad = Tensor::ones(loss_value.shape());
        self.get_node_mut(loss_id)?.set_grad(Some(&loss_grad))?;

        // 1. 收集loss的祖先集合（含loss自身）
        let mut reachable = HashSet::new();
        let mut stack = vec![loss_id];
        while let Some(node_id) = stack.pop() {
            if !reachable.insert(node_id) {
                continue;
            }
            stack.extend(self.get_node_parents(node_id)?);
        }

        // 2. 统计每个祖先在该集合内的子节点数（按去重后的父子关系计）
        let mut pending_children: HashMap<NodeId, usize> = HashMap::new();
        for &node_id in &reachable {
            for parent_id in self.unique_parents(node_id)? {
                *pending_children.entry(parent_id).or_insert(0) += 1;
            }
        }

        // 3. Kahn拓扑序下推梯度
        let mut queue = VecDeque::from([loss_id]);
        while let Some(node_id) = queue.pop_front() {
            self.propagate_grad_to_parents(node_id)?;
            for parent_id in self.unique_parents(node_id)? {
                let pending = pending_children.get_mut(&parent_id).ok_or_else(|| {
                    GraphError::ComputationError(
                        "反向传播的拓扑计数缺失。不该触及本错误，否则说明crate代码有问题"
                            .to_string(),
                    )
                })?;
                *pending -= 1;
                if *pending == 0 {
                    queue.push_back(parent_id);
                }
            }
        }

        Ok(())
    }

    /// 节点的去重父节点列表（x*x这类重复父节点只出现一次，
    /// 其梯度由算子内部按出现次数合并）
    fn unique_parents(&self, node_id: NodeId) -> Result<Vec<NodeId>, GraphError> {
        let mut parents = self.get_node_parents(node_id)?;
        let mut seen = HashSet::new();
        parents.retain(|id| seen.insert(*id));
        Ok(parents)
    }

    /// 将梯度从当前节点传播到其父节点
    fn propagate_grad_to_parents(&mut self, node_id: NodeId) -> Result<(), GraphError> {
        let parent_ids = self.unique_parents(node_id)?;
        if parent_ids.is_empty() {
            return Ok(());
        }

        let parent_grads: Vec<(NodeId, Tensor)> = {
            let node = self.get_node(node_id)?;
            let upstream_grad = match node.grad() {
                Some(g) => g,
                None => return Ok(()),
            };

            let mut grads = Vec::with_capacity(parent_ids.len());
            for parent_id in &parent_ids {
                let parent = self.get_node(*parent_id)?;

                // 反向传播在输入节点处截断
                if let NodeType::Input(_) = parent.node_type() {
                    continue;
                }

                let assistant_parent_id = parent_ids.iter().find(|&&id| id != *parent_id).copied();
                let assistant = assistant_parent_id
                    .map(|id| self.get_node(id))
                    .transpose()?;

                let parent_grad = node.calc_grad_to_parent(parent, upstream_grad, assistant)?;
                grads.push((*parent_id, parent_grad));
            }
            grads
        };

        for (parent_id, parent_grad) in parent_grads {
            let parent_node = self.get_node_mut(parent_id)?;
            if let Some(existing_grad) = parent_node.grad() {
                let new_grad = existing_grad + &parent_grad;
                parent_node.set_grad(Some(&new_grad))?;
            } else {
                parent_node.set_grad(Some(&parent_grad))?;
            }
        }

        Ok(())
    }

    /// 清除所有节点的梯度
    pub fn clear_grad(&mut self) -> Result<(), GraphError> {
        for node in self.nodes.values_mut() {
            let _ = node.clear_grad();
        }
        Ok(())
    }

    /// 清零梯度（PyTorch 风格的别名）
    pub fn zero_grad(&mut self) -> Result<(), GraphError> {
        self.clear_grad()
    }
}

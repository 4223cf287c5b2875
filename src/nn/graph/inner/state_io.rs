/*
 * @Author       : 老董
 * @Date         : 2026-02-10
 * @Description  : GraphInner 训练状态 I/O（save_state/load_state）
 *
 * 职责：把参数节点与累积量节点的当前值按节点名序列化成 JSON。
 * 加载时按名称匹配：文件里多出的条目报错，图里多出的节点保持原值。
 */

use super::super::error::GraphError;
use super::GraphInner;
use crate::nn::nodes::NodeType;
use crate::tensor::Tensor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// 状态文件版本
const STATE_VERSION: u32 = 1;

/// 训练状态字典：节点名 -> 张量值
///
/// BTreeMap保证序列化输出的条目顺序稳定，便于做文本diff。
#[derive(Serialize, Deserialize)]
struct StateDict {
    version: u32,
    entries: BTreeMap<String, Tensor>,
}

impl GraphInner {
    /// 把所有参数与累积量的当前值导出为 JSON 字符串
    pub fn state_to_json(&self) -> Result<String, GraphError> {
        let mut entries = BTreeMap::new();
        for node_id in self.get_stateful_nodes() {
            let node = self.get_node(node_id)?;
            let value = node.value().ok_or_else(|| {
                GraphError::ComputationError(format!("{node}没有值，无法保存状态"))
            })?;
            entries.insert(node.name().to_string(), value.clone());
        }

        let state = StateDict {
            version: STATE_VERSION,
            entries,
        };
        serde_json::to_string_pretty(&state)
            .map_err(|e| GraphError::ComputationError(format!("序列化训练状态失败: {e}")))
    }

    /// 从 JSON 字符串恢复参数与累积量的值，按节点名匹配
    pub fn state_from_json(&mut self, json: &str) -> Result<(), GraphError> {
        let state: StateDict = serde_json::from_str(json)
            .map_err(|e| GraphError::ComputationError(format!("解析训练状态失败: {e}")))?;

        if state.version != STATE_VERSION {
            return Err(GraphError::ComputationError(format!(
                "不支持的训练状态版本: {}",
                state.version
            )));
        }

        let name_to_id: BTreeMap<String, crate::nn::NodeId> = self
            .nodes
            .iter()
            .filter_map(|(&id, node)| match node.node_type() {
                NodeType::Parameter(_) | NodeType::Accumulator(_) => {
                    Some((node.name().to_string(), id))
                }
                _ => None,
            })
            .collect();

        for (name, tensor) in &state.entries {
            let node_id = *name_to_id.get(name).ok_or_else(|| {
                GraphError::InvalidOperation(format!(
                    "训练状态中的条目{}在图{}中没有对应的参数或累积量节点",
                    name,
                    self.name()
                ))
            })?;
            self.set_node_value(node_id, Some(tensor))?;
        }

        Ok(())
    }

    /// 保存训练状态到文件
    pub fn save_state<P: AsRef<Path>>(&self, path: P) -> Result<(), GraphError> {
        let json = self.state_to_json()?;
        std::fs::write(path.as_ref(), json)
            .map_err(|e| GraphError::ComputationError(format!("写入状态文件失败: {e}")))
    }

    /// 从文件加载训练状态
    pub fn load_state<P: AsRef<Path>>(&mut self, path: P) -> Result<(), GraphError> {
        let json = std::fs::read_to_string(path.as_ref())
            .map_err(|e| GraphError::ComputationError(format!("读取状态文件失败: {e}")))?;
        self.state_from_json(&json)
    }
}

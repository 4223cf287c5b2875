/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : UpdatePlan - 目标节点到新值表达式的有序绑定
 */

use crate::nn::{GraphError, Var};
use crate::tensor::Tensor;

/// 一条更新绑定：`target`在应用时被写成`expr`的值
#[derive(Clone)]
pub struct UpdateEntry {
    pub target: Var,
    pub expr: Var,
}

/// 更新计划：有序的（目标，新值表达式）对。
///
/// 应用时是同时代换：所有表达式先用更新前的状态求值，
/// 然后所有目标一起被写入，条目间互不可见彼此的新值。
#[derive(Clone, Default)]
pub struct UpdatePlan {
    entries: Vec<UpdateEntry>,
}

impl UpdatePlan {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// 追加一条绑定。同一目标出现两次、目标与表达式形状不符、
    /// 或者跨图混用都会被拒绝。
    pub fn push(&mut self, target: Var, expr: Var) -> Result<(), GraphError> {
        if !target.same_graph(&expr) {
            return Err(GraphError::InvalidOperation(
                "更新计划的目标与表达式必须来自同一个 Graph".to_string(),
            ));
        }
        if let Some(first) = self.entries.first() {
            if !first.target.same_graph(&target) {
                return Err(GraphError::InvalidOperation(
                    "一份更新计划内的所有条目必须来自同一个 Graph".to_string(),
                ));
            }
        }
        if self
            .entries
            .iter()
            .any(|entry| entry.target.node_id() == target.node_id())
        {
            return Err(GraphError::InvalidOperation(format!(
                "目标{}在更新计划中重复出现",
                target.name()?
            )));
        }

        let target_shape = target.value_expected_shape()?;
        let expr_shape = expr.value_expected_shape()?;
        if target_shape != expr_shape {
            return Err(GraphError::ShapeMismatch {
                expected: target_shape,
                got: expr_shape,
                message: format!("目标{}与其新值表达式的形状不一致", target.name()?),
            });
        }

        self.entries.push(UpdateEntry { target, expr });
        Ok(())
    }

    /// 合并另一份计划的所有条目（如参数更新计划 + 额外的约束计划）
    pub fn extend(&mut self, other: Self) -> Result<(), GraphError> {
        for entry in other.entries {
            self.push(entry.target, entry.expr)?;
        }
        Ok(())
    }

    pub fn entries(&self) -> &[UpdateEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 所有目标节点（按加入顺序）
    pub fn targets(&self) -> Vec<Var> {
        self.entries
            .iter()
            .map(|entry| entry.target.clone())
            .collect()
    }

    /// 应用计划：同时代换。
    ///
    /// 1. 在同一个前向pass里求出所有新值表达式（共享的子表达式
    ///    以及Gradient节点背后的反向传播只算一次）；
    /// 2. 收集所有结果张量；
    /// 3. 把它们一起写回目标节点。
    ///
    /// 第3步开始前不碰任何目标，所以每个表达式都只看到更新前的状态。
    pub fn apply(&self) -> Result<(), GraphError> {
        let Some(first) = self.entries.first() else {
            return Ok(());
        };

        let mut g = first.target.graph().borrow_mut();

        let expr_ids: Vec<_> = self.entries.iter().map(|entry| entry.expr.node_id()).collect();
        g.forward_nodes(&expr_ids)?;

        let mut new_values: Vec<Tensor> = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let value = g.get_node_value(entry.expr.node_id())?.ok_or_else(|| {
                GraphError::ComputationError(
                    "更新表达式前向传播后没有值。不该触及本错误，否则说明crate代码有问题"
                        .to_string(),
                )
            })?;
            new_values.push(value.clone());
        }

        for (entry, new_value) in self.entries.iter().zip(&new_values) {
            g.set_node_value(entry.target.node_id(), Some(new_value))?;
        }

        Ok(())
    }
}

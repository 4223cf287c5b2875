/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : 更新规则模块：以符号表达式描述“参数/累积量的下一步取值”
 *
 * 每个规则都是纯图构建器：不触碰任何数值，只返回一份`UpdatePlan`
 * （目标节点 -> 新值表达式的有序列表）。真正的数值变化发生在
 * `UpdatePlan::apply()`：先用更新前的状态算出所有新值，再一次性写回，
 * 即同时代换（simultaneous substitution）语义。
 *
 * 提供的规则（均为`<rule>`/`<rule>_with_config`成对出现）：
 * - `sgd`: 朴素梯度下降
 * - `momentum` / `nesterov_momentum`: 动量法及其免前瞻（lookahead-free）变体
 * - `adagrad`: 梯度平方累积自适应步长
 * - `rmsprop`: 梯度平方的指数滑动平均
 * - `adadelta`: 无需学习率的自适应方法
 *
 * 另有`norm_constraint`：对更新后的张量表达式施加最大范数约束。
 */

mod adadelta;
mod adagrad;
mod momentum;
mod norm;
mod plan;
mod rmsprop;
mod sgd;

pub use adadelta::{adadelta, adadelta_with_config};
pub use adagrad::{adagrad, adagrad_with_config};
pub use momentum::{
    momentum, momentum_with_config, nesterov_momentum, nesterov_momentum_with_config,
};
pub use norm::{norm_constraint, norm_constraint_with_config};
pub use plan::{UpdateEntry, UpdatePlan};
pub use rmsprop::{rmsprop, rmsprop_with_config};
pub use sgd::sgd;

use super::{GraphError, Var};
use std::rc::Rc;

/// 校验参数与梯度的对齐：数量一致、逐个形状一致。
/// 规则在构建计划前先做这个检查，问题越早暴露越好。
pub(in crate::nn::updates) fn check_alignment(
    params: &[Var],
    grads: &[Var],
) -> Result<(), GraphError> {
    if params.len() != grads.len() {
        return Err(GraphError::InvalidOperation(format!(
            "参数数量({})与梯度数量({})不一致",
            params.len(),
            grads.len()
        )));
    }
    for (param, grad) in params.iter().zip(grads) {
        let param_shape = param.value_expected_shape()?;
        let grad_shape = grad.value_expected_shape()?;
        if param_shape != grad_shape {
            return Err(GraphError::ShapeMismatch {
                expected: param_shape,
                got: grad_shape,
                message: format!("参数{}与其梯度的形状不一致", param.name()?),
            });
        }
    }
    Ok(())
}

/// 为参数创建一个同形状、零初始化的累积量节点，
/// 名称带参数名前缀（如参数"w"的速度累积量叫"w_velocity_1"）。
pub(in crate::nn::updates) fn new_accumulator_for(
    param: &Var,
    kind: &str,
) -> Result<Var, GraphError> {
    let shape = param.value_expected_shape()?;
    let base = format!("{}_{}", param.name()?, kind);
    let id = param
        .graph()
        .borrow_mut()
        .new_accumulator_node_with_base(&shape, &base)?;
    Ok(Var::new(id, Rc::clone(param.graph())))
}

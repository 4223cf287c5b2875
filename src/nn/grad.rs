/*
 * @Author       : 老董
 * @Date         : 2026-02-10
 * @Description  : gradients() - 符号梯度入口
 */

use super::nodes::NodeType;
use super::{GraphError, Var};
use std::rc::Rc;

/// 对每个参数构造一个延迟求值的梯度表达式：`loss`对`params[i]`的梯度。
///
/// 返回的 Var 和其它表达式一样可以继续参与运算（更新规则正是这么用的），
/// 真正的数值要等前向传播触及它时才会通过一次反向传播算出来。
///
/// # 约束
/// - `loss`必须是标量表达式（元素数为1）
/// - 所有`params`与`loss`必须来自同一个 Graph
/// - `params`必须是参数节点
pub fn gradients(loss: &Var, params: &[Var]) -> Result<Vec<Var>, GraphError> {
    let mut grads = Vec::with_capacity(params.len());
    for param in params {
        if !loss.same_graph(param) {
            return Err(GraphError::InvalidOperation(
                "不能对来自不同 Graph 的 loss 和参数求梯度".to_string(),
            ));
        }

        let mut g = loss.graph().borrow_mut();
        if !matches!(
            g.get_node(param.node_id())?.node_type(),
            NodeType::Parameter(_)
        ) {
            let node = g.get_node(param.node_id())?;
            return Err(GraphError::InvalidOperation(format!(
                "只能对参数节点求梯度，但{node}不是参数节点"
            )));
        }

        let id = g.new_gradient_node(loss.node_id(), param.node_id(), None)?;
        drop(g);
        grads.push(Var::new(id, Rc::clone(loss.graph())));
    }
    Ok(grads)
}

/*
 * @Author       : 老董
 * @Date         : 2026-02-10
 * @Description  : 负责符号计算图与更新规则（update rules）的构建
 */

mod grad;
mod graph;
mod nodes;
pub mod updates;
mod var;
mod var_ops;

pub use grad::gradients;
pub use graph::{Graph, GraphError, GraphInner};
pub use nodes::NodeId;
pub use var::{Init, Var};
pub use var_ops::VarMathOps;

#[cfg(test)]
mod tests;

/*
 * @Author       : 老董
 * @Date         : 2026-02-10
 * @Description  : Graph 模块的错误类型
 */

use crate::nn::NodeId;

/// Graph 操作错误类型
#[derive(Debug, PartialEq, Eq)]
pub enum GraphError {
    NodeNotFound(NodeId),
    InvalidOperation(String),
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
        message: String,
    },
    /// `norm_constraint`在未指定`norm_axes`时只支持2~5阶张量
    UnsupportedRank {
        rank: usize,
        message: String,
    },
    ComputationError(String),
    DuplicateNodeName(String),
}

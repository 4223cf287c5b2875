/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : norm_constraint - 最大范数约束
 */

use crate::nn::{GraphError, Var, VarMathOps};

const DEFAULT_EPSILON: f32 = 1e-7;

/// 最大范数约束，范数轴按张量维度数自动推断、epsilon默认1e-7
pub fn norm_constraint(tensor: &Var, max_norm: f32) -> Result<Var, GraphError> {
    norm_constraint_with_config(tensor, max_norm, None, DEFAULT_EPSILON)
}

/// 对张量表达式施加最大范数约束，返回新的表达式（不改动输入）。
///
/// 沿`norm_axes`计算L2范数；超过`max_norm`的切片被等比例缩小到
/// 正好`max_norm`，未超过的保持不变（至多差一个epsilon项）。
/// 典型用法是套在更新规则给出的新参数表达式外面。
///
/// `norm_axes`为None时按维度数推断：
/// - 2维 → 轴(0,)，每个输出单元一个范数（全连接权重）；
/// - 3/4/5维 → 除轴0外的所有轴，每个输出通道一个范数（卷积核）；
/// - 其它维度数 → `GraphError::UnsupportedRank`，需显式给出`norm_axes`。
///
/// 算法：
/// `norms = sqrt(sum(tensor^2, axes, keepdims))`；
/// `target = clip(norms, 0, max_norm)`；
/// `output = tensor * (target / (epsilon + norms))`。
pub fn norm_constraint_with_config(
    tensor: &Var,
    max_norm: f32,
    norm_axes: Option<&[usize]>,
    epsilon: f32,
) -> Result<Var, GraphError> {
    let ndim = tensor.value_expected_shape()?.len();
    let axes: Vec<usize> = match norm_axes {
        Some(axes) => axes.to_vec(),
        None => match ndim {
            2 => vec![0],
            3..=5 => (1..ndim).collect(),
            rank => {
                return Err(GraphError::UnsupportedRank {
                    rank,
                    message: format!(
                        "norm_constraint不知道{rank}维张量该沿哪些轴计算范数，请显式指定norm_axes"
                    ),
                })
            }
        },
    };

    let norms = tensor.square()?.sum_keepdims(&axes)?.sqrt()?;
    let target = norms.clip(0.0, max_norm)?;
    let ratio = target.try_div(&norms.add_scalar(epsilon)?)?;
    tensor.try_mul(&ratio)
}

/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : Adagrad - 梯度平方累积的自适应步长
 */

use super::{check_alignment, new_accumulator_for, UpdatePlan};
use crate::nn::{gradients, GraphError, Var, VarMathOps};

const DEFAULT_LEARNING_RATE: f32 = 1.0;
const DEFAULT_EPSILON: f32 = 1e-6;

/// Adagrad，学习率默认1.0、epsilon默认1e-6
pub fn adagrad(loss: &Var, params: &[Var]) -> Result<UpdatePlan, GraphError> {
    adagrad_with_config(loss, params, DEFAULT_LEARNING_RATE, DEFAULT_EPSILON)
}

/// Adagrad：每个参数带一个零初始化的梯度平方累积量`acc`。
/// 每步：`acc_new = acc + grad^2`；
/// `new_param = param - lr * grad / sqrt(acc_new + eps)`。
///
/// epsilon是教科书公式里没有的稳定项，保证第一步不会除零。
pub fn adagrad_with_config(
    loss: &Var,
    params: &[Var],
    learning_rate: f32,
    epsilon: f32,
) -> Result<UpdatePlan, GraphError> {
    let grads = gradients(loss, params)?;
    check_alignment(params, &grads)?;

    let mut plan = UpdatePlan::new();
    for (param, grad) in params.iter().zip(&grads) {
        let acc = new_accumulator_for(param, "grad_sq_acc")?;
        let new_acc = acc.try_add(&grad.square()?)?;
        let denom = new_acc.add_scalar(epsilon)?.sqrt()?;
        let step = grad.mul_scalar(learning_rate)?.try_div(&denom)?;
        let new_param = param.try_sub(&step)?;
        plan.push(acc, new_acc)?;
        plan.push(param.clone(), new_param)?;
    }
    Ok(plan)
}

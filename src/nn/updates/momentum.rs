/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : 动量法与Nesterov动量（免前瞻形式）
 */

use super::{check_alignment, new_accumulator_for, UpdatePlan};
use crate::nn::{gradients, GraphError, Var, VarMathOps};

/// 动量系数的默认值
const DEFAULT_MOMENTUM: f32 = 0.9;

/// 动量法，动量系数取默认值0.9
pub fn momentum(loss: &Var, params: &[Var], learning_rate: f32) -> Result<UpdatePlan, GraphError> {
    momentum_with_config(loss, params, learning_rate, DEFAULT_MOMENTUM)
}

/// 动量法：每个参数带一个零初始化的速度累积量`v`。
/// 每步：`v_new = coef*v - lr*grad`；`new_param = param + v_new`。
pub fn momentum_with_config(
    loss: &Var,
    params: &[Var],
    learning_rate: f32,
    coef: f32,
) -> Result<UpdatePlan, GraphError> {
    let grads = gradients(loss, params)?;
    check_alignment(params, &grads)?;

    let mut plan = UpdatePlan::new();
    for (param, grad) in params.iter().zip(&grads) {
        let velocity = new_accumulator_for(param, "velocity")?;
        let new_velocity = velocity
            .mul_scalar(coef)?
            .try_sub(&grad.mul_scalar(learning_rate)?)?;
        let new_param = param.try_add(&new_velocity)?;
        plan.push(velocity, new_velocity)?;
        plan.push(param.clone(), new_param)?;
    }
    Ok(plan)
}

/// Nesterov动量，动量系数取默认值0.9
pub fn nesterov_momentum(
    loss: &Var,
    params: &[Var],
    learning_rate: f32,
) -> Result<UpdatePlan, GraphError> {
    nesterov_momentum_with_config(loss, params, learning_rate, DEFAULT_MOMENTUM)
}

/// Nesterov动量的免前瞻（lookahead-free）形式：
/// `v_new = coef*v - lr*grad`；`new_param = param + coef*v_new - lr*grad`。
///
/// 这样梯度在当前参数处求值，无需在“前瞻位置”做第二次求值，
/// 与经典Nesterov动量在变量代换意义下等价。
pub fn nesterov_momentum_with_config(
    loss: &Var,
    params: &[Var],
    learning_rate: f32,
    coef: f32,
) -> Result<UpdatePlan, GraphError> {
    let grads = gradients(loss, params)?;
    check_alignment(params, &grads)?;

    let mut plan = UpdatePlan::new();
    for (param, grad) in params.iter().zip(&grads) {
        let velocity = new_accumulator_for(param, "velocity")?;
        let scaled_grad = grad.mul_scalar(learning_rate)?;
        let new_velocity = velocity.mul_scalar(coef)?.try_sub(&scaled_grad)?;
        let new_param = param
            .try_add(&new_velocity.mul_scalar(coef)?)?
            .try_sub(&scaled_grad)?;
        plan.push(velocity, new_velocity)?;
        plan.push(param.clone(), new_param)?;
    }
    Ok(plan)
}

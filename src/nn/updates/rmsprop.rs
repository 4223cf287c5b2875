/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : RMSProp - 梯度平方的指数滑动平均
 */

use super::{check_alignment, new_accumulator_for, UpdatePlan};
use crate::nn::{gradients, GraphError, Var, VarMathOps};

const DEFAULT_LEARNING_RATE: f32 = 1.0;
const DEFAULT_RHO: f32 = 0.9;
const DEFAULT_EPSILON: f32 = 1e-6;

/// RMSProp，学习率默认1.0、rho默认0.9、epsilon默认1e-6
pub fn rmsprop(loss: &Var, params: &[Var]) -> Result<UpdatePlan, GraphError> {
    rmsprop_with_config(
        loss,
        params,
        DEFAULT_LEARNING_RATE,
        DEFAULT_RHO,
        DEFAULT_EPSILON,
    )
}

/// RMSProp：每个参数带一个零初始化的滑动平均累积量`acc`。
/// 每步：`acc_new = rho*acc + (1-rho)*grad^2`；
/// `new_param = param - lr * grad / sqrt(acc_new + eps)`。
///
/// rho是[0,1)内的衰减系数；epsilon在梯度长期为零时尤为重要。
pub fn rmsprop_with_config(
    loss: &Var,
    params: &[Var],
    learning_rate: f32,
    rho: f32,
    epsilon: f32,
) -> Result<UpdatePlan, GraphError> {
    let grads = gradients(loss, params)?;
    check_alignment(params, &grads)?;

    let mut plan = UpdatePlan::new();
    for (param, grad) in params.iter().zip(&grads) {
        let acc = new_accumulator_for(param, "grad_sq_avg")?;
        let new_acc = acc
            .mul_scalar(rho)?
            .try_add(&grad.square()?.mul_scalar(1.0 - rho)?)?;
        let denom = new_acc.add_scalar(epsilon)?.sqrt()?;
        let step = grad.mul_scalar(learning_rate)?.try_div(&denom)?;
        let new_param = param.try_sub(&step)?;
        plan.push(acc, new_acc)?;
        plan.push(param.clone(), new_param)?;
    }
    Ok(plan)
}

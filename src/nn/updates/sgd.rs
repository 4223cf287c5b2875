/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : 朴素随机梯度下降
 */

use super::{check_alignment, UpdatePlan};
use crate::nn::{gradients, GraphError, Var, VarMathOps};

/// 朴素梯度下降：`new_param = param - learning_rate * grad`。
/// 无累积量，调用之间不携带状态。
pub fn sgd(loss: &Var, params: &[Var], learning_rate: f32) -> Result<UpdatePlan, GraphError> {
    let grads = gradients(loss, params)?;
    check_alignment(params, &grads)?;

    let mut plan = UpdatePlan::new();
    for (param, grad) in params.iter().zip(&grads) {
        let new_param = param.try_sub(&grad.mul_scalar(learning_rate)?)?;
        plan.push(param.clone(), new_param)?;
    }
    Ok(plan)
}

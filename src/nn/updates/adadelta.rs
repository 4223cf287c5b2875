/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : Adadelta - 无需学习率的自适应方法
 */

use super::{check_alignment, new_accumulator_for, UpdatePlan};
use crate::nn::{gradients, GraphError, Var, VarMathOps};

// 原始论文的公式本身不含学习率，故默认取1.0
const DEFAULT_LEARNING_RATE: f32 = 1.0;
const DEFAULT_RHO: f32 = 0.95;
const DEFAULT_EPSILON: f32 = 1e-6;

/// Adadelta，学习率默认1.0、rho默认0.95、epsilon默认1e-6
pub fn adadelta(loss: &Var, params: &[Var]) -> Result<UpdatePlan, GraphError> {
    adadelta_with_config(
        loss,
        params,
        DEFAULT_LEARNING_RATE,
        DEFAULT_RHO,
        DEFAULT_EPSILON,
    )
}

/// Adadelta：每个参数带两个零初始化累积量——
/// `acc`（梯度平方滑动平均）与`acc_delta`（更新量平方滑动平均）。
///
/// 每步严格按如下依赖顺序，右侧全部读更新前的值：
/// 1. `acc_new = rho*acc + (1-rho)*grad^2`
/// 2. `update = grad * sqrt(acc_delta + eps) / sqrt(acc_new + eps)`
///    （用旧的`acc_delta`、新的`acc`）
/// 3. `new_param = param - lr*update`
/// 4. `acc_delta_new = rho*acc_delta + (1-rho)*update^2`
///
/// `update`只是中间量，不作为状态暴露。
pub fn adadelta_with_config(
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
        let acc_delta = new_accumulator_for(param, "delta_sq_avg")?;

        let new_acc = acc
            .mul_scalar(rho)?
            .try_add(&grad.square()?.mul_scalar(1.0 - rho)?)?;

        let numerator = acc_delta.add_scalar(epsilon)?.sqrt()?;
        let denominator = new_acc.add_scalar(epsilon)?.sqrt()?;
        let update = grad.try_mul(&numerator.try_div(&denominator)?)?;

        let new_param = param.try_sub(&update.mul_scalar(learning_rate)?)?;
        let new_acc_delta = acc_delta
            .mul_scalar(rho)?
            .try_add(&update.square()?.mul_scalar(1.0 - rho)?)?;

        plan.push(acc, new_acc)?;
        plan.push(param.clone(), new_param)?;
        plan.push(acc_delta, new_acc_delta)?;
    }
    Ok(plan)
}

/*
 * @Author       : 老董
 * @Date         : 2026-02-10
 * @Description  : Var 数学运算扩展 trait
 *
 * 提供逐元素与归约运算的链式调用支持，用户需 import 此 trait 后才能使用。
 * 更新规则与范数约束内部全部用这些方法组合表达式。
 */

use crate::nn::{GraphError, Var};
use std::rc::Rc;

/// 数学运算扩展 trait
///
/// # 使用示例
/// ```ignore
/// use only_updates::nn::{Var, VarMathOps};
///
/// let loss = w.square()?.sum()?;
/// let scaled = g.mul_scalar(0.01)?;
/// let denom = acc.add_scalar(1e-6)?.sqrt()?;
/// ```
pub trait VarMathOps {
    /// 逐元素平方
    fn square(&self) -> Result<Var, GraphError>;

    /// 逐元素开平方
    fn sqrt(&self) -> Result<Var, GraphError>;

    /// 逐元素裁剪到[min, max]
    fn clip(&self, min: f32, max: f32) -> Result<Var, GraphError>;

    /// 全元素求和，输出形状[1]
    fn sum(&self) -> Result<Var, GraphError>;

    /// 沿指定轴求和并保留维度（被求和的轴变为1）
    fn sum_keepdims(&self, axes: &[usize]) -> Result<Var, GraphError>;

    /// 乘以标量常量
    fn mul_scalar(&self, factor: f32) -> Result<Var, GraphError>;

    /// 加上标量常量
    fn add_scalar(&self, offset: f32) -> Result<Var, GraphError>;
}

impl VarMathOps for Var {
    fn square(&self) -> Result<Var, GraphError> {
        let id = self.graph().borrow_mut().new_square_node(self.node_id(), None)?;
        Ok(Var::new(id, Rc::clone(self.graph())))
    }

    fn sqrt(&self) -> Result<Var, GraphError> {
        let id = self.graph().borrow_mut().new_sqrt_node(self.node_id(), None)?;
        Ok(Var::new(id, Rc::clone(self.graph())))
    }

    fn clip(&self, min: f32, max: f32) -> Result<Var, GraphError> {
        let id = self
            .graph()
            .borrow_mut()
            .new_clip_node(self.node_id(), min, max, None)?;
        Ok(Var::new(id, Rc::clone(self.graph())))
    }

    fn sum(&self) -> Result<Var, GraphError> {
        let id = self.graph().borrow_mut().new_sum_node(self.node_id(), None)?;
        Ok(Var::new(id, Rc::clone(self.graph())))
    }

    fn sum_keepdims(&self, axes: &[usize]) -> Result<Var, GraphError> {
        let id = self
            .graph()
            .borrow_mut()
            .new_sum_keepdims_node(self.node_id(), axes, None)?;
        Ok(Var::new(id, Rc::clone(self.graph())))
    }

    fn mul_scalar(&self, factor: f32) -> Result<Var, GraphError> {
        let id = self
            .graph()
            .borrow_mut()
            .new_scalar_multiply_node(self.node_id(), factor, None)?;
        Ok(Var::new(id, Rc::clone(self.graph())))
    }

    fn add_scalar(&self, offset: f32) -> Result<Var, GraphError> {
        let id = self
            .graph()
            .borrow_mut()
            .new_scalar_add_node(self.node_id(), offset, None)?;
        Ok(Var::new(id, Rc::clone(self.graph())))
    }
}

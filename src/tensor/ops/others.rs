use ndarray::Axis;
use std::cmp::PartialEq;
use std::ops::Neg;

use crate::errors::TensorError;
use crate::tensor::Tensor;

impl From<f32> for Tensor {
    /// 实现 From<f32> trait 用于将`f32`类型转换为形状为`[1]`的张量
    fn from(scalar: f32) -> Self {
        Tensor::new(&[scalar], &[1])
    }
}

impl PartialEq for Tensor {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Neg for &Tensor {
    type Output = Tensor;

    fn neg(self) -> Tensor {
        self * -1.0
    }
}

impl Neg for Tensor {
    type Output = Self;

    fn neg(self) -> Self {
        -&self
    }
}

impl Tensor {
    /// 对张量中的所有元素求和并返回一个形状为[1]的标量。
    pub fn sum(&self) -> Tensor {
        Tensor::from(self.data.sum())
    }

    /// 沿指定轴求和，保留被归约的维度（keepdims语义，被归约轴的长度变为1）。
    /// 轴必须互不相同且小于张量维数，否则报错。
    pub fn sum_axes_keepdims(&self, axes: &[usize]) -> Result<Tensor, TensorError> {
        let dimension = self.dimension();
        let unique = axes
            .iter()
            .collect::<std::collections::HashSet<_>>()
            .len();
        if axes.is_empty() || unique != axes.len() || axes.iter().any(|&ax| ax >= dimension) {
            return Err(TensorError::InvalidReduceAxes {
                axes: axes.to_vec(),
                dimension,
            });
        }

        // sum_axis会移除该轴，随即用insert_axis在原位置补回长度1的轴，
        // 因此后续轴的编号始终保持有效
        let mut data = self.data.clone();
        for &ax in axes {
            data = data.sum_axis(Axis(ax)).insert_axis(Axis(ax));
        }
        Ok(Tensor { data })
    }

    /// 逐元素平方
    pub fn square(&self) -> Tensor {
        Tensor {
            data: self.data.mapv(|x| x * x),
        }
    }

    /// 逐元素开平方
    pub fn sqrt(&self) -> Tensor {
        Tensor {
            data: self.data.mapv(f32::sqrt),
        }
    }

    /// 逐元素裁剪到[min, max]区间
    pub fn clamp(&self, min: f32, max: f32) -> Tensor {
        Tensor {
            data: self.data.mapv(|x| x.clamp(min, max)),
        }
    }

    /// 逐元素映射
    pub fn map<F>(&self, f: F) -> Tensor
    where
        F: Fn(f32) -> f32,
    {
        Tensor {
            data: self.data.mapv(f),
        }
    }
}

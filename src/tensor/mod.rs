/*
 * @Author       : 老董
 * @Date         : 2026-02-10
 * @Description  : 张量模块：基于ndarray的f32动态维度张量，
 *                 只保留更新规则所需的逐元素运算与归约运算
 */

use ndarray::{Array, IxDyn};
use rand::Rng;
use rand::distributions::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

use crate::errors::TensorError;

mod ops {
    pub mod add;
    pub mod div;
    pub mod mul;
    pub mod others;
    pub mod sub;
}

mod shape;

pub(crate) use shape::shape_broadcastable_to;

#[cfg(test)]
pub mod tests;

/// 定义张量的结构体。其可以是标量、向量、矩阵或更高维度的数组。
/// 注：只要通过Tensor初始化的都是张量（即使标量也是张量）；
/// 而通常意义上的数字（类型为usize、f32等）就只是纯数（number），在这里不被认为是张量。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tensor {
    data: Array<f32, IxDyn>,
}

impl Tensor {
    /// 创建一个张量。`data`的长度必须和`shape`中所有元素的乘积相等，否则panic。
    /// 若为标量，`shape`可以是[]、[1]、[1,1]...；
    /// 若为向量，`shape`可以是[n]、[1,n]、[n,1]；
    /// 若为矩阵，`shape`可以是[n,m]；
    /// 若为更高维度的数组，`shape`可以是[c,n,m,...]。
    pub fn new(data: &[f32], shape: &[usize]) -> Tensor {
        assert!(
            data.len() == shape.iter().product::<usize>(),
            "{}",
            TensorError::DataLenMismatch {
                data_len: data.len(),
                shape: shape.to_vec(),
            }
        );
        let data = Array::from_shape_vec(IxDyn(shape), data.to_vec()).unwrap();
        Tensor { data }
    }

    /// 创建一个全零张量。
    pub fn zeros(shape: &[usize]) -> Tensor {
        Tensor {
            data: Array::zeros(IxDyn(shape)),
        }
    }

    /// 创建一个全一张量。
    pub fn ones(shape: &[usize]) -> Tensor {
        Tensor {
            data: Array::ones(IxDyn(shape)),
        }
    }

    /// 创建一个所有元素均为`value`的张量。
    pub fn filled(value: f32, shape: &[usize]) -> Tensor {
        Tensor {
            data: Array::from_elem(IxDyn(shape), value),
        }
    }

    /// 创建一个随机张量，其值在[min, max]的闭区间。
    pub fn uniform(min: f32, max: f32, shape: &[usize]) -> Tensor {
        let mut rng = rand::thread_rng();
        Self::uniform_with_rng(min, max, shape, &mut rng)
    }

    /// 使用指定RNG创建均匀分布随机张量（用于带种子的图）。
    pub fn uniform_with_rng<R: Rng>(min: f32, max: f32, shape: &[usize], rng: &mut R) -> Tensor {
        let between = Uniform::from(min..=max);
        let data = (0..shape.iter().product::<usize>())
            .map(|_| between.sample(rng))
            .collect::<Vec<_>>();
        Tensor::new(&data, shape)
    }

    /// 创建一个服从正态分布的随机张量（Box-Muller变换）。
    pub fn normal(mean: f32, std_dev: f32, shape: &[usize]) -> Tensor {
        let mut rng = rand::thread_rng();
        Self::normal_impl(mean, std_dev, shape, &mut rng)
    }

    /// 使用指定RNG创建正态分布随机张量（用于带种子的图）。
    pub fn normal_with_rng<R: Rng>(mean: f32, std_dev: f32, shape: &[usize], rng: &mut R) -> Tensor {
        Self::normal_impl(mean, std_dev, shape, rng)
    }

    fn normal_impl<R: Rng>(mean: f32, std_dev: f32, shape: &[usize], rng: &mut R) -> Tensor {
        let unit = Uniform::from(f32::EPSILON..=1.0f32);
        let data_len = shape.iter().product::<usize>();
        let mut data = Vec::with_capacity(data_len);

        while data.len() < data_len {
            let u1: f32 = unit.sample(rng);
            let u2: f32 = unit.sample(rng);
            let r = (-2.0 * u1.ln()).sqrt();
            let theta = 2.0 * std::f32::consts::PI * u2;
            let z0 = mean + std_dev * r * theta.cos();
            let z1 = mean + std_dev * r * theta.sin();

            if z0.is_finite() {
                data.push(z0);
            }
            if data.len() < data_len && z1.is_finite() {
                data.push(z1);
            }
        }

        Tensor::new(&data, shape)
    }
}

// 私有方法
impl Tensor {
    pub(crate) fn has_zero_value(&self) -> bool {
        self.data.iter().any(|&x| x == 0.)
    }
}

use ndarray::IxDyn;

use super::Tensor;
use crate::errors::TensorError;

impl Tensor {
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// 张量的维（dim）数、阶（rank）数
    /// 即`shape()`的元素个数--如：形状为`[]`的标量阶数为0，向量阶数为1，矩阵阶数为2，以此类推
    pub fn dimension(&self) -> usize {
        self.data.ndim()
    }

    /// 张量的元素个数
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// 判断两个张量的形状是否严格一致。如：形状为[1, 4]和[4]是不一致的，会返回false
    pub fn is_same_shape(&self, other: &Self) -> bool {
        self.shape() == other.shape()
    }

    /// 判断张量是否为标量（元素个数为1，不论形状如何）
    pub fn is_scalar(&self) -> bool {
        self.shape().is_empty() || self.shape().iter().all(|x| *x == 1)
    }

    /// 转化为纯数（number）。若为标量，则返回Some(number)，否则返回None
    pub fn number(&self) -> Option<f32> {
        if self.size() == 1 {
            self.data.iter().next().copied()
        } else {
            None
        }
    }

    /// 以切片形式返回底层数据（标准布局）
    pub fn data_as_slice(&self) -> &[f32] {
        self.data.as_slice().unwrap()
    }

    /// 将张量广播成目标形状。广播失败则报错。
    pub fn broadcast_to(&self, shape: &[usize]) -> Result<Tensor, TensorError> {
        match self.data.broadcast(IxDyn(shape)) {
            Some(view) => Ok(Tensor {
                data: view.to_owned(),
            }),
            None => Err(TensorError::IncompatibleShape {
                tensor1_shape: self.shape().to_vec(),
                tensor2_shape: shape.to_vec(),
            }),
        }
    }

    /// 判断本张量是否可广播成目标形状（ndarray语义：本张量向目标形状广播）
    pub fn can_broadcast_to(&self, shape: &[usize]) -> bool {
        self.data.broadcast(IxDyn(shape)).is_some()
    }
}

/// 判断`shape`能否（按ndarray语义）广播成`target`形状。
/// 规则：从右向左对齐维度，每个维度须相等或为1；维数不足时前面补1。
pub(crate) fn shape_broadcastable_to(shape: &[usize], target: &[usize]) -> bool {
    if shape.len() > target.len() {
        return false;
    }
    let offset = target.len() - shape.len();
    shape
        .iter()
        .zip(&target[offset..])
        .all(|(&s, &t)| s == t || s == 1)
}

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TensorError {
    // 张量二元运算
    #[error("形状不兼容，无法广播：第一个张量的形状为{tensor1_shape:?}，第二个张量的形状为{tensor2_shape:?}")]
    IncompatibleShape {
        tensor1_shape: Vec<usize>,
        tensor2_shape: Vec<usize>,
    },

    #[error("数据长度{data_len}与形状{shape:?}的元素个数不符")]
    DataLenMismatch { data_len: usize, shape: Vec<usize> },

    #[error("归约轴{axes:?}对维数为{dimension}的张量无效")]
    InvalidReduceAxes { axes: Vec<usize>, dimension: usize },

    #[error("作为除数的张量中存在为零元素")]
    DivByZeroElement,
}

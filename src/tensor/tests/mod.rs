use approx::assert_abs_diff_eq;

use crate::tensor::Tensor;

#[test]
fn test_new_and_shape() {
    let t = Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
    assert_eq!(t.shape(), &[2, 3]);
    assert_eq!(t.dimension(), 2);
    assert_eq!(t.size(), 6);
    assert!(!t.is_scalar());
}

#[test]
#[should_panic(expected = "数据长度")]
fn test_new_with_wrong_data_len() {
    let _ = Tensor::new(&[1.0, 2.0, 3.0], &[2, 3]);
}

#[test]
fn test_zeros_and_ones() {
    let z = Tensor::zeros(&[3, 2]);
    assert!(z.data_as_slice().iter().all(|&x| x == 0.0));
    let o = Tensor::ones(&[3, 2]);
    assert!(o.data_as_slice().iter().all(|&x| x == 1.0));
}

#[test]
fn test_number_for_scalar_like() {
    assert_eq!(Tensor::new(&[3.5], &[1]).number(), Some(3.5));
    assert_eq!(Tensor::new(&[3.5], &[1, 1]).number(), Some(3.5));
    assert_eq!(Tensor::new(&[1.0, 2.0], &[2]).number(), None);
}

#[test]
fn test_elementwise_arithmetic() {
    let a = Tensor::new(&[1.0, 2.0, 3.0, 4.0], &[2, 2]);
    let b = Tensor::new(&[4.0, 3.0, 2.0, 1.0], &[2, 2]);

    assert_eq!((&a + &b).data_as_slice(), &[5.0, 5.0, 5.0, 5.0]);
    assert_eq!((&a - &b).data_as_slice(), &[-3.0, -1.0, 1.0, 3.0]);
    assert_eq!((&a * &b).data_as_slice(), &[4.0, 6.0, 6.0, 4.0]);
    assert_eq!((&a / &b).data_as_slice(), &[0.25, 2.0 / 3.0, 1.5, 4.0]);
}

#[test]
fn test_scalar_arithmetic() {
    let a = Tensor::new(&[1.0, 2.0], &[2]);
    assert_eq!((&a * 2.0).data_as_slice(), &[2.0, 4.0]);
    assert_eq!((&a + 1.0).data_as_slice(), &[2.0, 3.0]);
    assert_eq!((2.0 * &a).data_as_slice(), &[2.0, 4.0]);
    assert_eq!((1.0 - &a).data_as_slice(), &[0.0, -1.0]);
    assert_eq!((-&a).data_as_slice(), &[-1.0, -2.0]);
}

#[test]
fn test_broadcast_mul() {
    // [2, 3] * [1, 3]：右操作数沿axis 0广播
    let a = Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
    let b = Tensor::new(&[2.0, 0.5, 1.0], &[1, 3]);
    let c = &a * &b;
    assert_eq!(c.shape(), &[2, 3]);
    assert_eq!(c.data_as_slice(), &[2.0, 1.0, 3.0, 8.0, 2.5, 6.0]);

    // 左操作数需要广播时同样可行
    let d = &b * &a;
    assert_eq!(d.shape(), &[2, 3]);
    assert_eq!(d.data_as_slice(), &[2.0, 1.0, 3.0, 8.0, 2.5, 6.0]);
}

#[test]
#[should_panic(expected = "形状不兼容")]
fn test_broadcast_incompatible() {
    let a = Tensor::new(&[1.0, 2.0, 3.0], &[3]);
    let b = Tensor::new(&[1.0, 2.0], &[2]);
    let _ = &a + &b;
}

#[test]
#[should_panic(expected = "作为除数的张量中存在为零元素")]
fn test_div_by_zero_element() {
    let a = Tensor::ones(&[2]);
    let b = Tensor::new(&[1.0, 0.0], &[2]);
    let _ = &a / &b;
}

#[test]
fn test_sum() {
    let a = Tensor::new(&[1.0, 2.0, 3.0, 4.0], &[2, 2]);
    let s = a.sum();
    assert_eq!(s.shape(), &[1]);
    assert_eq!(s.number(), Some(10.0));
}

#[test]
fn test_sum_axes_keepdims() {
    let a = Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);

    // 沿axis 0归约：每列一个和，形状[1, 3]
    let s0 = a.sum_axes_keepdims(&[0]).unwrap();
    assert_eq!(s0.shape(), &[1, 3]);
    assert_eq!(s0.data_as_slice(), &[5.0, 7.0, 9.0]);

    // 沿axis 1归约：每行一个和，形状[2, 1]
    let s1 = a.sum_axes_keepdims(&[1]).unwrap();
    assert_eq!(s1.shape(), &[2, 1]);
    assert_eq!(s1.data_as_slice(), &[6.0, 15.0]);

    // 同时归约两个轴
    let s01 = a.sum_axes_keepdims(&[0, 1]).unwrap();
    assert_eq!(s01.shape(), &[1, 1]);
    assert_eq!(s01.number(), Some(21.0));
}

#[test]
fn test_sum_axes_keepdims_invalid_axes() {
    let a = Tensor::ones(&[2, 3]);
    assert!(a.sum_axes_keepdims(&[2]).is_err());
    assert!(a.sum_axes_keepdims(&[0, 0]).is_err());
    assert!(a.sum_axes_keepdims(&[]).is_err());
}

#[test]
fn test_square_sqrt_clamp() {
    let a = Tensor::new(&[1.0, 2.0, 3.0], &[3]);
    assert_eq!(a.square().data_as_slice(), &[1.0, 4.0, 9.0]);

    let b = Tensor::new(&[4.0, 9.0, 16.0], &[3]);
    assert_eq!(b.sqrt().data_as_slice(), &[2.0, 3.0, 4.0]);

    let c = Tensor::new(&[-1.0, 5.0, 20.0], &[3]);
    assert_eq!(c.clamp(0.0, 10.0).data_as_slice(), &[0.0, 5.0, 10.0]);
}

#[test]
fn test_normal_statistics() {
    let t = Tensor::normal(0.0, 1.0, &[100, 100]);
    let data = t.data_as_slice();
    let mean = data.iter().sum::<f32>() / data.len() as f32;
    let var = data.iter().map(|x| (x - mean) * (x - mean)).sum::<f32>() / data.len() as f32;
    assert_abs_diff_eq!(mean, 0.0, epsilon = 0.05);
    assert_abs_diff_eq!(var, 1.0, epsilon = 0.1);
}

#[test]
fn test_broadcast_to() {
    let a = Tensor::new(&[1.0, 2.0, 3.0], &[1, 3]);
    let b = a.broadcast_to(&[2, 3]).unwrap();
    assert_eq!(b.shape(), &[2, 3]);
    assert_eq!(b.data_as_slice(), &[1.0, 2.0, 3.0, 1.0, 2.0, 3.0]);

    assert!(a.broadcast_to(&[2, 2]).is_err());
}

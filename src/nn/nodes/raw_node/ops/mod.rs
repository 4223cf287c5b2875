mod add;
mod clip;
mod divide;
mod multiply;
mod scalar_add;
mod scalar_multiply;
mod sqrt;
mod square;
mod subtract;
mod sum;
mod sum_keepdims;

pub(crate) use add::Add;
pub(crate) use clip::Clip;
pub(crate) use divide::Divide;
pub(crate) use multiply::Multiply;
pub(crate) use scalar_add::ScalarAdd;
pub(crate) use scalar_multiply::ScalarMultiply;
pub(crate) use sqrt::Sqrt;
pub(crate) use square::Square;
pub(crate) use subtract::Subtract;
pub(crate) use sum::Sum;
pub(crate) use sum_keepdims::SumKeepDims;

/// 各算子节点的id/name/value/grad等簿记字段的访问器完全一致，统一由本宏生成，
/// 各节点文件只需实现`type_name`、`calc_value_by_parents`与`calc_grad_to_parent`
macro_rules! op_node_common_methods {
    () => {
        fn id(&self) -> NodeId {
            self.id.unwrap()
        }

        fn set_id(&mut self, id: NodeId) {
            self.id = Some(id);
        }

        fn name(&self) -> &str {
            self.name.as_ref().unwrap()
        }

        fn set_name(&mut self, name: &str) {
            self.name = Some(name.to_string());
        }

        fn value_expected_shape(&self) -> &[usize] {
            &self.shape
        }

        fn value(&self) -> Option<&Tensor> {
            self.value.as_ref()
        }

        fn grad(&self) -> Option<&Tensor> {
            self.grad.as_ref()
        }

        fn set_grad(&mut self, grad: Option<&Tensor>) -> Result<(), GraphError> {
            self.grad = grad.map(|g| g.clone());
            Ok(())
        }
    };
}
pub(crate) use op_node_common_methods;

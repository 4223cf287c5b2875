use crate::nn::nodes::raw_node::TraitNode;
use crate::nn::nodes::{NodeHandle, NodeId};
use crate::nn::GraphError;
use crate::tensor::Tensor;

/// 梯度节点：表示“loss对param的梯度”这一延迟计算的符号量。
///
/// 它的父节点为[loss, param]，形状与param一致。前向传播遇到它时，
/// 图会先算出loss的值，再做一次反向传播，把param上累积的梯度作为本节点的值。
/// 该流程由`GraphInner`特殊处理，不走常规的`calc_value_by_parents`。
#[derive(Clone)]
pub(crate) struct Gradient {
    id: Option<NodeId>,
    name: Option<String>,
    value: Option<Tensor>,
    loss_id: NodeId,
    param_id: NodeId,
    shape: Vec<usize>,
}

impl Gradient {
    pub(crate) fn new(loss: &NodeHandle, param: &NodeHandle) -> Result<Self, GraphError> {
        // loss必须是标量（元素数为1），否则无法定义对它的梯度
        let loss_size: usize = loss.value_expected_shape().iter().product();
        if loss_size != 1 {
            return Err(GraphError::InvalidOperation(format!(
                "求梯度要求loss为标量（元素数为1），但{}的形状为{:?}",
                loss,
                loss.value_expected_shape()
            )));
        }
        Ok(Self {
            id: None,
            name: None,
            value: None,
            loss_id: loss.id(),
            param_id: param.id(),
            shape: param.value_expected_shape().to_vec(),
        })
    }

    pub(crate) const fn loss_id(&self) -> NodeId {
        self.loss_id
    }

    pub(crate) const fn param_id(&self) -> NodeId {
        self.param_id
    }
}

impl TraitNode for Gradient {
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

    fn type_name(&self) -> &'static str {
        "Gradient"
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&mut self, _parents: &[NodeHandle]) -> Result<(), GraphError> {
        Err(GraphError::ComputationError(format!(
            "{}的值应由图的反向传播流程填充。不该触及本错误，否则说明crate代码有问题",
            self.display_node()
        )))
    }

    fn value(&self) -> Option<&Tensor> {
        self.value.as_ref()
    }

    fn set_value(&mut self, value: Option<&Tensor>) -> Result<(), GraphError> {
        if let Some(v) = value {
            if v.shape() != self.shape.as_slice() {
                return Err(GraphError::ShapeMismatch {
                    expected: self.shape.clone(),
                    got: v.shape().to_vec(),
                    message: format!("{}的形状必须与param一致", self.display_node()),
                });
            }
        }
        self.value = value.cloned();
        Ok(())
    }

    fn calc_grad_to_parent(
        &self,
        _target_parent: &NodeHandle,
        _upstream_grad: &Tensor,
        _assistant_parent: Option<&NodeHandle>,
    ) -> Result<Tensor, GraphError> {
        Err(GraphError::InvalidOperation(format!(
            "不支持穿过{}继续求导（暂不支持高阶梯度）",
            self.display_node()
        )))
    }

    fn grad(&self) -> Option<&Tensor> {
        None
    }

    fn set_grad(&mut self, _grad: Option<&Tensor>) -> Result<(), GraphError> {
        // 反向传播不穿过Gradient节点
        Ok(())
    }
}

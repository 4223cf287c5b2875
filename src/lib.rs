//! # Only Updates
//!
//! `only_updates`项目旨在用纯rust仿造[theano](https://github.com/Theano/Theano)/
//! [lasagne](https://github.com/Lasagne/Lasagne)风格的符号化训练更新规则：
//! 每个更新规则接收标量损失表达式与一组参数节点，返回一份"更新计划"（update plan），
//! 即若干（目标节点，新值表达式）对；计划在每个训练步被"同时替换"地应用。
//! 规则本身只做图构建，不做任何即时数值计算。
//!

pub mod errors;
pub mod nn;
pub mod tensor;

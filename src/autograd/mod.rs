//! Minimal host pieces for layers: tensors, variables and the execution context

mod context;
mod tensor;
mod variable;

pub use context::Context;
pub use tensor::Tensor;
pub use variable::Variable;

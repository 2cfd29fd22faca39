//! Layer trait

use super::weights::Weight;
use crate::autograd::Context;
use crate::error::Result;
use crate::Tensor;

/// Contract between a model and the layers it runs
pub trait Layer {
    /// Unique layer name, used to prefix its weights
    fn name(&self) -> &str;

    /// Whether `build` has created the layer's state
    fn is_built(&self) -> bool;

    /// Create state for inputs of `input_shape`
    fn build(&mut self, input_shape: &[usize]) -> Result<()>;

    /// Run the layer
    ///
    /// `training: None` defers to the learning phase carried by `ctx`.
    /// Stateful layers update their state only in training mode and only
    /// when the call succeeds; `QuantizeLayer` also advances its step
    /// counter on every such call.
    fn forward(&mut self, input: &Tensor, training: Option<bool>, ctx: &Context) -> Result<Tensor>;

    /// Snapshot of every weight the layer holds, empty before `build`
    fn weights(&self) -> Vec<Weight>;

    /// Whether an optimizer may update this layer
    fn trainable(&self) -> bool {
        true
    }
}

//! Range trackers created by a quantizer for its layer.

use crate::autograd::Variable;

/// Initial tracked range, wide enough for typical ReLU6 activations
pub const INITIAL_MIN: f32 = -6.0;
pub const INITIAL_MAX: f32 = 6.0;

/// The `min_var` / `max_var` pair a quantizer reads and updates
#[derive(Clone, Debug, PartialEq)]
pub struct RangeVars {
    pub min_var: Variable<f32>,
    pub max_var: Variable<f32>,
}

impl RangeVars {
    /// Create trackers named `{prefix}/min_var` and `{prefix}/max_var`
    pub fn new(prefix: &str, min: f32, max: f32) -> Self {
        Self {
            min_var: Variable::non_trainable(format!("{prefix}/min_var"), min),
            max_var: Variable::non_trainable(format!("{prefix}/max_var"), max),
        }
    }

    pub fn min(&self) -> f32 {
        self.min_var.value()
    }

    pub fn max(&self) -> f32 {
        self.max_var.value()
    }

    pub fn assign(&mut self, min: f32, max: f32) {
        self.min_var.assign(min);
        self.max_var.assign(max);
    }
}

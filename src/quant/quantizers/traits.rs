//! Quantizer strategy trait

use std::fmt;

use tracing::debug;

use super::config::QuantizerConfig;
use super::settings::QuantizerSettings;
use super::vars::{RangeVars, INITIAL_MAX, INITIAL_MIN};
use crate::error::Result;
use crate::Tensor;

/// Strategy that fake-quantizes the tensors passing through a layer
///
/// The layer owns the range trackers; the strategy decides how they move in
/// training mode and how they are applied.
pub trait Quantizer: fmt::Debug {
    /// Grid settings of this quantizer
    fn settings(&self) -> &QuantizerSettings;

    /// Fake quantize `input`
    ///
    /// `step` is the layer's training-step counter, `-1` before the first
    /// training step. Strategies may seed their trackers from the batch when
    /// `step < 0` instead of keeping the initial `[-6, 6]` range; the
    /// moving-average and all-values quantizers do so.
    ///
    /// Implementations must not mutate `vars` when `training` is false, and
    /// must leave `vars` untouched when they return an error.
    fn quantize(
        &self,
        input: &Tensor,
        step: i64,
        training: bool,
        vars: &mut RangeVars,
    ) -> Result<Tensor>;

    /// Serializable description of this quantizer
    fn config(&self) -> QuantizerConfig;

    /// Create the range trackers for a layer named `name`
    fn build(&self, input_shape: &[usize], name: &str) -> RangeVars {
        debug!(layer = name, ?input_shape, "creating quantizer range trackers");
        RangeVars::new(name, INITIAL_MIN, INITIAL_MAX)
    }

    /// Gradient of the fake-quantize op: clamped straight-through estimator
    fn backward(&self, grad_output: &Tensor, input: &Tensor, vars: &RangeVars) -> Result<Tensor> {
        let fq = self.settings().range_quantizer(vars.min(), vars.max())?;
        fq.backward_clamped(grad_output, input)
    }

    /// Reject settings the quantizer cannot run with
    fn validate(&self) -> Result<()> {
        self.settings().validate()
    }
}

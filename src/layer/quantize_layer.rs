//! Layer that emulates quantization of the tensors passing through it.

use std::fmt;

use tracing::{debug, trace};

use super::config::QuantizeLayerConfig;
use super::traits::Layer;
use super::weights::Weight;
use crate::autograd::{Context, Variable};
use crate::error::{QatError, Result};
use crate::quant::{Quantizer, RangeVars};
use crate::Tensor;

/// Initial value of the training-step counter
pub const INITIAL_STEP: i64 = -1;

struct LayerState {
    input_shape: Vec<usize>,
    range: RangeVars,
    optimizer_step: Variable<i64>,
}

/// Emulated quantization of tensors passed through the layer
///
/// Wraps a [`Quantizer`] and owns the state it needs: the `min_var` /
/// `max_var` range trackers and an `optimizer_step` counter starting at -1.
/// In training mode the quantizer may move the trackers and the counter
/// advances by one after each successful call, so quantizers can tell the
/// first training batch apart. Inference and failed calls leave all state
/// untouched.
pub struct QuantizeLayer {
    name: String,
    trainable: bool,
    quantizer: Box<dyn Quantizer>,
    state: Option<LayerState>,
}

impl QuantizeLayer {
    /// Create a quantize layer
    ///
    /// Fails with [`QatError::InvalidQuantizer`] when `quantizer` is `None`
    /// or rejects its own settings.
    pub fn new(name: impl Into<String>, quantizer: Option<Box<dyn Quantizer>>) -> Result<Self> {
        let quantizer = quantizer.ok_or_else(|| QatError::InvalidQuantizer {
            message: "quantizer should not be None".to_string(),
        })?;
        quantizer
            .validate()
            .map_err(|err| QatError::InvalidQuantizer {
                message: err.to_string(),
            })?;

        Ok(Self {
            name: name.into(),
            trainable: true,
            quantizer,
            state: None,
        })
    }

    /// Create a quantize layer around a concrete quantizer
    pub fn with_quantizer(
        name: impl Into<String>,
        quantizer: impl Quantizer + 'static,
    ) -> Result<Self> {
        Self::new(name, Some(Box::new(quantizer)))
    }

    /// Restore a layer from its configuration
    pub fn from_config(config: QuantizeLayerConfig) -> Result<Self> {
        let quantizer = config
            .quantizer
            .ok_or_else(|| QatError::InvalidQuantizer {
                message: format!("config for layer '{}' has no quantizer entry", config.name),
            })?
            .into_quantizer()
            .map_err(|err| QatError::InvalidQuantizer {
                message: err.to_string(),
            })?;

        let mut layer = Self::new(config.name, Some(quantizer))?;
        layer.trainable = config.trainable;
        Ok(layer)
    }

    /// Restore a layer from a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: QuantizeLayerConfig = serde_json::from_str(json)?;
        Self::from_config(config)
    }

    /// Configuration that [`QuantizeLayer::from_config`] turns back into an equivalent layer
    pub fn config(&self) -> QuantizeLayerConfig {
        QuantizeLayerConfig {
            name: self.name.clone(),
            trainable: self.trainable,
            quantizer: Some(self.quantizer.config()),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.config())?)
    }

    pub fn quantizer(&self) -> &dyn Quantizer {
        self.quantizer.as_ref()
    }

    pub fn set_trainable(&mut self, trainable: bool) {
        self.trainable = trainable;
    }

    /// Shape the layer was built with
    pub fn input_shape(&self) -> Option<&[usize]> {
        self.state.as_ref().map(|s| s.input_shape.as_slice())
    }

    /// Current range trackers
    pub fn range(&self) -> Option<&RangeVars> {
        self.state.as_ref().map(|s| &s.range)
    }

    /// Current training-step counter
    pub fn optimizer_step(&self) -> Option<i64> {
        self.state.as_ref().map(|s| s.optimizer_step.value())
    }

    /// Gradient of the layer output with respect to its input
    pub fn backward(&self, grad_output: &Tensor, input: &Tensor) -> Result<Tensor> {
        let state = self.state()?;
        self.quantizer.backward(grad_output, input, &state.range)
    }

    /// Restore weights produced by [`Layer::weights`]
    pub fn set_weights(&mut self, weights: &[Weight]) -> Result<()> {
        let name = self.name.clone();
        let state = self.state.as_mut().ok_or(QatError::NotBuilt { layer: name })?;

        if weights.len() != 3 {
            return Err(QatError::WeightMismatch {
                expected: "3 weights (min_var, max_var, optimizer_step)".to_string(),
                actual: format!("{} weights", weights.len()),
            });
        }

        let mut min = state.range.min();
        let mut max = state.range.max();
        let mut step = state.optimizer_step.value();

        for weight in weights {
            let parsed = if weight.name == state.range.min_var.name() {
                weight.as_f32().map(|v| min = v)
            } else if weight.name == state.range.max_var.name() {
                weight.as_f32().map(|v| max = v)
            } else if weight.name == state.optimizer_step.name() {
                weight.as_i64().map(|v| step = v)
            } else {
                None
            };

            if parsed.is_none() {
                return Err(QatError::WeightMismatch {
                    expected: format!("a weight of layer '{}'", self.name),
                    actual: format!("{} = {:?}", weight.name, weight.value),
                });
            }
        }

        state.range.assign(min, max);
        state.optimizer_step.assign(step);
        debug!(layer = %self.name, min, max, step, "restored quantize layer weights");
        Ok(())
    }

    fn state(&self) -> Result<&LayerState> {
        self.state.as_ref().ok_or_else(|| QatError::NotBuilt {
            layer: self.name.clone(),
        })
    }
}

impl Layer for QuantizeLayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_built(&self) -> bool {
        self.state.is_some()
    }

    fn build(&mut self, input_shape: &[usize]) -> Result<()> {
        if self.state.is_some() {
            return Ok(());
        }

        let range = self.quantizer.build(input_shape, &self.name);
        let optimizer_step =
            Variable::non_trainable(format!("{}/optimizer_step", self.name), INITIAL_STEP);

        debug!(layer = %self.name, ?input_shape, "built quantize layer");
        self.state = Some(LayerState {
            input_shape: input_shape.to_vec(),
            range,
            optimizer_step,
        });
        Ok(())
    }

    fn forward(&mut self, input: &Tensor, training: Option<bool>, ctx: &Context) -> Result<Tensor> {
        if self.state.is_none() {
            self.build(&[input.len()])?;
        }
        let training = ctx.resolve_training(training);

        let name = self.name.clone();
        let state = self.state.as_mut().ok_or(QatError::NotBuilt { layer: name })?;

        let expected: usize = state.input_shape.iter().product();
        if input.len() != expected {
            return Err(QatError::ShapeMismatch {
                expected: state.input_shape.clone(),
                actual: vec![input.len()],
            });
        }

        let step = state.optimizer_step.value();
        trace!(layer = %self.name, training, step, "quantize layer forward");

        // The quantizer works on a copy; trackers and step only change on success
        let mut range = state.range.clone();
        let output = self.quantizer.quantize(input, step, training, &mut range)?;
        if training {
            state.range = range;
            state.optimizer_step.assign(step + 1);
        }
        Ok(output)
    }

    fn weights(&self) -> Vec<Weight> {
        match &self.state {
            Some(state) => vec![
                Weight::float(
                    state.range.min_var.name(),
                    state.range.min(),
                    state.range.min_var.trainable(),
                ),
                Weight::float(
                    state.range.max_var.name(),
                    state.range.max(),
                    state.range.max_var.trainable(),
                ),
                Weight::int(
                    state.optimizer_step.name(),
                    state.optimizer_step.value(),
                    state.optimizer_step.trainable(),
                ),
            ],
            None => Vec::new(),
        }
    }

    fn trainable(&self) -> bool {
        self.trainable
    }
}

impl fmt::Debug for QuantizeLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuantizeLayer")
            .field("name", &self.name)
            .field("trainable", &self.trainable)
            .field("quantizer", &self.quantizer)
            .field("built", &self.state.is_some())
            .finish()
    }
}

//! Quantizer that smooths the tracked range with an exponential moving average.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::config::QuantizerConfig;
use super::settings::QuantizerSettings;
use super::traits::Quantizer;
use super::vars::RangeVars;
use crate::error::{QatError, Result};
use crate::Tensor;

/// Default decay of the range EMA
pub const DEFAULT_EMA_DECAY: f32 = 0.999;

fn default_ema_decay() -> f32 {
    DEFAULT_EMA_DECAY
}

/// Settings of a [`MovingAverageQuantizer`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovingAverageSettings {
    #[serde(flatten)]
    pub settings: QuantizerSettings,
    #[serde(default = "default_ema_decay")]
    pub ema_decay: f32,
}

/// Moves the tracked range toward each training batch's range
///
/// v ← v - (v - batch) · (1 - decay). The first training step seeds the
/// trackers with the batch range. Suited to activations.
#[derive(Clone, Debug, PartialEq)]
pub struct MovingAverageQuantizer {
    settings: QuantizerSettings,
    ema_decay: f32,
}

impl MovingAverageQuantizer {
    pub fn new(num_bits: usize, symmetric: bool, narrow_range: bool) -> Self {
        Self {
            settings: QuantizerSettings::new(num_bits, symmetric, narrow_range),
            ema_decay: DEFAULT_EMA_DECAY,
        }
    }

    pub fn from_settings(settings: MovingAverageSettings) -> Self {
        Self {
            settings: settings.settings,
            ema_decay: settings.ema_decay,
        }
    }

    /// Override the EMA decay
    pub fn with_ema_decay(mut self, ema_decay: f32) -> Self {
        self.ema_decay = ema_decay;
        self
    }

    pub fn ema_decay(&self) -> f32 {
        self.ema_decay
    }
}

impl Quantizer for MovingAverageQuantizer {
    fn settings(&self) -> &QuantizerSettings {
        &self.settings
    }

    fn quantize(
        &self,
        input: &Tensor,
        step: i64,
        training: bool,
        vars: &mut RangeVars,
    ) -> Result<Tensor> {
        let (min, max) = match self.settings.batch_range(input) {
            Some((batch_min, batch_max)) if training => {
                if step < 0 {
                    (batch_min, batch_max)
                } else {
                    let momentum = 1.0 - self.ema_decay;
                    (
                        vars.min() - (vars.min() - batch_min) * momentum,
                        vars.max() - (vars.max() - batch_max) * momentum,
                    )
                }
            }
            _ => (vars.min(), vars.max()),
        };

        let fq = self.settings.range_quantizer(min, max)?;
        if training {
            trace!(step, min, max, "moving average range");
            vars.assign(min, max);
        }
        Ok(fq.forward(input))
    }

    fn config(&self) -> QuantizerConfig {
        QuantizerConfig::MovingAverageQuantizer(MovingAverageSettings {
            settings: self.settings.clone(),
            ema_decay: self.ema_decay,
        })
    }

    fn validate(&self) -> Result<()> {
        self.settings.validate()?;
        if !(self.ema_decay > 0.0 && self.ema_decay < 1.0) {
            return Err(QatError::config(
                "ema_decay",
                format!("must be in (0, 1), got {}", self.ema_decay),
                format!("Use the default decay of {DEFAULT_EMA_DECAY}"),
            ));
        }
        Ok(())
    }
}

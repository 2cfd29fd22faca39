//! Quantizer that tracks the range of the most recent training batch.

use tracing::trace;

use super::config::QuantizerConfig;
use super::settings::QuantizerSettings;
use super::traits::Quantizer;
use super::vars::RangeVars;
use crate::error::Result;
use crate::Tensor;

/// Uses the last training batch's range for quantization
///
/// Suited to weights, whose range changes slowly between steps.
#[derive(Clone, Debug, PartialEq)]
pub struct LastValueQuantizer {
    settings: QuantizerSettings,
}

impl LastValueQuantizer {
    pub fn new(num_bits: usize, symmetric: bool, narrow_range: bool) -> Self {
        Self::from_settings(QuantizerSettings::new(num_bits, symmetric, narrow_range))
    }

    pub fn from_settings(settings: QuantizerSettings) -> Self {
        Self { settings }
    }
}

impl Quantizer for LastValueQuantizer {
    fn settings(&self) -> &QuantizerSettings {
        &self.settings
    }

    fn quantize(
        &self,
        input: &Tensor,
        _step: i64,
        training: bool,
        vars: &mut RangeVars,
    ) -> Result<Tensor> {
        let (min, max) = match self.settings.batch_range(input) {
            Some(range) if training => range,
            _ => (vars.min(), vars.max()),
        };

        let fq = self.settings.range_quantizer(min, max)?;
        if training {
            trace!(min, max, "last value range");
            vars.assign(min, max);
        }
        Ok(fq.forward(input))
    }

    fn config(&self) -> QuantizerConfig {
        QuantizerConfig::LastValueQuantizer(self.settings.clone())
    }
}

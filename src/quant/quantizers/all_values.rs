//! Quantizer that tracks the widest range seen during training.

use tracing::trace;

use super::config::QuantizerConfig;
use super::settings::QuantizerSettings;
use super::traits::Quantizer;
use super::vars::RangeVars;
use crate::error::Result;
use crate::Tensor;

/// Widens the tracked range to cover every training batch seen so far
///
/// The first training step seeds the trackers with the batch range.
#[derive(Clone, Debug, PartialEq)]
pub struct AllValuesQuantizer {
    settings: QuantizerSettings,
}

impl AllValuesQuantizer {
    pub fn new(num_bits: usize, symmetric: bool, narrow_range: bool) -> Self {
        Self::from_settings(QuantizerSettings::new(num_bits, symmetric, narrow_range))
    }

    pub fn from_settings(settings: QuantizerSettings) -> Self {
        Self { settings }
    }
}

impl Quantizer for AllValuesQuantizer {
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
                    (vars.min().min(batch_min), vars.max().max(batch_max))
                }
            }
            _ => (vars.min(), vars.max()),
        };

        let fq = self.settings.range_quantizer(min, max)?;
        if training {
            trace!(step, min, max, "all values range");
            vars.assign(min, max);
        }
        Ok(fq.forward(input))
    }

    fn config(&self) -> QuantizerConfig {
        QuantizerConfig::AllValuesQuantizer(self.settings.clone())
    }
}

//! Shared quantizer settings and range helpers.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::quant::fake_quantize::{validate_bits, FakeQuantConfig, FakeQuantize};
use crate::Tensor;

/// Grid shape shared by every range-tracking quantizer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuantizerSettings {
    /// Number of bits for quantization
    pub num_bits: usize,
    /// Make the tracked range symmetric around zero
    pub symmetric: bool,
    /// Use `2^bits - 1` levels instead of `2^bits`
    pub narrow_range: bool,
}

impl QuantizerSettings {
    pub fn new(num_bits: usize, symmetric: bool, narrow_range: bool) -> Self {
        Self {
            num_bits,
            symmetric,
            narrow_range,
        }
    }

    /// Check the bit width is supported
    pub fn validate(&self) -> Result<()> {
        validate_bits(self.num_bits)
    }

    pub fn fake_quant_config(&self) -> Result<FakeQuantConfig> {
        FakeQuantConfig::new(self.num_bits, self.narrow_range)
    }

    /// Fake quantizer over `[min, max]`, rejecting ranges that cannot form a grid
    pub fn range_quantizer(&self, min: f32, max: f32) -> Result<FakeQuantize> {
        FakeQuantize::from_range(self.fake_quant_config()?, min, max)
    }

    /// Range observed in one batch, adjusted for symmetry and widened to include zero
    ///
    /// Returns `None` for an empty batch.
    pub fn batch_range(&self, input: &Tensor) -> Option<(f32, f32)> {
        let (mut min, mut max) = input.min_max()?;

        if self.symmetric {
            let range = min.abs().max(max.abs());
            min = -range;
            max = if self.narrow_range {
                range
            } else {
                // Wide grids have one extra negative level
                let half_levels = 2f32.powi(self.num_bits.saturating_sub(1) as i32);
                range * (half_levels - 1.0) / half_levels
            };
        }

        Some((min.min(0.0), max.max(0.0)))
    }
}

impl Default for QuantizerSettings {
    fn default() -> Self {
        Self::new(8, false, false)
    }
}

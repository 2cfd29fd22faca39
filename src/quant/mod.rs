//! Quantization: fake quantization and range-tracking quantizers for QAT
//!
//! - Fake quantization with nudged ranges and STE gradients
//! - Quantizer strategies that own how a layer's range trackers evolve

mod fake_quantize;
mod quantizers;

pub use fake_quantize::{
    fake_quantize, ste_backward, validate_bits, FakeQuantConfig, FakeQuantize, MAX_BITS, MIN_BITS,
    MIN_SCALE,
};
pub use quantizers::{
    AllValuesQuantizer, LastValueQuantizer, MovingAverageQuantizer, MovingAverageSettings,
    Quantizer, QuantizerConfig, QuantizerSettings, RangeVars, DEFAULT_EMA_DECAY, INITIAL_MAX,
    INITIAL_MIN,
};

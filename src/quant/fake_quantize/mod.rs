//! Fake Quantization for Quantization-Aware Training (QAT)
//!
//! Fake quantization simulates the effects of quantization during training:
//! - Forward: quantize → dequantize (simulates quantization noise)
//! - Backward: Straight-Through Estimator (STE) passes gradients unchanged
//!
//! The real range is nudged so 0.0 is exactly representable, which keeps
//! zero padding and ReLU outputs lossless after quantization.

mod config;
mod ops;
mod quantize;

#[cfg(test)]
mod tests;

pub use config::{validate_bits, FakeQuantConfig, MAX_BITS, MIN_BITS};
pub use ops::{fake_quantize, ste_backward};
pub use quantize::{FakeQuantize, MIN_SCALE};

//! Convenience functions for fake quantization operations.

use crate::error::Result;
use crate::Tensor;

use super::config::FakeQuantConfig;
use super::quantize::FakeQuantize;

/// Fake quantize `input` onto a `bits`-wide grid spanning `[min, max]`
pub fn fake_quantize(
    input: &Tensor,
    min: f32,
    max: f32,
    bits: usize,
    narrow_range: bool,
) -> Result<Tensor> {
    let config = FakeQuantConfig::new(bits, narrow_range)?;
    let fq = FakeQuantize::from_range(config, min, max)?;
    Ok(fq.forward(input))
}

/// Convenience function for STE backward pass
pub fn ste_backward(grad_output: &Tensor) -> Tensor {
    // STE: gradient passes through unchanged
    grad_output.clone()
}

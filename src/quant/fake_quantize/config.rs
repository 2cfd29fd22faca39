//! Fake quantization configuration types.

use crate::error::{QatError, Result};

/// Supported bit widths
pub const MIN_BITS: usize = 2;
pub const MAX_BITS: usize = 16;

/// Fake quantization configuration
///
/// The integer grid is always unsigned: `[qmin, qmax]` with `qmax = 2^bits - 1`.
/// Signed behavior comes from the real range the grid is mapped onto.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FakeQuantConfig {
    /// Number of bits for quantization (e.g., 4, 8)
    pub bits: usize,
    /// Drop the lowest level so the grid is symmetric around its midpoint
    pub narrow_range: bool,
    /// Quantization range: min value
    pub qmin: i32,
    /// Quantization range: max value
    pub qmax: i32,
}

impl FakeQuantConfig {
    /// Create fake quantization config
    ///
    /// # Arguments
    /// * `bits` - Number of bits in `MIN_BITS..=MAX_BITS` (8-bit: qmin=0, qmax=255)
    /// * `narrow_range` - Start the grid at 1 instead of 0 (8-bit: qmin=1)
    pub fn new(bits: usize, narrow_range: bool) -> Result<Self> {
        validate_bits(bits)?;
        Ok(Self::grid(bits, narrow_range))
    }

    /// 4-bit wide-range quantization
    pub fn q4() -> Self {
        Self::grid(4, false)
    }

    /// 8-bit wide-range quantization
    pub fn q8() -> Self {
        Self::grid(8, false)
    }

    /// Number of integer levels on the grid
    pub fn num_levels(&self) -> usize {
        (self.qmax - self.qmin + 1) as usize
    }

    // Callers guarantee `bits` is in MIN_BITS..=MAX_BITS
    fn grid(bits: usize, narrow_range: bool) -> Self {
        let qmax = (1 << bits) - 1; // 2^bits - 1
        let qmin = i32::from(narrow_range);
        Self {
            bits,
            narrow_range,
            qmin,
            qmax,
        }
    }
}

impl Default for FakeQuantConfig {
    fn default() -> Self {
        Self::q8()
    }
}

/// Check a bit width is supported
pub fn validate_bits(bits: usize) -> Result<()> {
    if !(MIN_BITS..=MAX_BITS).contains(&bits) {
        return Err(QatError::config(
            "num_bits",
            format!("must be in {MIN_BITS}..={MAX_BITS}, got {bits}"),
            "Use 8 bits for activations or 4 bits for aggressive compression",
        ));
    }
    Ok(())
}

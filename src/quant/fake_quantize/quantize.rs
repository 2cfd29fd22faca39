//! Fake quantization over a nudged real range with Straight-Through Estimator (STE).

use crate::error::{QatError, Result};
use crate::Tensor;

use super::config::FakeQuantConfig;

/// Smallest scale used when the real range collapses to a point
pub const MIN_SCALE: f32 = 1e-10;

/// Fake quantization operation bound to a real range
///
/// The range passed to [`FakeQuantize::from_range`] is nudged so that 0.0
/// lands exactly on an integer level.
#[derive(Clone, Debug)]
pub struct FakeQuantize {
    /// Quantization configuration
    pub config: FakeQuantConfig,
    /// Scale factor for quantization
    pub scale: f32,
    /// Integer level that represents 0.0
    pub zero_point: i32,
    /// Lower bound of the nudged range
    pub nudged_min: f32,
    /// Upper bound of the nudged range
    pub nudged_max: f32,
}

impl FakeQuantize {
    /// Bind a configuration to the real range `[min, max]`
    ///
    /// Fails with `InvalidRange` unless the bounds and the derived grid are
    /// all finite.
    ///
    /// scale = (max - min) / (qmax - qmin)
    /// zero_point = clamp(round(qmin - min / scale), qmin, qmax)
    pub fn from_range(config: FakeQuantConfig, min: f32, max: f32) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(QatError::InvalidRange { min, max });
        }

        let qmin = config.qmin as f32;
        let qmax = config.qmax as f32;

        let mut scale = (max - min) / (qmax - qmin);
        if !scale.is_finite() {
            // Range wider than f32 can span, or an empty grid
            return Err(QatError::InvalidRange { min, max });
        }
        if scale < MIN_SCALE {
            scale = MIN_SCALE;
        }

        let zero_point_from_min = qmin - min / scale;
        let zero_point = if zero_point_from_min < qmin {
            config.qmin
        } else if zero_point_from_min > qmax {
            config.qmax
        } else {
            zero_point_from_min.round() as i32
        };

        let nudged_min = (config.qmin - zero_point) as f32 * scale;
        let nudged_max = (config.qmax - zero_point) as f32 * scale;
        if !nudged_min.is_finite() || !nudged_max.is_finite() {
            return Err(QatError::InvalidRange { min, max });
        }

        Ok(Self {
            config,
            scale,
            zero_point,
            nudged_min,
            nudged_max,
        })
    }

    /// Forward pass: fake quantize (quantize → dequantize)
    ///
    /// Output = dequantize(quantize(input)); values stay in floating point.
    pub fn forward(&self, input: &Tensor) -> Tensor {
        let data = input.data().mapv(|x| self.fake_quantize_value(x));
        Tensor::new(data, input.requires_grad())
    }

    /// Backward pass: Straight-Through Estimator (STE)
    ///
    /// ∂L/∂x = ∂L/∂y (where y = fake_quantize(x))
    pub fn backward(&self, grad_output: &Tensor) -> Tensor {
        grad_output.clone()
    }

    /// Backward pass with gradient clipping (clamped STE)
    ///
    /// Zeroes gradients for inputs outside the nudged range.
    pub fn backward_clamped(&self, grad_output: &Tensor, input: &Tensor) -> Result<Tensor> {
        if grad_output.len() != input.len() {
            return Err(QatError::ShapeMismatch {
                expected: vec![input.len()],
                actual: vec![grad_output.len()],
            });
        }

        let data: Vec<f32> = grad_output
            .data()
            .iter()
            .zip(input.data().iter())
            .map(|(&grad, &x)| {
                if x < self.nudged_min || x > self.nudged_max {
                    0.0
                } else {
                    grad
                }
            })
            .collect();

        Ok(Tensor::from_vec(data, grad_output.requires_grad()))
    }

    /// Fake quantize a single value
    fn fake_quantize_value(&self, x: f32) -> f32 {
        let clamped = x.clamp(self.nudged_min, self.nudged_max);
        let level = ((clamped - self.nudged_min) / self.scale + 0.5).floor();
        level * self.scale + self.nudged_min
    }

    /// Get the quantization scale
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Get the zero point
    pub fn zero_point(&self) -> i32 {
        self.zero_point
    }

    /// Get number of quantization levels
    pub fn num_levels(&self) -> usize {
        self.config.num_levels()
    }
}

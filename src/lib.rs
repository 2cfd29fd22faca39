//! # entrenar-qat
//!
//! Quantization-aware training (QAT) building blocks: a layer that emulates
//! reduced-precision tensors during training so a model learns to tolerate
//! post-training quantization.
//!
//! ```
//! use entrenar_qat::layer::{Layer, QuantizeLayer};
//! use entrenar_qat::quant::MovingAverageQuantizer;
//! use entrenar_qat::{Context, Tensor};
//!
//! let mut layer =
//!     QuantizeLayer::with_quantizer("act", MovingAverageQuantizer::new(8, false, false))?;
//! let ctx = Context::new();
//!
//! let input = Tensor::from_vec(vec![-0.5, 0.25, 1.0], false);
//! let output = layer.forward(&input, None, &ctx)?;
//! assert_eq!(output.len(), 3);
//! assert_eq!(layer.optimizer_step(), Some(0));
//! # Ok::<(), entrenar_qat::QatError>(())
//! ```

pub mod autograd;
pub mod error;
pub mod layer;
pub mod quant;

pub use autograd::{Context, Tensor};
pub use error::{QatError, Result};

//! Layers for quantization-aware training
//!
//! `QuantizeLayer` adapts a pluggable [`Quantizer`](crate::quant::Quantizer)
//! to the [`Layer`] contract: it builds the quantizer's state, routes each
//! call to training or inference behavior, and round-trips its
//! configuration and weights through serde.

mod config;
mod quantize_layer;
mod traits;
mod weights;


pub use config::{QuantizeLayerConfig, DEFAULT_LAYER_NAME};
pub use quantize_layer::{QuantizeLayer, INITIAL_STEP};
pub use traits::Layer;
pub use weights::{Weight, WeightValue};

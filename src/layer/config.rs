//! Quantize layer configuration.

use serde::{Deserialize, Serialize};

use crate::quant::QuantizerConfig;

/// Name given to quantize layers when none is supplied
pub const DEFAULT_LAYER_NAME: &str = "quantize_layer";

fn default_name() -> String {
    DEFAULT_LAYER_NAME.to_string()
}

fn default_trainable() -> bool {
    true
}

/// Serializable description of a [`QuantizeLayer`](super::QuantizeLayer)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuantizeLayerConfig {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_trainable")]
    pub trainable: bool,

    /// Quantizer to wrap; a layer cannot be restored without one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantizer: Option<QuantizerConfig>,
}

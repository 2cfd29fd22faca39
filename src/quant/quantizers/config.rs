//! Serializable quantizer descriptions.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::all_values::AllValuesQuantizer;
use super::last_value::LastValueQuantizer;
use super::moving_average::{MovingAverageQuantizer, MovingAverageSettings};
use super::settings::QuantizerSettings;
use super::traits::Quantizer;
use crate::error::Result;

/// Quantizer description in `{"class_name": ..., "config": {...}}` form
///
/// Unknown class names fail to deserialize.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "class_name", content = "config")]
pub enum QuantizerConfig {
    LastValueQuantizer(QuantizerSettings),
    MovingAverageQuantizer(MovingAverageSettings),
    AllValuesQuantizer(QuantizerSettings),
}

impl QuantizerConfig {
    /// Class name used in serialized form
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::LastValueQuantizer(_) => "LastValueQuantizer",
            Self::MovingAverageQuantizer(_) => "MovingAverageQuantizer",
            Self::AllValuesQuantizer(_) => "AllValuesQuantizer",
        }
    }

    /// Instantiate and validate the described quantizer
    pub fn into_quantizer(self) -> Result<Box<dyn Quantizer>> {
        let class_name = self.class_name();
        let quantizer: Box<dyn Quantizer> = match self {
            Self::LastValueQuantizer(settings) => {
                Box::new(LastValueQuantizer::from_settings(settings))
            }
            Self::MovingAverageQuantizer(settings) => {
                Box::new(MovingAverageQuantizer::from_settings(settings))
            }
            Self::AllValuesQuantizer(settings) => {
                Box::new(AllValuesQuantizer::from_settings(settings))
            }
        };

        if let Err(err) = quantizer.validate() {
            warn!(class_name, error = %err, "rejected quantizer config");
            return Err(err);
        }
        Ok(quantizer)
    }
}

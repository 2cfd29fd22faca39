//! Range-tracking quantizer strategies
//!
//! A quantizer owns no state of its own. It creates `min_var` / `max_var`
//! trackers for the layer that hosts it and, on each call, decides how the
//! trackers move (training) and fake-quantizes with them:
//! - `LastValueQuantizer`: range of the latest batch
//! - `MovingAverageQuantizer`: EMA of batch ranges
//! - `AllValuesQuantizer`: running min / max over all batches

mod all_values;
mod config;
mod last_value;
mod moving_average;
mod settings;
mod traits;
mod vars;


pub use all_values::AllValuesQuantizer;
pub use config::QuantizerConfig;
pub use last_value::LastValueQuantizer;
pub use moving_average::{MovingAverageQuantizer, MovingAverageSettings, DEFAULT_EMA_DECAY};
pub use settings::QuantizerSettings;
pub use traits::Quantizer;
pub use vars::{RangeVars, INITIAL_MAX, INITIAL_MIN};

//! Serializable weight snapshots

use serde::{Deserialize, Serialize};

/// Value of a single weight
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WeightValue {
    Int(i64),
    Float(f32),
}

/// Named weight value as stored in checkpoints
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Weight {
    pub name: String,
    pub value: WeightValue,
    #[serde(default)]
    pub trainable: bool,
}

impl Weight {
    pub fn float(name: impl Into<String>, value: f32, trainable: bool) -> Self {
        Self {
            name: name.into(),
            value: WeightValue::Float(value),
            trainable,
        }
    }

    pub fn int(name: impl Into<String>, value: i64, trainable: bool) -> Self {
        Self {
            name: name.into(),
            value: WeightValue::Int(value),
            trainable,
        }
    }

    /// Float view; integral values written without a fraction are accepted
    pub fn as_f32(&self) -> Option<f32> {
        match self.value {
            WeightValue::Float(v) => Some(v),
            WeightValue::Int(v) => Some(v as f32),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.value {
            WeightValue::Int(v) => Some(v),
            WeightValue::Float(_) => None,
        }
    }
}

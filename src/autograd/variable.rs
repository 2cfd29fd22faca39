//! Named state owned by a layer

/// A named scalar variable held by a layer
///
/// Non-trainable variables are updated by layer logic rather than by an
/// optimizer step.
#[derive(Clone, Debug, PartialEq)]
pub struct Variable<T> {
    name: String,
    value: T,
    trainable: bool,
}

impl<T: Copy> Variable<T> {
    /// Create a variable the optimizer must not touch
    pub fn non_trainable(name: impl Into<String>, value: T) -> Self {
        Self {
            name: name.into(),
            value,
            trainable: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> T {
        self.value
    }

    pub fn assign(&mut self, value: T) {
        self.value = value;
    }

    pub fn trainable(&self) -> bool {
        self.trainable
    }
}

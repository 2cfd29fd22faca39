//! Execution context carrying the ambient learning phase
//!
//! Layers that behave differently during training and inference consult the
//! context when the caller does not pass an explicit `training` flag.

/// Learning phase shared by every layer invoked with the same context
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Context {
    training: bool,
}

impl Context {
    /// Create a new context in training mode
    pub fn new() -> Self {
        Self { training: true }
    }

    /// Create a context in inference mode
    pub fn inference() -> Self {
        Self { training: false }
    }

    /// Set training mode
    pub fn train(&mut self) {
        self.training = true;
    }

    /// Set evaluation mode
    pub fn eval(&mut self) {
        self.training = false;
    }

    /// Check if in training mode
    pub fn is_training(&self) -> bool {
        self.training
    }

    /// Resolve an optional per-call flag against the ambient phase
    pub fn resolve_training(&self, training: Option<bool>) -> bool {
        training.unwrap_or(self.training)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

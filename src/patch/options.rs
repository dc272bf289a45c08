//! Batch application options.

/// Options for applying many patches at once.
#[derive(Debug, Clone)]
pub struct ApplyOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Whether to use parallel processing
    pub parallel: bool,
}

impl ApplyOptions {
    /// Create new apply options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip patches that fail to apply).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            parallel: true,
        }
    }
}

/// Error handling mode for batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail the whole batch on the first error
    #[default]
    Strict,
    /// Record the failure and continue with the other patches
    Lenient,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_options_builder() {
        let options = ApplyOptions::new().lenient().sequential();

        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert!(!options.parallel);
    }

    #[test]
    fn test_default_options() {
        let options = ApplyOptions::default();
        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert!(options.parallel);
    }
}

//! Rendering options and configuration.

/// Options for rendering document previews.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Append the numbered comment list
    pub with_comments: bool,

    /// Append the description
    pub with_description: bool,

    /// Show each part's content type before its text
    pub show_types: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the comment list.
    pub fn with_comments(mut self, enabled: bool) -> Self {
        self.with_comments = enabled;
        self
    }

    /// Enable or disable the description.
    pub fn with_description(mut self, enabled: bool) -> Self {
        self.with_description = enabled;
        self
    }

    /// Enable or disable content type labels.
    pub fn with_types(mut self, enabled: bool) -> Self {
        self.show_types = enabled;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            with_comments: true,
            with_description: false,
            show_types: false,
        }
    }
}

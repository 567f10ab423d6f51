//! Document configuration.

/// Default tab stop width used by display-column queries.
pub const DEFAULT_TAB_WIDTH: usize = 4;

/// Tunables for a [`Document`](crate::Document).
///
/// ```rust
/// use piece_document::DocumentConfig;
///
/// let config = DocumentConfig::default()
///     .with_history_limit(Some(500))
///     .with_tab_width(8);
/// assert_eq!(config.history_limit, Some(500));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentConfig {
    /// Maximum number of undoable edits kept. `None` keeps every edit.
    pub history_limit: Option<usize>,
    /// Tab stop width in cells.
    pub tab_width: usize,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            history_limit: None,
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }
}

impl DocumentConfig {
    /// Set the undo depth limit.
    pub fn with_history_limit(mut self, limit: Option<usize>) -> Self {
        self.history_limit = limit;
        self
    }

    /// Set the tab stop width (values below 1 are treated as 1).
    pub fn with_tab_width(mut self, tab_width: usize) -> Self {
        self.tab_width = tab_width.max(1);
        self
    }
}

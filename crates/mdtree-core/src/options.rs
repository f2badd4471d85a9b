//! Configuration options for Markdown serialization

/// Options for Markdown serialization
#[derive(Debug, Clone)]
pub struct Options {
    /// Fence string for code blocks
    pub fence: String,

    /// Emphasis delimiter
    pub em_delimiter: char,

    /// Strong delimiter
    pub strong_delimiter: String,

    /// Written once per enumeration indent level
    pub indent: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            fence: "```".to_string(),
            em_delimiter: '*',
            strong_delimiter: "**".to_string(),
            indent: "    ".to_string(),
        }
    }
}

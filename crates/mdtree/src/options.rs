/// Options for the Markdown lexer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerOptions {
    /// Characters accepted as unordered list bullets
    pub bullets: Vec<char>,

    /// Leading columns per list indentation level
    pub indent_width: usize,

    /// Columns a tab counts for when measuring indentation
    pub tab_width: usize,

    /// Line that opens and closes a code block
    pub fence: String,
}

impl LexerOptions {
    pub fn is_bullet(&self, c: char) -> bool {
        self.bullets.contains(&c)
    }

    /// Indentation level of a run of leading spaces and tabs
    pub fn indent_level(&self, whitespace: &str) -> usize {
        let columns: usize = whitespace
            .chars()
            .map(|c| if c == '\t' { self.tab_width } else { 1 })
            .sum();
        columns / self.indent_width.max(1)
    }
}

impl Default for LexerOptions {
    fn default() -> Self {
        Self {
            bullets: vec!['*', '-', '+'],
            indent_width: 4,
            tab_width: 4,
            fence: "```".to_string(),
        }
    }
}

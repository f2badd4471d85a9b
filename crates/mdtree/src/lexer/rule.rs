//! Rule and Filter types for tokenizing.

use crate::options::LexerOptions;
use crate::token::Token;

/// Type alias for scan functions
pub type ScanFn = Box<dyn Fn(&Cursor<'_>, &LexerOptions) -> Option<Lexeme> + Send + Sync>;

/// Read-only view of the lexer position handed to rules
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    pub(crate) input: &'a str,
    pub(crate) pos: usize,
    pub(crate) line: usize,
    pub(crate) at_line_start: bool,
    pub(crate) in_quote: bool,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            at_line_start: true,
            in_quote: false,
        }
    }

    /// The whole input
    pub fn input(&self) -> &'a str {
        self.input
    }

    /// Byte offset into the input
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Unconsumed input
    pub fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// One-based physical line number
    pub fn line(&self) -> usize {
        self.line
    }

    /// Nothing but indentation has been consumed on this line
    pub fn at_line_start(&self) -> bool {
        self.at_line_start
    }

    /// The current line started with a blockquote marker
    pub fn in_quote(&self) -> bool {
        self.in_quote
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }
}

/// How the engine folds a lexeme into its carried line state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Flush pending text, then append the lexeme's tokens
    Emit,
    /// Append the consumed text to the pending text run
    Literal,
    /// Consume without output
    Skip,
    /// A single line terminator, folded into a space when the next line
    /// continues inline content
    SoftBreak,
    /// A blank line, closing the current paragraph
    ParagraphBreak,
    /// A blockquote marker; the rest of the line is lexed as a new block
    Quote,
}

/// The outcome of a successful scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    /// Bytes consumed from the cursor position
    pub len: usize,
    pub tokens: Vec<Token>,
    pub effect: Effect,
}

impl Lexeme {
    pub fn emit(len: usize, tokens: Vec<Token>) -> Self {
        Self {
            len,
            tokens,
            effect: Effect::Emit,
        }
    }

    pub fn literal(len: usize) -> Self {
        Self {
            len,
            tokens: Vec::new(),
            effect: Effect::Literal,
        }
    }

    pub fn skip(len: usize) -> Self {
        Self {
            len,
            tokens: Vec::new(),
            effect: Effect::Skip,
        }
    }

    pub fn soft_break(len: usize) -> Self {
        Self {
            len,
            tokens: Vec::new(),
            effect: Effect::SoftBreak,
        }
    }

    pub fn paragraph_break(len: usize) -> Self {
        Self {
            len,
            tokens: Vec::new(),
            effect: Effect::ParagraphBreak,
        }
    }

    pub fn quote(len: usize, tokens: Vec<Token>) -> Self {
        Self {
            len,
            tokens,
            effect: Effect::Quote,
        }
    }
}

/// A filter determines at which positions a rule is tried
pub enum Filter {
    /// Any position
    Anywhere,
    /// Start of a physical line, outside a blockquote
    LineStart,
    /// Start of a line, including directly after a blockquote marker
    BlockStart,
    /// Match using a predicate function
    Predicate(Box<dyn Fn(&Cursor<'_>, &LexerOptions) -> bool + Send + Sync>),
}

impl Filter {
    /// Create a filter with a predicate
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Cursor<'_>, &LexerOptions) -> bool + Send + Sync + 'static,
    {
        Filter::Predicate(Box::new(f))
    }

    /// Check if this filter accepts the cursor position
    pub fn matches(&self, cursor: &Cursor<'_>, options: &LexerOptions) -> bool {
        match self {
            Filter::Anywhere => true,
            Filter::LineStart => cursor.at_line_start && !cursor.in_quote,
            Filter::BlockStart => cursor.at_line_start,
            Filter::Predicate(f) => f(cursor, options),
        }
    }

    /// Rules behind an anchored filter start a new block, so a pending soft
    /// break is dropped instead of becoming a space
    pub fn is_line_anchored(&self) -> bool {
        matches!(self, Filter::LineStart | Filter::BlockStart)
    }
}

/// A rule turns upcoming input into tokens
pub struct Rule {
    /// Filter to determine where this rule applies
    pub filter: Filter,
    /// Scan function that recognizes input at the cursor
    pub scan: ScanFn,
}

impl Rule {
    /// Create a new rule
    pub fn new<F>(filter: Filter, scan: F) -> Self
    where
        F: Fn(&Cursor<'_>, &LexerOptions) -> Option<Lexeme> + Send + Sync + 'static,
    {
        Self {
            filter,
            scan: Box::new(scan),
        }
    }

    /// Create a rule tried at every position
    pub fn anywhere<F>(scan: F) -> Self
    where
        F: Fn(&Cursor<'_>, &LexerOptions) -> Option<Lexeme> + Send + Sync + 'static,
    {
        Self::new(Filter::Anywhere, scan)
    }

    /// Create a rule tried only at the start of a line outside blockquotes
    pub fn at_line_start<F>(scan: F) -> Self
    where
        F: Fn(&Cursor<'_>, &LexerOptions) -> Option<Lexeme> + Send + Sync + 'static,
    {
        Self::new(Filter::LineStart, scan)
    }

    /// Create a rule tried at the start of a line or of a quoted line
    pub fn at_block_start<F>(scan: F) -> Self
    where
        F: Fn(&Cursor<'_>, &LexerOptions) -> Option<Lexeme> + Send + Sync + 'static,
    {
        Self::new(Filter::BlockStart, scan)
    }

    /// Apply this rule at `cursor`
    pub fn scan(&self, cursor: &Cursor<'_>, options: &LexerOptions) -> Option<Lexeme> {
        if !self.filter.matches(cursor, options) {
            return None;
        }
        (self.scan)(cursor, options)
    }
}

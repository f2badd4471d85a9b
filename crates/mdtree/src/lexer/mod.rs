//! Rule-driven tokenizer.

mod markdown;
mod rule;

pub use markdown::markdown_rules;
pub use rule::{Cursor, Effect, Filter, Lexeme, Rule, ScanFn};

use tracing::{debug, trace};

use crate::options::LexerOptions;
use crate::rules::Rules;
use crate::token::Token;
use crate::utilities::count_terminators;
use crate::{MdTreeError, Result};

/// Key reported for input no rule recognized
const FALLBACK: &str = "<fallback>";

/// Tokenizer driven by an ordered rule collection
pub struct Lexer {
    options: LexerOptions,
    rules: Rules<Rule>,
}

impl Lexer {
    /// Create a lexer with default options and the Markdown rules
    pub fn new() -> Self {
        Self::with_options(LexerOptions::default())
    }

    /// Create a lexer with custom options
    pub fn with_options(options: LexerOptions) -> Self {
        Self {
            options,
            rules: Rules::new(markdown_rules()),
        }
    }

    /// Convert `input` into tokens.
    ///
    /// Malformed markup never fails; it degrades to text. An error means a
    /// rule produced an impossible lexeme.
    pub fn lex(&self, input: &str) -> Result<Vec<Token>> {
        let mut cursor = Cursor::new(input);
        let mut state = LexState::default();

        while !cursor.is_at_end() {
            let (key, anchored, lexeme) = self.next_lexeme(&cursor);
            let end = end_of(&cursor, key, &lexeme)?;
            let consumed = &input[cursor.pos..end];

            trace!(
                rule = key,
                offset = cursor.pos,
                line = cursor.line,
                len = lexeme.len,
                "lexeme"
            );

            let effect = lexeme.effect;
            state.apply(lexeme, consumed, anchored);

            cursor.line += count_terminators(consumed);
            match effect {
                Effect::SoftBreak | Effect::ParagraphBreak => {
                    cursor.at_line_start = true;
                    cursor.in_quote = false;
                }
                Effect::Quote => {
                    cursor.at_line_start = true;
                    cursor.in_quote = true;
                }
                Effect::Skip => {}
                Effect::Emit | Effect::Literal => cursor.at_line_start = false,
            }
            cursor.pos = end;
        }

        let tokens = state.finish();
        debug!(
            bytes = input.len(),
            lines = cursor.line,
            tokens = tokens.len(),
            "lexed input"
        );
        Ok(tokens)
    }

    /// Add a custom rule, tried before the built-in rules
    pub fn add_rule(&mut self, key: &str, rule: Rule) -> &mut Self {
        self.rules.add(key, rule);
        self
    }

    /// Apply a plugin
    pub fn use_plugin<F>(&mut self, plugin: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        plugin(self);
        self
    }

    pub fn rules(&self) -> &Rules<Rule> {
        &self.rules
    }

    /// Reorder, replace or remove rules by key
    pub fn rules_mut(&mut self) -> &mut Rules<Rule> {
        &mut self.rules
    }

    /// Get the current options
    pub fn options(&self) -> &LexerOptions {
        &self.options
    }

    /// Get mutable access to options
    pub fn options_mut(&mut self) -> &mut LexerOptions {
        &mut self.options
    }

    fn next_lexeme<'r>(&'r self, cursor: &Cursor<'_>) -> (&'r str, bool, Lexeme) {
        for (key, rule) in self.rules.iter() {
            if let Some(lexeme) = rule.scan(cursor, &self.options) {
                return (key, rule.filter.is_line_anchored(), lexeme);
            }
        }

        let len = cursor.rest().chars().next().map_or(1, char::len_utf8);
        (FALLBACK, false, Lexeme::literal(len))
    }
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate a lexeme against the input and return its end offset
fn end_of(cursor: &Cursor<'_>, key: &str, lexeme: &Lexeme) -> Result<usize> {
    let failure = |reason: String| {
        debug!(rule = key, offset = cursor.pos, %reason, "lex failure");
        Err(MdTreeError::LexFailure {
            offset: cursor.pos,
            reason,
        })
    };

    if lexeme.len == 0 {
        return failure(format!("rule `{key}` matched without consuming input"));
    }
    let end = cursor.pos.saturating_add(lexeme.len);
    if end > cursor.input.len() {
        return failure(format!(
            "rule `{key}` consumed {} bytes with only {} left",
            lexeme.len,
            cursor.rest().len()
        ));
    }
    if !cursor.input.is_char_boundary(end) {
        return failure(format!("rule `{key}` ended inside a UTF-8 character"));
    }
    Ok(end)
}

/// Tokens produced so far plus the text run and line break not yet settled
#[derive(Default)]
struct LexState {
    tokens: Vec<Token>,
    run: String,
    soft_break: bool,
}

impl LexState {
    fn apply(&mut self, lexeme: Lexeme, consumed: &str, anchored: bool) {
        match lexeme.effect {
            Effect::Emit => {
                self.resolve_soft_break(anchored);
                self.flush(anchored);
                self.tokens.extend(lexeme.tokens);
            }
            Effect::Literal => {
                self.resolve_soft_break(false);
                self.run.push_str(consumed);
            }
            Effect::Skip => {}
            Effect::SoftBreak => {
                self.trim_run();
                self.soft_break = true;
            }
            Effect::ParagraphBreak => {
                self.soft_break = false;
                self.flush(true);
                if !matches!(self.tokens.last(), None | Some(Token::LineBreak)) {
                    self.tokens.push(Token::LineBreak);
                }
            }
            Effect::Quote => {
                self.soft_break = false;
                self.flush(true);
                self.tokens.extend(lexeme.tokens);
            }
        }
    }

    /// Turn a pending line break into a space, unless the next line opens a
    /// block of its own
    fn resolve_soft_break(&mut self, anchored: bool) {
        if !std::mem::take(&mut self.soft_break) || anchored {
            return;
        }
        if !self.run.is_empty() {
            self.run.push(' ');
        } else if self
            .tokens
            .last()
            .is_some_and(|last| last.ends_span() || matches!(last, Token::Text(_)))
        {
            self.tokens.push(Token::text(" "));
        }
    }

    fn trim_run(&mut self) {
        let len = self.run.trim_end_matches([' ', '\t']).len();
        self.run.truncate(len);
    }

    fn flush(&mut self, trim: bool) {
        if trim {
            self.trim_run();
        }
        if !self.run.is_empty() {
            self.tokens.push(Token::Text(std::mem::take(&mut self.run)));
        }
    }

    fn finish(mut self) -> Vec<Token> {
        self.flush(true);
        while matches!(self.tokens.last(), Some(Token::LineBreak)) {
            self.tokens.pop();
        }
        self.tokens
    }
}

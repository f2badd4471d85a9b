//! # mdtree
//!
//! Turn Markdown text into an immutable document tree.
//!
//! The pipeline has two rule-driven stages. A [`Lexer`] walks the input with
//! an ordered set of lexical rules and produces a flat [`Token`] sequence. A
//! [`Parser`] walks that sequence with an ordered set of structural rules and
//! links the resulting blocks into a chain. Both stages accept custom rules,
//! which are consulted before the built-in Markdown rules.
//!
//! ## Example
//!
//! ```rust
//! use mdtree::{lex, parse, BlockKind, Token};
//!
//! let tokens = lex("# Title 1").unwrap();
//! assert_eq!(tokens, vec![Token::TitleLevel, Token::title("Title 1")]);
//!
//! let document = parse(&tokens).unwrap().unwrap();
//! match document.kind() {
//!     BlockKind::Title(title) => assert_eq!(title.text(), "Title 1"),
//!     other => panic!("unexpected block {other:?}"),
//! }
//! assert!(document.next().is_none());
//! ```
//!
//! ## Custom rules
//!
//! ```rust
//! use mdtree::lexer::{Lexeme, Rule};
//! use mdtree::{Lexer, Token};
//!
//! let mut lexer = Lexer::new();
//! lexer.add_rule(
//!     "ellipsis",
//!     Rule::anywhere(|cursor, _| {
//!         cursor
//!             .rest()
//!             .starts_with("...")
//!             .then(|| Lexeme::literal(3))
//!     }),
//! );
//! assert_eq!(lexer.lex("wait...").unwrap(), vec![Token::text("wait...")]);
//! ```

pub mod lexer;
mod options;
pub mod parser;
mod rules;
mod token;
mod utilities;

pub use lexer::Lexer;
pub use options::LexerOptions;
pub use parser::Parser;
pub use rules::Rules;
pub use token::Token;

pub use mdtree_core::*;

use once_cell::sync::Lazy;

static DEFAULT_LEXER: Lazy<Lexer> = Lazy::new(Lexer::new);
static DEFAULT_PARSER: Lazy<Parser> = Lazy::new(Parser::new);

/// Error type for lexing and tree building
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MdTreeError {
    #[error("Lex failure at byte {offset}: {reason}")]
    LexFailure { offset: usize, reason: String },

    #[error("Parse failure at token {position}: {reason}")]
    ParseFailure { position: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, MdTreeError>;

/// Tokenize `input` with the default Markdown rules
pub fn lex(input: &str) -> Result<Vec<Token>> {
    DEFAULT_LEXER.lex(input)
}

/// Build a document from `tokens` with the default Markdown rules.
///
/// `Ok(None)` means the sequence held no blocks at all.
pub fn parse(tokens: &[Token]) -> Result<Option<Block>> {
    DEFAULT_PARSER.parse(tokens)
}

/// Lex and parse `input` in one step
pub fn parse_markdown(input: &str) -> Result<Option<Block>> {
    parse(&lex(input)?)
}

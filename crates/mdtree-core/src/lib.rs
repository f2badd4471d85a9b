//! mdtree-core - Markdown document tree, visitors and serialization
//!
//! This crate holds the data structures every consumer of a parsed document
//! depends on. The `mdtree` crate builds these trees from text; renderers only
//! need this crate and the visitor traits in [`visit`].
//!
//! # Architecture
//!
//! ```text
//! Markdown text ──lex──▶ tokens ──parse──▶ ┌───────────────┐
//!                                          │ Block ─▶ Block│ ──visit──▶ renderer
//!                                          │   └ inlines   │
//!                                          └───────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use mdtree_core::{serialize, Block, Inline, Options, TextParagraph, Title};
//!
//! let document = Block::new(Title::new("Hello World", 1)).with_next(Block::new(
//!     TextParagraph::new(vec![
//!         Inline::clean_text("This is "),
//!         Inline::strong("bold"),
//!         Inline::clean_text(" text."),
//!     ]),
//! ));
//!
//! let markdown = serialize(&document, &Options::default());
//! assert_eq!(markdown, "# Hello World\n\nThis is **bold** text.");
//! ```

mod ast;
mod options;
mod serialize;
pub mod visit;

pub use ast::{
    Block, BlockKind, Blockquote, Chain, CodeBlock, Enumeration, EnumerationItem, Hyperlink, Image,
    Inline, NonEmptyText, TextParagraph, Title, UnorderedEnumeration, UnorderedEnumerationItem,
};
pub use options::Options;
pub use serialize::serialize;
pub use visit::{accept_inlines, walk, BlockVisitor, InlineVisitor};

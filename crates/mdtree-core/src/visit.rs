//! Double-dispatch traversal
//!
//! Renderers implement [`BlockVisitor`] and [`InlineVisitor`]. A block's
//! visitor method is responsible for handing the block's inline children to
//! an inline visitor, usually through [`accept_inlines`].

use crate::ast::{
    Block, BlockKind, Blockquote, CodeBlock, Enumeration, Hyperlink, Image, Inline, TextParagraph,
    Title, UnorderedEnumeration,
};

/// Receives one call per block variant
pub trait BlockVisitor {
    fn visit_title(&mut self, title: &Title);
    fn visit_text_paragraph(&mut self, paragraph: &TextParagraph);
    fn visit_enumeration(&mut self, enumeration: &Enumeration);
    fn visit_unordered_enumeration(&mut self, enumeration: &UnorderedEnumeration);
    fn visit_code_block(&mut self, code_block: &CodeBlock);
    fn visit_blockquote(&mut self, blockquote: &Blockquote);
}

/// Receives one call per inline variant
pub trait InlineVisitor {
    fn visit_clean_text(&mut self, text: &str);
    fn visit_emphasis(&mut self, text: &str);
    fn visit_strong(&mut self, text: &str);
    fn visit_code(&mut self, text: &str);
    fn visit_hyperlink(&mut self, hyperlink: &Hyperlink);
    fn visit_image(&mut self, image: &Image);
}

impl BlockKind {
    pub fn accept<V: BlockVisitor + ?Sized>(&self, visitor: &mut V) {
        match self {
            BlockKind::Title(title) => visitor.visit_title(title),
            BlockKind::TextParagraph(paragraph) => visitor.visit_text_paragraph(paragraph),
            BlockKind::Enumeration(enumeration) => visitor.visit_enumeration(enumeration),
            BlockKind::UnorderedEnumeration(enumeration) => {
                visitor.visit_unordered_enumeration(enumeration)
            }
            BlockKind::CodeBlock(code_block) => visitor.visit_code_block(code_block),
            BlockKind::Blockquote(blockquote) => visitor.visit_blockquote(blockquote),
        }
    }
}

impl Block {
    /// Dispatch this block (not its successors) to `visitor`
    pub fn accept<V: BlockVisitor + ?Sized>(&self, visitor: &mut V) {
        self.kind().accept(visitor);
    }
}

impl Inline {
    pub fn accept<V: InlineVisitor + ?Sized>(&self, visitor: &mut V) {
        match self {
            Inline::CleanText(text) => visitor.visit_clean_text(text),
            Inline::Emphasis(text) => visitor.visit_emphasis(text),
            Inline::Strong(text) => visitor.visit_strong(text),
            Inline::Code(text) => visitor.visit_code(text),
            Inline::Hyperlink(hyperlink) => visitor.visit_hyperlink(hyperlink),
            Inline::Image(image) => visitor.visit_image(image),
        }
    }
}

/// Dispatch each inline in order
pub fn accept_inlines<V: InlineVisitor + ?Sized>(inlines: &[Inline], visitor: &mut V) {
    for inline in inlines {
        inline.accept(visitor);
    }
}

/// Walk a whole document, following `next` links from the head.
///
/// An absent document visits nothing.
pub fn walk<V: BlockVisitor + ?Sized>(document: Option<&Block>, visitor: &mut V) {
    for block in document.into_iter().flat_map(Block::iter) {
        block.accept(visitor);
    }
}

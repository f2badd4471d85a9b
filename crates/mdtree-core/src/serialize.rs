//! Markdown serialization
//!
//! Writes a document tree back to Markdown text. The writer is an ordinary
//! [`BlockVisitor`]/[`InlineVisitor`] pair, so it doubles as the reference
//! renderer for the visitation contract.

use crate::ast::{
    Block, BlockKind, Blockquote, CodeBlock, Enumeration, Hyperlink, Image, Inline, TextParagraph,
    Title, UnorderedEnumeration,
};
use crate::options::Options;
use crate::visit::{accept_inlines, BlockVisitor, InlineVisitor};

/// Serialize a document chain to a Markdown string
pub fn serialize(document: &Block, options: &Options) -> String {
    let mut writer = MarkdownWriter::new(options);
    let mut previous: Option<&BlockKind> = None;

    for block in document.iter() {
        if let Some(previous) = previous {
            writer.separate(previous, block.kind());
        }
        block.accept(&mut writer);
        previous = Some(block.kind());
    }

    writer.out
}

struct MarkdownWriter<'a> {
    options: &'a Options,
    out: String,
}

impl<'a> MarkdownWriter<'a> {
    fn new(options: &'a Options) -> Self {
        Self {
            options,
            out: String::with_capacity(1024),
        }
    }

    /// Consecutive quote lines stay one paragraph apart from each other only
    /// by a single newline; everything else is separated by a blank line.
    fn separate(&mut self, previous: &BlockKind, current: &BlockKind) {
        match (previous, current) {
            (BlockKind::Blockquote(_), BlockKind::Blockquote(_)) => self.out.push('\n'),
            _ => self.out.push_str("\n\n"),
        }
    }

    fn inlines(&mut self, inlines: &[Inline]) {
        accept_inlines(inlines, self);
    }

    fn indent(&mut self, level: usize) {
        for _ in 0..level {
            self.out.push_str(&self.options.indent);
        }
    }

    fn target(&mut self, target: &str, title: Option<&str>) {
        self.out.push('(');
        self.out.push_str(target);
        if let Some(title) = title {
            self.out.push_str(" \"");
            self.out.push_str(title);
            self.out.push('"');
        }
        self.out.push(')');
    }
}

impl BlockVisitor for MarkdownWriter<'_> {
    fn visit_title(&mut self, title: &Title) {
        for _ in 0..title.level() {
            self.out.push('#');
        }
        self.out.push(' ');
        self.out.push_str(title.text());
    }

    fn visit_text_paragraph(&mut self, paragraph: &TextParagraph) {
        self.inlines(paragraph.inlines());
    }

    fn visit_enumeration(&mut self, enumeration: &Enumeration) {
        for (i, item) in enumeration.items().iter().enumerate() {
            if i > 0 {
                self.out.push('\n');
            }
            self.indent(item.indent());
            self.out.push_str(&item.number().to_string());
            self.out.push_str(". ");
            self.inlines(item.inlines());
        }
    }

    fn visit_unordered_enumeration(&mut self, enumeration: &UnorderedEnumeration) {
        for (i, item) in enumeration.items().iter().enumerate() {
            if i > 0 {
                self.out.push('\n');
            }
            self.indent(item.indent());
            self.out.push(item.bullet());
            self.out.push(' ');
            self.inlines(item.inlines());
        }
    }

    fn visit_code_block(&mut self, code_block: &CodeBlock) {
        self.out.push_str(&self.options.fence);
        self.out.push_str(code_block.language().unwrap_or(""));
        self.out.push('\n');
        for line in code_block.lines() {
            self.out.push_str(line);
            self.out.push('\n');
        }
        self.out.push_str(&self.options.fence);
    }

    fn visit_blockquote(&mut self, blockquote: &Blockquote) {
        self.out.push('>');
        if !blockquote.inlines().is_empty() {
            self.out.push(' ');
            self.inlines(blockquote.inlines());
        }
    }
}

impl InlineVisitor for MarkdownWriter<'_> {
    fn visit_clean_text(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn visit_emphasis(&mut self, text: &str) {
        self.out.push(self.options.em_delimiter);
        self.out.push_str(text);
        self.out.push(self.options.em_delimiter);
    }

    fn visit_strong(&mut self, text: &str) {
        self.out.push_str(&self.options.strong_delimiter);
        self.out.push_str(text);
        self.out.push_str(&self.options.strong_delimiter);
    }

    fn visit_code(&mut self, text: &str) {
        let backticks = if text.contains('`') { "``" } else { "`" };
        self.out.push_str(backticks);
        self.out.push_str(text);
        self.out.push_str(backticks);
    }

    fn visit_hyperlink(&mut self, hyperlink: &Hyperlink) {
        self.out.push('[');
        self.out.push_str(hyperlink.text());
        self.out.push(']');
        self.target(hyperlink.href(), hyperlink.title());
    }

    fn visit_image(&mut self, image: &Image) {
        self.out.push_str("![");
        self.out.push_str(image.alt());
        self.out.push(']');
        self.target(image.src(), image.title());
    }
}

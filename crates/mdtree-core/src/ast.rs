//! Markdown document tree
//!
//! A document is a forward chain of [`Block`] nodes. Every node is an
//! immutable value: the `with_*` methods derive a new node and the tail of a
//! chain is shared through [`Arc`], so deriving never copies untouched
//! structure.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// A string that is guaranteed to be non-empty
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Wrap `text`, panicking if it is empty
    pub fn new(text: impl Into<String>) -> Self {
        match Self::try_new(text) {
            Some(text) => text,
            None => panic!("text must not be empty"),
        }
    }

    /// Wrap `text`, or `None` if it is empty
    pub fn try_new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.is_empty() {
            None
        } else {
            Some(Self(text))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for NonEmptyText {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An inline Markdown node
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Inline {
    /// Plain text
    CleanText(String),

    /// Emphasized text (`*text*` or `_text_`)
    Emphasis(NonEmptyText),

    /// Strong text (`**text**` or `__text__`)
    Strong(NonEmptyText),

    /// Inline code
    Code(NonEmptyText),

    /// Link with text, target, and optional title
    Hyperlink(Hyperlink),

    /// Image with alt text, source, and optional title
    Image(Image),
}

impl Inline {
    pub fn clean_text(text: impl Into<String>) -> Self {
        Inline::CleanText(text.into())
    }

    /// Panics if `text` is empty
    pub fn emphasis(text: impl Into<String>) -> Self {
        Inline::Emphasis(NonEmptyText::new(text))
    }

    /// Panics if `text` is empty
    pub fn strong(text: impl Into<String>) -> Self {
        Inline::Strong(NonEmptyText::new(text))
    }

    /// Panics if `text` is empty
    pub fn code(text: impl Into<String>) -> Self {
        Inline::Code(NonEmptyText::new(text))
    }

    /// Panics if `text` or `href` is empty
    pub fn hyperlink(text: impl Into<String>, href: impl Into<String>, title: Option<&str>) -> Self {
        Inline::Hyperlink(Hyperlink::new(text, href, title.map(str::to_string)))
    }

    /// Panics if `alt` or `src` is empty
    pub fn image(alt: impl Into<String>, src: impl Into<String>, title: Option<&str>) -> Self {
        Inline::Image(Image::new(alt, src, title.map(str::to_string)))
    }
}

/// `[text](href "title")`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hyperlink {
    text: NonEmptyText,
    href: NonEmptyText,
    title: Option<String>,
}

impl Hyperlink {
    /// Panics if `text` or `href` is empty
    pub fn new(text: impl Into<String>, href: impl Into<String>, title: Option<String>) -> Self {
        Self {
            text: NonEmptyText::new(text),
            href: NonEmptyText::new(href),
            title,
        }
    }

    pub fn try_new(
        text: impl Into<String>,
        href: impl Into<String>,
        title: Option<String>,
    ) -> Option<Self> {
        Some(Self {
            text: NonEmptyText::try_new(text)?,
            href: NonEmptyText::try_new(href)?,
            title,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn href(&self) -> &str {
        &self.href
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self::new(text, self.href.as_str(), self.title.clone())
    }

    pub fn with_href(&self, href: impl Into<String>) -> Self {
        Self::new(self.text.as_str(), href, self.title.clone())
    }

    pub fn with_title(&self, title: Option<String>) -> Self {
        Self {
            title,
            ..self.clone()
        }
    }
}

/// `![alt](src "title")`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Image {
    alt: NonEmptyText,
    src: NonEmptyText,
    title: Option<String>,
}

impl Image {
    /// Panics if `alt` or `src` is empty
    pub fn new(alt: impl Into<String>, src: impl Into<String>, title: Option<String>) -> Self {
        Self {
            alt: NonEmptyText::new(alt),
            src: NonEmptyText::new(src),
            title,
        }
    }

    pub fn try_new(
        alt: impl Into<String>,
        src: impl Into<String>,
        title: Option<String>,
    ) -> Option<Self> {
        Some(Self {
            alt: NonEmptyText::try_new(alt)?,
            src: NonEmptyText::try_new(src)?,
            title,
        })
    }

    pub fn alt(&self) -> &str {
        &self.alt
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn with_alt(&self, alt: impl Into<String>) -> Self {
        Self::new(alt, self.src.as_str(), self.title.clone())
    }

    pub fn with_src(&self, src: impl Into<String>) -> Self {
        Self::new(self.alt.as_str(), src, self.title.clone())
    }

    pub fn with_title(&self, title: Option<String>) -> Self {
        Self {
            title,
            ..self.clone()
        }
    }
}

/// ATX title: `## text`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Title {
    text: NonEmptyText,
    level: usize,
}

impl Title {
    /// Panics if `text` is empty or `level` is zero
    pub fn new(text: impl Into<String>, level: usize) -> Self {
        assert!(level >= 1, "title level must be at least 1");
        Self {
            text: NonEmptyText::new(text),
            level,
        }
    }

    pub fn try_new(text: impl Into<String>, level: usize) -> Option<Self> {
        if level == 0 {
            return None;
        }
        Some(Self {
            text: NonEmptyText::try_new(text)?,
            level,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self::new(text, self.level)
    }

    pub fn with_level(&self, level: usize) -> Self {
        Self::new(self.text.as_str(), level)
    }
}

/// A paragraph of inline content
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextParagraph {
    inlines: Vec<Inline>,
}

impl TextParagraph {
    pub fn new(inlines: Vec<Inline>) -> Self {
        Self { inlines }
    }

    pub fn inlines(&self) -> &[Inline] {
        &self.inlines
    }

    pub fn with_inlines(&self, inlines: Vec<Inline>) -> Self {
        Self::new(inlines)
    }
}

/// One `N. text` line of an ordered enumeration
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumerationItem {
    indent: usize,
    number: u64,
    inlines: Vec<Inline>,
}

impl EnumerationItem {
    pub fn new(indent: usize, number: u64, inlines: Vec<Inline>) -> Self {
        Self {
            indent,
            number,
            inlines,
        }
    }

    pub fn indent(&self) -> usize {
        self.indent
    }

    /// The number as written in the source. Items are never renumbered.
    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn inlines(&self) -> &[Inline] {
        &self.inlines
    }

    pub fn with_indent(&self, indent: usize) -> Self {
        Self {
            indent,
            ..self.clone()
        }
    }

    pub fn with_number(&self, number: u64) -> Self {
        Self {
            number,
            ..self.clone()
        }
    }

    pub fn with_inlines(&self, inlines: Vec<Inline>) -> Self {
        Self::new(self.indent, self.number, inlines)
    }
}

/// A run of ordered items
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Enumeration {
    items: Vec<EnumerationItem>,
}

impl Enumeration {
    /// Panics if `items` is empty
    pub fn new(items: Vec<EnumerationItem>) -> Self {
        assert!(!items.is_empty(), "an enumeration needs at least one item");
        Self { items }
    }

    pub fn try_new(items: Vec<EnumerationItem>) -> Option<Self> {
        (!items.is_empty()).then_some(Self { items })
    }

    pub fn items(&self) -> &[EnumerationItem] {
        &self.items
    }

    pub fn with_items(&self, items: Vec<EnumerationItem>) -> Self {
        Self::new(items)
    }
}

/// One `- text` line of an unordered enumeration
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnorderedEnumerationItem {
    indent: usize,
    bullet: char,
    inlines: Vec<Inline>,
}

impl UnorderedEnumerationItem {
    pub fn new(indent: usize, bullet: char, inlines: Vec<Inline>) -> Self {
        Self {
            indent,
            bullet,
            inlines,
        }
    }

    pub fn indent(&self) -> usize {
        self.indent
    }

    pub fn bullet(&self) -> char {
        self.bullet
    }

    pub fn inlines(&self) -> &[Inline] {
        &self.inlines
    }

    pub fn with_indent(&self, indent: usize) -> Self {
        Self {
            indent,
            ..self.clone()
        }
    }

    pub fn with_bullet(&self, bullet: char) -> Self {
        Self {
            bullet,
            ..self.clone()
        }
    }

    pub fn with_inlines(&self, inlines: Vec<Inline>) -> Self {
        Self::new(self.indent, self.bullet, inlines)
    }
}

/// A run of bulleted items
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnorderedEnumeration {
    items: Vec<UnorderedEnumerationItem>,
}

impl UnorderedEnumeration {
    /// Panics if `items` is empty
    pub fn new(items: Vec<UnorderedEnumerationItem>) -> Self {
        assert!(
            !items.is_empty(),
            "an unordered enumeration needs at least one item"
        );
        Self { items }
    }

    pub fn try_new(items: Vec<UnorderedEnumerationItem>) -> Option<Self> {
        (!items.is_empty()).then_some(Self { items })
    }

    pub fn items(&self) -> &[UnorderedEnumerationItem] {
        &self.items
    }

    pub fn with_items(&self, items: Vec<UnorderedEnumerationItem>) -> Self {
        Self::new(items)
    }
}

/// Fenced code block, lines kept verbatim
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CodeBlock {
    language: Option<String>,
    lines: Vec<String>,
}

impl CodeBlock {
    pub fn new(language: Option<String>, lines: Vec<String>) -> Self {
        Self { language, lines }
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn with_language(&self, language: Option<String>) -> Self {
        Self::new(language, self.lines.clone())
    }

    pub fn with_lines(&self, lines: Vec<String>) -> Self {
        Self::new(self.language.clone(), lines)
    }
}

/// One `> text` line
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Blockquote {
    inlines: Vec<Inline>,
}

impl Blockquote {
    pub fn new(inlines: Vec<Inline>) -> Self {
        Self { inlines }
    }

    pub fn inlines(&self) -> &[Inline] {
        &self.inlines
    }

    pub fn with_inlines(&self, inlines: Vec<Inline>) -> Self {
        Self::new(inlines)
    }
}

/// The payload of a [`Block`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Title(Title),
    TextParagraph(TextParagraph),
    Enumeration(Enumeration),
    UnorderedEnumeration(UnorderedEnumeration),
    CodeBlock(CodeBlock),
    Blockquote(Blockquote),
}

macro_rules! impl_from_for_block_kind {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for BlockKind {
                fn from(node: $variant) -> Self {
                    BlockKind::$variant(node)
                }
            }
        )*
    };
}

impl_from_for_block_kind!(
    Title,
    TextParagraph,
    Enumeration,
    UnorderedEnumeration,
    CodeBlock,
    Blockquote
);

/// A block-level node and the link to the block that follows it
///
/// Equality, hashing and dropping walk the chain iteratively, so documents
/// with many thousands of blocks are safe to compare and free.
#[derive(Clone)]
pub struct Block {
    kind: BlockKind,
    next: Option<Arc<Block>>,
}

impl Block {
    /// A single block with no successor
    pub fn new(kind: impl Into<BlockKind>) -> Self {
        Self {
            kind: kind.into(),
            next: None,
        }
    }

    /// Link `kinds` into a chain in iteration order; `None` if empty
    pub fn from_chain<I>(kinds: I) -> Option<Self>
    where
        I: IntoIterator<Item = BlockKind>,
        I::IntoIter: DoubleEndedIterator,
    {
        let mut head: Option<Block> = None;
        for kind in kinds.into_iter().rev() {
            head = Some(Block {
                kind,
                next: head.map(Arc::new),
            });
        }
        head
    }

    pub fn kind(&self) -> &BlockKind {
        &self.kind
    }

    pub fn next(&self) -> Option<&Block> {
        self.next.as_deref()
    }

    /// Derive a block with the same successor and a different payload
    pub fn with_kind(mut self, kind: impl Into<BlockKind>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Derive a block that continues with `next`
    pub fn with_next(mut self, next: Block) -> Self {
        self.next = Some(Arc::new(next));
        self
    }

    /// Derive a block that ends the chain
    pub fn without_next(mut self) -> Self {
        self.next = None;
        self
    }

    /// Iterate this block and every block after it
    pub fn iter(&self) -> Chain<'_> {
        Chain {
            current: Some(self),
        }
    }

    /// Number of blocks in the chain starting here
    pub fn chain_len(&self) -> usize {
        self.iter().count()
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.iter().map(|block| &block.kind))
            .finish()
    }
}

impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        let mut left = Some(self);
        let mut right = Some(other);
        loop {
            match (left, right) {
                (None, None) => return true,
                (Some(a), Some(b)) => {
                    if std::ptr::eq(a, b) {
                        return true;
                    }
                    if a.kind != b.kind {
                        return false;
                    }
                    left = a.next();
                    right = b.next();
                }
                _ => return false,
            }
        }
    }
}

impl Eq for Block {}

impl Hash for Block {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for block in self.iter() {
            block.kind.hash(state);
        }
        self.chain_len().hash(state);
    }
}

impl Drop for Block {
    fn drop(&mut self) {
        let mut next = self.next.take();
        while let Some(node) = next {
            match Arc::try_unwrap(node) {
                Ok(mut block) => next = block.next.take(),
                Err(_) => break,
            }
        }
    }
}

/// Iterator over a block chain
#[derive(Debug, Clone)]
pub struct Chain<'a> {
    current: Option<&'a Block>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a Block;

    fn next(&mut self) -> Option<Self::Item> {
        let block = self.current?;
        self.current = block.next();
        Some(block)
    }
}

impl<'a> IntoIterator for &'a Block {
    type Item = &'a Block;
    type IntoIter = Chain<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

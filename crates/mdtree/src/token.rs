//! The closed set of lexical symbols

use std::fmt;

/// A lexical token
///
/// String payloads are the raw text found between delimiters, without the
/// delimiters themselves.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// One per leading `#` of an ATX title
    TitleLevel,
    Title(String),
    /// One per trailing `#` of an ATX title
    TitleClosing,
    Text(String),
    /// Paragraph separator
    LineBreak,
    EmphasisStart,
    EmphasisEnd,
    StrongStart,
    StrongEnd,
    InlineCodeStart,
    InlineCodeEnd,
    ImageAltStart,
    ImageAltEnd,
    LinkTextStart,
    LinkTextEnd,
    LinkStart,
    LinkEnd,
    Enumeration { indent: usize, number: u64 },
    UnorderedEnumeration { indent: usize, bullet: char },
    CodeBlockStart,
    CodeBlockEnd,
    CodeBlockLanguage(String),
    Blockquote,
}

impl Token {
    pub fn text(text: impl Into<String>) -> Self {
        Token::Text(text.into())
    }

    pub fn title(text: impl Into<String>) -> Self {
        Token::Title(text.into())
    }

    pub fn language(language: impl Into<String>) -> Self {
        Token::CodeBlockLanguage(language.into())
    }

    /// Whether this token can only appear at the start of a block
    pub fn starts_block(&self) -> bool {
        matches!(
            self,
            Token::TitleLevel
                | Token::Enumeration { .. }
                | Token::UnorderedEnumeration { .. }
                | Token::CodeBlockStart
                | Token::Blockquote
        )
    }

    /// Whether this token closes an inline span
    pub fn ends_span(&self) -> bool {
        matches!(
            self,
            Token::EmphasisEnd | Token::StrongEnd | Token::InlineCodeEnd | Token::LinkEnd
        )
    }

    /// Variant name without payload
    pub fn name(&self) -> &'static str {
        match self {
            Token::TitleLevel => "TitleLevel",
            Token::Title(_) => "Title",
            Token::TitleClosing => "TitleClosing",
            Token::Text(_) => "Text",
            Token::LineBreak => "LineBreak",
            Token::EmphasisStart => "EmphasisStart",
            Token::EmphasisEnd => "EmphasisEnd",
            Token::StrongStart => "StrongStart",
            Token::StrongEnd => "StrongEnd",
            Token::InlineCodeStart => "InlineCodeStart",
            Token::InlineCodeEnd => "InlineCodeEnd",
            Token::ImageAltStart => "ImageAltStart",
            Token::ImageAltEnd => "ImageAltEnd",
            Token::LinkTextStart => "LinkTextStart",
            Token::LinkTextEnd => "LinkTextEnd",
            Token::LinkStart => "LinkStart",
            Token::LinkEnd => "LinkEnd",
            Token::Enumeration { .. } => "Enumeration",
            Token::UnorderedEnumeration { .. } => "UnorderedEnumeration",
            Token::CodeBlockStart => "CodeBlockStart",
            Token::CodeBlockEnd => "CodeBlockEnd",
            Token::CodeBlockLanguage(_) => "CodeBlockLanguage",
            Token::Blockquote => "Blockquote",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Title(text) | Token::Text(text) | Token::CodeBlockLanguage(text) => {
                write!(f, "{}({:?})", self.name(), text)
            }
            Token::Enumeration { indent, number } => {
                write!(f, "Enumeration({indent}, {number})")
            }
            Token::UnorderedEnumeration { indent, bullet } => {
                write!(f, "UnorderedEnumeration({indent}, {bullet:?})")
            }
            _ => f.write_str(self.name()),
        }
    }
}

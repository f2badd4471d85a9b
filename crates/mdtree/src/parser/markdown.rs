//! Markdown structural rules

use mdtree_core::{
    Blockquote, CodeBlock, Enumeration, EnumerationItem, Hyperlink, Image, Inline, NonEmptyText,
    TextParagraph, Title, UnorderedEnumeration, UnorderedEnumerationItem,
};

use super::rule::{Filter, Reduction, Rule};
use crate::token::Token;

/// The built-in rules in the order they are tried. `paragraph` accepts any
/// inline run and must stay last.
pub fn markdown_rules() -> Vec<(&'static str, Rule)> {
    vec![
        ("title", title_rule()),
        ("code_block", code_block_rule()),
        ("blockquote", blockquote_rule()),
        ("enumeration", enumeration_rule()),
        ("unordered_enumeration", unordered_enumeration_rule()),
        ("separator", separator_rule()),
        ("paragraph", paragraph_rule()),
    ]
}

fn title_rule() -> Rule {
    Rule::for_first(
        |token| matches!(token, Token::TitleLevel),
        |tokens| {
            let level = count_leading(tokens, |token| matches!(token, Token::TitleLevel));
            let Some(Token::Title(text)) = tokens.get(level) else {
                return None;
            };
            let title = Title::try_new(text.as_str(), level)?;
            let closing = count_leading(&tokens[level + 1..], |token| {
                matches!(token, Token::TitleClosing)
            });
            Some(Reduction::node(level + 1 + closing, title))
        },
    )
}

fn code_block_rule() -> Rule {
    Rule::for_first(
        |token| matches!(token, Token::CodeBlockStart),
        |tokens| {
            let mut position = 1;
            let language = match tokens.get(position) {
                Some(Token::CodeBlockLanguage(language)) => {
                    position += 1;
                    Some(language.clone())
                }
                _ => None,
            };

            let mut lines = Vec::new();
            loop {
                match tokens.get(position)? {
                    Token::Text(line) => lines.push(line.clone()),
                    Token::CodeBlockEnd => break,
                    _ => return None,
                }
                position += 1;
            }
            Some(Reduction::node(
                position + 1,
                CodeBlock::new(language, lines),
            ))
        },
    )
}

/// One block per quote marker; consecutive quoted lines end up chained
fn blockquote_rule() -> Rule {
    Rule::for_first(
        |token| matches!(token, Token::Blockquote),
        |tokens| {
            let (inlines, consumed) = collect_inlines(&tokens[1..])?;
            Some(Reduction::node(1 + consumed, Blockquote::new(inlines)))
        },
    )
}

fn enumeration_rule() -> Rule {
    Rule::for_first(
        |token| matches!(token, Token::Enumeration { .. }),
        |tokens| {
            let mut items = Vec::new();
            let mut position = 0;
            while let Some(&Token::Enumeration { indent, number }) = tokens.get(position) {
                let (inlines, consumed) = collect_inlines(&tokens[position + 1..])?;
                items.push(EnumerationItem::new(indent, number, inlines));
                position += 1 + consumed;
            }
            Some(Reduction::node(position, Enumeration::try_new(items)?))
        },
    )
}

fn unordered_enumeration_rule() -> Rule {
    Rule::for_first(
        |token| matches!(token, Token::UnorderedEnumeration { .. }),
        |tokens| {
            let mut items = Vec::new();
            let mut position = 0;
            while let Some(&Token::UnorderedEnumeration { indent, bullet }) = tokens.get(position)
            {
                let (inlines, consumed) = collect_inlines(&tokens[position + 1..])?;
                items.push(UnorderedEnumerationItem::new(indent, bullet, inlines));
                position += 1 + consumed;
            }
            Some(Reduction::node(
                position,
                UnorderedEnumeration::try_new(items)?,
            ))
        },
    )
}

fn separator_rule() -> Rule {
    Rule::for_first(
        |token| matches!(token, Token::LineBreak),
        |tokens| {
            Some(Reduction::skip(count_leading(tokens, |token| {
                matches!(token, Token::LineBreak)
            })))
        },
    )
}

fn paragraph_rule() -> Rule {
    Rule::new(Filter::Any, |tokens| {
        let (inlines, consumed) = collect_inlines(tokens)?;
        if consumed == 0 {
            return None;
        }
        Some(Reduction::node(consumed, TextParagraph::new(inlines)))
    })
}

fn count_leading(tokens: &[Token], test: impl Fn(&Token) -> bool) -> usize {
    tokens.iter().take_while(|token| test(token)).count()
}

/// Assemble the inline run at the front of `tokens`.
///
/// Stops at the first token that cannot start an inline. Returns `None` for
/// a malformed span, which fails the whole parse.
pub fn collect_inlines(tokens: &[Token]) -> Option<(Vec<Inline>, usize)> {
    let mut inlines = Vec::new();
    let mut position = 0;
    loop {
        let (inline, consumed) = match &tokens[position..] {
            [Token::Text(text), ..] => (Inline::clean_text(text.as_str()), 1),
            [Token::EmphasisStart, Token::Text(text), Token::EmphasisEnd, ..] => {
                (Inline::Emphasis(NonEmptyText::try_new(text.as_str())?), 3)
            }
            [Token::StrongStart, Token::Text(text), Token::StrongEnd, ..] => {
                (Inline::Strong(NonEmptyText::try_new(text.as_str())?), 3)
            }
            [Token::InlineCodeStart, Token::Text(text), Token::InlineCodeEnd, ..] => {
                (Inline::Code(NonEmptyText::try_new(text.as_str())?), 3)
            }
            [Token::LinkTextStart, Token::Text(text), Token::LinkTextEnd, rest @ ..] => {
                let (href, title, consumed) = link_target(rest)?;
                let link = Hyperlink::try_new(text.as_str(), href, title)?;
                (Inline::Hyperlink(link), 3 + consumed)
            }
            [Token::ImageAltStart, Token::Text(alt), Token::ImageAltEnd, rest @ ..] => {
                let (src, title, consumed) = link_target(rest)?;
                let image = Image::try_new(alt.as_str(), src, title)?;
                (Inline::Image(image), 3 + consumed)
            }
            [Token::EmphasisStart
            | Token::StrongStart
            | Token::InlineCodeStart
            | Token::LinkTextStart
            | Token::ImageAltStart, ..] => return None,
            _ => break,
        };
        inlines.push(inline);
        position += consumed;
    }
    Some((inlines, position))
}

/// `LinkStart, Text(target), [Text(title)], LinkEnd`
fn link_target(tokens: &[Token]) -> Option<(&str, Option<String>, usize)> {
    match tokens {
        [Token::LinkStart, Token::Text(target), Token::LinkEnd, ..] => Some((target.as_str(), None, 3)),
        [Token::LinkStart, Token::Text(target), Token::Text(title), Token::LinkEnd, ..] => {
            Some((target.as_str(), Some(title.clone()), 4))
        }
        _ => None,
    }
}

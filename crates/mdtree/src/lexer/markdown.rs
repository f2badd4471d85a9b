//! Markdown lexical rules

use once_cell::sync::Lazy;
use regex::Regex;

use super::rule::{Lexeme, Rule};
use crate::options::LexerOptions;
use crate::token::Token;
use crate::utilities::{
    blank_line_len, find_closing, fold_lines, leading_whitespace, split_line, terminator_len,
};

static TITLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#+)[ \t]+([^\r\n]*)").unwrap());

static ENUMERATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([ \t]*)([0-9]+)\.[ \t]+").unwrap());

static UNORDERED_ENUMERATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([ \t]*)([^ \t\r\n])[ \t]+").unwrap());

static LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\[([^\]\r\n]+)\]\(([^\s)]+)(?:[ \t]+"([^"\r\n]*)")?[ \t]*\)"#).unwrap()
});

/// The built-in rules in the order they are tried.
///
/// Line-anchored rules come first so that a list bullet is never taken for
/// an emphasis opener; `strong` precedes `emphasis` for the same reason.
pub fn markdown_rules() -> Vec<(&'static str, Rule)> {
    vec![
        ("title", title_rule()),
        ("code_fence", code_fence_rule()),
        ("blockquote", blockquote_rule()),
        ("enumeration", enumeration_rule()),
        ("unordered_enumeration", unordered_enumeration_rule()),
        ("line_break", line_break_rule()),
        ("strong", strong_rule()),
        ("emphasis", emphasis_rule()),
        ("inline_code", inline_code_rule()),
        ("image", image_rule()),
        ("hyperlink", hyperlink_rule()),
        ("text", text_rule()),
    ]
}

fn title_rule() -> Rule {
    Rule::at_block_start(|cursor, _| scan_title(cursor.rest()))
}

fn scan_title(rest: &str) -> Option<Lexeme> {
    let caps = TITLE.captures(rest)?;
    let level = caps[1].len();
    let content = caps[2].trim_end();

    // A closing run only counts when whitespace separates it from the text
    let unclosed = content.trim_end_matches('#');
    let closed = unclosed.is_empty() || unclosed.ends_with([' ', '\t']);
    let (text, closing) = if unclosed.len() < content.len() && closed {
        (unclosed.trim_end(), content.len() - unclosed.len())
    } else {
        (content, 0)
    };
    if text.is_empty() {
        return None;
    }

    let mut tokens = vec![Token::TitleLevel; level];
    tokens.push(Token::title(text));
    tokens.extend(std::iter::repeat(Token::TitleClosing).take(closing));
    Some(Lexeme::emit(caps[0].len(), tokens))
}

fn code_fence_rule() -> Rule {
    Rule::at_line_start(|cursor, options| {
        let rest = cursor.rest();
        let fence = options.fence.as_str();
        let (first, mut terminator) = split_line(rest);
        let language = fence_language(first, fence)?;

        let mut tokens = vec![Token::CodeBlockStart];
        if !language.is_empty() {
            tokens.push(Token::language(language));
        }

        // Unterminated blocks run to the end of input
        let mut consumed = first.len();
        while terminator > 0 && consumed + terminator < rest.len() {
            let start = consumed + terminator;
            let (line, next) = split_line(&rest[start..]);
            consumed = start + line.len();
            if line.trim() == fence {
                break;
            }
            tokens.push(Token::text(line));
            terminator = next;
        }

        tokens.push(Token::CodeBlockEnd);
        Some(Lexeme::emit(consumed, tokens))
    })
}

/// Language tag of an opening fence line; empty for a bare fence.
///
/// The tag must be a single word free of fence characters, anything else
/// after the fence means the line is not a fence at all.
fn fence_language<'a>(line: &'a str, fence: &str) -> Option<&'a str> {
    if fence.is_empty() {
        return None;
    }
    let language = line.strip_prefix(fence)?.trim();
    let valid = !language
        .chars()
        .any(|c| c.is_whitespace() || fence.contains(c));
    valid.then_some(language)
}

fn blockquote_rule() -> Rule {
    Rule::at_line_start(|cursor, _| scan_blockquote(cursor.rest()))
}

fn scan_blockquote(rest: &str) -> Option<Lexeme> {
    let quoted = rest.strip_prefix('>')?;
    Some(Lexeme::quote(
        1 + leading_whitespace(quoted),
        vec![Token::Blockquote],
    ))
}

fn enumeration_rule() -> Rule {
    Rule::at_line_start(|cursor, options| scan_enumeration(cursor.rest(), options))
}

fn scan_enumeration(rest: &str, options: &LexerOptions) -> Option<Lexeme> {
    let caps = ENUMERATION.captures(rest)?;
    // Numbers too large for u64 stay text
    let number = caps[2].parse::<u64>().ok()?;
    Some(Lexeme::emit(
        caps[0].len(),
        vec![Token::Enumeration {
            indent: options.indent_level(&caps[1]),
            number,
        }],
    ))
}

fn unordered_enumeration_rule() -> Rule {
    Rule::at_line_start(|cursor, options| scan_unordered_enumeration(cursor.rest(), options))
}

fn scan_unordered_enumeration(rest: &str, options: &LexerOptions) -> Option<Lexeme> {
    let caps = UNORDERED_ENUMERATION.captures(rest)?;
    let bullet = caps[2].chars().next()?;
    if !options.is_bullet(bullet) {
        return None;
    }
    Some(Lexeme::emit(
        caps[0].len(),
        vec![Token::UnorderedEnumeration {
            indent: options.indent_level(&caps[1]),
            bullet,
        }],
    ))
}

/// Whether the line at the start of `rest` would be lexed as the start of a
/// block. Spans never reach across such a line.
fn opens_block(rest: &str, options: &LexerOptions) -> bool {
    let line = &rest[leading_whitespace(rest)..];
    let starts_block = |lexeme: Option<Lexeme>| {
        lexeme.is_some_and(|lexeme| lexeme.tokens.first().is_some_and(Token::starts_block))
    };

    fence_language(split_line(line).0, &options.fence).is_some()
        || starts_block(scan_title(line))
        || starts_block(scan_blockquote(line))
        || starts_block(scan_enumeration(line, options))
        || starts_block(scan_unordered_enumeration(line, options))
}

fn line_break_rule() -> Rule {
    Rule::anywhere(|cursor, _| {
        let rest = cursor.rest();
        let mut len = terminator_len(rest);
        if len == 0 {
            return None;
        }

        let mut terminators = 1;
        while let Some(blank) = blank_line_len(&rest[len..]) {
            len += blank;
            terminators += 1;
        }

        if terminators > 1 {
            Some(Lexeme::paragraph_break(len))
        } else {
            Some(Lexeme::soft_break(len))
        }
    })
}

fn strong_rule() -> Rule {
    Rule::anywhere(|cursor, options| {
        ["**", "__"].into_iter().find_map(|delimiter| {
            delimited(
                cursor.rest(),
                delimiter,
                (Token::StrongStart, Token::StrongEnd),
                options,
            )
        })
    })
}

fn emphasis_rule() -> Rule {
    Rule::anywhere(|cursor, options| {
        ["*", "_"].into_iter().find_map(|delimiter| {
            delimited(
                cursor.rest(),
                delimiter,
                (Token::EmphasisStart, Token::EmphasisEnd),
                options,
            )
        })
    })
}

/// Recognize `delimiter text delimiter` within the current paragraph.
///
/// An opener without a matching closer is taken literally. Surplus delimiter
/// characters right after the closer become a separate text token.
fn delimited(
    rest: &str,
    delimiter: &str,
    (start, end): (Token, Token),
    options: &LexerOptions,
) -> Option<Lexeme> {
    let marker = delimiter.chars().next()?;
    let body = rest.strip_prefix(delimiter)?;
    let Some(close) = find_closing(body, delimiter, |next| opens_block(next, options))
        .filter(|&close| close > 0)
    else {
        return Some(Lexeme::literal(delimiter.len()));
    };

    let after = &body[close + delimiter.len()..];
    let surplus = after.len() - after.trim_start_matches(marker).len();

    let mut tokens = vec![start, Token::text(fold_lines(&body[..close])), end];
    if surplus > 0 {
        tokens.push(Token::text(&after[..surplus]));
    }
    Some(Lexeme::emit(
        2 * delimiter.len() + close + surplus,
        tokens,
    ))
}

fn inline_code_rule() -> Rule {
    Rule::anywhere(|cursor, options| {
        let rest = cursor.rest();
        if !rest.starts_with('`') {
            return None;
        }

        // A doubled backtick allows single backticks inside the span
        for delimiter in ["``", "`"] {
            let Some(body) = rest.strip_prefix(delimiter) else {
                continue;
            };
            let close = find_closing(body, delimiter, |next| opens_block(next, options));
            if let Some(close) = close.filter(|&close| close > 0) {
                return Some(Lexeme::emit(
                    2 * delimiter.len() + close,
                    vec![
                        Token::InlineCodeStart,
                        Token::text(fold_lines(&body[..close])),
                        Token::InlineCodeEnd,
                    ],
                ));
            }
        }

        Some(Lexeme::literal(rest.len() - rest.trim_start_matches('`').len()))
    })
}

fn image_rule() -> Rule {
    Rule::anywhere(|cursor, _| {
        let rest = cursor.rest();
        let tail = rest.strip_prefix('!')?;
        if !tail.starts_with('[') {
            return None;
        }
        Some(
            link_tokens(tail, Token::ImageAltStart, Token::ImageAltEnd)
                .map(|(len, tokens)| Lexeme::emit(1 + len, tokens))
                .unwrap_or_else(|| Lexeme::literal(2)),
        )
    })
}

fn hyperlink_rule() -> Rule {
    Rule::anywhere(|cursor, _| {
        let rest = cursor.rest();
        if !rest.starts_with('[') {
            return None;
        }
        Some(
            link_tokens(rest, Token::LinkTextStart, Token::LinkTextEnd)
                .map(|(len, tokens)| Lexeme::emit(len, tokens))
                .unwrap_or_else(|| Lexeme::literal(1)),
        )
    })
}

/// `[text](target "title")` on a single line. A comma may separate the
/// target from the title.
fn link_tokens(rest: &str, start: Token, end: Token) -> Option<(usize, Vec<Token>)> {
    let caps = LINK.captures(rest)?;
    let title = caps.get(3).map(|title| title.as_str());
    let target = match title {
        Some(_) => caps[2]
            .strip_suffix(',')
            .filter(|target| !target.is_empty())
            .unwrap_or(&caps[2]),
        None => &caps[2],
    };

    let mut tokens = vec![
        start,
        Token::text(&caps[1]),
        end,
        Token::LinkStart,
        Token::text(target),
    ];
    if let Some(title) = title.filter(|title| !title.is_empty()) {
        tokens.push(Token::text(title));
    }
    tokens.push(Token::LinkEnd);
    Some((caps[0].len(), tokens))
}

fn text_rule() -> Rule {
    Rule::anywhere(|cursor, _| {
        let rest = cursor.rest();
        if cursor.at_line_start() {
            let indent = leading_whitespace(rest);
            if indent > 0 {
                return Some(Lexeme::skip(indent));
            }
        }
        rest.chars().next().map(|c| Lexeme::literal(c.len_utf8()))
    })
}

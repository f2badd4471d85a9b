//! Rule-driven tree builder.

mod markdown;
mod rule;

pub use markdown::{collect_inlines, markdown_rules};
pub use rule::{BuildFn, Filter, Reduction, Rule};

use mdtree_core::Block;
use tracing::{debug, trace};

use crate::rules::Rules;
use crate::token::Token;
use crate::{MdTreeError, Result};

/// Tree builder driven by an ordered rule collection
pub struct Parser {
    rules: Rules<Rule>,
}

impl Parser {
    /// Create a parser with the Markdown rules
    pub fn new() -> Self {
        Self {
            rules: Rules::new(markdown_rules()),
        }
    }

    /// Build a document chain from `tokens`.
    ///
    /// Either every token is accounted for or the whole parse fails. An empty
    /// sequence, or one holding only separators, yields `Ok(None)`.
    pub fn parse(&self, tokens: &[Token]) -> Result<Option<Block>> {
        let mut nodes = Vec::new();
        let mut position = 0;

        while position < tokens.len() {
            let rest = &tokens[position..];
            let (key, reduction) = self
                .rules
                .iter()
                .find_map(|(key, rule)| rule.reduce(rest).map(|reduction| (key, reduction)))
                .ok_or_else(|| {
                    failure(
                        position,
                        format!("no rule recognizes a sequence starting with {}", rest[0]),
                    )
                })?;

            if reduction.consumed == 0 || reduction.consumed > rest.len() {
                return Err(failure(
                    position,
                    format!(
                        "rule `{key}` consumed {} of {} remaining tokens",
                        reduction.consumed,
                        rest.len()
                    ),
                ));
            }

            trace!(
                rule = key,
                position,
                consumed = reduction.consumed,
                "reduction"
            );
            position += reduction.consumed;
            nodes.extend(reduction.node);
        }

        debug!(tokens = tokens.len(), blocks = nodes.len(), "built tree");
        Ok(Block::from_chain(nodes))
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
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

fn failure(position: usize, reason: String) -> MdTreeError {
    debug!(position, %reason, "parse failure");
    MdTreeError::ParseFailure { position, reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdtree_core::{
        BlockKind, Blockquote, CodeBlock, Enumeration, EnumerationItem, Inline, TextParagraph,
        Title, UnorderedEnumeration, UnorderedEnumerationItem,
    };
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn parse(tokens: &[Token]) -> Option<Block> {
        Parser::new().parse(tokens).unwrap()
    }

    fn text(s: &str) -> Token {
        Token::text(s)
    }

    fn single(kind: impl Into<BlockKind>) -> Option<Block> {
        Some(Block::new(kind))
    }

    #[rstest]
    #[case(vec![Token::TitleLevel, Token::title("Title 1")], Title::new("Title 1", 1))]
    #[case(
        vec![Token::TitleLevel, Token::TitleLevel, Token::TitleLevel, Token::title("### Hello World!")],
        Title::new("### Hello World!", 3)
    )]
    #[case(
        vec![Token::TitleLevel, Token::title("Hello World!##"), Token::TitleClosing],
        Title::new("Hello World!##", 1)
    )]
    fn test_title(#[case] tokens: Vec<Token>, #[case] expected: Title) {
        assert_eq!(parse(&tokens), single(expected));
    }

    #[rstest]
    #[case(vec![text("This is a text.")], vec![Inline::clean_text("This is a text.")])]
    #[case(
        vec![text("This is an "), Token::EmphasisStart, text("emphasized"), Token::EmphasisEnd, text(" text.")],
        vec![Inline::clean_text("This is an "), Inline::emphasis("emphasized"), Inline::clean_text(" text.")]
    )]
    #[case(
        vec![text("This is a "), Token::StrongStart, text("strong"), Token::StrongEnd, text(" text.")],
        vec![Inline::clean_text("This is a "), Inline::strong("strong"), Inline::clean_text(" text.")]
    )]
    #[case(
        vec![text("This is a "), Token::InlineCodeStart, text("code inline"), Token::InlineCodeEnd, text(" text.")],
        vec![Inline::clean_text("This is a "), Inline::code("code inline"), Inline::clean_text(" text.")]
    )]
    #[case(
        vec![text("This is a "), Token::InlineCodeStart, text("code`inline"), Token::InlineCodeEnd, text(" text.")],
        vec![Inline::clean_text("This is a "), Inline::code("code`inline"), Inline::clean_text(" text.")]
    )]
    #[case(
        vec![
            text("This is an "),
            Token::ImageAltStart, text("Alternative"), Token::ImageAltEnd,
            Token::LinkStart, text(r"C:\Path\To\Image.jpg"), text("Some image"), Token::LinkEnd,
            text(" image."),
        ],
        vec![
            Inline::clean_text("This is an "),
            Inline::image("Alternative", r"C:\Path\To\Image.jpg", Some("Some image")),
            Inline::clean_text(" image."),
        ]
    )]
    #[case(
        vec![
            text("This is a "),
            Token::LinkTextStart, text("hyperlink."), Token::LinkTextEnd,
            Token::LinkStart, text("http://example.com"), text("Hyperlink title"), Token::LinkEnd,
        ],
        vec![
            Inline::clean_text("This is a "),
            Inline::hyperlink("hyperlink.", "http://example.com", Some("Hyperlink title")),
        ]
    )]
    fn test_text_paragraph(#[case] tokens: Vec<Token>, #[case] inlines: Vec<Inline>) {
        assert_eq!(parse(&tokens), single(TextParagraph::new(inlines)));
    }

    #[test]
    fn test_enumeration() {
        let tokens = vec![
            Token::Enumeration {
                indent: 0,
                number: 1,
            },
            text("Hello World!"),
            Token::Enumeration {
                indent: 0,
                number: 2,
            },
            text("Second point."),
        ];
        assert_eq!(
            parse(&tokens),
            single(Enumeration::new(vec![
                EnumerationItem::new(0, 1, vec![Inline::clean_text("Hello World!")]),
                EnumerationItem::new(0, 2, vec![Inline::clean_text("Second point.")]),
            ]))
        );
    }

    #[test]
    fn test_unordered_enumeration() {
        let tokens = vec![
            Token::UnorderedEnumeration {
                indent: 0,
                bullet: '*',
            },
            text("Hello World!"),
            Token::UnorderedEnumeration {
                indent: 1,
                bullet: '*',
            },
            text("Second point."),
        ];
        assert_eq!(
            parse(&tokens),
            single(UnorderedEnumeration::new(vec![
                UnorderedEnumerationItem::new(0, '*', vec![Inline::clean_text("Hello World!")]),
                UnorderedEnumerationItem::new(1, '*', vec![Inline::clean_text("Second point.")]),
            ]))
        );
    }

    #[test]
    fn test_enumeration_kinds_do_not_mix() {
        let tokens = vec![
            Token::Enumeration {
                indent: 0,
                number: 7,
            },
            text("ordered"),
            Token::UnorderedEnumeration {
                indent: 0,
                bullet: '-',
            },
            text("bulleted"),
        ];
        let expected = Block::from_chain(vec![
            Enumeration::new(vec![EnumerationItem::new(
                0,
                7,
                vec![Inline::clean_text("ordered")],
            )])
            .into(),
            UnorderedEnumeration::new(vec![UnorderedEnumerationItem::new(
                0,
                '-',
                vec![Inline::clean_text("bulleted")],
            )])
            .into(),
        ]);
        assert_eq!(parse(&tokens), expected);
    }

    #[rstest]
    #[case(
        vec![Token::CodeBlockStart, text("I am some code()!"), Token::CodeBlockEnd],
        CodeBlock::new(None, vec!["I am some code()!".to_string()])
    )]
    #[case(
        vec![
            Token::CodeBlockStart,
            Token::language("c#"),
            text("private void IAmCSharpCode()"),
            text("{"),
            text("}"),
            Token::CodeBlockEnd,
        ],
        CodeBlock::new(
            Some("c#".to_string()),
            vec!["private void IAmCSharpCode()".to_string(), "{".to_string(), "}".to_string()]
        )
    )]
    #[case(vec![Token::CodeBlockStart, Token::CodeBlockEnd], CodeBlock::new(None, Vec::new()))]
    fn test_code_block(#[case] tokens: Vec<Token>, #[case] expected: CodeBlock) {
        assert_eq!(parse(&tokens), single(expected));
    }

    #[test]
    fn test_blockquote() {
        let tokens = vec![Token::Blockquote, text("I am a blockquote!")];
        assert_eq!(
            parse(&tokens),
            single(Blockquote::new(vec![Inline::clean_text(
                "I am a blockquote!"
            )]))
        );
    }

    #[rstest]
    #[case(vec![
        Token::Blockquote, Token::EmphasisStart, text("This is an emphasized blockquote"), Token::EmphasisEnd,
        Token::Blockquote, Token::StrongStart, text("This is a strong blockquote"), Token::StrongEnd,
        Token::Blockquote, Token::InlineCodeStart, text("This is a code inline blockquote"), Token::InlineCodeEnd,
    ])]
    #[case(vec![
        Token::Blockquote, Token::EmphasisStart, text("This is an emphasized blockquote"), Token::EmphasisEnd, Token::LineBreak,
        Token::Blockquote, Token::StrongStart, text("This is a strong blockquote"), Token::StrongEnd, Token::LineBreak,
        Token::Blockquote, Token::InlineCodeStart, text("This is a code inline blockquote"), Token::InlineCodeEnd, Token::LineBreak,
    ])]
    fn test_blockquote_chain(#[case] tokens: Vec<Token>) {
        let expected = Block::from_chain(vec![
            Blockquote::new(vec![Inline::emphasis("This is an emphasized blockquote")]).into(),
            Blockquote::new(vec![Inline::strong("This is a strong blockquote")]).into(),
            Blockquote::new(vec![Inline::code("This is a code inline blockquote")]).into(),
        ]);
        assert_eq!(parse(&tokens), expected);
    }

    #[test]
    fn test_blockquote_followed_by_title() {
        let tokens = vec![
            Token::Blockquote,
            Token::TitleLevel,
            Token::title("Quoted title"),
        ];
        let expected = Block::from_chain(vec![
            Blockquote::new(Vec::new()).into(),
            Title::new("Quoted title", 1).into(),
        ]);
        assert_eq!(parse(&tokens), expected);
    }

    #[test]
    fn test_paragraph_stops_at_block_token() {
        let tokens = vec![
            text("Intro"),
            Token::Enumeration {
                indent: 0,
                number: 1,
            },
            text("item"),
        ];
        let document = parse(&tokens).unwrap();
        assert_eq!(document.chain_len(), 2);
        assert!(matches!(document.kind(), BlockKind::TextParagraph(_)));
        assert!(matches!(
            document.next().map(Block::kind),
            Some(BlockKind::Enumeration(_))
        ));
    }

    #[rstest]
    #[case(vec![])]
    #[case(vec![Token::LineBreak])]
    #[case(vec![Token::LineBreak, Token::LineBreak])]
    fn test_absent_document(#[case] tokens: Vec<Token>) {
        assert_eq!(parse(&tokens), None);
    }

    #[rstest]
    #[case(vec![Token::EmphasisEnd], 0)]
    #[case(vec![text("fine"), Token::StrongEnd], 1)]
    #[case(vec![Token::EmphasisStart, text("open"), Token::LineBreak], 0)]
    #[case(vec![Token::title("stray")], 0)]
    #[case(vec![Token::TitleLevel, text("no title")], 0)]
    #[case(vec![Token::TitleClosing], 0)]
    #[case(vec![Token::language("rust")], 0)]
    #[case(vec![Token::CodeBlockEnd], 0)]
    #[case(vec![Token::CodeBlockStart, text("x"), Token::LineBreak], 0)]
    #[case(vec![text("a"), Token::LineBreak, Token::StrongStart, text(""), Token::StrongEnd], 2)]
    #[case(vec![Token::LinkStart, text("x"), Token::LinkEnd], 0)]
    fn test_parse_failure(#[case] tokens: Vec<Token>, #[case] position: usize) {
        match Parser::new().parse(&tokens) {
            Err(MdTreeError::ParseFailure { position: at, .. }) => assert_eq!(at, position),
            other => panic!("expected a parse failure, got {other:?}"),
        }
    }

    #[test]
    fn test_custom_rule_runs_first() {
        let mut parser = Parser::new();
        parser.add_rule(
            "drop_stray_closing",
            Rule::for_first(
                |token| matches!(token, Token::TitleClosing),
                |_| Some(Reduction::skip(1)),
            ),
        );
        let tokens = vec![Token::TitleClosing, text("kept")];
        assert_eq!(
            parser.parse(&tokens).unwrap(),
            single(TextParagraph::new(vec![Inline::clean_text("kept")]))
        );
    }

    #[test]
    fn test_zero_consumption_is_parse_failure() {
        let mut parser = Parser::new();
        parser.use_plugin(|parser| {
            parser.add_rule(
                "stuck",
                Rule::new(Filter::Any, |_| Some(Reduction::skip(0))),
            );
        });
        assert!(matches!(
            parser.parse(&[text("x")]),
            Err(MdTreeError::ParseFailure { position: 0, .. })
        ));
    }

    #[test]
    fn test_predicate_rule_inserted_before_paragraph() {
        let mut parser = Parser::new();
        parser.rules_mut().insert_before(
            "paragraph",
            "shout",
            Rule::new(
                Filter::predicate(|tokens| {
                    matches!(tokens.first(), Some(Token::Text(text)) if text.ends_with('!'))
                }),
                |tokens| {
                    let Some(Token::Text(text)) = tokens.first() else {
                        return None;
                    };
                    Some(Reduction::node(1, Title::try_new(text.as_str(), 1)?))
                },
            ),
        );
        assert_eq!(
            parser.parse(&[text("Hey!")]).unwrap(),
            single(Title::new("Hey!", 1))
        );
        assert_eq!(
            parser.rules().keys().collect::<Vec<_>>(),
            vec![
                "title",
                "code_block",
                "blockquote",
                "enumeration",
                "unordered_enumeration",
                "separator",
                "shout",
                "paragraph",
            ]
        );
    }
}

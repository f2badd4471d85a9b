//! Rule and Filter types for tree building.

use mdtree_core::BlockKind;

use crate::token::Token;

/// Type alias for build functions
pub type BuildFn = Box<dyn Fn(&[Token]) -> Option<Reduction> + Send + Sync>;

/// The outcome of a structural rule: how many tokens it consumed and the
/// block it produced, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reduction {
    pub consumed: usize,
    pub node: Option<BlockKind>,
}

impl Reduction {
    pub fn node(consumed: usize, node: impl Into<BlockKind>) -> Self {
        Self {
            consumed,
            node: Some(node.into()),
        }
    }

    /// Consume tokens without producing a block
    pub fn skip(consumed: usize) -> Self {
        Self {
            consumed,
            node: None,
        }
    }
}

/// A filter determines which token sequences a rule is tried on
pub enum Filter {
    /// Any remaining sequence
    Any,
    /// Sequences whose first token satisfies the test
    First(fn(&Token) -> bool),
    /// Match using a predicate function
    Predicate(Box<dyn Fn(&[Token]) -> bool + Send + Sync>),
}

impl Filter {
    /// Create a filter with a predicate
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&[Token]) -> bool + Send + Sync + 'static,
    {
        Filter::Predicate(Box::new(f))
    }

    /// Check if this filter matches the remaining tokens
    pub fn matches(&self, tokens: &[Token]) -> bool {
        match self {
            Filter::Any => true,
            Filter::First(test) => tokens.first().is_some_and(test),
            Filter::Predicate(f) => f(tokens),
        }
    }
}

/// A rule recognizes a prefix of the remaining tokens
pub struct Rule {
    /// Filter to determine which sequences this rule applies to
    pub filter: Filter,
    /// Build function that reduces a token prefix
    pub build: BuildFn,
}

impl Rule {
    /// Create a new rule
    pub fn new<F>(filter: Filter, build: F) -> Self
    where
        F: Fn(&[Token]) -> Option<Reduction> + Send + Sync + 'static,
    {
        Self {
            filter,
            build: Box::new(build),
        }
    }

    /// Create a rule tried on sequences starting with a matching token
    pub fn for_first<F>(test: fn(&Token) -> bool, build: F) -> Self
    where
        F: Fn(&[Token]) -> Option<Reduction> + Send + Sync + 'static,
    {
        Self::new(Filter::First(test), build)
    }

    /// Apply this rule to the remaining tokens
    pub fn reduce(&self, tokens: &[Token]) -> Option<Reduction> {
        if !self.filter.matches(tokens) {
            return None;
        }
        (self.build)(tokens)
    }
}

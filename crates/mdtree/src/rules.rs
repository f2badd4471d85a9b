//! Ordered, named rule collections shared by the lexer and the parser.

use indexmap::IndexMap;

/// Collection of rules
///
/// Custom rules are consulted first, in insertion order, followed by the
/// built-in rules in their declared order.
pub struct Rules<R> {
    /// Custom rules added by the user (checked first)
    custom: IndexMap<String, R>,
    /// Built-in Markdown rules
    builtin: IndexMap<String, R>,
}

impl<R> Rules<R> {
    /// Create a collection from ordered built-in rules
    pub fn new<I>(builtin: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, R)>,
    {
        Self {
            custom: IndexMap::new(),
            builtin: builtin
                .into_iter()
                .map(|(key, rule)| (key.to_string(), rule))
                .collect(),
        }
    }

    /// Add a custom rule, replacing any custom rule with the same key
    pub fn add(&mut self, key: &str, rule: R) {
        self.custom.insert(key.to_string(), rule);
    }

    /// Insert `rule` directly in front of the rule named `anchor`.
    ///
    /// Returns the rule back if there is no such anchor.
    pub fn insert_before(&mut self, anchor: &str, key: &str, rule: R) -> Option<R> {
        let table = if self.custom.contains_key(anchor) {
            &mut self.custom
        } else {
            &mut self.builtin
        };
        match table.get_index_of(anchor) {
            Some(index) => {
                table.shift_insert(index, key.to_string(), rule);
                None
            }
            None => Some(rule),
        }
    }

    /// Remove a rule by key, custom rules first
    pub fn remove(&mut self, key: &str) -> Option<R> {
        self.custom
            .shift_remove(key)
            .or_else(|| self.builtin.shift_remove(key))
    }

    pub fn get(&self, key: &str) -> Option<&R> {
        self.custom.get(key).or_else(|| self.builtin.get(key))
    }

    /// All rules in the order they are consulted
    pub fn iter(&self) -> impl Iterator<Item = (&str, &R)> {
        self.custom
            .iter()
            .chain(self.builtin.iter())
            .map(|(key, rule)| (key.as_str(), rule))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|(key, _)| key)
    }

    pub fn len(&self) -> usize {
        self.custom.len() + self.builtin.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Rules<u8> {
        Rules::new([("title", 1), ("paragraph", 2)])
    }

    #[test]
    fn test_custom_rules_come_first() {
        let mut rules = sample();
        rules.add("custom", 9);
        assert_eq!(
            rules.keys().collect::<Vec<_>>(),
            vec!["custom", "title", "paragraph"]
        );
    }

    #[test]
    fn test_insert_before() {
        let mut rules = sample();
        assert_eq!(rules.insert_before("paragraph", "quote", 3), None);
        assert_eq!(
            rules.keys().collect::<Vec<_>>(),
            vec!["title", "quote", "paragraph"]
        );
        assert_eq!(rules.insert_before("missing", "x", 4), Some(4));
        assert_eq!(rules.len(), 3);
    }

    #[test]
    fn test_remove_prefers_custom() {
        let mut rules = sample();
        rules.add("title", 7);
        assert_eq!(rules.get("title"), Some(&7));
        assert_eq!(rules.remove("title"), Some(7));
        assert_eq!(rules.get("title"), Some(&1));
        assert_eq!(rules.remove("title"), Some(1));
        assert_eq!(rules.remove("title"), None);
        assert!(!rules.is_empty());
    }
}

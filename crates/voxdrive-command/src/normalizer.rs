//! Literal rewrites that undo the recognizer's usual homophone mistakes.
//!
//! Rules run in table order, each over the output of the one before, and each
//! replaces every occurrence of its pattern. Patterns are plain substrings, not
//! words: `"a "` also matches the tail of `"tequila "`. Because later rules can
//! expose text an earlier rule would have rewritten, normalizing twice may
//! change a string again.

use voxdrive_core::RewriteConfig;

/// Built-in corrections, in application order.
pub const BUILTIN_REWRITES: [(&str, &str); 6] = [
    ("to ", "two "),
    ("too ", "two "),
    ("for ", "four "),
    ("the ", ""),
    ("a ", ""),
    ("feed", "feet"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRule {
    pub pattern: String,
    pub replacement: String,
}

impl RewriteRule {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }

    pub fn apply(&self, text: &str) -> String {
        text.replace(&self.pattern, &self.replacement)
    }
}

#[derive(Debug, Clone)]
pub struct CommandNormalizer {
    rules: Vec<RewriteRule>,
}

impl CommandNormalizer {
    pub fn new() -> Self {
        Self {
            rules: BUILTIN_REWRITES
                .iter()
                .map(|(p, r)| RewriteRule::new(*p, *r))
                .collect(),
        }
    }

    /// Built-ins followed by `extra`, in the order given.
    pub fn with_extra(extra: &[RewriteConfig]) -> Self {
        let mut normalizer = Self::new();
        normalizer.rules.extend(
            extra
                .iter()
                .map(|r| RewriteRule::new(r.pattern.clone(), r.replacement.clone())),
        );
        normalizer
    }

    pub fn rules(&self) -> &[RewriteRule] {
        &self.rules
    }

    pub fn normalize(&self, raw: &str) -> String {
        self.rules
            .iter()
            .fold(raw.to_string(), |text, rule| rule.apply(&text))
    }
}

impl Default for CommandNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize with the built-in rules only.
pub fn normalize(raw: &str) -> String {
    CommandNormalizer::new().normalize(raw)
}

//! Wildcard field-name patterns
//!
//! A schema entry whose name contains `*` or `?` matches many concrete field
//! names at dispatch time. Patterns compile to anchored regexes.

use crate::error::FathomError;
use crate::Result;
use regex::Regex;

/// A compiled `*`/`?` field-name pattern
///
/// - `*` matches any sequence of characters (including empty)
/// - `?` matches exactly one character
#[derive(Clone, Debug)]
pub struct WildcardPattern {
    pattern: String,
    regex: Regex,
    stem: Option<String>,
}

impl WildcardPattern {
    /// Check whether a field name contains wildcard metacharacters
    pub fn is_wildcard(name: &str) -> bool {
        name.contains('*') || name.contains('?')
    }

    /// Compile a wildcard pattern
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        let mut regex_pattern = String::new();
        regex_pattern.push('^');
        for ch in pattern.chars() {
            match ch {
                '*' => regex_pattern.push_str(".*"),
                '?' => regex_pattern.push('.'),
                // Escape regex special characters
                '.' | '+' | '(' | ')' | '[' | ']' | '{' | '}' | '^' | '$' | '|' | '\\' => {
                    regex_pattern.push('\\');
                    regex_pattern.push(ch);
                }
                _ => regex_pattern.push(ch),
            }
        }
        regex_pattern.push('$');

        let regex = Regex::new(&regex_pattern)
            .map_err(|e| FathomError::Schema(format!("Invalid wildcard pattern '{pattern}': {e}")))?;

        let stem = Self::extract_stem(&pattern);

        Ok(Self {
            pattern,
            regex,
            stem,
        })
    }

    /// The declared pattern string
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Check whether a concrete field name satisfies the pattern
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// The literal group name addressing this pattern
    ///
    /// The stem is the literal prefix before the first wildcard character,
    /// with a trailing separator trimmed: `tags.*` -> `tags`. Nested-mapping
    /// ingestion uses it to route a whole group of keys through the pattern.
    pub fn stem(&self) -> Option<&str> {
        self.stem.as_deref()
    }

    fn extract_stem(pattern: &str) -> Option<String> {
        let mut prefix = String::new();
        for ch in pattern.chars() {
            if ch == '*' || ch == '?' {
                break;
            }
            prefix.push(ch);
        }
        let prefix = prefix.trim_end_matches(['.', '_', '-']);
        if prefix.is_empty() {
            None
        } else {
            Some(prefix.to_string())
        }
    }
}

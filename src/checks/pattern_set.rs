#![forbid(unsafe_code)]

//! Declarative pattern sets
//!
//! Pattern-based checks do not hard-code their regexes. Each consumes a
//! `PatternSet` compiled from a TOML definition (embedded at build time, see
//! `builtin`) plus any extra regexes from the `[patterns]` config table.

use crate::error::PatternError;
use regex::{Regex, RegexBuilder};
use serde::Deserialize;

/// TOML structure for pattern set definitions
#[derive(Debug, Deserialize)]
struct PatternSetDefinition {
    set: SetSection,
    #[serde(default)]
    patterns: Vec<PatternDefinition>,
}

#[derive(Debug, Deserialize)]
struct SetSection {
    id: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct PatternDefinition {
    name: String,
    regex: String,
    #[serde(default)]
    case_insensitive: bool,
    #[serde(default)]
    message: Option<String>,
}

/// One compiled pattern of a set
#[derive(Debug, Clone)]
pub struct Pattern {
    name: String,
    regex: Regex,
    message: Option<String>,
}

impl Pattern {
    fn compile(
        name: String,
        source: &str,
        case_insensitive: bool,
        message: Option<String>,
    ) -> Result<Self, PatternError> {
        let regex = RegexBuilder::new(source)
            .case_insensitive(case_insensitive)
            .build()
            .map_err(|e| PatternError::InvalidRegex {
                pattern: source.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self {
            name,
            regex,
            message,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Message attached to the pattern, falling back to its name
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or(&self.name)
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// An ordered collection of compiled patterns
#[derive(Debug, Clone)]
pub struct PatternSet {
    id: String,
    description: String,
    patterns: Vec<Pattern>,
}

impl PatternSet {
    /// Parse and compile a pattern set from TOML content
    ///
    /// # Errors
    ///
    /// Returns `PatternError::InvalidDefinition` for TOML that does not match
    /// the expected layout and `PatternError::InvalidRegex` for a pattern that
    /// fails to compile.
    pub fn from_toml(content: &str) -> Result<Self, PatternError> {
        let def: PatternSetDefinition = toml::from_str(content)
            .map_err(|e| PatternError::InvalidDefinition(format!("Failed to parse TOML: {}", e)))?;

        let patterns = def
            .patterns
            .into_iter()
            .map(|p| Pattern::compile(p.name, &p.regex, p.case_insensitive, p.message))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: def.set.id,
            description: def.set.description,
            patterns,
        })
    }

    /// Append user-supplied regexes to the set
    ///
    /// Extra patterns are case-sensitive and named after the set.
    pub fn with_extra(mut self, extra: &[String]) -> Result<Self, PatternError> {
        for source in extra {
            let name = format!("{} (custom)", self.id);
            self.patterns
                .push(Pattern::compile(name, source, false, None)?);
        }
        Ok(self)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// True if any pattern matches
    pub fn is_match(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(text))
    }

    /// Patterns that match, in declaration order
    pub fn matching<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a Pattern> + 'a {
        self.patterns.iter().filter(move |p| p.is_match(text))
    }

    /// Distinct matched substrings across all patterns, in order of first appearance
    pub fn distinct_matches<'t>(&self, text: &'t str) -> Vec<&'t str> {
        let mut hits: Vec<(usize, &'t str)> = self
            .patterns
            .iter()
            .flat_map(|p| p.regex.find_iter(text).map(|m| (m.start(), m.as_str())))
            .collect();
        hits.sort_by_key(|(start, _)| *start);

        let mut distinct: Vec<&'t str> = Vec::new();
        for (_, token) in hits {
            if !distinct.contains(&token) {
                distinct.push(token);
            }
        }
        distinct
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SET: &str = r#"
[set]
id = "demo"
description = "Demo set"

[[patterns]]
name = "todo"
regex = '''\bTODO\b'''
message = "Found a TODO"

[[patterns]]
name = "fixme"
regex = '''fixme'''
case_insensitive = true
"#;

    #[test]
    fn test_from_toml() {
        let set = PatternSet::from_toml(SET).unwrap();
        assert_eq!(set.id(), "demo");
        assert_eq!(set.description(), "Demo set");
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_case_insensitive_flag() {
        let set = PatternSet::from_toml(SET).unwrap();
        assert!(set.is_match("# FixMe later"));
        assert!(!set.is_match("# todo lowercase"));
    }

    #[test]
    fn test_matching_uses_message_or_name() {
        let set = PatternSet::from_toml(SET).unwrap();
        let messages: Vec<&str> = set.matching("TODO and FIXME").map(|p| p.message()).collect();
        assert_eq!(messages, vec!["Found a TODO", "fixme"]);
    }

    #[test]
    fn test_distinct_matches_first_appearance_order() {
        let set = PatternSet::from_toml(SET).unwrap();
        let tokens = set.distinct_matches("fixme TODO FIXME TODO fixme");
        assert_eq!(tokens, vec!["fixme", "TODO", "FIXME"]);
    }

    #[test]
    fn test_invalid_regex() {
        let toml = r#"
[set]
id = "bad"
description = "Bad"

[[patterns]]
name = "unclosed"
regex = "[unclosed"
"#;
        let err = PatternSet::from_toml(toml).unwrap_err();
        assert!(matches!(err, PatternError::InvalidRegex { .. }));
    }

    #[test]
    fn test_missing_section_is_invalid_definition() {
        let err = PatternSet::from_toml("[[patterns]]\nname = \"x\"\nregex = \"x\"\n").unwrap_err();
        assert!(matches!(err, PatternError::InvalidDefinition(_)));
    }

    #[test]
    fn test_with_extra() {
        let set = PatternSet::from_toml(SET)
            .unwrap()
            .with_extra(&["XXX".to_string()])
            .unwrap();
        assert_eq!(set.len(), 3);
        assert!(set.is_match("XXX marker"));

        let err = PatternSet::from_toml(SET)
            .unwrap()
            .with_extra(&["(".to_string()])
            .unwrap_err();
        assert!(matches!(err, PatternError::InvalidRegex { .. }));
    }
}

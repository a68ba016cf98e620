//! Semantic patterns for string columns.
//!
//! A column can be tagged with a built-in pattern name such as `email` or
//! with a raw regular expression. Both are compiled into a [`SemanticPattern`]
//! that only accepts full matches.

use regex::Regex;

/// Built-in patterns, by name. Bodies are unanchored; anchoring is added on compile.
pub const BUILTIN_PATTERNS: &[(&str, &str)] = &[
    ("email", r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}"),
    (
        "uk_postcode",
        r"(?i:GIR ?0AA|(?:[A-Z][0-9]{1,2}|[A-Z][A-HJ-Y][0-9]{1,2}|[A-Z][0-9][A-Z]|[A-Z][A-HJ-Y][0-9]?[A-Z]) ?[0-9][A-Z]{2})",
    ),
    ("us_zip", r"[0-9]{5}(?:-[0-9]{4})?"),
    ("phone", r"\+?[0-9][0-9 ().-]{5,}[0-9]"),
];

/// A named, compiled pattern that must match a whole value.
#[derive(Debug, Clone)]
pub struct SemanticPattern {
    name: String,
    regex: Regex,
}

impl SemanticPattern {
    /// Resolves a pattern declaration.
    ///
    /// Built-in names are looked up case-insensitively; anything else is
    /// compiled as a regular expression and named after its source.
    pub fn resolve(declaration: &str) -> Result<Self, regex::Error> {
        let lookup = declaration.trim().to_lowercase();
        let builtin = BUILTIN_PATTERNS
            .iter()
            .find(|(name, _)| *name == lookup.as_str());

        let (name, body) = match builtin {
            Some((name, body)) => ((*name).to_string(), *body),
            None => (declaration.to_string(), declaration),
        };

        let regex = Regex::new(&format!("^(?:{})$", body))?;
        Ok(Self { name, regex })
    }

    /// Returns the pattern name used in findings.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if the whole value matches.
    pub fn is_full_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    /// Returns true if this pattern is one of [`BUILTIN_PATTERNS`].
    pub fn is_builtin(&self) -> bool {
        BUILTIN_PATTERNS.iter().any(|(name, _)| *name == self.name)
    }
}

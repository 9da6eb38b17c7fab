use serde::{Deserialize, Serialize};
use std::fmt;

///
/// FieldPath
///
/// A dotted sequence of field names addressing a (possibly nested) field
/// within a message type.
///

#[derive(Clone, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    #[must_use]
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Split a dotted path string into segments. Empty input yields an
    /// empty path.
    #[must_use]
    pub fn parse(dotted: &str) -> Self {
        if dotted.is_empty() {
            return Self {
                segments: Vec::new(),
            };
        }
        Self {
            segments: dotted.split('.').map(str::to_string).collect(),
        }
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Top-level field name, i.e. the first segment.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }

    /// The terminal field name the path resolves to.
    #[must_use]
    pub fn terminal(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Whether the path addresses a field nested inside a sub-message.
    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.segments.len() > 1
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

///
/// PathTemplate
///
/// Compiled representation of a URL path template, produced by the external
/// path-template compiler. Opaque to the generator; its fields are carried
/// verbatim into the emitted pattern constructor.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct PathTemplate {
    pub version: i32,
    pub op_codes: Vec<i32>,
    pub pool: Vec<String>,
    pub verb: Option<String>,
    /// Source template text, kept for diagnostics.
    pub template: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display_round_trip() {
        let path = FieldPath::parse("a.b.c");
        assert_eq!(path.len(), 3);
        assert!(path.is_nested());
        assert_eq!(path.first(), Some("a"));
        assert_eq!(path.terminal(), Some("c"));
        assert_eq!(path.to_string(), "a.b.c");
    }

    #[test]
    fn single_segment_is_not_nested() {
        let path = FieldPath::parse("id");
        assert!(!path.is_nested());
        assert_eq!(path.first(), path.terminal());
    }

    #[test]
    fn empty_string_parses_to_empty_path() {
        assert!(FieldPath::parse("").is_empty());
    }
}

//! Dotted path expressions used as column headers
//!
//! A header such as `orders[].lines[].sku` is a sequence of segments separated
//! by `.`; a segment ending in `[]` names an array-valued field.

use crate::error::{TranscodeError, TranscodeResult};
use std::fmt;
use std::str::FromStr;

/// Suffix marking a segment as array-valued
pub const ARRAY_MARKER: &str = "[]";

/// Separator between segments
pub const SEPARATOR: char = '.';

/// One step of a path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Field(String),
    ArrayField(String),
}

impl Segment {
    /// Field name without the array marker
    pub fn name(&self) -> &str {
        match self {
            Segment::Field(name) | Segment::ArrayField(name) => name,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Segment::ArrayField(_))
    }

    fn parse(raw: &str, full: &str) -> TranscodeResult<Self> {
        if raw.is_empty() {
            return Err(TranscodeError::PathSyntax {
                path: full.to_string(),
                reason: "empty segment".to_string(),
            });
        }

        let (name, is_array) = match raw.strip_suffix(ARRAY_MARKER) {
            Some(name) => (name, true),
            None => (raw, false),
        };

        if name.is_empty() {
            return Err(TranscodeError::PathSyntax {
                path: full.to_string(),
                reason: "array marker without a field name".to_string(),
            });
        }
        if name.contains(ARRAY_MARKER) {
            return Err(TranscodeError::PathSyntax {
                path: full.to_string(),
                reason: format!("array marker inside segment '{}'", raw),
            });
        }

        Ok(if is_array {
            Segment::ArrayField(name.to_string())
        } else {
            Segment::Field(name.to_string())
        })
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Field(name) => write!(f, "{}", name),
            Segment::ArrayField(name) => write!(f, "{}{}", name, ARRAY_MARKER),
        }
    }
}

/// A parsed header path. The empty path denotes the record root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// The root path (no segments)
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Parse a dotted path. The empty string parses to the root path.
    pub fn parse(text: &str) -> TranscodeResult<Self> {
        if text.is_empty() {
            return Ok(Self::root());
        }
        let segments = text
            .split(SEPARATOR)
            .map(|raw| Segment::parse(raw, text))
            .collect::<TranscodeResult<Vec<_>>>()?;
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn first(&self) -> Option<&Segment> {
        self.segments.first()
    }

    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// True when the final segment carries the array marker
    pub fn ends_with_array(&self) -> bool {
        self.last().is_some_and(Segment::is_array)
    }

    /// True when any segment carries the array marker
    pub fn contains_array(&self) -> bool {
        self.segments.iter().any(Segment::is_array)
    }

    /// New path with `segment` appended
    pub fn child(&self, segment: Segment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    /// Path with the last segment removed (root stays root)
    pub fn parent(&self) -> Self {
        let mut segments = self.segments.clone();
        segments.pop();
        Self { segments }
    }

    /// True if `self` is `other` or one of its ancestors. Root is an
    /// ancestor of every path.
    pub fn is_ancestor_of(&self, other: &Path) -> bool {
        self.is_empty() || other.segments.starts_with(&self.segments)
    }

    /// `self` with the first `prefix.len()` segments removed.
    ///
    /// Returns `self` unchanged when `prefix` is not shorter than `self`.
    pub fn suffix_after(&self, prefix: &Path) -> Path {
        if prefix.len() >= self.len() {
            return self.clone();
        }
        Self {
            segments: self.segments[prefix.len()..].to_vec(),
        }
    }

    /// Segments grouped at array-marker boundaries. Each group ends with an
    /// array segment except possibly the last; a trailing empty group is
    /// not produced.
    fn array_groups(&self) -> Vec<&[Segment]> {
        let mut groups = Vec::new();
        let mut start = 0;
        for (idx, segment) in self.segments.iter().enumerate() {
            if segment.is_array() {
                groups.push(&self.segments[start..=idx]);
                start = idx + 1;
            }
        }
        if start < self.segments.len() {
            groups.push(&self.segments[start..]);
        }
        groups
    }

    /// True when both paths live in the same repeating-group instance: they
    /// have the same number of array groups and agree on all but the last.
    pub fn same_parent_group(&self, other: &Path) -> bool {
        let left = self.array_groups();
        let right = other.array_groups();
        if left.len() != right.len() {
            return false;
        }
        let shared = left.len().saturating_sub(1);
        left[..shared] == right[..shared]
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, segment) in self.segments.iter().enumerate() {
            if idx > 0 {
                write!(f, "{}", SEPARATOR)?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = TranscodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::parse(s)
    }
}

/// True if `a` is `b` or one of its ancestors
pub fn is_ancestor(a: &Path, b: &Path) -> bool {
    a.is_ancestor_of(b)
}

/// `full` with `prefix`'s segments removed from the front
pub fn suffix_after(full: &Path, prefix: &Path) -> Path {
    full.suffix_after(prefix)
}

/// True if both paths share every array group but the last
pub fn same_parent_group(a: &Path, b: &Path) -> bool {
    a.same_parent_group(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(text: &str) -> Path {
        Path::parse(text).unwrap()
    }

    #[test]
    fn test_parse_fields_and_arrays() {
        let path = p("orders[].lines[].sku");
        assert_eq!(
            path.segments(),
            &[
                Segment::ArrayField("orders".to_string()),
                Segment::ArrayField("lines".to_string()),
                Segment::Field("sku".to_string()),
            ]
        );
        assert!(path.contains_array());
        assert!(!path.ends_with_array());
    }

    #[test]
    fn test_parse_round_trip() {
        for text in ["id", "addr.city", "items[].sku", "tags[]", "a.b[].c.d[]"] {
            assert_eq!(p(text).to_string(), text);
        }
    }

    #[test]
    fn test_parse_empty_is_root() {
        assert!(p("").is_empty());
    }

    #[test]
    fn test_parse_rejects_empty_segment() {
        let err = Path::parse("a..b").unwrap_err();
        assert!(matches!(err, TranscodeError::PathSyntax { .. }));
        assert!(Path::parse(".a").is_err());
        assert!(Path::parse("a.").is_err());
    }

    #[test]
    fn test_parse_rejects_misplaced_marker() {
        assert!(Path::parse("[]").is_err());
        assert!(Path::parse("a[]b.c").is_err());
        assert!(Path::parse("a[][]").is_err());
    }

    #[test]
    fn test_is_ancestor() {
        assert!(is_ancestor(&p(""), &p("a.b")));
        assert!(is_ancestor(&p("a"), &p("a.b")));
        assert!(is_ancestor(&p("a.b"), &p("a.b")));
        assert!(!is_ancestor(&p("a.b"), &p("a")));
        assert!(!is_ancestor(&p("a[]"), &p("a.b")));
        assert!(is_ancestor(&p(""), &p("")));
    }

    #[test]
    fn test_suffix_after() {
        assert_eq!(suffix_after(&p("a.b.c"), &p("a")), p("b.c"));
        assert_eq!(suffix_after(&p("a.b"), &p("")), p("a.b"));
        // prefix not shorter than full: unchanged
        assert_eq!(suffix_after(&p("a"), &p("x.y")), p("a"));
        assert_eq!(suffix_after(&p("a"), &p("a")), p("a"));
    }

    #[test]
    fn test_same_parent_group() {
        assert!(same_parent_group(&p("items[].sku"), &p("items[].qty")));
        assert!(same_parent_group(&p("id"), &p("addr.city")));
        assert!(!same_parent_group(&p("id"), &p("items[].sku")));
        assert!(!same_parent_group(&p("items[].sku"), &p("parts[].sku")));
        assert!(same_parent_group(
            &p("orders[].lines[].sku"),
            &p("orders[].lines[].dim.w")
        ));
        assert!(!same_parent_group(&p("orders[].ref"), &p("orders[].lines[].sku")));
    }

    #[test]
    fn test_parent_and_child() {
        let path = p("a.b[]");
        assert_eq!(path.parent(), p("a"));
        assert_eq!(p("a").child(Segment::ArrayField("b".into())), path);
        assert_eq!(Path::root().parent(), Path::root());
    }
}

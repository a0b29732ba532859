//! Path addressing
//!
//! A path is an ordered list of segments, each either a field name or an
//! array index. The string encoding joins names with `.` and wraps indexes
//! in brackets: `a.b[0].c`. Error maps and rule field references both use
//! this encoding, so it must stay reversible.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// One step into a value tree: a map key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Field name inside a map.
    Key(String),
    /// Position inside an array.
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(name) => write!(f, "{}", name),
            Segment::Index(index) => write!(f, "[{}]", index),
        }
    }
}

impl From<&str> for Segment {
    fn from(name: &str) -> Self {
        Segment::Key(name.to_string())
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Segment::Index(index)
    }
}

/// Errors from parsing a path string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// A name segment is missing where one is required, e.g. `a..b` or `a.`.
    #[error("empty segment in path")]
    EmptySegment,
    /// An index opened with `[` but never closed.
    #[error("unterminated index bracket")]
    UnterminatedIndex,
    /// Index brackets held something other than a plain non-negative number.
    #[error("invalid array index '{0}'")]
    InvalidIndex(String),
    /// A character appeared where the grammar does not allow it.
    #[error("unexpected character '{0}' in path")]
    UnexpectedChar(char),
}

/// An ordered sequence of segments addressing one location in a value tree.
///
/// The empty path addresses the tree root. Field names must not contain
/// `.`, `[` or `]`; blueprint structural validation enforces that, which
/// keeps the string encoding injective.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// The empty path addressing the tree root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Single-segment path naming a top-level field.
    pub fn key(name: &str) -> Self {
        Self {
            segments: vec![Segment::Key(name.to_string())],
        }
    }

    /// Builds a path from pre-parsed segments.
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Appends a segment in place.
    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    /// Returns a new path extended with a field name.
    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Key(name.to_string()));
        Self { segments }
    }

    /// Returns a new path extended with an array index.
    pub fn element(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Index(index));
        Self { segments }
    }

    /// Concatenates two paths.
    pub fn join(&self, other: &Path) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Self { segments }
    }

    /// Splits off the final segment, returning the parent path and the
    /// segment. `None` for the root path.
    pub fn split_last(&self) -> Option<(Path, &Segment)> {
        let (last, parent) = self.segments.split_last()?;
        Some((
            Path {
                segments: parent.to_vec(),
            },
            last,
        ))
    }

    /// Parses the `a.b[0].c` encoding.
    ///
    /// Grammar: steps separated by `.`, each step a name followed by zero
    /// or more `[n]` indexes. A leading pure-index step such as `[0]` is
    /// accepted for root-level arrays. The empty string parses to the root
    /// path.
    pub fn parse(input: &str) -> Result<Self, PathError> {
        if input.is_empty() {
            return Ok(Self::root());
        }
        let mut segments = Vec::new();
        let mut chars = input.chars().peekable();
        let mut first = true;
        loop {
            let mut name = String::new();
            while let Some(&c) = chars.peek() {
                if c == '.' || c == '[' {
                    break;
                }
                if c == ']' {
                    return Err(PathError::UnexpectedChar(']'));
                }
                name.push(c);
                chars.next();
            }
            if name.is_empty() {
                // Only the very first step may omit its name, and only
                // when an index follows.
                if !(first && chars.peek() == Some(&'[')) {
                    return Err(PathError::EmptySegment);
                }
            } else {
                segments.push(Segment::Key(name));
            }
            while chars.peek() == Some(&'[') {
                chars.next();
                let mut digits = String::new();
                loop {
                    match chars.next() {
                        Some(']') => break,
                        Some(c) => digits.push(c),
                        None => return Err(PathError::UnterminatedIndex),
                    }
                }
                if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
                    return Err(PathError::InvalidIndex(digits));
                }
                let index: usize = digits
                    .parse()
                    .map_err(|_| PathError::InvalidIndex(digits.clone()))?;
                segments.push(Segment::Index(index));
            }
            first = false;
            match chars.next() {
                None => break,
                Some('.') => {
                    if chars.peek().is_none() {
                        return Err(PathError::EmptySegment);
                    }
                }
                Some(c) => return Err(PathError::UnexpectedChar(c)),
            }
        }
        Ok(Self { segments })
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(name) => {
                    if position > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{}", name)?;
                }
                Segment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Path {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        Path::parse(&encoded).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_key() {
        let path = Path::parse("title").unwrap();
        assert_eq!(path.segments(), &[Segment::Key("title".to_string())]);
    }

    #[test]
    fn test_parse_nested_keys() {
        let path = Path::parse("meta.author").unwrap();
        assert_eq!(path.len(), 2);
        assert_eq!(path.to_string(), "meta.author");
    }

    #[test]
    fn test_parse_key_and_index() {
        let path = Path::parse("tags[0]").unwrap();
        assert_eq!(
            path.segments(),
            &[Segment::Key("tags".to_string()), Segment::Index(0)]
        );
    }

    #[test]
    fn test_parse_deep_mixed() {
        let path = Path::parse("sections[2].items[0].label").unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(path.to_string(), "sections[2].items[0].label");
    }

    #[test]
    fn test_parse_adjacent_indexes() {
        let path = Path::parse("grid[1][2]").unwrap();
        assert_eq!(
            path.segments(),
            &[
                Segment::Key("grid".to_string()),
                Segment::Index(1),
                Segment::Index(2)
            ]
        );
    }

    #[test]
    fn test_parse_leading_index() {
        let path = Path::parse("[3].name").unwrap();
        assert_eq!(
            path.segments(),
            &[Segment::Index(3), Segment::Key("name".to_string())]
        );
    }

    #[test]
    fn test_parse_empty_is_root() {
        let path = Path::parse("").unwrap();
        assert!(path.is_root());
        assert_eq!(path.to_string(), "");
    }

    #[test]
    fn test_parse_rejects_empty_segments() {
        assert_eq!(Path::parse("a..b"), Err(PathError::EmptySegment));
        assert_eq!(Path::parse("a."), Err(PathError::EmptySegment));
        assert_eq!(Path::parse(".a"), Err(PathError::EmptySegment));
        assert_eq!(Path::parse("a.[0]"), Err(PathError::EmptySegment));
    }

    #[test]
    fn test_parse_rejects_bad_indexes() {
        assert_eq!(
            Path::parse("a[x]"),
            Err(PathError::InvalidIndex("x".to_string()))
        );
        assert_eq!(
            Path::parse("a[]"),
            Err(PathError::InvalidIndex(String::new()))
        );
        assert_eq!(
            Path::parse("a[-1]"),
            Err(PathError::InvalidIndex("-1".to_string()))
        );
        assert_eq!(Path::parse("a[1"), Err(PathError::UnterminatedIndex));
    }

    #[test]
    fn test_parse_rejects_trailing_garbage() {
        assert_eq!(Path::parse("a[0]b"), Err(PathError::UnexpectedChar('b')));
        assert_eq!(Path::parse("a]b"), Err(PathError::UnexpectedChar(']')));
    }

    #[test]
    fn test_display_round_trip() {
        for encoded in ["a", "a.b", "a[0]", "a[0].b.c[12]", "x[1][2].y"] {
            let path = Path::parse(encoded).unwrap();
            assert_eq!(path.to_string(), encoded);
            assert_eq!(Path::parse(&path.to_string()).unwrap(), path);
        }
    }

    #[test]
    fn test_builders() {
        let path = Path::key("sections").element(1).child("title");
        assert_eq!(path.to_string(), "sections[1].title");
    }

    #[test]
    fn test_join() {
        let base = Path::parse("sections[0]").unwrap();
        let relative = Path::parse("meta.slug").unwrap();
        assert_eq!(base.join(&relative).to_string(), "sections[0].meta.slug");
    }

    #[test]
    fn test_split_last() {
        let path = Path::parse("a.b[3]").unwrap();
        let (parent, last) = path.split_last().unwrap();
        assert_eq!(parent.to_string(), "a.b");
        assert_eq!(last, &Segment::Index(3));
        assert!(Path::root().split_last().is_none());
    }

    #[test]
    fn test_serde_as_string() {
        let path = Path::parse("a.b[0]").unwrap();
        let encoded = serde_json::to_string(&path).unwrap();
        assert_eq!(encoded, "\"a.b[0]\"");
        let decoded: Path = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, path);
    }
}

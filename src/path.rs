//! Path representation and the canonical key / action type codec.
//!
//! Paths are sequences of segments describing a location in a JSON state
//! tree. Each segment is either a key (for objects) or an index (for
//! arrays). A path canonicalizes to a single string key — string segments
//! dot-joined, index segments appended as `[i]` — which is what the
//! registry uses for lookup and what action type strings are prefixed with.

use crate::error::{PathspaceError, PathspaceResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Joiner between string segments in a canonical key: `foo.bar`.
pub const PATH_JOINER: char = '.';

/// Separator between a canonical key and an action name: `foo.bar:SET`.
pub const ACTION_SEPARATOR: char = ':';

/// A single segment in a path.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Seg {
    /// Object key access: `{"key": value}`
    Key(String),
    /// Array index access: `[index]`
    Index(usize),
}

impl Seg {
    /// Create a key segment.
    #[inline]
    pub fn key(k: impl Into<String>) -> Self {
        Seg::Key(k.into())
    }

    /// Create an index segment.
    #[inline]
    pub fn index(i: usize) -> Self {
        Seg::Index(i)
    }

    /// Returns true if this is a key segment.
    #[inline]
    pub fn is_key(&self) -> bool {
        matches!(self, Seg::Key(_))
    }

    /// Returns true if this is an index segment.
    #[inline]
    pub fn is_index(&self) -> bool {
        matches!(self, Seg::Index(_))
    }

    /// Get the key if this is a key segment.
    #[inline]
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Seg::Key(k) => Some(k),
            Seg::Index(_) => None,
        }
    }

    /// Get the index if this is an index segment.
    #[inline]
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Seg::Key(_) => None,
            Seg::Index(i) => Some(*i),
        }
    }
}

impl fmt::Display for Seg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seg::Key(k) => write!(f, "{}", k),
            Seg::Index(i) => write!(f, "[{}]", i),
        }
    }
}

impl From<String> for Seg {
    fn from(s: String) -> Self {
        Seg::Key(s)
    }
}

impl From<&str> for Seg {
    fn from(s: &str) -> Self {
        Seg::Key(s.to_owned())
    }
}

impl From<usize> for Seg {
    fn from(i: usize) -> Self {
        Seg::Index(i)
    }
}

/// A complete path into a JSON state tree.
///
/// Paths are immutable sequences of segments. Use builder methods or the
/// [`path!`](crate::path!) macro to construct paths incrementally.
///
/// # Examples
///
/// ```
/// use pathspace::Path;
///
/// let path = Path::root().key("users").index(0).key("name");
/// assert_eq!(path.len(), 3);
/// assert_eq!(path.canonical(), "users[0].name");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Path(Vec<Seg>);

impl Path {
    /// Create an empty path (root).
    #[inline]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Create an empty path (alias for `new`).
    #[inline]
    pub fn root() -> Self {
        Self::new()
    }

    /// Create a path from a vector of segments.
    #[inline]
    pub fn from_segments(segments: Vec<Seg>) -> Self {
        Self(segments)
    }

    /// Append a key segment and return self (builder pattern).
    #[inline]
    pub fn key(mut self, k: impl Into<String>) -> Self {
        self.0.push(Seg::Key(k.into()));
        self
    }

    /// Append an index segment and return self (builder pattern).
    #[inline]
    pub fn index(mut self, i: usize) -> Self {
        self.0.push(Seg::Index(i));
        self
    }

    /// Push a segment onto the path (mutating).
    #[inline]
    pub fn push(&mut self, seg: Seg) {
        self.0.push(seg);
    }

    /// Pop the last segment from the path.
    #[inline]
    pub fn pop(&mut self) -> Option<Seg> {
        self.0.pop()
    }

    /// Get the segments of this path.
    #[inline]
    pub fn segments(&self) -> &[Seg] {
        &self.0
    }

    /// Check if this path is empty (root).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of segments in this path.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get the last segment.
    #[inline]
    pub fn last(&self) -> Option<&Seg> {
        self.0.last()
    }

    /// Join this path with another path.
    #[inline]
    pub fn join(&self, other: &Path) -> Path {
        let mut result = self.clone();
        result.0.extend(other.0.iter().cloned());
        result
    }

    /// Get the parent path (path without the last segment).
    #[inline]
    pub fn parent(&self) -> Option<Path> {
        if self.0.is_empty() {
            None
        } else {
            let mut p = self.clone();
            p.pop();
            Some(p)
        }
    }

    /// Iterate over the segments.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Seg> {
        self.0.iter()
    }

    /// Canonical string key for this path.
    ///
    /// String segments are joined with `.`; an index segment appends `[i]`
    /// directly to the preceding text with no joiner before `[`. The root
    /// path canonicalizes to the empty string.
    ///
    /// # Examples
    ///
    /// ```
    /// use pathspace::path;
    ///
    /// assert_eq!(path!("foo", "bar", 2, "baz").canonical(), "foo.bar[2].baz");
    /// assert_eq!(path!(2).canonical(), "[2]");
    /// ```
    pub fn canonical(&self) -> String {
        let mut out = String::new();
        for seg in &self.0 {
            match seg {
                Seg::Key(k) => {
                    if !out.is_empty() {
                        out.push(PATH_JOINER);
                    }
                    out.push_str(k);
                }
                Seg::Index(i) => {
                    out.push('[');
                    out.push_str(&i.to_string());
                    out.push(']');
                }
            }
        }
        out
    }

    /// Parse a canonical (or plain dotted) string key back into a path.
    ///
    /// The inverse of [`canonical`](Path::canonical): splits on `.`, then
    /// peels `[i]` index suffixes off each chunk. A leading `[i]` chunk is
    /// a root-level index.
    ///
    /// # Examples
    ///
    /// ```
    /// use pathspace::{path, Path};
    ///
    /// assert_eq!(Path::parse("foo.bar[2].baz").unwrap(), path!("foo", "bar", 2, "baz"));
    /// assert_eq!(Path::parse("[0]").unwrap(), path!(0));
    /// assert!(Path::parse("").is_err());
    /// ```
    pub fn parse(input: &str) -> PathspaceResult<Path> {
        if input.is_empty() {
            return Err(PathspaceError::invalid_path("path must not be empty"));
        }
        let mut segments = Vec::new();
        for chunk in input.split(PATH_JOINER) {
            parse_chunk(chunk, &mut segments)?;
        }
        Ok(Path(segments))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "<root>")
        } else {
            write!(f, "{}", self.canonical())
        }
    }
}

impl FromIterator<Seg> for Path {
    fn from_iter<I: IntoIterator<Item = Seg>>(iter: I) -> Self {
        Path(iter.into_iter().collect())
    }
}

impl IntoIterator for Path {
    type Item = Seg;
    type IntoIter = std::vec::IntoIter<Seg>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Seg;
    type IntoIter = std::slice::Iter<'a, Seg>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::ops::Index<usize> for Path {
    type Output = Seg;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

fn parse_chunk(chunk: &str, out: &mut Vec<Seg>) -> PathspaceResult<()> {
    let (head, mut rest) = match chunk.find('[') {
        Some(pos) => chunk.split_at(pos),
        None => (chunk, ""),
    };
    if head.is_empty() && rest.is_empty() {
        return Err(PathspaceError::invalid_path("empty path segment"));
    }
    if !head.is_empty() {
        validate_key(head)?;
        out.push(Seg::key(head));
    }
    while !rest.is_empty() {
        let Some(close) = rest.find(']') else {
            return Err(PathspaceError::invalid_path(format!(
                "unterminated index in segment \"{chunk}\""
            )));
        };
        let digits = &rest[1..close];
        let index: usize = digits.parse().map_err(|_| {
            PathspaceError::invalid_path(format!("invalid array index \"{digits}\""))
        })?;
        out.push(Seg::index(index));
        rest = &rest[close + 1..];
        if !rest.is_empty() && !rest.starts_with('[') {
            return Err(PathspaceError::invalid_path(format!(
                "unexpected text after index in segment \"{chunk}\""
            )));
        }
    }
    Ok(())
}

fn validate_key(key: &str) -> PathspaceResult<()> {
    if key.contains(ACTION_SEPARATOR) {
        return Err(PathspaceError::invalid_path(format!(
            "path key \"{key}\" must not contain '{ACTION_SEPARATOR}'"
        )));
    }
    Ok(())
}

/// Validate an explicitly constructed segment sequence.
///
/// A key segment containing the path joiner is rejected as ambiguous: the
/// caller should pass separate segments instead of an embedded dotted
/// string.
pub(crate) fn validate_segments(path: &Path) -> PathspaceResult<()> {
    for seg in path.iter() {
        if let Seg::Key(k) = seg {
            if k.is_empty() {
                return Err(PathspaceError::invalid_path("empty path segment"));
            }
            if k.contains(PATH_JOINER) {
                return Err(PathspaceError::invalid_path(format!(
                    "path key \"{k}\" must not contain '{PATH_JOINER}'; pass separate segments"
                )));
            }
            validate_key(k)?;
        }
    }
    Ok(())
}

/// Loose path inputs accepted at the registration boundary.
///
/// Dotted strings are parsed, bare integers become a root-level index, and
/// explicit segment sequences are validated (a key containing `.` inside a
/// sequence is ambiguous and rejected). All conversion failures are
/// [`PathspaceError::InvalidPath`].
pub trait IntoPath {
    /// Convert into a validated [`Path`].
    fn into_path(self) -> PathspaceResult<Path>;
}

impl IntoPath for Path {
    fn into_path(self) -> PathspaceResult<Path> {
        validate_segments(&self)?;
        Ok(self)
    }
}

impl IntoPath for &Path {
    fn into_path(self) -> PathspaceResult<Path> {
        self.clone().into_path()
    }
}

impl IntoPath for &str {
    fn into_path(self) -> PathspaceResult<Path> {
        Path::parse(self)
    }
}

impl IntoPath for String {
    fn into_path(self) -> PathspaceResult<Path> {
        Path::parse(&self)
    }
}

impl IntoPath for usize {
    fn into_path(self) -> PathspaceResult<Path> {
        Ok(Path::root().index(self))
    }
}

impl IntoPath for Seg {
    fn into_path(self) -> PathspaceResult<Path> {
        Path::from_segments(vec![self]).into_path()
    }
}

impl IntoPath for Vec<Seg> {
    fn into_path(self) -> PathspaceResult<Path> {
        Path::from_segments(self).into_path()
    }
}

impl IntoPath for &[Seg] {
    fn into_path(self) -> PathspaceResult<Path> {
        Path::from_segments(self.to_vec()).into_path()
    }
}

/// Build a namespaced action type string.
///
/// The root (empty) path yields the bare action name; any other path yields
/// `canonical_key:action`.
pub fn action_type(path: &Path, action: &str) -> String {
    let key = path.canonical();
    if key.is_empty() {
        action.to_owned()
    } else {
        format!("{key}{ACTION_SEPARATOR}{action}")
    }
}

/// Split an action type string back into its owning path and action name.
///
/// Splits on the first `:`. A type with no separator belongs to the root
/// namespace, so encoding and decoding agree for every registered path.
///
/// # Examples
///
/// ```
/// use pathspace::{path, split_action_type};
///
/// let (owner, action) = split_action_type("foo.bar[2]:SET").unwrap();
/// assert_eq!(owner, path!("foo", "bar", 2));
/// assert_eq!(action, "SET");
///
/// let (owner, action) = split_action_type("INIT").unwrap();
/// assert!(owner.is_empty());
/// assert_eq!(action, "INIT");
/// ```
pub fn split_action_type(ty: &str) -> PathspaceResult<(Path, &str)> {
    match ty.split_once(ACTION_SEPARATOR) {
        None => Ok((Path::root(), ty)),
        Some(("", action)) => Ok((Path::root(), action)),
        Some((prefix, action)) => Ok((Path::parse(prefix)?, action)),
    }
}

/// Construct a [`Path`] from a sequence of segments.
///
/// # Examples
///
/// ```
/// use pathspace::path;
///
/// // String literals become Key segments
/// let p = path!("users", "alice", "email");
///
/// // Numbers become Index segments
/// let p = path!("items", 0, "name");
/// assert_eq!(p.canonical(), "items[0].name");
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::Path::root()
    };
    ($($seg:expr),+ $(,)?) => {{
        let mut p = $crate::Path::root();
        $(
            p.push($crate::Seg::from($seg));
        )+
        p
    }};
}

//! Composable get/set optics focused on a path into a JSON tree.
//!
//! An [`Optic`] is a pure getter/setter pair: `get` returns the focused
//! sub-value of a full state tree, `set` returns a new tree with only the
//! focused slot replaced. Optics compose by path concatenation, which makes
//! composition trivially associative.

use crate::path::{Path, Seg};
use serde_json::{Map, Value};

/// A composable get/set pair focused on one path.
///
/// # Examples
///
/// ```
/// use pathspace::Optic;
/// use serde_json::json;
///
/// let optic = Optic::for_key("user").then(&Optic::for_key("name"));
/// let state = json!({"user": {"name": "Alice", "age": 30}});
///
/// assert_eq!(optic.get(&state), json!("Alice"));
///
/// let next = optic.set(json!("Bob"), &state);
/// assert_eq!(next, json!({"user": {"name": "Bob", "age": 30}}));
/// assert_eq!(state["user"]["name"], "Alice"); // original untouched
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Optic {
    path: Path,
}

impl Optic {
    /// Optic focused on the root of the state tree.
    #[inline]
    pub fn root() -> Self {
        Self { path: Path::root() }
    }

    /// Primitive optic over one object key.
    #[inline]
    pub fn for_key(key: impl Into<String>) -> Self {
        Self {
            path: Path::root().key(key),
        }
    }

    /// Primitive optic over one array index.
    #[inline]
    pub fn for_index(index: usize) -> Self {
        Self {
            path: Path::root().index(index),
        }
    }

    /// Optic focused on an arbitrary path.
    #[inline]
    pub fn from_path(path: Path) -> Self {
        Self { path }
    }

    /// The focused path.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Compose two optics: the child focuses within the parent's focus.
    #[inline]
    pub fn compose(parent: &Optic, child: &Optic) -> Optic {
        Optic {
            path: parent.path.join(&child.path),
        }
    }

    /// Compose with a child optic (instance form of [`compose`](Optic::compose)).
    #[inline]
    pub fn then(&self, child: &Optic) -> Optic {
        Optic::compose(self, child)
    }

    /// Get the focused sub-value.
    ///
    /// Missing keys/indices or intermediate type mismatches yield
    /// `Value::Null` rather than an error.
    pub fn get(&self, state: &Value) -> Value {
        self.get_ref(state).cloned().unwrap_or(Value::Null)
    }

    /// Borrow the focused sub-value, if present.
    pub fn get_ref<'a>(&self, state: &'a Value) -> Option<&'a Value> {
        let mut current = state;
        for seg in self.path.iter() {
            current = match (seg, current) {
                (Seg::Key(k), Value::Object(map)) => map.get(k)?,
                (Seg::Index(i), Value::Array(items)) => items.get(*i)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Return a new tree with the focused slot replaced by `value`.
    ///
    /// Missing intermediate structure is created: a key segment
    /// materializes an object, an index segment materializes an array
    /// padded with `Null` up to the index. This allows deep paths to be
    /// registered before any state matching that shape exists. Everything
    /// outside the focused path is unchanged.
    pub fn set(&self, value: Value, state: &Value) -> Value {
        let mut out = state.clone();
        set_in(&mut out, self.path.segments(), value);
        out
    }
}

fn set_in(current: &mut Value, segments: &[Seg], value: Value) {
    match segments {
        [] => *current = value,
        [Seg::Key(key), rest @ ..] => {
            if !current.is_object() {
                *current = Value::Object(Map::new());
            }
            let obj = current.as_object_mut().expect("object ensured above");
            let entry = obj.entry(key.clone()).or_insert(Value::Null);
            set_in(entry, rest, value);
        }
        [Seg::Index(index), rest @ ..] => {
            if !current.is_array() {
                *current = Value::Array(Vec::new());
            }
            let arr = current.as_array_mut().expect("array ensured above");
            while arr.len() <= *index {
                arr.push(Value::Null);
            }
            set_in(&mut arr[*index], rest, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;
    use serde_json::json;

    #[test]
    fn test_get_walks_nested_structure() {
        let state = json!({"foo": {"bar": {"baz": [{"id": 1}, {"id": 2}]}}});
        let optic = Optic::from_path(path!("foo", "bar", "baz", 1, "id"));
        assert_eq!(optic.get(&state), json!(2));
    }

    #[test]
    fn test_get_missing_is_null() {
        let state = json!({"foo": 1});
        assert_eq!(Optic::for_key("bar").get(&state), Value::Null);
        assert_eq!(Optic::for_index(3).get(&state), Value::Null);
        assert_eq!(
            Optic::from_path(path!("foo", "nested")).get(&state),
            Value::Null
        );
    }

    #[test]
    fn test_set_replaces_only_focus() {
        let state = json!({"a": {"b": 1, "c": 2}, "d": 3});
        let optic = Optic::from_path(path!("a", "b"));
        let next = optic.set(json!(9), &state);
        assert_eq!(next, json!({"a": {"b": 9, "c": 2}, "d": 3}));
        assert_eq!(state["a"]["b"], 1);
    }

    #[test]
    fn test_set_creates_missing_objects() {
        let state = json!({});
        let optic = Optic::from_path(path!("a", "b", "c"));
        let next = optic.set(json!(42), &state);
        assert_eq!(next, json!({"a": {"b": {"c": 42}}}));
    }

    #[test]
    fn test_set_extends_missing_array() {
        let state = json!({});
        let optic = Optic::from_path(path!("items", 2));
        let next = optic.set(json!("x"), &state);
        assert_eq!(next, json!({"items": [null, null, "x"]}));
    }

    #[test]
    fn test_set_within_existing_array() {
        let state = json!({"items": [1, 2, 3]});
        let optic = Optic::from_path(path!("items", 1));
        let next = optic.set(json!(9), &state);
        assert_eq!(next, json!({"items": [1, 9, 3]}));
    }

    #[test]
    fn test_compose_associative() {
        let a = Optic::for_key("a");
        let b = Optic::for_key("b");
        let c = Optic::for_index(2);

        let left = a.then(&b).then(&c);
        let right = a.then(&b.then(&c));
        assert_eq!(left, right);
        assert_eq!(left.path(), &path!("a", "b", 2));
    }

    #[test]
    fn test_composed_get_set_thread_through_parent() {
        let parent = Optic::for_key("outer");
        let child = Optic::for_key("inner");
        let composed = parent.then(&child);

        let state = json!({"outer": {"inner": 1}, "sibling": true});
        assert_eq!(composed.get(&state), json!(1));

        let next = composed.set(json!(2), &state);
        assert_eq!(next, json!({"outer": {"inner": 2}, "sibling": true}));
    }

    #[test]
    fn test_root_optic() {
        let state = json!({"x": 1});
        let optic = Optic::root();
        assert_eq!(optic.get(&state), state);
        assert_eq!(optic.set(json!(5), &state), json!(5));
    }
}

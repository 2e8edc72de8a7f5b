//! Recursive namespace generation over an initial state tree.
//!
//! [`Pathspace::map_namespaces`] walks a state value and registers a
//! namespace at every node, returning a mirrored tree of handles. Arrays
//! (and strings, treated as character sequences) become
//! [`ArrayNamespace`]: the namespace for the whole sequence plus a lazy,
//! memoized per-index factory.

use crate::action::ActionCreator;
use crate::error::{value_type_name, PathspaceError, PathspaceResult};
use crate::namespace::Namespace;
use crate::path::Path;
use crate::registry::Pathspace;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

/// One node of the mirrored namespace tree.
#[derive(Clone, Debug)]
pub enum MappedNode {
    /// An object-shaped node: its own namespace plus one child per field.
    Object(MappedObject),
    /// An array- or string-shaped node.
    Array(ArrayNamespace),
    /// A primitive leaf.
    Leaf(Namespace),
}

impl MappedNode {
    /// The namespace registered at this node, if any.
    ///
    /// Only the empty-root object node carries no namespace.
    pub fn namespace(&self) -> Option<&Namespace> {
        match self {
            MappedNode::Object(obj) => obj.namespace(),
            MappedNode::Array(arr) => Some(arr.namespace()),
            MappedNode::Leaf(ns) => Some(ns),
        }
    }

    /// Child node for an object field.
    pub fn child(&self, key: &str) -> Option<&MappedNode> {
        match self {
            MappedNode::Object(obj) => obj.child(key),
            _ => None,
        }
    }

    /// This node as an array namespace.
    pub fn as_array(&self) -> Option<&ArrayNamespace> {
        match self {
            MappedNode::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// This node as an object.
    pub fn as_object(&self) -> Option<&MappedObject> {
        match self {
            MappedNode::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Read this node's focused slice out of a full state value.
    pub fn examine(&self, state: &Value) -> Value {
        match self {
            MappedNode::Array(arr) => arr.examine(state),
            other => other
                .namespace()
                .map(|ns| ns.examine(state))
                .unwrap_or(Value::Null),
        }
    }
}

/// Mirrored object node: namespace for the object itself plus children.
#[derive(Clone, Debug)]
pub struct MappedObject {
    namespace: Option<Namespace>,
    children: HashMap<String, MappedNode>,
}

impl MappedObject {
    /// Namespace registered for the object itself.
    ///
    /// `None` only for an empty object mapped at the root path, which is
    /// left unregistered so a later explicit root registration does not
    /// collide.
    pub fn namespace(&self) -> Option<&Namespace> {
        self.namespace.as_ref()
    }

    /// Child node for a field.
    pub fn child(&self, key: &str) -> Option<&MappedNode> {
        self.children.get(key)
    }

    /// Iterate over the mapped children.
    pub fn children(&self) -> impl Iterator<Item = (&String, &MappedNode)> {
        self.children.iter()
    }

    /// Number of mapped children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether this node has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

struct ArrayInner {
    registry: Pathspace,
    namespace: Namespace,
    /// Element shape per-index namespaces are mapped over: the first
    /// object- or array-shaped element of the source sequence.
    template: Option<Value>,
    is_string: bool,
    by_index: Mutex<HashMap<usize, MappedNode>>,
}

/// Namespace for a whole sequence plus a per-index namespace factory.
///
/// `at(i)` lazily registers (and memoizes) a namespace for element `i`,
/// recursively mapped over the sequence's element template. For string
/// targets, [`examine`](ArrayNamespace::examine) concatenates the
/// per-index values back into a string.
#[derive(Clone)]
pub struct ArrayNamespace {
    inner: Arc<ArrayInner>,
}

impl ArrayNamespace {
    fn new(
        registry: Pathspace,
        path: Path,
        template: Option<Value>,
        is_string: bool,
    ) -> PathspaceResult<Self> {
        let namespace = registry.register_path(path)?;
        Ok(Self {
            inner: Arc::new(ArrayInner {
                registry,
                namespace,
                template,
                is_string,
                by_index: Mutex::new(HashMap::new()),
            }),
        })
    }

    /// The namespace for the sequence as a whole.
    #[inline]
    pub fn namespace(&self) -> &Namespace {
        &self.inner.namespace
    }

    /// Canonical registry key of the whole-sequence namespace.
    #[inline]
    pub fn key(&self) -> &str {
        self.inner.namespace.key()
    }

    /// Namespace node for element `index`.
    ///
    /// The first call for an index registers the namespace (mapped over
    /// the element template when the sequence has object/array elements);
    /// later calls return the memoized node.
    pub fn at(&self, index: usize) -> PathspaceResult<MappedNode> {
        let mut memo = self
            .inner
            .by_index
            .lock()
            .expect("array namespace mutex poisoned");
        if let Some(node) = memo.get(&index) {
            return Ok(node.clone());
        }
        let elem_path = self.inner.namespace.path().clone().index(index);
        let node = match &self.inner.template {
            Some(template) => self.inner.registry.map_node(template, elem_path)?,
            None => MappedNode::Leaf(self.inner.registry.register_path(elem_path)?),
        };
        memo.insert(index, node.clone());
        Ok(node)
    }

    /// Read the whole sequence out of a full state value.
    ///
    /// For string-mapped namespaces the currently held per-index values
    /// are concatenated back into a string.
    pub fn examine(&self, state: &Value) -> Value {
        let value = self.inner.namespace.examine(state);
        if !self.inner.is_string {
            return value;
        }
        match value {
            Value::String(s) => Value::String(s),
            Value::Array(items) => Value::String(items.iter().map(fragment).collect()),
            other => other,
        }
    }

    /// Register an action on the whole-sequence namespace with the default
    /// overwrite reducer.
    pub fn map_action(&self, action: &str) -> PathspaceResult<ActionCreator> {
        self.inner.namespace.map_action(action)
    }

    /// Register an action on the whole-sequence namespace.
    pub fn map_action_to_reducer<F>(&self, action: &str, reducer: F) -> PathspaceResult<ActionCreator>
    where
        F: Fn(&Value, &Value, &Value) -> Value + Send + Sync + 'static,
    {
        self.inner.namespace.map_action_to_reducer(action, reducer)
    }

    /// Register an action on the whole-sequence namespace with a meta
    /// object.
    pub fn map_action_to_reducer_with_meta<F>(
        &self,
        action: &str,
        reducer: F,
        meta: Value,
    ) -> PathspaceResult<ActionCreator>
    where
        F: Fn(&Value, &Value, &Value) -> Value + Send + Sync + 'static,
    {
        self.inner
            .namespace
            .map_action_to_reducer_with_meta(action, reducer, meta)
    }
}

impl fmt::Debug for ArrayNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayNamespace")
            .field("key", &self.inner.namespace.key())
            .field("is_string", &self.inner.is_string)
            .finish()
    }
}

fn fragment(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl Pathspace {
    /// Walk an initial-state value and register a namespace at every node.
    ///
    /// Objects map recursively field by field; arrays and strings become
    /// [`ArrayNamespace`] factories; primitive fields become leaf
    /// namespaces. Fails with [`PathspaceError::UnmappableTarget`] for any
    /// other top-level value.
    ///
    /// # Examples
    ///
    /// ```
    /// use pathspace::Pathspace;
    /// use serde_json::json;
    ///
    /// let space = Pathspace::new();
    /// let state = json!({"a": [1, 2, 3]});
    /// let mapped = space.map_namespaces(&state).unwrap();
    ///
    /// let a = mapped.child("a").unwrap().as_array().unwrap();
    /// assert_eq!(a.examine(&state), json!([1, 2, 3]));
    /// assert_eq!(a.at(1).unwrap().examine(&state), json!(2));
    /// ```
    pub fn map_namespaces(&self, target: &Value) -> PathspaceResult<MappedNode> {
        match target {
            Value::Object(_) | Value::Array(_) | Value::String(_) => {
                self.map_node(target, Path::root())
            }
            other => Err(PathspaceError::unmappable(value_type_name(other))),
        }
    }

    pub(crate) fn map_node(&self, target: &Value, path: Path) -> PathspaceResult<MappedNode> {
        match target {
            Value::Object(map) => {
                if path.is_empty() && map.is_empty() {
                    // Leave the root unclaimed so explicit registrations can
                    // still take it.
                    return Ok(MappedNode::Object(MappedObject {
                        namespace: None,
                        children: HashMap::new(),
                    }));
                }
                let namespace = self.register_path(path.clone())?;
                let mut children = HashMap::new();
                for (key, value) in map {
                    let child_path = path.clone().key(key.clone());
                    let node = match value {
                        Value::Object(_) | Value::Array(_) => self.map_node(value, child_path)?,
                        _ => MappedNode::Leaf(self.register_path(child_path)?),
                    };
                    children.insert(key.clone(), node);
                }
                Ok(MappedNode::Object(MappedObject {
                    namespace: Some(namespace),
                    children,
                }))
            }
            Value::Array(items) => {
                let template = items
                    .iter()
                    .find(|v| v.is_object() || v.is_array())
                    .cloned();
                Ok(MappedNode::Array(ArrayNamespace::new(
                    self.clone(),
                    path,
                    template,
                    false,
                )?))
            }
            Value::String(_) => Ok(MappedNode::Array(ArrayNamespace::new(
                self.clone(),
                path,
                None,
                true,
            )?)),
            _ => Ok(MappedNode::Leaf(self.register_path(path)?)),
        }
    }
}

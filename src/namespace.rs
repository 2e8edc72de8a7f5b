//! Namespace handles: one optic plus one table of locally-scoped actions.

use crate::action::ActionCreator;
use crate::error::{value_type_name, PathspaceError, PathspaceResult};
use crate::optic::Optic;
use crate::path::{action_type, Path};
use crate::registry::{Pathspace, WrappedReducer};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// User reducer shape: `(focused slice, payload, full state) -> new slice`.
pub type ReducerFn = Arc<dyn Fn(&Value, &Value, &Value) -> Value + Send + Sync>;

/// The unit of registration: one optic plus one action table slot in the
/// registry.
///
/// Handles are cheap to clone; the registry remains the sole writer of the
/// underlying action table.
#[derive(Clone)]
pub struct Namespace {
    registry: Pathspace,
    optic: Optic,
    key: String,
}

impl Namespace {
    pub(crate) fn new(registry: Pathspace, optic: Optic) -> Self {
        let key = optic.path().canonical();
        Self {
            registry,
            optic,
            key,
        }
    }

    /// Canonical registry key for this namespace.
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The path this namespace is registered at.
    #[inline]
    pub fn path(&self) -> &Path {
        self.optic.path()
    }

    /// The optic focused on this namespace's slice.
    #[inline]
    pub fn optic(&self) -> &Optic {
        &self.optic
    }

    pub(crate) fn registry(&self) -> &Pathspace {
        &self.registry
    }

    /// Read this namespace's focused slice out of a full state value.
    pub fn examine(&self, state: &Value) -> Value {
        self.optic.get(state)
    }

    /// The namespaced type string a given action name produces.
    pub fn action_type(&self, action: &str) -> String {
        action_type(self.path(), action)
    }

    /// Register an action with the default overwrite reducer.
    ///
    /// Dispatching the produced action replaces the focused slice with the
    /// action payload.
    pub fn map_action(&self, action: &str) -> PathspaceResult<ActionCreator> {
        self.map_action_to_reducer(action, crate::reducers::overwrite)
    }

    /// Register an action name with a reducer over this namespace's slice.
    ///
    /// The reducer receives `(focused slice, payload, full state)` and
    /// returns the new slice; the write-back through the optic is handled
    /// here. Fails with [`PathspaceError::DuplicateAction`] if the name is
    /// already registered for this namespace.
    ///
    /// # Examples
    ///
    /// ```
    /// use pathspace::Pathspace;
    /// use serde_json::json;
    ///
    /// let space = Pathspace::new();
    /// let ns = space.create_namespace("counter").unwrap();
    /// let bump = ns
    ///     .map_action_to_reducer("BUMP", |slice, payload, _state| {
    ///         json!(slice.as_i64().unwrap_or(0) + payload.as_i64().unwrap_or(0))
    ///     })
    ///     .unwrap();
    ///
    /// let reducer = space.create_reducer(json!({"counter": 0}));
    /// let state = json!({"counter": 1});
    /// let next = reducer.reduce(Some(&state), &bump.of(json!(2)).unwrap());
    /// assert_eq!(next, json!({"counter": 3}));
    /// ```
    pub fn map_action_to_reducer<F>(&self, action: &str, reducer: F) -> PathspaceResult<ActionCreator>
    where
        F: Fn(&Value, &Value, &Value) -> Value + Send + Sync + 'static,
    {
        self.register_action(action, Arc::new(reducer), Map::new())
    }

    /// Like [`map_action_to_reducer`](Namespace::map_action_to_reducer),
    /// attaching a meta object to every produced action.
    ///
    /// Fails with [`PathspaceError::InvalidMeta`] if `meta` is not a JSON
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
        let meta = match meta {
            Value::Object(map) => map,
            other => return Err(PathspaceError::invalid_meta(value_type_name(&other))),
        };
        self.register_action(action, Arc::new(reducer), meta)
    }

    fn register_action(
        &self,
        action: &str,
        reducer: ReducerFn,
        meta: Map<String, Value>,
    ) -> PathspaceResult<ActionCreator> {
        let optic = self.optic.clone();
        let wrapped: WrappedReducer = Arc::new(move |state, payload| {
            let slice = optic.get(state);
            let updated = reducer(&slice, payload, state);
            optic.set(updated, state)
        });
        self.registry.insert_action(&self.key, action, wrapped)?;
        tracing::debug!(namespace = %self.key, action, "registered action");
        Ok(ActionCreator::new(
            self.registry.clone(),
            self.action_type(action),
            meta,
        ))
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Namespace").field("key", &self.key).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;
    use serde_json::json;

    #[test]
    fn test_examine_equals_manual_indexing() {
        let space = Pathspace::new();
        let ns = space.create_namespace(path!("foo", "bar", 1)).unwrap();
        let state = json!({"foo": {"bar": [10, 20, 30]}});
        assert_eq!(ns.examine(&state), state["foo"]["bar"][1]);
    }

    #[test]
    fn test_action_type_for_namespaced_and_root() {
        let space = Pathspace::new();
        let ns = space.create_namespace("foo.bar").unwrap();
        assert_eq!(ns.action_type("SET"), "foo.bar:SET");

        let root = space.create_namespace(Path::root()).unwrap();
        assert_eq!(root.action_type("INIT"), "INIT");
    }

    #[test]
    fn test_duplicate_action_name_fails() {
        let space = Pathspace::new();
        let ns = space.create_namespace("foo").unwrap();
        ns.map_action("FOO").unwrap();
        let err = ns.map_action("FOO").unwrap_err();
        assert!(matches!(err, PathspaceError::DuplicateAction { .. }));
    }

    #[test]
    fn test_same_action_name_in_sibling_namespaces() {
        let space = Pathspace::new();
        let a = space.create_namespace("a").unwrap();
        let b = space.create_namespace("b").unwrap();
        a.map_action("SET").unwrap();
        b.map_action("SET").unwrap();
    }

    #[test]
    fn test_meta_must_be_object() {
        let space = Pathspace::new();
        let ns = space.create_namespace("foo").unwrap();
        let err = ns
            .map_action_to_reducer_with_meta("SET", crate::reducers::overwrite, json!([1, 2]))
            .unwrap_err();
        assert!(matches!(err, PathspaceError::InvalidMeta { found: "array" }));

        let creator = ns
            .map_action_to_reducer_with_meta("OK", crate::reducers::overwrite, json!({"tag": 1}))
            .unwrap();
        let action = creator.of(json!("x")).unwrap();
        assert_eq!(action.meta.get("tag"), Some(&json!(1)));
    }
}

//! The namespace registry: canonical path key to action table.
//!
//! A [`Pathspace`] is an explicit registry instance rather than hidden
//! module state, so tests and embedders can create isolated registries.
//! Registration is expected to fully precede dispatch (single writer, then
//! many readers); the interior locks exist only so handles are `Send`.

use crate::action::ActionCreator;
use crate::error::{PathspaceError, PathspaceResult};
use crate::namespace::Namespace;
use crate::optic::Optic;
use crate::path::{IntoPath, Path};
use crate::reducer::RootReducer;
use crate::store::{ActionCreatorMap, AttachedStore, Store};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

/// Routing-ready reducer stored in an action table:
/// `(full state, payload) -> full state`.
pub(crate) type WrappedReducer = Arc<dyn Fn(&Value, &Value) -> Value + Send + Sync>;

/// Local action name -> wrapped reducer; owned exclusively by one namespace.
pub(crate) type ActionTable = HashMap<String, WrappedReducer>;

struct Inner {
    namespaces: Mutex<HashMap<String, ActionTable>>,
    store: Mutex<Option<AttachedStore>>,
}

/// Registry of namespaces over one state tree.
///
/// Cloning is cheap and clones share the registry. Each canonical path key
/// registers at most once for the registry's lifetime, and action names
/// are unique within their namespace.
///
/// # Examples
///
/// ```
/// use pathspace::Pathspace;
/// use serde_json::json;
///
/// let space = Pathspace::new();
/// let ns = space.create_namespace("user.name").unwrap();
/// let rename = ns.map_action("RENAME").unwrap();
///
/// let reducer = space.create_reducer(json!({"user": {"name": ""}}));
/// let state = json!({"user": {"name": "Alice", "id": 7}});
/// let next = reducer.reduce(Some(&state), &rename.of(json!("Bob")).unwrap());
///
/// assert_eq!(next, json!({"user": {"name": "Bob", "id": 7}}));
/// ```
#[derive(Clone)]
pub struct Pathspace {
    inner: Arc<Inner>,
}

impl Pathspace {
    /// Create a fresh, isolated registry.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                namespaces: Mutex::new(HashMap::new()),
                store: Mutex::new(None),
            }),
        }
    }

    /// Register a namespace at a path.
    ///
    /// Accepts a dotted string (`"a.b.c"`), an explicit segment sequence
    /// (see [`path!`](crate::path!)), or a bare integer (root-level index).
    /// Fails with [`PathspaceError::DuplicateNamespace`] if the canonical
    /// key is already taken; the registry is left untouched on failure.
    pub fn create_namespace(&self, path: impl IntoPath) -> PathspaceResult<Namespace> {
        let path = path.into_path()?;
        self.register_path(path)
    }

    /// Register a namespace nested under a previously registered parent.
    ///
    /// The child optic composes through the parent's, and the duplicate
    /// check runs against the fully composed canonical key. Fails with
    /// [`PathspaceError::InvalidParentNamespace`] if `parent` belongs to a
    /// different registry instance.
    pub fn create_namespace_under(
        &self,
        path: impl IntoPath,
        parent: &Namespace,
    ) -> PathspaceResult<Namespace> {
        if !self.same_registry(parent.registry()) {
            return Err(PathspaceError::InvalidParentNamespace);
        }
        let sub = path.into_path()?;
        self.register_path(parent.path().join(&sub))
    }

    /// Look up the namespace registered at a path, if any.
    pub fn lookup(&self, path: impl IntoPath) -> PathspaceResult<Option<Namespace>> {
        let path = path.into_path()?;
        let key = path.canonical();
        let tables = self.lock_tables();
        Ok(tables
            .contains_key(&key)
            .then(|| Namespace::new(self.clone(), Optic::from_path(path))))
    }

    /// Build the root reducer with an initial/default state value.
    ///
    /// The reducer returns `initial` whenever it is called without a state
    /// (the host store's first dispatch).
    pub fn create_reducer(&self, initial: impl Into<Value>) -> RootReducer {
        RootReducer::new(self.clone(), initial.into())
    }

    /// Build the root reducer from a zero-argument initial-state factory.
    ///
    /// The factory is invoked once, here.
    pub fn create_reducer_with<F>(&self, initial: F) -> RootReducer
    where
        F: FnOnce() -> Value,
    {
        RootReducer::new(self.clone(), initial())
    }

    /// Attach the host store and the creators side effects may dispatch.
    ///
    /// Phase three of initialization: register namespaces, build the
    /// reducer and the store, then attach the store back here so
    /// store-dependent side effects can run.
    pub fn attach_store(&self, store: Arc<dyn Store>, creators: ActionCreatorMap) {
        let mut slot = self.inner.store.lock().expect("store mutex poisoned");
        *slot = Some(AttachedStore { store, creators });
        tracing::debug!("store attached");
    }

    pub(crate) fn same_registry(&self, other: &Pathspace) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn register_path(&self, path: Path) -> PathspaceResult<Namespace> {
        let key = path.canonical();
        let mut tables = self.lock_tables();
        if tables.contains_key(&key) {
            return Err(PathspaceError::duplicate_namespace(key));
        }
        tables.insert(key.clone(), ActionTable::new());
        drop(tables);
        tracing::debug!(namespace = %key, "registered namespace");
        Ok(Namespace::new(self.clone(), Optic::from_path(path)))
    }

    pub(crate) fn insert_action(
        &self,
        key: &str,
        action: &str,
        reducer: WrappedReducer,
    ) -> PathspaceResult<()> {
        let mut tables = self.lock_tables();
        let table = tables
            .get_mut(key)
            .expect("action table missing for registered namespace");
        if table.contains_key(action) {
            return Err(PathspaceError::duplicate_action(key, action));
        }
        table.insert(action.to_owned(), reducer);
        Ok(())
    }

    pub(crate) fn wrapped_reducer(&self, key: &str, action: &str) -> Option<WrappedReducer> {
        let tables = self.lock_tables();
        tables.get(key).and_then(|table| table.get(action)).cloned()
    }

    pub(crate) fn store_attached(&self) -> bool {
        self.inner
            .store
            .lock()
            .expect("store mutex poisoned")
            .is_some()
    }

    pub(crate) fn attached_store(&self) -> Option<Arc<dyn Store>> {
        self.inner
            .store
            .lock()
            .expect("store mutex poisoned")
            .as_ref()
            .map(|attached| attached.store.clone())
    }

    pub(crate) fn attached_creator(&self, action_type: &str) -> Option<ActionCreator> {
        self.inner
            .store
            .lock()
            .expect("store mutex poisoned")
            .as_ref()
            .and_then(|attached| attached.creators.get(action_type).cloned())
    }

    fn lock_tables(&self) -> std::sync::MutexGuard<'_, HashMap<String, ActionTable>> {
        self.inner
            .namespaces
            .lock()
            .expect("registry mutex poisoned")
    }
}

impl Default for Pathspace {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Pathspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tables = self.lock_tables();
        f.debug_struct("Pathspace")
            .field("namespaces", &tables.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;

    #[test]
    fn test_distinct_paths_register() {
        let space = Pathspace::new();
        space.create_namespace("foo").unwrap();
        space.create_namespace("foo.bar.baz").unwrap();
        space.create_namespace(path!("foo", 2)).unwrap();
        space.create_namespace(0usize).unwrap();
    }

    #[test]
    fn test_duplicate_path_fails() {
        let space = Pathspace::new();
        space.create_namespace("foo").unwrap();
        let err = space.create_namespace("foo").unwrap_err();
        assert!(matches!(err, PathspaceError::DuplicateNamespace { key } if key == "foo"));
    }

    #[test]
    fn test_duplicate_across_encodings() {
        // A dotted string and the equivalent segment sequence collide.
        let space = Pathspace::new();
        space.create_namespace("foo.bar").unwrap();
        let err = space.create_namespace(path!("foo", "bar")).unwrap_err();
        assert!(matches!(err, PathspaceError::DuplicateNamespace { .. }));
    }

    #[test]
    fn test_registries_are_isolated() {
        let a = Pathspace::new();
        let b = Pathspace::new();
        a.create_namespace("foo").unwrap();
        b.create_namespace("foo").unwrap();
    }

    #[test]
    fn test_lookup() {
        let space = Pathspace::new();
        space.create_namespace("foo.bar").unwrap();
        let found = space.lookup("foo.bar").unwrap();
        assert_eq!(found.unwrap().key(), "foo.bar");
        assert!(space.lookup("foo.baz").unwrap().is_none());
    }

    #[test]
    fn test_parent_composition() {
        let space = Pathspace::new();
        let parent = space.create_namespace("a").unwrap();
        let child = space.create_namespace_under("b", &parent).unwrap();
        assert_eq!(child.key(), "a.b");
    }

    #[test]
    fn test_parent_from_other_registry_rejected() {
        let a = Pathspace::new();
        let b = Pathspace::new();
        let parent = a.create_namespace("x").unwrap();
        let err = b.create_namespace_under("y", &parent).unwrap_err();
        assert!(matches!(err, PathspaceError::InvalidParentNamespace));
    }

    #[test]
    fn test_composed_duplicate_checked_on_full_path() {
        let space = Pathspace::new();
        let parent = space.create_namespace("a").unwrap();
        space.create_namespace_under("b", &parent).unwrap();
        let err = space.create_namespace("a.b").unwrap_err();
        assert!(matches!(err, PathspaceError::DuplicateNamespace { key } if key == "a.b"));
    }

    #[test]
    fn test_invalid_path_rejected() {
        let space = Pathspace::new();
        assert!(space.create_namespace("").is_err());
        assert!(space.create_namespace(path!("foo.bar", 1)).is_err());
    }
}

//! Path-addressed namespaces, optics, and action routing over JSON state.
//!
//! `pathspace` lets callers declare named namespaces at paths into a nested
//! JSON state tree, attach named actions (with reducer functions) to each
//! namespace, and builds action creators plus a single root reducer that
//! routes every dispatched action to the owning namespace's reducer —
//! applying it only to the addressed sub-tree and leaving the rest of the
//! state untouched.
//!
//! # Core Concepts
//!
//! - **Path** / **Seg**: ordered key/index segments addressing a location;
//!   canonicalized to a string key like `foo.bar[2].baz`
//! - **Optic**: composable get/set pair focused on one path
//! - **Pathspace**: explicit registry of namespaces (no hidden globals)
//! - **Namespace**: one optic plus one table of locally-scoped actions
//! - **ActionCreator**: produces `{type, payload, meta}` action records
//! - **RootReducer**: decodes action types and routes to the owner
//! - **map_namespaces**: auto-generates a mirrored namespace tree from an
//!   initial state value
//!
//! # Quick Start
//!
//! ```
//! use pathspace::{path, Pathspace};
//! use serde_json::json;
//!
//! let space = Pathspace::new();
//!
//! // Register a namespace deep in the tree and attach an action.
//! let ns = space.create_namespace(path!("foo", "bar", "baz", 0)).unwrap();
//! let rename = ns
//!     .map_action_to_reducer("RENAME", |slice, payload, _state| {
//!         let mut item = slice.as_object().cloned().unwrap_or_default();
//!         item.insert("name".into(), payload.clone());
//!         item.into()
//!     })
//!     .unwrap();
//!
//! // Build the root reducer and dispatch.
//! let reducer = space.create_reducer(json!({}));
//! let state = json!({"foo": {"bar": {"baz": [{"id": 1, "name": "x"}]}}});
//! let action = rename.of(json!("y")).unwrap();
//! assert_eq!(action.action_type, "foo.bar.baz[0]:RENAME");
//!
//! let next = reducer.reduce(Some(&state), &action);
//! assert_eq!(next["foo"]["bar"]["baz"][0]["name"], "y");
//! assert_eq!(next["foo"]["bar"]["baz"][0]["id"], 1);
//! ```
//!
//! # Two-phase store attachment
//!
//! Namespaces must exist before the host store (the store needs the root
//! reducer), but side effects may need the store. Initialization is
//! therefore explicit: register everything and build the reducer, construct
//! the store, then call [`Pathspace::attach_store`]. A side effect that
//! reaches for the store earlier fails with
//! [`PathspaceError::StoreNotAttached`].

mod action;
mod error;
mod mapper;
mod namespace;
mod optic;
mod path;
mod reducer;
pub mod reducers;
mod registry;
mod store;

pub use action::{Action, ActionCreator, SideEffectFn};
pub use error::{value_type_name, PathspaceError, PathspaceResult};
pub use mapper::{ArrayNamespace, MappedNode, MappedObject};
pub use namespace::{Namespace, ReducerFn};
pub use optic::Optic;
pub use path::{
    action_type, split_action_type, IntoPath, Path, Seg, ACTION_SEPARATOR, PATH_JOINER,
};
pub use reducer::RootReducer;
pub use registry::Pathspace;
pub use store::{ActionCreatorMap, Store, StoreContext};

// Re-export serde_json::Value for convenience
pub use serde_json::Value;

//! External store attachment for dispatch-capable side effects.
//!
//! The registry and its namespaces must exist before the host store can be
//! built (the store needs the root reducer), while some side effects need
//! the store. [`Pathspace::attach_store`](crate::Pathspace::attach_store)
//! resolves this with an explicit late-binding step: (1) register all
//! namespaces and build the root reducer, (2) construct the store, (3)
//! attach the store back. Side effects reaching for the store before step
//! (3) fail with [`PathspaceError::StoreNotAttached`].

use crate::action::{Action, ActionCreator};
use crate::error::{PathspaceError, PathspaceResult};
use crate::registry::Pathspace;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Minimal contract a host state container must satisfy.
///
/// Any dispatcher that calls a `(state, action) -> state` reducer on every
/// dispatched action and holds the latest returned state can implement
/// this.
pub trait Store: Send + Sync {
    /// Dispatch an action through the host store.
    fn dispatch(&self, action: Action);

    /// Current state held by the host store.
    fn get_state(&self) -> Value;
}

/// Action creators shared with side effects, keyed by action type.
pub type ActionCreatorMap = HashMap<String, ActionCreator>;

pub(crate) struct AttachedStore {
    pub(crate) store: Arc<dyn Store>,
    pub(crate) creators: ActionCreatorMap,
}

/// Late-bound view of the attached store, handed to side effects.
///
/// All accessors fail with [`PathspaceError::StoreNotAttached`] until
/// `attach_store` has run.
pub struct StoreContext<'a> {
    registry: &'a Pathspace,
}

impl<'a> StoreContext<'a> {
    pub(crate) fn new(registry: &'a Pathspace) -> Self {
        Self { registry }
    }

    /// Whether a store has been attached yet.
    pub fn is_attached(&self) -> bool {
        self.registry.store_attached()
    }

    /// Dispatch an action through the attached store.
    pub fn dispatch(&self, action: Action) -> PathspaceResult<()> {
        let store = self
            .registry
            .attached_store()
            .ok_or(PathspaceError::StoreNotAttached)?;
        store.dispatch(action);
        Ok(())
    }

    /// Read the attached store's current state.
    pub fn state(&self) -> PathspaceResult<Value> {
        let store = self
            .registry
            .attached_store()
            .ok_or(PathspaceError::StoreNotAttached)?;
        Ok(store.get_state())
    }

    /// Look up a sibling action creator by its action type.
    ///
    /// Lets one namespace's side effect dispatch another namespace's
    /// actions. Returns `Ok(None)` for an unknown type.
    pub fn creator(&self, action_type: &str) -> PathspaceResult<Option<ActionCreator>> {
        if !self.registry.store_attached() {
            return Err(PathspaceError::StoreNotAttached);
        }
        Ok(self.registry.attached_creator(action_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_context_before_attachment() {
        let space = Pathspace::new();
        let ctx = StoreContext::new(&space);
        assert!(!ctx.is_attached());
        assert!(matches!(
            ctx.dispatch(Action::new("x", json!(1))),
            Err(PathspaceError::StoreNotAttached)
        ));
        assert!(matches!(ctx.state(), Err(PathspaceError::StoreNotAttached)));
        assert!(matches!(
            ctx.creator("x"),
            Err(PathspaceError::StoreNotAttached)
        ));
    }
}

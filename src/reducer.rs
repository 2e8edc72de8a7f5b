//! Root reducer: routes dispatched actions to the owning namespace.

use crate::action::Action;
use crate::path::split_action_type;
use crate::registry::Pathspace;
use serde_json::Value;

/// Reducer over the whole state tree.
///
/// Decodes each action's type to find the owning namespace and applies the
/// registered reducer to the focused slice only; unknown action types pass
/// state through unchanged, so this composes with other reducers that may
/// see the same actions.
#[derive(Clone, Debug)]
pub struct RootReducer {
    registry: Pathspace,
    initial: Value,
}

impl RootReducer {
    pub(crate) fn new(registry: Pathspace, initial: Value) -> Self {
        Self { registry, initial }
    }

    /// The initial state returned when reducing without a current state.
    #[inline]
    pub fn initial(&self) -> &Value {
        &self.initial
    }

    /// Reduce one action.
    ///
    /// `state == None` (the host store's first call) yields the initial
    /// state regardless of the action. Otherwise the action type is
    /// decoded and routed; a type owned by no registered namespace or
    /// action is a silent no-op.
    pub fn reduce(&self, state: Option<&Value>, action: &Action) -> Value {
        let Some(state) = state else {
            return self.initial.clone();
        };
        let Ok((owner, name)) = split_action_type(&action.action_type) else {
            tracing::debug!(action = %action.action_type, "unroutable action type, passing state through");
            return state.clone();
        };
        match self.registry.wrapped_reducer(&owner.canonical(), name) {
            Some(wrapped) => wrapped(state, &action.payload),
            None => state.clone(),
        }
    }

    /// Consume into a plain `(state, action) -> state` closure for hosts
    /// that take reducer functions.
    pub fn into_fn(self) -> impl Fn(Option<&Value>, &Action) -> Value {
        move |state, action| self.reduce(state, action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_initial_state_when_state_absent() {
        let space = Pathspace::new();
        let reducer = space.create_reducer(json!("foo"));
        let out = reducer.reduce(None, &Action::new("anything", Value::Null));
        assert_eq!(out, json!("foo"));
    }

    #[test]
    fn test_initial_state_factory_invoked_once() {
        let space = Pathspace::new();
        let reducer = space.create_reducer_with(|| json!({"count": 0}));
        assert_eq!(reducer.initial(), &json!({"count": 0}));
        let out = reducer.reduce(None, &Action::new("x", Value::Null));
        assert_eq!(out, json!({"count": 0}));
    }

    #[test]
    fn test_unknown_action_passes_state_through() {
        let space = Pathspace::new();
        let reducer = space.create_reducer(json!({}));
        let state = json!({"a": [1, 2], "b": {"c": true}});
        let out = reducer.reduce(Some(&state), &Action::new("nonexistent", json!(1)));
        assert_eq!(out, state);
    }

    #[test]
    fn test_malformed_type_passes_state_through() {
        let space = Pathspace::new();
        let reducer = space.create_reducer(json!({}));
        let state = json!({"a": 1});
        let out = reducer.reduce(Some(&state), &Action::new("a[x:SET", json!(2)));
        assert_eq!(out, state);
    }

    #[test]
    fn test_routes_to_registered_reducer() {
        let space = Pathspace::new();
        let ns = space.create_namespace("a.b").unwrap();
        let set = ns.map_action("SET").unwrap();
        let reducer = space.create_reducer(json!({}));

        let state = json!({"a": {"b": 1, "c": 2}});
        let out = reducer.reduce(Some(&state), &set.of(json!(9)).unwrap());
        assert_eq!(out, json!({"a": {"b": 9, "c": 2}}));
    }

    #[test]
    fn test_root_namespace_actions_route() {
        let space = Pathspace::new();
        let root = space.create_namespace(crate::Path::root()).unwrap();
        let replace = root.map_action("REPLACE").unwrap();
        assert_eq!(replace.action_type(), "REPLACE");

        let reducer = space.create_reducer(json!({}));
        let state = json!({"old": true});
        let out = reducer.reduce(Some(&state), &replace.of(json!({"new": true})).unwrap());
        assert_eq!(out, json!({"new": true}));
    }

    #[test]
    fn test_into_fn() {
        let space = Pathspace::new();
        let reduce = space.create_reducer(json!(0)).into_fn();
        assert_eq!(reduce(None, &Action::new("x", Value::Null)), json!(0));
    }
}

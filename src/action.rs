//! Action records and action creators.
//!
//! An [`Action`] is the `{type, payload, meta}` triple consumed by the root
//! reducer. An [`ActionCreator`] is a cheap-clone handle that produces
//! actions of one registered type; its payload computation can be replaced
//! in place with [`ActionCreator::with_side_effect`].

use crate::error::PathspaceResult;
use crate::registry::Pathspace;
use crate::store::StoreContext;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::{Arc, Mutex};

/// A dispatched action record.
///
/// `type` is `<canonical key>:<action name>` for namespaced actions and the
/// bare action name for the root namespace.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Namespaced action type string.
    #[serde(rename = "type")]
    pub action_type: String,
    /// Action payload.
    #[serde(default)]
    pub payload: Value,
    /// Free-form metadata attached at action-definition time.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub meta: Map<String, Value>,
}

impl Action {
    /// Create an action with an empty meta map.
    pub fn new(action_type: impl Into<String>, payload: impl Into<Value>) -> Self {
        Self {
            action_type: action_type.into(),
            payload: payload.into(),
            meta: Map::new(),
        }
    }

    /// Attach a meta map.
    pub fn with_meta(mut self, meta: Map<String, Value>) -> Self {
        self.meta = meta;
        self
    }
}

/// Replaceable payload computation installed by `with_side_effect`.
///
/// Receives the store context (late-bound; errors with `StoreNotAttached`
/// when used before [`Pathspace::attach_store`]) and the raw creator
/// arguments. Its return value becomes the action payload.
pub type SideEffectFn =
    Arc<dyn Fn(&StoreContext<'_>, &[Value]) -> PathspaceResult<Value> + Send + Sync>;

enum PayloadSource {
    /// Default: the first argument passes through unchanged.
    FirstArg,
    SideEffect(SideEffectFn),
}

struct CreatorShared {
    registry: Pathspace,
    action_type: String,
    meta: Map<String, Value>,
    payload: Mutex<PayloadSource>,
}

/// Produces [`Action`] records for one registered action.
///
/// Cloning is cheap and clones share state: replacing the payload
/// computation through any clone affects all of them, so
/// `with_side_effect` returns the same logical handle rather than a new
/// creator.
#[derive(Clone)]
pub struct ActionCreator {
    shared: Arc<CreatorShared>,
}

impl ActionCreator {
    pub(crate) fn new(registry: Pathspace, action_type: String, meta: Map<String, Value>) -> Self {
        Self {
            shared: Arc::new(CreatorShared {
                registry,
                action_type,
                meta,
                payload: Mutex::new(PayloadSource::FirstArg),
            }),
        }
    }

    /// The namespaced action type this creator produces.
    #[inline]
    pub fn action_type(&self) -> &str {
        &self.shared.action_type
    }

    /// The meta map attached to every produced action.
    #[inline]
    pub fn meta(&self) -> &Map<String, Value> {
        &self.shared.meta
    }

    /// Produce an action from raw arguments.
    ///
    /// With the default payload computation the first argument passes
    /// through unchanged (`Null` when there are no arguments). After
    /// [`with_side_effect`](ActionCreator::with_side_effect) the installed
    /// function computes the payload and may fail.
    pub fn create(&self, args: &[Value]) -> PathspaceResult<Action> {
        let side_effect = {
            let guard = self
                .shared
                .payload
                .lock()
                .expect("action creator mutex poisoned");
            match &*guard {
                PayloadSource::FirstArg => None,
                PayloadSource::SideEffect(f) => Some(f.clone()),
            }
        };
        let payload = match side_effect {
            None => args.first().cloned().unwrap_or(Value::Null),
            Some(f) => {
                let ctx = StoreContext::new(&self.shared.registry);
                f(&ctx, args)?
            }
        };
        Ok(Action {
            action_type: self.shared.action_type.clone(),
            payload,
            meta: self.shared.meta.clone(),
        })
    }

    /// Produce an action from a single payload argument.
    pub fn of(&self, payload: impl Into<Value>) -> PathspaceResult<Action> {
        self.create(&[payload.into()])
    }

    /// Replace the payload computation in place.
    ///
    /// The replacement persists for every subsequent call through any clone
    /// of this creator. Returns the same logical handle.
    pub fn with_side_effect<F>(&self, side_effect: F) -> ActionCreator
    where
        F: Fn(&StoreContext<'_>, &[Value]) -> PathspaceResult<Value> + Send + Sync + 'static,
    {
        *self
            .shared
            .payload
            .lock()
            .expect("action creator mutex poisoned") = PayloadSource::SideEffect(Arc::new(side_effect));
        self.clone()
    }
}

impl fmt::Debug for ActionCreator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionCreator")
            .field("action_type", &self.shared.action_type)
            .field("meta", &self.shared.meta)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn creator(ty: &str) -> ActionCreator {
        ActionCreator::new(Pathspace::new(), ty.to_owned(), Map::new())
    }

    #[test]
    fn test_default_payload_is_first_arg() {
        let c = creator("foo:SET");
        let action = c.create(&[json!("x"), json!("ignored")]).unwrap();
        assert_eq!(action.action_type, "foo:SET");
        assert_eq!(action.payload, json!("x"));
        assert!(action.meta.is_empty());
    }

    #[test]
    fn test_no_args_payload_is_null() {
        let c = creator("foo:SET");
        assert_eq!(c.create(&[]).unwrap().payload, Value::Null);
    }

    #[test]
    fn test_with_side_effect_replaces_payload_for_all_calls() {
        let c = creator("foo:SET");
        let same = c.with_side_effect(|_ctx, _args| Ok(json!("fixed")));
        assert_eq!(same.of(json!("x")).unwrap().payload, json!("fixed"));
        // The original handle sees the replacement too.
        assert_eq!(c.of(json!("y")).unwrap().payload, json!("fixed"));
    }

    #[test]
    fn test_side_effect_sees_args() {
        let c = creator("foo:SET");
        c.with_side_effect(|_ctx, args| Ok(json!(args.len())));
        let action = c.create(&[json!(1), json!(2), json!(3)]).unwrap();
        assert_eq!(action.payload, json!(3));
    }

    #[test]
    fn test_action_serde_shape() {
        let action = Action::new("foo.bar:SET", json!({"x": 1}));
        let text = serde_json::to_string(&action).unwrap();
        assert!(text.contains("\"type\":\"foo.bar:SET\""));
        let parsed: Action = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, action);
    }
}

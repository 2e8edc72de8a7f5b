//! Small reducers for common one-line value transforms.
//!
//! All follow the `(slice, payload, state) -> new slice` shape that
//! [`Namespace::map_action_to_reducer`](crate::Namespace::map_action_to_reducer)
//! expects, so they can be passed directly:
//!
//! ```
//! use pathspace::{reducers, Pathspace};
//! use serde_json::json;
//!
//! let space = Pathspace::new();
//! let ns = space.create_namespace("settings.dark_mode").unwrap();
//! let toggle = ns.map_action_to_reducer("TOGGLE", reducers::toggle).unwrap();
//!
//! let reducer = space.create_reducer(json!({}));
//! let state = json!({"settings": {"dark_mode": false}});
//! let next = reducer.reduce(Some(&state), &toggle.create(&[]).unwrap());
//! assert_eq!(next["settings"]["dark_mode"], true);
//! ```

use serde_json::{Map, Value};

/// Overwrite the slice with the payload. The default reducer.
pub fn overwrite(_slice: &Value, payload: &Value, _state: &Value) -> Value {
    payload.clone()
}

/// Prepend the payload to an array slice.
pub fn prepend_item(slice: &Value, payload: &Value, _state: &Value) -> Value {
    let mut items = vec![payload.clone()];
    if let Value::Array(existing) = slice {
        items.extend(existing.iter().cloned());
    }
    Value::Array(items)
}

/// Append the payload to an array slice.
pub fn append_item(slice: &Value, payload: &Value, _state: &Value) -> Value {
    let mut items = match slice {
        Value::Array(existing) => existing.clone(),
        _ => Vec::new(),
    };
    items.push(payload.clone());
    Value::Array(items)
}

/// Merge the payload object over the slice object; payload fields win.
pub fn merge_payload_over(slice: &Value, payload: &Value, _state: &Value) -> Value {
    merge(slice, payload)
}

/// Merge the payload object under the slice object; slice fields win.
pub fn merge_slice_over(slice: &Value, payload: &Value, _state: &Value) -> Value {
    merge(payload, slice)
}

/// Set the slice to `true`.
pub fn on(_slice: &Value, _payload: &Value, _state: &Value) -> Value {
    Value::Bool(true)
}

/// Set the slice to `false`.
pub fn off(_slice: &Value, _payload: &Value, _state: &Value) -> Value {
    Value::Bool(false)
}

/// Negate the slice's truthiness.
pub fn toggle(slice: &Value, _payload: &Value, _state: &Value) -> Value {
    Value::Bool(!is_truthy(slice))
}

/// Set the slice to `Null`.
pub fn clear(_slice: &Value, _payload: &Value, _state: &Value) -> Value {
    Value::Null
}

fn merge(base: &Value, over: &Value) -> Value {
    let mut out = match base {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };
    if let Value::Object(map) = over {
        for (k, v) in map {
            out.insert(k.clone(), v.clone());
        }
    }
    Value::Object(out)
}

fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

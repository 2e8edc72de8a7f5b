//! Error types for pathspace operations.

use thiserror::Error;

/// Result type alias for pathspace operations.
pub type PathspaceResult<T> = Result<T, PathspaceError>;

/// Errors that can occur during pathspace operations.
///
/// All variants are synchronous contract violations raised at registration
/// or action-definition time. Dispatching an unknown action type is not an
/// error; the root reducer passes state through unchanged.
#[derive(Debug, Error)]
pub enum PathspaceError {
    /// Path text or segment sequence is malformed.
    #[error("invalid path: {message}")]
    InvalidPath {
        /// Description of what was wrong with the path.
        message: String,
    },

    /// The canonical path key is already registered.
    #[error("namespace already registered for path \"{key}\"")]
    DuplicateNamespace {
        /// The canonical key that collided.
        key: String,
    },

    /// The supplied parent namespace belongs to a different registry.
    #[error("parent namespace belongs to a different registry instance")]
    InvalidParentNamespace,

    /// The action name is already registered for the namespace.
    #[error("action \"{action}\" already exists for path \"{key}\"")]
    DuplicateAction {
        /// Canonical key of the owning namespace.
        key: String,
        /// The local action name that collided.
        action: String,
    },

    /// Action meta must be a plain JSON object.
    #[error("action meta must be a plain object, found {found}")]
    InvalidMeta {
        /// The JSON type that was supplied instead.
        found: &'static str,
    },

    /// `map_namespaces` was invoked on an unsupported value shape.
    #[error("cannot map namespaces over {found}; only objects, arrays, and strings are supported")]
    UnmappableTarget {
        /// The JSON type that was supplied.
        found: &'static str,
    },

    /// A side effect asked for the store before `attach_store` ran.
    #[error("no store attached; call attach_store before running store-dependent side effects")]
    StoreNotAttached,
}

impl PathspaceError {
    /// Create an invalid path error.
    #[inline]
    pub fn invalid_path(message: impl Into<String>) -> Self {
        PathspaceError::InvalidPath {
            message: message.into(),
        }
    }

    /// Create a duplicate namespace error.
    #[inline]
    pub fn duplicate_namespace(key: impl Into<String>) -> Self {
        PathspaceError::DuplicateNamespace { key: key.into() }
    }

    /// Create a duplicate action error.
    #[inline]
    pub fn duplicate_action(key: impl Into<String>, action: impl Into<String>) -> Self {
        PathspaceError::DuplicateAction {
            key: key.into(),
            action: action.into(),
        }
    }

    /// Create an invalid meta error.
    #[inline]
    pub fn invalid_meta(found: &'static str) -> Self {
        PathspaceError::InvalidMeta { found }
    }

    /// Create an unmappable target error.
    #[inline]
    pub fn unmappable(found: &'static str) -> Self {
        PathspaceError::UnmappableTarget { found }
    }
}

/// Get the type name of a JSON value.
#[inline]
pub fn value_type_name(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_display() {
        let err = PathspaceError::duplicate_namespace("foo.bar[0]");
        assert!(err.to_string().contains("foo.bar[0]"));

        let err = PathspaceError::duplicate_action("foo", "SET");
        assert!(err.to_string().contains("SET"));
        assert!(err.to_string().contains("foo"));
    }

    #[test]
    fn test_value_type_name() {
        assert_eq!(value_type_name(&json!(null)), "null");
        assert_eq!(value_type_name(&json!(true)), "boolean");
        assert_eq!(value_type_name(&json!(42)), "number");
        assert_eq!(value_type_name(&json!("hello")), "string");
        assert_eq!(value_type_name(&json!([1, 2, 3])), "array");
        assert_eq!(value_type_name(&json!({"a": 1})), "object");
    }
}

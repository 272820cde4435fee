//! Error types for the Scrive client
//!
//! This module defines the error taxonomy shared by the validator layer,
//! managed objects, owned collections and the transport seam.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Every variant is a deterministic function of the input and the current
//! lifecycle state of the object involved. Nothing here is retried.

use thiserror::Error;

/// Result type alias for Scrive operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the Scrive client
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A constructor/setter received a value of the wrong runtime type
    ///
    /// The message follows the validator contract, e.g.
    /// `title must be text, not 3`.
    #[error("{0}")]
    TypeMismatch(String),

    /// A value had the right type but failed a semantic check
    ///
    /// e.g. `number_of_days_to_sign must be an integer between 1 and 90 (inclusive), not: 91`
    #[error("{0}")]
    ValueRejected(String),

    /// A required constructor argument was not supplied
    #[error("{type_name}() missing required argument: '{name}'")]
    MissingArgument {
        /// Type being constructed
        type_name: String,
        /// Name of the missing argument
        name: String,
    },

    /// A constructor argument did not match any declared attribute
    #[error("{type_name}() got an unexpected argument: '{name}'")]
    UnexpectedArgument {
        /// Type being constructed
        type_name: String,
        /// Name of the leftover argument
        name: String,
    },

    /// The attribute is not declared on the type
    #[error("{type_name} has no attribute '{name}'")]
    NoSuchAttribute {
        /// Owning type
        type_name: String,
        /// Requested attribute
        name: String,
    },

    /// Write to an attribute that has no validator or is declared read-only
    #[error("attribute '{name}' of {type_name} is immutable")]
    AttributeImmutable {
        /// Owning type
        type_name: String,
        /// Attribute that was written
        name: String,
    },

    /// Mutation of an object or collection whose read-only flag is set
    #[error("{0} is read only")]
    ObjectReadOnly(String),

    /// Any access to an object or collection whose invalid flag is set
    #[error("{0} is invalid and can no longer be used")]
    ObjectInvalid(String),

    /// Wire input failed shape/type/enum validation
    #[error("malformed {type_name} response: {detail}")]
    MalformedResponse {
        /// Type being deserialized
        type_name: String,
        /// Offending wire key, when the failure is tied to one
        key: Option<String>,
        /// Human readable description
        detail: String,
    },

    /// Element or key lookup on an owned collection failed
    #[error("no such element: {0}")]
    NoSuchElement(String),

    /// The transport collaborator failed to deliver a request
    #[error("transport error: {0}")]
    Transport(String),
}

impl Error {
    /// Malformed response caused by a missing wire key
    pub fn missing_key(type_name: &str, key: &str) -> Self {
        Error::MalformedResponse {
            type_name: type_name.to_string(),
            key: Some(key.to_string()),
            detail: format!("missing key '{}'", key),
        }
    }

    /// Malformed response caused by a rejected value under `key`
    ///
    /// Validator failures are rewrapped here: a wire response that fails
    /// local validation is a service-contract violation, not a caller bug.
    pub fn malformed(type_name: &str, key: Option<&str>, cause: &Error) -> Self {
        // Nested objects already produce a fully formed malformed response.
        if let Error::MalformedResponse { .. } = cause {
            return cause.clone();
        }
        let detail = match key {
            Some(key) => format!("'{}': {}", key, cause),
            None => cause.to_string(),
        };
        Error::MalformedResponse {
            type_name: type_name.to_string(),
            key: key.map(str::to_string),
            detail,
        }
    }

    /// Check if this is a validator failure (type or value)
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::TypeMismatch(_) | Error::ValueRejected(_))
    }

    /// Check if this error stems from a lifecycle guard
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, Error::ObjectReadOnly(_) | Error::ObjectInvalid(_))
    }
}

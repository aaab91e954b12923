use thiserror::Error;

use crate::models::{ResourceId, ResourceKind};

/// Errors reported by gateways, controllers and presenters.
///
/// `Clone` so the same error can be kept as the controller's last error and
/// handed to the notifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// No response: connection failure, TLS failure or timeout.
    #[error("Network unavailable: {reason}")]
    NetworkUnavailable { reason: String },

    /// The server answered with a non-2xx status or an explicit failure
    /// envelope.
    #[error("Server rejected the request ({status}): {message}")]
    ServerRejected { status: u16, message: String },

    /// The body did not have the expected shape.
    #[error("Malformed response: {reason}")]
    MalformedResponse { reason: String },

    #[error("{kind} item {id} not found")]
    NotFound { kind: ResourceKind, id: ResourceId },

    /// Local validation failed before anything was sent.
    #[error("Invalid {field}: {message}")]
    ValidationFailed { field: String, message: String },

    /// Another mutation of the same item is still in flight.
    #[error("A change to item {id} is already in progress")]
    ConcurrentMutation { id: ResourceId },

    #[error("{operation} is not supported for {kind}")]
    UnsupportedOperation {
        kind: ResourceKind,
        operation: String,
    },

    /// The operation needs a signed-in session.
    #[error("Not signed in")]
    Unauthenticated,
}

impl ResourceError {
    #[must_use]
    pub fn network(reason: impl Into<String>) -> Self {
        Self::NetworkUnavailable {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::ServerRejected {
            status,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn not_found(kind: ResourceKind, id: ResourceId) -> Self {
        Self::NotFound { kind, id }
    }

    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn unsupported(kind: ResourceKind, operation: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            kind,
            operation: operation.into(),
        }
    }

    /// True when the failure happened before or without a server answer.
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::NetworkUnavailable { .. })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_item() {
        let err = ResourceError::not_found(ResourceKind::Employees, ResourceId::from(42));
        assert_eq!(err.to_string(), "employees item 42 not found");

        let err = ResourceError::ConcurrentMutation {
            id: ResourceId::from("Tools"),
        };
        assert_eq!(err.to_string(), "A change to item Tools is already in progress");
    }

    #[test]
    fn rejected_carries_status_and_message() {
        let err = ResourceError::rejected(409, "Email already registered");
        assert_eq!(
            err.to_string(),
            "Server rejected the request (409): Email already registered"
        );
        assert!(!err.is_network());
        assert!(ResourceError::network("timed out").is_network());
    }

    #[test]
    fn unsupported_names_kind_and_operation() {
        let err = ResourceError::unsupported(ResourceKind::Clients, "delete");
        assert_eq!(err.to_string(), "delete is not supported for clients");
    }
}

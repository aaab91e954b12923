//! Gateway traits.
//!
//! The resource contract is JSON-valued so that one object-safe gateway serves
//! every [`ResourceKind`]; typed decoding happens in the caller via
//! [`decode`](crate::decode) / [`decode_all`](crate::decode_all).

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ResourceError;
use crate::models::{CreateRequest, Credentials, LoginResponse, ResourceId, ResourceKind, UpdateRequest};

/// Remote access to the backend's resource collections.
///
/// Implementations never retry. Every failure maps onto [`ResourceError`]:
/// no response at all is `NetworkUnavailable`, a non-2xx status is
/// `ServerRejected`, a body of the wrong shape is `MalformedResponse`.
#[async_trait]
pub trait ResourceGateway: Send + Sync {
    /// Fetch the full collection of `kind` in server order.
    ///
    /// # Errors
    ///
    /// * `NetworkUnavailable` - transport failure or timeout
    /// * `ServerRejected` - non-2xx response
    /// * `MalformedResponse` - the body is not a JSON array
    async fn list(&self, kind: ResourceKind) -> Result<Vec<Value>, ResourceError>;

    /// Fetch a single item.
    ///
    /// # Errors
    ///
    /// * `NotFound` - the backend has no item with this identity
    /// * `UnsupportedOperation` - `kind` has no detail read
    /// * any transport/status/shape error as for [`list`](Self::list)
    async fn get(&self, kind: ResourceKind, id: &ResourceId) -> Result<Value, ResourceError>;

    /// Create an item and return the server's representation of it.
    ///
    /// # Errors
    ///
    /// * `UnsupportedOperation` - `kind` cannot be created
    /// * any transport/status/shape error as for [`list`](Self::list)
    async fn create(
        &self,
        kind: ResourceKind,
        request: CreateRequest,
    ) -> Result<Value, ResourceError>;

    /// Apply `request` to the item `id` and return the server's representation
    /// of the updated item.
    ///
    /// # Errors
    ///
    /// * `UnsupportedOperation` - the kind/action pair has no endpoint; no
    ///   request is sent
    /// * any transport/status/shape error as for [`list`](Self::list)
    async fn update(
        &self,
        kind: ResourceKind,
        id: &ResourceId,
        request: UpdateRequest,
    ) -> Result<Value, ResourceError>;

    /// Delete the item `id`.
    ///
    /// # Errors
    ///
    /// * `UnsupportedOperation` - `kind` cannot be deleted
    /// * any transport/status error as for [`list`](Self::list)
    async fn remove(&self, kind: ResourceKind, id: &ResourceId) -> Result<(), ResourceError>;
}

/// Staff authentication.
#[async_trait]
pub trait SessionGateway: Send + Sync {
    /// Exchange credentials for a bearer token and the signed-in employee.
    ///
    /// # Errors
    ///
    /// * `ServerRejected` - wrong credentials or account not approved
    /// * `MalformedResponse` - no token in the response
    /// * `NetworkUnavailable` - transport failure or timeout
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ResourceError>;
}

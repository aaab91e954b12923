//! Endpoint table of the Depot backend.
//!
//! Maps (kind, operation) pairs onto HTTP method, path and query. Pairs the
//! backend has no endpoint for resolve to `UnsupportedOperation` before any
//! request is built.

use http::Method;
use resources_sdk::{ResourceError, ResourceId, ResourceKind, UpdateAction};
use serde_json::Value;
use url::Url;

/// A resolved endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub method: Method,
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    /// JSON body to send; `None` for bodiless calls or multipart uploads.
    pub json: Option<Value>,
}

impl Route {
    fn new(method: Method, segments: &[&str]) -> Self {
        Self {
            method,
            segments: segments.iter().map(|s| (*s).to_owned()).collect(),
            query: Vec::new(),
            json: None,
        }
    }

    fn with_id(mut self, id: &ResourceId) -> Self {
        self.segments.push(id.to_string());
        self
    }

    fn with_json(mut self, body: Value) -> Self {
        self.json = Some(body);
        self
    }

    /// Absolute URL under `base`. Segments are percent-encoded.
    #[must_use]
    pub fn url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(&self.segments);
        }
        url
    }

    /// Path relative to the base, for logs and tests.
    #[must_use]
    pub fn path(&self) -> String {
        self.segments.join("/")
    }
}

/// Collection endpoint.
#[must_use]
pub fn list(kind: ResourceKind) -> Route {
    let segments: &[&str] = match kind {
        ResourceKind::Clients => &["api", "auth", "get-users"],
        ResourceKind::Items => &["api", "items", "get-items"],
        ResourceKind::Categories => &["api", "items", "categories"],
        ResourceKind::Employees => &["api", "employees", "get-employees"],
        ResourceKind::CustomOrders => &["api", "admin", "custom-orders"],
        ResourceKind::Orders => &["api", "orders"],
        ResourceKind::Tickets => &["api", "admin", "tickets"],
    };
    Route::new(Method::GET, segments)
}

/// Detail endpoint, for kinds that have one. Clients have none; their detail
/// read is served from the collection.
#[must_use]
pub fn detail(kind: ResourceKind, id: &ResourceId) -> Option<Route> {
    match kind {
        ResourceKind::Employees => {
            Some(Route::new(Method::GET, &["api", "employees", "get-employees"]).with_id(id))
        }
        ResourceKind::Tickets => {
            Some(Route::new(Method::GET, &["api", "admin", "tickets"]).with_id(id))
        }
        _ => None,
    }
}

/// Update endpoint for an action on a kind.
///
/// # Errors
/// `UnsupportedOperation` for pairs without an endpoint; `ValidationFailed`
/// when an approval body lacks salary or role.
pub fn update(
    kind: ResourceKind,
    id: &ResourceId,
    action: UpdateAction,
    body: Value,
) -> Result<Route, ResourceError> {
    let route = match (kind, action) {
        (ResourceKind::Employees, UpdateAction::Approve) => {
            let mut route = Route::new(Method::PUT, &["api", "employees", "approve"]);
            route.query = vec![
                ("id".to_owned(), id.to_string()),
                ("salary".to_owned(), query_value(&body, "salary")?),
                ("role".to_owned(), query_value(&body, "role")?),
            ];
            route
        }
        (ResourceKind::Employees, UpdateAction::Profile) => {
            Route::new(Method::PUT, &["api", "employees", "update"])
                .with_id(id)
                .with_json(body)
        }
        (ResourceKind::CustomOrders, UpdateAction::Status) => {
            let mut route =
                Route::new(Method::PUT, &["api", "admin", "custom-orders"]).with_id(id);
            route.segments.push("status".to_owned());
            route.with_json(body)
        }
        (ResourceKind::Orders, UpdateAction::Status) => {
            let mut route = Route::new(Method::PUT, &["api", "orders"]).with_id(id);
            route.segments.push("status".to_owned());
            route.with_json(body)
        }
        (ResourceKind::Tickets, UpdateAction::Reply) => {
            let mut route = Route::new(Method::PUT, &["api", "admin", "tickets"]).with_id(id);
            route.segments.push("reply".to_owned());
            route.with_json(body)
        }
        (kind, action) => {
            return Err(ResourceError::unsupported(kind, action.as_str()));
        }
    };
    Ok(route)
}

/// Delete endpoint.
///
/// # Errors
/// `UnsupportedOperation` for kinds that cannot be deleted.
pub fn remove(kind: ResourceKind, id: &ResourceId) -> Result<Route, ResourceError> {
    match kind {
        ResourceKind::Employees => {
            Ok(Route::new(Method::DELETE, &["api", "employees", "delete"]).with_id(id))
        }
        ResourceKind::CustomOrders => {
            Ok(Route::new(Method::DELETE, &["api", "admin", "custom-orders"]).with_id(id))
        }
        other => Err(ResourceError::unsupported(other, "delete")),
    }
}

/// Create endpoint. Items are uploaded as multipart, so the route carries no
/// JSON body.
///
/// # Errors
/// `UnsupportedOperation` for kinds that cannot be created.
pub fn create(kind: ResourceKind) -> Result<Route, ResourceError> {
    match kind {
        ResourceKind::Items => Ok(Route::new(Method::POST, &["api", "items", "add-item"])),
        other => Err(ResourceError::unsupported(other, "create")),
    }
}

#[must_use]
pub fn login() -> Route {
    Route::new(Method::POST, &["api", "employees", "login"])
}

/// Approval parameters travel in the query string, so numbers are rendered
/// as text.
fn query_value(body: &Value, field: &str) -> Result<String, ResourceError> {
    match body.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(ResourceError::validation(field, "is required")),
    }
}

//! REST implementation of [`ResourceGateway`] and [`SessionGateway`].

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use depot_http::{HttpClient, HttpClientBuilder, Multipart, Part};
use http::StatusCode;
use resources_sdk::{
    Attachment, CreateRequest, Credentials, LoginResponse, ResourceError, ResourceGateway,
    ResourceId, ResourceKind, SessionGateway, UpdateRequest, decode,
};
use serde_json::{Map, Value, json};
use tracing::{debug, instrument, warn};
use url::Url;

use super::error::map_http_error;
use super::routes::{self, Route};
use crate::config::{ConfigError, ResourcesConfig};
use crate::domain::session::SessionContext;

/// Multipart part holding the JSON payload of a created item.
const ITEM_PART: &str = "item";

/// Gateway talking to the Depot backend over HTTP(S).
///
/// Attaches the session's bearer token to every request. Never retries.
#[derive(Clone)]
pub struct RestResourceGateway {
    client: HttpClient,
    base: Url,
    session: Arc<SessionContext>,
}

impl RestResourceGateway {
    /// Build a gateway with its own HTTP client.
    ///
    /// # Errors
    /// `ConfigError` when the base URL is invalid or the client cannot be
    /// built.
    pub fn new(config: &ResourcesConfig, session: Arc<SessionContext>) -> Result<Self, ConfigError> {
        let base = config.base_url()?;
        let client = HttpClientBuilder::with_config(config.http_config()?)
            .build()
            .map_err(|e| ConfigError::Http(e.to_string()))?;
        Ok(Self::with_client(client, base, session))
    }

    /// Gateway over an existing client. `base` should end with `/`.
    #[must_use]
    pub fn with_client(client: HttpClient, base: Url, session: Arc<SessionContext>) -> Self {
        Self {
            client,
            base,
            session,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    #[must_use]
    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    async fn send(
        &self,
        route: &Route,
        form: Option<&Multipart>,
    ) -> Result<(StatusCode, Bytes), ResourceError> {
        let url = route.url(&self.base);
        debug!(method = %route.method, path = %route.path(), "sending request");

        let mut request = self.client.request(route.method.clone(), url.as_str());
        if let Some(token) = self.session.token() {
            request = request.bearer_auth(token.expose());
        }
        if !route.query.is_empty() {
            request = request.query(&route.query).map_err(map_http_error)?;
        }
        if let Some(body) = &route.json {
            request = request.json(body).map_err(map_http_error)?;
        }
        if let Some(form) = form {
            request = request.multipart(form);
        }

        let response = request.send().await.map_err(map_http_error)?;
        let status = response.status();
        let body = response.checked_bytes().await.map_err(|err| {
            let err = map_http_error(err);
            warn!(path = %route.path(), error = %err, "request failed");
            err
        })?;
        debug!(status = status.as_u16(), bytes = body.len(), "response received");
        Ok((status, body))
    }

    /// Send a mutation. Plain-text confirmations are tolerated.
    async fn send_mutation(
        &self,
        route: &Route,
        form: Option<&Multipart>,
    ) -> Result<(StatusCode, Value), ResourceError> {
        let (status, body) = self.send(route, form).await?;
        Ok((status, parse_lenient(&body)))
    }

    async fn fetch_list(&self, kind: ResourceKind) -> Result<Vec<Value>, ResourceError> {
        let (_, body) = self.send(&routes::list(kind), None).await?;
        match parse_body(&body)? {
            Value::Array(items) => Ok(items),
            other => Err(ResourceError::malformed(format!(
                "expected a JSON array for {kind}, got {}",
                json_type(&other)
            ))),
        }
    }

    async fn find_in_list(
        &self,
        kind: ResourceKind,
        id: &ResourceId,
    ) -> Result<Option<Value>, ResourceError> {
        let items = self.fetch_list(kind).await?;
        Ok(items
            .into_iter()
            .find(|item| item_id(kind, item).as_ref() == Some(id)))
    }

    /// Re-read an item after a mutation whose response carried no item.
    async fn read_back(&self, kind: ResourceKind, id: &ResourceId) -> Result<Value, ResourceError> {
        debug!(%kind, %id, "response carried no item; reading back");
        let found = match routes::detail(kind, id) {
            Some(route) => {
                let (status, body) = self.send(&route, None).await?;
                unwrap_item(kind, status, parse_body(&body)?)?
            }
            None => self.find_in_list(kind, id).await?,
        };
        found.ok_or_else(|| {
            ResourceError::malformed(format!("{kind} item {id} missing after update"))
        })
    }

    /// Find the item just created when the response did not echo it: the
    /// newest item whose name matches the submitted one.
    async fn find_created(
        &self,
        kind: ResourceKind,
        payload: &Value,
    ) -> Result<Value, ResourceError> {
        let name = payload.get("name").and_then(Value::as_str);
        debug!(%kind, name, "response carried no item; scanning collection");
        let items = self.fetch_list(kind).await?;
        items
            .into_iter()
            .filter(|item| name.is_some() && item.get("name").and_then(Value::as_str) == name)
            .max_by_key(|item| item_id(kind, item))
            .ok_or_else(|| ResourceError::malformed(format!("created {kind} item not found")))
    }
}

#[async_trait]
impl ResourceGateway for RestResourceGateway {
    #[instrument(skip_all, fields(kind = %kind))]
    async fn list(&self, kind: ResourceKind) -> Result<Vec<Value>, ResourceError> {
        let items = self.fetch_list(kind).await?;
        debug!(count = items.len(), "collection fetched");
        Ok(items)
    }

    #[instrument(skip_all, fields(kind = %kind, id = %id))]
    async fn get(&self, kind: ResourceKind, id: &ResourceId) -> Result<Value, ResourceError> {
        let found = if let Some(route) = routes::detail(kind, id) {
            match self.send(&route, None).await {
                Ok((status, body)) => unwrap_item(kind, status, parse_body(&body)?)?,
                Err(ResourceError::ServerRejected { status: 404, .. }) => None,
                Err(err) => return Err(err),
            }
        } else if kind == ResourceKind::Clients {
            self.find_in_list(kind, id).await?
        } else {
            return Err(ResourceError::unsupported(kind, "get"));
        };
        found.ok_or_else(|| ResourceError::not_found(kind, id.clone()))
    }

    #[instrument(skip_all, fields(kind = %kind))]
    async fn create(
        &self,
        kind: ResourceKind,
        request: CreateRequest,
    ) -> Result<Value, ResourceError> {
        let route = routes::create(kind)?;
        let form = build_form(&request.payload, request.attachments)?;
        let (status, body) = self.send_mutation(&route, Some(&form)).await?;
        match unwrap_item(kind, status, body)? {
            Some(item) => Ok(item),
            None => self.find_created(kind, &request.payload).await,
        }
    }

    #[instrument(skip_all, fields(kind = %kind, id = %id, action = request.action.as_str()))]
    async fn update(
        &self,
        kind: ResourceKind,
        id: &ResourceId,
        request: UpdateRequest,
    ) -> Result<Value, ResourceError> {
        let route = routes::update(kind, id, request.action, request.body)?;
        let (status, body) = self.send_mutation(&route, None).await?;
        match unwrap_item(kind, status, body)? {
            Some(item) => Ok(item),
            None => self.read_back(kind, id).await,
        }
    }

    #[instrument(skip_all, fields(kind = %kind, id = %id))]
    async fn remove(&self, kind: ResourceKind, id: &ResourceId) -> Result<(), ResourceError> {
        let route = routes::remove(kind, id)?;
        let (status, body) = self.send_mutation(&route, None).await?;
        if let Some(err) = failure_envelope(status, &body) {
            return Err(err);
        }
        Ok(())
    }
}

#[async_trait]
impl SessionGateway for RestResourceGateway {
    #[instrument(skip_all, fields(email = %credentials.email))]
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ResourceError> {
        let mut route = routes::login();
        route.json = Some(json!({
            "email": credentials.email,
            "password": credentials.password.expose(),
        }));
        let (status, body) = self.send(&route, None).await?;
        let body = parse_body(&body)?;
        if let Some(err) = failure_envelope(status, &body) {
            return Err(err);
        }
        decode(body)
    }
}

fn parse_body(body: &[u8]) -> Result<Value, ResourceError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|e| ResourceError::malformed(format!("invalid JSON: {e}")))
}

/// JSON when the body parses, otherwise the body as a text confirmation.
fn parse_lenient(body: &[u8]) -> Value {
    parse_body(body).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Identity of a JSON item; categories without an id are keyed by name.
fn item_id(kind: ResourceKind, item: &Value) -> Option<ResourceId> {
    ResourceId::of_object(item).or_else(|| {
        if kind == ResourceKind::Categories {
            item.get("category").and_then(ResourceId::from_json)
        } else {
            None
        }
    })
}

fn is_item(kind: ResourceKind, value: &Value) -> bool {
    value.is_object() && item_id(kind, value).is_some()
}

/// `{success: false, message}` answered with a 2xx status.
fn failure_envelope(status: StatusCode, body: &Value) -> Option<ResourceError> {
    let map = body.as_object()?;
    if map.get("success").and_then(Value::as_bool) != Some(false) {
        return None;
    }
    let message = map
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("request failed");
    Some(ResourceError::rejected(status.as_u16(), message))
}

/// Extract the item from a mutation response.
///
/// `Ok(None)` means the body carried no item and the caller should read back.
fn unwrap_item(
    kind: ResourceKind,
    status: StatusCode,
    body: Value,
) -> Result<Option<Value>, ResourceError> {
    if let Some(err) = failure_envelope(status, &body) {
        return Err(err);
    }
    match body {
        Value::Null => Ok(None),
        body @ Value::Object(_) if is_item(kind, &body) => Ok(Some(body)),
        Value::Object(map) => Ok(single_item_member(kind, map)),
        // Some endpoints answer with a bare confirmation string.
        Value::String(_) => Ok(None),
        other => Err(ResourceError::malformed(format!(
            "expected a JSON object, got {}",
            json_type(&other)
        ))),
    }
}

fn single_item_member(kind: ResourceKind, map: Map<String, Value>) -> Option<Value> {
    let mut items = map.into_iter().filter(|(_, v)| is_item(kind, v));
    let (_, first) = items.next()?;
    if items.next().is_some() {
        return None;
    }
    Some(first)
}

fn build_form(payload: &Value, attachments: Vec<Attachment>) -> Result<Multipart, ResourceError> {
    let item = Part::json(ITEM_PART, payload).map_err(map_http_error)?;
    let mut form = Multipart::new().part(item);
    for attachment in attachments {
        let content_type = attachment
            .content_type
            .as_deref()
            .and_then(|ct| ct.parse::<mime::Mime>().ok());
        form = form.part(Part::file(
            attachment.field,
            attachment.file_name,
            content_type,
            attachment.bytes,
        ));
    }
    Ok(form)
}

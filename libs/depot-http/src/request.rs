use crate::client::{BufferedService, map_buffer_error, try_acquire_buffer_slot};
use crate::config::TransportSecurity;
use crate::error::{HttpError, InvalidUriKind};
use crate::multipart::Multipart;
use crate::response::{HttpResponse, ResponseBody};
use bytes::Bytes;
use http::header::{AUTHORIZATION, CONTENT_TYPE, HeaderName, HeaderValue};
use http::{Request, Response};
use http_body_util::Full;
use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;
use tower::Service;

/// Request body, already encoded, with its default content type
#[derive(Clone, Debug)]
enum Body {
    Empty,
    Raw(Bytes),
    Encoded { content_type: String, bytes: Bytes },
}

/// HTTP request builder with fluent API
///
/// Created by [`HttpClient::get`](crate::HttpClient::get) and friends. Header
/// errors are deferred and reported by [`send()`](RequestBuilder::send).
///
/// ```ignore
/// let resp = client
///     .put("https://depot.example.com/api/employees/approve")
///     .bearer_auth(token)
///     .query(&[("id", "7"), ("salary", "5200"), ("role", "Employee")])?
///     .send()
///     .await?;
/// ```
#[must_use = "RequestBuilder does nothing until .send() is called"]
pub struct RequestBuilder {
    service: BufferedService,
    max_body_size: usize,
    request_timeout: Duration,
    method: http::Method,
    url: String,
    headers: Vec<(HeaderName, HeaderValue)>,
    body: Body,
    error: Option<HttpError>,
    transport_security: TransportSecurity,
}

impl RequestBuilder {
    pub(crate) fn new(
        service: BufferedService,
        max_body_size: usize,
        request_timeout: Duration,
        method: http::Method,
        url: String,
        transport_security: TransportSecurity,
    ) -> Self {
        Self {
            service,
            max_body_size,
            request_timeout,
            method,
            url,
            headers: Vec::new(),
            body: Body::Empty,
            error: None,
            transport_security,
        }
    }

    /// Add a header.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if self.error.is_some() {
            return self;
        }
        match (HeaderName::try_from(name), HeaderValue::try_from(value)) {
            (Ok(name), Ok(value)) => self.headers.push((name, value)),
            (Err(e), _) => self.error = Some(HttpError::InvalidHeaderName(e)),
            (_, Err(e)) => self.error = Some(HttpError::InvalidHeaderValue(e)),
        }
        self
    }

    /// Add `Authorization: Bearer <token>`. The header is marked sensitive so
    /// it never shows up in debug output.
    pub fn bearer_auth(mut self, token: &str) -> Self {
        if self.error.is_some() {
            return self;
        }
        match HeaderValue::try_from(format!("Bearer {token}")) {
            Ok(mut value) => {
                value.set_sensitive(true);
                self.headers.push((AUTHORIZATION, value));
            }
            Err(e) => self.error = Some(HttpError::InvalidHeaderValue(e)),
        }
        self
    }

    /// Append URL-encoded query parameters to the URL.
    ///
    /// # Errors
    /// Returns `HttpError::FormEncode` if `params` cannot be encoded, or any
    /// deferred header error.
    pub fn query<T: Serialize + ?Sized>(mut self, params: &T) -> Result<Self, HttpError> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        let encoded = serde_urlencoded::to_string(params)?;
        if !encoded.is_empty() {
            let separator = if self.url.contains('?') { '&' } else { '?' };
            self.url.push(separator);
            self.url.push_str(&encoded);
        }
        Ok(self)
    }

    /// JSON body (`Content-Type: application/json` unless set explicitly).
    ///
    /// # Errors
    /// Returns `HttpError::Json` if serialization fails, or any deferred
    /// header error.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, HttpError> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.body = Body::Encoded {
            content_type: mime::APPLICATION_JSON.to_string(),
            bytes: Bytes::from(serde_json::to_vec(body)?),
        };
        Ok(self)
    }

    /// Form URL-encoded body.
    ///
    /// # Errors
    /// Returns `HttpError::FormEncode` if encoding fails, or any deferred
    /// header error.
    pub fn form<T: Serialize + ?Sized>(mut self, fields: &T) -> Result<Self, HttpError> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.body = Body::Encoded {
            content_type: mime::APPLICATION_WWW_FORM_URLENCODED.to_string(),
            bytes: Bytes::from(serde_urlencoded::to_string(fields)?),
        };
        Ok(self)
    }

    /// `multipart/form-data` body.
    pub fn multipart(mut self, form: &Multipart) -> Self {
        self.body = Body::Encoded {
            content_type: form.content_type(),
            bytes: form.encode(),
        };
        self
    }

    /// Raw body; the caller sets the content type.
    pub fn body_bytes(mut self, body: Bytes) -> Self {
        self.body = Body::Raw(body);
        self
    }

    /// Parse the URL and check its scheme against the transport mode.
    fn validate_url(&self) -> Result<http::Uri, HttpError> {
        let invalid = |kind, reason: String| HttpError::InvalidUri {
            url: self.url.clone(),
            kind,
            reason,
        };

        let uri: http::Uri = self
            .url
            .parse()
            .map_err(|e: http::uri::InvalidUri| invalid(InvalidUriKind::ParseError, e.to_string()))?;

        if uri.authority().is_none() {
            return Err(invalid(
                InvalidUriKind::MissingAuthority,
                "missing host/authority".to_owned(),
            ));
        }

        match (uri.scheme_str(), self.transport_security) {
            (Some("https"), _) | (Some("http"), TransportSecurity::AllowInsecureHttp) => Ok(uri),
            (Some("http"), TransportSecurity::TlsOnly) => Err(HttpError::InvalidScheme {
                scheme: "http".to_owned(),
                reason: "HTTPS required (transport security is TlsOnly)".to_owned(),
            }),
            (Some(scheme), _) => Err(HttpError::InvalidScheme {
                scheme: scheme.to_owned(),
                reason: "only http:// and https:// schemes are supported".to_owned(),
            }),
            (None, _) => Err(invalid(InvalidUriKind::MissingScheme, "missing scheme".to_owned())),
        }
    }

    /// Send the request.
    ///
    /// Succeeds for every HTTP status; use the [`HttpResponse`] helpers to
    /// turn non-2xx into errors.
    ///
    /// # Errors
    ///
    /// Returns `HttpError` if:
    /// - a header, body or URL was invalid
    /// - the URL scheme is not allowed by the transport security mode
    /// - the connection failed or the request timed out
    /// - the request queue is full (`Overloaded`)
    ///
    /// The request timeout starts here and also bounds the body reads of the
    /// returned response.
    pub async fn send(mut self) -> Result<HttpResponse, HttpError> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        let deadline = Instant::now() + self.request_timeout;

        let uri = self.validate_url()?;
        let mut builder = Request::builder().method(self.method).uri(uri);

        let has_content_type = self.headers.iter().any(|(name, _)| name == CONTENT_TYPE);
        let bytes = match self.body {
            Body::Empty => Bytes::new(),
            Body::Raw(bytes) => bytes,
            Body::Encoded {
                content_type,
                bytes,
            } => {
                if !has_content_type {
                    builder = builder.header(CONTENT_TYPE, content_type);
                }
                bytes
            }
        };
        for (name, value) in self.headers {
            builder = builder.header(name, value);
        }

        let request = builder.body(Full::new(bytes))?;

        try_acquire_buffer_slot(&mut self.service).await?;
        let inner: Response<ResponseBody> =
            self.service.call(request).await.map_err(map_buffer_error)?;

        Ok(HttpResponse {
            inner,
            max_body_size: self.max_body_size,
            deadline,
            request_timeout: self.request_timeout,
        })
    }
}

//! `multipart/form-data` request bodies.
//!
//! The whole form is encoded into memory before sending; uploads here are a
//! handful of product images, not streams.

use crate::error::HttpError;
use bytes::{BufMut, Bytes, BytesMut};
use mime::Mime;
use rand::Rng;
use rand::distr::Alphanumeric;
use serde::Serialize;

const BOUNDARY_LEN: usize = 32;

/// One part of a multipart form
#[derive(Debug, Clone)]
pub struct Part {
    name: String,
    file_name: Option<String>,
    content_type: Option<Mime>,
    data: Bytes,
}

impl Part {
    /// Plain text part without a content type.
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file_name: None,
            content_type: None,
            data: Bytes::from(value.into()),
        }
    }

    /// Part holding `value` serialized as JSON, tagged `application/json`.
    ///
    /// # Errors
    /// Returns `HttpError::Json` if serialization fails.
    pub fn json<T: Serialize + ?Sized>(name: impl Into<String>, value: &T) -> Result<Self, HttpError> {
        Ok(Self {
            name: name.into(),
            file_name: None,
            content_type: Some(mime::APPLICATION_JSON),
            data: Bytes::from(serde_json::to_vec(value)?),
        })
    }

    /// File part. The content type defaults to `application/octet-stream`.
    #[must_use]
    pub fn file(
        name: impl Into<String>,
        file_name: impl Into<String>,
        content_type: Option<Mime>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            file_name: Some(file_name.into()),
            content_type: Some(content_type.unwrap_or(mime::APPLICATION_OCTET_STREAM)),
            data: data.into(),
        }
    }

    /// Form field name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    fn write_headers(&self, out: &mut BytesMut) {
        out.put_slice(b"Content-Disposition: form-data; name=\"");
        out.put_slice(escape_quoted(&self.name).as_bytes());
        out.put_u8(b'"');
        if let Some(file_name) = &self.file_name {
            out.put_slice(b"; filename=\"");
            out.put_slice(escape_quoted(file_name).as_bytes());
            out.put_u8(b'"');
        }
        out.put_slice(b"\r\n");
        if let Some(content_type) = &self.content_type {
            out.put_slice(b"Content-Type: ");
            out.put_slice(content_type.as_ref().as_bytes());
            out.put_slice(b"\r\n");
        }
        out.put_slice(b"\r\n");
    }
}

/// Builder for a `multipart/form-data` body
#[derive(Debug, Clone)]
pub struct Multipart {
    boundary: String,
    parts: Vec<Part>,
}

impl Default for Multipart {
    fn default() -> Self {
        Self::new()
    }
}

impl Multipart {
    /// Empty form with a random boundary.
    #[must_use]
    pub fn new() -> Self {
        let token: String = rand::rng()
            .sample_iter(Alphanumeric)
            .take(BOUNDARY_LEN)
            .map(char::from)
            .collect();
        Self {
            boundary: format!("depot-{token}"),
            parts: Vec::new(),
        }
    }

    /// Append a part.
    #[must_use]
    pub fn part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    /// Boundary separating the parts
    #[must_use]
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Parts in insertion order
    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// `Content-Type` header value for this form.
    #[must_use]
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Encode the whole form.
    #[must_use]
    pub fn encode(&self) -> Bytes {
        let payload: usize = self.parts.iter().map(|p| p.data.len() + 128).sum();
        let mut out = BytesMut::with_capacity(payload + self.boundary.len() + 8);
        for part in &self.parts {
            out.put_slice(b"--");
            out.put_slice(self.boundary.as_bytes());
            out.put_slice(b"\r\n");
            part.write_headers(&mut out);
            out.put_slice(&part.data);
            out.put_slice(b"\r\n");
        }
        out.put_slice(b"--");
        out.put_slice(self.boundary.as_bytes());
        out.put_slice(b"--\r\n");
        out.freeze()
    }
}

fn escape_quoted(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace(['\r', '\n'], " ")
}

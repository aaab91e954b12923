//! Limits that protect the client from hostile or broken responses.

/// Maximum number of bytes of an error body kept in
/// [`HttpError::HttpStatus`](crate::HttpError::HttpStatus) (8KB).
pub const ERROR_BODY_PREVIEW_LIMIT: usize = 8 * 1024;

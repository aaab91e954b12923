//! Resource models.

mod ids;
mod lenient;
mod records;
mod requests;
mod session;
mod status;
mod timestamp;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ResourceError;

pub use ids::{ResourceId, ResourceKind};
pub use records::{Category, Client, CustomOrder, Employee, Item, Order, OrderUser, Ticket};
pub use requests::{
    ApprovalPatch, Attachment, CreateRequest, CustomOrderStatusPatch, ImageFile, ImageSlot,
    ItemImages, NewItem, OrderStatusPatch, ProfilePatch, ResourcePatch, TicketReplyPatch,
    UpdateAction, UpdateRequest,
};
pub use session::{Credentials, LoginResponse, UserData};
pub use status::{CustomOrderStatus, OrderStatus, TicketStatus};
pub use timestamp::Timestamp;

/// A record type managed by a list controller.
pub trait Resource: DeserializeOwned + Serialize + Clone + Send + Sync + 'static {
    const KIND: ResourceKind;

    /// Collections sorted ascending by identity after every load and create.
    const ORDERED_BY_ID: bool = false;

    /// Wire names of the fields searched by default.
    const SEARCH_FIELDS: &'static [&'static str];

    fn id(&self) -> ResourceId;

    /// Text of a searchable field by wire name; `None` for unknown or empty
    /// fields.
    fn field_text(&self, field: &str) -> Option<String>;
}

/// Decode one JSON value into a typed model.
///
/// # Errors
/// `MalformedResponse` when the value does not have the model's shape.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ResourceError> {
    serde_json::from_value(value).map_err(|e| ResourceError::malformed(e.to_string()))
}

/// Decode a list of JSON values, failing on the first bad element.
///
/// # Errors
/// `MalformedResponse` naming the index of the first bad element.
pub fn decode_all<T: DeserializeOwned>(values: Vec<Value>) -> Result<Vec<T>, ResourceError> {
    values
        .into_iter()
        .enumerate()
        .map(|(i, v)| {
            serde_json::from_value(v)
                .map_err(|e| ResourceError::malformed(format!("element {i}: {e}")))
        })
        .collect()
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_all_reports_bad_index() {
        let err = decode_all::<Item>(vec![json!({"id": 1, "name": "ok"}), json!({"name": "no id"})])
            .unwrap_err();
        match err {
            ResourceError::MalformedResponse { reason } => assert!(reason.starts_with("element 1:")),
            other => panic!("unexpected: {other}"),
        }
    }
}

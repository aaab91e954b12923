use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Resource;
use super::records::{CustomOrder, Employee, Order, Ticket};
use super::status::{CustomOrderStatus, OrderStatus};
use crate::error::ResourceError;

/// Which update endpoint a mutation goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateAction {
    /// Employee approval with salary and role.
    Approve,
    /// Employee profile edit.
    Profile,
    /// Order status change.
    Status,
    /// Ticket reply.
    Reply,
}

impl UpdateAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Profile => "profile",
            Self::Status => "status",
            Self::Reply => "reply",
        }
    }
}

/// Body of an update call.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRequest {
    pub action: UpdateAction,
    pub body: Value,
}

impl UpdateRequest {
    /// Validate `patch` and encode it.
    ///
    /// # Errors
    /// `ValidationFailed` when the patch is invalid or cannot be encoded.
    pub fn from_patch<P: ResourcePatch>(patch: &P) -> Result<Self, ResourceError> {
        patch.validate()?;
        let body = serde_json::to_value(patch)
            .map_err(|e| ResourceError::validation("payload", e.to_string()))?;
        Ok(Self {
            action: P::ACTION,
            body,
        })
    }
}

/// A typed change to one kind of resource.
pub trait ResourcePatch: Serialize + Send + Sync {
    type Target: Resource;
    const ACTION: UpdateAction;

    /// Local checks run before anything is sent.
    ///
    /// # Errors
    /// `ValidationFailed` naming the offending field.
    fn validate(&self) -> Result<(), ResourceError> {
        Ok(())
    }
}

/// Employee approval: salary and role.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApprovalPatch {
    pub salary: f64,
    pub role: String,
}

impl ResourcePatch for ApprovalPatch {
    type Target = Employee;
    const ACTION: UpdateAction = UpdateAction::Approve;

    fn validate(&self) -> Result<(), ResourceError> {
        if !self.salary.is_finite() || self.salary < 0.0 {
            return Err(ResourceError::validation(
                "salary",
                "must be a non-negative number",
            ));
        }
        if self.role.trim().is_empty() {
            return Err(ResourceError::validation("role", "must not be empty"));
        }
        Ok(())
    }
}

/// Employee profile edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    pub name: String,
    pub email: String,
    pub country: String,
    /// Digits only; `0` when unknown.
    pub contactno: i64,
    pub address: String,
    /// Base64 avatar; empty keeps the current one.
    pub image_base64: String,
}

impl ResourcePatch for ProfilePatch {
    type Target = Employee;
    const ACTION: UpdateAction = UpdateAction::Profile;

    fn validate(&self) -> Result<(), ResourceError> {
        if self.name.trim().is_empty() {
            return Err(ResourceError::validation("name", "must not be empty"));
        }
        if !self.email.contains('@') {
            return Err(ResourceError::validation("email", "must be an email address"));
        }
        if self.contactno < 0 {
            return Err(ResourceError::validation("contactno", "must be digits only"));
        }
        Ok(())
    }
}

/// New status for a custom order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomOrderStatusPatch {
    pub order_status: CustomOrderStatus,
}

impl ResourcePatch for CustomOrderStatusPatch {
    type Target = CustomOrder;
    const ACTION: UpdateAction = UpdateAction::Status;

    fn validate(&self) -> Result<(), ResourceError> {
        if self.order_status.is_known() {
            Ok(())
        } else {
            Err(ResourceError::validation(
                "orderStatus",
                format!("unknown status '{}'", self.order_status),
            ))
        }
    }
}

/// New status for a standard order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusPatch {
    pub order_status: OrderStatus,
}

impl ResourcePatch for OrderStatusPatch {
    type Target = Order;
    const ACTION: UpdateAction = UpdateAction::Status;

    fn validate(&self) -> Result<(), ResourceError> {
        if self.order_status.is_known() {
            Ok(())
        } else {
            Err(ResourceError::validation(
                "orderStatus",
                format!("unknown status '{}'", self.order_status),
            ))
        }
    }
}

/// Staff reply to a support ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketReplyPatch {
    pub reply: String,
}

impl ResourcePatch for TicketReplyPatch {
    type Target = Ticket;
    const ACTION: UpdateAction = UpdateAction::Reply;

    fn validate(&self) -> Result<(), ResourceError> {
        if self.reply.trim().is_empty() {
            return Err(ResourceError::validation("reply", "must not be empty"));
        }
        Ok(())
    }
}

/// File uploaded alongside a create call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Multipart field name.
    pub field: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Body of a create call.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateRequest {
    pub payload: Value,
    pub attachments: Vec<Attachment>,
}

impl CreateRequest {
    /// Validated item creation with up to four images.
    ///
    /// # Errors
    /// `ValidationFailed` when `item` is invalid.
    pub fn new_item(item: &NewItem, images: ItemImages) -> Result<Self, ResourceError> {
        item.validate()?;
        let payload = serde_json::to_value(item)
            .map_err(|e| ResourceError::validation("item", e.to_string()))?;
        Ok(Self {
            payload,
            attachments: images.into_attachments(),
        })
    }
}

/// Catalog item as submitted on creation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Option<f64>,
    #[serde(default)]
    pub category: String,
    pub quantity: Option<i64>,
    #[serde(default)]
    pub bestseller: bool,
}

impl NewItem {
    /// Name non-empty, price present and non-negative, quantity present.
    ///
    /// # Errors
    /// `ValidationFailed` naming the first offending field.
    pub fn validate(&self) -> Result<(), ResourceError> {
        if self.name.trim().is_empty() {
            return Err(ResourceError::validation("name", "is required"));
        }
        match self.price {
            None => return Err(ResourceError::validation("price", "is required")),
            Some(p) if !p.is_finite() || p < 0.0 => {
                return Err(ResourceError::validation("price", "must not be negative"));
            }
            Some(_) => {}
        }
        if self.quantity.is_none() {
            return Err(ResourceError::validation("quantity", "is required"));
        }
        Ok(())
    }
}

/// The four product image positions of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ImageSlot {
    Image1,
    Image2,
    Image3,
    Image4,
}

impl ImageSlot {
    pub const ALL: [Self; 4] = [Self::Image1, Self::Image2, Self::Image3, Self::Image4];

    /// Multipart part name for this slot.
    #[must_use]
    pub const fn part_name(self) -> &'static str {
        match self {
            Self::Image1 => "image1",
            Self::Image2 => "image2",
            Self::Image3 => "image3",
            Self::Image4 => "image4",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Image1 => 0,
            Self::Image2 => 1,
            Self::Image3 => 2,
            Self::Image4 => 3,
        }
    }
}

/// Image file picked for a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Images of a new item, at most one per slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemImages {
    slots: [Option<ImageFile>; 4],
}

impl ItemImages {
    /// Put `file` into `slot`, replacing any previous file there.
    pub fn set(&mut self, slot: ImageSlot, file: ImageFile) -> &mut Self {
        self.slots[slot.index()] = Some(file);
        self
    }

    #[must_use]
    pub fn get(&self, slot: ImageSlot) -> Option<&ImageFile> {
        self.slots[slot.index()].as_ref()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Filled slots as multipart attachments, in slot order.
    #[must_use]
    pub fn into_attachments(self) -> Vec<Attachment> {
        ImageSlot::ALL
            .into_iter()
            .zip(self.slots)
            .filter_map(|(slot, file)| {
                file.map(|f| Attachment {
                    field: slot.part_name().to_owned(),
                    file_name: f.file_name,
                    content_type: f.content_type,
                    bytes: f.bytes,
                })
            })
            .collect()
    }
}

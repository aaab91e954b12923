//! Resources SDK
//!
//! Public contracts of the `resources` module:
//! - `ResourceGateway` / `SessionGateway` traits implemented by the REST gateway
//!   (and by in-memory fakes in tests)
//! - typed resource models (`Employee`, `Client`, `Item`, ...) and the
//!   `Resource` trait the list controller is generic over
//! - `ResourceError`, the error taxonomy every operation reports
//!
//! ## Usage
//!
//! ```ignore
//! use resources_sdk::{ResourceGateway, ResourceKind};
//!
//! let raw = gateway.list(ResourceKind::Employees).await?;
//! let employees: Vec<Employee> = resources_sdk::decode_all(raw)?;
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod api;
pub mod error;
pub mod models;

pub use api::{ResourceGateway, SessionGateway};
pub use error::ResourceError;
pub use models::{
    ApprovalPatch, Attachment, Category, Client, CreateRequest, Credentials, CustomOrder,
    CustomOrderStatus, CustomOrderStatusPatch, Employee, ImageFile, ImageSlot, Item, ItemImages,
    LoginResponse, NewItem, Order, OrderStatus, OrderStatusPatch, OrderUser, ProfilePatch,
    Resource, ResourceId, ResourceKind, ResourcePatch, Ticket, TicketReplyPatch, TicketStatus,
    Timestamp, UpdateAction, UpdateRequest, UserData, decode, decode_all,
};

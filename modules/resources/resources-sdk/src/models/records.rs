use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ids::{ResourceId, ResourceKind};
use super::lenient;
use super::status::{CustomOrderStatus, OrderStatus, TicketStatus};
use super::timestamp::Timestamp;
use super::Resource;

fn join_name(first: &str, last: &str) -> String {
    format!("{first} {last}").trim().to_owned()
}

/// Staff member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// Base64 avatar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub role: Option<String>,
    pub country: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub contactno: Option<String>,
    pub address: Option<String>,
    pub salary: Option<f64>,
    pub status: Option<String>,
    pub description: Option<String>,
    pub djoined: Option<Timestamp>,
}

impl Resource for Employee {
    const KIND: ResourceKind = ResourceKind::Employees;
    const ORDERED_BY_ID: bool = true;
    const SEARCH_FIELDS: &'static [&'static str] = &["id", "name", "country", "status"];

    fn id(&self) -> ResourceId {
        ResourceId::Numeric(self.id)
    }

    fn field_text(&self, field: &str) -> Option<String> {
        match field {
            "id" => Some(self.id.to_string()),
            "name" => Some(self.name.clone()),
            "email" => Some(self.email.clone()),
            "role" => self.role.clone(),
            "country" => self.country.clone(),
            "status" => self.status.clone(),
            "contactno" => self.contactno.clone(),
            "address" => self.address.clone(),
            _ => None,
        }
    }
}

/// Registered customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    pub country: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub contact_no: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub zipcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub djoined: Option<Timestamp>,
}

impl Client {
    /// `"first last"`, or `N/A` when both are blank.
    #[must_use]
    pub fn display_name(&self) -> String {
        let name = join_name(&self.first_name, &self.last_name);
        if name.is_empty() { "N/A".to_owned() } else { name }
    }
}

impl Resource for Client {
    const KIND: ResourceKind = ResourceKind::Clients;
    const ORDERED_BY_ID: bool = true;
    const SEARCH_FIELDS: &'static [&'static str] = &["id", "name", "email", "country"];

    fn id(&self) -> ResourceId {
        ResourceId::Numeric(self.id)
    }

    fn field_text(&self, field: &str) -> Option<String> {
        match field {
            "id" => Some(self.id.to_string()),
            "name" => Some(self.display_name()),
            "email" => Some(self.email.clone()),
            "country" => self.country.clone(),
            "city" => self.city.clone(),
            "contactNo" => self.contact_no.clone(),
            _ => None,
        }
    }
}

/// Catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub quantity: Option<i64>,
    pub bestseller: Option<bool>,
    pub image1: Option<String>,
    pub image2: Option<String>,
    pub image3: Option<String>,
    pub image4: Option<String>,
}

impl Resource for Item {
    const KIND: ResourceKind = ResourceKind::Items;
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "category"];

    fn id(&self) -> ResourceId {
        ResourceId::Numeric(self.id)
    }

    fn field_text(&self, field: &str) -> Option<String> {
        match field {
            "id" => Some(self.id.to_string()),
            "name" => Some(self.name.clone()),
            "category" => self.category.clone(),
            "description" => self.description.clone(),
            _ => None,
        }
    }
}

/// Product category. Older backends send only the name, which then doubles
/// as the identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ResourceId>,
    pub category: String,
}

impl Resource for Category {
    const KIND: ResourceKind = ResourceKind::Categories;
    const SEARCH_FIELDS: &'static [&'static str] = &["category"];

    fn id(&self) -> ResourceId {
        self.id
            .clone()
            .unwrap_or_else(|| ResourceId::Text(self.category.clone()))
    }

    fn field_text(&self, field: &str) -> Option<String> {
        match field {
            "id" => Some(self.id().to_string()),
            "category" => Some(self.category.clone()),
            _ => None,
        }
    }
}

/// Customer request for a product outside the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomOrder {
    pub id: i64,
    pub image1_url: Option<String>,
    pub image2_url: Option<String>,
    pub image3_url: Option<String>,
    pub image4_url: Option<String>,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_email: String,
    pub street: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub zip_code: Option<String>,
    pub country: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub contact_number: Option<String>,
    pub product_link: Option<String>,
    pub product_description: Option<String>,
    pub payment_method: Option<String>,
    pub payment_status: Option<String>,
    #[serde(default)]
    pub order_status: CustomOrderStatus,
    pub created_at: Option<Timestamp>,
}

impl Resource for CustomOrder {
    const KIND: ResourceKind = ResourceKind::CustomOrders;
    const SEARCH_FIELDS: &'static [&'static str] = &[
        "id",
        "productName",
        "customerName",
        "customerEmail",
        "orderStatus",
    ];

    fn id(&self) -> ResourceId {
        ResourceId::Numeric(self.id)
    }

    fn field_text(&self, field: &str) -> Option<String> {
        match field {
            "id" => Some(self.id.to_string()),
            "productName" => Some(self.product_name.clone()),
            "customerName" => Some(self.customer_name.clone()),
            "customerEmail" => Some(self.customer_email.clone()),
            "orderStatus" => Some(self.order_status.to_string()),
            "paymentStatus" => self.payment_status.clone(),
            "country" => self.country.clone(),
            _ => None,
        }
    }
}

/// Customer embedded in a standard order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUser {
    pub id: Option<i64>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub contact_no: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub zipcode: Option<String>,
    pub country: Option<String>,
}

/// Checkout order. Line items are kept as the backend sent them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub user: Option<OrderUser>,
    #[serde(default)]
    pub items: Vec<Value>,
    pub items_total: Option<f64>,
    pub shipping_charges: Option<f64>,
    pub other_charges: Option<f64>,
    pub total_amount: Option<f64>,
    pub payment_method: Option<String>,
    pub payment_status: Option<String>,
    #[serde(default)]
    pub order_status: OrderStatus,
    pub created_at: Option<Timestamp>,
}

impl Order {
    /// Customer's full name, empty when the order has no user.
    #[must_use]
    pub fn customer_name(&self) -> String {
        self.user
            .as_ref()
            .map(|u| join_name(&u.first_name, &u.last_name))
            .unwrap_or_default()
    }
}

impl Resource for Order {
    const KIND: ResourceKind = ResourceKind::Orders;
    const SEARCH_FIELDS: &'static [&'static str] =
        &["id", "orderStatus", "paymentStatus", "customer", "email"];

    fn id(&self) -> ResourceId {
        ResourceId::Numeric(self.id)
    }

    fn field_text(&self, field: &str) -> Option<String> {
        match field {
            "id" => Some(self.id.to_string()),
            "orderStatus" => Some(self.order_status.to_string()),
            "paymentStatus" => self.payment_status.clone(),
            "paymentMethod" => self.payment_method.clone(),
            "customer" => Some(self.customer_name()),
            "email" => self.user.as_ref().map(|u| u.email.clone()),
            _ => None,
        }
    }
}

/// Support ticket raised by a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
    pub reply: Option<String>,
    #[serde(default)]
    pub replied: bool,
}

impl Ticket {
    #[must_use]
    pub const fn status(&self) -> TicketStatus {
        TicketStatus::from_replied(self.replied)
    }
}

impl Resource for Ticket {
    const KIND: ResourceKind = ResourceKind::Tickets;
    const SEARCH_FIELDS: &'static [&'static str] =
        &["id", "userId", "name", "subject", "email", "status"];

    fn id(&self) -> ResourceId {
        ResourceId::Numeric(self.id)
    }

    fn field_text(&self, field: &str) -> Option<String> {
        match field {
            "id" => Some(self.id.to_string()),
            "userId" => self.user_id.clone(),
            "name" => Some(self.name.clone()),
            "subject" => Some(self.subject.clone()),
            "email" => Some(self.email.clone()),
            "status" => Some(self.status().to_string()),
            "message" => Some(self.message.clone()),
            _ => None,
        }
    }
}

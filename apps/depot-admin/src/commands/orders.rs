use clap::Subcommand;
use resources::domain::{CustomOrderStatusDraft, DetailPresenter, OrderStatusDraft};
use resources_sdk::{CustomOrder, Order};

use super::Context;

const CUSTOM_COLUMNS: &[&str] = &[
    "id",
    "productName",
    "customerName",
    "orderStatus",
    "paymentStatus",
    "country",
];
const ORDER_COLUMNS: &[&str] = &[
    "id",
    "customer",
    "email",
    "orderStatus",
    "paymentStatus",
    "paymentMethod",
];

#[derive(Subcommand)]
pub enum CustomOrdersCommand {
    /// List custom orders, optionally filtered
    List {
        #[arg(long)]
        search: Option<String>,
    },
    /// Move a custom order to another status (Pending, Approve, Reject, Hold,
    /// Processing, Completed)
    Status { id: i64, status: String },
    /// Delete a custom order
    Delete { id: i64 },
}

impl CustomOrdersCommand {
    pub async fn run(self, ctx: &Context) -> anyhow::Result<()> {
        match self {
            Self::List { search } => {
                ctx.list::<CustomOrder>(search.as_deref(), CUSTOM_COLUMNS)
                    .await
            }
            Self::Status { id, status } => {
                let mut presenter: DetailPresenter<CustomOrder, CustomOrderStatusDraft> =
                    ctx.open(id).await?;
                presenter.draft_mut().status = status;
                ctx.commit(&mut presenter).await
            }
            Self::Delete { id } => ctx.delete::<CustomOrder>(id).await,
        }
    }
}

#[derive(Subcommand)]
pub enum OrdersCommand {
    /// List standard orders, optionally filtered
    List {
        #[arg(long)]
        search: Option<String>,
    },
    /// Move an order to another status (PENDING, PROCESSING, READY_TO_SHIP,
    /// SHIPPED, DELIVERED, CANCELLED)
    Status { id: i64, status: String },
}

impl OrdersCommand {
    pub async fn run(self, ctx: &Context) -> anyhow::Result<()> {
        match self {
            Self::List { search } => ctx.list::<Order>(search.as_deref(), ORDER_COLUMNS).await,
            Self::Status { id, status } => {
                let mut presenter: DetailPresenter<Order, OrderStatusDraft> = ctx.open(id).await?;
                presenter.draft_mut().status = status;
                ctx.commit(&mut presenter).await
            }
        }
    }
}

pub mod controller;
pub mod dashboard;
pub mod filter;
pub mod notify;
pub mod presenter;
pub mod session;

pub use controller::{ListController, ListSnapshot, LoadState};
pub use dashboard::{Bucket, DashboardStats, load_dashboard};
pub use filter::Filter;
pub use notify::{NoticeLevel, Notifier, TracingNotifier};
pub use presenter::{
    ApprovalDraft, CustomOrderStatusDraft, DetailPresenter, Draft, NoDraft, OrderStatusDraft,
    PrepareFrom, ProfileDraft, ReplyDraft,
};
pub use session::SessionContext;

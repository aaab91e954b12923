//! Detail presenter: one selected item, an editable draft and a commit that
//! closes only after the server confirms.

use std::marker::PhantomData;
use std::sync::Arc;

use resources_sdk::{
    ApprovalPatch, CustomOrder, CustomOrderStatusPatch, Employee, Order, OrderStatusPatch,
    ProfilePatch, Resource, ResourceError, ResourceId, ResourcePatch, Ticket, TicketReplyPatch,
    TicketStatus,
};
use tracing::debug;

use super::controller::ListController;

/// Editable form state turned into a typed patch on commit.
pub trait Draft<R: Resource>: Default + Send {
    type Patch: ResourcePatch<Target = R>;

    /// Seed the draft from the item just opened.
    fn prepare(&mut self, item: &R);

    /// # Errors
    /// `ValidationFailed` when the draft cannot become a patch.
    fn to_patch(&self, item: &R) -> Result<Self::Patch, ResourceError>;
}

/// Draft type of presenters that only view and delete.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDraft;

/// Detail view over a [`ListController`].
pub struct DetailPresenter<R: Resource, D = NoDraft> {
    controller: Arc<ListController<R>>,
    selected: Option<R>,
    draft: D,
    error: Option<ResourceError>,
    _kind: PhantomData<fn() -> R>,
}

impl<R: Resource, D: Default> DetailPresenter<R, D> {
    #[must_use]
    pub fn new(controller: Arc<ListController<R>>) -> Self {
        Self {
            controller,
            selected: None,
            draft: D::default(),
            error: None,
            _kind: PhantomData,
        }
    }

    /// Select `id` in the controller and show it.
    ///
    /// # Errors
    /// `NotFound` when the controller does not hold `id`.
    pub fn open(&mut self, id: &ResourceId) -> Result<&R, ResourceError>
    where
        D: PrepareFrom<R>,
    {
        let item = self.controller.select(id)?;
        self.draft = D::default();
        self.draft.prepare_from(&item);
        self.error = None;
        Ok(self.selected.insert(item))
    }

    /// Hide the detail view and drop the draft.
    pub fn close(&mut self) {
        self.selected = None;
        self.draft = D::default();
        self.error = None;
        self.controller.clear_selection();
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.selected.is_some()
    }

    #[must_use]
    pub fn selected(&self) -> Option<&R> {
        self.selected.as_ref()
    }

    #[must_use]
    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut D {
        &mut self.draft
    }

    /// Error of the last failed commit or delete, shown inline.
    #[must_use]
    pub fn error(&self) -> Option<&ResourceError> {
        self.error.as_ref()
    }

    /// Delete the open item and close on success.
    ///
    /// # Errors
    /// `NotFound` when nothing is open, otherwise any controller error; the
    /// view stays open with the error set.
    pub async fn delete(&mut self) -> Result<(), ResourceError> {
        let id = self.open_id()?;
        match self.controller.remove_item(&id).await {
            Ok(()) => {
                self.close();
                Ok(())
            }
            Err(err) => {
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }

    fn open_id(&self) -> Result<ResourceId, ResourceError> {
        self.selected.as_ref().map(Resource::id).ok_or_else(|| {
            ResourceError::not_found(R::KIND, ResourceId::Text(String::new()))
        })
    }
}

impl<R: Resource, D: Draft<R>> DetailPresenter<R, D> {
    /// Send the draft as a patch. On success the view closes and the updated
    /// item is returned; on failure the view stays open with the draft intact.
    ///
    /// # Errors
    /// `NotFound` when nothing is open, `ValidationFailed` for a bad draft,
    /// otherwise any controller error.
    pub async fn commit(&mut self) -> Result<R, ResourceError> {
        let result = self.try_commit().await;
        match result {
            Ok(item) => {
                debug!(kind = %R::KIND, id = %item.id(), "commit confirmed");
                self.close();
                Ok(item)
            }
            Err(err) => {
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }

    async fn try_commit(&self) -> Result<R, ResourceError> {
        let item = self
            .selected
            .as_ref()
            .ok_or_else(|| ResourceError::not_found(R::KIND, ResourceId::Text(String::new())))?;
        let patch = self.draft.to_patch(item)?;
        self.controller.mutate(&item.id(), &patch).await
    }
}

/// Seeding hook used by [`DetailPresenter::open`]; implemented for every
/// [`Draft`] and for [`NoDraft`].
pub trait PrepareFrom<R> {
    fn prepare_from(&mut self, item: &R);
}

impl<R> PrepareFrom<R> for NoDraft {
    fn prepare_from(&mut self, _: &R) {}
}

macro_rules! prepare_via_draft {
    ($($draft:ty => $res:ty),* $(,)?) => {$(
        impl PrepareFrom<$res> for $draft {
            fn prepare_from(&mut self, item: &$res) {
                Draft::prepare(self, item);
            }
        }
    )*};
}

prepare_via_draft! {
    ApprovalDraft => Employee,
    ProfileDraft => Employee,
    CustomOrderStatusDraft => CustomOrder,
    OrderStatusDraft => Order,
    ReplyDraft => Ticket,
}

/// Approval form: salary as typed, role defaulting to `Employee`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalDraft {
    pub salary: String,
    pub role: String,
}

impl Default for ApprovalDraft {
    fn default() -> Self {
        Self {
            salary: String::new(),
            role: "Employee".to_owned(),
        }
    }
}

impl Draft<Employee> for ApprovalDraft {
    type Patch = ApprovalPatch;

    fn prepare(&mut self, item: &Employee) {
        if let Some(role) = item.role.as_deref().filter(|r| !r.trim().is_empty()) {
            role.clone_into(&mut self.role);
        }
        if let Some(salary) = item.salary {
            self.salary = salary.to_string();
        }
    }

    fn to_patch(&self, _: &Employee) -> Result<ApprovalPatch, ResourceError> {
        let text = self.salary.trim();
        if text.is_empty() {
            return Err(ResourceError::validation("salary", "is required"));
        }
        let salary: f64 = text
            .parse()
            .map_err(|_| ResourceError::validation("salary", "must be a number"))?;
        if !salary.is_finite() || salary < 0.0 {
            return Err(ResourceError::validation("salary", "must not be negative"));
        }
        Ok(ApprovalPatch {
            salary,
            role: self.role.trim().to_owned(),
        })
    }
}

/// Profile form with every field as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDraft {
    pub name: String,
    pub email: String,
    pub country: String,
    pub contactno: String,
    pub address: String,
    /// Base64 of a newly picked avatar; empty keeps the current one.
    pub image_base64: String,
}

impl Draft<Employee> for ProfileDraft {
    type Patch = ProfilePatch;

    fn prepare(&mut self, item: &Employee) {
        self.name.clone_from(&item.name);
        self.email.clone_from(&item.email);
        self.country = item.country.clone().unwrap_or_default();
        self.contactno = item.contactno.clone().unwrap_or_default();
        self.address = item.address.clone().unwrap_or_default();
        self.image_base64.clear();
    }

    fn to_patch(&self, _: &Employee) -> Result<ProfilePatch, ResourceError> {
        let digits = self.contactno.trim();
        let contactno = if digits.is_empty() {
            0
        } else if digits.bytes().all(|b| b.is_ascii_digit()) {
            digits
                .parse()
                .map_err(|_| ResourceError::validation("contactno", "is too long"))?
        } else {
            return Err(ResourceError::validation("contactno", "must be digits only"));
        };
        Ok(ProfilePatch {
            name: self.name.trim().to_owned(),
            email: self.email.trim().to_owned(),
            country: self.country.trim().to_owned(),
            contactno,
            address: self.address.trim().to_owned(),
            image_base64: self.image_base64.clone(),
        })
    }
}

/// Custom order status picker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomOrderStatusDraft {
    pub status: String,
}

impl Draft<CustomOrder> for CustomOrderStatusDraft {
    type Patch = CustomOrderStatusPatch;

    fn prepare(&mut self, item: &CustomOrder) {
        self.status = item.order_status.to_string();
    }

    fn to_patch(&self, _: &CustomOrder) -> Result<CustomOrderStatusPatch, ResourceError> {
        Ok(CustomOrderStatusPatch {
            order_status: self.status.parse()?,
        })
    }
}

/// Standard order status picker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderStatusDraft {
    pub status: String,
}

impl Draft<Order> for OrderStatusDraft {
    type Patch = OrderStatusPatch;

    fn prepare(&mut self, item: &Order) {
        self.status = item.order_status.to_string();
    }

    fn to_patch(&self, _: &Order) -> Result<OrderStatusPatch, ResourceError> {
        Ok(OrderStatusPatch {
            order_status: self.status.parse()?,
        })
    }
}

/// Reply box of an open ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplyDraft {
    pub reply: String,
}

impl Draft<Ticket> for ReplyDraft {
    type Patch = TicketReplyPatch;

    fn prepare(&mut self, _: &Ticket) {
        self.reply.clear();
    }

    fn to_patch(&self, item: &Ticket) -> Result<TicketReplyPatch, ResourceError> {
        if item.status() == TicketStatus::Closed {
            return Err(ResourceError::validation("reply", "ticket is already closed"));
        }
        Ok(TicketReplyPatch {
            reply: self.reply.trim().to_owned(),
        })
    }
}

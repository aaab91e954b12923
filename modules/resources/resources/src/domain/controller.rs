//! Generic list controller: full collection fetch, filtered view, selection
//! and server-confirmed mutations reconciled into the held collection.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use resources_sdk::{
    CreateRequest, Resource, ResourceError, ResourceGateway, ResourceId, ResourcePatch,
    UpdateRequest, decode, decode_all,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::filter::Filter;
use super::notify::Notifier;

/// Lifecycle of the held collection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    /// Last load failed; the previously loaded collection is still held.
    Failed(ResourceError),
}

/// Point-in-time copy of a controller's state.
#[derive(Debug, Clone)]
pub struct ListSnapshot<R> {
    pub state: LoadState,
    /// Full collection as last fetched and reconciled.
    pub items: Vec<R>,
    /// Items matching the current filter, in collection order.
    pub view: Vec<R>,
    pub selection: Option<R>,
    pub filter: String,
    pub last_error: Option<ResourceError>,
}

struct State<R> {
    load: LoadState,
    items: Vec<R>,
    view: Vec<R>,
    filter: Filter,
    selection: Option<ResourceId>,
    last_error: Option<ResourceError>,
    generation: u64,
    in_flight: HashSet<ResourceId>,
}

impl<R: Resource> State<R> {
    fn position(&self, id: &ResourceId) -> Option<usize> {
        self.items.iter().position(|item| &item.id() == id)
    }

    fn refresh_view(&mut self) {
        self.view = self.filter.apply(&self.items);
    }

    fn sort_if_ordered(&mut self) {
        if R::ORDERED_BY_ID {
            self.items.sort_by_key(R::id);
        }
    }

    /// Replace the item with the same identity, or add it.
    fn upsert(&mut self, item: R) {
        match self.position(&item.id()) {
            Some(pos) => self.items[pos] = item,
            None => {
                self.items.push(item);
                self.sort_if_ordered();
            }
        }
        self.refresh_view();
    }
}

/// Controller for one resource collection.
///
/// `Send + Sync`; share it through `Arc`. The state lock is never held across
/// a gateway call. Mutations are never applied optimistically: the collection
/// only changes after the server confirms, and then takes the server's
/// representation of the item.
pub struct ListController<R: Resource> {
    gateway: Arc<dyn ResourceGateway>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<State<R>>,
    cancel: CancellationToken,
}

/// Marks an identity as having a mutation in flight until dropped.
struct InFlight<'a, R: Resource> {
    controller: &'a ListController<R>,
    id: ResourceId,
}

impl<R: Resource> Drop for InFlight<'_, R> {
    fn drop(&mut self) {
        self.controller.state.lock().in_flight.remove(&self.id);
    }
}

impl<R: Resource> ListController<R> {
    #[must_use]
    pub fn new(gateway: Arc<dyn ResourceGateway>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            gateway,
            notifier,
            state: Mutex::new(State {
                load: LoadState::Idle,
                items: Vec::new(),
                view: Vec::new(),
                filter: Filter::default(),
                selection: None,
                last_error: None,
                generation: 0,
                in_flight: HashSet::new(),
            }),
            cancel: CancellationToken::new(),
        }
    }

    /// Fetch the whole collection.
    ///
    /// On success the collection is replaced, the filter is cleared and the
    /// state becomes `Ready`. On failure the state becomes `Failed` and the
    /// previously held collection stays visible. A response that arrives after
    /// a newer `load` started, or after [`teardown`](Self::teardown), is
    /// dropped and `Ok(())` is returned.
    ///
    /// # Errors
    /// Any gateway error, or `MalformedResponse` when an element does not
    /// decode.
    #[instrument(skip_all, fields(kind = %R::KIND))]
    pub async fn load(&self) -> Result<(), ResourceError> {
        self.ensure_live("load")?;
        let generation = {
            let mut st = self.state.lock();
            st.generation += 1;
            st.load = LoadState::Loading;
            st.generation
        };
        debug!(generation, "loading collection");

        let result = self
            .gateway
            .list(R::KIND)
            .await
            .and_then(decode_all::<R>);

        if self.cancel.is_cancelled() {
            debug!(generation, "controller torn down; dropping load result");
            return Ok(());
        }

        let mut st = self.state.lock();
        if st.generation != generation {
            debug!(generation, current = st.generation, "superseded load; dropping result");
            return Ok(());
        }
        match result {
            Ok(items) => {
                st.items = items;
                st.sort_if_ordered();
                st.filter = Filter::default();
                st.refresh_view();
                if let Some(selected) = st.selection.clone()
                    && st.position(&selected).is_none()
                {
                    st.selection = None;
                }
                st.load = LoadState::Ready;
                st.last_error = None;
                info!(count = st.items.len(), "collection loaded");
                Ok(())
            }
            Err(err) => {
                st.load = LoadState::Failed(err.clone());
                st.last_error = Some(err.clone());
                drop(st);
                Err(self.report("load", err))
            }
        }
    }

    /// Recompute the filtered view. Blank text shows the full collection; an
    /// empty field list searches the resource's default fields.
    pub fn set_filter(&self, text: &str, fields: &[&str]) {
        let mut st = self.state.lock();
        st.filter = Filter::new(text, fields);
        st.refresh_view();
    }

    /// [`set_filter`](Self::set_filter) over the default search fields.
    pub fn search(&self, text: &str) {
        self.set_filter(text, R::SEARCH_FIELDS);
    }

    /// Select the item `id`.
    ///
    /// # Errors
    /// `NotFound` when the collection has no such item.
    pub fn select(&self, id: &ResourceId) -> Result<R, ResourceError> {
        let mut st = self.state.lock();
        match st.position(id) {
            Some(pos) => {
                st.selection = Some(id.clone());
                Ok(st.items[pos].clone())
            }
            None => {
                drop(st);
                Err(self.report("select", ResourceError::not_found(R::KIND, id.clone())))
            }
        }
    }

    pub fn clear_selection(&self) {
        self.state.lock().selection = None;
    }

    /// Send `patch` for item `id` and replace the item with the server's
    /// answer.
    ///
    /// # Errors
    /// * `NotFound` - `id` is not in the collection; nothing is sent
    /// * `ConcurrentMutation` - another mutation of `id` is in flight
    /// * `ValidationFailed` - the patch failed local checks
    /// * any gateway error; the collection is left untouched
    #[instrument(skip_all, fields(kind = %R::KIND, id = %id))]
    pub async fn mutate<P>(&self, id: &ResourceId, patch: &P) -> Result<R, ResourceError>
    where
        P: ResourcePatch<Target = R>,
    {
        let request = UpdateRequest::from_patch(patch).map_err(|e| self.report("update", e))?;
        let _guard = self.begin_mutation(id, "update")?;

        let result = self
            .gateway
            .update(R::KIND, id, request)
            .await
            .and_then(decode::<R>);

        match result {
            Ok(item) => {
                if self.cancel.is_cancelled() {
                    debug!("controller torn down; not reconciling update");
                    return Ok(item);
                }
                let mut st = self.state.lock();
                if let Some(pos) = st.position(id) {
                    st.items[pos] = item.clone();
                    st.sort_if_ordered();
                    st.refresh_view();
                }
                drop(st);
                info!(action = P::ACTION.as_str(), "item updated");
                self.notifier
                    .success(&format!("{} {id} updated", R::KIND));
                Ok(item)
            }
            Err(err) => Err(self.report("update", err)),
        }
    }

    /// Delete item `id` on the server, then drop it locally and clear a
    /// matching selection.
    ///
    /// # Errors
    /// Same as [`mutate`](Self::mutate), minus validation.
    #[instrument(skip_all, fields(kind = %R::KIND, id = %id))]
    pub async fn remove_item(&self, id: &ResourceId) -> Result<(), ResourceError> {
        let _guard = self.begin_mutation(id, "delete")?;

        match self.gateway.remove(R::KIND, id).await {
            Ok(()) => {
                if self.cancel.is_cancelled() {
                    debug!("controller torn down; not reconciling delete");
                    return Ok(());
                }
                let mut st = self.state.lock();
                st.items.retain(|item| &item.id() != id);
                if st.selection.as_ref() == Some(id) {
                    st.selection = None;
                }
                st.refresh_view();
                drop(st);
                info!("item deleted");
                self.notifier
                    .success(&format!("{} {id} deleted", R::KIND));
                Ok(())
            }
            Err(err) => Err(self.report("delete", err)),
        }
    }

    /// Create an item and add the server's representation to the collection.
    ///
    /// # Errors
    /// Any gateway error; nothing changes locally.
    #[instrument(skip_all, fields(kind = %R::KIND))]
    pub async fn create(&self, request: CreateRequest) -> Result<R, ResourceError> {
        self.ensure_live("create")?;
        let result = self
            .gateway
            .create(R::KIND, request)
            .await
            .and_then(decode::<R>);

        match result {
            Ok(item) => {
                if self.cancel.is_cancelled() {
                    return Ok(item);
                }
                self.state.lock().upsert(item.clone());
                info!(id = %item.id(), "item created");
                self.notifier
                    .success(&format!("{} {} created", R::KIND, item.id()));
                Ok(item)
            }
            Err(err) => Err(self.report("create", err)),
        }
    }

    /// Re-read one item from the server and reconcile it.
    ///
    /// # Errors
    /// Any gateway error; nothing changes locally.
    #[instrument(skip_all, fields(kind = %R::KIND, id = %id))]
    pub async fn refresh_one(&self, id: &ResourceId) -> Result<R, ResourceError> {
        self.ensure_live("refresh")?;
        let result = self.gateway.get(R::KIND, id).await.and_then(decode::<R>);
        match result {
            Ok(item) => {
                if !self.cancel.is_cancelled() {
                    self.state.lock().upsert(item.clone());
                }
                Ok(item)
            }
            Err(err) => Err(self.report("refresh", err)),
        }
    }

    /// Drop the collection and ignore every response still in flight.
    pub fn teardown(&self) {
        self.cancel.cancel();
        let mut st = self.state.lock();
        st.items.clear();
        st.view.clear();
        st.selection = None;
        st.filter = Filter::default();
        st.load = LoadState::Idle;
        debug!(kind = %R::KIND, "controller torn down");
    }

    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    #[must_use]
    pub fn snapshot(&self) -> ListSnapshot<R> {
        let st = self.state.lock();
        ListSnapshot {
            state: st.load.clone(),
            items: st.items.clone(),
            view: st.view.clone(),
            selection: st
                .selection
                .as_ref()
                .and_then(|id| st.position(id))
                .map(|pos| st.items[pos].clone()),
            filter: st.filter.text().to_owned(),
            last_error: st.last_error.clone(),
        }
    }

    #[must_use]
    pub fn state(&self) -> LoadState {
        self.state.lock().load.clone()
    }

    /// Current filtered view.
    #[must_use]
    pub fn view(&self) -> Vec<R> {
        self.state.lock().view.clone()
    }

    /// Full collection.
    #[must_use]
    pub fn items(&self) -> Vec<R> {
        self.state.lock().items.clone()
    }

    #[must_use]
    pub fn get(&self, id: &ResourceId) -> Option<R> {
        let st = self.state.lock();
        st.position(id).map(|pos| st.items[pos].clone())
    }

    fn ensure_live(&self, operation: &str) -> Result<(), ResourceError> {
        if self.cancel.is_cancelled() {
            return Err(ResourceError::unsupported(
                R::KIND,
                format!("{operation} after teardown"),
            ));
        }
        Ok(())
    }

    fn begin_mutation(
        &self,
        id: &ResourceId,
        operation: &str,
    ) -> Result<InFlight<'_, R>, ResourceError> {
        self.ensure_live(operation)?;
        let mut st = self.state.lock();
        if st.position(id).is_none() {
            drop(st);
            return Err(self.report(operation, ResourceError::not_found(R::KIND, id.clone())));
        }
        if !st.in_flight.insert(id.clone()) {
            drop(st);
            return Err(self.report(
                operation,
                ResourceError::ConcurrentMutation { id: id.clone() },
            ));
        }
        Ok(InFlight {
            controller: self,
            id: id.clone(),
        })
    }

    fn report(&self, operation: &str, err: ResourceError) -> ResourceError {
        warn!(kind = %R::KIND, operation, error = %err, "operation failed");
        self.notifier
            .error(&format!("Could not {operation} {}: {err}", R::KIND));
        err
    }
}

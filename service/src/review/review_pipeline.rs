use std::sync::Arc;

use core_types::{AuthorizationOutcome, GatewayIntent, Item, ItemId, ReviewState};

use crate::{
    catalog::ItemCatalog,
    error::Error,
    gateway::{DestructiveOperationGateway, GatewayResponse},
    pipeline::Pipeline,
    render_cache::RenderCache,
    review::{
        authorization::{
            AuthorizationState, AuthorizationTarget, GatewayRequestStatus, OutstandingRequest,
        },
        buffer::LookaheadBuffer,
        history::{DecisionRecord, UndoHistory},
        pending::PendingDeleteSet,
    },
    session_load::context::SessionLoadContext,
    settings::ReviewSettings,
    trash_ledger::TrashLedger,
};

/// Drives a review session: a shuffled stream of items the user keeps or
/// discards, with undo, a durable staging area for discarded items and the
/// authorization handshake that makes deletions final.
///
/// All methods take `&mut self` and must not run concurrently. A host that
/// shares the pipeline between threads should wrap it in a single
/// `async_std::sync::Mutex`.
pub struct ReviewPipeline {
    catalog: Arc<dyn ItemCatalog>,
    ledger: Arc<dyn TrashLedger>,
    gateway: Arc<dyn DestructiveOperationGateway>,
    render_cache: Arc<dyn RenderCache>,
    settings: ReviewSettings,

    state: ReviewState,
    buffer: LookaheadBuffer,
    history: UndoHistory,
    pending: PendingDeleteSet,
    authorization: AuthorizationState,
    system_trash: Vec<Item>,
    total_count: usize,
    processed_count: usize,
}

impl ReviewPipeline {
    pub fn new(
        catalog: Arc<dyn ItemCatalog>,
        ledger: Arc<dyn TrashLedger>,
        gateway: Arc<dyn DestructiveOperationGateway>,
        render_cache: Arc<dyn RenderCache>,
        settings: ReviewSettings,
    ) -> Result<Self, Error> {
        settings.validate()?;
        Ok(Self {
            catalog,
            ledger,
            gateway,
            render_cache,
            buffer: LookaheadBuffer::new(settings.buffer_capacity, settings.refill_threshold),
            settings,
            state: ReviewState::Loading,
            history: UndoHistory::default(),
            pending: PendingDeleteSet::default(),
            authorization: AuthorizationState::Idle,
            system_trash: Vec::new(),
            total_count: 0,
            processed_count: 0,
        })
    }

    /// Hydrates the pending delete set from the ledger and starts a session.
    pub async fn init(&mut self) -> Result<(), Error> {
        tracing::info!("Initializing review pipeline");
        self.refresh_pending_list().await?;
        self.load_and_shuffle().await
    }

    pub fn dispose(self) {
        if let Some(request) = self.authorization.outstanding() {
            tracing::warn!(
                "Disposing review pipeline while {} authorization {} is outstanding",
                request.intent,
                request.token
            );
        }
        tracing::info!(
            "Review pipeline disposed with {} items pending deletion",
            self.pending.len()
        );
    }

    pub fn review_state(&self) -> &ReviewState {
        &self.state
    }

    pub fn pending_items(&self) -> &[Item] {
        self.pending.items()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn processed_count(&self) -> usize {
        self.processed_count
    }

    pub fn buffered_count(&self) -> usize {
        self.buffer.len()
    }

    pub fn remaining_in_pool(&self) -> usize {
        self.buffer.remaining_in_pool()
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn authorization_state(&self) -> &AuthorizationState {
        &self.authorization
    }

    pub fn system_trash_items(&self) -> &[Item] {
        &self.system_trash
    }

    /// Starts a new session from the catalog ids that are not staged for
    /// deletion, in random order.
    ///
    /// When the catalog or ledger cannot be read the previous state is kept.
    pub async fn load_and_shuffle(&mut self) -> Result<(), Error> {
        let previous_state = std::mem::replace(&mut self.state, ReviewState::Loading);

        let mut context = SessionLoadContext::new(self.catalog.clone(), self.ledger.clone());
        if let Err(e) = Pipeline::<SessionLoadContext>::new()
            .execute(&mut context)
            .await
        {
            tracing::error!("Failed to load review session: {}", e);
            self.state = previous_state;
            return Err(e);
        }

        self.history.clear();
        self.processed_count = 0;
        self.total_count = context.available_ids.len();
        tracing::info!("Starting review session with {} items", self.total_count);

        if context.available_ids.is_empty() {
            self.buffer.reset(Vec::new());
            self.state = ReviewState::Empty;
            return Ok(());
        }

        self.buffer.reset(context.available_ids);
        self.fill_buffer().await?;
        self.advance().await
    }

    /// Shows the next buffered item, or `Empty` when the session is exhausted.
    ///
    /// The buffer is topped up below the refill threshold both before and
    /// after taking the item. A failed refill only surfaces as an error when
    /// there is nothing left to show; the state is then `Ready(None)`.
    pub async fn advance(&mut self) -> Result<(), Error> {
        if self.buffer.needs_refill()
            && let Err(e) = self.fill_buffer().await
        {
            if self.buffer.is_empty() {
                tracing::error!("Failed to refill review buffer: {}", e);
                self.state = ReviewState::Ready(None);
                return Err(e);
            }
            tracing::warn!("Failed to refill review buffer, continuing: {}", e);
        }

        let Some(item) = self.buffer.pop_front() else {
            tracing::info!("Review session exhausted");
            self.state = ReviewState::Empty;
            return Ok(());
        };
        self.state = ReviewState::Ready(Some(item));

        if self.buffer.needs_refill()
            && let Err(e) = self.fill_buffer().await
        {
            tracing::warn!("Failed to refill review buffer: {}", e);
        }
        Ok(())
    }

    async fn fill_buffer(&mut self) -> Result<(), Error> {
        let added = self.buffer.fill(self.catalog.as_ref()).await?;
        if added > 0 && self.settings.prefetch_count > 0 {
            self.render_cache
                .prefetch(self.buffer.front_locators(self.settings.prefetch_count));
        }
        Ok(())
    }

    /// Decides on the currently displayed item.
    pub async fn decide(&mut self, is_discard: bool) -> Result<(), Error> {
        let item = self
            .state
            .current_item()
            .cloned()
            .ok_or(Error::NoCurrentItem)?;
        self.decide_item(item, is_discard).await
    }

    /// Records a decision and moves on to the next item.
    ///
    /// A discard is written to the ledger before anything else changes, so a
    /// failed write leaves the session untouched. Discarding an item that is
    /// already pending counts as a keep for undo purposes.
    pub async fn decide_item(&mut self, item: Item, is_discard: bool) -> Result<(), Error> {
        let stage = is_discard && !self.pending.contains(item.id);
        if is_discard && !stage {
            tracing::warn!("Item {} is already pending deletion", item.id);
        }
        if stage {
            self.ledger.add(item.id).await?;
        }

        tracing::debug!(
            "Item {} {}",
            item.id,
            if is_discard { "discarded" } else { "kept" }
        );
        self.history.push(DecisionRecord {
            item: item.clone(),
            was_discard: stage,
        });
        self.processed_count += 1;
        if stage {
            self.pending.insert(item);
        }

        self.advance().await
    }

    /// Reverts the most recent decision and shows its item again. The item on
    /// display goes back to the front of the buffer.
    ///
    /// Returns `false` when there is nothing to undo.
    pub async fn undo(&mut self) -> Result<bool, Error> {
        let Some(record) = self.history.last().cloned() else {
            return Ok(false);
        };
        if record.was_discard {
            self.ensure_not_awaiting_authorization(record.item.id)?;
            self.ledger.remove(record.item.id).await?;
        }

        self.history.pop();
        debug_assert!(self.processed_count > 0, "undo with no processed items");
        self.processed_count = self.processed_count.saturating_sub(1);
        if record.was_discard {
            self.pending.remove(record.item.id);
        }
        if let ReviewState::Ready(Some(current)) = std::mem::take(&mut self.state) {
            self.buffer.push_front(current);
        }

        tracing::debug!("Undid decision on item {}", record.item.id);
        self.state = ReviewState::Ready(Some(record.item));
        Ok(true)
    }

    /// Rebuilds the pending delete set from the ledger.
    ///
    /// Ids the catalog no longer knows are removed from the ledger. Any other
    /// failure leaves the current set as it was.
    pub async fn refresh_pending_list(&mut self) -> Result<(), Error> {
        let ids: Vec<ItemId> = self.ledger.get_trashed_ids().await?.into_iter().collect();
        let resolved = self
            .catalog
            .resolve_locations(&ids)
            .await
            .inspect_err(|e| tracing::error!("Failed to refresh pending list: {}", e))?;

        let mut items = Vec::with_capacity(ids.len());
        let mut stale_ids = Vec::new();
        for (id, result) in ids.into_iter().zip(resolved) {
            match result {
                Ok(locator) => items.push(Item::new(id, locator)),
                Err(Error::ItemNotFound(_)) => stale_ids.push(id),
                Err(e) => {
                    tracing::error!("Failed to refresh pending list: {}", e);
                    return Err(e);
                }
            }
        }

        if !stale_ids.is_empty() {
            tracing::warn!(
                "Removing {} vanished items from the trash ledger",
                stale_ids.len()
            );
            self.ledger.clear(&stale_ids).await?;
        }

        self.pending.replace(items);
        tracing::debug!("Pending list holds {} items", self.pending.len());
        Ok(())
    }

    /// Unstages an item. Returns whether it was pending.
    pub async fn restore_item(&mut self, id: ItemId) -> Result<bool, Error> {
        self.ensure_not_awaiting_authorization(id)?;
        self.ledger.remove(id).await?;
        Ok(self.pending.remove(id).is_some())
    }

    fn ensure_idle(&self) -> Result<(), Error> {
        match &self.authorization {
            AuthorizationState::Idle => Ok(()),
            AuthorizationState::AwaitingAuthorization(request) => {
                tracing::warn!(
                    "Rejecting request while authorization {} is outstanding",
                    request.token
                );
                Err(Error::AuthorizationAlreadyPending)
            }
        }
    }

    /// Items sent to the gateway stay staged until the authorization is resolved.
    fn ensure_not_awaiting_authorization(&self, id: ItemId) -> Result<(), Error> {
        if let AuthorizationState::AwaitingAuthorization(request) = &self.authorization
            && let AuthorizationTarget::LocalStaging { ids } = &request.target
            && ids.contains(&id)
        {
            tracing::warn!(
                "Item {} is part of outstanding authorization {}",
                id,
                request.token
            );
            return Err(Error::AuthorizationAlreadyPending);
        }
        Ok(())
    }

    /// Sends every pending item to the gateway, permanently deleting them or
    /// moving them to system trash.
    pub async fn confirm_delete(&mut self, permanent: bool) -> Result<GatewayRequestStatus, Error> {
        self.ensure_idle()?;
        if self.pending.is_empty() {
            return Ok(GatewayRequestStatus::NothingToDo);
        }

        let intent = if permanent {
            GatewayIntent::Delete
        } else {
            GatewayIntent::Trash
        };
        let ids = self.pending.ids();
        tracing::info!("Requesting {} of {} pending items", intent, ids.len());

        match self
            .gateway
            .execute(intent, &self.pending.locators())
            .await?
        {
            GatewayResponse::Done(report) => {
                if report.all_succeeded() {
                    self.commit_local_staging(&ids).await?;
                    Ok(GatewayRequestStatus::Completed)
                } else {
                    tracing::warn!(
                        "{} of {} items failed, keeping all of them pending",
                        report.failures().count(),
                        ids.len()
                    );
                    Ok(GatewayRequestStatus::Failed(report))
                }
            }
            GatewayResponse::PendingAuthorization(token) => {
                tracing::info!("Waiting for authorization {}", token);
                self.authorization = AuthorizationState::AwaitingAuthorization(OutstandingRequest {
                    token: token.clone(),
                    intent,
                    target: AuthorizationTarget::LocalStaging { ids },
                });
                Ok(GatewayRequestStatus::AwaitingAuthorization(token))
            }
        }
    }

    async fn commit_local_staging(&mut self, ids: &[ItemId]) -> Result<(), Error> {
        self.ledger.clear(ids).await?;
        self.pending.remove_all(ids);
        let dropped = self.history.remove_items(ids);
        tracing::info!(
            "Cleared {} items from the trash ledger, {} undo records dropped",
            ids.len(),
            dropped
        );
        self.reload_system_trash_after_change().await;
        Ok(())
    }

    /// Reports the user's answer for the outstanding authorization and
    /// returns the effective outcome. A confirmed batch that failed for any
    /// item counts as cancelled.
    pub async fn resolve_authorization(
        &mut self,
        outcome: AuthorizationOutcome,
    ) -> Result<AuthorizationOutcome, Error> {
        let AuthorizationState::AwaitingAuthorization(request) =
            std::mem::take(&mut self.authorization)
        else {
            return Err(Error::NoPendingAuthorization);
        };

        let effective = match self.gateway.resolve(&request.token, outcome).await {
            Ok(effective) => effective,
            Err(e) => {
                tracing::error!("Failed to resolve authorization {}: {}", request.token, e);
                return Err(e);
            }
        };
        tracing::info!(
            "Authorization {} for {} resolved as {}",
            request.token,
            request.intent,
            effective
        );

        match request.target {
            AuthorizationTarget::LocalStaging { ids } => {
                if effective == AuthorizationOutcome::Confirmed {
                    self.commit_local_staging(&ids).await?;
                }
            }
            // a partly failed batch still changed system trash
            AuthorizationTarget::SystemTrash => self.reload_system_trash_after_change().await,
        }
        Ok(effective)
    }

    pub async fn load_system_trash(&mut self) -> Result<(), Error> {
        self.system_trash = self.catalog.list_system_trash().await?;
        tracing::debug!("System trash holds {} items", self.system_trash.len());
        Ok(())
    }

    async fn reload_system_trash_after_change(&mut self) {
        if let Err(e) = self.load_system_trash().await {
            tracing::warn!("Failed to reload system trash: {}", e);
        }
    }

    /// Moves items from system trash back to their original location.
    pub async fn restore_selected(&mut self, items: &[Item]) -> Result<GatewayRequestStatus, Error> {
        self.request_system_trash_operation(GatewayIntent::Restore, items)
            .await
    }

    /// Permanently deletes items from system trash.
    pub async fn delete_selected(&mut self, items: &[Item]) -> Result<GatewayRequestStatus, Error> {
        self.request_system_trash_operation(GatewayIntent::Delete, items)
            .await
    }

    async fn request_system_trash_operation(
        &mut self,
        intent: GatewayIntent,
        items: &[Item],
    ) -> Result<GatewayRequestStatus, Error> {
        self.ensure_idle()?;
        if items.is_empty() {
            return Ok(GatewayRequestStatus::NothingToDo);
        }

        let locators: Vec<_> = items.iter().map(|item| item.locator.clone()).collect();
        tracing::info!("Requesting {} of {} system trash items", intent, items.len());

        match self.gateway.execute(intent, &locators).await? {
            GatewayResponse::Done(report) => {
                self.reload_system_trash_after_change().await;
                if report.all_succeeded() {
                    Ok(GatewayRequestStatus::Completed)
                } else {
                    Ok(GatewayRequestStatus::Failed(report))
                }
            }
            GatewayResponse::PendingAuthorization(token) => {
                self.authorization = AuthorizationState::AwaitingAuthorization(OutstandingRequest {
                    token: token.clone(),
                    intent,
                    target: AuthorizationTarget::SystemTrash,
                });
                Ok(GatewayRequestStatus::AwaitingAuthorization(token))
            }
        }
    }
}

use rand::seq::SliceRandom;

use crate::{
    error::Error,
    pipeline::{PipelineStep, StepAction},
    session_load::context::SessionLoadContext,
};

/// Step 1: Fetch every reviewable id from the catalog
pub struct FetchCatalogIdsStep;

#[async_trait::async_trait]
impl PipelineStep<SessionLoadContext> for FetchCatalogIdsStep {
    fn name(&self) -> &'static str {
        "fetch_catalog_ids"
    }

    async fn execute(&self, context: &mut SessionLoadContext) -> StepAction {
        match context.catalog.list_all_item_ids().await {
            Ok(ids) => {
                tracing::info!("Catalog lists {} items", ids.len());
                context.all_ids = ids;
                StepAction::Continue
            }
            Err(e) => StepAction::Abort(e),
        }
    }
}

/// Step 2: Fetch the ids already staged for deletion
pub struct FetchTrashedIdsStep;

#[async_trait::async_trait]
impl PipelineStep<SessionLoadContext> for FetchTrashedIdsStep {
    fn name(&self) -> &'static str {
        "fetch_trashed_ids"
    }

    async fn execute(&self, context: &mut SessionLoadContext) -> StepAction {
        match context.ledger.get_trashed_ids().await {
            Ok(ids) => {
                tracing::info!("Trash ledger holds {} items", ids.len());
                context.trashed_ids = ids;
                StepAction::Continue
            }
            Err(e) => StepAction::Abort(Error::DbError(format!(
                "Failed to read trashed ids: {}",
                e
            ))),
        }
    }
}

/// Step 3: Drop staged ids, keeping catalog order
pub struct FilterAvailableIdsStep;

#[async_trait::async_trait]
impl PipelineStep<SessionLoadContext> for FilterAvailableIdsStep {
    fn name(&self) -> &'static str {
        "filter_available_ids"
    }

    async fn execute(&self, context: &mut SessionLoadContext) -> StepAction {
        context.available_ids = context
            .all_ids
            .iter()
            .filter(|id| !context.trashed_ids.contains(id))
            .copied()
            .collect();

        if context.available_ids.is_empty() {
            tracing::info!("No items available for review");
            return StepAction::Skip;
        }
        StepAction::Continue
    }
}

/// Step 4: Uniformly permute the available ids
pub struct ShuffleIdsStep;

#[async_trait::async_trait]
impl PipelineStep<SessionLoadContext> for ShuffleIdsStep {
    fn name(&self) -> &'static str {
        "shuffle_ids"
    }

    fn should_execute(&self, context: &SessionLoadContext) -> bool {
        context.available_ids.len() > 1
    }

    async fn execute(&self, context: &mut SessionLoadContext) -> StepAction {
        context.available_ids.shuffle(&mut rand::rng());
        StepAction::Continue
    }
}

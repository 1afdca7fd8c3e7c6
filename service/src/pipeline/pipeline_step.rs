use crate::error::Error;

/// What the pipeline does after a step completes.
#[derive(Debug, Clone, PartialEq)]
pub enum StepAction {
    /// Continue to the next step
    Continue,
    /// Skip all remaining steps (successful early exit)
    Skip,
    /// Abort the pipeline with an error
    Abort(Error),
}

/// A single unit of work in a [`Pipeline`](super::Pipeline).
///
/// Steps read their inputs from the context, store their results back into
/// it and return a [`StepAction`] to control the flow.
///
/// ```ignore
/// struct FetchCatalogIdsStep;
///
/// #[async_trait::async_trait]
/// impl PipelineStep<SessionLoadContext> for FetchCatalogIdsStep {
///     fn name(&self) -> &'static str {
///         "fetch_catalog_ids"
///     }
///
///     async fn execute(&self, context: &mut SessionLoadContext) -> StepAction {
///         match context.catalog.list_all_item_ids().await {
///             Ok(ids) => {
///                 context.all_ids = ids;
///                 StepAction::Continue
///             }
///             Err(e) => StepAction::Abort(e),
///         }
///     }
/// }
/// ```
#[async_trait::async_trait]
pub trait PipelineStep<T>: Send + Sync {
    /// Name of the step for logging
    fn name(&self) -> &'static str;

    /// Steps returning `false` are passed over without affecting the flow.
    fn should_execute(&self, _context: &T) -> bool {
        true
    }

    async fn execute(&self, context: &mut T) -> StepAction;
}

use crate::{
    pipeline::Pipeline,
    session_load::{
        context::SessionLoadContext,
        steps::{FetchCatalogIdsStep, FetchTrashedIdsStep, FilterAvailableIdsStep, ShuffleIdsStep},
    },
};

impl Pipeline<SessionLoadContext> {
    pub fn new() -> Self {
        Self::with_steps(vec![
            Box::new(FetchCatalogIdsStep),
            Box::new(FetchTrashedIdsStep),
            Box::new(FilterAvailableIdsStep),
            Box::new(ShuffleIdsStep),
        ])
    }
}

impl Default for Pipeline<SessionLoadContext> {
    fn default() -> Self {
        Self::new()
    }
}

use core_types::{GatewayIntent, ItemId, PendingAuthorization};

use crate::gateway::OperationReport;

/// What a confirmed authorization applies to.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthorizationTarget {
    /// Items from the pending delete set. The ids are the ones sent to the
    /// gateway; only these are cleared on confirmation.
    LocalStaging { ids: Vec<ItemId> },
    /// Items already in system trash
    SystemTrash,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutstandingRequest {
    pub token: PendingAuthorization,
    pub intent: GatewayIntent,
    pub target: AuthorizationTarget,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum AuthorizationState {
    #[default]
    Idle,
    AwaitingAuthorization(OutstandingRequest),
}

impl AuthorizationState {
    pub fn is_idle(&self) -> bool {
        matches!(self, AuthorizationState::Idle)
    }

    pub fn outstanding(&self) -> Option<&OutstandingRequest> {
        match self {
            AuthorizationState::Idle => None,
            AuthorizationState::AwaitingAuthorization(request) => Some(request),
        }
    }
}

/// Result of handing a batch to the gateway
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayRequestStatus {
    /// There was nothing to send
    NothingToDo,
    /// The gateway carried out the whole batch
    Completed,
    /// The batch waits for the user to authorize it
    AwaitingAuthorization(PendingAuthorization),
    /// The gateway ran the batch but some items failed. Nothing was committed.
    Failed(OperationReport),
}

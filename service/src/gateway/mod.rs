pub mod local_file_gateway;
#[cfg(test)]
pub mod mock_gateway;

use async_trait::async_trait;
use core_types::{AuthorizationOutcome, GatewayIntent, Locator, PendingAuthorization};

use crate::error::Error;

/// Outcome of one locator in a batch the gateway carried out.
#[derive(Debug, Clone, PartialEq)]
pub struct LocatorResult {
    pub locator: Locator,
    pub error: Option<String>,
}

impl LocatorResult {
    pub fn succeeded(locator: Locator) -> Self {
        Self {
            locator,
            error: None,
        }
    }

    pub fn failed(locator: Locator, error: impl Into<String>) -> Self {
        Self {
            locator,
            error: Some(error.into()),
        }
    }
}

/// Per-locator results of an operation that was carried out.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OperationReport {
    pub results: Vec<LocatorResult>,
}

impl OperationReport {
    pub fn all_succeeded(&self) -> bool {
        self.results.iter().all(|r| r.error.is_none())
    }

    pub fn failures(&self) -> impl Iterator<Item = &LocatorResult> {
        self.results.iter().filter(|r| r.error.is_some())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GatewayResponse {
    /// The operation was carried out immediately
    Done(OperationReport),
    /// The operation waits for the user to authorize it
    PendingAuthorization(PendingAuthorization),
}

/// Performs destructive or restorative operations on items.
#[async_trait]
pub trait DestructiveOperationGateway: Send + Sync {
    /// Either carries out the operation right away or hands back a token that
    /// must go through the authorization flow.
    async fn execute(
        &self,
        intent: GatewayIntent,
        locators: &[Locator],
    ) -> Result<GatewayResponse, Error>;

    /// Reports the result of the authorization flow for `token`. Returns the
    /// effective outcome: a confirmed batch in which any locator failed counts
    /// as cancelled.
    async fn resolve(
        &self,
        token: &PendingAuthorization,
        outcome: AuthorizationOutcome,
    ) -> Result<AuthorizationOutcome, Error>;
}

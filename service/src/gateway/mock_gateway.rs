use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use core_types::{AuthorizationOutcome, GatewayIntent, Locator, PendingAuthorization};

use crate::{
    error::Error,
    gateway::{DestructiveOperationGateway, GatewayResponse, LocatorResult, OperationReport},
};

#[derive(Default)]
struct MockState {
    require_authorization: bool,
    fail_locators: HashSet<Locator>,
    fail_execute: bool,
    next_token: u32,
    executed: Vec<(GatewayIntent, Vec<Locator>)>,
    resolved: Vec<(PendingAuthorization, AuthorizationOutcome)>,
}

/// Mock implementation of DestructiveOperationGateway for testing
///
/// Records every request and resolution. Either completes requests at once or
/// asks for authorization, depending on configuration.
#[derive(Clone, Default)]
pub struct MockGateway {
    state: Arc<Mutex<MockState>>,
}

impl MockGateway {
    /// Gateway that carries out every request immediately
    pub fn immediate() -> Self {
        Self::default()
    }

    /// Gateway that asks for authorization for every request
    pub fn requiring_authorization() -> Self {
        let gateway = Self::default();
        gateway.state.lock().unwrap().require_authorization = true;
        gateway
    }

    /// Make the operation fail for the given locator
    pub fn fail_for(&self, locator: Locator) {
        self.state.lock().unwrap().fail_locators.insert(locator);
    }

    /// Make execute itself return an error
    pub fn fail_execute(&self, fail: bool) {
        self.state.lock().unwrap().fail_execute = fail;
    }

    pub fn executed(&self) -> Vec<(GatewayIntent, Vec<Locator>)> {
        self.state.lock().unwrap().executed.clone()
    }

    pub fn resolved(&self) -> Vec<(PendingAuthorization, AuthorizationOutcome)> {
        self.state.lock().unwrap().resolved.clone()
    }

    fn report(state: &MockState, locators: &[Locator]) -> OperationReport {
        OperationReport {
            results: locators
                .iter()
                .map(|locator| {
                    if state.fail_locators.contains(locator) {
                        LocatorResult::failed(locator.clone(), "Simulated failure")
                    } else {
                        LocatorResult::succeeded(locator.clone())
                    }
                })
                .collect(),
        }
    }
}

#[async_trait]
impl DestructiveOperationGateway for MockGateway {
    async fn execute(
        &self,
        intent: GatewayIntent,
        locators: &[Locator],
    ) -> Result<GatewayResponse, Error> {
        let mut state = self.state.lock().unwrap();
        if state.fail_execute {
            return Err(Error::GatewayError("Simulated gateway failure".to_string()));
        }
        state.executed.push((intent, locators.to_vec()));

        if state.require_authorization {
            state.next_token += 1;
            let token = PendingAuthorization::new(format!("token-{}", state.next_token));
            Ok(GatewayResponse::PendingAuthorization(token))
        } else {
            Ok(GatewayResponse::Done(Self::report(&state, locators)))
        }
    }

    async fn resolve(
        &self,
        token: &PendingAuthorization,
        outcome: AuthorizationOutcome,
    ) -> Result<AuthorizationOutcome, Error> {
        let mut state = self.state.lock().unwrap();
        state.resolved.push((token.clone(), outcome));
        if outcome == AuthorizationOutcome::Cancelled {
            return Ok(AuthorizationOutcome::Cancelled);
        }

        let locators = state
            .executed
            .last()
            .map(|(_, locators)| locators.clone())
            .unwrap_or_default();
        if Self::report(&state, &locators).all_succeeded() {
            Ok(AuthorizationOutcome::Confirmed)
        } else {
            Ok(AuthorizationOutcome::Cancelled)
        }
    }
}

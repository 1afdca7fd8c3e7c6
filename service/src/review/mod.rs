pub mod authorization;
pub mod buffer;
pub mod history;
pub mod pending;
pub mod review_pipeline;

pub use authorization::{AuthorizationState, GatewayRequestStatus, OutstandingRequest};
pub use review_pipeline::ReviewPipeline;

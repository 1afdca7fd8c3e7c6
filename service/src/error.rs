use core_types::ItemId;
use database::database_error::DatabaseError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Database error: {0}")]
    DbError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Catalog error: {0}")]
    CatalogError(String),
    #[error("Item {0} not found in catalog")]
    ItemNotFound(ItemId),
    #[error("Gateway error: {0}")]
    GatewayError(String),
    #[error("An authorization request is already outstanding")]
    AuthorizationAlreadyPending,
    #[error("No authorization request is outstanding")]
    NoPendingAuthorization,
    #[error("No item is currently displayed")]
    NoCurrentItem,
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Settings error: {0}")]
    SettingsError(String),
    #[error("Contract violation: {0}")]
    ContractViolation(String),
}

impl From<DatabaseError> for Error {
    fn from(err: DatabaseError) -> Self {
        Error::DbError(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err.to_string())
    }
}

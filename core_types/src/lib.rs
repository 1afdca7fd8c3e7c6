pub mod item;

use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

pub use item::{Item, ItemId, Locator};

#[derive(Debug, Clone, PartialEq)]
pub enum CoreTypeError {
    ConversionError(String),
    InvalidArgumentType(String),
}

impl std::fmt::Display for CoreTypeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoreTypeError::ConversionError(msg) => write!(f, "Conversion Error: {}", msg),
            CoreTypeError::InvalidArgumentType(msg) => write!(f, "Invalid Argument Type: {}", msg),
        }
    }
}

impl std::error::Error for CoreTypeError {}

/// What the destructive operation gateway is asked to do with a batch of locators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum GatewayIntent {
    /// Move to system trash, recoverable until the retention period ends
    #[strum(serialize = "trash")]
    Trash,
    /// Remove permanently
    #[strum(serialize = "delete")]
    Delete,
    /// Move back out of system trash
    #[strum(serialize = "restore")]
    Restore,
}

/// Result of the external authorization flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum AuthorizationOutcome {
    Confirmed,
    Cancelled,
}

/// Opaque token handed out by the gateway when an operation needs the user's
/// authorization before it is carried out.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PendingAuthorization {
    token: String,
}

impl PendingAuthorization {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl std::fmt::Display for PendingAuthorization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token)
    }
}

/// Externally observable state of a review session.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ReviewState {
    #[default]
    Loading,
    Empty,
    Ready(Option<Item>),
}

impl ReviewState {
    pub fn current_item(&self) -> Option<&Item> {
        match self {
            ReviewState::Ready(item) => item.as_ref(),
            ReviewState::Loading | ReviewState::Empty => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, AsRefStr)]
pub enum SettingName {
    #[strum(serialize = "library_root_dir")]
    LibraryRootDir,
    #[strum(serialize = "buffer_capacity")]
    BufferCapacity,
    #[strum(serialize = "refill_threshold")]
    RefillThreshold,
    #[strum(serialize = "prefetch_count")]
    PrefetchCount,
    #[strum(serialize = "require_authorization")]
    RequireAuthorization,
    #[strum(serialize = "trash_retention_days")]
    TrashRetentionDays,
}

impl SettingName {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }
}

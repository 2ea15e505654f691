/// Failure to reconcile the in-memory log with the durable store.
///
/// Neither variant is fatal: the in-memory log stays authoritative for the
/// session and the error travels back to the caller as a warning.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistenceError {
    #[error("could not load calculation history from {key:?}: {reason}")]
    LoadFailed { key: String, reason: String },

    #[error("could not save calculation history to {key:?}: {reason}")]
    SaveFailed { key: String, reason: String },
}

impl PersistenceError {
    pub fn key(&self) -> &str {
        match self {
            Self::LoadFailed { key, .. } | Self::SaveFailed { key, .. } => key,
        }
    }

    pub fn is_load(&self) -> bool {
        matches!(self, Self::LoadFailed { .. })
    }

    pub fn is_save(&self) -> bool {
        matches!(self, Self::SaveFailed { .. })
    }
}

/// Every entry id has been handed out; the log cannot record any more
/// calculations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("calculation history {key:?} has no entry ids left")]
pub struct IdsExhausted {
    pub key: String,
}

use crate::error::PersistenceError;

/// Result of a log operation that always takes effect in memory but may have
/// failed to reach the durable store.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "a persistence warning may be attached"]
pub struct Outcome<T> {
    pub value: T,
    pub warning: Option<PersistenceError>,
}

impl<T> Outcome<T> {
    /// The operation was applied and persisted.
    pub fn durable(value: T) -> Self {
        Self {
            value,
            warning: None,
        }
    }

    /// The operation was applied in memory only.
    pub fn degraded(value: T, warning: PersistenceError) -> Self {
        Self {
            value,
            warning: Some(warning),
        }
    }

    /// Returns `true` if the store reflects the operation.
    pub fn is_durable(&self) -> bool {
        self.warning.is_none()
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            value: f(self.value),
            warning: self.warning,
        }
    }

    pub fn into_parts(self) -> (T, Option<PersistenceError>) {
        (self.value, self.warning)
    }
}

use thiserror::Error;
use uuid::Uuid;

/// Failures reported by store implementations at the engine boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("upstream call timed out: {0}")]
    Timeout(String),
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Error taxonomy for a forecast regeneration run.
///
/// A run never partially commits: every variant here means the prior active
/// forecast is untouched and nothing new was persisted, except for
/// `Persistence` raised on the alert insert after a successful commit.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No usable transaction history; the caller surfaces a connect/pending
    /// state instead of an empty forecast.
    #[error("no usable transaction history for user {0}")]
    InsufficientData(Uuid),
    /// Transaction retrieval did not complete. Retryable by the caller.
    #[error("transaction retrieval did not complete: {0}")]
    UpstreamTimeout(String),
    /// Commit or alert insert failed. Retryable by the caller; the commit
    /// itself is all-or-nothing.
    #[error("forecast persistence failed: {0}")]
    Persistence(String),
    /// The computed series violates a structural invariant. An internal
    /// defect; the run fails closed.
    #[error("forecast validation failed: {0}")]
    Validation(String),
}

impl EngineError {
    /// Maps a read-path store failure: retrieval that did not complete.
    pub(crate) fn retrieval(err: StoreError) -> Self {
        EngineError::UpstreamTimeout(err.to_string())
    }

    /// Maps a write-path store failure.
    pub(crate) fn persistence(err: StoreError) -> Self {
        EngineError::Persistence(err.to_string())
    }

    /// Whether the caller may retry the run as-is. Insufficient data needs a
    /// sync first, and a validation failure is a defect, not a transient.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EngineError::UpstreamTimeout(_) | EngineError::Persistence(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryability_follows_taxonomy() {
        assert!(EngineError::UpstreamTimeout("slow".into()).is_retryable());
        assert!(EngineError::Persistence("disk".into()).is_retryable());
        assert!(!EngineError::InsufficientData(Uuid::nil()).is_retryable());
        assert!(!EngineError::Validation("bad".into()).is_retryable());
    }

    #[test]
    fn store_errors_map_to_engine_taxonomy() {
        let timeout = EngineError::retrieval(StoreError::Timeout("3s elapsed".into()));
        assert!(matches!(timeout, EngineError::UpstreamTimeout(_)));

        let write = EngineError::persistence(StoreError::Backend("constraint".into()));
        assert!(matches!(write, EngineError::Persistence(_)));
    }
}

//! Error types for keyset

use std::collections::TryReserveError;

use thiserror::Error;

/// Result type alias using [`SetError`]
pub type Result<T> = std::result::Result<T, SetError>;

#[derive(Debug, Error)]
pub enum SetError {
    /// A node, link array or key buffer could not be allocated.
    #[error("allocation failed: {0}")]
    AllocationFailed(#[from] TryReserveError),

    /// One or more required names were absent from the available set.
    #[error("missing {kind}: {}", .missing.join(", "))]
    MissingRequirements { kind: String, missing: Vec<String> },
}

/// Abort the process after an allocation failure on an infallible path.
///
/// The `try_*` variants surface the same failure as [`SetError::AllocationFailed`].
#[cold]
pub(crate) fn abort_on_alloc_failure(err: SetError) -> ! {
    tracing::error!(error = %err, "out of memory in sorted set");
    std::process::abort()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_requirements_message_lists_names() {
        let err = SetError::MissingRequirements {
            kind: "extension".to_string(),
            missing: vec!["VK_KHR_surface".to_string(), "VK_KHR_swapchain".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "missing extension: VK_KHR_surface, VK_KHR_swapchain"
        );
    }

    #[test]
    fn allocation_failure_converts_from_try_reserve() {
        let mut v: Vec<u8> = Vec::new();
        let reserve_err = v.try_reserve(usize::MAX).unwrap_err();
        let err: SetError = reserve_err.into();
        assert!(matches!(err, SetError::AllocationFailed(_)));
        assert!(err.to_string().starts_with("allocation failed"));
    }
}

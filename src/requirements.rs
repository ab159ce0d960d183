//! Checking a list of required names against the names actually available.
//!
//! This is the pattern used when bringing up a graphics device: the
//! application knows which extensions and layers it needs, the driver reports
//! which ones it has, and any shortfall is fatal. Both lists may contain
//! duplicates and arrive in any order.

use crate::error::SetError;
use crate::sorted_set::SortedSet;
use crate::Result;

/// Fail unless every name in `required` also appears in `available`
///
/// On success returns the required names deduplicated and sorted, ready to
/// be flattened into the list handed to the driver. Each missing name is
/// logged at warn level, in ascending order, and collected into
/// [`SetError::MissingRequirements`]. `kind` names what is being checked
/// ("extension", "layer") for the log and the error.
pub fn require_all(
    kind: &str,
    required: &[&[u8]],
    available: &[&[u8]],
) -> Result<SortedSet<()>> {
    let mut required_set = SortedSet::try_with_config(Default::default())?;
    for name in required {
        required_set.try_add_key_copy(name, ())?;
    }

    let mut available_set = SortedSet::try_with_config(Default::default())?;
    for name in available {
        available_set.try_add_key_copy(name, ())?;
    }

    let missing_set = required_set.try_difference(&available_set)?;
    if missing_set.is_empty() {
        tracing::debug!(kind, required = required_set.len(), "all requirements available");
        return Ok(required_set);
    }

    let mut missing = Vec::with_capacity(missing_set.len());
    missing_set.apply(|name, _| {
        let name = String::from_utf8_lossy(name).into_owned();
        tracing::warn!(kind, %name, "missing required {}", kind);
        missing.push(name);
    });

    Err(SetError::MissingRequirements {
        kind: kind.to_string(),
        missing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn everything_available() {
        let required: [&[u8]; 2] = [b"VK_KHR_swapchain", b"VK_KHR_surface"];
        let available: [&[u8]; 3] = [b"VK_KHR_surface", b"VK_EXT_debug_utils", b"VK_KHR_swapchain"];
        assert!(require_all("extension", &required, &available).is_ok());
    }

    #[test]
    fn returns_required_names_deduplicated() {
        let required: [&[u8]; 3] = [b"VK_KHR_swapchain", b"VK_KHR_surface", b"VK_KHR_swapchain"];
        let available: [&[u8]; 2] = [b"VK_KHR_swapchain", b"VK_KHR_surface"];

        let enabled = require_all("extension", &required, &available).unwrap();
        assert_eq!(
            enabled.flatten_keys(),
            vec![&b"VK_KHR_surface"[..], &b"VK_KHR_swapchain"[..]]
        );
    }

    #[test]
    fn reports_missing_in_order() {
        let required: [&[u8]; 4] = [
            b"VK_LAYER_KHRONOS_validation",
            b"VK_KHR_swapchain",
            b"VK_KHR_surface",
            b"VK_KHR_swapchain",
        ];
        let available: [&[u8]; 1] = [b"VK_KHR_surface"];

        let err = require_all("extension", &required, &available).unwrap_err();
        match err {
            SetError::MissingRequirements { kind, missing } => {
                assert_eq!(kind, "extension");
                assert_eq!(missing, vec!["VK_KHR_swapchain", "VK_LAYER_KHRONOS_validation"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn nothing_required() {
        let enabled = require_all("layer", &[], &[]).unwrap();
        assert!(enabled.is_empty());
    }

    #[test]
    fn nothing_available() {
        let required: [&[u8]; 1] = [b"VK_LAYER_KHRONOS_validation"];
        let err = require_all("layer", &required, &[]).unwrap_err();
        assert_eq!(err.to_string(), "missing layer: VK_LAYER_KHRONOS_validation");
    }
}

//! Key comparison and C-style key helpers.
//!
//! Keys are plain byte strings. Nothing here interprets them as text: any
//! normalization (case folding, Unicode collation transforms) is expected to
//! happen before a key reaches the set.

use std::cmp::Ordering;

/// Byte-lexicographic order over the shared prefix, shorter key first on a tie.
#[inline]
pub fn compare_keys(a: &[u8], b: &[u8]) -> Ordering {
    // Never read past the shorter key
    let shared = a.len().min(b.len());
    a[..shared]
        .cmp(&b[..shared])
        .then_with(|| a.len().cmp(&b.len()))
}

/// The prefix of `bytes` up to (not including) the first NUL byte.
///
/// Slices without a NUL are returned whole, so a buffer that was trimmed
/// before being handed over is accepted unchanged.
pub fn terminated(bytes: &[u8]) -> &[u8] {
    match bytes.iter().position(|&b| b == 0) {
        Some(end) => &bytes[..end],
        None => bytes,
    }
}

/// Copy a key into a freshly allocated buffer without aborting on failure.
pub(crate) fn try_copy_key(key: &[u8]) -> crate::Result<Vec<u8>> {
    let mut owned = Vec::new();
    owned.try_reserve_exact(key.len())?;
    owned.extend_from_slice(key);
    Ok(owned)
}

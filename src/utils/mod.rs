//! Path normalization and id generation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Convert backslashes to forward slashes so Windows-style paths segment the
/// same way POSIX ones do.
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate an opaque item/group id.
///
/// Millisecond timestamp plus a process-wide counter suffix, so two ids minted
/// in the same instant still differ.
pub fn next_item_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let suffix = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{millis:x}-{suffix:04x}")
}

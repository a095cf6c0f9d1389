//! Tracing/logging setup shared by the binaries and test harnesses.

/// Tracing configuration (filters, layers).
pub mod tracing;

/// Filter used when `RUST_LOG` is unset: service logs at info, SQLx statement logs muted.
pub const DEFAULT_FILTER: &str = "info,sqlx=warn";

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(DEFAULT_FILTER);
}

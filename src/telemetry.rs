//! Telemetry metric name constants.
//!
//! Consumers install their own `metrics` recorder (e.g. prometheus,
//! statsd); without a recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `reelsearch_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `operation`: backend call (e.g. "keyword_search", "summarize")
//! - `status`: outcome: "ok" or "error"
//! - `reason`: why a cache lookup missed: "absent", "expired", "corrupt", "unavailable", "disabled"
//! - `outcome`: how a cache write ended: "full", "reduced", "skipped", "failed"

/// Total backend requests issued by [`HttpBackend`](crate::client::HttpBackend).
///
/// Labels: `operation`, `status` ("ok" | "error").
pub const BACKEND_REQUESTS_TOTAL: &str = "reelsearch_backend_requests_total";

/// Backend request duration in seconds.
///
/// Labels: `operation`.
pub const BACKEND_REQUEST_DURATION_SECONDS: &str = "reelsearch_backend_request_duration_seconds";

/// Total session cache hits.
pub const CACHE_HITS_TOTAL: &str = "reelsearch_cache_hits_total";

/// Total session cache misses.
///
/// Labels: `reason`.
pub const CACHE_MISSES_TOTAL: &str = "reelsearch_cache_misses_total";

/// Total session cache write attempts.
///
/// Labels: `outcome`.
pub const CACHE_WRITES_TOTAL: &str = "reelsearch_cache_writes_total";

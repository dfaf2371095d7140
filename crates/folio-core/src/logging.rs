//! Structured logging schema and field name constants for folio.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation tools can query by standardized field names across
//! every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events, operation completions |
//! | DEBUG | Decision points, intermediate values |
//! | TRACE | Per-item iteration (dropped hit IDs, facet terms) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "approvals", "search", "db"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "membership_service", "results", "pool"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "submit", "items", "facets", "create"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Membership row ID being operated on.
pub const MEMBERSHIP_ID: &str = "membership_id";

/// Collection ID involved in the operation.
pub const COLLECTION_ID: &str = "collection_id";

/// Item kind ("work", "bookmark").
pub const ITEM_KIND: &str = "item_kind";

/// Item ID within its kind.
pub const ITEM_ID: &str = "item_id";

/// Acting user's ID.
pub const USER_ID: &str = "user_id";

/// Facet category being resolved.
pub const FACET_CATEGORY: &str = "facet_category";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of hits in a search response page.
pub const HIT_COUNT: &str = "hit_count";

/// Number of records resolved from the backing store.
pub const RESULT_COUNT: &str = "result_count";

/// Number of hit IDs dropped during resolution (stale index entries).
pub const DROPPED_COUNT: &str = "dropped_count";

/// Number of facet values emitted.
pub const FACET_COUNT: &str = "facet_count";

// ─── Database fields ───────────────────────────────────────────────────────

/// Number of active connections in the pool.
pub const POOL_SIZE: &str = "pool_size";

/// Number of idle connections in the pool.
pub const POOL_IDLE: &str = "pool_idle";

/// Database table or entity affected.
pub const DB_TABLE: &str = "db_table";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

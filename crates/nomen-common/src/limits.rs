//! Centralized limits and thresholds.
//!
//! Shared constants for enclosing-type walks and pre-allocation sizes.
//! Base-type walks are not capped: the type table rejects cyclic
//! hierarchies at build time, so every walk terminates.

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum nesting depth for enclosing-type chains (`Outer.Middle.Inner`).
pub const MAX_NESTING_DEPTH: usize = 256;

// =============================================================================
// Capacity Limits
// =============================================================================

/// Initial capacity of the per-call derivation cache.
///
/// Most lookups compare a handful of candidates, each pair once.
pub const DERIVATION_CACHE_CAPACITY: usize = 32;

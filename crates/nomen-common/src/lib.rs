//! Common types and utilities for the nomen workspace.
//!
//! This crate provides foundational types used across all nomen crates:
//! - String interning (`Atom`, `Interner`) for type and member names
//! - Centralized limits for enclosing-type walks and cache sizing

// String interning for identifier deduplication
pub mod interner;
pub use interner::{Atom, Interner};

// Centralized limits and thresholds
pub mod limits;

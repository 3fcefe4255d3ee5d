//! Derivation engine over closet snapshots.
//!
//! # Responsibility
//! - Compute cost per wear, rankings, goal progress, staleness and
//!   closet-wide aggregates from a `ClosetSnapshot`.
//!
//! # Invariants
//! - No caching and no side effects: every call recomputes from the raw
//!   collections it is handed.
//! - Depends on the snapshot shape only, never on the store mutation API.

pub mod derive;
pub mod summary;

//! Closet domain model.
//!
//! # Responsibility
//! - Define the two canonical records: clothing items and wear events.
//! - Own boundary validation for user-supplied item and wear input.
//! - Normalize ISO-8601 date strings into calendar days for aggregation.
//!
//! # Invariants
//! - Item and wear IDs are assigned once and never change.
//! - Persisted date strings are kept verbatim; only aggregation reads them
//!   as calendar days.

pub mod day;
pub mod item;
pub mod wear;

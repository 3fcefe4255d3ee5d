//! Persistence collaborator contracts and implementations.
//!
//! # Responsibility
//! - Define the key-value blob contract the closet store writes through.
//! - Keep SQLite details out of the store and the derivation engine.
//!
//! # Invariants
//! - Multi-key writes are atomic.

pub mod kv_repo;

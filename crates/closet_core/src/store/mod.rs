//! Mutable closet state and its persistence.
//!
//! # Responsibility
//! - Own the item and wear collections; nothing else holds a mutable copy.
//! - Mediate every mutation and synchronize it to the key-value repository.

pub mod closet_store;

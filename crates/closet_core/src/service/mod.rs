//! Closet use-case services.
//!
//! # Responsibility
//! - Expose the store's mutations and the derivation engine's queries as one
//!   contract for UI/FFI callers.
//! - Produce the settings export document.

pub mod closet_service;
pub mod export;

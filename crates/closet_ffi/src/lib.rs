//! Flutter-facing bindings for the closet core.

pub mod api;

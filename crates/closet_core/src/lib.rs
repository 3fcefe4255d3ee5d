//! Core domain logic for the closet cost tracker.
//! This crate is the single source of truth for wardrobe invariants.

pub mod analytics;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use analytics::derive::{
    ValueRanking, DEFAULT_RANKING_LIMIT, DEFAULT_UNWORN_THRESHOLD_DAYS,
};
pub use analytics::summary::{CategoryBreakdown, ClosetSummary};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::day::parse_calendar_day;
pub use model::item::{Category, ClothingItem, ItemId, ItemInput, ValidationError};
pub use model::wear::{WearEvent, WearId};
pub use repo::kv_repo::{KvError, KvRepository, KvResult, MemoryKvRepository, SqliteKvRepository};
pub use service::closet_service::{ClosetResult, ClosetService, ClosetServiceError};
pub use service::export::{export_file_name, ExportDocument};
pub use store::closet_store::{
    ClosetSnapshot, ClosetStore, StoreError, StoreResult, ITEMS_STORAGE_KEY, WEARS_STORAGE_KEY,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

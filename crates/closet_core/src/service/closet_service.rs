//! Closet facade: the single entry point for UI-facing callers.
//!
//! # Responsibility
//! - Validate user input at the boundary, then delegate mutations to the
//!   store.
//! - Answer queries by running the derivation engine over the store's
//!   current snapshot.
//!
//! # Invariants
//! - Owns no state beyond the store it wraps.
//! - Invalid input never reaches the store.

use crate::analytics::derive::{self, ValueRanking};
use crate::analytics::summary::{self, CategoryBreakdown, ClosetSummary};
use crate::model::day::{iso_timestamp, parse_calendar_day};
use crate::model::item::{Category, ClothingItem, ItemId, ItemInput, ValidationError};
use crate::model::wear::{WearEvent, WearId};
use crate::repo::kv_repo::KvRepository;
use crate::service::export::ExportDocument;
use crate::store::closet_store::{ClosetSnapshot, ClosetStore, StoreError};
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use log::info;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ClosetResult<T> = Result<T, ClosetServiceError>;

/// Facade error.
#[derive(Debug)]
pub enum ClosetServiceError {
    /// Input rejected before reaching the store.
    Validation(ValidationError),
    /// Store precondition or persistence failure.
    Store(StoreError),
    /// Export document could not be encoded.
    Export(serde_json::Error),
}

impl Display for ClosetServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Export(err) => write!(f, "failed to encode export: {err}"),
        }
    }
}

impl Error for ClosetServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Export(err) => Some(err),
        }
    }
}

impl From<ValidationError> for ClosetServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for ClosetServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Use-case facade over a closet store.
pub struct ClosetService<R: KvRepository> {
    store: ClosetStore<R>,
}

impl<R: KvRepository> ClosetService<R> {
    /// Wraps an already-hydrated store.
    pub fn new(store: ClosetStore<R>) -> Self {
        Self { store }
    }

    /// Hydrates a store from `repo` and wraps it.
    pub fn open(repo: R) -> Self {
        Self::new(ClosetStore::open(repo))
    }

    /// Releases the wrapped store.
    pub fn into_store(self) -> ClosetStore<R> {
        self.store
    }

    /// Unfiltered item listing, in insertion order.
    pub fn items(&self) -> &[ClothingItem] {
        self.store.items()
    }

    /// Unfiltered wear listing, in insertion order.
    pub fn wear_events(&self) -> &[WearEvent] {
        self.store.wear_events()
    }

    pub fn item(&self, item_id: ItemId) -> Option<&ClothingItem> {
        self.snapshot().item(item_id)
    }

    fn snapshot(&self) -> &ClosetSnapshot {
        self.store.snapshot()
    }

    /// Validates and stores a new item.
    pub fn add_item(&mut self, input: ItemInput) -> ClosetResult<ClothingItem> {
        input.validate()?;
        Ok(self.store.add_item(input)?)
    }

    /// Validates and replaces an existing item.
    ///
    /// Returns `Ok(false)` when no item carries `item.id()`.
    pub fn update_item(&mut self, item: ClothingItem) -> ClosetResult<bool> {
        item.to_input().validate()?;
        Ok(self.store.update_item(item)?)
    }

    /// Deletes an item and its wear history. Unknown IDs are a no-op.
    pub fn delete_item(&mut self, item_id: ItemId) -> ClosetResult<bool> {
        Ok(self.store.delete_item(item_id)?)
    }

    /// Records a wear on the calendar day written in `date`.
    pub fn log_wear(
        &mut self,
        item_id: ItemId,
        date: impl Into<String>,
        notes: Option<String>,
    ) -> ClosetResult<WearEvent> {
        let date = date.into();
        if parse_calendar_day(&date).is_none() {
            return Err(ValidationError::InvalidDate {
                field: "date",
                value: date,
            }
            .into());
        }
        Ok(self.store.log_wear(item_id, date, notes)?)
    }

    /// Records a wear stamped with the local wall-clock time and offset.
    pub fn log_wear_now(
        &mut self,
        item_id: ItemId,
        notes: Option<String>,
    ) -> ClosetResult<WearEvent> {
        self.log_wear(item_id, iso_timestamp(Local::now()), notes)
    }

    /// Deletes one wear event. Unknown IDs are a no-op.
    pub fn delete_wear(&mut self, wear_id: WearId) -> ClosetResult<bool> {
        Ok(self.store.delete_wear(wear_id)?)
    }

    /// Removes every item and wear event, in memory and in storage.
    pub fn clear_all(&mut self) -> ClosetResult<()> {
        Ok(self.store.clear()?)
    }

    pub fn item_wears(&self, item_id: ItemId) -> Vec<&WearEvent> {
        derive::wears_of(self.snapshot(), item_id)
    }

    pub fn wear_history(&self, item_id: ItemId) -> Vec<&WearEvent> {
        derive::wear_history(self.snapshot(), item_id)
    }

    pub fn wear_count(&self, item_id: ItemId) -> usize {
        derive::wear_count(self.snapshot(), item_id)
    }

    pub fn cost_per_wear(&self, item_id: ItemId) -> f64 {
        derive::cost_per_wear(self.snapshot(), item_id)
    }

    pub fn most_worn(&self, limit: usize) -> Vec<&ClothingItem> {
        derive::most_worn(self.snapshot(), limit)
    }

    pub fn best_value(&self, limit: usize) -> Vec<ValueRanking<'_>> {
        derive::best_value(self.snapshot(), limit)
    }

    /// Items not worn within `days_threshold` days of `now`'s calendar day.
    pub fn unworn_items<Tz: TimeZone>(
        &self,
        days_threshold: u32,
        now: DateTime<Tz>,
    ) -> Vec<&ClothingItem> {
        derive::unworn_items(self.snapshot(), days_threshold, now)
    }

    /// `unworn_items` against the local wall clock.
    pub fn unworn_items_now(&self, days_threshold: u32) -> Vec<&ClothingItem> {
        self.unworn_items(days_threshold, Local::now())
    }

    pub fn wear_goal_progress(&self, item_id: ItemId) -> f64 {
        derive::wear_goal_progress(self.snapshot(), item_id)
    }

    pub fn filter_items_by_category(&self, category: Category) -> Vec<&ClothingItem> {
        derive::filter_by_category(self.snapshot(), category)
    }

    pub fn summary(&self) -> ClosetSummary {
        summary::closet_summary(self.snapshot())
    }

    pub fn category_breakdown(&self) -> Vec<CategoryBreakdown> {
        summary::category_breakdown(self.snapshot())
    }

    pub fn wears_by_day(&self) -> BTreeMap<NaiveDate, Vec<&WearEvent>> {
        summary::wears_by_day(self.snapshot())
    }

    pub fn wears_in_month(&self, year: i32, month: u32) -> BTreeMap<NaiveDate, Vec<&WearEvent>> {
        summary::wears_in_month(self.snapshot(), year, month)
    }

    /// Copies the closet into an export document stamped with `now`.
    pub fn export_document(&self, now: DateTime<Utc>) -> ExportDocument {
        ExportDocument::from_snapshot(self.snapshot(), now)
    }

    /// Pretty JSON export stamped with `now`.
    pub fn export_json(&self, now: DateTime<Utc>) -> ClosetResult<String> {
        let document = self.export_document(now);
        let json = document
            .to_json_pretty()
            .map_err(ClosetServiceError::Export)?;
        info!(
            "event=closet_export module=service status=ok items={} wears={} bytes={}",
            document.items.len(),
            document.wears.len(),
            json.len()
        );
        Ok(json)
    }
}

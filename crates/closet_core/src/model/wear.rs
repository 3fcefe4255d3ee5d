//! Wear event domain model.
//!
//! # Invariants
//! - A wear event is immutable once created; it can only be deleted.
//! - `item_id` must reference an item present in the same store.

use crate::model::day::parse_calendar_day;
use crate::model::item::ItemId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a wear event.
pub type WearId = Uuid;

/// One recorded instance of wearing an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WearEvent {
    id: WearId,
    item_id: ItemId,
    /// ISO-8601 date or date-time; only the calendar day is meaningful.
    date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
}

impl WearEvent {
    /// Creates a wear event with a freshly generated ID.
    pub fn new(item_id: ItemId, date: impl Into<String>, notes: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            item_id,
            date: date.into(),
            notes,
        }
    }

    pub fn id(&self) -> WearId {
        self.id
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Calendar day this wear is bucketed under, `None` when unparseable.
    pub fn day(&self) -> Option<NaiveDate> {
        parse_calendar_day(&self.date)
    }
}

//! Settings export document.
//!
//! # Invariants
//! - The document shape is `{ items, wears, exportDate }` with the same
//!   camelCase item/wear fields the store persists, so exported data reads
//!   back losslessly.

use crate::model::day::{iso_day, iso_timestamp};
use crate::model::item::ClothingItem;
use crate::model::wear::WearEvent;
use crate::store::closet_store::ClosetSnapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const EXPORT_FILE_PREFIX: &str = "closet-cost-tracker-export";

/// Full closet export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub items: Vec<ClothingItem>,
    pub wears: Vec<WearEvent>,
    /// ISO-8601 timestamp of when the export was taken.
    pub export_date: String,
}

impl ExportDocument {
    /// Copies the snapshot into an export stamped with `now`.
    pub fn from_snapshot(snapshot: &ClosetSnapshot, now: DateTime<Utc>) -> Self {
        Self {
            items: snapshot.items.clone(),
            wears: snapshot.wear_events.clone(),
            export_date: iso_timestamp(now),
        }
    }

    /// Pretty-printed JSON, two-space indented.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parses a previously exported document.
    ///
    /// Item and wear ids must be UUIDs. A document carrying any other id
    /// shape (for example short base36 ids) is rejected as a whole.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

/// Suggested download name, e.g. `closet-cost-tracker-export-2024-05-01.json`.
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("{EXPORT_FILE_PREFIX}-{}.json", iso_day(now.date_naive()))
}

#[cfg(test)]
mod tests {
    use super::{export_file_name, ExportDocument};
    use crate::model::item::{Category, ClothingItem, ItemInput};
    use crate::model::wear::WearEvent;
    use crate::store::closet_store::ClosetSnapshot;
    use chrono::{TimeZone, Utc};

    #[test]
    fn file_name_uses_export_day() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 23, 59, 0).unwrap();
        assert_eq!(
            export_file_name(now),
            "closet-cost-tracker-export-2024-05-01.json"
        );
    }

    #[test]
    fn document_uses_wire_field_names() {
        let mut input = ItemInput::new("Jacket", 100.0, Category::Outerwear)
            .with_purchase_date("2024-01-15")
            .with_wear_goal(10);
        input.photo_url = Some("data:image/png;base64,AAAA".to_string());
        let item = ClothingItem::new(input);
        let wear = WearEvent::new(item.id(), "2024-02-01", None);
        let snapshot = ClosetSnapshot {
            items: vec![item],
            wear_events: vec![wear],
        };
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();

        let json = serde_json::to_value(ExportDocument::from_snapshot(&snapshot, now)).unwrap();
        assert_eq!(json["exportDate"], "2024-05-01T08:00:00.000Z");
        assert_eq!(json["items"][0]["purchaseDate"], "2024-01-15");
        assert_eq!(json["items"][0]["wearGoal"], 10);
        assert_eq!(json["items"][0]["photoUrl"], "data:image/png;base64,AAAA");
        assert!(json["items"][0].get("notes").is_none());
        assert_eq!(
            json["wears"][0]["itemId"],
            snapshot.items[0].id().to_string()
        );
    }

    #[test]
    fn non_uuid_ids_are_rejected() {
        let raw = r#"{
            "items": [{
                "id": "lx3k9a2bq",
                "name": "Jacket",
                "price": 100,
                "category": "Outerwear",
                "purchaseDate": "2024-01-15"
            }],
            "wears": [],
            "exportDate": "2024-05-01T08:00:00.000Z"
        }"#;

        assert!(ExportDocument::from_json(raw).is_err());
    }
}

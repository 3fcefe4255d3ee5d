//! Per-item derivations: wear counts, cost per wear, rankings and staleness.
//!
//! # Invariants
//! - Functions are pure over the given snapshot and recompute on every call.
//! - Rankings are stable: ties keep collection order.
//! - `unworn_items` is the only time-dependent query, and takes "now" as an
//!   explicit argument.

use crate::model::item::{Category, ClothingItem, ItemId};
use crate::model::wear::WearEvent;
use crate::store::closet_store::ClosetSnapshot;
use chrono::{DateTime, Days, NaiveDate, TimeZone};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Number of entries returned by rankings when the caller has no preference.
pub const DEFAULT_RANKING_LIMIT: usize = 5;
/// Days without a wear before an item counts as unworn.
pub const DEFAULT_UNWORN_THRESHOLD_DAYS: u32 = 30;

/// An item paired with its current cost per wear.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRanking<'a> {
    pub item: &'a ClothingItem,
    pub cost_per_wear: f64,
}

/// All wear events of one item, in collection order.
pub fn wears_of(snapshot: &ClosetSnapshot, item_id: ItemId) -> Vec<&WearEvent> {
    snapshot
        .wear_events
        .iter()
        .filter(|wear| wear.item_id() == item_id)
        .collect()
}

/// Wear events of one item, most recent calendar day first.
///
/// Same-day wears keep collection order; unparseable dates sort last.
pub fn wear_history(snapshot: &ClosetSnapshot, item_id: ItemId) -> Vec<&WearEvent> {
    let mut wears = wears_of(snapshot, item_id);
    wears.sort_by_key(|wear| std::cmp::Reverse(wear.day()));
    wears
}

/// Number of recorded wears of one item.
pub fn wear_count(snapshot: &ClosetSnapshot, item_id: ItemId) -> usize {
    snapshot
        .wear_events
        .iter()
        .filter(|wear| wear.item_id() == item_id)
        .count()
}

/// Price divided by wear count, or the full price when never worn.
///
/// Returns `0.0` for an unknown item.
pub fn cost_per_wear(snapshot: &ClosetSnapshot, item_id: ItemId) -> f64 {
    let Some(item) = snapshot.item(item_id) else {
        return 0.0;
    };
    item_cost_per_wear(item, wear_count(snapshot, item_id))
}

/// Items ordered by wear count, highest first, truncated to `limit`.
pub fn most_worn(snapshot: &ClosetSnapshot, limit: usize) -> Vec<&ClothingItem> {
    let counts = wear_counts(snapshot);
    let mut ranked: Vec<&ClothingItem> = snapshot.items.iter().collect();
    ranked.sort_by(|a, b| count_of(&counts, b.id()).cmp(&count_of(&counts, a.id())));
    ranked.truncate(limit);
    ranked
}

/// Items ordered by cost per wear, cheapest first, truncated to `limit`.
///
/// Items whose cost per wear is zero, negative or not finite are left out;
/// a never-worn item stays in with its full price.
pub fn best_value(snapshot: &ClosetSnapshot, limit: usize) -> Vec<ValueRanking<'_>> {
    let counts = wear_counts(snapshot);
    let mut ranked: Vec<ValueRanking<'_>> = snapshot
        .items
        .iter()
        .map(|item| ValueRanking {
            item,
            cost_per_wear: item_cost_per_wear(item, count_of(&counts, item.id())),
        })
        .filter(|entry| entry.cost_per_wear.is_finite() && entry.cost_per_wear > 0.0)
        .collect();
    ranked.sort_by(|a, b| {
        a.cost_per_wear
            .partial_cmp(&b.cost_per_wear)
            .unwrap_or(Ordering::Equal)
    });
    ranked.truncate(limit);
    ranked
}

/// Items never worn, or last worn strictly before `now - days_threshold`.
///
/// Only calendar days are compared, with "today" taken in `now`'s own
/// offset. Wears with unparseable dates cannot
/// prove recent use, so an item whose wears are all unparseable is unworn.
pub fn unworn_items<Tz: TimeZone>(
    snapshot: &ClosetSnapshot,
    days_threshold: u32,
    now: DateTime<Tz>,
) -> Vec<&ClothingItem> {
    let cutoff = now
        .date_naive()
        .checked_sub_days(Days::new(u64::from(days_threshold)))
        .unwrap_or(NaiveDate::MIN);

    let mut last_worn: HashMap<ItemId, NaiveDate> = HashMap::new();
    for wear in &snapshot.wear_events {
        if let Some(day) = wear.day() {
            last_worn
                .entry(wear.item_id())
                .and_modify(|latest| *latest = (*latest).max(day))
                .or_insert(day);
        }
    }

    snapshot
        .items
        .iter()
        .filter(|item| match last_worn.get(&item.id()) {
            Some(latest) => *latest < cutoff,
            None => true,
        })
        .collect()
}

/// Fraction of the wear goal reached, clamped to `[0, 1]`.
///
/// Returns `0.0` for an unknown item or an item without a goal.
pub fn wear_goal_progress(snapshot: &ClosetSnapshot, item_id: ItemId) -> f64 {
    let Some(goal) = snapshot
        .item(item_id)
        .and_then(|item| item.wear_goal)
        .filter(|goal| *goal > 0)
    else {
        return 0.0;
    };
    let worn = wear_count(snapshot, item_id) as f64;
    (worn / f64::from(goal)).min(1.0)
}

/// Items in exactly `category`, in collection order.
pub fn filter_by_category(snapshot: &ClosetSnapshot, category: Category) -> Vec<&ClothingItem> {
    snapshot
        .items
        .iter()
        .filter(|item| item.category == category)
        .collect()
}

pub(crate) fn item_cost_per_wear(item: &ClothingItem, wears: usize) -> f64 {
    if wears == 0 {
        item.price
    } else {
        item.price / wears as f64
    }
}

pub(crate) fn wear_counts(snapshot: &ClosetSnapshot) -> HashMap<ItemId, usize> {
    let mut counts = HashMap::new();
    for wear in &snapshot.wear_events {
        *counts.entry(wear.item_id()).or_insert(0) += 1;
    }
    counts
}

pub(crate) fn count_of(counts: &HashMap<ItemId, usize>, item_id: ItemId) -> usize {
    counts.get(&item_id).copied().unwrap_or(0)
}

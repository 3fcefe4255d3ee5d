//! Closet-wide aggregates for the insights and calendar views.

use crate::analytics::derive::{count_of, wear_counts};
use crate::model::item::Category;
use crate::model::wear::WearEvent;
use crate::store::closet_store::ClosetSnapshot;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

/// Totals across the whole closet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosetSummary {
    pub total_items: usize,
    pub total_value: f64,
    pub total_wears: usize,
    /// `total_value / total_wears`, `0.0` before the first wear.
    pub average_cost_per_wear: f64,
}

/// Totals for one category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryBreakdown {
    pub category: Category,
    pub count: usize,
    pub total_value: f64,
    pub total_wears: usize,
    /// `total_value / total_wears`, `0.0` when the category was never worn.
    pub average_cost_per_wear: f64,
}

/// Computes closet-wide totals.
pub fn closet_summary(snapshot: &ClosetSnapshot) -> ClosetSummary {
    let total_value = snapshot.items.iter().map(|item| item.price).sum();
    let total_wears = snapshot.wear_events.len();
    ClosetSummary {
        total_items: snapshot.items.len(),
        total_value,
        total_wears,
        average_cost_per_wear: average(total_value, total_wears),
    }
}

/// Per-category totals in category order; empty categories are omitted.
pub fn category_breakdown(snapshot: &ClosetSnapshot) -> Vec<CategoryBreakdown> {
    let counts = wear_counts(snapshot);
    Category::ALL
        .into_iter()
        .filter_map(|category| {
            let items = snapshot
                .items
                .iter()
                .filter(|item| item.category == category);
            let (count, total_value, total_wears) =
                items.fold((0, 0.0, 0), |(count, value, wears), item| {
                    (
                        count + 1,
                        value + item.price,
                        wears + count_of(&counts, item.id()),
                    )
                });
            (count > 0).then(|| CategoryBreakdown {
                category,
                count,
                total_value,
                total_wears,
                average_cost_per_wear: average(total_value, total_wears),
            })
        })
        .collect()
}

/// Wear events bucketed by calendar day, oldest day first.
///
/// Events with unparseable dates are left out.
pub fn wears_by_day(snapshot: &ClosetSnapshot) -> BTreeMap<NaiveDate, Vec<&WearEvent>> {
    let mut days: BTreeMap<NaiveDate, Vec<&WearEvent>> = BTreeMap::new();
    for wear in &snapshot.wear_events {
        if let Some(day) = wear.day() {
            days.entry(day).or_default().push(wear);
        }
    }
    days
}

/// The slice of `wears_by_day` falling inside one calendar month.
pub fn wears_in_month(
    snapshot: &ClosetSnapshot,
    year: i32,
    month: u32,
) -> BTreeMap<NaiveDate, Vec<&WearEvent>> {
    let mut days = wears_by_day(snapshot);
    days.retain(|day, _| day.year() == year && day.month() == month);
    days
}

fn average(total_value: f64, total_wears: usize) -> f64 {
    if total_wears == 0 {
        0.0
    } else {
        total_value / total_wears as f64
    }
}

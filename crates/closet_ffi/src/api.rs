//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the closet facade to Dart screens via FRB.
//! - Translate between string IDs/labels and core types.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every call hydrates, mutates and persists under one process-wide lock,
//!   so two screens never interleave a read-modify-write.

use chrono::Utc;
use closet_core::db::open_db;
use closet_core::{
    core_version as core_version_inner, export_file_name, init_logging as init_logging_inner,
    ping as ping_inner, Category, ClosetService, ClothingItem, ItemId, ItemInput, KvRepository,
    SqliteKvRepository, WearEvent, DEFAULT_RANKING_LIMIT, DEFAULT_UNWORN_THRESHOLD_DAYS,
};
use log::warn;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use uuid::Uuid;

const RANKING_LIMIT_MAX: u32 = 50;
const CLOSET_DB_FILE_NAME: &str = "closet_tracker.sqlite3";
static CLOSET_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static CLOSET_LOCK: Mutex<()> = Mutex::new(());

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - `level`: `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory for rolling logs.
/// - Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Pins the closet database file for this process.
///
/// Must run before the first closet call. Repeating with the same path is
/// accepted; a different path is rejected.
///
/// # FFI contract
/// - Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_closet_db_path(path: String) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return "closet db path cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let active = CLOSET_DB_PATH.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!(
            "closet db path already set to `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        )
    }
}

/// Item form payload from add/edit screens.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosetItemInput {
    pub name: String,
    pub price: f64,
    /// One of `Tops|Bottoms|Outerwear|Dresses|Shoes|Accessories|Other`.
    pub category: String,
    pub photo_url: Option<String>,
    /// ISO-8601 date; when absent, now on add and unchanged on edit.
    pub purchase_date: Option<String>,
    pub wear_goal: Option<u32>,
    pub notes: Option<String>,
}

/// Generic mutation envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosetActionResponse {
    pub ok: bool,
    /// ID of the created or affected record.
    pub id: Option<String>,
    pub message: String,
}

impl ClosetActionResponse {
    fn success(message: impl Into<String>, id: Option<String>) -> Self {
        Self {
            ok: true,
            id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }
}

/// Item card data with its derived metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosetItemView {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub category: String,
    pub photo_url: Option<String>,
    pub purchase_date: String,
    pub wear_goal: Option<u32>,
    pub notes: Option<String>,
    pub wear_count: u32,
    pub cost_per_wear: f64,
    /// Fraction in `[0, 1]`; `0` without a goal.
    pub wear_goal_progress: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosetWearView {
    pub id: String,
    pub item_id: String,
    pub date: String,
    pub notes: Option<String>,
}

/// Item listing envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosetItemsResponse {
    pub ok: bool,
    pub items: Vec<ClosetItemView>,
    pub message: String,
}

/// Item detail envelope; wears are most recent first.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosetItemDetailResponse {
    pub ok: bool,
    pub item: Option<ClosetItemView>,
    pub wears: Vec<ClosetWearView>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClosetRankedItem {
    pub item: ClosetItemView,
    pub cost_per_wear: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClosetCategoryView {
    pub category: String,
    pub count: u32,
    pub total_value: f64,
    pub total_wears: u32,
    pub average_cost_per_wear: f64,
}

/// Insights screen envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosetInsightsResponse {
    pub ok: bool,
    pub total_items: u32,
    pub total_value: f64,
    pub total_wears: u32,
    pub average_cost_per_wear: f64,
    pub most_worn: Vec<ClosetItemView>,
    pub best_value: Vec<ClosetRankedItem>,
    pub categories: Vec<ClosetCategoryView>,
    pub applied_limit: u32,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosetCalendarDay {
    /// `YYYY-MM-DD`.
    pub day: String,
    pub wears: Vec<ClosetWearView>,
}

/// Calendar month envelope; days without wears are omitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosetCalendarResponse {
    pub ok: bool,
    pub days: Vec<ClosetCalendarDay>,
    pub message: String,
}

/// Settings export envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosetExportResponse {
    pub ok: bool,
    pub file_name: String,
    pub json: String,
    pub message: String,
}

/// Adds an item from the add-item form.
#[flutter_rust_bridge::frb(sync)]
pub fn closet_add_item(input: ClosetItemInput) -> ClosetActionResponse {
    let result = to_item_input(input).and_then(|input| {
        with_closet_service(|service| service.add_item(input).map_err(|err| err.to_string()))
    });
    match result {
        Ok(item) => ClosetActionResponse::success("Item added.", Some(item.id().to_string())),
        Err(err) => ClosetActionResponse::failure(format!("closet_add_item failed: {err}")),
    }
}

/// Replaces an item from the edit-item form.
///
/// An absent `purchase_date` keeps the stored one.
#[flutter_rust_bridge::frb(sync)]
pub fn closet_update_item(item_id: String, input: ClosetItemInput) -> ClosetActionResponse {
    let result = parse_id(&item_id).and_then(|id| {
        let keep_purchase_date = non_blank(input.purchase_date.clone()).is_none();
        let mut input = to_item_input(input)?;
        with_closet_service(|service| {
            if keep_purchase_date {
                if let Some(existing) = service.item(id) {
                    input.purchase_date = existing.purchase_date.clone();
                }
            }
            service
                .update_item(ClothingItem::with_id(id, input))
                .map_err(|err| err.to_string())
        })
        .map(|updated| (id, updated))
    });
    match result {
        Ok((id, true)) => ClosetActionResponse::success("Item updated.", Some(id.to_string())),
        Ok((_, false)) => ClosetActionResponse::success("No matching item.", None),
        Err(err) => ClosetActionResponse::failure(format!("closet_update_item failed: {err}")),
    }
}

/// Deletes an item together with its wear history.
#[flutter_rust_bridge::frb(sync)]
pub fn closet_delete_item(item_id: String) -> ClosetActionResponse {
    let result = parse_id(&item_id).and_then(|id| {
        with_closet_service(|service| service.delete_item(id).map_err(|err| err.to_string()))
            .map(|deleted| (id, deleted))
    });
    match result {
        Ok((id, true)) => ClosetActionResponse::success("Item deleted.", Some(id.to_string())),
        Ok((_, false)) => ClosetActionResponse::success("No matching item.", None),
        Err(err) => ClosetActionResponse::failure(format!("closet_delete_item failed: {err}")),
    }
}

/// Logs a wear; `date` defaults to now.
#[flutter_rust_bridge::frb(sync)]
pub fn closet_log_wear(
    item_id: String,
    date: Option<String>,
    notes: Option<String>,
) -> ClosetActionResponse {
    let notes = non_blank(notes);
    let result = parse_id(&item_id).and_then(|id| {
        with_closet_service(|service| {
            let logged = match non_blank(date) {
                Some(date) => service.log_wear(id, date, notes),
                None => service.log_wear_now(id, notes),
            };
            logged.map_err(|err| err.to_string())
        })
    });
    match result {
        Ok(wear) => ClosetActionResponse::success("Wear logged.", Some(wear.id().to_string())),
        Err(err) => ClosetActionResponse::failure(format!("closet_log_wear failed: {err}")),
    }
}

/// Deletes one wear event.
#[flutter_rust_bridge::frb(sync)]
pub fn closet_delete_wear(wear_id: String) -> ClosetActionResponse {
    let result = parse_id(&wear_id).and_then(|id| {
        with_closet_service(|service| service.delete_wear(id).map_err(|err| err.to_string()))
            .map(|deleted| (id, deleted))
    });
    match result {
        Ok((id, true)) => ClosetActionResponse::success("Wear deleted.", Some(id.to_string())),
        Ok((_, false)) => ClosetActionResponse::success("No matching wear.", None),
        Err(err) => ClosetActionResponse::failure(format!("closet_delete_wear failed: {err}")),
    }
}

/// Lists items for the closet grid, optionally filtered by category.
#[flutter_rust_bridge::frb(sync)]
pub fn closet_list_items(category: Option<String>) -> ClosetItemsResponse {
    let result = non_blank(category)
        .map(|label| label.parse::<Category>().map_err(|err| err.to_string()))
        .transpose()
        .and_then(|category| {
            with_closet_service(|service| {
                let items = match category {
                    Some(category) => service.filter_items_by_category(category),
                    None => service.items().iter().collect(),
                };
                Ok(items
                    .into_iter()
                    .map(|item| to_item_view(service, item))
                    .collect::<Vec<_>>())
            })
        });
    items_response("closet_list_items", result)
}

/// Lists items not worn within `days_threshold` days (default 30).
#[flutter_rust_bridge::frb(sync)]
pub fn closet_unworn_items(days_threshold: Option<u32>) -> ClosetItemsResponse {
    let days = days_threshold.unwrap_or(DEFAULT_UNWORN_THRESHOLD_DAYS);
    let result = with_closet_service(|service| {
        Ok(service
            .unworn_items_now(days)
            .into_iter()
            .map(|item| to_item_view(service, item))
            .collect::<Vec<_>>())
    });
    items_response("closet_unworn_items", result)
}

/// Loads one item with its wear history.
#[flutter_rust_bridge::frb(sync)]
pub fn closet_item_detail(item_id: String) -> ClosetItemDetailResponse {
    let result = parse_id(&item_id).and_then(|id| {
        with_closet_service(|service| {
            let item = service.item(id).map(|item| to_item_view(service, item));
            let wears = service
                .wear_history(id)
                .into_iter()
                .map(to_wear_view)
                .collect::<Vec<_>>();
            Ok((item, wears))
        })
    });
    match result {
        Ok((Some(item), wears)) => ClosetItemDetailResponse {
            ok: true,
            item: Some(item),
            wears,
            message: String::new(),
        },
        Ok((None, _)) => ClosetItemDetailResponse {
            ok: false,
            item: None,
            wears: Vec::new(),
            message: format!("Item not found: {item_id}"),
        },
        Err(err) => ClosetItemDetailResponse {
            ok: false,
            item: None,
            wears: Vec::new(),
            message: format!("closet_item_detail failed: {err}"),
        },
    }
}

/// Computes the insights screen in one call.
///
/// `limit` bounds both rankings: default 5, `0` means default, clamps to 50.
#[flutter_rust_bridge::frb(sync)]
pub fn closet_insights(limit: Option<u32>) -> ClosetInsightsResponse {
    let applied_limit = normalize_ranking_limit(limit);
    let result = with_closet_service(|service| {
        let summary = service.summary();
        let most_worn = service
            .most_worn(applied_limit as usize)
            .into_iter()
            .map(|item| to_item_view(service, item))
            .collect::<Vec<_>>();
        let best_value = service
            .best_value(applied_limit as usize)
            .into_iter()
            .map(|entry| ClosetRankedItem {
                item: to_item_view(service, entry.item),
                cost_per_wear: entry.cost_per_wear,
            })
            .collect::<Vec<_>>();
        let categories = service
            .category_breakdown()
            .into_iter()
            .map(|entry| ClosetCategoryView {
                category: entry.category.to_string(),
                count: saturating_u32(entry.count),
                total_value: entry.total_value,
                total_wears: saturating_u32(entry.total_wears),
                average_cost_per_wear: entry.average_cost_per_wear,
            })
            .collect::<Vec<_>>();
        Ok(ClosetInsightsResponse {
            ok: true,
            total_items: saturating_u32(summary.total_items),
            total_value: summary.total_value,
            total_wears: saturating_u32(summary.total_wears),
            average_cost_per_wear: summary.average_cost_per_wear,
            most_worn,
            best_value,
            categories,
            applied_limit,
            message: String::new(),
        })
    });
    result.unwrap_or_else(|err| ClosetInsightsResponse {
        ok: false,
        total_items: 0,
        total_value: 0.0,
        total_wears: 0,
        average_cost_per_wear: 0.0,
        most_worn: Vec::new(),
        best_value: Vec::new(),
        categories: Vec::new(),
        applied_limit,
        message: format!("closet_insights failed: {err}"),
    })
}

/// Wears of one calendar month, grouped by day.
#[flutter_rust_bridge::frb(sync)]
pub fn closet_calendar_month(year: i32, month: u32) -> ClosetCalendarResponse {
    if !(1..=12).contains(&month) {
        return ClosetCalendarResponse {
            ok: false,
            days: Vec::new(),
            message: format!("closet_calendar_month failed: invalid month {month}"),
        };
    }
    let result = with_closet_service(|service| {
        Ok(service
            .wears_in_month(year, month)
            .into_iter()
            .map(|(day, wears)| ClosetCalendarDay {
                day: day.format("%Y-%m-%d").to_string(),
                wears: wears.into_iter().map(to_wear_view).collect(),
            })
            .collect::<Vec<_>>())
    });
    match result {
        Ok(days) => ClosetCalendarResponse {
            ok: true,
            days,
            message: String::new(),
        },
        Err(err) => ClosetCalendarResponse {
            ok: false,
            days: Vec::new(),
            message: format!("closet_calendar_month failed: {err}"),
        },
    }
}

/// Serializes the closet for the settings export button.
#[flutter_rust_bridge::frb(sync)]
pub fn closet_export() -> ClosetExportResponse {
    let now = Utc::now();
    let result = with_closet_service(|service| service.export_json(now).map_err(|err| err.to_string()));
    match result {
        Ok(json) => ClosetExportResponse {
            ok: true,
            file_name: export_file_name(now),
            json,
            message: "Data exported successfully.".to_string(),
        },
        Err(err) => ClosetExportResponse {
            ok: false,
            file_name: String::new(),
            json: String::new(),
            message: format!("closet_export failed: {err}"),
        },
    }
}

/// Removes all items and wear events.
#[flutter_rust_bridge::frb(sync)]
pub fn closet_clear_all() -> ClosetActionResponse {
    match with_closet_service(|service| service.clear_all().map_err(|err| err.to_string())) {
        Ok(()) => ClosetActionResponse::success("All data cleared.", None),
        Err(err) => ClosetActionResponse::failure(format!("closet_clear_all failed: {err}")),
    }
}

fn to_item_input(input: ClosetItemInput) -> Result<ItemInput, String> {
    let category = input
        .category
        .parse::<Category>()
        .map_err(|err| err.to_string())?;
    let mut item = ItemInput::new(input.name.trim(), input.price, category);
    if let Some(purchase_date) = non_blank(input.purchase_date) {
        item = item.with_purchase_date(purchase_date);
    }
    item.photo_url = non_blank(input.photo_url);
    item.wear_goal = input.wear_goal;
    item.notes = non_blank(input.notes);
    Ok(item)
}

fn to_item_view<R: KvRepository>(service: &ClosetService<R>, item: &ClothingItem) -> ClosetItemView {
    ClosetItemView {
        id: item.id().to_string(),
        name: item.name.clone(),
        price: item.price,
        category: item.category.to_string(),
        photo_url: item.photo_url.clone(),
        purchase_date: item.purchase_date.clone(),
        wear_goal: item.wear_goal,
        notes: item.notes.clone(),
        wear_count: saturating_u32(service.wear_count(item.id())),
        cost_per_wear: service.cost_per_wear(item.id()),
        wear_goal_progress: service.wear_goal_progress(item.id()),
    }
}

fn to_wear_view(wear: &WearEvent) -> ClosetWearView {
    ClosetWearView {
        id: wear.id().to_string(),
        item_id: wear.item_id().to_string(),
        date: wear.date().to_string(),
        notes: wear.notes().map(str::to_string),
    }
}

fn items_response(
    operation: &str,
    result: Result<Vec<ClosetItemView>, String>,
) -> ClosetItemsResponse {
    match result {
        Ok(items) => {
            let message = if items.is_empty() {
                "No items.".to_string()
            } else {
                format!("Found {} item(s).", items.len())
            };
            ClosetItemsResponse {
                ok: true,
                items,
                message,
            }
        }
        Err(err) => ClosetItemsResponse {
            ok: false,
            items: Vec::new(),
            message: format!("{operation} failed: {err}"),
        },
    }
}

fn parse_id(raw: &str) -> Result<ItemId, String> {
    Uuid::parse_str(raw.trim()).map_err(|_| format!("invalid id `{raw}`"))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn normalize_ranking_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) | None => DEFAULT_RANKING_LIMIT as u32,
        Some(value) => value.min(RANKING_LIMIT_MAX),
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn resolve_closet_db_path() -> PathBuf {
    CLOSET_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("CLOSET_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(CLOSET_DB_FILE_NAME)
        })
        .clone()
}

fn with_closet_service<T>(
    f: impl FnOnce(&mut ClosetService<SqliteKvRepository<'_>>) -> Result<T, String>,
) -> Result<T, String> {
    // A poisoned lock only means an earlier call panicked; state lives on disk.
    let _guard = CLOSET_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let db_path = resolve_closet_db_path();
    let mut conn = open_db(&db_path).map_err(|err| {
        warn!("event=closet_db_open module=ffi status=error error={err}");
        format!("closet DB open failed: {err}")
    })?;
    let repo = SqliteKvRepository::try_new(&mut conn).map_err(|err| {
        warn!("event=closet_repo_init module=ffi status=error error={err}");
        format!("closet repo init failed: {err}")
    })?;
    let mut service = ClosetService::open(repo);
    f(&mut service)
}

use chrono::{Duration, TimeZone, Utc};
use closet_core::model::day::iso_timestamp;
use closet_core::{
    Category, ClosetService, ClosetServiceError, ExportDocument, ItemInput, MemoryKvRepository,
    StoreError, ValidationError, DEFAULT_RANKING_LIMIT, DEFAULT_UNWORN_THRESHOLD_DAYS,
};
use uuid::Uuid;

fn service() -> ClosetService<MemoryKvRepository> {
    ClosetService::open(MemoryKvRepository::new())
}

#[test]
fn jacket_scenario_tracks_cost_and_goal() {
    let mut closet = service();
    let jacket = closet
        .add_item(ItemInput::new("Jacket", 100.0, Category::Outerwear))
        .unwrap();
    assert_eq!(closet.cost_per_wear(jacket.id()), 100.0);

    for _ in 0..4 {
        closet.log_wear_now(jacket.id(), None).unwrap();
    }
    assert_eq!(closet.cost_per_wear(jacket.id()), 25.0);
    assert_eq!(closet.wear_goal_progress(jacket.id()), 0.0);

    let mut edited = jacket.clone();
    edited.wear_goal = Some(10);
    assert!(closet.update_item(edited).unwrap());
    assert_eq!(closet.wear_goal_progress(jacket.id()), 0.4);
}

#[test]
fn most_worn_scenario_picks_heaviest_rotation() {
    let mut closet = service();
    let a = closet
        .add_item(ItemInput::new("A", 30.0, Category::Tops))
        .unwrap();
    let b = closet
        .add_item(ItemInput::new("B", 30.0, Category::Tops))
        .unwrap();
    for date in ["2024-02-01", "2024-02-02", "2024-02-03"] {
        closet.log_wear(a.id(), date, None).unwrap();
    }
    closet.log_wear(b.id(), "2024-02-04", None).unwrap();

    let top = closet.most_worn(1);
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].id(), a.id());
    assert_eq!(closet.most_worn(DEFAULT_RANKING_LIMIT).len(), 2);
}

#[test]
fn unworn_scenario_follows_last_wear() {
    let now = Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap();
    let mut closet = service();
    let item = closet
        .add_item(ItemInput::new("Blazer", 120.0, Category::Outerwear))
        .unwrap();

    closet
        .log_wear(item.id(), iso_timestamp(now - Duration::days(40)), None)
        .unwrap();
    let unworn = closet.unworn_items(DEFAULT_UNWORN_THRESHOLD_DAYS, now);
    assert_eq!(unworn.len(), 1);
    assert_eq!(unworn[0].id(), item.id());

    closet
        .log_wear(item.id(), iso_timestamp(now - Duration::days(1)), None)
        .unwrap();
    assert!(closet.unworn_items(30, now).is_empty());
}

#[test]
fn invalid_input_never_reaches_the_store() {
    let mut closet = service();

    let err = closet
        .add_item(ItemInput::new("", 10.0, Category::Tops))
        .unwrap_err();
    assert!(matches!(
        err,
        ClosetServiceError::Validation(ValidationError::EmptyName)
    ));

    let err = closet
        .add_item(ItemInput::new("Tee", -5.0, Category::Tops))
        .unwrap_err();
    assert!(matches!(
        err,
        ClosetServiceError::Validation(ValidationError::InvalidPrice(_))
    ));
    assert!(closet.items().is_empty());

    let tee = closet
        .add_item(ItemInput::new("Tee", 10.0, Category::Tops))
        .unwrap();
    let mut broken = tee.clone();
    broken.name = "  ".to_string();
    assert!(closet.update_item(broken).is_err());
    assert_eq!(closet.items()[0].name, "Tee");

    let err = closet.log_wear(tee.id(), "whenever", None).unwrap_err();
    assert!(matches!(
        err,
        ClosetServiceError::Validation(ValidationError::InvalidDate { field: "date", .. })
    ));
    assert!(closet.wear_events().is_empty());
}

#[test]
fn log_wear_for_unknown_item_is_rejected() {
    let mut closet = service();
    let missing = Uuid::new_v4();

    let err = closet.log_wear(missing, "2024-02-01", None).unwrap_err();

    assert!(matches!(
        err,
        ClosetServiceError::Store(StoreError::ItemNotFound(id)) if id == missing
    ));
}

#[test]
fn delete_item_cascades_and_unknown_deletes_are_noops() {
    let mut closet = service();
    let tee = closet
        .add_item(ItemInput::new("Tee", 10.0, Category::Tops))
        .unwrap();
    let wear = closet.log_wear(tee.id(), "2024-02-01", None).unwrap();

    assert!(!closet.delete_wear(Uuid::new_v4()).unwrap());
    assert!(!closet.delete_item(Uuid::new_v4()).unwrap());
    assert_eq!(closet.item_wears(tee.id()), vec![&wear]);

    assert!(closet.delete_item(tee.id()).unwrap());
    assert!(closet.items().is_empty());
    assert!(closet.wear_events().is_empty());
    assert!(closet.item(tee.id()).is_none());
}

#[test]
fn queries_reflect_latest_mutations() {
    let mut closet = service();
    let tee = closet
        .add_item(ItemInput::new("Tee", 20.0, Category::Tops))
        .unwrap();
    let boots = closet
        .add_item(ItemInput::new("Boots", 150.0, Category::Shoes))
        .unwrap();
    let first = closet.log_wear(tee.id(), "2024-02-01", None).unwrap();
    let second = closet.log_wear(tee.id(), "2024-02-09", None).unwrap();

    assert_eq!(closet.wear_count(tee.id()), 2);
    assert_eq!(closet.wear_history(tee.id()), vec![&second, &first]);
    assert_eq!(closet.filter_items_by_category(Category::Shoes).len(), 1);

    let best = closet.best_value(DEFAULT_RANKING_LIMIT);
    assert_eq!(best[0].item.id(), tee.id());
    assert_eq!(best[0].cost_per_wear, 10.0);
    assert_eq!(best[1].item.id(), boots.id());

    let summary = closet.summary();
    assert_eq!(summary.total_items, 2);
    assert_eq!(summary.total_value, 170.0);
    assert_eq!(summary.total_wears, 2);
    assert_eq!(closet.category_breakdown().len(), 2);
    assert_eq!(closet.wears_by_day().len(), 2);
    assert_eq!(closet.wears_in_month(2024, 2).len(), 2);

    closet.delete_wear(first.id()).unwrap();
    assert_eq!(closet.cost_per_wear(tee.id()), 20.0);
}

#[test]
fn export_round_trips_the_closet() {
    let mut closet = service();
    let mut input = ItemInput::new("Dress", 80.0, Category::Dresses)
        .with_purchase_date("2023-12-24")
        .with_wear_goal(12);
    input.photo_url = Some("data:image/jpeg;base64,/9j/4AAQ".to_string());
    input.notes = Some("holiday".to_string());
    let dress = closet.add_item(input).unwrap();
    closet
        .log_wear(dress.id(), "2023-12-25T19:00:00.000Z", Some("party".to_string()))
        .unwrap();
    let now = Utc.with_ymd_and_hms(2024, 1, 2, 10, 30, 0).unwrap();

    let json = closet.export_json(now).unwrap();
    let parsed = ExportDocument::from_json(&json).unwrap();

    assert_eq!(parsed.export_date, "2024-01-02T10:30:00.000Z");
    assert_eq!(parsed.items, closet.items());
    assert_eq!(parsed.wears, closet.wear_events());
    assert_eq!(parsed, closet.export_document(now));
}

#[test]
fn clear_all_empties_the_closet() {
    let mut closet = service();
    let tee = closet
        .add_item(ItemInput::new("Tee", 10.0, Category::Tops))
        .unwrap();
    closet.log_wear(tee.id(), "2024-02-01", None).unwrap();

    closet.clear_all().unwrap();

    assert!(closet.items().is_empty());
    assert!(closet.wear_events().is_empty());
    let reopened = ClosetService::open(closet.into_store().into_repo());
    assert!(reopened.items().is_empty());
}

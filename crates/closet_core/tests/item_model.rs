use closet_core::{Category, ClothingItem, ItemInput, ValidationError, WearEvent};
use uuid::Uuid;

#[test]
fn item_new_assigns_fresh_ids() {
    let input = ItemInput::new("Tee", 20.0, Category::Tops);
    let first = ClothingItem::new(input.clone());
    let second = ClothingItem::new(input);

    assert!(!first.id().is_nil());
    assert_ne!(first.id(), second.id());
    assert_eq!(first.to_input(), second.to_input());
}

#[test]
fn input_defaults_purchase_date_to_now_and_passes_validation() {
    let input = ItemInput::new("Tee", 0.0, Category::Tops);

    assert!(input.purchase_date.ends_with('Z'));
    assert_eq!(input.wear_goal, None);
    input.validate().unwrap();
}

#[test]
fn validate_rejects_malformed_input() {
    let blank = ItemInput::new("   ", 10.0, Category::Tops);
    assert_eq!(blank.validate().unwrap_err(), ValidationError::EmptyName);

    let negative = ItemInput::new("Tee", -1.0, Category::Tops);
    assert_eq!(
        negative.validate().unwrap_err(),
        ValidationError::InvalidPrice(-1.0)
    );

    let infinite = ItemInput::new("Tee", f64::INFINITY, Category::Tops);
    assert!(matches!(
        infinite.validate().unwrap_err(),
        ValidationError::InvalidPrice(_)
    ));

    let zero_goal = ItemInput::new("Tee", 10.0, Category::Tops).with_wear_goal(0);
    assert_eq!(zero_goal.validate().unwrap_err(), ValidationError::ZeroWearGoal);

    let bad_date = ItemInput::new("Tee", 10.0, Category::Tops).with_purchase_date("last week");
    assert_eq!(
        bad_date.validate().unwrap_err(),
        ValidationError::InvalidDate {
            field: "purchase_date",
            value: "last week".to_string(),
        }
    );
}

#[test]
fn category_parses_labels_case_insensitively() {
    assert_eq!("outerwear".parse::<Category>().unwrap(), Category::Outerwear);
    assert_eq!(" Shoes ".parse::<Category>().unwrap(), Category::Shoes);
    assert_eq!(
        "Hats".parse::<Category>().unwrap_err(),
        ValidationError::UnknownCategory("Hats".to_string())
    );
    assert_eq!(Category::ALL.len(), 7);
    assert_eq!(Category::Accessories.to_string(), "Accessories");
}

#[test]
fn item_serialization_uses_camel_case_wire_fields() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let mut input = ItemInput::new("Jacket", 100.0, Category::Outerwear)
        .with_purchase_date("2024-01-15")
        .with_wear_goal(10);
    input.notes = Some("dry clean only".to_string());
    let item = ClothingItem::with_id(id, input);

    let json = serde_json::to_value(&item).unwrap();
    assert_eq!(json["id"], id.to_string());
    assert_eq!(json["name"], "Jacket");
    assert_eq!(json["price"], 100.0);
    assert_eq!(json["category"], "Outerwear");
    assert_eq!(json["purchaseDate"], "2024-01-15");
    assert_eq!(json["wearGoal"], 10);
    assert_eq!(json["notes"], "dry clean only");
    assert!(json.get("photoUrl").is_none());

    let decoded: ClothingItem = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, item);
}

#[test]
fn item_deserializes_without_optional_fields() {
    let value = serde_json::json!({
        "id": "11111111-2222-4333-8444-555555555555",
        "name": "Loafers",
        "price": 80,
        "category": "Shoes",
        "purchaseDate": "2023-09-01T00:00:00.000Z"
    });

    let item: ClothingItem = serde_json::from_value(value).unwrap();
    assert_eq!(item.price, 80.0);
    assert_eq!(item.photo_url, None);
    assert_eq!(item.wear_goal, None);
    assert_eq!(item.notes, None);
}

#[test]
fn wear_event_exposes_calendar_day() {
    let item_id = Uuid::new_v4();
    let wear = WearEvent::new(item_id, "2024-03-10T22:15:00.000Z", Some("dinner".to_string()));

    assert_eq!(wear.item_id(), item_id);
    assert_eq!(wear.notes(), Some("dinner"));
    assert_eq!(
        wear.day(),
        chrono::NaiveDate::from_ymd_opt(2024, 3, 10)
    );

    let json = serde_json::to_value(&wear).unwrap();
    assert_eq!(json["itemId"], item_id.to_string());
    assert_eq!(json["date"], "2024-03-10T22:15:00.000Z");
}

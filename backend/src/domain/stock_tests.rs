//! Tests for stock field validation and partial merges.

use chrono::TimeZone;
use rstest::{fixture, rstest};

use super::*;

const OWNER: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

#[fixture]
fn apples_draft() -> StockDraft {
    StockDraft {
        name: Some("Apples".to_owned()),
        category: Some("Fruits".to_owned()),
        quantity: Some("5".to_owned()),
        unit: Some("kg".to_owned()),
        user: Some(OWNER.to_owned()),
        ..StockDraft::default()
    }
}

#[fixture]
fn stored_item() -> StockItem {
    StockItem {
        id: StockId::random(),
        name: StockName::new("Milk").expect("valid name"),
        category: Category::Dairy,
        quantity: Quantity::new(2.0).expect("valid quantity"),
        unit: Unit::Liters,
        expiration_date: Some(Utc.with_ymd_and_hms(2026, 11, 1, 0, 0, 0).unwrap()),
        added_date: Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap(),
        notes: Some("top shelf".to_owned()),
        user: UserSummary {
            id: UserId::new(OWNER).expect("valid owner"),
            name: "Ada".to_owned(),
            email: "ada@example.com".to_owned(),
        },
        image: None,
    }
}

#[rstest]
fn new_stock_accepts_valid_draft(apples_draft: StockDraft) {
    let stock = NewStock::try_from(apples_draft).expect("valid draft");
    assert_eq!(stock.name.as_ref(), "Apples");
    assert_eq!(stock.category, Category::Fruits);
    assert_eq!(stock.quantity.value(), 5.0);
    assert_eq!(stock.unit, Unit::Kg);
    assert!(stock.image.is_none());
    assert!(stock.expiration_date.is_none());
}

#[rstest]
fn new_stock_defaults_unit_to_units(mut apples_draft: StockDraft) {
    apples_draft.unit = None;
    let stock = NewStock::try_from(apples_draft).expect("valid draft");
    assert_eq!(stock.unit, Unit::Units);
}

#[rstest]
#[case::name("name")]
#[case::category("category")]
#[case::quantity("quantity")]
#[case::user("user")]
fn new_stock_requires_fields(mut apples_draft: StockDraft, #[case] field: &'static str) {
    match field {
        "name" => apples_draft.name = None,
        "category" => apples_draft.category = None,
        "quantity" => apples_draft.quantity = Some(String::new()),
        _ => apples_draft.user = None,
    }
    let err = NewStock::try_from(apples_draft).expect_err("missing field");
    assert_eq!(err, StockValidationError::MissingField { field });
    assert_eq!(err.code(), "missing_field");
}

#[rstest]
#[case::lowercase("fruits")]
#[case::unknown("Meat")]
#[case::padded(" Fruits")]
fn new_stock_rejects_categories_outside_the_set(
    mut apples_draft: StockDraft,
    #[case] category: &str,
) {
    apples_draft.category = Some(category.to_owned());
    let err = NewStock::try_from(apples_draft).expect_err("invalid category");
    assert_eq!(err.field(), "category");
    assert_eq!(err.code(), "unknown_category");
}

#[rstest]
fn new_stock_rejects_negative_quantity(mut apples_draft: StockDraft) {
    apples_draft.quantity = Some("-1".to_owned());
    let err = NewStock::try_from(apples_draft).expect_err("negative quantity");
    assert_eq!(err, StockValidationError::NegativeQuantity);
}

#[rstest]
#[case("abc")]
#[case("NaN")]
#[case("inf")]
fn new_stock_rejects_non_numeric_quantity(mut apples_draft: StockDraft, #[case] raw: &str) {
    apples_draft.quantity = Some(raw.to_owned());
    let err = NewStock::try_from(apples_draft).expect_err("invalid quantity");
    assert_eq!(err.code(), "invalid_quantity");
}

#[rstest]
fn new_stock_rejects_unknown_unit(mut apples_draft: StockDraft) {
    apples_draft.unit = Some("pounds".to_owned());
    let err = NewStock::try_from(apples_draft).expect_err("invalid unit");
    assert_eq!(err.field(), "unit");
}

#[rstest]
fn new_stock_rejects_malformed_user(mut apples_draft: StockDraft) {
    apples_draft.user = Some("000000000000000000000000".to_owned());
    let err = NewStock::try_from(apples_draft).expect_err("invalid user");
    assert_eq!(err.field(), "user");
}

#[rstest]
fn new_stock_rejects_blank_name(mut apples_draft: StockDraft) {
    apples_draft.name = Some("   ".to_owned());
    let err = NewStock::try_from(apples_draft).expect_err("blank name");
    assert_eq!(err, StockValidationError::EmptyName);
}

#[rstest]
#[case("2026-11-01", Utc.with_ymd_and_hms(2026, 11, 1, 0, 0, 0).unwrap())]
#[case("2026-11-01T10:30:00Z", Utc.with_ymd_and_hms(2026, 11, 1, 10, 30, 0).unwrap())]
#[case("2026-11-01T12:30:00+02:00", Utc.with_ymd_and_hms(2026, 11, 1, 10, 30, 0).unwrap())]
fn parse_stock_date_accepts_dates_and_timestamps(
    #[case] raw: &str,
    #[case] expected: DateTime<Utc>,
) {
    assert_eq!(parse_stock_date(raw, "expirationDate"), Ok(expected));
}

#[rstest]
fn parse_stock_date_rejects_garbage() {
    let err = parse_stock_date("next tuesday", "expirationDate").expect_err("invalid date");
    assert_eq!(err.field(), "expirationDate");
}

#[rstest]
fn patch_only_carries_supplied_fields() {
    let patch = StockPatch::try_from(StockDraft {
        quantity: Some("3.5".to_owned()),
        ..StockDraft::default()
    })
    .expect("valid patch");
    assert_eq!(patch.quantity, Some(Quantity::new(3.5).expect("valid")));
    assert!(patch.name.is_none());
    assert!(patch.category.is_none());
    assert!(patch.unit.is_none());
    assert!(patch.expiration_date.is_none());
    assert!(!patch.is_empty());
}

#[rstest]
fn patch_validates_supplied_fields() {
    let err = StockPatch::try_from(StockDraft {
        category: Some("Snacks".to_owned()),
        ..StockDraft::default()
    })
    .expect_err("invalid category");
    assert_eq!(err.code(), "unknown_category");
}

#[rstest]
fn patch_with_blank_expiration_clears_it(mut stored_item: StockItem) {
    let patch = StockPatch::try_from(StockDraft {
        expiration_date: Some(String::new()),
        ..StockDraft::default()
    })
    .expect("valid patch");
    assert_eq!(patch.expiration_date, Some(None));
    stored_item.apply(patch);
    assert!(stored_item.expiration_date.is_none());
}

#[rstest]
fn apply_leaves_unspecified_fields_unchanged(stored_item: StockItem) {
    let mut updated = stored_item.clone();
    updated.apply(StockPatch {
        quantity: Some(Quantity::new(7.0).expect("valid")),
        ..StockPatch::default()
    });

    assert_eq!(updated.quantity.value(), 7.0);
    assert_eq!(updated.name, stored_item.name);
    assert_eq!(updated.category, stored_item.category);
    assert_eq!(updated.unit, stored_item.unit);
    assert_eq!(updated.expiration_date, stored_item.expiration_date);
    assert_eq!(updated.added_date, stored_item.added_date);
    assert_eq!(updated.notes, stored_item.notes);
    assert_eq!(updated.user, stored_item.user);
    assert_eq!(updated.image, stored_item.image);
}

#[rstest]
fn empty_patch_changes_nothing(stored_item: StockItem) {
    let patch = StockPatch::default();
    assert!(patch.is_empty());
    let mut updated = stored_item.clone();
    updated.apply(patch);
    assert_eq!(updated, stored_item);
}

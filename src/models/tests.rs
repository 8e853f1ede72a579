#![allow(clippy::unwrap_used)]

use super::*;

fn make_expense(amount: f64) -> ExpenseEntry {
    ExpenseEntry {
        id: "e1".into(),
        amount,
        category_id: "food".into(),
        created_at: 0,
    }
}

// ── ExpenseEntry ──────────────────────────────────────────────

#[test]
fn test_expense_new_assigns_uuid() {
    let a = ExpenseEntry::new(12.5, "food".into(), 1_700_000_000_000);
    let b = ExpenseEntry::new(12.5, "food".into(), 1_700_000_000_000);
    assert_eq!(a.id.len(), 36);
    assert_ne!(a.id, b.id);
    assert_eq!(a.amount, 12.5);
    assert_eq!(a.category_id, "food");
    assert_eq!(a.created_at, 1_700_000_000_000);
}

#[test]
fn test_valid_amounts() {
    assert!(make_expense(42.99).has_valid_amount());
    assert!(make_expense(0.01).has_valid_amount());
    // Zero is a caller mistake but harmless to sums
    assert!(make_expense(0.0).has_valid_amount());
}

#[test]
fn test_malformed_amounts() {
    assert!(!make_expense(-1.0).has_valid_amount());
    assert!(!make_expense(f64::NAN).has_valid_amount());
    assert!(!make_expense(f64::INFINITY).has_valid_amount());
    assert!(!make_expense(f64::NEG_INFINITY).has_valid_amount());
}

// ── Category ──────────────────────────────────────────────────

#[test]
fn test_category_new() {
    let cat = Category::new("Food".into(), "restaurant".into(), DEFAULT_COLOR);
    assert_eq!(cat.id.len(), 36);
    assert_eq!(cat.name, "Food");
    assert_eq!(cat.icon_name, "restaurant");
    assert_eq!(cat.color_value, DEFAULT_COLOR);
}

#[test]
fn test_category_display() {
    let cat = Category::new("Groceries".into(), DEFAULT_ICON.into(), DEFAULT_COLOR);
    assert_eq!(format!("{cat}"), "Groceries");
}

#[test]
fn test_find_by_name_case_insensitive() {
    let cats = vec![
        Category::new("Food".into(), "restaurant".into(), DEFAULT_COLOR),
        Category::new("Bills".into(), "receipt".into(), DEFAULT_COLOR),
    ];
    assert_eq!(Category::find_by_name(&cats, "bills").unwrap().name, "Bills");
    assert_eq!(Category::find_by_name(&cats, "FOOD").unwrap().name, "Food");
    assert!(Category::find_by_name(&cats, "Travel").is_none());
}

#[test]
fn test_find_by_id() {
    let cats = vec![Category::new("Food".into(), "restaurant".into(), DEFAULT_COLOR)];
    let id = cats[0].id.clone();
    assert_eq!(Category::find_by_id(&cats, &id).unwrap().name, "Food");
    assert!(Category::find_by_id(&cats, "missing").is_none());
}

// ── Colors ────────────────────────────────────────────────────

#[test]
fn test_default_color_is_indigo() {
    assert_eq!(rgb_of(DEFAULT_COLOR), (0x3F, 0x51, 0xB5));
    // Opaque ARGB has the sign bit set when stored as i32
    assert!(DEFAULT_COLOR < 0);
}

#[test]
fn test_hex_color_roundtrip() {
    let color = parse_hex_color("#E91E63").unwrap();
    let cat = Category::new("Health".into(), "heart".into(), color);
    assert_eq!(cat.hex_color(), "#E91E63");
    assert_eq!(cat.rgb(), (0xE9, 0x1E, 0x63));
}

#[test]
fn test_parse_hex_color_without_hash() {
    assert_eq!(parse_hex_color("3f51b5"), Some(DEFAULT_COLOR));
}

#[test]
fn test_parse_hex_color_rejects_garbage() {
    assert!(parse_hex_color("").is_none());
    assert!(parse_hex_color("#FFF").is_none());
    assert!(parse_hex_color("#GGGGGG").is_none());
    assert!(parse_hex_color("#3F51B5AA").is_none());
}

#[test]
fn test_palette_and_defaults() {
    assert_eq!(PALETTE.len(), 10);
    assert_eq!(PALETTE[0], DEFAULT_COLOR);
    let names: Vec<&str> = DEFAULT_CATEGORIES.iter().map(|(n, _, _)| *n).collect();
    assert_eq!(
        names,
        vec!["Food", "Transports", "Bills", "Health", "Entertainment"]
    );
}

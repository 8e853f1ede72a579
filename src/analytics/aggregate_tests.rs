#![allow(clippy::unwrap_used)]

use chrono::{TimeZone, Utc, Weekday};

use super::*;
use crate::models::{parse_hex_color, Category, ExpenseEntry};

fn cal() -> Calendar<Utc> {
    Calendar::new(Utc, Weekday::Mon)
}

fn ms(y: i32, m: u32, d: u32) -> i64 {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0)
        .unwrap()
        .timestamp_millis()
}

fn category(id: &str, name: &str, color: &str) -> Category {
    Category {
        id: id.into(),
        name: name.into(),
        icon_name: "receipt".into(),
        color_value: parse_hex_color(color).unwrap(),
    }
}

fn catalog() -> Vec<Category> {
    vec![
        category("food", "Food", "#3F51B5"),
        category("transport", "Transports", "#7986CB"),
        category("bills", "Bills", "#303F9F"),
    ]
}

fn expense(id: &str, amount: f64, category_id: &str, created_at: i64) -> ExpenseEntry {
    ExpenseEntry {
        id: id.into(),
        amount,
        category_id: category_id.into(),
        created_at,
    }
}

fn names(agg: &Aggregation) -> Vec<&str> {
    agg.breakdown
        .iter()
        .map(|b| b.category.name.as_str())
        .collect()
}

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{a} != {b}");
}

// ── Scenarios ─────────────────────────────────────────────────

#[test]
fn test_single_month_two_categories() {
    // Newest first, as the store hands them out
    let expenses = vec![
        expense("e3", 100.0, "transport", ms(2024, 5, 20)),
        expense("e2", 50.0, "food", ms(2024, 5, 15)),
        expense("e1", 50.0, "food", ms(2024, 5, 1)),
    ];
    let window = resolve_window(
        Selector::Preset(Preset::ThisMonth),
        &Utc.with_ymd_and_hms(2024, 5, 25, 9, 0, 0).unwrap(),
        &cal(),
    );
    let filtered = filter_by_window(&expenses, &window, &cal());
    let agg = aggregate(&filtered, &catalog(), &cal());

    assert_close(agg.total, 200.0);
    assert_eq!(agg.entry_count, 3);
    assert_eq!(names(&agg), vec!["Transports", "Food"]);
    assert_close(agg.breakdown[0].amount, 100.0);
    assert_close(agg.breakdown[0].percentage, 50.0);
    assert_close(agg.breakdown[1].amount, 100.0);
    assert_close(agg.breakdown[1].percentage, 50.0);
    assert_close(agg.average_per_month, 200.0);
    assert!(agg.warnings.is_empty());
}

#[test]
fn test_orphaned_category_counts_in_total_not_breakdown() {
    let expenses = vec![
        expense("e1", 30.0, "food", ms(2024, 5, 1)),
        expense("e2", 20.0, "deleted", ms(2024, 5, 2)),
    ];
    let agg = aggregate(&expenses, &catalog(), &cal());

    assert_close(agg.total, 50.0);
    assert_eq!(names(&agg), vec!["Food"]);
    assert_close(agg.breakdown[0].percentage, 60.0);
    assert_close(agg.unattributed, 20.0);
    assert_close(agg.per_category["deleted"], 20.0);
    assert_eq!(agg.chart.len(), 1);
    assert_eq!(
        agg.warnings,
        vec![DataQualityWarning::OrphanedCategory {
            category_id: "deleted".into(),
            amount: 20.0,
        }]
    );
}

#[test]
fn test_orphan_warning_reported_once_per_category() {
    let expenses = vec![
        expense("e1", 5.0, "gone", ms(2024, 5, 1)),
        expense("e2", 7.0, "gone", ms(2024, 5, 2)),
    ];
    let agg = aggregate(&expenses, &catalog(), &cal());
    assert_eq!(agg.warnings.len(), 1);
    assert!(agg.breakdown.is_empty());
    assert_close(agg.unattributed, 12.0);
}

// ── Totals and breakdown ──────────────────────────────────────

#[test]
fn test_empty_input_is_all_zero() {
    let agg = aggregate(&[], &catalog(), &cal());
    assert!(agg.is_empty());
    assert_eq!(agg.total, 0.0);
    assert_eq!(agg.average_per_month, 0.0);
    assert!(agg.breakdown.is_empty());
    assert!(agg.chart.is_empty());
    assert!(agg.per_category.is_empty());
}

#[test]
fn test_categories_without_expenses_are_omitted() {
    let expenses = vec![expense("e1", 10.0, "bills", ms(2024, 5, 1))];
    let agg = aggregate(&expenses, &catalog(), &cal());
    assert_eq!(agg.per_category.len(), 1);
    assert_eq!(names(&agg), vec!["Bills"]);
}

#[test]
fn test_breakdown_sorted_descending() {
    let expenses = vec![
        expense("e1", 5.0, "food", ms(2024, 5, 1)),
        expense("e2", 40.0, "bills", ms(2024, 5, 2)),
        expense("e3", 12.5, "transport", ms(2024, 5, 3)),
        expense("e4", 1.5, "food", ms(2024, 5, 4)),
    ];
    let agg = aggregate(&expenses, &catalog(), &cal());
    assert_eq!(names(&agg), vec!["Bills", "Transports", "Food"]);
    for pair in agg.breakdown.windows(2) {
        assert!(pair[0].amount >= pair[1].amount);
    }
}

#[test]
fn test_tie_goes_to_most_recent_category_regardless_of_input_order() {
    let forward = vec![
        expense("e1", 10.0, "bills", ms(2024, 5, 1)),
        expense("e2", 10.0, "food", ms(2024, 5, 9)),
    ];
    let mut backward = forward.clone();
    backward.reverse();

    let a = aggregate(&forward, &catalog(), &cal());
    let b = aggregate(&backward, &catalog(), &cal());
    assert_eq!(names(&a), vec!["Food", "Bills"]);
    assert_eq!(names(&b), vec!["Food", "Bills"]);
}

#[test]
fn test_full_tie_falls_back_to_category_id() {
    let expenses = vec![
        expense("e1", 10.0, "transport", ms(2024, 5, 1)),
        expense("e2", 10.0, "bills", ms(2024, 5, 1)),
    ];
    let agg = aggregate(&expenses, &catalog(), &cal());
    assert_eq!(names(&agg), vec!["Bills", "Transports"]);
}

#[test]
fn test_breakdown_sums_to_total_and_hundred_percent() {
    let amounts = [19.99, 0.01, 7.5, 1234.56, 3.33, 3.33, 3.34, 88.0];
    let cats = ["food", "transport", "bills"];
    let expenses: Vec<ExpenseEntry> = amounts
        .iter()
        .enumerate()
        .map(|(i, a)| expense(&format!("e{i}"), *a, cats[i % 3], ms(2024, 5, 1 + i as u32)))
        .collect();
    let agg = aggregate(&expenses, &catalog(), &cal());

    let expected: f64 = amounts.iter().sum();
    assert_close(agg.total, expected);
    let amount_sum: f64 = agg.breakdown.iter().map(|b| b.amount).sum();
    assert_close(amount_sum + agg.unattributed, agg.total);
    let pct_sum: f64 = agg.breakdown.iter().map(|b| b.percentage).sum();
    assert!((99.999..=100.001).contains(&pct_sum), "{pct_sum}");
}

#[test]
fn test_zero_total_gives_zero_percentages() {
    let expenses = vec![expense("e1", 0.0, "food", ms(2024, 5, 1))];
    let agg = aggregate(&expenses, &catalog(), &cal());
    assert_eq!(agg.breakdown.len(), 1);
    assert_eq!(agg.breakdown[0].percentage, 0.0);
}

// ── Malformed amounts ─────────────────────────────────────────

#[test]
fn test_malformed_amounts_are_excluded() {
    let expenses = vec![
        expense("good", 25.0, "food", ms(2024, 5, 1)),
        expense("nan", f64::NAN, "food", ms(2024, 5, 2)),
        expense("neg", -10.0, "bills", ms(2024, 6, 2)),
        expense("inf", f64::INFINITY, "transport", ms(2024, 7, 2)),
    ];
    let agg = aggregate(&expenses, &catalog(), &cal());

    assert_close(agg.total, 25.0);
    assert_eq!(agg.entry_count, 1);
    assert_eq!(names(&agg), vec!["Food"]);
    // Only May has a valid expense
    assert_close(agg.average_per_month, 25.0);
    assert_eq!(agg.warnings.len(), 3);
    assert!(agg
        .warnings
        .iter()
        .all(|w| matches!(w, DataQualityWarning::MalformedAmount { .. })));
}

// ── Monthly average ───────────────────────────────────────────

#[test]
fn test_average_divides_by_active_months() {
    // A short range that straddles two months divides by two
    let expenses = vec![
        expense("e1", 60.0, "food", ms(2024, 5, 28)),
        expense("e2", 40.0, "food", ms(2024, 6, 3)),
    ];
    let agg = aggregate(&expenses, &catalog(), &cal());
    assert_close(agg.average_per_month, 50.0);
}

#[test]
fn test_average_skips_months_without_expenses() {
    let expenses = vec![
        expense("e1", 90.0, "food", ms(2024, 1, 10)),
        expense("e2", 30.0, "bills", ms(2024, 4, 10)),
        expense("e3", 30.0, "bills", ms(2024, 4, 11)),
    ];
    let agg = aggregate(&expenses, &catalog(), &cal());
    assert_close(agg.average_per_month, 75.0);
}

#[test]
fn test_same_month_different_years_are_distinct() {
    let expenses = vec![
        expense("e1", 10.0, "food", ms(2023, 5, 10)),
        expense("e2", 10.0, "food", ms(2024, 5, 10)),
    ];
    let agg = aggregate(&expenses, &catalog(), &cal());
    assert_close(agg.average_per_month, 10.0);
}

// ── Chart ─────────────────────────────────────────────────────

#[test]
fn test_chart_matches_breakdown_order_and_colors() {
    let expenses = vec![
        expense("e1", 5.0, "food", ms(2024, 5, 1)),
        expense("e2", 50.0, "transport", ms(2024, 5, 2)),
    ];
    let agg = aggregate(&expenses, &catalog(), &cal());
    let labels: Vec<&str> = agg.chart.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["Transports", "Food"]);
    assert_eq!(agg.chart[0].value, 50.0);
    assert_eq!(agg.chart[0].color, parse_hex_color("#7986CB").unwrap());
}

// ── Purity ────────────────────────────────────────────────────

#[test]
fn test_repeated_calls_are_identical() {
    let expenses = vec![
        expense("e1", 12.34, "food", ms(2024, 5, 1)),
        expense("e2", 56.78, "transport", ms(2024, 5, 12)),
        expense("e3", 9.1, "missing", ms(2024, 4, 30)),
    ];
    let reference = Utc.with_ymd_and_hms(2024, 5, 20, 8, 0, 0).unwrap();
    let selector = Selector::Preset(Preset::Last90Days);

    let a = summarize(selector, &reference, &cal(), &catalog(), &expenses);
    let b = summarize(selector, &reference, &cal(), &catalog(), &expenses);
    assert_eq!(a, b);
    assert_eq!(a.aggregation.total.to_bits(), b.aggregation.total.to_bits());
    assert_eq!(a.expenses.len(), 3);
}

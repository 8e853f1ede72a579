#![allow(clippy::unwrap_used)]

use chrono::{NaiveDate, TimeZone, Utc, Weekday};

use super::*;
use crate::models::DEFAULT_COLOR;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ── Argument parsing ──────────────────────────────────────────

#[test]
fn test_selector_defaults_to_config() {
    let config = Config {
        default_filter: "last-month".into(),
        ..Config::default()
    };
    assert_eq!(
        parse_selector(&[], &config).unwrap(),
        Selector::Preset(Preset::LastMonth)
    );
}

#[test]
fn test_selector_from_filter_flag() {
    let sel = parse_selector(&args(&["--filter", "90d"]), &Config::default()).unwrap();
    assert_eq!(sel, Selector::Preset(Preset::Last90Days));
    assert!(parse_selector(&args(&["--filter", "fortnight"]), &Config::default()).is_err());
}

#[test]
fn test_selector_all_is_unbounded() {
    let sel = parse_selector(&args(&["--filter", "all"]), &Config::default()).unwrap();
    assert_eq!(sel, Selector::All);
    let config = Config {
        default_filter: "all".into(),
        ..Config::default()
    };
    assert_eq!(parse_selector(&[], &config).unwrap(), Selector::All);
}

#[test]
fn test_summary_includes_future_expense_under_all() {
    let (cats, mut expenses, cal) = fixture();
    expenses.push(ExpenseEntry::new(5.0, cats[0].id.clone(), cal.start_of(day(2024, 4, 2))));
    let reference = Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap();
    let selector = parse_selector(&args(&["--filter", "all"]), &Config::default()).unwrap();
    let summary = summarize(selector, &reference, &cal, &cats, &expenses);
    let report = summary_report(&summary, &cal, "$");
    assert!(report.starts_with("ExpenseTUI: All Expenses\n"));
    assert!(report.contains("Entries:       4"));
    assert!(report.contains("Total:         $1,245.00"));
}

#[test]
fn test_selector_range_wins_over_filter() {
    let sel = parse_selector(
        &args(&["--filter", "all", "--from", "2024-01-01", "--to", "2024-01-31"]),
        &Config::default(),
    )
    .unwrap();
    assert_eq!(
        sel,
        Selector::Range {
            start: day(2024, 1, 1),
            end: day(2024, 1, 31)
        }
    );
}

#[test]
fn test_selector_half_range_rejected() {
    assert!(parse_selector(&args(&["--from", "2024-01-01"]), &Config::default()).is_err());
    assert!(parse_selector(&args(&["--to", "2024-01-01"]), &Config::default()).is_err());
    assert!(parse_selector(
        &args(&["--from", "yesterday", "--to", "2024-01-01"]),
        &Config::default()
    )
    .is_err());
}

#[test]
fn test_positionals_skip_flag_values() {
    let a = args(&["12.50", "Eating", "Out", "--date", "2024-03-01"]);
    assert_eq!(positionals(&a), vec!["12.50", "Eating", "Out"]);
    assert_eq!(flag_value(&a, "--date"), Some("2024-03-01"));
    assert_eq!(flag_value(&a, "--filter"), None);
}

// ── Reports ───────────────────────────────────────────────────

fn fixture() -> (Vec<Category>, Vec<ExpenseEntry>, Calendar<Utc>) {
    let food = Category::new("Food".into(), "restaurant".into(), DEFAULT_COLOR);
    let bus = Category::new("Transports".into(), "bus".into(), DEFAULT_COLOR);
    let cal = Calendar::new(Utc, Weekday::Mon);
    let at = |d: u32| cal.start_of(day(2024, 3, d));
    let expenses = vec![
        ExpenseEntry::new(30.0, food.id.clone(), at(10)),
        ExpenseEntry::new(10.0, bus.id.clone(), at(5)),
        ExpenseEntry::new(1_200.0, "gone".into(), at(2)),
    ];
    (vec![food, bus], expenses, cal)
}

#[test]
fn test_summary_report_contents() {
    let (cats, expenses, cal) = fixture();
    let reference = Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap();
    let summary = summarize(
        Selector::Preset(Preset::ThisMonth),
        &reference,
        &cal,
        &cats,
        &expenses,
    );
    let report = summary_report(&summary, &cal, "$");

    assert!(report.starts_with("ExpenseTUI: This Month (2024-03-01 to 2024-03-31)"));
    assert!(report.contains("Total:         $1,240.00"));
    assert!(report.contains("Entries:       3"));
    assert!(report.contains("Uncategorized: $1,200.00"));
    let food_line = report.lines().position(|l| l.contains("Food")).unwrap();
    let bus_line = report.lines().position(|l| l.contains("Transports")).unwrap();
    assert!(food_line < bus_line);
    assert!(!report.contains("gone"));
}

#[test]
fn test_summary_report_reversed_range() {
    let (cats, expenses, cal) = fixture();
    let reference = Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap();
    let selector = Selector::Range {
        start: day(2024, 3, 31),
        end: day(2024, 3, 1),
    };
    let summary = summarize(selector, &reference, &cal, &cats, &expenses);
    let report = summary_report(&summary, &cal, "$");
    assert!(report.contains("nothing matches"));
    assert!(report.contains("Total:         $0.00"));
    assert!(!report.contains("Spending by Category"));
}

#[test]
fn test_expense_table_rows() {
    let (cats, expenses, cal) = fixture();
    let table = expense_table(&expenses, &cats, &cal, "€");
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines.len(), 2 + expenses.len());
    assert!(lines[2].starts_with("2024-03-10"));
    assert!(lines[2].contains("Food"));
    assert!(lines[2].ends_with("€30.00"));
    assert!(lines[4].contains("? Unknown"));
}

use std::collections::{BTreeMap, BTreeSet};

use chrono::TimeZone;

use super::window::Calendar;
use crate::models::{Category, ColorValue, ExpenseEntry};

/// One category's share of the spend.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BreakdownItem {
    pub(crate) category: Category,
    pub(crate) amount: f64,
    /// 0–100; zero when the total is zero.
    pub(crate) percentage: f64,
}

/// A slice of the proportional chart, in breakdown order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ChartSlice {
    pub(crate) label: String,
    pub(crate) value: f64,
    pub(crate) color: ColorValue,
}

/// Bad records met while aggregating. They never abort the computation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DataQualityWarning {
    /// NaN, infinite or negative amount; the expense was left out entirely.
    MalformedAmount { expense_id: String, amount: f64 },
    /// Expenses pointing at a category that does not exist. Their amount is
    /// in the total but not in the breakdown.
    OrphanedCategory { category_id: String, amount: f64 },
}

impl std::fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedAmount { expense_id, amount } => {
                write!(f, "expense {expense_id} has malformed amount {amount}")
            }
            Self::OrphanedCategory {
                category_id,
                amount,
            } => write!(
                f,
                "{amount:.2} spent in unknown category {category_id}"
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Aggregation {
    pub(crate) total: f64,
    /// Expenses that made it into the total.
    pub(crate) entry_count: usize,
    /// Sum per category id, only for ids that occur. Includes orphaned ids.
    pub(crate) per_category: BTreeMap<String, f64>,
    /// Descending by amount. Ties go to the category with the most recent
    /// expense, then to the lower category id.
    pub(crate) breakdown: Vec<BreakdownItem>,
    /// Part of `total` that belongs to no known category.
    pub(crate) unattributed: f64,
    /// `total` divided by the number of distinct (year, month) pairs the
    /// expenses fall in. This is a per-active-month figure, not a
    /// 30-day-normalized one.
    pub(crate) average_per_month: f64,
    pub(crate) chart: Vec<ChartSlice>,
    pub(crate) warnings: Vec<DataQualityWarning>,
}

impl Aggregation {
    pub(crate) fn is_empty(&self) -> bool {
        self.entry_count == 0
    }
}

pub(crate) fn aggregate<Tz: TimeZone>(
    expenses: &[ExpenseEntry],
    categories: &[Category],
    calendar: &Calendar<Tz>,
) -> Aggregation {
    let mut warnings = Vec::new();
    let mut total = 0.0;
    let mut entry_count = 0;
    let mut per_category: BTreeMap<String, f64> = BTreeMap::new();
    let mut latest: BTreeMap<&str, i64> = BTreeMap::new();
    let mut months: BTreeSet<(i32, u32)> = BTreeSet::new();

    for expense in expenses {
        if !expense.has_valid_amount() {
            tracing::warn!(
                expense_id = %expense.id,
                amount = expense.amount,
                "malformed amount left out of aggregation"
            );
            warnings.push(DataQualityWarning::MalformedAmount {
                expense_id: expense.id.clone(),
                amount: expense.amount,
            });
            continue;
        }
        total += expense.amount;
        entry_count += 1;
        *per_category
            .entry(expense.category_id.clone())
            .or_insert(0.0) += expense.amount;
        latest
            .entry(expense.category_id.as_str())
            .and_modify(|t| *t = (*t).max(expense.created_at))
            .or_insert(expense.created_at);
        if let Some(month) = calendar.year_month(expense.created_at) {
            months.insert(month);
        }
    }

    let mut breakdown = Vec::with_capacity(per_category.len());
    let mut unattributed = 0.0;
    for (category_id, &amount) in &per_category {
        match Category::find_by_id(categories, category_id) {
            Some(category) => breakdown.push(BreakdownItem {
                category: category.clone(),
                amount,
                percentage: percentage(amount, total),
            }),
            None => {
                tracing::warn!(%category_id, amount, "expenses reference a missing category");
                unattributed += amount;
                warnings.push(DataQualityWarning::OrphanedCategory {
                    category_id: category_id.clone(),
                    amount,
                });
            }
        }
    }
    let last_seen = |id: &str| latest.get(id).copied().unwrap_or(i64::MIN);
    breakdown.sort_by(|a, b| {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| last_seen(&b.category.id).cmp(&last_seen(&a.category.id)))
            .then_with(|| a.category.id.cmp(&b.category.id))
    });

    let average_per_month = if months.is_empty() {
        0.0
    } else {
        total / months.len() as f64
    };

    let chart = breakdown
        .iter()
        .map(|item| ChartSlice {
            label: item.category.name.clone(),
            value: item.amount,
            color: item.category.color_value,
        })
        .collect();

    Aggregation {
        total,
        entry_count,
        per_category,
        breakdown,
        unattributed,
        average_per_month,
        chart,
        warnings,
    }
}

fn percentage(amount: f64, total: f64) -> f64 {
    if total > 0.0 {
        amount / total * 100.0
    } else {
        0.0
    }
}

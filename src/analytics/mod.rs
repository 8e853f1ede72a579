//! Filtering and aggregation of expense snapshots.
//!
//! Everything here is pure: the same inputs always give the same output, and
//! nothing is shared between calls, so callers can run it from any thread on
//! a snapshot read from the store.

mod aggregate;
mod filter;
mod window;

pub(crate) use aggregate::{aggregate, Aggregation, BreakdownItem, ChartSlice, DataQualityWarning};
pub(crate) use filter::filter_by_window;
pub(crate) use window::{month_bounds, resolve_window, Calendar, Preset, Selector, Window};

use chrono::{DateTime, TimeZone};

use crate::models::{Category, ExpenseEntry};

/// Output of the whole resolve → filter → aggregate pipeline.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Summary {
    pub(crate) selector: Selector,
    pub(crate) window: Window,
    pub(crate) expenses: Vec<ExpenseEntry>,
    pub(crate) aggregation: Aggregation,
}

pub(crate) fn summarize<Tz: TimeZone>(
    selector: Selector,
    reference: &DateTime<Tz>,
    calendar: &Calendar<Tz>,
    categories: &[Category],
    expenses: &[ExpenseEntry],
) -> Summary {
    let window = resolve_window(selector, reference, calendar);
    let filtered = filter_by_window(expenses, &window, calendar);
    let aggregation = aggregate(&filtered, categories, calendar);
    tracing::debug!(
        %selector,
        start = window.start,
        end = window.end,
        entries = aggregation.entry_count,
        total = aggregation.total,
        "summarized expenses"
    );
    Summary {
        selector,
        window,
        expenses: filtered,
        aggregation,
    }
}



#[cfg(test)]
#[path = "aggregate_tests.rs"]
mod aggregate_tests;

use chrono::TimeZone;

use super::window::{Calendar, Window};
use crate::models::ExpenseEntry;

/// Keep the expenses whose local day falls inside `window`.
///
/// Each `created_at` is truncated to its local day start before the
/// comparison, so an expense logged late in the evening of a boundary day is
/// still in. Input order is preserved. A malformed window (start after end)
/// keeps nothing.
pub(crate) fn filter_by_window<Tz: TimeZone>(
    expenses: &[ExpenseEntry],
    window: &Window,
    calendar: &Calendar<Tz>,
) -> Vec<ExpenseEntry> {
    if window.is_malformed() {
        tracing::warn!(
            start = window.start,
            end = window.end,
            "malformed window, filtering to empty"
        );
        return Vec::new();
    }

    expenses
        .iter()
        .filter(|e| match calendar.day_start(e.created_at) {
            Some(day) => window.contains(day),
            None => {
                tracing::warn!(
                    expense_id = %e.id,
                    created_at = e.created_at,
                    "expense date out of range, skipped"
                );
                false
            }
        })
        .cloned()
        .collect()
}

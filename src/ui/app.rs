use anyhow::Result;
use chrono::{DateTime, Datelike, Local, NaiveDate};
use std::collections::HashMap;

use crate::analytics::{month_bounds, summarize, Calendar, Preset, Selector, Summary};
use crate::config::Config;
use crate::db::Database;
use crate::models::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Expenses,
    Analytics,
    Categories,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Expenses, Self::Analytics, Self::Categories]
    }

    pub(crate) fn next(self) -> Self {
        match self {
            Self::Expenses => Self::Analytics,
            Self::Analytics => Self::Categories,
            Self::Categories => Self::Expenses,
        }
    }

    pub(crate) fn prev(self) -> Self {
        match self {
            Self::Expenses => Self::Categories,
            Self::Analytics => Self::Expenses,
            Self::Categories => Self::Analytics,
        }
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Expenses => write!(f, "Expenses"),
            Self::Analytics => write!(f, "Analytics"),
            Self::Categories => write!(f, "Categories"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Editing,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Editing => write!(f, "EDIT"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone)]
pub(crate) enum PendingAction {
    DeleteExpense { expense: ExpenseEntry, label: String },
    DeleteCategory { category: Category },
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) currency: String,
    pub(crate) calendar: Calendar<Local>,
    pub(crate) today: NaiveDate,

    // Store snapshots
    pub(crate) categories: Vec<Category>,
    pub(crate) expenses: Vec<ExpenseEntry>,
    pub(crate) expense_counts: HashMap<String, i64>,

    // Expenses
    pub(crate) preset: Preset,
    pub(crate) expenses_view: Summary,
    pub(crate) expense_index: usize,
    pub(crate) expense_scroll: usize,

    // Analytics
    pub(crate) analytics_range: Option<(NaiveDate, NaiveDate)>,
    pub(crate) analytics_view: Summary,
    pub(crate) breakdown_index: usize,
    pub(crate) breakdown_scroll: usize,

    // Categories
    pub(crate) category_index: usize,
    pub(crate) category_scroll: usize,
    /// Id of the category being renamed in `InputMode::Editing`.
    pub(crate) editing_category: Option<String>,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(config: &Config) -> Self {
        let calendar = Calendar::local(config.week_start());
        let now = Local::now();
        let preset = config.default_preset();
        let empty = |selector| summarize(selector, &now, &calendar, &[], &[]);
        let expenses_view = empty(Selector::Preset(preset));
        let analytics_view = empty(Selector::All);

        Self {
            running: true,
            screen: Screen::Expenses,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,
            currency: config.currency_symbol().to_string(),
            today: now.date_naive(),

            categories: Vec::new(),
            expenses: Vec::new(),
            expense_counts: HashMap::new(),

            preset,
            expenses_view,
            expense_index: 0,
            expense_scroll: 0,

            analytics_range: None,
            analytics_view,
            breakdown_index: 0,
            breakdown_scroll: 0,

            category_index: 0,
            category_scroll: 0,
            editing_category: None,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
            calendar,
        }
    }

    /// Re-read every snapshot from the store and rebuild the derived views.
    pub(crate) fn refresh_all(&mut self, db: &Database) -> Result<()> {
        self.categories = db.categories()?;
        self.expenses = db.expenses()?;
        self.expense_counts = db.expense_counts()?;
        self.recompute();
        Ok(())
    }

    pub(crate) fn recompute(&mut self) {
        self.recompute_at(Local::now());
    }

    pub(crate) fn recompute_at(&mut self, now: DateTime<Local>) {
        self.today = now.date_naive();
        self.expenses_view = summarize(
            Selector::Preset(self.preset),
            &now,
            &self.calendar,
            &self.categories,
            &self.expenses,
        );
        self.analytics_view = summarize(
            self.analytics_selector(),
            &now,
            &self.calendar,
            &self.categories,
            &self.expenses,
        );
        self.clamp_cursors();
    }

    /// Presets are relative to today, so crossing midnight needs a rebuild.
    /// Returns whether anything was recomputed.
    pub(crate) fn tick(&mut self, now: DateTime<Local>) -> bool {
        if now.date_naive() == self.today {
            return false;
        }
        self.recompute_at(now);
        true
    }

    fn clamp_cursors(&mut self) {
        use crate::ui::util::clamp_cursor;
        clamp_cursor(
            &mut self.expense_index,
            &mut self.expense_scroll,
            self.expenses_view.expenses.len(),
        );
        clamp_cursor(
            &mut self.breakdown_index,
            &mut self.breakdown_scroll,
            self.analytics_view.aggregation.breakdown.len(),
        );
        clamp_cursor(
            &mut self.category_index,
            &mut self.category_scroll,
            self.categories.len(),
        );
    }

    // ── Expenses filter ──────────────────────────────────────

    pub(crate) fn set_preset(&mut self, preset: Preset) {
        self.preset = preset;
        self.expense_index = 0;
        self.expense_scroll = 0;
        self.recompute();
        self.set_status(format!("Filter: {preset}"));
    }

    // ── Analytics range ──────────────────────────────────────

    /// No range means every expense on record, future-dated ones included.
    pub(crate) fn analytics_selector(&self) -> Selector {
        match self.analytics_range {
            Some((start, end)) => Selector::Range { start, end },
            None => Selector::All,
        }
    }

    pub(crate) fn set_analytics_range(&mut self, range: Option<(NaiveDate, NaiveDate)>) {
        self.analytics_range = range;
        self.breakdown_index = 0;
        self.breakdown_scroll = 0;
        self.recompute();
    }

    /// Off → the current month; on → off.
    pub(crate) fn toggle_analytics_range(&mut self) {
        let range = match self.analytics_range {
            Some(_) => None,
            None => Some(month_bounds(self.today.year(), self.today.month())),
        };
        self.set_analytics_range(range);
        match self.analytics_range {
            Some((start, end)) => self.set_status(format!("Range: {start} → {end}")),
            None => self.set_status("Range cleared, showing all time"),
        }
    }

    // ── Lookups ──────────────────────────────────────────────

    pub(crate) fn category_of(&self, category_id: &str) -> Option<&Category> {
        Category::find_by_id(&self.categories, category_id)
    }

    pub(crate) fn selected_expense(&self) -> Option<&ExpenseEntry> {
        self.expenses_view.expenses.get(self.expense_index)
    }

    pub(crate) fn selected_category(&self) -> Option<&Category> {
        self.categories.get(self.category_index)
    }

    pub(crate) fn expense_count_for(&self, category_id: &str) -> i64 {
        self.expense_counts.get(category_id).copied().unwrap_or(0)
    }

    // ── Page sizes (rows left after each screen's fixed chrome) ──

    pub(crate) fn expense_page(&self) -> usize {
        self.visible_rows.saturating_sub(11).max(1)
    }

    pub(crate) fn breakdown_page(&self) -> usize {
        self.visible_rows.saturating_sub(8).max(1)
    }

    pub(crate) fn category_page(&self) -> usize {
        self.visible_rows.saturating_sub(3).max(1)
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}

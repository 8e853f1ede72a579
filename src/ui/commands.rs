use std::collections::HashMap;
use std::sync::LazyLock;

use super::app::{App, InputMode, PendingAction, Screen};
use crate::analytics::Preset;
use crate::db::Database;
use crate::error::StoreError;
use crate::icons;
use crate::models::{Category, ExpenseEntry, DEFAULT_COLOR, DEFAULT_ICON};
use crate::validate;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Database) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit ExpenseTUI", cmd_quit, r);
    register_command!("quit", "Quit ExpenseTUI", cmd_quit, r);
    register_command!("e", "Go to Expenses", cmd_expenses, r);
    register_command!("expenses", "Go to Expenses", cmd_expenses, r);
    register_command!("a", "Go to Analytics", cmd_analytics, r);
    register_command!("analytics", "Go to Analytics", cmd_analytics, r);
    register_command!("c", "Go to Categories", cmd_categories, r);
    register_command!("categories", "Go to Categories", cmd_categories, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!(
        "filter",
        "Set expense filter (e.g. :filter last-month)",
        cmd_filter,
        r
    );
    register_command!("f", "Set expense filter (e.g. :f week)", cmd_filter, r);
    register_command!(
        "add",
        "Add expense (e.g. :add 12.50 Food 2024-03-01)",
        cmd_add,
        r
    );
    register_command!(
        "range",
        "Analytics range (e.g. :range 2024-01-01 2024-03-31, :range off)",
        cmd_range,
        r
    );
    register_command!(
        "category",
        "Create category (e.g. :category Travel flight 7)",
        cmd_category,
        r
    );
    register_command!(
        "rename",
        "Rename selected category (e.g. :rename Groceries)",
        cmd_rename,
        r
    );
    register_command!(
        "icon",
        "Set icon of selected category (e.g. :icon shopping_cart)",
        cmd_icon,
        r
    );
    register_command!("icons", "List available icons", cmd_icons, r);
    register_command!(
        "color",
        "Set color of selected category (e.g. :color 4 or :color #E91E63)",
        cmd_color,
        r
    );
    register_command!(
        "delete-expense",
        "Delete selected expense",
        cmd_delete_expense,
        r
    );
    register_command!(
        "delete-category",
        "Delete selected category",
        cmd_delete_category,
        r
    );

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        tracing::debug!(command = cmd_name, "running command");
        (cmd.run)(args, app, db)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| (levenshtein(input, k), **k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_expenses(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Expenses;
    Ok(())
}

fn cmd_analytics(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Analytics;
    Ok(())
}

fn cmd_categories(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Categories;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_filter(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    match Preset::parse(args) {
        Some(preset) => {
            app.screen = Screen::Expenses;
            app.set_preset(preset);
        }
        None => {
            let keys: Vec<&str> = Preset::all().iter().map(|p| p.key()).collect();
            app.set_status(format!("Usage: :filter <{}>", keys.join("|")));
        }
    }
    Ok(())
}

fn cmd_add(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let mut parts = args.split_whitespace();
    let Some(amount_str) = parts.next() else {
        app.set_status("Usage: :add <amount> <category> [YYYY-MM-DD]");
        return Ok(());
    };
    let rest: Vec<&str> = parts.collect();

    // A trailing date is optional; the category name may contain spaces.
    let (name_parts, date) = match rest.split_last() {
        Some((last, init)) if !init.is_empty() && validate::parse_date(last).is_ok() => {
            (init.to_vec(), validate::parse_date(last).ok())
        }
        _ => (rest.clone(), None),
    };

    let amount = match validate::parse_amount(amount_str) {
        Ok(a) => a,
        Err(e) => {
            app.set_status(e.to_string());
            return Ok(());
        }
    };
    let category = match validate::find_category(&app.categories, &name_parts.join(" ")) {
        Ok(c) => c.clone(),
        Err(e) => {
            let names: Vec<&str> = app.categories.iter().map(|c| c.name.as_str()).collect();
            app.set_status(format!("{e}. Available: {}", names.join(", ")));
            return Ok(());
        }
    };

    let day = match validate::expense_day(date.unwrap_or(app.today), app.today) {
        Ok(d) => d,
        Err(e) => {
            app.set_status(e.to_string());
            return Ok(());
        }
    };
    let expense = ExpenseEntry::new(amount, category.id.clone(), app.calendar.start_of(day));
    db.insert_expense(&expense)?;
    app.set_status(format!(
        "Added {} to {} on {day}",
        crate::ui::util::format_amount(amount, &app.currency),
        category.name
    ));
    Ok(())
}

fn cmd_range(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Analytics;
    let parts: Vec<&str> = args.split_whitespace().collect();
    match parts.as_slice() {
        [] => app.toggle_analytics_range(),
        ["off"] | ["clear"] => {
            app.set_analytics_range(None);
            app.set_status("Range cleared, showing all time");
        }
        [from, to] => match (validate::parse_date(from), validate::parse_date(to)) {
            (Ok(start), Ok(end)) => {
                app.set_analytics_range(Some((start, end)));
                if start > end {
                    app.set_status("Range start is after its end; nothing matches");
                } else {
                    app.set_status(format!("Range: {start} → {end}"));
                }
            }
            (Err(e), _) | (_, Err(e)) => app.set_status(e.to_string()),
        },
        _ => app.set_status("Usage: :range <from> <to> | :range off"),
    }
    Ok(())
}

fn cmd_category(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    // :category <name words...> [icon] [color]
    let mut words: Vec<&str> = args.split_whitespace().collect();
    let mut color = DEFAULT_COLOR;
    let mut icon = DEFAULT_ICON;
    if words.len() > 1 {
        if let Some(Ok(c)) = words.last().map(|w| validate::parse_color(w)) {
            color = c;
            words.pop();
        }
    }
    if words.len() > 1 {
        if let Some(w) = words.last().filter(|w| icons::is_known(w)) {
            icon = icons::resolve_key(w);
            words.pop();
        }
    }

    let name = match validate::category_name(&words.join(" ")) {
        Ok(n) => n,
        Err(e) => {
            app.set_status(format!("{e}. Usage: :category <name> [icon] [color]"));
            return Ok(());
        }
    };
    if Category::find_by_name(&app.categories, &name).is_some() {
        app.set_status(format!("Category '{name}' already exists"));
        return Ok(());
    }

    let category = Category::new(name, icon.to_string(), color);
    db.insert_category(&category)?;
    app.screen = Screen::Categories;
    app.set_status(format!("Created category: {}", category.name));
    Ok(())
}

fn cmd_rename(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let Some(selected) = selected_category(app) else {
        return Ok(());
    };
    if args.is_empty() {
        app.editing_category = Some(selected.id.clone());
        app.command_input = selected.name.clone();
        app.input_mode = InputMode::Editing;
        app.set_status("Type new name, press Enter to confirm");
        return Ok(());
    }
    rename_category(&selected.id, args, app, db)
}

/// Shared by `:rename <name>` and the inline editor.
pub(crate) fn rename_category(
    category_id: &str,
    new_name: &str,
    app: &mut App,
    db: &mut Database,
) -> anyhow::Result<()> {
    let name = match validate::category_name(new_name) {
        Ok(n) => n,
        Err(e) => {
            app.set_status(e.to_string());
            return Ok(());
        }
    };
    let Some(mut category) = db.category_by_id(category_id)? else {
        app.set_status("Category no longer exists");
        return Ok(());
    };
    if let Some(other) = Category::find_by_name(&app.categories, &name) {
        if other.id != category.id {
            app.set_status(format!("Category '{name}' already exists"));
            return Ok(());
        }
    }
    category.name = name;
    if apply_category_update(&category, app, db)? {
        app.set_status(format!("Renamed to: {}", category.name));
    }
    Ok(())
}

fn cmd_icon(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let Some(mut category) = selected_category(app) else {
        return Ok(());
    };
    if !is_icon_input(args) {
        app.set_status("Unknown icon. Try :icons for the list");
        return Ok(());
    }
    category.icon_name = icons::resolve_key(args).to_string();
    if apply_category_update(&category, app, db)? {
        app.set_status(format!(
            "{} icon: {} {}",
            category.name,
            icons::glyph(&category.icon_name),
            category.icon_name
        ));
    }
    Ok(())
}

/// `resolve_key` falls back to the default icon; only accept input that
/// actually names one.
fn is_icon_input(args: &str) -> bool {
    !args.is_empty()
        && (icons::resolve_key(args) != DEFAULT_ICON
            || args.trim().eq_ignore_ascii_case(DEFAULT_ICON))
}

fn cmd_icons(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let list: Vec<String> = icons::keys()
        .map(|k| format!("{} {k}", icons::glyph(k)))
        .collect();
    app.set_status(list.join("  "));
    Ok(())
}

fn cmd_color(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let Some(mut category) = selected_category(app) else {
        return Ok(());
    };
    match validate::parse_color(args) {
        Ok(color) => {
            category.color_value = color;
            if apply_category_update(&category, app, db)? {
                app.set_status(format!("{} color: {}", category.name, category.hex_color()));
            }
        }
        Err(e) => app.set_status(e.to_string()),
    }
    Ok(())
}

fn cmd_delete_expense(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    if app.screen != Screen::Expenses {
        app.set_status("Navigate to Expenses and select one first");
        return Ok(());
    }
    let Some(expense) = app.selected_expense().cloned() else {
        app.set_status("No expense selected");
        return Ok(());
    };
    let name = app
        .category_of(&expense.category_id)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| "Unknown".into());
    let label = format!(
        "{} {name}",
        crate::ui::util::format_amount(expense.amount, &app.currency)
    );
    app.confirm_message = format!("Delete expense {label}?");
    app.pending_action = Some(PendingAction::DeleteExpense { expense, label });
    app.input_mode = InputMode::Confirm;
    Ok(())
}

fn cmd_delete_category(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let Some(category) = selected_category(app) else {
        return Ok(());
    };
    let in_use = db.count_expenses_for_category(&category.id)?;
    app.confirm_message = if in_use > 0 {
        format!(
            "Delete category '{}'? {in_use} expense(s) still use it",
            category.name
        )
    } else {
        format!("Delete category '{}'?", category.name)
    };
    app.pending_action = Some(PendingAction::DeleteCategory { category });
    app.input_mode = InputMode::Confirm;
    Ok(())
}

/// Carry out a confirmed action. Store refusals end up in the status bar.
pub(crate) fn run_pending(
    action: PendingAction,
    app: &mut App,
    db: &mut Database,
) -> anyhow::Result<()> {
    match action {
        PendingAction::DeleteExpense { expense, label } => {
            db.delete_expense(&expense)?;
            app.set_status(format!("Deleted: {label}"));
        }
        PendingAction::DeleteCategory { category } => match db.delete_category(&category) {
            Ok(()) => app.set_status(format!("Deleted category: {}", category.name)),
            Err(e @ StoreError::ReferentialIntegrity { .. }) => app.set_status(e.to_string()),
            Err(StoreError::CategoryNotFound(_)) => {
                app.set_status(format!("Category '{}' no longer exists", category.name))
            }
            Err(e) => return Err(e.into()),
        },
    }
    Ok(())
}

// ── Helpers ──────────────────────────────────────────────────

fn selected_category(app: &mut App) -> Option<Category> {
    if app.screen != Screen::Categories {
        app.set_status("Navigate to Categories and select one first");
        return None;
    }
    let found = app.selected_category().cloned();
    if found.is_none() {
        app.set_status("No category selected");
    }
    found
}

/// `Ok(false)` when the category vanished underneath us.
fn apply_category_update(
    category: &Category,
    app: &mut App,
    db: &mut Database,
) -> anyhow::Result<bool> {
    match db.update_category(category) {
        Ok(()) => Ok(true),
        Err(StoreError::CategoryNotFound(_)) => {
            app.set_status("Category no longer exists");
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

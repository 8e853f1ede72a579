use anyhow::{Context, Result};
use chrono::{Local, TimeZone};
use std::fmt::Write as _;

use crate::analytics::{summarize, Calendar, Preset, Selector, Summary};
use crate::config::{Config, Paths};
use crate::db::Database;
use crate::error::StoreError;
use crate::icons;
use crate::models::{Category, ExpenseEntry};
use crate::ui::util::{format_amount, format_day, format_percentage, progress_bar};
use crate::validate;

pub(crate) fn as_cli(
    args: &[String],
    db: &mut Database,
    config: &Config,
    paths: &Paths,
) -> Result<()> {
    match args[1].as_str() {
        "summary" | "s" => cli_summary(&args[2..], db, config),
        "list" | "ls" => cli_list(&args[2..], db, config),
        "add" => cli_add(&args[2..], db, config),
        "categories" | "cats" => cli_categories(db),
        "delete-category" => cli_delete_category(&args[2..], db),
        "config" => cli_config(config, paths),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("expensetui {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("ExpenseTUI - local-only personal expense tracker");
    println!();
    println!("Usage: expensetui [command]");
    println!();
    println!("Commands:");
    println!("  (none)                        Launch interactive TUI");
    println!("  summary                       Totals, monthly average and category breakdown");
    println!("    --filter <preset>           this-week | this-month | last-month | last-90-days | all");
    println!("    --from <YYYY-MM-DD>         Explicit range start (needs --to)");
    println!("    --to <YYYY-MM-DD>           Explicit range end (needs --from)");
    println!("  list [--filter <preset>]      Expenses in the period, newest first");
    println!("  add <amount> <category>       Record an expense");
    println!("    --date <YYYY-MM-DD>         Day of the expense (default: today)");
    println!("  categories                    List categories with expense counts");
    println!("  delete-category <name>        Delete a category that has no expenses");
    println!("  config                        Show config file location and values");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

/// Positional arguments: everything that is not a `--flag value` pair.
fn positionals(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg.starts_with("--") {
            iter.next();
        } else {
            out.push(arg.as_str());
        }
    }
    out
}

/// `--from/--to` win over `--filter`; with neither the configured default applies.
/// `all` asks for every stored expense, so it resolves without an upper bound.
pub(crate) fn parse_selector(args: &[String], config: &Config) -> Result<Selector> {
    match (flag_value(args, "--from"), flag_value(args, "--to")) {
        (Some(from), Some(to)) => {
            let start = validate::parse_date(from)?;
            let end = validate::parse_date(to)?;
            return Ok(Selector::Range { start, end });
        }
        (Some(_), None) | (None, Some(_)) => {
            anyhow::bail!("--from and --to must be given together");
        }
        (None, None) => {}
    }

    let preset = match flag_value(args, "--filter") {
        Some(name) => Preset::parse(name).ok_or_else(|| anyhow::anyhow!("Unknown filter: {name}"))?,
        None => config.default_preset(),
    };
    Ok(match preset {
        Preset::AllTime => Selector::All,
        other => Selector::Preset(other),
    })
}

fn summarize_now(
    selector: Selector,
    db: &Database,
    config: &Config,
) -> Result<(Summary, Calendar<Local>, Vec<Category>)> {
    let calendar = Calendar::local(config.week_start());
    let categories = db.categories()?;
    let expenses = db.expenses()?;
    let summary = summarize(selector, &Local::now(), &calendar, &categories, &expenses);
    Ok((summary, calendar, categories))
}

fn cli_summary(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let selector = parse_selector(args, config)?;
    let (summary, calendar, _) = summarize_now(selector, db, config)?;
    for warning in &summary.aggregation.warnings {
        eprintln!("Warning: {warning}");
    }
    print!("{}", summary_report(&summary, &calendar, config.currency_symbol()));
    Ok(())
}

pub(crate) fn summary_report<Tz: TimeZone>(
    summary: &Summary,
    calendar: &Calendar<Tz>,
    currency: &str,
) -> String {
    let agg = &summary.aggregation;
    let mut out = String::new();

    if summary.selector == Selector::All {
        let _ = writeln!(out, "ExpenseTUI: {}", summary.selector);
    } else {
        let _ = writeln!(
            out,
            "ExpenseTUI: {} ({} to {})",
            summary.selector,
            format_day(calendar.date_of(summary.window.start)),
            format_day(calendar.date_of(summary.window.end)),
        );
    }
    let _ = writeln!(out, "{}", "─".repeat(48));
    if summary.window.is_malformed() {
        let _ = writeln!(out, "  Range start is after its end; nothing matches.");
    }
    let _ = writeln!(out, "  Total:         {}", format_amount(agg.total, currency));
    let _ = writeln!(out, "  Entries:       {}", agg.entry_count);
    let _ = writeln!(
        out,
        "  Avg / Month:   {}",
        format_amount(agg.average_per_month, currency)
    );
    if agg.unattributed > 0.0 {
        let _ = writeln!(
            out,
            "  Uncategorized: {}",
            format_amount(agg.unattributed, currency)
        );
    }

    if !agg.breakdown.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Spending by Category:");
        for item in &agg.breakdown {
            let _ = writeln!(
                out,
                "  {} {:<20} {:>14} {:>7}  {}",
                icons::glyph(&item.category.icon_name),
                item.category.name,
                format_amount(item.amount, currency),
                format_percentage(item.percentage),
                progress_bar(item.percentage / 100.0, 20),
            );
        }
    }
    out
}

fn cli_list(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let selector = parse_selector(args, config)?;
    let (summary, calendar, categories) = summarize_now(selector, db, config)?;
    if summary.expenses.is_empty() {
        println!("No expenses for {}", summary.selector);
        return Ok(());
    }
    print!(
        "{}",
        expense_table(&summary.expenses, &categories, &calendar, config.currency_symbol())
    );
    Ok(())
}

pub(crate) fn expense_table<Tz: TimeZone>(
    expenses: &[ExpenseEntry],
    categories: &[Category],
    calendar: &Calendar<Tz>,
    currency: &str,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<12} {:<22} {:>14}", "Date", "Category", "Amount");
    let _ = writeln!(out, "{}", "─".repeat(50));
    for expense in expenses {
        let category = Category::find_by_id(categories, &expense.category_id)
            .map(|c| format!("{} {}", icons::glyph(&c.icon_name), c.name))
            .unwrap_or_else(|| "? Unknown".into());
        let _ = writeln!(
            out,
            "{:<12} {:<22} {:>14}",
            format_day(calendar.date_of(expense.created_at)),
            category,
            format_amount(expense.amount, currency),
        );
    }
    out
}

fn cli_add(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let usage = "Usage: expensetui add <amount> <category> [--date YYYY-MM-DD]";
    let positional = positionals(args);
    let Some((amount_str, name_parts)) = positional.split_first() else {
        anyhow::bail!(usage);
    };
    if name_parts.is_empty() {
        anyhow::bail!(usage);
    }

    let amount = validate::parse_amount(amount_str)?;
    let categories = db.categories()?;
    let category = validate::find_category(&categories, &name_parts.join(" "))?;

    let calendar = Calendar::local(config.week_start());
    let today = Local::now().date_naive();
    let day = match flag_value(args, "--date") {
        Some(text) => validate::expense_day(validate::parse_date(text)?, today)?,
        None => today,
    };

    let expense = ExpenseEntry::new(amount, category.id.clone(), calendar.start_of(day));
    db.insert_expense(&expense).context("Failed to save expense")?;
    println!(
        "Added {} to {} on {day}",
        format_amount(amount, config.currency_symbol()),
        category.name
    );
    Ok(())
}

fn cli_categories(db: &mut Database) -> Result<()> {
    let categories = db.categories()?;
    if categories.is_empty() {
        println!("No categories");
        return Ok(());
    }
    let counts = db.expense_counts()?;

    println!("{:<3} {:<24} {:<8} {:>8}", "", "Name", "Color", "Expenses");
    println!("{}", "─".repeat(46));
    for cat in &categories {
        println!(
            "{:<3} {:<24} {:<8} {:>8}",
            icons::glyph(&cat.icon_name),
            cat.name,
            cat.hex_color(),
            counts.get(&cat.id).copied().unwrap_or(0),
        );
    }
    Ok(())
}

fn cli_delete_category(args: &[String], db: &mut Database) -> Result<()> {
    let name = args.join(" ");
    if name.trim().is_empty() {
        anyhow::bail!("Usage: expensetui delete-category <name>");
    }
    let categories = db.categories()?;
    let category = validate::find_category(&categories, &name)?;

    match db.delete_category(category) {
        Ok(()) => {
            println!("Deleted category: {}", category.name);
            Ok(())
        }
        Err(e @ StoreError::ReferentialIntegrity { .. }) => Err(e.into()),
        Err(e) => Err(e).context("Failed to delete category"),
    }
}

fn cli_config(config: &Config, paths: &Paths) -> Result<()> {
    println!("Config file:   {}", paths.config_file.display());
    println!("Database:      {}", paths.database().display());
    println!("Log file:      {}", paths.log_file().display());
    println!();
    println!("week_start      = {} ({})", config.week_start, config.week_start());
    println!(
        "default_filter  = {} ({})",
        config.default_filter,
        config.default_preset()
    );
    println!("currency_symbol = {}", config.currency_symbol());
    println!("log_level       = {}", config.log_level);
    Ok(())
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;

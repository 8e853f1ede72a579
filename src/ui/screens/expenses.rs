use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};

use super::{framed, render_card, render_chart, render_empty};
use crate::analytics::Preset;
use crate::icons;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, format_day, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Filter selector
            Constraint::Length(4), // Summary cards
            Constraint::Length(3), // Category chips
            Constraint::Min(5),    // Table + chart
        ])
        .split(area);

    render_filter_bar(f, chunks[0], app);
    render_summary_cards(f, chunks[1], app);
    render_chips(f, chunks[2], app);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[3]);

    render_expense_table(f, body[0], app);
    render_chart(
        f,
        body[1],
        &app.expenses_view.aggregation.chart,
        &app.currency,
    );
}

fn render_filter_bar(f: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<Line> = Preset::all()
        .iter()
        .map(|p| Line::from(format!(" {} ", p.label())))
        .collect();
    let selected = Preset::all()
        .iter()
        .position(|p| *p == app.preset)
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(theme::dim_style())
        .highlight_style(theme::selected_style())
        .divider(Span::styled("│", Style::default().fg(theme::OVERLAY)));
    f.render_widget(tabs, area);
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &App) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    let agg = &app.expenses_view.aggregation;
    let unattributed = (agg.unattributed > 0.0)
        .then(|| format!("{} uncategorized", format_amount(agg.unattributed, &app.currency)));

    render_card(
        f,
        cards[0],
        "Total",
        format_amount(agg.total, &app.currency),
        theme::RED,
        unattributed,
    );
    render_card(
        f,
        cards[1],
        "Entries",
        agg.entry_count.to_string(),
        theme::ACCENT,
        Some(app.preset.label().to_string()),
    );
    render_card(
        f,
        cards[2],
        "Per Month",
        format_amount(agg.average_per_month, &app.currency),
        theme::YELLOW,
        None,
    );
}

fn render_chips(f: &mut Frame, area: Rect, app: &App) {
    let agg = &app.expenses_view.aggregation;
    let breakdown = &agg.breakdown;
    let line = if agg.is_empty() {
        Line::from(Span::styled("No spending in this period", theme::dim_style()))
    } else {
        let mut spans = Vec::with_capacity(breakdown.len() * 2);
        for item in breakdown {
            spans.push(Span::styled(
                format!(
                    " {} {} {} ",
                    icons::glyph(&item.category.icon_name),
                    item.category.name,
                    format_amount(item.amount, &app.currency)
                ),
                theme::chip_style(item.category.color_value),
            ));
            spans.push(Span::raw(" "));
        }
        Line::from(spans)
    };

    let chips = Paragraph::new(line)
        .wrap(Wrap { trim: true })
        .block(framed(" By Category ".into()));
    f.render_widget(chips, area);
}

fn render_expense_table(f: &mut Frame, area: Rect, app: &App) {
    let expenses = &app.expenses_view.expenses;
    if expenses.is_empty() {
        render_empty(
            f,
            area,
            " Expenses (0) ".into(),
            &[
                "No expenses in this period",
                "",
                "Press a to add one, or f to widen the filter",
            ],
        );
        return;
    }

    let header_cells = ["Date", "Category", "Amount"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = expenses
        .iter()
        .enumerate()
        .skip(app.expense_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, expense)| {
            let category_cell = match app.category_of(&expense.category_id) {
                Some(cat) => Cell::from(Line::from(vec![
                    Span::styled(
                        format!("{} ", icons::glyph(&cat.icon_name)),
                        Style::default().fg(theme::category_color(cat.color_value)),
                    ),
                    Span::raw(truncate(&cat.name, 20)),
                ])),
                None => Cell::from(Span::styled("? Unknown", theme::warning_style())),
            };

            let amount_cell = if expense.has_valid_amount() {
                Cell::from(Span::styled(
                    format_amount(expense.amount, &app.currency),
                    theme::amount_style(),
                ))
            } else {
                Cell::from(Span::styled("invalid", theme::warning_style()))
            };

            let style = if i == app.expense_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            Row::new(vec![
                Cell::from(format_day(app.calendar.date_of(expense.created_at))),
                category_cell,
                amount_cell,
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Min(16),
        Constraint::Length(14),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(framed(format!(" Expenses ({}) ", expenses.len())));

    f.render_widget(table, area);
}

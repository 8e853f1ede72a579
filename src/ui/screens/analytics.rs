use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use super::{framed, render_card, render_chart, render_empty};
use crate::analytics::{BreakdownItem, DataQualityWarning};
use crate::icons;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, format_percentage, progress_bar, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Range line
            Constraint::Length(4), // Summary cards
            Constraint::Min(5),    // Breakdown + chart
        ])
        .split(area);

    render_range_line(f, chunks[0], app);
    render_summary_cards(f, chunks[1], app);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[2]);

    render_breakdown(f, body[0], app);
    render_chart(
        f,
        body[1],
        &app.analytics_view.aggregation.chart,
        &app.currency,
    );
}

fn render_range_line(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = match app.analytics_range {
        Some((start, end)) => vec![
            Span::styled(" Range: ", theme::dim_style()),
            Span::styled(
                format!("{start} → {end}"),
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD),
            ),
        ],
        None => vec![
            Span::styled(" Range: ", theme::dim_style()),
            Span::styled(
                "All time",
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  (R for this month)", theme::dim_style()),
        ],
    };

    if app.analytics_view.window.is_malformed() {
        spans.push(Span::styled(
            "  start is after end, nothing matches",
            theme::warning_style(),
        ));
    }

    let (malformed, orphaned) = warning_counts(&app.analytics_view.aggregation.warnings);
    if malformed > 0 {
        spans.push(Span::styled(
            format!("  ⚠ {malformed} expense(s) with a bad amount left out"),
            theme::warning_style(),
        ));
    }
    if orphaned > 0 {
        spans.push(Span::styled(
            format!("  ⚠ {orphaned} unknown category id(s)"),
            theme::warning_style(),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// (malformed amounts, orphaned category ids)
fn warning_counts(warnings: &[DataQualityWarning]) -> (usize, usize) {
    warnings.iter().fold((0, 0), |(bad, orphan), w| match w {
        DataQualityWarning::MalformedAmount { .. } => (bad + 1, orphan),
        DataQualityWarning::OrphanedCategory { .. } => (bad, orphan + 1),
    })
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

    let agg = &app.analytics_view.aggregation;
    let unattributed = (agg.unattributed > 0.0)
        .then(|| format!("{} uncategorized", format_amount(agg.unattributed, &app.currency)));

    render_card(
        f,
        cards[0],
        "Total Spent",
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
        Some(format!("{} categories", agg.breakdown.len())),
    );
    render_card(
        f,
        cards[2],
        "Average Monthly",
        format_amount(agg.average_per_month, &app.currency),
        theme::YELLOW,
        None,
    );
}

fn render_breakdown(f: &mut Frame, area: Rect, app: &App) {
    let breakdown = &app.analytics_view.aggregation.breakdown;
    if breakdown.is_empty() {
        render_empty(
            f,
            area,
            " Category Breakdown ".into(),
            &["No expenses in this range"],
        );
        return;
    }

    let header_cells = ["", "Category", "Amount", "Share", ""]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = breakdown
        .iter()
        .enumerate()
        .skip(app.breakdown_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, item)| {
            let style = if i == app.breakdown_index {
                theme::selected_style()
            } else {
                theme::normal_style()
            };
            breakdown_row(item, &app.currency).style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(3),
        Constraint::Min(12),
        Constraint::Length(14),
        Constraint::Length(7),
        Constraint::Length(12),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(framed(" Category Breakdown ".into()));
    f.render_widget(table, area);
}

fn breakdown_row(item: &BreakdownItem, currency: &str) -> Row<'static> {
    let color = theme::category_color(item.category.color_value);
    Row::new(vec![
        Cell::from(Span::styled(
            icons::glyph(&item.category.icon_name),
            Style::default().fg(color),
        )),
        Cell::from(truncate(&item.category.name, 18)),
        Cell::from(format_amount(item.amount, currency)),
        Cell::from(format_percentage(item.percentage)),
        Cell::from(Span::styled(
            progress_bar(item.percentage / 100.0, 12),
            Style::default().fg(color),
        )),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_counts_split_by_kind() {
        let warnings = vec![
            DataQualityWarning::MalformedAmount {
                expense_id: "a".into(),
                amount: f64::NAN,
            },
            DataQualityWarning::OrphanedCategory {
                category_id: "gone".into(),
                amount: 12.0,
            },
            DataQualityWarning::MalformedAmount {
                expense_id: "b".into(),
                amount: -3.0,
            },
        ];
        assert_eq!(warning_counts(&warnings), (2, 1));
        assert_eq!(warning_counts(&[]), (0, 0));
    }
}

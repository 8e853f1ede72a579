use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Cell, Row, Table},
    Frame,
};

use super::{framed, render_empty};
use crate::icons;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::truncate;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    if app.categories.is_empty() {
        render_empty(
            f,
            area,
            " Categories (0) ".into(),
            &["No categories yet", "", "Press n to create one"],
        );
        return;
    }

    let header_cells = ["", "Name", "Color", "Expenses"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .categories
        .iter()
        .enumerate()
        .skip(app.category_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, cat)| {
            let color = theme::category_color(cat.color_value);
            let count = app.expense_count_for(&cat.id);

            let style = if i == app.category_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            Row::new(vec![
                Cell::from(icons::glyph(&cat.icon_name)),
                Cell::from(truncate(&cat.name, 30)),
                Cell::from(Line::from(vec![
                    Span::styled("██ ", Style::default().fg(color)),
                    Span::raw(cat.hex_color()),
                ])),
                Cell::from(if count == 0 {
                    Span::styled("none", theme::dim_style())
                } else {
                    Span::raw(count.to_string())
                }),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(3),
        Constraint::Min(16),
        Constraint::Length(12),
        Constraint::Length(10),
    ];

    let table = Table::new(rows, widths).header(header).block(framed(format!(
        " Categories ({}) | icon: {} ",
        app.categories.len(),
        app.selected_category()
            .map(|c| c.icon_name.as_str())
            .unwrap_or("-")
    )));
    f.render_widget(table, area);
}

pub(crate) mod analytics;
pub(crate) mod categories;
pub(crate) mod expenses;

use ratatui::{
    layout::{Direction, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};

use crate::analytics::ChartSlice;
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn framed(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(title, theme::title_style()))
}

pub(crate) fn render_card(
    f: &mut Frame,
    area: Rect,
    title: &str,
    value: String,
    color: Color,
    subtitle: Option<String>,
) {
    let text = Paragraph::new(vec![
        Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(subtitle.unwrap_or_default(), theme::dim_style())),
    ])
    .centered()
    .block(framed(format!(" {title} ")));

    f.render_widget(text, area);
}

pub(crate) fn render_empty(f: &mut Frame, area: Rect, title: String, lines: &[&str]) {
    let mut text = vec![Line::from("")];
    text.extend(
        lines
            .iter()
            .map(|l| Line::from(Span::styled(l.to_string(), theme::dim_style()))),
    );
    f.render_widget(Paragraph::new(text).centered().block(framed(title)), area);
}

/// Horizontal bars, one per slice, each in its category color.
pub(crate) fn render_chart(f: &mut Frame, area: Rect, slices: &[ChartSlice], currency: &str) {
    if slices.is_empty() {
        render_empty(f, area, " Spending by Category ".into(), &["Nothing to chart"]);
        return;
    }

    let bars: Vec<Bar> = slices
        .iter()
        .map(|slice| {
            let color = theme::category_color(slice.color);
            // Bars want integers; cents keep small amounts visible.
            let cents = (slice.value.max(0.0) * 100.0).round() as u64;
            Bar::default()
                .value(cents)
                .text_value(format_amount(slice.value, currency))
                .label(Line::from(truncate(&slice.label, 12)))
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(theme::HEADER_BG).bg(color))
        })
        .collect();

    let chart = BarChart::default()
        .block(framed(" Spending by Category ".into()))
        .direction(Direction::Horizontal)
        .data(BarGroup::default().bars(&bars))
        .bar_width(1)
        .bar_gap(1)
        .label_style(theme::normal_style());

    f.render_widget(chart, area);
}

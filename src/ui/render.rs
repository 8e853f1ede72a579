use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};
use std::collections::BTreeMap;

use super::app::{App, InputMode, Screen};
use super::commands;
use super::screens;
use super::theme;

pub(crate) fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(5),    // Main content
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Command bar
        ])
        .split(f.area());

    render_tab_bar(f, chunks[0], app);
    render_screen(f, chunks[1], app);
    render_status_bar(f, chunks[2], app);
    render_command_bar(f, chunks[3], app);

    if app.show_help {
        render_help_overlay(f, f.area());
    }
}

fn render_tab_bar(f: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<Line> = Screen::all()
        .iter()
        .enumerate()
        .map(|(i, screen)| Line::from(format!("{}:{screen}", i + 1)))
        .collect();
    let selected = Screen::all()
        .iter()
        .position(|s| *s == app.screen)
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(theme::TEXT_DIM).bg(theme::HEADER_BG))
        .highlight_style(
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::styled("|", Style::default().fg(theme::OVERLAY)));
    f.render_widget(tabs, area);
}

fn render_screen(f: &mut Frame, area: Rect, app: &App) {
    match app.screen {
        Screen::Expenses => screens::expenses::render(f, area, app),
        Screen::Analytics => screens::analytics::render(f, area, app),
        Screen::Categories => screens::categories::render(f, area, app),
    }
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mode_label = format!(" {} ", app.input_mode);
    let mode_bg = match app.input_mode {
        InputMode::Normal => theme::ACCENT,
        InputMode::Command | InputMode::Editing => theme::GREEN,
        InputMode::Confirm => theme::RED,
    };
    let mode_style = Style::default()
        .fg(theme::HEADER_BG)
        .bg(mode_bg)
        .add_modifier(Modifier::BOLD);

    let info = match app.screen {
        Screen::Expenses => format!(
            " {} | {} | {} entries",
            app.screen, app.preset, app.expenses_view.aggregation.entry_count
        ),
        Screen::Analytics => format!(
            " {} | {} | {} entries",
            app.screen,
            app.analytics_view.selector,
            app.analytics_view.aggregation.entry_count
        ),
        Screen::Categories => format!(" {} | {} categories", app.screen, app.categories.len()),
    };

    let right = match app.screen {
        Screen::Expenses => " f/F filter | a add | D delete | ? help ",
        Screen::Analytics => " R range | :range from to | ? help ",
        Screen::Categories => " n new | r rename | i icon | c color | D delete ",
    };

    let available = area.width as usize;
    let used = mode_label.chars().count() + info.chars().count() + right.len();
    let pad = available.saturating_sub(used);

    let bar = Paragraph::new(Line::from(vec![
        Span::styled(&mode_label, mode_style),
        Span::styled(&info, theme::status_bar_style()),
        Span::styled(" ".repeat(pad), theme::status_bar_style()),
        Span::styled(right, theme::status_bar_style()),
    ]));
    f.render_widget(bar, area);
}

fn render_command_bar(f: &mut Frame, area: Rect, app: &App) {
    let (content, cursor_offset) = match app.input_mode {
        InputMode::Command => (
            Line::from(vec![
                Span::styled(":", Style::default().fg(theme::ACCENT)),
                Span::styled(&app.command_input, theme::command_bar_style()),
            ]),
            Some(1 + app.command_input.chars().count() as u16),
        ),
        InputMode::Editing => (
            Line::from(vec![
                Span::styled("rename> ", Style::default().fg(theme::GREEN)),
                Span::styled(&app.command_input, theme::command_bar_style()),
            ]),
            Some(8 + app.command_input.chars().count() as u16),
        ),
        InputMode::Confirm => (
            Line::from(vec![
                Span::styled(&app.confirm_message, Style::default().fg(theme::YELLOW)),
                Span::styled(" [y/N] ", Style::default().fg(theme::RED)),
            ]),
            None,
        ),
        InputMode::Normal => (
            if app.status_message.is_empty() {
                Line::from(Span::styled(
                    " Press : for commands, ? for help",
                    theme::dim_style(),
                ))
            } else {
                Line::from(Span::styled(
                    &app.status_message,
                    theme::command_bar_style(),
                ))
            },
            None,
        ),
    };

    let bar = Paragraph::new(content).style(Style::default().bg(theme::COMMAND_BG));
    f.render_widget(bar, area);

    if let Some(offset) = cursor_offset {
        f.set_cursor_position((area.x + offset, area.y));
    }
}

fn section(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!(" {title}"),
        Style::default()
            .fg(theme::YELLOW)
            .add_modifier(Modifier::BOLD),
    ))
}

fn help_line(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(text, theme::normal_style()))
}

/// Registry entries grouped by description: `(longest name, other aliases, description)`.
fn command_help() -> Vec<(&'static str, Vec<&'static str>, &'static str)> {
    let mut by_desc: BTreeMap<&'static str, Vec<&'static str>> = BTreeMap::new();
    for (&name, cmd) in commands::COMMANDS.iter() {
        by_desc.entry(cmd.description).or_default().push(name);
    }
    let mut entries: Vec<_> = by_desc
        .into_iter()
        .map(|(desc, mut names)| {
            names.sort_by_key(|n| (std::cmp::Reverse(n.len()), *n));
            let primary = names.remove(0);
            (primary, names, desc)
        })
        .collect();
    entries.sort_by_key(|(name, _, _)| *name);
    entries
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    )
}

fn render_help_overlay(f: &mut Frame, area: Rect) {
    let mut lines = vec![
        section("Navigation"),
        help_line("  j/k or Up/Down   Move cursor           1-3        Switch tabs"),
        help_line("  Tab/Shift-Tab    Cycle tabs            g/G        Top/Bottom"),
        help_line("  Ctrl-d/u         Page Down/Up          Ctrl-q     Quit"),
        Line::from(""),
        section("Screens"),
        help_line("  Expenses         f/F cycle filter      a add      D delete"),
        help_line("  Analytics        R toggle month range  :range <from> <to>"),
        help_line("  Categories       n new  r rename  i icon  c color  D delete"),
        Line::from(""),
        section("Commands"),
    ];

    for (name, aliases, desc) in command_help() {
        let label = if aliases.is_empty() {
            format!(":{name}")
        } else {
            format!(":{name} (:{})", aliases.join(", :"))
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {label:<22}"), Style::default().fg(theme::ACCENT)),
            Span::styled(desc, theme::normal_style()),
        ]));
    }

    let popup = centered(area, 90, lines.len() as u16 + 2);
    f.render_widget(Clear, popup);
    let help = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" ExpenseTUI Help ")
            .title_bottom(" any key closes ")
            .title_style(theme::title_style())
            .border_style(Style::default().fg(theme::ACCENT))
            .style(Style::default().bg(theme::HEADER_BG)),
    );
    f.render_widget(help, popup);
}

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::app::{App, Confirmation, InputMode};
use super::commands;
use super::theme;

pub(crate) fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(5),    // Table + pager
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Command / notice bar
        ])
        .split(f.area());

    render_title_bar(f, chunks[0], app);
    super::screens::transactions::render(f, chunks[1], app);
    render_status_bar(f, chunks[2], app);
    render_command_bar(f, chunks[3], app);

    if let Some(confirmation) = &app.confirmation {
        render_confirm_popup(f, f.area(), confirmation);
    }

    if app.show_help {
        render_help_overlay(f, f.area());
    }
}

fn render_title_bar(f: &mut Frame, area: Rect, app: &App) {
    let range = app.view.range();
    let from = range
        .start
        .map_or_else(|| "Start Date".to_string(), |d| d.format("%d/%m/%Y").to_string());
    let to = range
        .end
        .map_or_else(|| "End Date".to_string(), |d| d.format("%d/%m/%Y").to_string());

    let line = Line::from(vec![
        Span::styled(
            " LedgerTUI ",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" From: ", theme::dim_style()),
        Span::styled(from, theme::normal_style()),
        Span::styled("  To: ", theme::dim_style()),
        Span::styled(to, theme::normal_style()),
    ]);
    f.render_widget(
        Paragraph::new(line).style(Style::default().bg(theme::HEADER_BG)),
        area,
    );
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mode_label = format!(" {} ", app.input_mode);
    let mode_bg = match app.input_mode {
        InputMode::Normal => theme::ACCENT,
        InputMode::Command => theme::GREEN,
        InputMode::Editing => theme::YELLOW,
        InputMode::Confirm => theme::RED,
    };
    let mode_style = Style::default()
        .fg(theme::HEADER_BG)
        .bg(mode_bg)
        .add_modifier(Modifier::BOLD);

    let info = format!(
        " page {}/{} | {} shown ",
        app.view.page(),
        app.view.page_count(),
        app.view.filtered().len()
    );

    let right = match app.input_mode {
        InputMode::Editing => " Tab field | ←/→ choose | Enter save | Esc cancel ",
        InputMode::Confirm => " y yes | n no ",
        _ => " e edit | D delete | x export | h/l page | ? help ",
    };

    let available = area.width as usize;
    let used = mode_label.len() + info.len() + right.len();
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
    let (content, cursor_offset) = match (app.input_mode, &app.notice) {
        (InputMode::Command, _) => (
            Line::from(vec![
                Span::styled(":", Style::default().fg(theme::ACCENT)),
                Span::styled(&app.command_input, theme::command_bar_style()),
            ]),
            Some(1 + app.command_input.chars().count() as u16),
        ),
        (_, Some(notice)) => (
            Line::from(Span::styled(
                format!(" {}", notice.message),
                theme::notice_style(notice.level),
            )),
            None,
        ),
        _ => (
            Line::from(Span::styled(
                " Press : for commands, ? for help",
                theme::dim_style(),
            )),
            None,
        ),
    };

    let bar = Paragraph::new(content).style(Style::default().bg(theme::COMMAND_BG));
    f.render_widget(bar, area);

    if let Some(offset) = cursor_offset {
        f.set_cursor_position((area.x + offset, area.y));
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn render_confirm_popup(f: &mut Frame, area: Rect, confirmation: &Confirmation) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(&confirmation.message, theme::normal_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled(" [y] Yes ", Style::default().fg(theme::RED).add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled(" [n] No ", Style::default().fg(theme::ACCENT)),
        ]),
    ];

    let popup_area = centered(area, 56, 7);
    f.render_widget(Clear, popup_area);
    let popup = Paragraph::new(text)
        .centered()
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme::RED))
                .title(Span::styled(
                    format!(" {} ", confirmation.title),
                    Style::default().fg(theme::YELLOW).add_modifier(Modifier::BOLD),
                ))
                .style(Style::default().bg(theme::HEADER_BG)),
        );
    f.render_widget(popup, popup_area);
}

fn render_help_overlay(f: &mut Frame, area: Rect) {
    let section = |title: &'static str| {
        Line::from(Span::styled(
            title,
            Style::default()
                .fg(theme::YELLOW)
                .add_modifier(Modifier::BOLD),
        ))
    };

    let mut help_text = vec![
        Line::from(Span::styled(
            " LedgerTUI Help ",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section(" Table"),
        Line::from(Span::styled(
            "  j/k or Up/Down   Move cursor           h/l or Left/Right  Prev/Next page",
            theme::normal_style(),
        )),
        Line::from(Span::styled(
            "  e or Enter       Edit row              D                  Delete row",
            theme::normal_style(),
        )),
        Line::from(Span::styled(
            "  f / t            Set From / To date    c                  Clear range",
            theme::normal_style(),
        )),
        Line::from(Span::styled(
            "  x                Export CSV            q or Ctrl-c        Quit",
            theme::normal_style(),
        )),
        Line::from(""),
        section(" Editing"),
        Line::from(Span::styled(
            "  Tab/Shift-Tab    Next/Prev field       Left/Right         Change type/category",
            theme::normal_style(),
        )),
        Line::from(Span::styled(
            "  Enter            Save                  Esc                Cancel",
            theme::normal_style(),
        )),
        Line::from(""),
        section(" Commands"),
    ];

    let mut seen = std::collections::HashSet::new();
    let mut cmd_lines: Vec<(&str, &str)> = Vec::new();
    for (&name, cmd) in commands::COMMANDS.iter() {
        if name.len() <= 2 {
            continue;
        }
        if seen.insert(cmd.description) {
            cmd_lines.push((name, cmd.description));
        }
    }
    cmd_lines.sort_by_key(|(name, _)| *name);
    for (name, desc) in &cmd_lines {
        help_text.push(Line::from(Span::styled(
            format!("  :{name:<14} {desc}"),
            theme::normal_style(),
        )));
    }

    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(
        " Press any key to close ",
        Style::default().fg(theme::TEXT_DIM),
    )));

    let popup_area = centered(area, 84, help_text.len() as u16 + 2);
    f.render_widget(Clear, popup_area);
    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT))
            .style(Style::default().bg(theme::HEADER_BG)),
    );
    f.render_widget(help, popup_area);
}

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::ledger::{EditForm, FormField};
use crate::models::Transaction;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{fixed_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    let title = Span::styled(
        format!(
            " Transactions ({} of {}) {} ",
            app.view.filtered().len(),
            app.view.all().len(),
            if app.view.range().is_active() {
                format!("[{}]", app.view.range())
            } else {
                String::new()
            }
        ),
        Style::default()
            .fg(theme::TEXT_DIM)
            .add_modifier(Modifier::BOLD),
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(title);

    if app.view.filtered().is_empty() {
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled(
                "No transactions found for selected range.",
                theme::dim_style(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Change the range with :from / :to, or :cr to show all dates",
                theme::dim_style(),
            )),
        ];
        f.render_widget(Paragraph::new(msg).centered().block(block), chunks[0]);
        return;
    }

    render_table(f, chunks[0], app, block);
    render_pager(f, chunks[1], app);
}

fn render_table(f: &mut Frame, area: Rect, app: &App, block: Block) {
    let header_cells = ["Name", "Type", "Category", "Date", "Amount (₹)"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let editing_id = app.edit.editing_id();

    let rows: Vec<Row> = app
        .view
        .page_rows()
        .iter()
        .enumerate()
        .map(|(i, txn)| match (editing_id, app.edit.form()) {
            (Some(id), Some(form)) if id == txn.id => edit_row(form),
            _ => view_row(txn, i, i == app.cursor),
        })
        .collect();

    let widths = [
        Constraint::Min(20),
        Constraint::Length(9),
        Constraint::Length(20),
        Constraint::Length(12),
        Constraint::Length(16),
    ];

    let table = Table::new(rows, widths).header(header).block(block);
    f.render_widget(table, area);
}

fn view_row(txn: &Transaction, i: usize, is_cursor: bool) -> Row<'static> {
    let amount_style = if txn.is_income() {
        theme::income_style()
    } else {
        theme::expense_style()
    };

    let style = if is_cursor {
        theme::selected_style()
    } else if i % 2 == 1 {
        theme::alt_row_style()
    } else {
        theme::normal_style()
    };

    let category = if txn.category.is_empty() {
        "—".to_string()
    } else {
        truncate(&txn.category, 20)
    };

    Row::new(vec![
        Cell::from(truncate(&txn.name, 40)),
        Cell::from(txn.kind.as_str()),
        Cell::from(category),
        Cell::from(txn.short_date()),
        Cell::from(Line::from(Span::styled(fixed_amount(txn.amount), amount_style)).right_aligned()),
    ])
    .style(style)
}

fn edit_row(form: &EditForm) -> Row<'static> {
    let cell = |field: FormField, text: String| {
        let focused = form.field == field;
        let shown = match (focused, field.is_text()) {
            (true, true) => format!("{text}▏"),
            (true, false) => format!("‹ {text} ›"),
            _ => text,
        };
        let style = if focused {
            theme::focused_field_style()
        } else {
            theme::editing_row_style()
        };
        Cell::from(Span::styled(shown, style))
    };

    let category = if form.category.is_empty() {
        "Select category".to_string()
    } else {
        form.category.clone()
    };

    Row::new(vec![
        cell(FormField::Name, form.name.clone()),
        cell(FormField::Type, form.kind.to_string()),
        cell(FormField::Category, category),
        cell(FormField::Date, form.date.clone()),
        cell(FormField::Amount, form.amount.clone()),
    ])
    .style(theme::editing_row_style())
}

fn render_pager(f: &mut Frame, area: Rect, app: &App) {
    let view = &app.view;
    let line = Line::from(vec![
        Span::styled(" ← Previous ", theme::pager_style(view.has_prev())),
        Span::styled(
            format!("  Page {} of {}  ", view.page(), view.page_count()),
            theme::normal_style(),
        ),
        Span::styled(" Next → ", theme::pager_style(view.has_next())),
    ]);
    f.render_widget(Paragraph::new(line).centered(), area);
}

use std::collections::HashMap;
use std::sync::LazyLock;

use super::app::App;
use crate::db::Database;
use crate::models::parse_date;

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

    register_command!("q", "Quit LedgerTUI", cmd_quit, r);
    register_command!("quit", "Quit LedgerTUI", cmd_quit, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!(
        "from",
        "Set range start (e.g. :from 06/01/2024, empty clears)",
        cmd_from,
        r
    );
    register_command!(
        "to",
        "Set range end (e.g. :to 31/01/2024, empty clears)",
        cmd_to,
        r
    );
    register_command!(
        "range",
        "Set both bounds (e.g. :range 01/01/2024 31/01/2024)",
        cmd_range,
        r
    );
    register_command!("clear-range", "Show all dates", cmd_clear_range, r);
    register_command!("cr", "Show all dates", cmd_clear_range, r);
    register_command!("next", "Next page", cmd_next_page, r);
    register_command!("prev", "Previous page", cmd_prev_page, r);
    register_command!("edit", "Edit selected transaction", cmd_edit, r);
    register_command!("delete", "Delete selected transaction", cmd_delete, r);
    register_command!("export", "Export filtered list to CSV", cmd_export, r);
    register_command!("e", "Export filtered list to CSV", cmd_export, r);
    register_command!("reload", "Reload from the database", cmd_reload, r);

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, db)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.notify_error(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 2) // skip short aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
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

fn cmd_help(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_from(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_start(None);
        return Ok(());
    }
    match parse_date(args) {
        Ok(d) => app.set_start(Some(d)),
        Err(e) => app.notify_error(e.to_string()),
    }
    Ok(())
}

fn cmd_to(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_end(None);
        return Ok(());
    }
    match parse_date(args) {
        Ok(d) => app.set_end(Some(d)),
        Err(e) => app.notify_error(e.to_string()),
    }
    Ok(())
}

fn cmd_range(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    let [start, end] = parts.as_slice() else {
        app.notify_info("Usage: :range <start> <end>");
        return Ok(());
    };
    match (parse_date(start), parse_date(end)) {
        (Ok(s), Ok(e)) => {
            app.set_start(Some(s));
            app.set_end(Some(e));
        }
        (Err(e), _) | (_, Err(e)) => app.notify_error(e.to_string()),
    }
    Ok(())
}

fn cmd_clear_range(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.clear_range();
    Ok(())
}

fn cmd_next_page(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.next_page();
    Ok(())
}

fn cmd_prev_page(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.prev_page();
    Ok(())
}

fn cmd_edit(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.begin_edit();
    Ok(())
}

fn cmd_delete(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.request_delete();
    Ok(())
}

fn cmd_export(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.export_csv(chrono::Utc::now().date_naive());
    Ok(())
}

fn cmd_reload(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if app.reload(db) {
        app.notify_info(format!("Loaded {} transactions", app.view.all().len()));
    }
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;

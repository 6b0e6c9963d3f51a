use anyhow::Result;
use chrono::NaiveDate;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::db::Database;
use crate::ledger::{export, EditState, ExportOutcome, TransactionView};
use crate::models::*;

/// How long a notice stays on screen.
pub(crate) const NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Editing,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Editing => write!(f, "EDIT"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A transient message on the bottom line. Never blocks input.
#[derive(Debug, Clone)]
pub(crate) struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub shown_at: Instant,
}

impl Notice {
    pub(crate) fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.shown_at) >= NOTICE_TTL
    }
}

/// Action run when a confirmation is answered with yes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PendingAction {
    DeleteTransaction { id: i64 },
}

/// A blocking yes/no question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Confirmation {
    pub title: String,
    pub message: String,
    pub action: PendingAction,
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) show_help: bool,

    pub(crate) view: TransactionView,
    pub(crate) categories: Vec<Category>,
    /// Row under the cursor, as an index into the current page.
    pub(crate) cursor: usize,
    pub(crate) edit: EditState,

    pub(crate) notice: Option<Notice>,
    pub(crate) confirmation: Option<Confirmation>,
    pub(crate) export_dir: PathBuf,
}

impl App {
    pub(crate) fn new(export_dir: PathBuf) -> Self {
        Self {
            running: true,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            show_help: false,

            view: TransactionView::new(),
            categories: Vec::new(),
            cursor: 0,
            edit: EditState::Viewing,

            notice: None,
            confirmation: None,
            export_dir,
        }
    }

    pub(crate) fn refresh_transactions(&mut self, db: &Database) -> Result<()> {
        let records = db.get_all_transactions()?;
        // Loading goes back to page 1, so the cursor goes back to its top row.
        self.view.load(records);
        self.cursor = 0;
        Ok(())
    }

    pub(crate) fn refresh_categories(&mut self, db: &Database) -> Result<()> {
        self.categories = db.get_categories()?;
        Ok(())
    }

    pub(crate) fn refresh_all(&mut self, db: &Database) -> Result<()> {
        self.refresh_categories(db)?;
        self.refresh_transactions(db)?;
        Ok(())
    }

    /// Reload after a mutation. A failed load keeps the old rows on screen,
    /// posts an error notice and returns false.
    pub(crate) fn reload(&mut self, db: &Database) -> bool {
        match self.refresh_transactions(db) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("reload failed: {e:#}");
                self.notify_error("Failed to load transactions");
                false
            }
        }
    }

    // ── Notices ───────────────────────────────────────────────

    pub(crate) fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notice = Some(Notice {
            level,
            message: message.into(),
            shown_at: Instant::now(),
        });
    }

    pub(crate) fn notify_info(&mut self, message: impl Into<String>) {
        self.notify(NoticeLevel::Info, message);
    }

    pub(crate) fn notify_success(&mut self, message: impl Into<String>) {
        self.notify(NoticeLevel::Success, message);
    }

    pub(crate) fn notify_error(&mut self, message: impl Into<String>) {
        self.notify(NoticeLevel::Error, message);
    }

    pub(crate) fn expire_notice(&mut self, now: Instant) {
        if self.notice.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.notice = None;
        }
    }

    // ── Cursor and paging ─────────────────────────────────────

    pub(crate) fn selected(&self) -> Option<&Transaction> {
        self.view.page_rows().get(self.cursor)
    }

    pub(crate) fn move_down(&mut self) {
        if self.cursor + 1 < self.view.page_rows().len() {
            self.cursor += 1;
        }
    }

    pub(crate) fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub(crate) fn next_page(&mut self) {
        if self.view.next_page() {
            self.cursor = 0;
        }
    }

    pub(crate) fn prev_page(&mut self) {
        if self.view.prev_page() {
            self.cursor = 0;
        }
    }

    // ── Range filter ──────────────────────────────────────────

    pub(crate) fn set_start(&mut self, start: Option<NaiveDate>) {
        self.view.set_start(start);
        self.cursor = 0;
    }

    pub(crate) fn set_end(&mut self, end: Option<NaiveDate>) {
        self.view.set_end(end);
        self.cursor = 0;
    }

    pub(crate) fn clear_range(&mut self) {
        self.view.set_range(Default::default());
        self.cursor = 0;
    }

    // ── Editing ───────────────────────────────────────────────

    pub(crate) fn begin_edit(&mut self) {
        let Some(txn) = self.selected().cloned() else {
            self.notify_info("No transaction selected");
            return;
        };
        self.edit.begin(&txn);
        self.input_mode = InputMode::Editing;
    }

    pub(crate) fn cancel_edit(&mut self) {
        self.edit.cancel();
        self.input_mode = InputMode::Normal;
    }

    /// Write the form back under the same id. On failure the form stays open.
    pub(crate) fn save_edit(&mut self, db: &Database) {
        let Some(pending) = self.edit.pending() else {
            return;
        };
        let result = pending
            .map_err(anyhow::Error::from)
            .and_then(|txn| db.put_transaction(&txn));

        match result {
            Ok(()) => {
                self.edit.cancel();
                self.input_mode = InputMode::Normal;
                if self.reload(db) {
                    self.notify_success("Transaction updated successfully");
                }
            }
            Err(e) => {
                tracing::error!("update failed: {e:#}");
                self.notify_error("Failed to update transaction");
            }
        }
    }

    // ── Deleting ──────────────────────────────────────────────

    pub(crate) fn request_delete(&mut self) {
        let Some(id) = self.selected().map(|t| t.id) else {
            self.notify_info("No transaction selected");
            return;
        };
        self.confirmation = Some(Confirmation {
            title: "Confirm Deletion".into(),
            message: "Are you sure you want to delete this transaction?".into(),
            action: PendingAction::DeleteTransaction { id },
        });
        self.input_mode = InputMode::Confirm;
    }

    pub(crate) fn confirm_yes(&mut self, db: &Database) {
        self.input_mode = InputMode::Normal;
        let Some(confirmation) = self.confirmation.take() else {
            return;
        };
        match confirmation.action {
            PendingAction::DeleteTransaction { id } => match db.delete_transaction(id) {
                Ok(()) => {
                    if self.reload(db) {
                        self.notify_success("Transaction deleted successfully");
                    }
                }
                Err(e) => {
                    tracing::error!(id, "delete failed: {e:#}");
                    self.notify_error("Failed to delete transaction");
                }
            },
        }
    }

    pub(crate) fn confirm_no(&mut self) {
        self.input_mode = InputMode::Normal;
        if let Some(confirmation) = self.confirmation.take() {
            match confirmation.action {
                PendingAction::DeleteTransaction { .. } => {
                    self.notify_info("Deletion cancelled");
                }
            }
        }
    }

    // ── Export ────────────────────────────────────────────────

    pub(crate) fn export_csv(&mut self, today: NaiveDate) {
        match export::export(self.view.filtered(), &self.export_dir, today) {
            Ok(ExportOutcome::Empty) => self.notify_info("No transactions to export"),
            Ok(ExportOutcome::Written { path, count }) => {
                self.notify_success(format!("Exported {count} transactions to {}", path.display()));
            }
            Err(e) => {
                tracing::error!("export failed: {e:#}");
                self.notify_error("Failed to export transactions");
            }
        }
    }
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;

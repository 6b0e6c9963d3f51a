#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::time::{Duration, Instant};

use super::*;
use crate::ledger::FormField;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seed(db: &Database, n: u32) -> Vec<i64> {
    (1..=n)
        .map(|day| {
            db.insert_transaction(&NewTransaction {
                name: format!("item-{day}"),
                kind: TxnType::Expense,
                category: "Groceries".into(),
                date: date(2024, 1, day),
                amount: Decimal::from(day),
            })
            .unwrap()
        })
        .collect()
}

fn setup(n: u32) -> (Database, App, Vec<i64>) {
    let db = Database::open_in_memory().unwrap();
    let ids = seed(&db, n);
    let mut app = App::new(PathBuf::from("."));
    app.refresh_all(&db).unwrap();
    (db, app, ids)
}

fn notice(app: &App) -> (NoticeLevel, &str) {
    let n = app.notice.as_ref().unwrap();
    (n.level, n.message.as_str())
}

// ── Loading ───────────────────────────────────────────────────

#[test]
fn test_refresh_loads_newest_first() {
    let (_db, app, ids) = setup(3);
    let shown: Vec<i64> = app.view.filtered().iter().map(|t| t.id).collect();
    assert_eq!(shown, vec![ids[2], ids[1], ids[0]]);
    assert!(!app.categories.is_empty());
    assert_eq!(app.selected().unwrap().id, ids[2]);
}

// ── Editing ───────────────────────────────────────────────────

#[test]
fn test_save_edit_replaces_only_matching_record() {
    let (db, mut app, ids) = setup(3);
    let before = db.get_all_transactions().unwrap();

    app.move_down();
    app.begin_edit();
    assert_eq!(app.input_mode, InputMode::Editing);
    assert_eq!(app.edit.editing_id(), Some(ids[1]));

    let form = app.edit.form_mut().unwrap();
    form.name = "Renamed".into();
    form.amount = "42.10".into();
    app.save_edit(&db);

    assert_eq!(app.edit, EditState::Viewing);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(
        notice(&app),
        (NoticeLevel::Success, "Transaction updated successfully")
    );

    let after = db.get_all_transactions().unwrap();
    assert_eq!(after.len(), before.len());
    for (old, new) in before.iter().zip(&after) {
        if old.id == ids[1] {
            assert_eq!(new.name, "Renamed");
            assert_eq!(new.amount, dec!(42.10));
            assert_eq!(new.date, old.date);
        } else {
            assert_eq!(old, new);
        }
    }
    assert!(app.view.filtered().iter().any(|t| t.name == "Renamed"));
}

#[test]
fn test_save_edit_failure_stays_editing() {
    let (db, mut app, ids) = setup(2);
    app.begin_edit();
    app.edit.form_mut().unwrap().date = "not a date".into();
    app.save_edit(&db);

    assert_eq!(app.input_mode, InputMode::Editing);
    assert_eq!(app.edit.editing_id(), Some(ids[1]));
    assert_eq!(app.edit.form().unwrap().date, "not a date");
    assert_eq!(
        notice(&app),
        (NoticeLevel::Error, "Failed to update transaction")
    );
    assert_eq!(db.get_transaction(ids[1]).unwrap().unwrap().date, date(2024, 1, 2));
}

#[test]
fn test_cancel_edit_writes_nothing() {
    let (db, mut app, ids) = setup(2);
    app.begin_edit();
    let form = app.edit.form_mut().unwrap();
    form.field = FormField::Name;
    form.push_char('!');
    app.cancel_edit();

    assert_eq!(app.edit, EditState::Viewing);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(db.get_transaction(ids[1]).unwrap().unwrap().name, "item-2");
}

#[test]
fn test_begin_edit_on_empty_list() {
    let (_db, mut app, _) = setup(0);
    app.begin_edit();
    assert_eq!(app.edit, EditState::Viewing);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(notice(&app).0, NoticeLevel::Info);
}

// ── Deleting ──────────────────────────────────────────────────

#[test]
fn test_delete_confirmed_removes_only_that_record() {
    let (db, mut app, ids) = setup(3);
    app.request_delete();

    assert_eq!(app.input_mode, InputMode::Confirm);
    let confirmation = app.confirmation.clone().unwrap();
    assert_eq!(confirmation.title, "Confirm Deletion");
    assert_eq!(
        confirmation.action,
        PendingAction::DeleteTransaction { id: ids[2] }
    );

    app.confirm_yes(&db);

    let remaining: Vec<i64> = db
        .get_all_transactions()
        .unwrap()
        .iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(remaining, vec![ids[0], ids[1]]);
    assert_eq!(app.view.filtered().len(), 2);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.confirmation.is_none());
    assert_eq!(
        notice(&app),
        (NoticeLevel::Success, "Transaction deleted successfully")
    );
}

#[test]
fn test_delete_declined_keeps_everything() {
    let (db, mut app, _) = setup(3);
    app.request_delete();
    app.confirm_no();

    assert_eq!(db.get_transaction_count().unwrap(), 3);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.confirmation.is_none());
    assert_eq!(notice(&app), (NoticeLevel::Info, "Deletion cancelled"));
}

#[test]
fn test_delete_returns_cursor_to_top_row() {
    let (db, mut app, _) = setup(3);
    app.move_down();
    app.move_down();
    assert_eq!(app.cursor, 2);
    app.request_delete();
    app.confirm_yes(&db);
    assert_eq!(app.cursor, 0);
    assert_eq!(app.selected().unwrap().id, app.view.filtered()[0].id);
}

#[test]
fn test_save_on_later_page_returns_to_first_row_of_page_one() {
    let (db, mut app, _) = setup(25);
    app.next_page();
    app.next_page();
    for _ in 0..5 {
        app.move_down();
    }
    app.begin_edit();
    app.edit.form_mut().unwrap().name = "Edited".into();
    app.save_edit(&db);

    assert_eq!(app.view.page(), 1);
    assert_eq!(app.cursor, 0);
    assert_eq!(app.selected().unwrap().id, app.view.filtered()[0].id);
}

const BROKEN_ROW: &str = "INSERT INTO transactions (name, type, category, date, amount)
     VALUES ('broken', 'expense', '', 'garbage', '1')";

#[test]
fn test_save_with_failed_reload_reports_load_error() {
    let (db, mut app, ids) = setup(3);
    app.begin_edit();
    app.edit.form_mut().unwrap().name = "Renamed".into();
    db.execute_raw(BROKEN_ROW).unwrap();

    app.save_edit(&db);

    assert_eq!(db.get_transaction(ids[2]).unwrap().unwrap().name, "Renamed");
    assert_eq!(app.edit, EditState::Viewing);
    assert_eq!(
        notice(&app),
        (NoticeLevel::Error, "Failed to load transactions")
    );
    // The old rows stay on screen.
    assert_eq!(app.view.filtered().len(), 3);
}

#[test]
fn test_delete_with_failed_reload_reports_load_error() {
    let (db, mut app, ids) = setup(3);
    app.request_delete();
    db.execute_raw(BROKEN_ROW).unwrap();

    app.confirm_yes(&db);

    assert!(db.get_transaction(ids[2]).unwrap().is_none());
    assert_eq!(
        notice(&app),
        (NoticeLevel::Error, "Failed to load transactions")
    );
    assert_eq!(app.view.filtered().len(), 3);
}

// ── Filtering and paging ──────────────────────────────────────

#[test]
fn test_filter_change_resets_page_and_cursor() {
    let (_db, mut app, _) = setup(25);
    app.next_page();
    app.move_down();
    assert_eq!(app.view.page(), 2);

    app.set_start(Some(date(2024, 1, 3)));
    assert_eq!(app.view.page(), 1);
    assert_eq!(app.cursor, 0);

    app.set_end(Some(date(2024, 1, 7)));
    assert_eq!(app.view.filtered().len(), 5);

    app.clear_range();
    assert_eq!(app.view.filtered().len(), 25);
}

#[test]
fn test_cursor_stays_within_page() {
    let (_db, mut app, _) = setup(12);
    for _ in 0..20 {
        app.move_down();
    }
    assert_eq!(app.cursor, 9);

    app.next_page();
    assert_eq!(app.cursor, 0);
    app.move_down();
    app.move_down();
    assert_eq!(app.cursor, 1);
    app.next_page();
    assert_eq!(app.view.page(), 2);
    assert_eq!(app.cursor, 1);
}

// ── Export ────────────────────────────────────────────────────

#[test]
fn test_export_empty_filtered_list() {
    let dir = tempfile::tempdir().unwrap();
    let (_db, mut app, _) = setup(3);
    app.export_dir = dir.path().to_path_buf();
    app.set_start(Some(date(2030, 1, 1)));
    app.set_end(Some(date(2030, 1, 31)));

    app.export_csv(date(2026, 10, 19));

    assert_eq!(notice(&app), (NoticeLevel::Info, "No transactions to export"));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_export_uses_filtered_not_paged_list() {
    let dir = tempfile::tempdir().unwrap();
    let (_db, mut app, _) = setup(15);
    app.export_dir = dir.path().to_path_buf();

    app.export_csv(date(2026, 10, 19));

    assert_eq!(notice(&app).0, NoticeLevel::Success);
    let contents =
        std::fs::read_to_string(dir.path().join("transactions_2026-10-19.csv")).unwrap();
    assert_eq!(contents.lines().count(), 16);
}

// ── Notices ───────────────────────────────────────────────────

#[test]
fn test_notice_expires() {
    let (_db, mut app, _) = setup(0);
    app.notify_info("hello");
    let shown_at = app.notice.as_ref().unwrap().shown_at;

    app.expire_notice(shown_at + Duration::from_millis(500));
    assert!(app.notice.is_some());

    app.expire_notice(shown_at + NOTICE_TTL);
    assert!(app.notice.is_none());
}

#[test]
fn test_expire_without_notice_is_noop() {
    let (_db, mut app, _) = setup(0);
    app.expire_notice(Instant::now());
    assert!(app.notice.is_none());
}

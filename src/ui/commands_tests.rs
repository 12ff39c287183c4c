#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;
use crate::config::Config;
use crate::db::Database;
use crate::models::{Bill, Expense};

fn setup(count: usize) -> (App, Ledger) {
    let mut ledger = Ledger::load(Database::open_in_memory().unwrap()).unwrap();
    for i in 0..count {
        ledger
            .add(Expense::new(
                "Food",
                format!("item {i}"),
                dec!(10),
                Bill::No,
                "2024-03-01",
            ))
            .unwrap();
    }
    let mut app = App::new(&Config::default());
    app.refresh(&ledger);
    (app, ledger)
}

fn jpeg_url() -> String {
    BillImage::new("image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xD9]).to_data_url()
}

// ── Dispatch ──────────────────────────────────────────────────

#[test]
fn test_levenshtein() {
    assert_eq!(levenshtein("", ""), 0);
    assert_eq!(levenshtein("budget", "budget"), 0);
    assert_eq!(levenshtein("budgte", "budget"), 2);
    assert_eq!(levenshtein("", "save"), 4);
}

#[test]
fn test_unknown_command_suggests() {
    let (mut app, mut ledger) = setup(0);
    handle_command("exprot-csv", &mut app, &mut ledger).unwrap();
    assert_eq!(
        app.status_message,
        "Unknown command: :exprot-csv. Did you mean :export-csv?"
    );
}

#[test]
fn test_quit_and_help() {
    let (mut app, mut ledger) = setup(0);
    handle_command("help", &mut app, &mut ledger).unwrap();
    assert!(app.show_help);
    handle_command("q", &mut app, &mut ledger).unwrap();
    assert!(!app.running);
}

#[test]
fn test_every_command_has_description() {
    for (name, cmd) in COMMANDS.iter() {
        assert!(!cmd.description.is_empty(), "{name} has no description");
    }
}

// ── Add / edit form ───────────────────────────────────────────

#[test]
fn test_add_form_stays_open_after_submit() {
    let (mut app, mut ledger) = setup(0);
    handle_command("add", &mut app, &mut ledger).unwrap();
    {
        let form = app.form.as_mut().unwrap();
        form.description = "Coffee".into();
        form.amount = "4.5".into();
    }
    submit_form(&mut app, &mut ledger).unwrap();

    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger.get(0).unwrap().amount, dec!(4.5));
    assert_eq!(app.rows.len(), 1);
    assert_eq!(app.status_message, "Added #1: Coffee");
    assert_eq!(app.input_mode, InputMode::Editing);
    let form = app.form.as_ref().unwrap();
    assert!(form.description.is_empty());
    assert!(form.amount.is_empty());
}

#[test]
fn test_add_form_with_bad_date_keeps_input() {
    let (mut app, mut ledger) = setup(0);
    app.open_add_form();
    {
        let form = app.form.as_mut().unwrap();
        form.description = "Coffee".into();
        form.date = "01/02/2024".into();
    }
    assert!(submit_form(&mut app, &mut ledger).is_err());
    assert!(ledger.is_empty());
    assert_eq!(app.form.as_ref().unwrap().description, "Coffee");
}

#[test]
fn test_add_with_storage_failure_shows_record_unsaved() {
    let (mut app, mut ledger) = setup(0);
    ledger.database().set_read_only(true).unwrap();
    app.open_add_form();
    app.form.as_mut().unwrap().amount = "7".into();

    assert!(submit_form(&mut app, &mut ledger).is_err());
    assert_eq!(app.rows.len(), 1);
    assert!(app.unsaved);
    assert!(app.form.as_ref().unwrap().amount.is_empty());

    ledger.database().set_read_only(false).unwrap();
    handle_command("save", &mut app, &mut ledger).unwrap();
    assert!(!app.unsaved);
    assert_eq!(app.status_message, "All changes saved");
}

#[test]
fn test_edit_selected() {
    let (mut app, mut ledger) = setup(2);
    app.expense_index = 1;
    handle_command("edit", &mut app, &mut ledger).unwrap();
    assert_eq!(app.input_mode, InputMode::Editing);
    {
        let form = app.form.as_mut().unwrap();
        assert_eq!(form.mode, FormMode::Edit { index: 1 });
        assert_eq!(form.description, "item 1");
        form.description = "renamed".into();
    }
    submit_form(&mut app, &mut ledger).unwrap();

    assert_eq!(ledger.get(1).unwrap().description, "renamed");
    assert_eq!(app.rows[1].description, "renamed");
    assert!(app.form.is_none());
    assert_eq!(app.input_mode, InputMode::Normal);
}

#[test]
fn test_edit_with_nothing_selected() {
    let (mut app, mut ledger) = setup(0);
    handle_command("e", &mut app, &mut ledger).unwrap();
    assert!(app.form.is_none());
    assert_eq!(app.status_message, "No expense selected");
}

// ── Delete ────────────────────────────────────────────────────

#[test]
fn test_delete_asks_first() {
    let (mut app, mut ledger) = setup(3);
    app.expense_index = 1;
    handle_command("delete", &mut app, &mut ledger).unwrap();
    assert_eq!(app.input_mode, InputMode::Confirm);
    assert_eq!(app.confirm_message, "Delete #2 'item 1'?");
    assert_eq!(ledger.len(), 3);

    confirm_pending(&mut app, &mut ledger).unwrap();
    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger.get(1).unwrap().description, "item 2");
    assert_eq!(app.rows.len(), 2);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.status_message, "Deleted: item 1");
}

#[test]
fn test_delete_cancelled() {
    let (mut app, mut ledger) = setup(1);
    handle_command("d", &mut app, &mut ledger).unwrap();
    cancel_pending(&mut app);
    assert!(app.pending_action.is_none());
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(ledger.len(), 1);
}

#[test]
fn test_delete_last_row_moves_cursor_up() {
    let (mut app, mut ledger) = setup(2);
    app.expense_index = 1;
    handle_command("d", &mut app, &mut ledger).unwrap();
    confirm_pending(&mut app, &mut ledger).unwrap();
    assert_eq!(app.expense_index, 0);
}

// ── Budget / save ─────────────────────────────────────────────

#[test]
fn test_budget_command() {
    let (mut app, mut ledger) = setup(1);
    handle_command("budget ₹1,000", &mut app, &mut ledger).unwrap();
    assert_eq!(ledger.budget(), dec!(1000));
    assert_eq!(app.summary.remaining, dec!(990));
    assert_eq!(app.status_message, "Budget set to ₹1,000.00");
}

#[test]
fn test_budget_without_amount_shows_current() {
    let (mut app, mut ledger) = setup(0);
    handle_command("budget", &mut app, &mut ledger).unwrap();
    assert_eq!(ledger.budget(), dec!(0));
    assert!(app.status_message.starts_with("Budget: "));
}

#[test]
fn test_save_when_clean() {
    let (mut app, mut ledger) = setup(0);
    handle_command("save", &mut app, &mut ledger).unwrap();
    assert_eq!(app.status_message, "Nothing to save");
}

// ── Export / images ───────────────────────────────────────────

#[test]
fn test_export_csv_default_path() {
    let dir = tempfile::TempDir::new().unwrap();
    let (mut app, mut ledger) = setup(2);
    app.export_dir = dir.path().to_path_buf();
    handle_command("export-csv", &mut app, &mut ledger).unwrap();
    let written = std::fs::read_to_string(dir.path().join("expenses.csv")).unwrap();
    assert_eq!(written.lines().count(), 3);
    assert!(app.status_message.starts_with("Exported 2 expenses"));
}

#[test]
fn test_export_pdf_explicit_path() {
    let dir = tempfile::TempDir::new().unwrap();
    let out = dir.path().join("report.pdf");
    let (mut app, mut ledger) = setup(1);
    handle_command(&format!("export-pdf {}", out.display()), &mut app, &mut ledger).unwrap();
    assert!(std::fs::read(&out).unwrap().starts_with(b"%PDF"));
}

#[test]
fn test_view_without_image() {
    let (mut app, mut ledger) = setup(1);
    handle_command("view", &mut app, &mut ledger).unwrap();
    assert!(app.preview.is_none());
    assert_eq!(app.status_message, "#1 has no bill image");
}

#[test]
fn test_view_and_save_image() {
    let dir = tempfile::TempDir::new().unwrap();
    let (mut app, mut ledger) = setup(1);
    ledger
        .add(Expense::new("Bills", "Power", dec!(50), Bill::Yes, "2024-03-02").with_image(jpeg_url()))
        .unwrap();
    app.refresh(&ledger);
    app.export_dir = dir.path().to_path_buf();
    app.expense_index = 1;

    handle_command("v", &mut app, &mut ledger).unwrap();
    let preview = app.preview.as_ref().unwrap();
    assert_eq!(preview.index, 1);
    assert_eq!(preview.description, "Power");
    assert!(preview.image.is_jpeg());

    handle_command("save-image", &mut app, &mut ledger).unwrap();
    let saved = std::fs::read(dir.path().join("bill-2.jpg")).unwrap();
    assert_eq!(saved, vec![0xFF, 0xD8, 0xFF, 0xD9]);
}

#[test]
fn test_view_corrupt_image_fails() {
    let (mut app, mut ledger) = setup(0);
    ledger
        .add(Expense::new("Bills", "x", dec!(1), Bill::Yes, "2024-03-02").with_image("not a url"))
        .unwrap();
    app.refresh(&ledger);
    assert!(handle_command("view", &mut app, &mut ledger).is_err());
    assert!(app.preview.is_none());
}

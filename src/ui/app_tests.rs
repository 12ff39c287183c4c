#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;
use crate::db::Database;
use crate::models::Expense;
use crate::summary::Tier;

fn ledger_with(count: usize) -> Ledger {
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
    ledger
}

#[test]
fn test_new_app_takes_settings_from_config() {
    let config = Config {
        currency: "$".into(),
        ..Config::default()
    };
    let app = App::new(&config);
    assert!(app.running);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.currency, "$");
    assert_eq!(app.expense_types, config.expense_types);
    assert!(app.rows.is_empty());
    assert_eq!(app.selected(), None);
}

#[test]
fn test_refresh_builds_rows_and_summary() {
    let mut ledger = ledger_with(2);
    ledger.set_budget(dec!(100)).unwrap();
    ledger
        .add(
            Expense::new("Bills", "Power", dec!(30), Bill::Yes, "2024-03-02")
                .with_image("data:image/jpeg;base64,AAAA"),
        )
        .unwrap();

    let mut app = App::new(&Config::default());
    app.refresh(&ledger);

    assert_eq!(app.rows.len(), 3);
    assert_eq!(app.rows[0].description, "item 0");
    assert!(!app.rows[0].has_image);
    assert_eq!(app.rows[2].kind, "Bills");
    assert_eq!(app.rows[2].amount, dec!(30));
    assert!(app.rows[2].has_image);

    assert_eq!(app.summary.total, dec!(50));
    assert_eq!(app.summary.remaining, dec!(50));
    assert_eq!(app.summary.tier, Tier::Warning);
    assert!(!app.unsaved);
}

#[test]
fn test_refresh_pulls_cursor_back_after_delete() {
    let mut ledger = ledger_with(3);
    let mut app = App::new(&Config::default());
    app.refresh(&ledger);
    app.expense_index = 2;
    assert_eq!(app.selected(), Some(2));

    ledger.delete(2).unwrap();
    app.refresh(&ledger);
    assert_eq!(app.expense_index, 1);

    ledger.delete(1).unwrap();
    ledger.delete(0).unwrap();
    app.refresh(&ledger);
    assert_eq!(app.expense_index, 0);
    assert_eq!(app.selected(), None);
}

#[test]
fn test_refresh_reports_unsaved_changes() {
    let mut ledger = ledger_with(1);
    ledger.database().set_read_only(true).unwrap();
    assert!(ledger.set_budget(dec!(5)).is_err());

    let mut app = App::new(&Config::default());
    app.refresh(&ledger);
    assert!(app.unsaved);
    assert_eq!(app.summary.budget, dec!(5));
}

#[test]
fn test_add_form_open_and_close() {
    let mut app = App::new(&Config::default());
    app.open_add_form();
    assert_eq!(app.input_mode, InputMode::Editing);
    let form = app.form.as_ref().unwrap();
    assert_eq!(form.kind(), "Food");

    app.close_form();
    assert!(app.form.is_none());
    assert_eq!(app.input_mode, InputMode::Normal);
}

#[test]
fn test_expense_page_leaves_room_for_borders() {
    let mut app = App::new(&Config::default());
    app.visible_rows = 10;
    assert_eq!(app.expense_page(), 7);
    app.visible_rows = 2;
    assert_eq!(app.expense_page(), 1);
}

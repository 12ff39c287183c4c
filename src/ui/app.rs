use rust_decimal::Decimal;
use std::path::PathBuf;

use super::form::ExpenseForm;
use super::util::clamp_cursor;
use crate::attachment::BillImage;
use crate::config::Config;
use crate::ledger::Ledger;
use crate::models::Bill;
use crate::summary::Summary;

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

/// Pending action that requires user confirmation.
#[derive(Debug, Clone)]
pub(crate) enum PendingAction {
    DeleteExpense { index: usize, description: String },
}

/// Display copy of one ledger record. Rebuilt from the ledger after every
/// mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExpenseRow {
    pub(crate) date: String,
    pub(crate) kind: String,
    pub(crate) description: String,
    pub(crate) amount: Decimal,
    pub(crate) bill: Bill,
    pub(crate) has_image: bool,
}

/// Bill image shown in the preview overlay.
#[derive(Debug, Clone)]
pub(crate) struct ImagePreview {
    pub(crate) index: usize,
    pub(crate) description: String,
    pub(crate) image: BillImage,
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,

    // Settings
    pub(crate) currency: String,
    pub(crate) expense_types: Vec<String>,
    pub(crate) export_dir: PathBuf,

    // Ledger view
    pub(crate) rows: Vec<ExpenseRow>,
    pub(crate) summary: Summary,
    pub(crate) unsaved: bool,
    pub(crate) expense_index: usize,
    pub(crate) expense_scroll: usize,

    // Popups
    pub(crate) form: Option<ExpenseForm>,
    pub(crate) preview: Option<ImagePreview>,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(config: &Config) -> Self {
        Self {
            running: true,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,

            currency: config.currency.clone(),
            expense_types: config.expense_types.clone(),
            export_dir: config.export_dir.clone(),

            rows: Vec::new(),
            summary: Summary::compute(&[], Decimal::ZERO),
            unsaved: false,
            expense_index: 0,
            expense_scroll: 0,

            form: None,
            preview: None,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    /// Re-read the ledger: rows, summary and the unsaved flag. The cursor
    /// is pulled back inside the list if records were removed.
    pub(crate) fn refresh(&mut self, ledger: &Ledger) {
        self.rows = ledger
            .list()
            .iter()
            .map(|e| ExpenseRow {
                date: e.date.clone(),
                kind: e.kind.clone(),
                description: e.description.clone(),
                amount: e.amount,
                bill: e.bill,
                has_image: e.has_image(),
            })
            .collect();
        self.summary = ledger.summary();
        self.unsaved = ledger.has_unsaved_changes();
        clamp_cursor(&mut self.expense_index, &mut self.expense_scroll, self.rows.len());
    }

    /// Index of the record under the cursor.
    pub(crate) fn selected(&self) -> Option<usize> {
        (self.expense_index < self.rows.len()).then_some(self.expense_index)
    }

    /// Rows that fit in the table (minus borders and header).
    pub(crate) fn expense_page(&self) -> usize {
        self.visible_rows.saturating_sub(3).max(1)
    }

    pub(crate) fn open_add_form(&mut self) {
        self.form = Some(ExpenseForm::new_add(&self.expense_types));
        self.input_mode = InputMode::Editing;
    }

    pub(crate) fn close_form(&mut self) {
        self.form = None;
        self.input_mode = InputMode::Normal;
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;

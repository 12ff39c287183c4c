use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::Context;

use super::app::{App, ImagePreview, InputMode, PendingAction};
use super::form::{ExpenseForm, FormMode};
use super::util::{format_amount, format_size};
use crate::attachment::BillImage;
use crate::export;
use crate::ledger::Ledger;
use crate::models::parse_amount;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Ledger) -> anyhow::Result<()>,
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

    register_command!("q", "Quit ExpenseTUI", cmd_quit, r);
    register_command!("quit", "Quit ExpenseTUI", cmd_quit, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!("add", "Open the add expense form", cmd_add, r);
    register_command!("a", "Open the add expense form", cmd_add, r);
    register_command!("edit", "Edit selected expense", cmd_edit, r);
    register_command!("e", "Edit selected expense", cmd_edit, r);
    register_command!("delete", "Delete selected expense", cmd_delete, r);
    register_command!("d", "Delete selected expense", cmd_delete, r);
    register_command!("view", "View bill image of selected expense", cmd_view, r);
    register_command!("v", "View bill image of selected expense", cmd_view, r);
    register_command!(
        "budget",
        "Set monthly budget (e.g. :budget 25000)",
        cmd_budget,
        r
    );
    register_command!(
        "export-csv",
        "Export expenses to CSV (e.g. :export-csv ~/expenses.csv)",
        cmd_export_csv,
        r
    );
    register_command!(
        "export-pdf",
        "Export expenses to PDF (e.g. :export-pdf ~/expenses.pdf)",
        cmd_export_pdf,
        r
    );
    register_command!(
        "save-image",
        "Save bill image of selected expense (e.g. :save-image ~/bill.jpg)",
        cmd_save_image,
        r
    );
    register_command!("save", "Retry writes that failed", cmd_save, r);

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, ledger: &mut Ledger) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, ledger)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
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

// ── Form and confirmation ────────────────────────────────────

/// Submit the open form. Adding clears the form and leaves it open for the
/// next record; editing closes it.
///
/// The view is refreshed before a ledger error is returned, since a failed
/// write still leaves the change in memory.
pub(crate) fn submit_form(app: &mut App, ledger: &mut Ledger) -> anyhow::Result<()> {
    let Some(form) = app.form.as_ref() else {
        return Ok(());
    };

    match form.mode {
        FormMode::Add => {
            let expense = form.to_expense()?;
            let description = expense.description.clone();
            let added = ledger.add(expense);
            app.refresh(ledger);
            if let Some(form) = app.form.as_mut() {
                form.clear();
            }
            let index = added?;
            app.set_status(format!("Added #{}: {description}", index + 1));
        }
        FormMode::Edit { index } => {
            let patch = form.to_patch()?;
            let updated = ledger.update(index, patch);
            app.refresh(ledger);
            app.close_form();
            updated?;
            app.set_status(format!("Updated #{}", index + 1));
        }
    }
    Ok(())
}

/// Carry out the action waiting on a yes answer.
pub(crate) fn confirm_pending(app: &mut App, ledger: &mut Ledger) -> anyhow::Result<()> {
    app.input_mode = InputMode::Normal;
    app.confirm_message.clear();
    let Some(action) = app.pending_action.take() else {
        return Ok(());
    };

    match action {
        PendingAction::DeleteExpense { index, description } => {
            let deleted = ledger.delete(index);
            app.refresh(ledger);
            deleted?;
            app.set_status(format!("Deleted: {description}"));
        }
    }
    Ok(())
}

pub(crate) fn cancel_pending(app: &mut App) {
    app.pending_action = None;
    app.confirm_message.clear();
    app.input_mode = InputMode::Normal;
    app.set_status("Cancelled");
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _ledger: &mut Ledger) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _ledger: &mut Ledger) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_add(_args: &str, app: &mut App, _ledger: &mut Ledger) -> anyhow::Result<()> {
    app.open_add_form();
    Ok(())
}

fn cmd_edit(_args: &str, app: &mut App, ledger: &mut Ledger) -> anyhow::Result<()> {
    let Some(index) = app.selected() else {
        app.set_status("No expense selected");
        return Ok(());
    };
    let expense = ledger.get(index)?;
    app.form = Some(ExpenseForm::for_edit(index, expense, &app.expense_types));
    app.input_mode = InputMode::Editing;
    Ok(())
}

fn cmd_delete(_args: &str, app: &mut App, _ledger: &mut Ledger) -> anyhow::Result<()> {
    let Some((index, row)) = app.selected().and_then(|i| app.rows.get(i).map(|r| (i, r))) else {
        app.set_status("No expense selected");
        return Ok(());
    };
    let description = row.description.clone();
    app.confirm_message = format!("Delete #{} '{description}'?", index + 1);
    app.pending_action = Some(PendingAction::DeleteExpense { index, description });
    app.input_mode = InputMode::Confirm;
    Ok(())
}

fn cmd_view(_args: &str, app: &mut App, ledger: &mut Ledger) -> anyhow::Result<()> {
    let Some(index) = app.selected() else {
        app.set_status("No expense selected");
        return Ok(());
    };
    let expense = ledger.get(index)?;
    let Some(url) = &expense.image else {
        app.set_status(format!("#{} has no bill image", index + 1));
        return Ok(());
    };
    let image = BillImage::from_data_url(url)
        .with_context(|| format!("Bill image of #{} is unreadable", index + 1))?;
    app.preview = Some(ImagePreview {
        index,
        description: expense.description.clone(),
        image,
    });
    Ok(())
}

fn cmd_budget(args: &str, app: &mut App, ledger: &mut Ledger) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status(format!(
            "Budget: {} (set with :budget <amount>)",
            format_amount(ledger.budget(), &app.currency)
        ));
        return Ok(());
    }

    let updated = ledger.set_budget(parse_amount(args));
    app.refresh(ledger);
    updated?;
    app.set_status(format!(
        "Budget set to {}",
        format_amount(ledger.budget(), &app.currency)
    ));
    Ok(())
}

fn cmd_export_csv(args: &str, app: &mut App, ledger: &mut Ledger) -> anyhow::Result<()> {
    let path = export_path(args, app, export::CSV_FILE_NAME);
    let count = export::export_csv(ledger.list(), &path)?;
    app.set_status(format!("Exported {count} expenses to {}", path.display()));
    Ok(())
}

fn cmd_export_pdf(args: &str, app: &mut App, ledger: &mut Ledger) -> anyhow::Result<()> {
    let path = export_path(args, app, export::PDF_FILE_NAME);
    let pages = export::export_pdf(ledger.list(), ledger.budget(), &app.currency, &path)?;
    app.set_status(format!(
        "Exported {} expenses ({pages} page{}) to {}",
        ledger.len(),
        if pages == 1 { "" } else { "s" },
        path.display()
    ));
    Ok(())
}

fn cmd_save_image(args: &str, app: &mut App, ledger: &mut Ledger) -> anyhow::Result<()> {
    let target = app.preview.as_ref().map(|p| p.index).or(app.selected());
    let Some(index) = target else {
        app.set_status("No expense selected");
        return Ok(());
    };
    let Some(url) = &ledger.get(index)?.image else {
        app.set_status(format!("#{} has no bill image", index + 1));
        return Ok(());
    };
    let image = BillImage::from_data_url(url)
        .with_context(|| format!("Bill image of #{} is unreadable", index + 1))?;

    let path = if args.is_empty() {
        app.export_dir
            .join(format!("bill-{}", index + 1))
            .with_extension(image.extension())
    } else {
        export::expand_home(Path::new(args))
    };
    image.save(&path)?;
    app.set_status(format!(
        "Saved {} to {}",
        format_size(image.size()),
        path.display()
    ));
    Ok(())
}

fn cmd_save(_args: &str, app: &mut App, ledger: &mut Ledger) -> anyhow::Result<()> {
    if !ledger.has_unsaved_changes() {
        app.set_status("Nothing to save");
        return Ok(());
    }
    let saved = ledger.save();
    app.refresh(ledger);
    saved?;
    app.set_status("All changes saved");
    Ok(())
}

fn export_path(args: &str, app: &App, file_name: &str) -> PathBuf {
    let explicit = (!args.is_empty()).then(|| Path::new(args));
    export::output_path(explicit, &app.export_dir, file_name)
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tracing::info;

use super::plain_amount;
use crate::models::Expense;

const HEADER: [&str; 5] = ["Type", "Description", "Amount", "Bill", "Date"];

/// Write the header and one row per expense. Fields are joined with commas
/// as-is: embedded commas or newlines are not quoted.
pub(crate) fn write_csv<W: Write>(expenses: &[Expense], writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    wtr.write_record(HEADER)
        .context("Failed to write CSV header")?;
    for expense in expenses {
        let amount = plain_amount(expense.amount);
        wtr.write_record([
            expense.kind.as_str(),
            expense.description.as_str(),
            amount.as_str(),
            expense.bill.as_str(),
            expense.date.as_str(),
        ])
        .context("Failed to write CSV row")?;
    }
    wtr.flush().context("Failed to flush CSV output")?;
    Ok(())
}

/// Export to a file, returning the number of rows written.
pub(crate) fn export_csv(expenses: &[Expense], path: &Path) -> Result<usize> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_csv(expenses, file)?;
    info!(path = %path.display(), rows = expenses.len(), "Exported CSV");
    Ok(expenses.len())
}

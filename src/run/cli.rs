use anyhow::{Context, Result};
use std::path::Path;

use crate::args::{
    AddArgs, BudgetArgs, Command, EditArgs, ExportArgs, ExportFormat, ImageArgs, RecordArgs,
};
use crate::attachment::BillImage;
use crate::config::Config;
use crate::export;
use crate::ledger::Ledger;
use crate::models::{parse_amount, parse_date, today, Bill, Expense, ExpensePatch};
use crate::ui::util::{format_amount, format_size, truncate};

pub(crate) fn as_cli(command: &Command, ledger: &mut Ledger, config: &Config) -> Result<()> {
    match command {
        Command::Add(args) => cli_add(args, ledger, config),
        Command::Edit(args) => cli_edit(args, ledger),
        Command::Delete(args) => cli_delete(args, ledger),
        Command::List => cli_list(ledger, config),
        Command::Budget(args) => cli_budget(args, ledger, config),
        Command::Summary => cli_summary(ledger, config),
        Command::Export(args) => cli_export(args, ledger, config),
        Command::Image(args) => cli_image(args, ledger),
        Command::Tui => anyhow::bail!("The TUI cannot be started from CLI mode"),
    }
}

/// Convert a 1-based record number into a ledger index.
pub(crate) fn record_index(number: usize) -> Result<usize> {
    number
        .checked_sub(1)
        .context("Record numbers start at 1")
}

fn cli_add(args: &AddArgs, ledger: &mut Ledger, config: &Config) -> Result<()> {
    let expense = build_expense(args, config)?;
    let summary_line = describe(&expense, &config.currency);
    let index = ledger.add(expense)?;
    println!("Added #{}: {summary_line}", index + 1);
    Ok(())
}

/// Build the record for `add`. The image file is read before anything is
/// stored, so an unreadable image adds nothing.
pub(crate) fn build_expense(args: &AddArgs, config: &Config) -> Result<Expense> {
    let kind = match args.kind() {
        Some(kind) => kind.trim().to_string(),
        None => config
            .expense_types
            .first()
            .cloned()
            .unwrap_or_default(),
    };
    let date = match args.date() {
        Some(raw) => {
            parse_date(raw).with_context(|| format!("Invalid date '{raw}', expected YYYY-MM-DD"))?
        }
        None => today(),
    };
    let bill = if args.bill() { Bill::Yes } else { Bill::No };
    let mut expense = Expense::new(
        kind,
        args.description().trim(),
        parse_amount(args.amount()),
        bill,
        date,
    );
    if let Some(path) = args.image() {
        let image = BillImage::from_path(path)?;
        expense = expense.with_image(image.to_data_url());
    }
    Ok(expense)
}

/// Build the patch for `edit` from the flags that were given.
pub(crate) fn build_patch(args: &EditArgs) -> Result<ExpensePatch> {
    let bill = match args.bill() {
        Some(raw) => Some(match raw.trim().to_lowercase().as_str() {
            "yes" | "y" => Bill::Yes,
            "no" | "n" => Bill::No,
            _ => anyhow::bail!("Invalid bill value '{raw}', expected yes or no"),
        }),
        None => None,
    };
    let date = match args.date() {
        Some(raw) => Some(
            parse_date(raw).with_context(|| format!("Invalid date '{raw}', expected YYYY-MM-DD"))?,
        ),
        None => None,
    };
    Ok(ExpensePatch {
        kind: args.kind().map(|k| k.trim().to_string()),
        description: args.description().map(|d| d.trim().to_string()),
        amount: args.amount().map(parse_amount),
        bill,
        date,
    })
}

fn cli_edit(args: &EditArgs, ledger: &mut Ledger) -> Result<()> {
    let index = record_index(args.number())?;
    let patch = build_patch(args)?;
    if patch.is_empty() {
        anyhow::bail!("Nothing to change. Pass at least one of --type, --description, --amount, --bill, --date");
    }
    ledger.update(index, patch)?;
    println!("Updated #{}", args.number());
    Ok(())
}

fn cli_delete(args: &RecordArgs, ledger: &mut Ledger) -> Result<()> {
    let index = record_index(args.number())?;
    let removed = ledger.delete(index)?;
    println!("Deleted #{}: {}", args.number(), removed.description);
    if index < ledger.len() {
        println!("Records after #{} moved up by one", args.number());
    }
    Ok(())
}

fn cli_list(ledger: &Ledger, config: &Config) -> Result<()> {
    if ledger.is_empty() {
        println!("No expenses");
        return Ok(());
    }

    println!(
        "{:<4} {:<10}  {:<14} {:<30} {:>14}  Bill",
        "#", "Date", "Type", "Description", "Amount"
    );
    println!("{}", "─".repeat(84));
    for (i, e) in ledger.list().iter().enumerate() {
        let bill = if e.has_image() {
            format!("{} (image)", e.bill)
        } else {
            e.bill.to_string()
        };
        println!(
            "{:<4} {:<10}  {:<14} {:<30} {:>14}  {bill}",
            i + 1,
            e.date,
            truncate(&e.kind, 14),
            truncate(&e.description, 30),
            format_amount(e.amount, &config.currency),
        );
    }
    Ok(())
}

fn cli_budget(args: &BudgetArgs, ledger: &mut Ledger, config: &Config) -> Result<()> {
    if let Some(raw) = args.amount() {
        ledger.set_budget(parse_amount(raw))?;
        println!("Budget set to {}", format_amount(ledger.budget(), &config.currency));
    } else {
        println!("Budget: {}", format_amount(ledger.budget(), &config.currency));
    }
    Ok(())
}

fn cli_summary(ledger: &Ledger, config: &Config) -> Result<()> {
    let summary = ledger.summary();
    let cur = &config.currency;

    println!("ExpenseTUI Summary");
    println!("{}", "─".repeat(40));
    println!("  Budget:     {}", format_amount(summary.budget, cur));
    println!("  Spent:      {}", format_amount(summary.total, cur));
    println!("  Remaining:  {}", format_amount(summary.remaining, cur));
    println!("  Left:       {} ({})", summary.label(), summary.tier);
    println!("  Expenses:   {}", ledger.len());
    Ok(())
}

fn cli_export(args: &ExportArgs, ledger: &Ledger, config: &Config) -> Result<()> {
    match args.format() {
        ExportFormat::Csv => {
            let path = export::output_path(args.path(), &config.export_dir, export::CSV_FILE_NAME);
            let rows = export::export_csv(ledger.list(), &path)?;
            println!("Exported {rows} expenses to {}", path.display());
        }
        ExportFormat::Pdf => {
            let path = export::output_path(args.path(), &config.export_dir, export::PDF_FILE_NAME);
            let pages = export::export_pdf(ledger.list(), ledger.budget(), &config.currency, &path)?;
            println!(
                "Exported {} expenses ({pages} page{}) to {}",
                ledger.len(),
                if pages == 1 { "" } else { "s" },
                path.display()
            );
        }
    }
    Ok(())
}

fn cli_image(args: &ImageArgs, ledger: &Ledger) -> Result<()> {
    let index = record_index(args.number())?;
    let expense = ledger.get(index)?;
    let Some(url) = &expense.image else {
        println!("#{} has no bill image", args.number());
        return Ok(());
    };
    let image = BillImage::from_data_url(url)
        .with_context(|| format!("Bill image of #{} is unreadable", args.number()))?;

    match args.save() {
        Some(path) => {
            let path = export::expand_home(path);
            image.save(&path)?;
            println!("Saved {} to {}", format_size(image.size()), path.display());
        }
        None => print_image_info(&image, args.number(), &expense.description),
    }
    Ok(())
}

fn print_image_info(image: &BillImage, number: usize, description: &str) {
    println!("Bill image for #{number}: {description}");
    println!("  Type:        {}", image.mime());
    println!("  Size:        {}", format_size(image.size()));
    match image.dimensions() {
        Some((w, h)) => println!("  Dimensions:  {w}x{h}"),
        None => println!("  Dimensions:  unknown"),
    }
    println!(
        "  Save with:   expensetui image {number} --save {}",
        Path::new("bill").with_extension(image.extension()).display()
    );
}

fn describe(expense: &Expense, currency: &str) -> String {
    format!(
        "{} | {} | {} | {}",
        expense.date,
        expense.kind,
        format_amount(expense.amount, currency),
        expense.description
    )
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;

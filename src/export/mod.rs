mod csv_export;
mod pdf_export;

use rust_decimal::Decimal;
use std::path::{Path, PathBuf};

pub(crate) use csv_export::export_csv;
pub(crate) use pdf_export::export_pdf;

pub(crate) const CSV_FILE_NAME: &str = "expenses.csv";
pub(crate) const PDF_FILE_NAME: &str = "expenses.pdf";

/// Shortest decimal form of an amount: `200`, `12.5`, `-50`.
pub(crate) fn plain_amount(amount: Decimal) -> String {
    amount.normalize().to_string()
}

/// Explicit output path if given, otherwise `file_name` inside `dir`.
pub(crate) fn output_path(explicit: Option<&Path>, dir: &Path, file_name: &str) -> PathBuf {
    match explicit {
        Some(path) => expand_home(path),
        None => dir.join(file_name),
    }
}

pub(crate) fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(dirs) = directories::UserDirs::new() {
            return dirs.home_dir().join(rest);
        }
    }
    path.to_path_buf()
}

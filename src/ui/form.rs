use anyhow::{Context, Result};
use std::path::Path;

use crate::attachment::BillImage;
use crate::models::{parse_amount, parse_date, today, Bill, Expense, ExpensePatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormMode {
    Add,
    Edit { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormField {
    Type,
    Description,
    Amount,
    Bill,
    Date,
    Image,
}

impl FormField {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Type => "Type",
            Self::Description => "Description",
            Self::Amount => "Amount",
            Self::Bill => "Bill",
            Self::Date => "Date",
            Self::Image => "Image file",
        }
    }

    /// Fields that cycle through fixed choices instead of taking text.
    pub(crate) fn is_choice(&self) -> bool {
        matches!(self, Self::Type | Self::Bill)
    }
}

/// State of the add form and the edit popup.
///
/// The image path field only exists while adding with the bill flag set;
/// editing never touches an attached image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExpenseForm {
    pub(crate) mode: FormMode,
    pub(crate) types: Vec<String>,
    pub(crate) type_index: usize,
    pub(crate) description: String,
    pub(crate) amount: String,
    pub(crate) bill: Bill,
    pub(crate) date: String,
    pub(crate) image_path: String,
    pub(crate) focus: FormField,
}

impl ExpenseForm {
    pub(crate) fn new_add(types: &[String]) -> Self {
        Self {
            mode: FormMode::Add,
            types: types.to_vec(),
            type_index: 0,
            description: String::new(),
            amount: String::new(),
            bill: Bill::No,
            date: today(),
            image_path: String::new(),
            focus: FormField::Type,
        }
    }

    /// Prefill from an existing record. A type missing from the configured
    /// list is kept as an extra choice.
    pub(crate) fn for_edit(index: usize, expense: &Expense, types: &[String]) -> Self {
        let mut types = types.to_vec();
        let type_index = match types.iter().position(|t| *t == expense.kind) {
            Some(i) => i,
            None => {
                types.push(expense.kind.clone());
                types.len() - 1
            }
        };
        Self {
            mode: FormMode::Edit { index },
            types,
            type_index,
            description: expense.description.clone(),
            amount: crate::export::plain_amount(expense.amount),
            bill: expense.bill,
            date: expense.date.clone(),
            image_path: String::new(),
            focus: FormField::Type,
        }
    }

    pub(crate) fn title(&self) -> String {
        match self.mode {
            FormMode::Add => " Add Expense ".into(),
            FormMode::Edit { index } => format!(" Edit Expense #{} ", index + 1),
        }
    }

    pub(crate) fn kind(&self) -> &str {
        self.types
            .get(self.type_index)
            .map(|s| s.as_str())
            .unwrap_or("")
    }

    /// Visible fields in display order.
    pub(crate) fn fields(&self) -> Vec<FormField> {
        let mut fields = vec![
            FormField::Type,
            FormField::Description,
            FormField::Amount,
            FormField::Bill,
            FormField::Date,
        ];
        if self.shows_image_field() {
            fields.push(FormField::Image);
        }
        fields
    }

    pub(crate) fn shows_image_field(&self) -> bool {
        self.mode == FormMode::Add && self.bill == Bill::Yes
    }

    pub(crate) fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Type => self.kind(),
            FormField::Description => &self.description,
            FormField::Amount => &self.amount,
            FormField::Bill => self.bill.as_str(),
            FormField::Date => &self.date,
            FormField::Image => &self.image_path,
        }
    }

    pub(crate) fn next_field(&mut self) {
        self.move_focus(1);
    }

    pub(crate) fn prev_field(&mut self) {
        self.move_focus(-1);
    }

    fn move_focus(&mut self, delta: isize) {
        let fields = self.fields();
        let len = fields.len() as isize;
        let pos = fields.iter().position(|f| *f == self.focus).unwrap_or(0) as isize;
        let next = (pos + delta).rem_euclid(len) as usize;
        self.focus = fields[next];
    }

    /// Step a choice field forwards or backwards.
    pub(crate) fn cycle(&mut self, delta: isize) {
        match self.focus {
            FormField::Type if !self.types.is_empty() => {
                let len = self.types.len() as isize;
                self.type_index = (self.type_index as isize + delta).rem_euclid(len) as usize;
            }
            FormField::Bill => {
                self.bill = self.bill.toggle();
                if self.bill == Bill::No {
                    self.image_path.clear();
                }
            }
            _ => {}
        }
    }

    pub(crate) fn input_char(&mut self, c: char) {
        match self.focus {
            FormField::Description => self.description.push(c),
            FormField::Amount => self.amount.push(c),
            FormField::Date => self.date.push(c),
            FormField::Image => self.image_path.push(c),
            FormField::Type | FormField::Bill => {
                if c == ' ' {
                    self.cycle(1);
                }
            }
        }
    }

    pub(crate) fn backspace(&mut self) {
        match self.focus {
            FormField::Description => {
                self.description.pop();
            }
            FormField::Amount => {
                self.amount.pop();
            }
            FormField::Date => {
                self.date.pop();
            }
            FormField::Image => {
                self.image_path.pop();
            }
            FormField::Type | FormField::Bill => {}
        }
    }

    fn validated_date(&self) -> Result<String> {
        parse_date(&self.date)
            .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", self.date))
    }

    /// Build the record to add. The image file is read here, so a bad path
    /// fails before anything reaches the ledger.
    pub(crate) fn to_expense(&self) -> Result<Expense> {
        let date = self.validated_date()?;
        let mut expense = Expense::new(
            self.kind(),
            self.description.trim(),
            parse_amount(&self.amount),
            self.bill,
            date,
        );
        let path = self.image_path.trim();
        if self.bill == Bill::Yes && !path.is_empty() {
            let path = crate::export::expand_home(Path::new(path));
            let image = BillImage::from_path(&path)?;
            expense = expense.with_image(image.to_data_url());
        }
        Ok(expense)
    }

    /// Patch carrying every form field except the image.
    pub(crate) fn to_patch(&self) -> Result<ExpensePatch> {
        Ok(ExpensePatch {
            kind: Some(self.kind().to_string()),
            description: Some(self.description.trim().to_string()),
            amount: Some(parse_amount(&self.amount)),
            bill: Some(self.bill),
            date: Some(self.validated_date()?),
        })
    }

    /// Reset to a blank add form, keeping the type list.
    pub(crate) fn clear(&mut self) {
        *self = Self::new_add(&self.types);
    }
}

#[cfg(test)]
#[path = "form_tests.rs"]
mod tests;

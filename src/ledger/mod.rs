use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::db::Database;
use crate::error::LedgerError;
use crate::models::{parse_amount, Expense, ExpensePatch};
use crate::summary::Summary;

pub(crate) const EXPENSES_KEY: &str = "expenses";
pub(crate) const BUDGET_KEY: &str = "budget";

pub(crate) type Result<T> = std::result::Result<T, LedgerError>;

/// The ordered expense list and the budget, written through to storage after
/// every mutation.
///
/// Records are identified by position. Deleting shifts every later record
/// down by one, so callers holding indices must refresh after a delete.
pub(crate) struct Ledger {
    db: Database,
    expenses: Vec<Expense>,
    budget: Decimal,
    unsaved_expenses: bool,
    unsaved_budget: bool,
}

impl Ledger {
    /// Load the ledger from storage. Missing keys yield an empty ledger and a
    /// zero budget.
    pub(crate) fn load(db: Database) -> Result<Self> {
        let expenses = match db.get_value(EXPENSES_KEY)? {
            Some(json) => serde_json::from_str(&json).map_err(|source| LedgerError::Corrupt {
                key: EXPENSES_KEY,
                source,
            })?,
            None => Vec::new(),
        };
        let budget = db
            .get_value(BUDGET_KEY)?
            .map(|raw| parse_amount(&raw))
            .unwrap_or(Decimal::ZERO);

        let ledger = Self {
            db,
            expenses,
            budget,
            unsaved_expenses: false,
            unsaved_budget: false,
        };
        debug!(
            expenses = ledger.expenses.len(),
            budget = %ledger.budget,
            "Loaded ledger"
        );
        Ok(ledger)
    }

    pub(crate) fn list(&self) -> &[Expense] {
        &self.expenses
    }

    pub(crate) fn len(&self) -> usize {
        self.expenses.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    pub(crate) fn get(&self, index: usize) -> Result<&Expense> {
        self.expenses.get(index).ok_or(LedgerError::IndexOutOfRange {
            index,
            len: self.expenses.len(),
        })
    }

    pub(crate) fn budget(&self) -> Decimal {
        self.budget
    }

    pub(crate) fn summary(&self) -> Summary {
        Summary::compute(&self.expenses, self.budget)
    }

    /// Append an expense and persist. Returns the new record's index.
    ///
    /// On a storage failure the expense stays in memory and the error is
    /// returned; `save` retries the write.
    pub(crate) fn add(&mut self, expense: Expense) -> Result<usize> {
        self.expenses.push(expense);
        let index = self.expenses.len() - 1;
        info!(index, "Added expense");
        self.write_expenses()?;
        Ok(index)
    }

    /// Merge `patch` over the expense at `index` and persist.
    pub(crate) fn update(&mut self, index: usize, patch: ExpensePatch) -> Result<()> {
        let len = self.expenses.len();
        let expense = self
            .expenses
            .get_mut(index)
            .ok_or(LedgerError::IndexOutOfRange { index, len })?;
        patch.apply(expense);
        info!(index, "Updated expense");
        self.write_expenses()
    }

    /// Remove the expense at `index` and persist. Returns the removed record.
    pub(crate) fn delete(&mut self, index: usize) -> Result<Expense> {
        if index >= self.expenses.len() {
            return Err(LedgerError::IndexOutOfRange {
                index,
                len: self.expenses.len(),
            });
        }
        let removed = self.expenses.remove(index);
        info!(index, "Deleted expense");
        self.write_expenses()?;
        Ok(removed)
    }

    /// Replace the budget and persist. Negative values are stored as zero.
    pub(crate) fn set_budget(&mut self, budget: Decimal) -> Result<()> {
        self.budget = if budget.is_sign_negative() {
            Decimal::ZERO
        } else {
            budget
        };
        info!(budget = %self.budget, "Set budget");
        self.write_budget()
    }

    pub(crate) fn has_unsaved_changes(&self) -> bool {
        self.unsaved_expenses || self.unsaved_budget
    }

    /// Retry any write that previously failed. A no-op when everything is saved.
    pub(crate) fn save(&mut self) -> Result<()> {
        if self.unsaved_expenses {
            self.write_expenses()?;
        }
        if self.unsaved_budget {
            self.write_budget()?;
        }
        Ok(())
    }

    fn write_expenses(&mut self) -> Result<()> {
        self.unsaved_expenses = true;
        let json = serde_json::to_string(&self.expenses)?;
        if let Err(e) = self.db.set_value(EXPENSES_KEY, &json) {
            warn!("Failed to persist expenses: {e}");
            return Err(e.into());
        }
        self.unsaved_expenses = false;
        Ok(())
    }

    fn write_budget(&mut self) -> Result<()> {
        self.unsaved_budget = true;
        if let Err(e) = self.db.set_value(BUDGET_KEY, &self.budget.normalize().to_string()) {
            warn!("Failed to persist budget: {e}");
            return Err(e.into());
        }
        self.unsaved_budget = false;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn database(&self) -> &Database {
        &self.db
    }

    #[cfg(test)]
    pub(crate) fn into_database(self) -> Database {
        self.db
    }
}

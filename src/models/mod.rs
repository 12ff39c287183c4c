mod expense;

pub(crate) use expense::{parse_amount, parse_date, today, Bill, Expense, ExpensePatch};

#[cfg(test)]
mod tests;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Whether a receipt was captured for an expense. Stored as `"Yes"`/`"No"`;
/// anything else on disk reads as `No`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String")]
pub(crate) enum Bill {
    Yes,
    #[default]
    No,
}

impl Bill {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }

    pub(crate) fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "yes" | "y" | "true" | "1" => Self::Yes,
            _ => Self::No,
        }
    }

    pub(crate) fn toggle(self) -> Self {
        match self {
            Self::Yes => Self::No,
            Self::No => Self::Yes,
        }
    }
}

impl From<String> for Bill {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl std::fmt::Display for Bill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single ledger entry. Field names on disk match the browser format:
/// `type`, `description`, `amount`, `bill`, `date`, `image`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Expense {
    #[serde(rename = "type", default)]
    pub(crate) kind: String,
    #[serde(default)]
    pub(crate) description: String,
    #[serde(with = "amount_json", default)]
    pub(crate) amount: Decimal,
    #[serde(default)]
    pub(crate) bill: Bill,
    #[serde(default)]
    pub(crate) date: String,
    /// Inline `data:` URL of the bill image.
    #[serde(default)]
    pub(crate) image: Option<String>,
}

impl Expense {
    pub(crate) fn new(
        kind: impl Into<String>,
        description: impl Into<String>,
        amount: Decimal,
        bill: Bill,
        date: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            description: description.into(),
            amount,
            bill,
            date: date.into(),
            image: None,
        }
    }

    pub(crate) fn with_image(mut self, data_url: impl Into<String>) -> Self {
        self.image = Some(data_url.into());
        self
    }

    pub(crate) fn has_image(&self) -> bool {
        self.image.is_some()
    }
}

/// Partial update for an expense. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ExpensePatch {
    pub(crate) kind: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) amount: Option<Decimal>,
    pub(crate) bill: Option<Bill>,
    pub(crate) date: Option<String>,
}

impl ExpensePatch {
    pub(crate) fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.description.is_none()
            && self.amount.is_none()
            && self.bill.is_none()
            && self.date.is_none()
    }

    pub(crate) fn apply(self, expense: &mut Expense) {
        if let Some(kind) = self.kind {
            expense.kind = kind;
        }
        if let Some(description) = self.description {
            expense.description = description;
        }
        if let Some(amount) = self.amount {
            expense.amount = amount;
        }
        if let Some(bill) = self.bill {
            expense.bill = bill;
        }
        if let Some(date) = self.date {
            expense.date = date;
        }
    }
}

/// Coerce user input into a non-negative amount.
///
/// Currency symbols and thousands separators are ignored. Anything that is not
/// a number, and any negative number, becomes zero.
pub(crate) fn parse_amount(input: &str) -> Decimal {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | '₹' | ','))
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Decimal::ZERO;
    }
    let value = Decimal::from_str(cleaned)
        .or_else(|_| Decimal::from_scientific(cleaned))
        .unwrap_or(Decimal::ZERO);
    if value.is_sign_negative() {
        Decimal::ZERO
    } else {
        value
    }
}

/// Validate a `YYYY-MM-DD` calendar date, returning it zero-padded.
pub(crate) fn parse_date(input: &str) -> Option<String> {
    chrono::NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .ok()
        .map(|d| d.format("%Y-%m-%d").to_string())
}

pub(crate) fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// Amounts are stored as JSON numbers and read back leniently: numbers,
/// numeric strings, `null` and garbage all load.
mod amount_json {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::{Number, Value};
    use std::str::FromStr;

    pub(super) fn serialize<S: Serializer>(amount: &Decimal, s: S) -> Result<S::Ok, S::Error> {
        let text = amount.normalize().to_string();
        match Number::from_str(&text) {
            // Only use a number when it survives the float round trip.
            Ok(n) if n.to_string() == text => n.serialize(s),
            _ => s.serialize_str(&text),
        }
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Decimal, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => super::parse_amount(&n.to_string()),
            Value::String(s) => super::parse_amount(&s),
            _ => Decimal::ZERO,
        })
    }
}

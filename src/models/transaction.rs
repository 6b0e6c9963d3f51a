use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised when text cannot be turned into a model value.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ModelError {
    #[error("unknown transaction type '{0}' (expected income or expense)")]
    UnknownType(String),

    #[error("invalid date '{0}' (expected dd/mm/yyyy or yyyy-mm-dd)")]
    InvalidDate(String),
}

/// Storage format for dates, also accepted as input.
pub(crate) const ISO_DATE: &str = "%Y-%m-%d";
/// Date picker format, accepted as input.
pub(crate) const PICKER_DATE: &str = "%d/%m/%Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TxnType {
    Income,
    Expense,
}

impl TxnType {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    pub(crate) fn parse(s: &str) -> Result<Self, ModelError> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(ModelError::UnknownType(s.to_string())),
        }
    }

    pub(crate) fn toggle(self) -> Self {
        match self {
            Self::Income => Self::Expense,
            Self::Expense => Self::Income,
        }
    }
}

impl std::fmt::Display for TxnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse a user-entered calendar date. Accepts `dd/mm/yyyy` and `yyyy-mm-dd`.
pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, ModelError> {
    let trimmed = s.trim();
    NaiveDate::parse_from_str(trimmed, ISO_DATE)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, PICKER_DATE))
        .map_err(|_| ModelError::InvalidDate(s.to_string()))
}

/// A stored transaction. `id` is the unique key; updates replace every field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Transaction {
    pub id: i64,
    pub name: String,
    pub kind: TxnType,
    /// Name of a category; empty when none was chosen.
    pub category: String,
    pub date: NaiveDate,
    /// Always non-negative; `kind` carries the direction.
    pub amount: Decimal,
}

impl Transaction {
    /// Short Indian-English date, e.g. `5/1/2024` for 5 January 2024.
    pub(crate) fn short_date(&self) -> String {
        self.date.format("%-d/%-m/%Y").to_string()
    }

    pub(crate) fn is_income(&self) -> bool {
        self.kind == TxnType::Income
    }
}

/// A transaction that has not been stored yet.
#[derive(Debug, Clone)]
pub(crate) struct NewTransaction {
    pub name: String,
    pub kind: TxnType,
    pub category: String,
    pub date: NaiveDate,
    pub amount: Decimal,
}

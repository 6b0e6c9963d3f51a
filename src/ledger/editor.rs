//! Inline row editing. At most one row is edited at a time.

use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

use crate::models::{parse_date, Category, ModelError, Transaction, TxnType, ISO_DATE};

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum FormError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("amount must not be negative: {0}")]
    NegativeAmount(Decimal),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormField {
    Name,
    Type,
    Category,
    Date,
    Amount,
}

impl FormField {
    pub(crate) fn all() -> &'static [FormField] {
        &[
            Self::Name,
            Self::Type,
            Self::Category,
            Self::Date,
            Self::Amount,
        ]
    }

    pub(crate) fn next(self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|f| *f == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    pub(crate) fn prev(self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|f| *f == self).unwrap_or(0);
        all[(idx + all.len() - 1) % all.len()]
    }

    /// Whether the field takes typed text rather than a choice.
    pub(crate) fn is_text(self) -> bool {
        matches!(self, Self::Name | Self::Date | Self::Amount)
    }
}

/// Working copy of a record while its row is being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EditForm {
    pub name: String,
    pub kind: TxnType,
    pub category: String,
    pub date: String,
    pub amount: String,
    pub field: FormField,
}

impl EditForm {
    pub(crate) fn from_transaction(txn: &Transaction) -> Self {
        Self {
            name: txn.name.clone(),
            kind: txn.kind,
            category: txn.category.clone(),
            date: txn.date.format(ISO_DATE).to_string(),
            amount: txn.amount.to_string(),
            field: FormField::Name,
        }
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.field {
            FormField::Name => Some(&mut self.name),
            FormField::Date => Some(&mut self.date),
            FormField::Amount => Some(&mut self.amount),
            FormField::Type | FormField::Category => None,
        }
    }

    pub(crate) fn push_char(&mut self, c: char) {
        if let Some(text) = self.text_mut() {
            text.push(c);
        }
    }

    pub(crate) fn pop_char(&mut self) {
        if let Some(text) = self.text_mut() {
            text.pop();
        }
    }

    /// Step the focused choice field. Category cycles through "no category"
    /// followed by every known category name.
    pub(crate) fn cycle(&mut self, delta: i32, categories: &[Category]) {
        match self.field {
            FormField::Type => self.kind = self.kind.toggle(),
            FormField::Category => {
                let mut options: Vec<&str> = vec![""];
                options.extend(categories.iter().map(|c| c.name.as_str()));
                let len = options.len() as i32;
                let current = options
                    .iter()
                    .position(|o| *o == self.category)
                    .unwrap_or(0) as i32;
                let next = (current + delta).rem_euclid(len) as usize;
                self.category = options[next].to_string();
            }
            _ => {}
        }
    }

    /// Build the full replacement record for `id`. An amount that does not
    /// parse counts as zero, like an empty number input.
    pub(crate) fn to_transaction(&self, id: i64) -> Result<Transaction, FormError> {
        let date = parse_date(&self.date)?;
        let amount = Decimal::from_str(self.amount.trim()).unwrap_or(Decimal::ZERO);
        if amount < Decimal::ZERO {
            return Err(FormError::NegativeAmount(amount));
        }
        Ok(Transaction {
            id,
            name: self.name.clone(),
            kind: self.kind,
            category: self.category.clone(),
            date,
            amount,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) enum EditState {
    #[default]
    Viewing,
    Editing {
        id: i64,
        form: EditForm,
    },
}

impl EditState {
    /// Start editing `txn`, dropping any edit already in progress.
    pub(crate) fn begin(&mut self, txn: &Transaction) {
        *self = Self::Editing {
            id: txn.id,
            form: EditForm::from_transaction(txn),
        };
    }

    pub(crate) fn cancel(&mut self) {
        *self = Self::Viewing;
    }

    pub(crate) fn editing_id(&self) -> Option<i64> {
        match self {
            Self::Editing { id, .. } => Some(*id),
            Self::Viewing => None,
        }
    }

    pub(crate) fn form(&self) -> Option<&EditForm> {
        match self {
            Self::Editing { form, .. } => Some(form),
            Self::Viewing => None,
        }
    }

    pub(crate) fn form_mut(&mut self) -> Option<&mut EditForm> {
        match self {
            Self::Editing { form, .. } => Some(form),
            Self::Viewing => None,
        }
    }

    /// The record the form currently describes.
    pub(crate) fn pending(&self) -> Option<Result<Transaction, FormError>> {
        match self {
            Self::Editing { id, form } => Some(form.to_transaction(*id)),
            Self::Viewing => None,
        }
    }
}

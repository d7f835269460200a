//! Dashboard analytics derived from transactions.

mod income;

pub use income::{IncomeByCategory, OTHERS_BUCKET, UNCATEGORIZED};

use chrono::NaiveDate;
use dompet_shared::types::{CategoryId, TransactionId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::budget::CategoryType;

/// Transaction direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    /// Money in.
    Income,
    /// Money out.
    Expense,
    /// Between own accounts.
    Transfer,
}

/// Category reference embedded in a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionCategory {
    /// Category ID.
    pub id: CategoryId,
    /// Category name.
    pub name: String,
    /// Income or expense.
    #[serde(rename = "type", default)]
    pub category_type: Option<CategoryType>,
}

/// A transaction as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction ID.
    pub id: TransactionId,
    /// Direction.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Amount, always positive.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Booking date.
    pub transaction_date: NaiveDate,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Category, absent for transfers and uncategorized entries.
    #[serde(default)]
    pub category: Option<TransactionCategory>,
    /// Flat category name sent by older backends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
}

impl Transaction {
    /// Category name, from the embedded category or the flat field.
    #[must_use]
    pub fn category_label(&self) -> Option<&str> {
        self.category
            .as_ref()
            .map(|c| c.name.as_str())
            .or(self.category_name.as_deref())
            .filter(|name| !name.is_empty())
    }
}

/// One page of `/transactions`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransactionPage {
    /// Transactions on this page.
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    /// Total number of pages, when the backend reports it.
    #[serde(default)]
    pub total_pages: Option<u32>,
}

/// Income total for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeCategoryTotal {
    /// Category name.
    pub category_name: String,
    /// Summed income.
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

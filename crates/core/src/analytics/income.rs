//! Income by category, derived from transaction pages.

use std::collections::HashMap;

use rust_decimal::Decimal;

use super::{IncomeCategoryTotal, Transaction, TransactionType};

/// Name used for income without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Name of the bucket that collects categories beyond the top N.
pub const OTHERS_BUCKET: &str = "Lainnya";

/// Accumulates income per category name across pages.
#[derive(Debug, Clone, Default)]
pub struct IncomeByCategory {
    sums: HashMap<String, Decimal>,
}

impl IncomeByCategory {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the income transactions of one page.
    pub fn add_page(&mut self, transactions: &[Transaction]) {
        for transaction in transactions {
            self.add(transaction);
        }
    }

    /// Adds one transaction; non-income transactions are ignored.
    pub fn add(&mut self, transaction: &Transaction) {
        if transaction.transaction_type != TransactionType::Income {
            return;
        }
        let name = transaction.category_label().unwrap_or(UNCATEGORIZED);
        *self.sums.entry(name.to_string()).or_default() += transaction.amount;
    }

    /// Returns true if no income has been seen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sums.is_empty()
    }

    /// Sorted totals, largest first, with everything past `top_n` folded
    /// into a single [`OTHERS_BUCKET`] entry.
    #[must_use]
    pub fn finish(self, top_n: usize) -> Vec<IncomeCategoryTotal> {
        let mut totals: Vec<IncomeCategoryTotal> = self
            .sums
            .into_iter()
            .map(|(category_name, total)| IncomeCategoryTotal {
                category_name,
                total,
            })
            .collect();
        // Name breaks ties so the output does not depend on hash order.
        totals.sort_by(|a, b| {
            b.total
                .cmp(&a.total)
                .then_with(|| a.category_name.cmp(&b.category_name))
        });

        if totals.len() > top_n {
            let rest: Decimal = totals.drain(top_n..).map(|entry| entry.total).sum();
            totals.push(IncomeCategoryTotal {
                category_name: OTHERS_BUCKET.to_string(),
                total: rest,
            });
        }

        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{TransactionCategory, TransactionPage};
    use chrono::NaiveDate;
    use dompet_shared::types::{CategoryId, TransactionId};
    use rust_decimal_macros::dec;

    fn transaction(
        kind: TransactionType,
        amount: Decimal,
        category: Option<&str>,
    ) -> Transaction {
        Transaction {
            id: TransactionId::new(1),
            transaction_type: kind,
            amount,
            transaction_date: NaiveDate::from_ymd_opt(2024, 12, 5).unwrap(),
            description: None,
            category: category.map(|name| TransactionCategory {
                id: CategoryId::new(1),
                name: name.to_string(),
                category_type: None,
            }),
            category_name: None,
        }
    }

    #[test]
    fn test_sums_income_only() {
        let mut acc = IncomeByCategory::new();
        acc.add_page(&[
            transaction(TransactionType::Income, dec!(5000000), Some("Gaji")),
            transaction(TransactionType::Income, dec!(250000), Some("Gaji")),
            transaction(TransactionType::Expense, dec!(100000), Some("Gaji")),
            transaction(TransactionType::Income, dec!(75000), None),
        ]);

        let totals = acc.finish(8);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].category_name, "Gaji");
        assert_eq!(totals[0].total, dec!(5250000));
        assert_eq!(totals[1].category_name, UNCATEGORIZED);
    }

    #[test]
    fn test_tail_folds_into_others() {
        let mut acc = IncomeByCategory::new();
        for (i, amount) in [100, 90, 80, 70].into_iter().enumerate() {
            let name = format!("C{i}");
            acc.add(&transaction(
                TransactionType::Income,
                Decimal::from(amount),
                Some(&name),
            ));
        }

        let totals = acc.finish(2);
        let names: Vec<&str> = totals.iter().map(|t| t.category_name.as_str()).collect();
        assert_eq!(names, vec!["C0", "C1", OTHERS_BUCKET]);
        assert_eq!(totals[2].total, dec!(150));
    }

    #[test]
    fn test_exactly_top_n_has_no_others() {
        let mut acc = IncomeByCategory::new();
        acc.add(&transaction(TransactionType::Income, dec!(1), Some("A")));
        acc.add(&transaction(TransactionType::Income, dec!(2), Some("B")));
        assert_eq!(acc.finish(2).len(), 2);
    }

    #[test]
    fn test_flat_category_name_and_wire_format() {
        let page: TransactionPage = serde_json::from_str(
            r#"{"transactions": [{"id": 3, "type": "INCOME", "amount": 1500000.0,
                "transaction_date": "2024-12-01", "category": null,
                "category_name": "Bonus"}]}"#,
        )
        .unwrap();
        assert_eq!(page.total_pages, None);

        let mut acc = IncomeByCategory::new();
        acc.add_page(&page.transactions);
        let totals = acc.finish(8);
        assert_eq!(totals[0].category_name, "Bonus");
        assert_eq!(totals[0].total, dec!(1500000));
    }
}

use rust_decimal::Decimal;

use crate::models::ledger::CategoryTotal;

/// Aggregate view over all transactions. Computed on demand and never stored.
#[derive(Clone, Debug, PartialEq)]
pub struct Statistics {
    total_income: Decimal,
    total_expense: Decimal,
    categories: Vec<CategoryTotal>,
}

impl Statistics {
    /// # Arguments
    /// * `total_income` - Sum of every income transaction.
    /// * `total_expense` - Sum of every expense transaction.
    /// * `categories` - Expense totals per category, largest first.
    pub fn new(
        total_income: Decimal,
        total_expense: Decimal,
        categories: Vec<CategoryTotal>,
    ) -> Self {
        Self {
            total_income,
            total_expense,
            categories,
        }
    }

    pub fn total_income(&self) -> Decimal {
        self.total_income
    }

    pub fn total_expense(&self) -> Decimal {
        self.total_expense
    }

    pub fn balance(&self) -> Decimal {
        self.total_income - self.total_expense
    }

    pub fn categories(&self) -> &[CategoryTotal] {
        &self.categories
    }
}

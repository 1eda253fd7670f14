use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

/// A transaction that has been persisted in a repository.
#[derive(Clone, Debug, PartialEq, sqlx::FromRow)]
pub struct Transaction {
    pub id: i32,
    pub description: String,
    pub amount: Decimal,
    #[sqlx(rename = "type")]
    pub kind: String,
    pub category: String,
    pub date: NaiveDate,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

/// The summed amount of all transactions sharing a category.
#[derive(Clone, Debug, PartialEq, sqlx::FromRow)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

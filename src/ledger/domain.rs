pub mod statistics;
pub mod transactions;

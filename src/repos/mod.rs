#[cfg(test)]
pub mod memory;
pub mod transactions;

pub use transactions::DynTransactionRepo;

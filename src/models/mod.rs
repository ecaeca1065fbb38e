pub mod balance;
pub mod employee;
pub mod punch;
pub mod quota;
pub mod schedule;
pub mod slot;
pub mod summary;

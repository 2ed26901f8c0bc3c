pub mod address;
pub mod balance;
pub mod faucet;
pub mod history;
pub mod transactions;
pub mod units;
pub mod validators;
pub mod wallet;

pub mod contract;
pub mod error;
pub mod execute;
pub mod gateway;
pub mod guard;
pub mod ledger;
pub mod msg;
pub mod oracle;
pub mod pool;
pub mod query;
pub mod state;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use crate::error::ContractError;

pub mod fee;
pub mod oracle;
pub mod token;
pub mod types;

pub use fee::{format_units, split_prize, PrizeSplit, MAX_HOUSE_FEE_BPS};
pub use types::{RafflePhase, Reward, VrfParams};

//! CW20-compatible wire types for the external asset ledger.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint128;

#[cw_serde]
pub enum TokenExecuteMsg {
    /// Move tokens from the calling contract to `recipient`.
    Transfer { recipient: String, amount: Uint128 },
    /// Move tokens from `owner` to `recipient` using a prior allowance.
    TransferFrom {
        owner: String,
        recipient: String,
        amount: Uint128,
    },
}

#[cw_serde]
pub enum TokenQueryMsg {
    Balance { address: String },
    TokenInfo {},
}

#[cw_serde]
pub struct BalanceResponse {
    pub balance: Uint128,
}

#[cw_serde]
pub struct TokenInfoResponse {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: Uint128,
}

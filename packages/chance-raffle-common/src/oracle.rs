use cosmwasm_schema::cw_serde;

/// Execute message understood by the randomness oracle contract.
///
/// The oracle answers asynchronously by executing `FulfillRandomness
/// { request_id, random_words }` on the requesting contract.
#[cw_serde]
pub enum OracleExecuteMsg {
    RequestRandomness {
        request_id: u64,
        key_hash: String,
        num_words: u32,
        request_confirmations: u16,
        callback_gas_limit: u64,
    },
}

use cosmwasm_schema::cw_serde;

/// An off-ledger reward: what is granted and how many units of it.
#[cw_serde]
pub struct Reward {
    pub name: String,
    pub amount: u64,
}

/// The lifecycle phase of the raffle as a whole.
#[cw_serde]
pub enum RafflePhase {
    /// No round is accepting entries: before the first round, after a draw
    /// resolves, or while an emergency pause is in effect.
    Idle,
    /// The current round accepts deposits.
    Open,
    /// Entry is closed and one randomness request is outstanding.
    AwaitingRandomness,
}

/// Drawing parameters forwarded to the oracle with every randomness request.
#[cw_serde]
pub struct VrfParams {
    pub key_hash: String,
    pub num_words: u32,
    pub request_confirmations: u16,
    pub callback_gas_limit: u64,
}

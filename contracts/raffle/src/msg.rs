use chance_raffle_common::types::{RafflePhase, Reward, VrfParams};
use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Uint128, Uint256};

use crate::state::{Config, Round};

#[cw_serde]
pub struct InstantiateMsg {
    /// CW20-compatible token contract holding deposits
    pub token: String,
    /// Randomness oracle contract
    pub oracle: String,
    pub house_fee_bps: u16,
    pub vrf: VrfParams,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Open a new round. Admin only.
    OpenRound {
        ticket_price: Uint128,
        generic_reward: Reward,
        winner_reward: Reward,
    },
    /// Close entry and request randomness. Admin only.
    CloseRound {},
    /// Deliver randomness for the pending request. Oracle only.
    FulfillRandomness {
        request_id: u64,
        random_words: Vec<Uint256>,
    },
    /// Buy `amount / ticket_price` tickets in the current round. Requires a
    /// token allowance of `amount` for this contract.
    Deposit { amount: Uint128 },
    /// Add to the current round's prize pool without receiving tickets.
    InjectCapital { amount: Uint128 },
    /// Claim the prize of a resolved round. Winner only.
    ClaimPrize { round_id: u64 },
    /// Withdraw accumulated house fees. Admin only.
    WithdrawHouseFees { recipient: String },
    /// Admin only.
    SetHouseFee { bps: u16 },
    /// Change the oracle address and/or drawing parameters. Admin only.
    UpdateOracle {
        oracle: Option<String>,
        vrf: Option<VrfParams>,
    },
    /// Stop deposits. Admin only.
    Pause {},
    /// Resume deposits into the current round. Admin only.
    Unpause {},
}

/// Parameters for opening a round.
pub struct OpenRoundParams {
    pub ticket_price: Uint128,
    pub generic_reward: Reward,
    pub winner_reward: Reward,
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(Config)]
    Config {},
    #[returns(StateResponse)]
    State {},
    #[returns(Round)]
    Round { round_id: u64 },
    #[returns(Option<Round>)]
    CurrentRound {},
    #[returns(RoundHistoryResponse)]
    RoundHistory {
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    #[returns(u64)]
    TicketCount { round_id: u64 },
    #[returns(UserTicketsResponse)]
    UserTickets { round_id: u64, address: String },
    #[returns(bool)]
    HasClaimedGeneric { round_id: u64, address: String },
    #[returns(TicketEntriesResponse)]
    TicketEntries {
        round_id: u64,
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    #[returns(WinnerResponse)]
    Winner { round_id: u64 },
    #[returns(Uint128)]
    PrizePool { round_id: u64 },
    #[returns(bool)]
    IsClaimed { round_id: u64 },
    #[returns(PrizeAfterFeeResponse)]
    PrizeAfterFee { round_id: u64 },
    #[returns(String)]
    FormattedTicketPrice { round_id: u64 },
    #[returns(Uint128)]
    ContractBalance {},
}

#[cw_serde]
pub struct StateResponse {
    pub phase: RafflePhase,
    pub current_round_id: u64,
    pub paused: bool,
    pub awaiting_randomness: bool,
    pub pending_request_id: Option<u64>,
    pub house_fee_bps: u16,
    pub accumulated_fees: Uint128,
}

#[cw_serde]
pub struct RoundHistoryResponse {
    pub rounds: Vec<Round>,
}

#[cw_serde]
pub struct UserTicketsResponse {
    pub round_id: u64,
    pub address: String,
    pub tickets: u64,
    pub has_claimed_generic: bool,
}

#[cw_serde]
pub struct TicketEntry {
    pub index: u64,
    pub holder: Addr,
}

#[cw_serde]
pub struct TicketEntriesResponse {
    pub round_id: u64,
    pub total: u64,
    pub entries: Vec<TicketEntry>,
}

#[cw_serde]
pub struct WinnerResponse {
    pub round_id: u64,
    pub winner: Option<Addr>,
    pub winning_index: Option<u64>,
    pub claimed: bool,
}

#[cw_serde]
pub struct PrizeAfterFeeResponse {
    pub prize_pool: Uint128,
    pub house_cut: Uint128,
    pub payout: Uint128,
}

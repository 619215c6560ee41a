use chance_raffle_common::types::{RafflePhase, Reward, VrfParams};
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Timestamp, Uint128};
use cw_storage_plus::{Item, Map};

pub const CONFIG: Item<Config> = Item::new("config");
pub const RAFFLE_STATE: Item<RaffleState> = Item::new("raffle_state");
pub const ROUNDS: Map<u64, Round> = Map::new("rounds");

/// Ticket sequence: (round_id, ticket_index) -> holder. One entry per ticket.
pub const TICKETS: Map<(u64, u64), Addr> = Map::new("tickets");
/// Length of each round's ticket sequence.
pub const TICKET_TOTALS: Map<u64, u64> = Map::new("ticket_totals");
pub const USER_TICKETS: Map<(u64, &Addr), u64> = Map::new("user_tickets");
/// Set on a participant's first deposit in a round; the generic reward is
/// granted only when this flips.
pub const GENERIC_CLAIMED: Map<(u64, &Addr), bool> = Map::new("generic_claimed");

/// Monotonic counter mixed into live oracle request ids.
pub const REQUEST_NONCE: Item<u64> = Item::new("request_nonce");
/// Held for the duration of a protected call. Never committed.
pub const ENTERED: Item<bool> = Item::new("entered");

#[cw_serde]
pub struct Config {
    pub admin: Addr,
    /// CW20-compatible asset ledger used for deposits and payouts
    pub token: Addr,
    /// The only address allowed to fulfil randomness requests
    pub oracle: Addr,
    pub vrf: VrfParams,
}

#[cw_serde]
pub struct RaffleState {
    /// 0 until the first round opens
    pub current_round_id: u64,
    pub paused: bool,
    pub awaiting_randomness: bool,
    pub pending_request_id: Option<u64>,
    pub house_fee_bps: u16,
    /// House cuts from every settled round, awaiting withdrawal
    pub accumulated_fees: Uint128,
}

impl RaffleState {
    pub fn phase(&self, current_round_active: bool) -> RafflePhase {
        if self.awaiting_randomness {
            RafflePhase::AwaitingRandomness
        } else if current_round_active && !self.paused {
            RafflePhase::Open
        } else {
            RafflePhase::Idle
        }
    }
}

#[cw_serde]
pub struct Round {
    pub id: u64,
    pub ticket_price: Uint128,
    pub generic_reward: Reward,
    pub winner_reward: Reward,
    /// Deposits plus injected capital
    pub prize_pool: Uint128,
    pub is_active: bool,
    pub request_id: Option<u64>,
    pub winner: Option<Addr>,
    pub winning_index: Option<u64>,
    pub winner_claimed: bool,
    pub payout: Option<Uint128>,
    pub house_cut: Option<Uint128>,
    pub opened_at: Timestamp,
    pub closed_at: Option<Timestamp>,
    pub resolved_at: Option<Timestamp>,
}

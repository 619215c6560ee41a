use chance_raffle_common::fee::{format_units, split_prize};
use cosmwasm_std::{to_json_binary, Binary, Deps, Env, Order, StdResult};
use cw_storage_plus::Bound;

use crate::gateway::TokenGateway;
use crate::ledger;
use crate::msg::{
    PrizeAfterFeeResponse, RoundHistoryResponse, StateResponse, TicketEntriesResponse,
    TicketEntry, UserTicketsResponse, WinnerResponse,
};
use crate::state::{CONFIG, GENERIC_CLAIMED, RAFFLE_STATE, ROUNDS};

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_state(deps: Deps) -> StdResult<Binary> {
    let state = RAFFLE_STATE.load(deps.storage)?;
    let current_active = ROUNDS
        .may_load(deps.storage, state.current_round_id)?
        .map_or(false, |r| r.is_active);

    to_json_binary(&StateResponse {
        phase: state.phase(current_active),
        current_round_id: state.current_round_id,
        paused: state.paused,
        awaiting_randomness: state.awaiting_randomness,
        pending_request_id: state.pending_request_id,
        house_fee_bps: state.house_fee_bps,
        accumulated_fees: state.accumulated_fees,
    })
}

pub fn query_round(deps: Deps, round_id: u64) -> StdResult<Binary> {
    let round = ROUNDS.load(deps.storage, round_id)?;
    to_json_binary(&round)
}

pub fn query_current_round(deps: Deps) -> StdResult<Binary> {
    let state = RAFFLE_STATE.load(deps.storage)?;
    let round = ROUNDS.may_load(deps.storage, state.current_round_id)?;
    to_json_binary(&round)
}

pub fn query_round_history(
    deps: Deps,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let limit = limit.unwrap_or(20).min(100) as usize;
    let start = start_after.map(Bound::exclusive);

    let rounds: Vec<_> = ROUNDS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .filter_map(|r| r.ok())
        .map(|(_, round)| round)
        .collect();

    to_json_binary(&RoundHistoryResponse { rounds })
}

pub fn query_ticket_count(deps: Deps, round_id: u64) -> StdResult<Binary> {
    to_json_binary(&ledger::ticket_count(deps.storage, round_id)?)
}

pub fn query_user_tickets(deps: Deps, round_id: u64, address: String) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&address)?;
    let tickets = ledger::user_tickets(deps.storage, round_id, &addr)?;
    let has_claimed_generic = GENERIC_CLAIMED
        .may_load(deps.storage, (round_id, &addr))?
        .unwrap_or(false);

    to_json_binary(&UserTicketsResponse {
        round_id,
        address,
        tickets,
        has_claimed_generic,
    })
}

pub fn query_has_claimed_generic(deps: Deps, round_id: u64, address: String) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&address)?;
    let claimed = GENERIC_CLAIMED
        .may_load(deps.storage, (round_id, &addr))?
        .unwrap_or(false);
    to_json_binary(&claimed)
}

pub fn query_ticket_entries(
    deps: Deps,
    round_id: u64,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let limit = limit.unwrap_or(20).min(100) as usize;
    let entries = ledger::entries(deps.storage, round_id, start_after, limit)?
        .into_iter()
        .map(|(index, holder)| TicketEntry { index, holder })
        .collect();

    to_json_binary(&TicketEntriesResponse {
        round_id,
        total: ledger::ticket_count(deps.storage, round_id)?,
        entries,
    })
}

pub fn query_winner(deps: Deps, round_id: u64) -> StdResult<Binary> {
    let round = ROUNDS.load(deps.storage, round_id)?;
    to_json_binary(&WinnerResponse {
        round_id,
        winner: round.winner,
        winning_index: round.winning_index,
        claimed: round.winner_claimed,
    })
}

pub fn query_prize_pool(deps: Deps, round_id: u64) -> StdResult<Binary> {
    let round = ROUNDS.load(deps.storage, round_id)?;
    to_json_binary(&round.prize_pool)
}

pub fn query_is_claimed(deps: Deps, round_id: u64) -> StdResult<Binary> {
    let round = ROUNDS.load(deps.storage, round_id)?;
    to_json_binary(&round.winner_claimed)
}

/// What the winner would receive at the current house fee.
pub fn query_prize_after_fee(deps: Deps, round_id: u64) -> StdResult<Binary> {
    let round = ROUNDS.load(deps.storage, round_id)?;
    let state = RAFFLE_STATE.load(deps.storage)?;
    let split = split_prize(round.prize_pool, state.house_fee_bps)?;

    to_json_binary(&PrizeAfterFeeResponse {
        prize_pool: round.prize_pool,
        house_cut: split.house_cut,
        payout: split.payout,
    })
}

pub fn query_formatted_ticket_price(
    deps: Deps,
    gateway: &dyn TokenGateway,
    round_id: u64,
) -> StdResult<Binary> {
    let round = ROUNDS.load(deps.storage, round_id)?;
    let decimals = gateway.decimals(deps)?;
    to_json_binary(&format_units(round.ticket_price, decimals)?)
}

pub fn query_contract_balance(
    deps: Deps,
    env: Env,
    gateway: &dyn TokenGateway,
) -> StdResult<Binary> {
    let balance = gateway.balance_of(deps, &env.contract.address)?;
    to_json_binary(&balance)
}

//! Prize pool accounting: deposits, capital injection, winner settlement and
//! house fees.
//!
//! Every operation that moves funds records its ledger, pool and claim
//! effects first and only then calls the token gateway.

use chance_raffle_common::fee::{split_prize, MAX_HOUSE_FEE_BPS};
use cosmwasm_std::{DepsMut, Env, Event, MessageInfo, Response, Storage, Uint128};

use crate::error::ContractError;
use crate::gateway::TokenGateway;
use crate::guard::{ensure_admin, non_reentrant};
use crate::ledger;
use crate::state::{Round, RaffleState, CONFIG, GENERIC_CLAIMED, RAFFLE_STATE, ROUNDS};

/// Load the current round if it is accepting funds.
fn open_round_for_funding(
    storage: &dyn Storage,
    state: &RaffleState,
) -> Result<Round, ContractError> {
    let round_id = state.current_round_id;
    let round = ROUNDS
        .may_load(storage, round_id)?
        .filter(|r| r.is_active)
        .ok_or(ContractError::RaffleNotActive { round_id })?;
    if state.paused {
        return Err(ContractError::Paused);
    }
    Ok(round)
}

/// Buy tickets in the current round.
///
/// `amount` must be a non-zero multiple of the ticket price. The first
/// deposit of a participant in a round also grants the round's generic
/// reward.
pub fn deposit(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    amount: Uint128,
    gateway: &mut dyn TokenGateway,
) -> Result<Response, ContractError> {
    non_reentrant(deps, |mut deps| {
        let state = RAFFLE_STATE.load(deps.storage)?;
        let mut round = open_round_for_funding(deps.storage, &state)?;
        let round_id = round.id;

        let invalid = || ContractError::InvalidAmount {
            amount,
            ticket_price: round.ticket_price,
        };
        if amount.is_zero() || !amount.checked_rem(round.ticket_price)?.is_zero() {
            return Err(invalid());
        }
        let tickets = u64::try_from(amount.checked_div(round.ticket_price)?.u128())
            .map_err(|_| invalid())?;

        round.prize_pool = round.prize_pool.checked_add(amount)?;
        ROUNDS.save(deps.storage, round_id, &round)?;

        let user_tickets = ledger::record_tickets(deps.storage, round_id, &info.sender, tickets)?;

        let first_entry = !GENERIC_CLAIMED
            .may_load(deps.storage, (round_id, &info.sender))?
            .unwrap_or(false);
        if first_entry {
            GENERIC_CLAIMED.save(deps.storage, (round_id, &info.sender), &true)?;
        }

        if !gateway.transfer_from(deps.branch(), &info.sender, &env.contract.address, amount)? {
            return Err(ContractError::TransferFailed { amount });
        }

        let mut response = Response::new()
            .add_attribute("action", "deposit")
            .add_attribute("round_id", round_id.to_string())
            .add_attribute("participant", info.sender.to_string())
            .add_attribute("tickets", tickets.to_string())
            .add_event(
                Event::new("raffle_tickets_purchased")
                    .add_attribute("round_id", round_id.to_string())
                    .add_attribute("participant", info.sender.to_string())
                    .add_attribute("amount", amount.to_string())
                    .add_attribute("tickets", tickets.to_string())
                    .add_attribute("user_tickets", user_tickets.to_string())
                    .add_attribute("prize_pool", round.prize_pool.to_string()),
            );
        if first_entry {
            response = response.add_event(
                Event::new("raffle_reward_granted")
                    .add_attribute("round_id", round_id.to_string())
                    .add_attribute("kind", "generic")
                    .add_attribute("recipient", info.sender.to_string())
                    .add_attribute("reward", round.generic_reward.name.clone())
                    .add_attribute("amount", round.generic_reward.amount.to_string()),
            );
        }
        Ok(response)
    })
}

/// Grow the current round's prize pool. Open to anyone; grants nothing.
pub fn inject_capital(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    amount: Uint128,
    gateway: &mut dyn TokenGateway,
) -> Result<Response, ContractError> {
    non_reentrant(deps, |mut deps| {
        let state = RAFFLE_STATE.load(deps.storage)?;
        let mut round = open_round_for_funding(deps.storage, &state)?;
        if amount.is_zero() {
            return Err(ContractError::InvalidAmount {
                amount,
                ticket_price: round.ticket_price,
            });
        }

        round.prize_pool = round.prize_pool.checked_add(amount)?;
        ROUNDS.save(deps.storage, round.id, &round)?;

        if !gateway.transfer_from(deps.branch(), &info.sender, &env.contract.address, amount)? {
            return Err(ContractError::TransferFailed { amount });
        }

        Ok(Response::new()
            .add_attribute("action", "inject_capital")
            .add_attribute("round_id", round.id.to_string())
            .add_attribute("amount", amount.to_string())
            .add_event(
                Event::new("raffle_capital_injected")
                    .add_attribute("round_id", round.id.to_string())
                    .add_attribute("sender", info.sender.to_string())
                    .add_attribute("amount", amount.to_string())
                    .add_attribute("prize_pool", round.prize_pool.to_string()),
            ))
    })
}

/// Pay out a resolved round to its winner. Winner only, once.
///
/// The pool is read once, the house cut moved to the accumulated fees and the
/// round marked claimed before the payout transfer.
pub fn settle_winner(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    round_id: u64,
    gateway: &mut dyn TokenGateway,
) -> Result<Response, ContractError> {
    non_reentrant(deps, |mut deps| {
        let mut round = ROUNDS
            .may_load(deps.storage, round_id)?
            .filter(|r| !r.is_active && r.winner.as_ref() == Some(&info.sender))
            .ok_or(ContractError::NotWinner { round_id })?;
        if round.winner_claimed {
            return Err(ContractError::RewardAlreadyClaimed { round_id });
        }

        let mut state = RAFFLE_STATE.load(deps.storage)?;
        let split = split_prize(round.prize_pool, state.house_fee_bps)?;

        state.accumulated_fees = state.accumulated_fees.checked_add(split.house_cut)?;
        RAFFLE_STATE.save(deps.storage, &state)?;

        round.winner_claimed = true;
        round.payout = Some(split.payout);
        round.house_cut = Some(split.house_cut);
        ROUNDS.save(deps.storage, round_id, &round)?;

        if !gateway.transfer(deps.branch(), &info.sender, split.payout)? {
            return Err(ContractError::TransferFailed {
                amount: split.payout,
            });
        }

        Ok(Response::new()
            .add_attribute("action", "claim_prize")
            .add_attribute("round_id", round_id.to_string())
            .add_attribute("winner", info.sender.to_string())
            .add_attribute("payout", split.payout.to_string())
            .add_event(
                Event::new("raffle_prize_claimed")
                    .add_attribute("round_id", round_id.to_string())
                    .add_attribute("winner", info.sender.to_string())
                    .add_attribute("prize_pool", round.prize_pool.to_string())
                    .add_attribute("payout", split.payout.to_string())
                    .add_attribute("house_cut", split.house_cut.to_string())
                    .add_attribute("house_fee_bps", state.house_fee_bps.to_string())
                    .add_attribute("timestamp", env.block.time.seconds().to_string()),
            )
            .add_event(
                Event::new("raffle_reward_granted")
                    .add_attribute("round_id", round_id.to_string())
                    .add_attribute("kind", "winner")
                    .add_attribute("recipient", info.sender.to_string())
                    .add_attribute("reward", round.winner_reward.name.clone())
                    .add_attribute("amount", round.winner_reward.amount.to_string()),
            ))
    })
}

/// Send all accumulated house fees to `recipient`. Admin only.
pub fn withdraw_house_fees(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    recipient: String,
    gateway: &mut dyn TokenGateway,
) -> Result<Response, ContractError> {
    non_reentrant(deps, |mut deps| {
        let config = CONFIG.load(deps.storage)?;
        ensure_admin(&config, &info.sender, "only admin can withdraw house fees")?;

        let mut state = RAFFLE_STATE.load(deps.storage)?;
        let amount = state.accumulated_fees;
        if amount.is_zero() {
            return Err(ContractError::NothingToWithdraw);
        }
        if recipient.trim().is_empty() {
            return Err(ContractError::InvalidAddress { address: recipient });
        }
        let recipient_addr = deps
            .api
            .addr_validate(&recipient)
            .map_err(|_| ContractError::InvalidAddress {
                address: recipient.clone(),
            })?;

        state.accumulated_fees = Uint128::zero();
        RAFFLE_STATE.save(deps.storage, &state)?;

        if !gateway.transfer(deps.branch(), &recipient_addr, amount)? {
            return Err(ContractError::TransferFailed { amount });
        }

        Ok(Response::new()
            .add_attribute("action", "withdraw_house_fees")
            .add_attribute("recipient", recipient_addr.to_string())
            .add_attribute("amount", amount.to_string())
            .add_event(
                Event::new("raffle_fees_withdrawn")
                    .add_attribute("recipient", recipient_addr.to_string())
                    .add_attribute("amount", amount.to_string()),
            ))
    })
}

/// Admin only. Applies to every settlement from now on, including rounds
/// already resolved but not yet claimed.
pub fn set_house_fee(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    bps: u16,
) -> Result<Response, ContractError> {
    non_reentrant(deps, |deps| {
        let config = CONFIG.load(deps.storage)?;
        ensure_admin(&config, &info.sender, "only admin can set the house fee")?;

        if bps > MAX_HOUSE_FEE_BPS {
            return Err(ContractError::InvalidFee {
                bps,
                max: MAX_HOUSE_FEE_BPS,
            });
        }

        let mut state = RAFFLE_STATE.load(deps.storage)?;
        let previous = state.house_fee_bps;
        state.house_fee_bps = bps;
        RAFFLE_STATE.save(deps.storage, &state)?;

        Ok(Response::new()
            .add_attribute("action", "set_house_fee")
            .add_attribute("bps", bps.to_string())
            .add_event(
                Event::new("raffle_house_fee_updated")
                    .add_attribute("previous_bps", previous.to_string())
                    .add_attribute("bps", bps.to_string()),
            ))
    })
}

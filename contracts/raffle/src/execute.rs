//! Round lifecycle: open, close, randomness resolution, pause controls and
//! oracle configuration.

use chance_raffle_common::types::VrfParams;
use cosmwasm_std::{DepsMut, Env, Event, MessageInfo, Response, Uint128, Uint256};

use crate::error::ContractError;
use crate::guard::{ensure_admin, ensure_oracle, non_reentrant};
use crate::ledger;
use crate::msg::OpenRoundParams;
use crate::oracle::RandomnessOracle;
use crate::state::{Round, CONFIG, RAFFLE_STATE, ROUNDS};

pub fn validate_vrf_params(vrf: &VrfParams) -> Result<(), ContractError> {
    if vrf.num_words == 0 {
        return Err(ContractError::InvalidVrfParams {
            reason: "num_words must be at least 1".to_string(),
        });
    }
    if vrf.key_hash.trim().is_empty() {
        return Err(ContractError::InvalidVrfParams {
            reason: "key_hash must not be empty".to_string(),
        });
    }
    Ok(())
}

/// Open the next round. Admin only.
pub fn open_round(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    params: OpenRoundParams,
) -> Result<Response, ContractError> {
    let OpenRoundParams {
        ticket_price,
        generic_reward,
        winner_reward,
    } = params;

    non_reentrant(deps, |deps| {
        let config = CONFIG.load(deps.storage)?;
        ensure_admin(&config, &info.sender, "only admin can open rounds")?;

        let mut state = RAFFLE_STATE.load(deps.storage)?;
        if state.awaiting_randomness {
            return Err(ContractError::VrfPending);
        }
        if ticket_price.is_zero() {
            return Err(ContractError::InvalidTicketPrice);
        }
        if let Some(current) = ROUNDS.may_load(deps.storage, state.current_round_id)? {
            if current.is_active {
                return Err(ContractError::RaffleStillActive {
                    round_id: current.id,
                });
            }
        }

        let round_id = state.current_round_id + 1;
        let round = Round {
            id: round_id,
            ticket_price,
            generic_reward: generic_reward.clone(),
            winner_reward: winner_reward.clone(),
            prize_pool: Uint128::zero(),
            is_active: true,
            request_id: None,
            winner: None,
            winning_index: None,
            winner_claimed: false,
            payout: None,
            house_cut: None,
            opened_at: env.block.time,
            closed_at: None,
            resolved_at: None,
        };
        ROUNDS.save(deps.storage, round_id, &round)?;

        state.current_round_id = round_id;
        state.paused = false;
        RAFFLE_STATE.save(deps.storage, &state)?;

        Ok(Response::new()
            .add_attribute("action", "open_round")
            .add_attribute("round_id", round_id.to_string())
            .add_event(
                Event::new("raffle_round_started")
                    .add_attribute("round_id", round_id.to_string())
                    .add_attribute("ticket_price", ticket_price.to_string())
                    .add_attribute("generic_reward", generic_reward.name)
                    .add_attribute("generic_reward_amount", generic_reward.amount.to_string())
                    .add_attribute("winner_reward", winner_reward.name)
                    .add_attribute("winner_reward_amount", winner_reward.amount.to_string())
                    .add_attribute("timestamp", env.block.time.seconds().to_string()),
            ))
    })
}

/// Close the current round and request randomness for its draw. Admin only.
///
/// Only an open, unpaused round can be closed. The round is frozen and the raffle marked as awaiting randomness before the
/// oracle is contacted.
pub fn close_round(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    oracle: &mut dyn RandomnessOracle,
) -> Result<Response, ContractError> {
    non_reentrant(deps, |mut deps| {
        let config = CONFIG.load(deps.storage)?;
        ensure_admin(&config, &info.sender, "only admin can close rounds")?;

        let mut state = RAFFLE_STATE.load(deps.storage)?;
        let round_id = state.current_round_id;
        let mut round = ROUNDS
            .may_load(deps.storage, round_id)?
            .filter(|r| r.is_active)
            .ok_or(ContractError::RaffleNotActive { round_id })?;
        if state.paused {
            return Err(ContractError::Paused);
        }

        let ticket_count = ledger::ticket_count(deps.storage, round_id)?;
        if ticket_count == 0 {
            return Err(ContractError::NoParticipants { round_id });
        }

        round.is_active = false;
        round.closed_at = Some(env.block.time);
        state.awaiting_randomness = true;
        state.paused = true;
        ROUNDS.save(deps.storage, round_id, &round)?;
        RAFFLE_STATE.save(deps.storage, &state)?;

        let request_id = oracle.request(deps.branch(), &env, &config.vrf)?;

        round.request_id = Some(request_id);
        state.pending_request_id = Some(request_id);
        ROUNDS.save(deps.storage, round_id, &round)?;
        RAFFLE_STATE.save(deps.storage, &state)?;

        Ok(Response::new()
            .add_attribute("action", "close_round")
            .add_attribute("round_id", round_id.to_string())
            .add_attribute("request_id", request_id.to_string())
            .add_event(
                Event::new("raffle_round_stopped")
                    .add_attribute("round_id", round_id.to_string())
                    .add_attribute("ticket_count", ticket_count.to_string())
                    .add_attribute("prize_pool", round.prize_pool.to_string())
                    .add_attribute("timestamp", env.block.time.seconds().to_string()),
            )
            .add_event(
                Event::new("raffle_randomness_requested")
                    .add_attribute("round_id", round_id.to_string())
                    .add_attribute("request_id", request_id.to_string())
                    .add_attribute("key_hash", config.vrf.key_hash.clone())
                    .add_attribute("num_words", config.vrf.num_words.to_string()),
            ))
    })
}

/// Resolve the pending draw. Oracle only.
///
/// `winning_index = random_words[0] mod ticket_count`; the winner is the
/// holder of that ticket. Deposits are blocked while the request is pending,
/// so the ticket count here is the one frozen at close.
pub fn fulfill_randomness(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    request_id: u64,
    random_words: Vec<Uint256>,
) -> Result<Response, ContractError> {
    non_reentrant(deps, |deps| {
        let config = CONFIG.load(deps.storage)?;
        ensure_oracle(&config, &info.sender)?;

        let mut state = RAFFLE_STATE.load(deps.storage)?;
        if !state.awaiting_randomness || state.pending_request_id != Some(request_id) {
            return Err(ContractError::InvalidVrfRequest {
                request_id,
                pending: state.pending_request_id,
            });
        }
        let random = *random_words
            .first()
            .ok_or(ContractError::EmptyRandomness { request_id })?;

        let round_id = state.current_round_id;
        let mut round = ROUNDS
            .may_load(deps.storage, round_id)?
            .ok_or(ContractError::RoundNotFound { round_id })?;

        let ticket_count = ledger::ticket_count(deps.storage, round_id)?;
        if ticket_count == 0 {
            return Err(ContractError::NoParticipants { round_id });
        }
        let winning_index = ledger::select_index(random, ticket_count)?;
        let winner = ledger::entry_at(deps.storage, round_id, winning_index)?;

        round.winner = Some(winner.clone());
        round.winning_index = Some(winning_index);
        round.resolved_at = Some(env.block.time);
        ROUNDS.save(deps.storage, round_id, &round)?;

        state.awaiting_randomness = false;
        state.pending_request_id = None;
        RAFFLE_STATE.save(deps.storage, &state)?;

        Ok(Response::new()
            .add_attribute("action", "fulfill_randomness")
            .add_attribute("round_id", round_id.to_string())
            .add_attribute("winner", winner.to_string())
            .add_event(
                Event::new("raffle_winner_selected")
                    .add_attribute("round_id", round_id.to_string())
                    .add_attribute("request_id", request_id.to_string())
                    .add_attribute("winner", winner.to_string())
                    .add_attribute("winning_index", winning_index.to_string())
                    .add_attribute("ticket_count", ticket_count.to_string())
                    .add_attribute("random_value", hex::encode(random.to_be_bytes()))
                    .add_attribute("timestamp", env.block.time.seconds().to_string()),
            ))
    })
}

/// Emergency stop for deposits. Admin only.
pub fn pause(deps: DepsMut, _env: Env, info: MessageInfo) -> Result<Response, ContractError> {
    non_reentrant(deps, |deps| {
        let config = CONFIG.load(deps.storage)?;
        ensure_admin(&config, &info.sender, "only admin can pause")?;

        let mut state = RAFFLE_STATE.load(deps.storage)?;
        if state.awaiting_randomness {
            return Err(ContractError::VrfPending);
        }
        state.paused = true;
        RAFFLE_STATE.save(deps.storage, &state)?;

        Ok(Response::new().add_attribute("action", "pause").add_event(
            Event::new("raffle_paused")
                .add_attribute("round_id", state.current_round_id.to_string()),
        ))
    })
}

/// Resume deposits into the current round. Admin only.
pub fn unpause(deps: DepsMut, _env: Env, info: MessageInfo) -> Result<Response, ContractError> {
    non_reentrant(deps, |deps| {
        let config = CONFIG.load(deps.storage)?;
        ensure_admin(&config, &info.sender, "only admin can unpause")?;

        let mut state = RAFFLE_STATE.load(deps.storage)?;
        if state.awaiting_randomness {
            return Err(ContractError::VrfPending);
        }
        let round_id = state.current_round_id;
        let active = ROUNDS
            .may_load(deps.storage, round_id)?
            .map_or(false, |r| r.is_active);
        if !active {
            return Err(ContractError::RaffleNotActive { round_id });
        }
        state.paused = false;
        RAFFLE_STATE.save(deps.storage, &state)?;

        Ok(Response::new()
            .add_attribute("action", "unpause")
            .add_event(Event::new("raffle_unpaused").add_attribute("round_id", round_id.to_string())))
    })
}

/// Update the oracle address and drawing parameters. Admin only.
///
/// Refused while a request is outstanding so the pending callback still
/// comes from the oracle it was sent to.
pub fn update_oracle(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    oracle: Option<String>,
    vrf: Option<VrfParams>,
) -> Result<Response, ContractError> {
    non_reentrant(deps, |deps| {
        let mut config = CONFIG.load(deps.storage)?;
        ensure_admin(&config, &info.sender, "only admin can update the oracle")?;

        let state = RAFFLE_STATE.load(deps.storage)?;
        if state.awaiting_randomness {
            return Err(ContractError::VrfPending);
        }

        if let Some(addr) = oracle {
            config.oracle = deps
                .api
                .addr_validate(&addr)
                .map_err(|_| ContractError::InvalidAddress { address: addr })?;
        }
        if let Some(params) = vrf {
            validate_vrf_params(&params)?;
            config.vrf = params;
        }
        CONFIG.save(deps.storage, &config)?;

        Ok(Response::new()
            .add_attribute("action", "update_oracle")
            .add_event(
                Event::new("raffle_oracle_updated")
                    .add_attribute("oracle", config.oracle.to_string())
                    .add_attribute("key_hash", config.vrf.key_hash)
                    .add_attribute("num_words", config.vrf.num_words.to_string()),
            ))
    })
}

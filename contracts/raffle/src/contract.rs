use chance_raffle_common::fee::MAX_HOUSE_FEE_BPS;
use cosmwasm_std::{
    entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult, Uint128,
};
use cw2::{get_contract_version, set_contract_version};

use crate::error::ContractError;
use crate::execute;
use crate::gateway::Cw20Gateway;
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, OpenRoundParams, QueryMsg};
use crate::oracle::OracleContractAdapter;
use crate::pool;
use crate::query;
use crate::state::{Config, RaffleState, CONFIG, RAFFLE_STATE};

const CONTRACT_NAME: &str = "crates.io:chance-raffle";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    if msg.house_fee_bps > MAX_HOUSE_FEE_BPS {
        return Err(ContractError::InvalidFee {
            bps: msg.house_fee_bps,
            max: MAX_HOUSE_FEE_BPS,
        });
    }
    execute::validate_vrf_params(&msg.vrf)?;

    let config = Config {
        admin: info.sender.clone(),
        token: deps.api.addr_validate(&msg.token)?,
        oracle: deps.api.addr_validate(&msg.oracle)?,
        vrf: msg.vrf,
    };
    CONFIG.save(deps.storage, &config)?;

    let state = RaffleState {
        current_round_id: 0,
        paused: true,
        awaiting_randomness: false,
        pending_request_id: None,
        house_fee_bps: msg.house_fee_bps,
        accumulated_fees: Uint128::zero(),
    };
    RAFFLE_STATE.save(deps.storage, &state)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "raffle")
        .add_attribute("admin", info.sender.to_string())
        .add_attribute("token", config.token.to_string())
        .add_attribute("oracle", config.oracle.to_string()))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let mut gateway = Cw20Gateway::new(config.token);
    let mut oracle = OracleContractAdapter::new(config.oracle);

    let response = match msg {
        ExecuteMsg::OpenRound {
            ticket_price,
            generic_reward,
            winner_reward,
        } => execute::open_round(
            deps,
            env,
            info,
            OpenRoundParams {
                ticket_price,
                generic_reward,
                winner_reward,
            },
        ),
        ExecuteMsg::CloseRound {} => execute::close_round(deps, env, info, &mut oracle),
        ExecuteMsg::FulfillRandomness {
            request_id,
            random_words,
        } => execute::fulfill_randomness(deps, env, info, request_id, random_words),
        ExecuteMsg::Deposit { amount } => pool::deposit(deps, env, info, amount, &mut gateway),
        ExecuteMsg::InjectCapital { amount } => {
            pool::inject_capital(deps, env, info, amount, &mut gateway)
        }
        ExecuteMsg::ClaimPrize { round_id } => {
            pool::settle_winner(deps, env, info, round_id, &mut gateway)
        }
        ExecuteMsg::WithdrawHouseFees { recipient } => {
            pool::withdraw_house_fees(deps, env, info, recipient, &mut gateway)
        }
        ExecuteMsg::SetHouseFee { bps } => pool::set_house_fee(deps, env, info, bps),
        ExecuteMsg::UpdateOracle { oracle: addr, vrf } => {
            execute::update_oracle(deps, env, info, addr, vrf)
        }
        ExecuteMsg::Pause {} => execute::pause(deps, env, info),
        ExecuteMsg::Unpause {} => execute::unpause(deps, env, info),
    }?;

    Ok(response
        .add_messages(gateway.into_messages())
        .add_messages(oracle.into_messages()))
}

#[entry_point]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::State {} => query::query_state(deps),
        QueryMsg::Round { round_id } => query::query_round(deps, round_id),
        QueryMsg::CurrentRound {} => query::query_current_round(deps),
        QueryMsg::RoundHistory { start_after, limit } => {
            query::query_round_history(deps, start_after, limit)
        }
        QueryMsg::TicketCount { round_id } => query::query_ticket_count(deps, round_id),
        QueryMsg::UserTickets { round_id, address } => {
            query::query_user_tickets(deps, round_id, address)
        }
        QueryMsg::HasClaimedGeneric { round_id, address } => {
            query::query_has_claimed_generic(deps, round_id, address)
        }
        QueryMsg::TicketEntries {
            round_id,
            start_after,
            limit,
        } => query::query_ticket_entries(deps, round_id, start_after, limit),
        QueryMsg::Winner { round_id } => query::query_winner(deps, round_id),
        QueryMsg::PrizePool { round_id } => query::query_prize_pool(deps, round_id),
        QueryMsg::IsClaimed { round_id } => query::query_is_claimed(deps, round_id),
        QueryMsg::PrizeAfterFee { round_id } => query::query_prize_after_fee(deps, round_id),
        QueryMsg::FormattedTicketPrice { round_id } => {
            let config = CONFIG.load(deps.storage)?;
            let gateway = Cw20Gateway::new(config.token);
            query::query_formatted_ticket_price(deps, &gateway, round_id)
        }
        QueryMsg::ContractBalance {} => {
            let config = CONFIG.load(deps.storage)?;
            let gateway = Cw20Gateway::new(config.token);
            query::query_contract_balance(deps, env, &gateway)
        }
    }
}

#[entry_point]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let stored = get_contract_version(deps.storage)?;
    if stored.contract != CONTRACT_NAME {
        return Err(ContractError::Unauthorized {
            reason: "Cannot migrate from different contract type".to_string(),
        });
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", stored.version)
        .add_attribute("to_version", CONTRACT_VERSION))
}

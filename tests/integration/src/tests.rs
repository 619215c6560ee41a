//! Integration tests for the Chance.Raffle contract.
//!
//! These tests drive the contract through its `instantiate` / `execute` /
//! `query` entry points using `cosmwasm_std::testing` mocks. Token and
//! oracle calls leave the contract as `WasmMsg::Execute` messages, which are
//! decoded and checked here; token queries are answered by mocking the
//! querier with `MockQuerier::update_wasm`.
//!
//! Run:
//! ```bash
//! cargo test -p chance-raffle-integration-tests
//! ```

use chance_raffle::contract::{execute, instantiate, query};
use chance_raffle::msg::{
    ExecuteMsg, InstantiateMsg, PrizeAfterFeeResponse, QueryMsg, RoundHistoryResponse,
    StateResponse, TicketEntriesResponse, UserTicketsResponse, WinnerResponse,
};
use chance_raffle::state::Round;
use chance_raffle::ContractError;
use chance_raffle_common::oracle::OracleExecuteMsg;
use chance_raffle_common::token::{
    BalanceResponse, TokenExecuteMsg, TokenInfoResponse, TokenQueryMsg,
};
use chance_raffle_common::types::{RafflePhase, Reward, VrfParams};
use cosmwasm_std::testing::{message_info, mock_dependencies, mock_env, MockApi, MockQuerier};
use cosmwasm_std::{
    from_json, to_json_binary, Addr, ContractResult, CosmosMsg, MemoryStorage, OwnedDeps,
    Response, SystemResult, Uint128, Uint256, WasmMsg, WasmQuery,
};
use sha2::{Digest, Sha256};

type TestDeps = OwnedDeps<MemoryStorage, MockApi, MockQuerier>;

// ─── Helpers ───

fn addr(name: &str) -> Addr {
    MockApi::default().addr_make(name)
}

fn vrf_params() -> VrfParams {
    VrfParams {
        key_hash: "474e34a077df58807dbe9c96d3c009b23b3c6d0cce433e59bbf5b34f823bc56c"
            .to_string(),
        num_words: 1,
        request_confirmations: 3,
        callback_gas_limit: 250_000,
    }
}

fn setup(house_fee_bps: u16) -> TestDeps {
    let mut deps = mock_dependencies();
    let msg = InstantiateMsg {
        token: addr("token").to_string(),
        oracle: addr("oracle").to_string(),
        house_fee_bps,
        vrf: vrf_params(),
    };
    instantiate(deps.as_mut(), mock_env(), message_info(&addr("admin"), &[]), msg).unwrap();
    deps
}

fn run(deps: &mut TestDeps, sender: &str, msg: ExecuteMsg) -> Result<Response, ContractError> {
    execute(deps.as_mut(), mock_env(), message_info(&addr(sender), &[]), msg)
}

fn open_round(deps: &mut TestDeps, price: u128) {
    run(
        deps,
        "admin",
        ExecuteMsg::OpenRound {
            ticket_price: Uint128::new(price),
            generic_reward: Reward {
                name: "Raffle Badge".to_string(),
                amount: 1,
            },
            winner_reward: Reward {
                name: "Golden Ticket".to_string(),
                amount: 1,
            },
        },
    )
    .unwrap();
}

fn deposit(deps: &mut TestDeps, sender: &str, amount: u128) -> Response {
    run(
        deps,
        sender,
        ExecuteMsg::Deposit {
            amount: Uint128::new(amount),
        },
    )
    .unwrap()
}

/// Close the round and return the request id carried by the oracle message.
fn close_round(deps: &mut TestDeps) -> u64 {
    let res = run(deps, "admin", ExecuteMsg::CloseRound {}).unwrap();
    assert_eq!(res.messages.len(), 1);
    let (contract, msg): (String, OracleExecuteMsg) = decode_wasm(&res.messages[0].msg);
    assert_eq!(contract, addr("oracle").to_string());
    match msg {
        OracleExecuteMsg::RequestRandomness {
            request_id,
            key_hash,
            num_words,
            request_confirmations,
            callback_gas_limit,
        } => {
            let params = vrf_params();
            assert_eq!(key_hash, params.key_hash);
            assert_eq!(num_words, params.num_words);
            assert_eq!(request_confirmations, params.request_confirmations);
            assert_eq!(callback_gas_limit, params.callback_gas_limit);
            request_id
        }
    }
}

fn fulfill(deps: &mut TestDeps, request_id: u64, word: Uint256) -> Result<Response, ContractError> {
    run(
        deps,
        "oracle",
        ExecuteMsg::FulfillRandomness {
            request_id,
            random_words: vec![word],
        },
    )
}

fn decode_wasm<T: serde::de::DeserializeOwned>(msg: &CosmosMsg) -> (String, T) {
    match msg {
        CosmosMsg::Wasm(WasmMsg::Execute {
            contract_addr,
            msg,
            funds,
        }) => {
            assert!(funds.is_empty());
            (contract_addr.clone(), from_json(msg).unwrap())
        }
        other => panic!("Expected WasmMsg::Execute, got: {:?}", other),
    }
}

fn query_json<T: serde::de::DeserializeOwned>(deps: &TestDeps, msg: QueryMsg) -> T {
    from_json(query(deps.as_ref(), mock_env(), msg).unwrap()).unwrap()
}

/// Answer token queries the way a CW20 contract would.
fn mock_token_queries(deps: &mut TestDeps, decimals: u8, balance: u128) {
    deps.querier.update_wasm(move |query| match query {
        WasmQuery::Smart { msg, .. } => {
            let response = match from_json::<TokenQueryMsg>(msg).unwrap() {
                TokenQueryMsg::TokenInfo {} => to_json_binary(&TokenInfoResponse {
                    name: "Raffle Token".to_string(),
                    symbol: "RAF".to_string(),
                    decimals,
                    total_supply: Uint128::new(1_000_000_000),
                }),
                TokenQueryMsg::Balance { .. } => to_json_binary(&BalanceResponse {
                    balance: Uint128::new(balance),
                }),
            };
            SystemResult::Ok(ContractResult::Ok(response.unwrap()))
        }
        _ => SystemResult::Err(cosmwasm_std::SystemError::InvalidRequest {
            error: "unexpected query".to_string(),
            request: Default::default(),
        }),
    });
}

/// Deterministic 256-bit random word for a seed.
fn random_word(seed: &str) -> Uint256 {
    let digest: [u8; 32] = Sha256::digest(seed.as_bytes()).into();
    Uint256::from_be_bytes(digest)
}

// ─── Full round ───

#[test]
fn test_full_round_with_live_adapters() {
    let mut deps = setup(2500);
    let contract = mock_env().contract.address;

    let state: StateResponse = query_json(&deps, QueryMsg::State {});
    assert_eq!(state.phase, RafflePhase::Idle);

    open_round(&mut deps, 10);
    let state: StateResponse = query_json(&deps, QueryMsg::State {});
    assert_eq!(state.phase, RafflePhase::Open);
    assert_eq!(state.current_round_id, 1);

    // alice buys 7 tickets, bob buys 3
    let res = deposit(&mut deps, "alice", 70);
    let (token, msg): (String, TokenExecuteMsg) = decode_wasm(&res.messages[0].msg);
    assert_eq!(token, addr("token").to_string());
    assert_eq!(
        msg,
        TokenExecuteMsg::TransferFrom {
            owner: addr("alice").to_string(),
            recipient: contract.to_string(),
            amount: Uint128::new(70),
        }
    );
    deposit(&mut deps, "bob", 30);

    let count: u64 = query_json(&deps, QueryMsg::TicketCount { round_id: 1 });
    assert_eq!(count, 10);
    let pool: Uint128 = query_json(&deps, QueryMsg::PrizePool { round_id: 1 });
    assert_eq!(pool, Uint128::new(100));

    let entries: TicketEntriesResponse = query_json(
        &deps,
        QueryMsg::TicketEntries {
            round_id: 1,
            start_after: Some(5),
            limit: Some(3),
        },
    );
    assert_eq!(entries.total, 10);
    let holders: Vec<_> = entries.entries.iter().map(|e| (e.index, e.holder.clone())).collect();
    assert_eq!(
        holders,
        vec![(6, addr("alice")), (7, addr("bob")), (8, addr("bob"))]
    );

    let request_id = close_round(&mut deps);
    let state: StateResponse = query_json(&deps, QueryMsg::State {});
    assert_eq!(state.phase, RafflePhase::AwaitingRandomness);
    assert_eq!(state.pending_request_id, Some(request_id));

    // 1_000_008 mod 10 = 8, a ticket held by bob
    fulfill(&mut deps, request_id, Uint256::from(1_000_008u64)).unwrap();
    let winner: WinnerResponse = query_json(&deps, QueryMsg::Winner { round_id: 1 });
    assert_eq!(winner.winner, Some(addr("bob")));
    assert_eq!(winner.winning_index, Some(8));
    assert!(!winner.claimed);

    let preview: PrizeAfterFeeResponse =
        query_json(&deps, QueryMsg::PrizeAfterFee { round_id: 1 });
    assert_eq!(preview.payout, Uint128::new(75));
    assert_eq!(preview.house_cut, Uint128::new(25));

    let err = run(&mut deps, "alice", ExecuteMsg::ClaimPrize { round_id: 1 }).unwrap_err();
    assert!(matches!(err, ContractError::NotWinner { round_id: 1 }));

    let res = run(&mut deps, "bob", ExecuteMsg::ClaimPrize { round_id: 1 }).unwrap();
    let (_, msg): (String, TokenExecuteMsg) = decode_wasm(&res.messages[0].msg);
    assert_eq!(
        msg,
        TokenExecuteMsg::Transfer {
            recipient: addr("bob").to_string(),
            amount: Uint128::new(75),
        }
    );
    let claimed: bool = query_json(&deps, QueryMsg::IsClaimed { round_id: 1 });
    assert!(claimed);

    let err = run(&mut deps, "bob", ExecuteMsg::ClaimPrize { round_id: 1 }).unwrap_err();
    assert!(matches!(err, ContractError::RewardAlreadyClaimed { round_id: 1 }));

    // House withdraws its 25
    let res = run(
        &mut deps,
        "admin",
        ExecuteMsg::WithdrawHouseFees {
            recipient: addr("treasury").to_string(),
        },
    )
    .unwrap();
    let (_, msg): (String, TokenExecuteMsg) = decode_wasm(&res.messages[0].msg);
    assert_eq!(
        msg,
        TokenExecuteMsg::Transfer {
            recipient: addr("treasury").to_string(),
            amount: Uint128::new(25),
        }
    );
    let state: StateResponse = query_json(&deps, QueryMsg::State {});
    assert!(state.accumulated_fees.is_zero());
}

#[test]
fn test_request_ids_differ_between_rounds() {
    let mut deps = setup(0);

    open_round(&mut deps, 5);
    deposit(&mut deps, "alice", 5);
    let first = close_round(&mut deps);
    fulfill(&mut deps, first, random_word("round-1")).unwrap();

    open_round(&mut deps, 5);
    deposit(&mut deps, "alice", 5);
    let second = close_round(&mut deps);
    assert_ne!(first, second);

    // A stale id is refused
    let err = fulfill(&mut deps, first, random_word("replay")).unwrap_err();
    assert!(matches!(err, ContractError::InvalidVrfRequest { .. }));
    fulfill(&mut deps, second, random_word("round-2")).unwrap();

    let history: RoundHistoryResponse = query_json(
        &deps,
        QueryMsg::RoundHistory {
            start_after: None,
            limit: None,
        },
    );
    let ids: Vec<u64> = history.rounds.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert!(history.rounds.iter().all(|r| r.winner == Some(addr("alice"))));
}

#[test]
fn test_round_queries_and_generic_reward() {
    let mut deps = setup(1000);
    open_round(&mut deps, 25);

    let before: bool = query_json(
        &deps,
        QueryMsg::HasClaimedGeneric {
            round_id: 1,
            address: addr("carol").to_string(),
        },
    );
    assert!(!before);

    let res = deposit(&mut deps, "carol", 50);
    let granted = res
        .events
        .iter()
        .find(|e| e.ty == "raffle_reward_granted")
        .unwrap();
    assert!(granted
        .attributes
        .iter()
        .any(|a| a.key == "reward" && a.value == "Raffle Badge"));
    let res = deposit(&mut deps, "carol", 25);
    assert!(res.events.iter().all(|e| e.ty != "raffle_reward_granted"));

    let tickets: UserTicketsResponse = query_json(
        &deps,
        QueryMsg::UserTickets {
            round_id: 1,
            address: addr("carol").to_string(),
        },
    );
    assert_eq!(tickets.tickets, 3);
    assert!(tickets.has_claimed_generic);

    run(
        &mut deps,
        "dave",
        ExecuteMsg::InjectCapital {
            amount: Uint128::new(1_000),
        },
    )
    .unwrap();
    let current: Option<Round> = query_json(&deps, QueryMsg::CurrentRound {});
    let current = current.unwrap();
    assert_eq!(current.id, 1);
    assert_eq!(current.prize_pool, Uint128::new(1_075));
    let count: u64 = query_json(&deps, QueryMsg::TicketCount { round_id: 1 });
    assert_eq!(count, 3);

    let err = run(
        &mut deps,
        "carol",
        ExecuteMsg::Deposit {
            amount: Uint128::new(30),
        },
    )
    .unwrap_err();
    assert!(matches!(err, ContractError::InvalidAmount { .. }));
}

#[test]
fn test_token_backed_queries() {
    let mut deps = setup(0);
    open_round(&mut deps, 25_000_000);
    mock_token_queries(&mut deps, 9, 42_000);

    let price: String = query_json(&deps, QueryMsg::FormattedTicketPrice { round_id: 1 });
    assert_eq!(price, "0.025");

    let balance: Uint128 = query_json(&deps, QueryMsg::ContractBalance {});
    assert_eq!(balance, Uint128::new(42_000));
}

#[test]
fn test_pause_blocks_deposits_until_resumed() {
    let mut deps = setup(0);
    open_round(&mut deps, 10);

    run(&mut deps, "admin", ExecuteMsg::Pause {}).unwrap();
    let err = run(
        &mut deps,
        "alice",
        ExecuteMsg::Deposit {
            amount: Uint128::new(10),
        },
    )
    .unwrap_err();
    assert!(matches!(err, ContractError::Paused));

    run(&mut deps, "admin", ExecuteMsg::Unpause {}).unwrap();
    deposit(&mut deps, "alice", 10);

    close_round(&mut deps);
    // Closed round takes no more money
    let err = run(
        &mut deps,
        "bob",
        ExecuteMsg::InjectCapital {
            amount: Uint128::new(10),
        },
    )
    .unwrap_err();
    assert!(matches!(err, ContractError::RaffleNotActive { round_id: 1 }));
}

#[test]
fn test_failed_calls_change_nothing() {
    let mut deps = setup(0);
    open_round(&mut deps, 10);
    deposit(&mut deps, "alice", 10);

    let err = run(&mut deps, "admin", ExecuteMsg::SetHouseFee { bps: 6000 }).unwrap_err();
    assert!(matches!(err, ContractError::InvalidFee { .. }));
    let state: StateResponse = query_json(&deps, QueryMsg::State {});
    assert_eq!(state.house_fee_bps, 0);

    let request_id = close_round(&mut deps);
    let err = run(
        &mut deps,
        "oracle",
        ExecuteMsg::FulfillRandomness {
            request_id,
            random_words: vec![],
        },
    )
    .unwrap_err();
    assert!(matches!(err, ContractError::EmptyRandomness { .. }));
    let state: StateResponse = query_json(&deps, QueryMsg::State {});
    assert_eq!(state.phase, RafflePhase::AwaitingRandomness);
}

// ─── Weighted selection ───

#[test]
fn test_selection_tracks_ticket_weight() {
    // alice holds 3 of 4 tickets; over many draws she should win about 75%
    let trials = 400;
    let mut alice_wins = 0;

    for i in 0..trials {
        let mut deps = setup(0);
        open_round(&mut deps, 1);
        deposit(&mut deps, "alice", 3);
        deposit(&mut deps, "bob", 1);
        let request_id = close_round(&mut deps);
        fulfill(&mut deps, request_id, random_word(&format!("draw-{}", i))).unwrap();

        let winner: WinnerResponse = query_json(&deps, QueryMsg::Winner { round_id: 1 });
        if winner.winner == Some(addr("alice")) {
            alice_wins += 1;
        }
    }

    assert!(
        (260..=340).contains(&alice_wins),
        "alice won {} of {} draws",
        alice_wins,
        trials
    );
}

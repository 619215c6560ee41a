use cosmwasm_std::{DivideByZeroError, OverflowError, StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("{0}")]
    DivideByZero(#[from] DivideByZeroError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("reentrant call rejected")]
    ReentrantCall,

    // ── Input validation ──
    #[error("invalid amount {amount}: must be a non-zero multiple of the ticket price {ticket_price}")]
    InvalidAmount {
        amount: Uint128,
        ticket_price: Uint128,
    },

    #[error("ticket price must be greater than zero")]
    InvalidTicketPrice,

    #[error("invalid house fee: {bps} bps (max {max})")]
    InvalidFee { bps: u16, max: u16 },

    #[error("invalid address: {address:?}")]
    InvalidAddress { address: String },

    #[error("invalid randomness parameters: {reason}")]
    InvalidVrfParams { reason: String },

    // ── State machine ──
    #[error("raffle round {round_id} is not active")]
    RaffleNotActive { round_id: u64 },

    #[error("raffle round {round_id} is still active")]
    RaffleStillActive { round_id: u64 },

    #[error("raffle is paused")]
    Paused,

    #[error("a randomness request is pending")]
    VrfPending,

    #[error("unexpected randomness request {request_id} (pending: {pending:?})")]
    InvalidVrfRequest {
        request_id: u64,
        pending: Option<u64>,
    },

    #[error("randomness fulfilment for request {request_id} carried no values")]
    EmptyRandomness { request_id: u64 },

    #[error("raffle round {round_id} has no participants")]
    NoParticipants { round_id: u64 },

    #[error("raffle round {round_id} not found")]
    RoundNotFound { round_id: u64 },

    // ── Claims ──
    #[error("reward for round {round_id} already claimed")]
    RewardAlreadyClaimed { round_id: u64 },

    #[error("sender is not the winner of round {round_id}")]
    NotWinner { round_id: u64 },

    #[error("no house fees to withdraw")]
    NothingToWithdraw,

    // ── External dependencies ──
    #[error("token transfer of {amount} failed")]
    TransferFailed { amount: Uint128 },
}

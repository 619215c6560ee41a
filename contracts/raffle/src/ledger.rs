//! Per-round ticket ledger.
//!
//! Every purchased ticket is one entry in the round's sequence, so a holder's
//! chance of being drawn is exactly their share of the entries. The sequence
//! is append-only and indexed from zero.

use cosmwasm_std::{Addr, Order, StdError, StdResult, Storage, Uint256};
use cw_storage_plus::Bound;

use crate::state::{TICKETS, TICKET_TOTALS, USER_TICKETS};

/// Append `count` entries for `participant` and bump their per-round counter.
/// Returns the participant's new ticket total for the round.
pub fn record_tickets(
    storage: &mut dyn Storage,
    round_id: u64,
    participant: &Addr,
    count: u64,
) -> StdResult<u64> {
    let start = ticket_count(storage, round_id)?;
    let end = start
        .checked_add(count)
        .ok_or_else(|| StdError::generic_err("ticket sequence overflow"))?;

    for index in start..end {
        TICKETS.save(storage, (round_id, index), participant)?;
    }
    TICKET_TOTALS.save(storage, round_id, &end)?;

    let user_total = user_tickets(storage, round_id, participant)?
        .checked_add(count)
        .ok_or_else(|| StdError::generic_err("user ticket count overflow"))?;
    USER_TICKETS.save(storage, (round_id, participant), &user_total)?;

    Ok(user_total)
}

pub fn ticket_count(storage: &dyn Storage, round_id: u64) -> StdResult<u64> {
    Ok(TICKET_TOTALS.may_load(storage, round_id)?.unwrap_or(0))
}

pub fn user_tickets(storage: &dyn Storage, round_id: u64, participant: &Addr) -> StdResult<u64> {
    Ok(USER_TICKETS
        .may_load(storage, (round_id, participant))?
        .unwrap_or(0))
}

pub fn entry_at(storage: &dyn Storage, round_id: u64, index: u64) -> StdResult<Addr> {
    TICKETS.load(storage, (round_id, index))
}

/// Page through a round's ticket sequence in index order.
pub fn entries(
    storage: &dyn Storage,
    round_id: u64,
    start_after: Option<u64>,
    limit: usize,
) -> StdResult<Vec<(u64, Addr)>> {
    let start = start_after.map(Bound::exclusive);
    TICKETS
        .prefix(round_id)
        .range(storage, start, None, Order::Ascending)
        .take(limit)
        .collect()
}

/// Map a random value onto a ticket index: `random mod ticket_count`.
pub fn select_index(random: Uint256, ticket_count: u64) -> StdResult<u64> {
    let index = random.checked_rem(Uint256::from(ticket_count))?;

    // index < ticket_count, so it fits in the low 8 bytes
    let bytes = index.to_be_bytes();
    let mut low = [0u8; 8];
    low.copy_from_slice(&bytes[24..32]);
    Ok(u64::from_be_bytes(low))
}

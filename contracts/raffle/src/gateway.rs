//! Token transfer gateway.
//!
//! The raffle never moves funds itself; it asks a [`TokenGateway`] to pull a
//! deposit from a participant or to push a payout. A gateway answers `false`
//! when it rejects a transfer and never performs a partial one.

use chance_raffle_common::token::{
    BalanceResponse, TokenExecuteMsg, TokenInfoResponse, TokenQueryMsg,
};
use cosmwasm_std::{
    to_json_binary, Addr, CosmosMsg, Deps, DepsMut, StdResult, Uint128, WasmMsg,
};

pub trait TokenGateway {
    /// Move `amount` from `from` to `to` using an allowance granted to the raffle.
    ///
    /// `deps` is the state of the calling contract: a token with transfer
    /// hooks may call back into the raffle through it.
    fn transfer_from(
        &mut self,
        deps: DepsMut,
        from: &Addr,
        to: &Addr,
        amount: Uint128,
    ) -> StdResult<bool>;

    /// Move `amount` from the raffle's own account to `to`.
    fn transfer(&mut self, deps: DepsMut, to: &Addr, amount: Uint128) -> StdResult<bool>;

    fn balance_of(&self, deps: Deps, owner: &Addr) -> StdResult<Uint128>;

    fn decimals(&self, deps: Deps) -> StdResult<u8>;
}

/// Live gateway for a CW20-compatible token contract.
///
/// Transfers are emitted as `WasmMsg::Execute` messages that the chain runs
/// after the raffle call returns. A rejected transfer fails the whole
/// transaction, so acceptance here is final.
pub struct Cw20Gateway {
    token: Addr,
    messages: Vec<CosmosMsg>,
}

impl Cw20Gateway {
    pub fn new(token: Addr) -> Self {
        Cw20Gateway {
            token,
            messages: vec![],
        }
    }

    pub fn into_messages(self) -> Vec<CosmosMsg> {
        self.messages
    }

    fn push(&mut self, msg: &TokenExecuteMsg) -> StdResult<()> {
        self.messages.push(
            WasmMsg::Execute {
                contract_addr: self.token.to_string(),
                msg: to_json_binary(msg)?,
                funds: vec![],
            }
            .into(),
        );
        Ok(())
    }
}

impl TokenGateway for Cw20Gateway {
    fn transfer_from(
        &mut self,
        _deps: DepsMut,
        from: &Addr,
        to: &Addr,
        amount: Uint128,
    ) -> StdResult<bool> {
        self.push(&TokenExecuteMsg::TransferFrom {
            owner: from.to_string(),
            recipient: to.to_string(),
            amount,
        })?;
        Ok(true)
    }

    fn transfer(&mut self, _deps: DepsMut, to: &Addr, amount: Uint128) -> StdResult<bool> {
        self.push(&TokenExecuteMsg::Transfer {
            recipient: to.to_string(),
            amount,
        })?;
        Ok(true)
    }

    fn balance_of(&self, deps: Deps, owner: &Addr) -> StdResult<Uint128> {
        let res: BalanceResponse = deps.querier.query_wasm_smart(
            self.token.to_string(),
            &TokenQueryMsg::Balance {
                address: owner.to_string(),
            },
        )?;
        Ok(res.balance)
    }

    fn decimals(&self, deps: Deps) -> StdResult<u8> {
        let res: TokenInfoResponse = deps
            .querier
            .query_wasm_smart(self.token.to_string(), &TokenQueryMsg::TokenInfo {})?;
        Ok(res.decimals)
    }
}

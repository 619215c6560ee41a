//! In-memory token and oracle fakes for exercising the raffle without live
//! collaborators.

use std::collections::BTreeMap;

use chance_raffle_common::types::VrfParams;
use cosmwasm_std::{Addr, Deps, DepsMut, Env, Response, StdResult, Uint128};

use crate::error::ContractError;
use crate::gateway::TokenGateway;
use crate::oracle::RandomnessOracle;

/// Runs inside a transfer with the raffle's state, the way a token with
/// transfer hooks would call back into the raffle.
pub type TransferHook = Box<dyn FnMut(DepsMut) -> Result<Response, ContractError>>;

/// A token ledger held in memory.
pub struct MockToken {
    /// Account debited by `transfer`
    pub contract: Addr,
    pub balances: BTreeMap<Addr, Uint128>,
    pub decimals: u8,
    /// Answer `false` to every transfer
    pub reject_transfers: bool,
    hook: Option<TransferHook>,
    /// Results of every hook invocation, in order
    pub hook_results: Vec<Result<Response, ContractError>>,
}

impl MockToken {
    pub fn new(contract: Addr) -> Self {
        MockToken {
            contract,
            balances: BTreeMap::new(),
            decimals: 6,
            reject_transfers: false,
            hook: None,
            hook_results: vec![],
        }
    }

    pub fn with_balances(contract: Addr, balances: &[(&Addr, u128)]) -> Self {
        let mut token = MockToken::new(contract);
        for (owner, amount) in balances {
            token.mint(owner, Uint128::new(*amount));
        }
        token
    }

    pub fn mint(&mut self, owner: &Addr, amount: Uint128) {
        *self.balances.entry(owner.clone()).or_default() += amount;
    }

    pub fn balance(&self, owner: &Addr) -> Uint128 {
        self.balances.get(owner).copied().unwrap_or_default()
    }

    pub fn on_transfer(&mut self, hook: TransferHook) {
        self.hook = Some(hook);
    }

    fn move_funds(&mut self, deps: DepsMut, from: &Addr, to: &Addr, amount: Uint128) -> bool {
        if self.reject_transfers {
            return false;
        }
        let from_balance = self.balance(from);
        if from_balance < amount {
            return false;
        }
        self.balances.insert(from.clone(), from_balance - amount);
        self.mint(to, amount);

        if let Some(hook) = self.hook.as_mut() {
            let result = hook(deps);
            self.hook_results.push(result);
        }
        true
    }
}

impl TokenGateway for MockToken {
    fn transfer_from(
        &mut self,
        deps: DepsMut,
        from: &Addr,
        to: &Addr,
        amount: Uint128,
    ) -> StdResult<bool> {
        Ok(self.move_funds(deps, from, to, amount))
    }

    fn transfer(&mut self, deps: DepsMut, to: &Addr, amount: Uint128) -> StdResult<bool> {
        let contract = self.contract.clone();
        Ok(self.move_funds(deps, &contract, to, amount))
    }

    fn balance_of(&self, _deps: Deps, owner: &Addr) -> StdResult<Uint128> {
        Ok(self.balance(owner))
    }

    fn decimals(&self, _deps: Deps) -> StdResult<u8> {
        Ok(self.decimals)
    }
}

/// Records randomness requests and hands out sequential correlation ids.
pub struct MockOracle {
    next_id: u64,
    pub requests: Vec<(u64, VrfParams)>,
}

impl Default for MockOracle {
    fn default() -> Self {
        MockOracle {
            next_id: 100,
            requests: vec![],
        }
    }
}

impl MockOracle {
    pub fn last_request_id(&self) -> Option<u64> {
        self.requests.last().map(|(id, _)| *id)
    }
}

impl RandomnessOracle for MockOracle {
    fn request(&mut self, _deps: DepsMut, _env: &Env, params: &VrfParams) -> StdResult<u64> {
        self.next_id += 1;
        self.requests.push((self.next_id, params.clone()));
        Ok(self.next_id)
    }
}

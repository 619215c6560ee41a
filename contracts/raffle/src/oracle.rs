//! Randomness oracle adapter.
//!
//! Requesting randomness is the first half of a two-phase protocol: the
//! adapter hands back a correlation id immediately and the oracle later
//! executes `FulfillRandomness` with that id. Nothing blocks in between.

use chance_raffle_common::oracle::OracleExecuteMsg;
use chance_raffle_common::types::VrfParams;
use cosmwasm_std::{to_json_binary, Addr, CosmosMsg, DepsMut, Env, StdResult, WasmMsg};
use sha2::{Digest, Sha256};

use crate::state::REQUEST_NONCE;

pub trait RandomnessOracle {
    /// Submit a randomness request and return its correlation id.
    fn request(&mut self, deps: DepsMut, env: &Env, params: &VrfParams) -> StdResult<u64>;
}

/// Live adapter that sends `RequestRandomness` to an oracle contract.
pub struct OracleContractAdapter {
    oracle: Addr,
    messages: Vec<CosmosMsg>,
}

impl OracleContractAdapter {
    pub fn new(oracle: Addr) -> Self {
        OracleContractAdapter {
            oracle,
            messages: vec![],
        }
    }

    pub fn into_messages(self) -> Vec<CosmosMsg> {
        self.messages
    }
}

impl RandomnessOracle for OracleContractAdapter {
    fn request(&mut self, deps: DepsMut, env: &Env, params: &VrfParams) -> StdResult<u64> {
        let nonce = REQUEST_NONCE.may_load(deps.storage)?.unwrap_or(0);
        REQUEST_NONCE.save(deps.storage, &(nonce + 1))?;

        let request_id = derive_request_id(&env.contract.address, nonce, env.block.height);

        self.messages.push(
            WasmMsg::Execute {
                contract_addr: self.oracle.to_string(),
                msg: to_json_binary(&OracleExecuteMsg::RequestRandomness {
                    request_id,
                    key_hash: params.key_hash.clone(),
                    num_words: params.num_words,
                    request_confirmations: params.request_confirmations,
                    callback_gas_limit: params.callback_gas_limit,
                })?,
                funds: vec![],
            }
            .into(),
        );

        Ok(request_id)
    }
}

/// `request_id = u64(sha256(contract ‖ nonce_be ‖ height_be)[0..8])`
pub fn derive_request_id(contract: &Addr, nonce: u64, height: u64) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(contract.as_str().as_bytes());
    hasher.update(nonce.to_be_bytes());
    hasher.update(height.to_be_bytes());
    let digest: [u8; 32] = hasher.finalize().into();

    let mut id_bytes = [0u8; 8];
    id_bytes.copy_from_slice(&digest[0..8]);
    u64::from_be_bytes(id_bytes)
}

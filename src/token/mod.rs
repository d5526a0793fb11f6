//! Token balance fetcher - one ERC-20 token on one chain
//!
//! `fetch_balance` reads `balanceOf`, `decimals` and `symbol` from the
//! configured token contract, then stores `"<amount> <symbol>"`.
//! At most one fetch runs at a time; failures land in `BalanceState::error`
//! and keep the last good balance.

mod classify;
mod format;

pub use classify::classify_fetch_error;
pub use format::format_token_amount;

use crate::client::{read_contract, ClientError, ClientResult, ErrorKind, NetworkClient, IERC20};
use crate::config::ClientConfig;
use crate::store::Store;
use alloy_primitives::Address;
use serde::Serialize;
use std::rc::Rc;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceState {
    pub balance: Option<String>,
    pub is_loading: bool,
    pub error: Option<String>,
}

pub struct BalanceFetcher {
    client: Rc<dyn NetworkClient>,
    config: ClientConfig,
    state: Store<BalanceState>,
}

impl BalanceFetcher {
    pub fn new(client: Rc<dyn NetworkClient>, config: ClientConfig) -> Self {
        Self { client, config, state: Store::new(BalanceState::default()) }
    }

    /// Observable state
    pub fn state(&self) -> &Store<BalanceState> { &self.state }

    pub fn snapshot(&self) -> BalanceState { self.state.get() }

    /// Fetch the token balance of `address`. No-op while a fetch is in
    /// flight or when no address (or the zero address) is given.
    pub async fn fetch_balance(&self, address: Option<Address>) {
        let Some(owner) = address.filter(|a| !a.is_zero()) else {
            tracing::debug!("no address, skipping balance fetch");
            return;
        };
        if self.state.get().is_loading {
            tracing::debug!(%owner, "balance fetch already in progress");
            return;
        }

        self.state.update(|s| {
            s.is_loading = true;
            s.error = None;
        });

        match self.read_balance(owner).await {
            Ok(balance) => {
                tracing::info!(%owner, %balance, "token balance fetched");
                self.state.set(BalanceState { balance: Some(balance), is_loading: false, error: None });
            }
            Err(err) => {
                tracing::warn!(%owner, error = %err, kind = ?err.kind, "token balance fetch failed");
                let message = classify_fetch_error(&err, &self.config.token, &self.config.chain);
                self.state.update(|s| {
                    s.is_loading = false;
                    s.error = Some(message);
                });
            }
        }
    }

    /// Back to the initial empty state
    pub fn reset(&self) {
        self.state.set(BalanceState::default());
    }

    async fn read_balance(&self, owner: Address) -> ClientResult<String> {
        let token = self.config.token.address;
        let chain_id = self.config.chain.id;
        let client = self.client.as_ref();

        let raw = read_contract(client, token, IERC20::balanceOfCall { owner }, chain_id).await?;
        let decimals = read_contract(client, token, IERC20::decimalsCall {}, chain_id).await?;
        let symbol = read_contract(client, token, IERC20::symbolCall {}, chain_id).await?;

        let amount = format_token_amount(raw, decimals).ok_or_else(|| {
            ClientError::new(ErrorKind::Other, format!("Token reports {} decimals, which cannot be represented.", decimals))
        })?;
        Ok(format!("{} {}", amount, symbol))
    }
}

//! RpcClient - JSON-RPC over HTTP (reqwest)
//!
//! Plays the injected connector against a node or wallet endpoint that
//! exposes accounts (`eth_requestAccounts` / `eth_accounts`).

use super::{
    Account, AccountListener, CallRequest, ClientError, ClientResult, Connection, ErrorKind, NetworkClient,
};
use crate::config::{Chain, ConnectorKind};
use crate::store::{Store, Subscription};
use alloy_primitives::{Address, Bytes, ChainId, U64};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::cell::Cell;

/// EIP-1193 user rejection
const USER_REJECTED: i64 = 4001;
/// Geth/anvil revert code
const EXECUTION_ERROR: i64 = 3;

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcError>,
}

#[derive(Debug, Clone, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

impl RpcError {
    fn into_client_error(self) -> ClientError {
        match self.code {
            USER_REJECTED => ClientError::user_rejected(self.message),
            EXECUTION_ERROR => ClientError::contract_execution(self.message),
            _ => {
                let err = ClientError::from_message(self.message);
                match err.kind {
                    ErrorKind::ContractExecution => ClientError::contract_execution(err.message),
                    _ => err,
                }
            }
        }
    }
}

pub struct RpcClient {
    http: reqwest::Client,
    url: String,
    chain: Chain,
    account: Store<Account>,
    next_id: Cell<u64>,
}

impl RpcClient {
    pub fn new(url: impl Into<String>, chain: Chain) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            chain,
            account: Store::new(Account::default()),
            next_id: Cell::new(1),
        }
    }

    pub fn url(&self) -> &str { &self.url }
    pub fn chain(&self) -> &Chain { &self.chain }

    async fn request<T: DeserializeOwned>(&self, method: &str, params: Value) -> ClientResult<T> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        tracing::debug!(method, id, "rpc request");

        let body = json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params});
        let response = self.http.post(&self.url).json(&body).send().await
            .map_err(|e| ClientError::transport(e.to_string()).with_short_message("HTTP request failed."))?;
        let envelope: RpcResponse = response.json().await
            .map_err(|e| ClientError::transport(format!("{}: {}", method, e)).with_short_message("Invalid JSON-RPC response."))?;

        if let Some(err) = envelope.error {
            return Err(err.into_client_error());
        }
        let result = envelope.result.unwrap_or(Value::Null);
        serde_json::from_value(result)
            .map_err(|e| ClientError::new(ErrorKind::Other, format!("{}: unexpected result: {}", method, e)))
    }

    async fn accounts(&self) -> ClientResult<Vec<Address>> {
        match self.request::<Vec<Address>>("eth_requestAccounts", json!([])).await {
            Err(err) if err.kind != ErrorKind::UserRejected => {
                tracing::debug!(error = %err, "eth_requestAccounts unavailable, using eth_accounts");
                self.request("eth_accounts", json!([])).await
            }
            other => other,
        }
    }

    async fn chain_id(&self) -> ClientResult<ChainId> {
        let id: U64 = self.request("eth_chainId", json!([])).await?;
        Ok(id.to::<u64>())
    }

    async fn try_connect(&self, chain_id: ChainId) -> ClientResult<Connection> {
        let accounts = self.accounts().await?;
        if accounts.is_empty() {
            return Err(ClientError::user_rejected("No accounts available from the provider."));
        }
        let actual = self.chain_id().await?;
        if actual != chain_id {
            return Err(ClientError::chain_mismatch(chain_id, actual));
        }
        Ok(Connection { accounts, chain_id: actual })
    }
}

#[async_trait(?Send)]
impl NetworkClient for RpcClient {
    fn current_account(&self) -> Account {
        self.account.get()
    }

    fn watch_account(&self, listener: AccountListener) -> Subscription {
        self.account.on_change(move |account| listener(account))
    }

    async fn connect(&self, connector: ConnectorKind, chain_id: ChainId) -> ClientResult<Connection> {
        tracing::debug!(connector = connector.as_str(), chain_id, url = %self.url, "connecting");
        self.account.update(|a| a.is_connecting = true);

        match self.try_connect(chain_id).await {
            Ok(connection) => {
                let chain = self.chain.clone();
                let address = connection.accounts.first().copied();
                self.account.set(Account {
                    address,
                    is_connected: true,
                    chain: Some(chain),
                    is_connecting: false,
                    is_reconnecting: false,
                });
                Ok(connection)
            }
            Err(err) => {
                self.account.update(|a| a.is_connecting = false);
                Err(err)
            }
        }
    }

    async fn disconnect(&self) -> ClientResult<()> {
        self.account.set(Account::default());
        Ok(())
    }

    async fn call(&self, request: CallRequest) -> ClientResult<Bytes> {
        if request.chain_id != self.chain.id {
            return Err(ClientError::new(
                ErrorKind::ChainMismatch,
                format!("Chain mismatch: endpoint serves {} (id: {}), call targets id {}", self.chain.name, self.chain.id, request.chain_id),
            ));
        }
        self.request("eth_call", json!([{"to": request.to, "data": request.input}, "latest"])).await
    }
}

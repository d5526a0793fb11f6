//! Network client - the collaborator that talks to the wallet and the chain
//!
//! Managers never reach the chain directly; they go through an injected
//! `NetworkClient`. Implementations:
//!
//! | Client | Feature | Transport |
//! |--------|---------|-----------|
//! | `RpcClient` | `native` | HTTP JSON-RPC (`eth_requestAccounts`, `eth_chainId`, `eth_call`) |
//!
//! Tests script their own client in-process.

#[cfg(feature = "native")]
mod rpc;

#[cfg(feature = "native")]
pub use rpc::RpcClient;

use crate::config::{Chain, ConnectorKind};
use crate::store::Subscription;
use alloy_primitives::{Address, Bytes, ChainId};
use alloy_sol_types::{sol, SolCall};
use async_trait::async_trait;

sol! {
    /// Read-only slice of the ERC-20 interface
    interface IERC20 {
        function balanceOf(address owner) external view returns (uint256);
        function decimals() external view returns (uint8);
        function symbol() external view returns (string);
    }
}

/// Account as reported by the client
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Account {
    pub address: Option<Address>,
    pub is_connected: bool,
    pub chain: Option<Chain>,
    pub is_connecting: bool,
    pub is_reconnecting: bool,
}

/// Result of a successful connection request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub accounts: Vec<Address>,
    pub chain_id: ChainId,
}

/// Read-only contract call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    pub to: Address,
    pub input: Bytes,
    pub chain_id: ChainId,
}

/// Closed set of failure kinds a client can report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Contract read could not complete (bad address, missing function, revert)
    ContractExecution,
    /// Wallet or node is on a different chain than requested
    ChainMismatch,
    /// User declined the request
    UserRejected,
    /// Connector unavailable or misbehaving
    Connector,
    Transport,
    Other,
}

impl ErrorKind {
    /// Best-effort kind for clients that only have a message
    pub fn infer(message: &str) -> Self {
        let lower = message.to_ascii_lowercase();
        if lower.contains("execution reverted") || lower.contains("returned no data") {
            ErrorKind::ContractExecution
        } else if lower.contains("chain mismatch") || lower.contains("does not match the target chain") {
            ErrorKind::ChainMismatch
        } else if lower.contains("user rejected") || lower.contains("user denied") {
            ErrorKind::UserRejected
        } else {
            ErrorKind::Other
        }
    }
}

/// Error surfaced by a `NetworkClient`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ClientError {
    pub kind: ErrorKind,
    /// One-line description, when the client has one
    pub short_message: Option<String>,
    pub message: String,
}

impl ClientError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, short_message: None, message: message.into() }
    }

    /// Kind inferred from the message text
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(ErrorKind::infer(&message), message)
    }

    pub fn contract_execution(short_message: impl Into<String>) -> Self {
        let short = short_message.into();
        Self { kind: ErrorKind::ContractExecution, message: short.clone(), short_message: Some(short) }
    }

    pub fn chain_mismatch(expected: ChainId, actual: ChainId) -> Self {
        let short = format!("The current chain of the wallet (id: {actual}) does not match the target chain (id: {expected}).");
        Self { kind: ErrorKind::ChainMismatch, message: short.clone(), short_message: Some(short) }
    }

    pub fn user_rejected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UserRejected, message).with_short_message("User rejected the request.")
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    pub fn with_short_message(mut self, short: impl Into<String>) -> Self {
        self.short_message = Some(short.into());
        self
    }

    /// Short message if present, else the full message
    pub fn summary(&self) -> &str {
        self.short_message.as_deref().unwrap_or(&self.message)
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Listener for account changes
pub type AccountListener = Box<dyn Fn(&Account)>;

/// Wallet + chain collaborator. Single-threaded: futures are not `Send`.
#[async_trait(?Send)]
pub trait NetworkClient {
    /// Current account status, without I/O
    fn current_account(&self) -> Account;

    /// Register for account changes. The listener is not called with the
    /// current value, only with later ones.
    fn watch_account(&self, listener: AccountListener) -> Subscription;

    async fn connect(&self, connector: ConnectorKind, chain_id: ChainId) -> ClientResult<Connection>;

    async fn disconnect(&self) -> ClientResult<()>;

    /// Execute a read-only call and return the raw output
    async fn call(&self, request: CallRequest) -> ClientResult<Bytes>;
}

/// Typed contract read: encode `call`, execute it, decode the return value.
pub async fn read_contract<N, C>(client: &N, to: Address, call: C, chain_id: ChainId) -> ClientResult<C::Return>
where
    N: NetworkClient + ?Sized,
    C: SolCall,
{
    let input = Bytes::from(call.abi_encode());
    let output = client.call(CallRequest { to, input, chain_id }).await?;
    if output.is_empty() {
        return Err(ClientError::contract_execution(format!(
            "The contract function \"{}\" returned no data (\"0x\").",
            C::SIGNATURE
        )));
    }
    C::abi_decode_returns(&output).map_err(|e| {
        ClientError::contract_execution(format!("Failed to decode \"{}\" output: {}", C::SIGNATURE, e))
    })
}

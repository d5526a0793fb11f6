//! Wallet connection manager
//!
//! Owns the connect/disconnect lifecycle and mirrors account changes
//! reported by the `NetworkClient` into a `ConnectionState` store.
//!
//! ```text
//! init()  ── current_account() ──► seed state
//!    └───── watch_account() ─────► mirror every change  (returns Subscription)
//!
//! connect()    ── client.connect(connector, chain) ──► state | error
//! disconnect() ── client.disconnect() ───────────────► initial state | error
//! ```
//!
//! Failures never escape: they land in `ConnectionState::error`.

use crate::client::{Account, NetworkClient};
use crate::config::ClientConfig;
use crate::store::{Store, Subscription};
use alloy_primitives::{Address, ChainId};
use serde::Serialize;
use std::rc::Rc;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionState {
    pub address: Option<Address>,
    pub is_connected: bool,
    pub chain_id: Option<ChainId>,
    pub is_connecting: bool,
    pub error: Option<String>,
}

impl ConnectionState {
    fn from_account(account: &Account) -> Self {
        Self {
            address: account.address,
            // Connected without an address is not a state we expose.
            is_connected: account.is_connected && account.address.is_some(),
            chain_id: account.chain.as_ref().map(|c| c.id),
            is_connecting: account.is_reconnecting || account.is_connecting,
            error: None,
        }
    }
}

pub struct ConnectionManager {
    client: Rc<dyn NetworkClient>,
    config: ClientConfig,
    state: Store<ConnectionState>,
}

impl ConnectionManager {
    pub fn new(client: Rc<dyn NetworkClient>, config: ClientConfig) -> Self {
        Self { client, config, state: Store::new(ConnectionState::default()) }
    }

    /// Observable state
    pub fn state(&self) -> &Store<ConnectionState> { &self.state }

    pub fn snapshot(&self) -> ConnectionState { self.state.get() }

    /// Seed state from the client and start mirroring account changes.
    /// The returned handle must be unsubscribed by the caller.
    pub fn init(&self) -> Subscription {
        self.state.set(ConnectionState::from_account(&self.client.current_account()));

        let state = self.state.clone();
        self.client.watch_account(Box::new(move |account| {
            tracing::debug!(address = ?account.address, connected = account.is_connected, "account changed");
            let next = ConnectionState::from_account(account);
            state.update(|s| *s = next);
        }))
    }

    pub async fn connect(&self) {
        if self.state.get().is_connecting {
            tracing::debug!("connect already in progress");
            return;
        }

        self.state.update(|s| {
            s.is_connecting = true;
            s.error = None;
        });

        let result = self.client.connect(self.config.connector, self.config.chain.id).await;
        let connection = match result {
            Ok(c) => c,
            Err(err) => {
                tracing::warn!(error = %err, "wallet connection failed");
                let message = format!("Failed to connect: {}", err.summary());
                self.state.update(|s| {
                    s.is_connecting = false;
                    s.error = Some(message);
                });
                return;
            }
        };

        let Some(address) = connection.accounts.first().copied() else {
            tracing::warn!("wallet connected without accounts");
            self.state.update(|s| {
                s.is_connecting = false;
                s.error = Some("Failed to connect: No accounts returned by the wallet.".into());
            });
            return;
        };

        tracing::info!(%address, chain_id = connection.chain_id, "wallet connected");
        self.state.set(ConnectionState {
            address: Some(address),
            is_connected: true,
            chain_id: Some(connection.chain_id),
            is_connecting: false,
            error: None,
        });
    }

    pub async fn disconnect(&self) {
        self.state.update(|s| s.error = None);

        match self.client.disconnect().await {
            Ok(()) => {
                tracing::info!("wallet disconnected");
                self.state.set(ConnectionState::default());
            }
            Err(err) => {
                tracing::warn!(error = %err, "wallet disconnection failed");
                let message = format!("Failed to disconnect: {}", err.summary());
                self.state.update(|s| s.error = Some(message));
            }
        }
    }
}

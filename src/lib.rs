//! Tokenwatch: wallet connection and ERC-20 balance state.
//!
//! # Architecture
//!
//! ```text
//! ClientConfig (chain, token, connector)
//!   │
//!   ├── ConnectionManager ── Store<ConnectionState>
//!   │         │                   address ──┐
//!   │         ▼                             ▼
//!   │   NetworkClient  ◄──────────── BalanceFetcher ── Store<BalanceState>
//!   │   (RpcClient, or your own)
//! ```
//!
//! Both managers take the client as an injected `Rc<dyn NetworkClient>` and
//! never share state with each other. The caller passes the connected address
//! from one to the other.
//!
//! # Operations
//!
//! | Manager | Method | Description |
//! |---------|--------|-------------|
//! | `ConnectionManager` | `init()` | Seed from client, mirror account changes |
//! | `ConnectionManager` | `connect()` | Connect through the injected connector |
//! | `ConnectionManager` | `disconnect()` | Tear down session, back to initial state |
//! | `BalanceFetcher` | `fetch_balance(addr)` | Read balance, decimals, symbol |
//! | `BalanceFetcher` | `reset()` | Back to initial state |
//!
//! # Features
//!
//! - `native` - tokio, HTTP JSON-RPC client (`RpcClient`), log subscriber, CLI
//!
//! # Usage
//!
//! ```ignore
//! use std::rc::Rc;
//! use tokenwatch::{BalanceFetcher, ClientConfig, ConnectionManager, RpcClient};
//!
//! let config = ClientConfig::new().with_rpc_url("http://localhost:8545");
//! let client = Rc::new(RpcClient::new("http://localhost:8545", config.chain.clone()));
//! let wallet = ConnectionManager::new(client.clone(), config.clone());
//! let usdt = BalanceFetcher::new(client, config);
//!
//! let watch = wallet.init();
//! wallet.connect().await;
//! usdt.fetch_balance(wallet.snapshot().address).await;
//! println!("{:?}", usdt.snapshot().balance); // Some("1.2345 USDT")
//! watch.unsubscribe();
//! ```

pub mod client;
pub mod config;
pub mod store;
pub mod token;
pub mod wallet;

#[cfg(feature = "native")]
pub mod logging;

pub use client::{
    read_contract, Account, AccountListener, CallRequest, ClientError, ClientResult, Connection, ErrorKind,
    NetworkClient, IERC20,
};
pub use config::{Chain, ClientConfig, ConnectorKind, TokenConfig};
pub use store::{Store, Subscription};
pub use token::{classify_fetch_error, format_token_amount, BalanceFetcher, BalanceState};
pub use wallet::{ConnectionManager, ConnectionState};

#[cfg(feature = "native")]
pub use client::RpcClient;

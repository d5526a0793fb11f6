//! Scripted in-process NetworkClient for integration tests

#![allow(dead_code)]

use alloy_primitives::{address, Address, Bytes, ChainId, U256};
use alloy_sol_types::{SolCall, SolValue};
use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use tokenwatch::{
    Account, AccountListener, CallRequest, Chain, ClientError, ClientResult, Connection, ConnectorKind,
    NetworkClient, Store, Subscription, IERC20,
};

pub const ALICE: Address = address!("1111111111111111111111111111111111111111");
pub const BOB: Address = address!("2222222222222222222222222222222222222222");

/// Client whose every answer is set up by the test. Each async method
/// yields once before answering so overlapping calls really overlap.
pub struct ScriptedClient {
    pub account: Store<Account>,
    pub connect_result: RefCell<ClientResult<Connection>>,
    pub disconnect_result: RefCell<ClientResult<()>>,
    pub reads: RefCell<HashMap<[u8; 4], ClientResult<Bytes>>>,
    pub connect_calls: Cell<usize>,
    pub disconnect_calls: Cell<usize>,
    pub calls: RefCell<Vec<CallRequest>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self {
            account: Store::new(Account::default()),
            connect_result: RefCell::new(Ok(Connection { accounts: vec![ALICE], chain_id: Chain::sepolia().id })),
            disconnect_result: RefCell::new(Ok(())),
            reads: RefCell::new(HashMap::new()),
            connect_calls: Cell::new(0),
            disconnect_calls: Cell::new(0),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Token answering `balanceOf`, `decimals` and `symbol`
    pub fn with_token(self, raw: u128, decimals: u8, symbol: &str) -> Self {
        self.set_read::<IERC20::balanceOfCall>(Ok(U256::from(raw).abi_encode().into()));
        self.set_read::<IERC20::decimalsCall>(Ok(U256::from(decimals).abi_encode().into()));
        self.set_read::<IERC20::symbolCall>(Ok(symbol.to_string().abi_encode().into()));
        self
    }

    pub fn set_read<C: SolCall>(&self, result: ClientResult<Bytes>) {
        self.reads.borrow_mut().insert(C::SELECTOR, result);
    }

    pub fn fail_connect(&self, err: ClientError) {
        *self.connect_result.borrow_mut() = Err(err);
    }

    pub fn fail_disconnect(&self, err: ClientError) {
        *self.disconnect_result.borrow_mut() = Err(err);
    }

    pub fn selectors_called(&self) -> Vec<[u8; 4]> {
        self.calls.borrow().iter().map(|c| {
            let mut selector = [0u8; 4];
            selector.copy_from_slice(&c.input[..4]);
            selector
        }).collect()
    }

    /// Simulate the wallet switching account on its own
    pub fn switch_account(&self, address: Address, chain_id: ChainId) {
        self.account.set(Account {
            address: Some(address),
            is_connected: true,
            chain: Some(Chain::new(chain_id, "Test")),
            is_connecting: false,
            is_reconnecting: false,
        });
    }
}

#[async_trait(?Send)]
impl NetworkClient for ScriptedClient {
    fn current_account(&self) -> Account {
        self.account.get()
    }

    fn watch_account(&self, listener: AccountListener) -> Subscription {
        self.account.on_change(move |account| listener(account))
    }

    async fn connect(&self, _connector: ConnectorKind, chain_id: ChainId) -> ClientResult<Connection> {
        self.connect_calls.set(self.connect_calls.get() + 1);
        tokio::task::yield_now().await;
        let result = self.connect_result.borrow().clone();
        if let Ok(connection) = &result {
            self.account.set(Account {
                address: connection.accounts.first().copied(),
                is_connected: true,
                chain: Some(Chain::new(chain_id, "Sepolia")),
                is_connecting: false,
                is_reconnecting: false,
            });
        }
        result
    }

    async fn disconnect(&self) -> ClientResult<()> {
        self.disconnect_calls.set(self.disconnect_calls.get() + 1);
        tokio::task::yield_now().await;
        let result = self.disconnect_result.borrow().clone();
        if result.is_ok() {
            self.account.set(Account::default());
        }
        result
    }

    async fn call(&self, request: CallRequest) -> ClientResult<Bytes> {
        let mut selector = [0u8; 4];
        selector.copy_from_slice(&request.input[..4]);
        self.calls.borrow_mut().push(request);
        tokio::task::yield_now().await;
        self.reads
            .borrow()
            .get(&selector)
            .cloned()
            .unwrap_or_else(|| Err(ClientError::contract_execution("execution reverted")))
    }
}

//! Client configuration - target chain, token contract, connector

use alloy_primitives::{address, Address, ChainId};

/// USDT test token deployed on Sepolia
pub const USDT_SEPOLIA_ADDRESS: Address = address!("aA8E23Fb1079EA71e0a56F48a2aA51851D8433D0");

pub const SEPOLIA_CHAIN_ID: ChainId = 11_155_111;

/// Target network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub id: ChainId,
    pub name: String,
}

impl Chain {
    pub fn new(id: ChainId, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }

    pub fn sepolia() -> Self {
        Self::new(SEPOLIA_CHAIN_ID, "Sepolia")
    }
}

impl Default for Chain {
    fn default() -> Self { Self::sepolia() }
}

/// The one token this client tracks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenConfig {
    pub address: Address,
    /// Name used in user-facing messages before the on-chain symbol is known
    pub label: String,
}

impl TokenConfig {
    pub fn new(address: Address, label: impl Into<String>) -> Self {
        Self { address, label: label.into() }
    }

    pub fn usdt_sepolia() -> Self {
        Self::new(USDT_SEPOLIA_ADDRESS, "USDT")
    }
}

impl Default for TokenConfig {
    fn default() -> Self { Self::usdt_sepolia() }
}

/// Wallet-integration mechanism used to establish a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectorKind {
    /// Provider injected by the host (browser extension, local node with unlocked accounts)
    #[default]
    Injected,
}

impl ConnectorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectorKind::Injected => "injected",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "injected" => Some(ConnectorKind::Injected),
            _ => None,
        }
    }
}

/// Client configuration. The binary builds this from env and flags.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    pub chain: Chain,
    pub token: TokenConfig,
    pub connector: ConnectorKind,
    pub rpc_url: Option<String>,
}

impl ClientConfig {
    pub fn new() -> Self { Self::default() }
    pub fn with_chain(mut self, chain: Chain) -> Self { self.chain = chain; self }
    pub fn with_token(mut self, token: TokenConfig) -> Self { self.token = token; self }
    pub fn with_connector(mut self, connector: ConnectorKind) -> Self { self.connector = connector; self }
    pub fn with_rpc_url(mut self, url: impl Into<String>) -> Self { self.rpc_url = Some(url.into()); self }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_usdt_on_sepolia() {
        let config = ClientConfig::new();
        assert_eq!(config.chain.id, 11_155_111);
        assert_eq!(config.chain.name, "Sepolia");
        assert_eq!(config.token.address, USDT_SEPOLIA_ADDRESS);
        assert_eq!(config.token.label, "USDT");
        assert_eq!(config.connector, ConnectorKind::Injected);
        assert!(config.rpc_url.is_none());
    }

    #[test]
    fn connector_parses_case_insensitively() {
        assert_eq!(ConnectorKind::from_str(" Injected "), Some(ConnectorKind::Injected));
        assert_eq!(ConnectorKind::from_str("walletconnect"), None);
    }
}

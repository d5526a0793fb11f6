//! Turn a balance-fetch failure into a message for the user

use crate::client::{ClientError, ErrorKind};
use crate::config::{Chain, TokenConfig};

const TOKEN_MISSING: &str = "token does not exist";

/// First matching rule wins:
///
/// 1. contract execution + "token does not exist" -> contract not found
/// 2. contract execution -> contract's short message
/// 3. chain mismatch (kind, or message naming the chain) -> switch network
/// 4. short message
/// 5. message
/// 6. unknown
pub fn classify_fetch_error(err: &ClientError, token: &TokenConfig, chain: &Chain) -> String {
    let label = &token.label;

    if err.kind == ErrorKind::ContractExecution {
        let short = err.short_message.as_deref().unwrap_or(&err.message);
        if short.contains(TOKEN_MISSING) {
            return format!("{} token contract or function not found.", label);
        }
        return format!("Contract error: {}", short);
    }

    let names_chain = err.message.to_ascii_lowercase().contains(&chain.name.to_ascii_lowercase());
    if err.kind == ErrorKind::ChainMismatch || names_chain {
        return format!("Please switch your wallet to the {} network.", chain.name);
    }

    if let Some(short) = err.short_message.as_deref().filter(|s| !s.is_empty()) {
        return format!("Failed to fetch {} balance: {}", label, short);
    }
    if !err.message.is_empty() {
        return format!("Failed to fetch {} balance: {}", label, err.message);
    }
    format!("Failed to fetch {} balance: Unknown error.", label)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(err: ClientError) -> String {
        classify_fetch_error(&err, &TokenConfig::usdt_sepolia(), &Chain::sepolia())
    }

    #[test]
    fn missing_token_wins_over_contract_error() {
        let err = ClientError::contract_execution("execution reverted: token does not exist");
        assert_eq!(classify(err), "USDT token contract or function not found.");
    }

    #[test]
    fn other_contract_errors_show_short_message() {
        let err = ClientError::contract_execution("execution reverted");
        assert_eq!(classify(err), "Contract error: execution reverted");
    }

    #[test]
    fn contract_error_outranks_chain_name() {
        let err = ClientError::contract_execution("reverted on sepolia");
        assert_eq!(classify(err), "Contract error: reverted on sepolia");
    }

    #[test]
    fn chain_mismatch_by_kind_or_message() {
        let by_kind = ClientError::chain_mismatch(11_155_111, 1);
        assert_eq!(classify(by_kind), "Please switch your wallet to the Sepolia network.");

        let by_text = ClientError::transport("rpc for sepolia unreachable");
        assert_eq!(classify(by_text), "Please switch your wallet to the Sepolia network.");
    }

    #[test]
    fn falls_back_through_short_message_message_unknown() {
        let short = ClientError::transport("socket hang up after 30s").with_short_message("HTTP request failed.");
        assert_eq!(classify(short), "Failed to fetch USDT balance: HTTP request failed.");

        let long = ClientError::transport("connection refused");
        assert_eq!(classify(long), "Failed to fetch USDT balance: connection refused");

        let empty = ClientError::new(ErrorKind::Other, "");
        assert_eq!(classify(empty), "Failed to fetch USDT balance: Unknown error.");
    }
}

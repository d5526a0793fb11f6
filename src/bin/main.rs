//! Tokenwatch CLI - connect, fetch, print state as JSON
//!
//!   tokenwatch balance [--address <addr>]   → {"wallet": {...}, "balance": {...}}
//!   tokenwatch status                       → {"wallet": {...}}
//!
//! Configuration (flags override env, env overrides .env):
//!   --rpc-url <url>      TOKENWATCH_RPC_URL    (default http://127.0.0.1:8545)
//!   --token <addr>       TOKENWATCH_TOKEN      (default USDT on Sepolia)
//!   --label <name>       TOKENWATCH_LABEL      (default USDT)
//!   --chain-id <id>      TOKENWATCH_CHAIN_ID   (default 11155111)
//!   --chain-name <name>  TOKENWATCH_CHAIN_NAME (default Sepolia)
//!
//! Output format:
//!   --json     Compact JSON (default for non-tty)
//!   --pretty   Pretty-print JSON (default for tty)

use alloy_primitives::Address;
use anyhow::{bail, Context};
use serde_json::{json, Value};
use std::env;
use std::io::IsTerminal;
use std::rc::Rc;
use tokenwatch::logging::init_logging;
use tokenwatch::{BalanceFetcher, Chain, ClientConfig, ConnectionManager, RpcClient, TokenConfig};
use tracing::debug;

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

fn main() {
    init_logging();

    let args: Vec<String> = env::args().collect();
    let opts = match ParsedArgs::parse(&args[1..]) {
        Ok(opts) => opts,
        Err(e) => fail(opts_pretty(&args), &e.to_string()),
    };

    if opts.help {
        print_usage();
        return;
    }
    if opts.version {
        println!("tokenwatch {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let result = build_config(&opts).and_then(|config| {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("tokio runtime")?;
        runtime.block_on(run(&opts, config))
    });

    match result {
        Ok((output, ok)) => {
            println!("{}", render(&output, opts.pretty()));
            if !ok {
                std::process::exit(1);
            }
        }
        Err(e) => fail(opts.pretty(), &format!("{:#}", e)),
    }
}

fn fail(pretty: bool, message: &str) -> ! {
    eprintln!("{}", render(&json!({"error": message}), pretty));
    std::process::exit(1);
}

fn opts_pretty(args: &[String]) -> bool {
    args.iter().any(|a| a == "--pretty") || std::io::stdout().is_terminal()
}

fn render(value: &Value, pretty: bool) -> String {
    let rendered = if pretty { serde_json::to_string_pretty(value) } else { serde_json::to_string(value) };
    rendered.unwrap_or_else(|_| value.to_string())
}

/// Returns the JSON to print and whether every operation succeeded
async fn run(opts: &ParsedArgs, config: ClientConfig) -> anyhow::Result<(Value, bool)> {
    let url = config.rpc_url.clone().unwrap_or_else(|| DEFAULT_RPC_URL.to_string());
    let client = Rc::new(RpcClient::new(url, config.chain.clone()));
    debug!(url = client.url(), chain = %client.chain().name, "using JSON-RPC endpoint");
    let wallet = ConnectionManager::new(client.clone(), config.clone());
    let watch = wallet.init();

    let output = match opts.command.as_deref() {
        None | Some("balance") => {
            let usdt = BalanceFetcher::new(client, config);
            let address = match opts.address {
                Some(address) => Some(address),
                None => {
                    wallet.connect().await;
                    wallet.snapshot().address
                }
            };
            debug!(?address, "fetching balance");
            usdt.fetch_balance(address).await;
            let balance = usdt.snapshot();
            let connection = wallet.snapshot();
            let ok = balance.error.is_none() && connection.error.is_none() && balance.balance.is_some();
            (json!({"wallet": connection, "balance": balance}), ok)
        }
        Some("status") => {
            wallet.connect().await;
            let connection = wallet.snapshot();
            let ok = connection.error.is_none();
            (json!({"wallet": connection}), ok)
        }
        Some(cmd) => {
            watch.unsubscribe();
            bail!("Unknown command: {}", cmd);
        }
    };

    if wallet.snapshot().is_connected {
        wallet.disconnect().await;
    }
    watch.unsubscribe();
    Ok(output)
}

fn build_config(opts: &ParsedArgs) -> anyhow::Result<ClientConfig> {
    let mut chain = Chain::sepolia();
    if let Some(id) = opts.chain_id.clone().or_else(|| env::var("TOKENWATCH_CHAIN_ID").ok()) {
        chain.id = id.trim().parse().with_context(|| format!("invalid chain id: {}", id))?;
    }
    if let Some(name) = opts.chain_name.clone().or_else(|| env::var("TOKENWATCH_CHAIN_NAME").ok()) {
        chain.name = name;
    }

    let mut token = TokenConfig::usdt_sepolia();
    if let Some(addr) = opts.token.clone().or_else(|| env::var("TOKENWATCH_TOKEN").ok()) {
        token.address = addr.trim().parse().with_context(|| format!("invalid token address: {}", addr))?;
    }
    if let Some(label) = opts.label.clone().or_else(|| env::var("TOKENWATCH_LABEL").ok()) {
        token.label = label;
    }

    let mut config = ClientConfig::new().with_chain(chain).with_token(token);
    if let Some(url) = opts.rpc_url.clone().or_else(|| env::var("TOKENWATCH_RPC_URL").ok()) {
        config = config.with_rpc_url(url);
    }
    Ok(config)
}

#[derive(Default)]
struct ParsedArgs {
    command: Option<String>,
    address: Option<Address>,
    rpc_url: Option<String>,
    token: Option<String>,
    label: Option<String>,
    chain_id: Option<String>,
    chain_name: Option<String>,
    json: bool,
    pretty: bool,
    help: bool,
    version: bool,
}

impl ParsedArgs {
    fn parse(args: &[String]) -> anyhow::Result<Self> {
        load_dotenv();

        let mut opts = ParsedArgs::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            let mut value = |flag: &str| iter.next().cloned().with_context(|| format!("{} needs a value", flag));
            match arg.as_str() {
                "-h" | "--help" => opts.help = true,
                "-V" | "--version" => opts.version = true,
                "--json" => opts.json = true,
                "--pretty" => opts.pretty = true,
                "--rpc-url" => opts.rpc_url = Some(value(arg.as_str())?),
                "--token" => opts.token = Some(value(arg.as_str())?),
                "--label" => opts.label = Some(value(arg.as_str())?),
                "--chain-id" => opts.chain_id = Some(value(arg.as_str())?),
                "--chain-name" => opts.chain_name = Some(value(arg.as_str())?),
                "--address" => {
                    let raw = value(arg.as_str())?;
                    opts.address = Some(raw.parse().with_context(|| format!("invalid address: {}", raw))?);
                }
                flag if flag.starts_with('-') => bail!("Unknown flag: {}", flag),
                cmd if opts.command.is_none() => opts.command = Some(cmd.to_string()),
                extra => bail!("Unexpected argument: {}", extra),
            }
        }
        Ok(opts)
    }

    fn pretty(&self) -> bool {
        !self.json && (self.pretty || std::io::stdout().is_terminal())
    }
}

/// Load `.env` without overriding variables already set
fn load_dotenv() {
    let Ok(contents) = std::fs::read_to_string(".env") else { return };
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let value = value.trim().trim_matches('"');
            if !value.is_empty() && env::var(key.trim()).is_err() {
                env::set_var(key.trim(), value);
            }
        }
    }
}

fn print_usage() {
    println!(
        "tokenwatch - wallet connection and {label} balance on {chain}

USAGE:
    tokenwatch [balance|status] [OPTIONS]

COMMANDS:
    balance    Connect, fetch the token balance, print both states (default)
    status     Connect and print the wallet state

OPTIONS:
    --address <addr>      Fetch for this address instead of connecting
    --rpc-url <url>       JSON-RPC endpoint [env: TOKENWATCH_RPC_URL]
    --token <addr>        Token contract [env: TOKENWATCH_TOKEN]
    --label <name>        Token name in messages [env: TOKENWATCH_LABEL]
    --chain-id <id>       Target chain id [env: TOKENWATCH_CHAIN_ID]
    --chain-name <name>   Target chain name [env: TOKENWATCH_CHAIN_NAME]
    --json                Compact JSON output
    --pretty              Pretty JSON output
    -h, --help            Print help
    -V, --version         Print version

LOGGING:
    RUST_LOG=debug        Verbose logs on stderr
    TOKENWATCH_LOG_JSON=1 JSON log lines",
        label = TokenConfig::default().label,
        chain = Chain::default().name,
    );
}

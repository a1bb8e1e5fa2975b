//! Configuration management
//! Load settings from a .env file; all values fixed for the process
//! lifetime. Bad configuration is the one fatal error class — fail fast
//! with context instead of limping along.

use std::collections::HashSet;
use std::str::FromStr;

use alloy::primitives::Address;
use anyhow::{bail, Context, Result};

/// One configured exchange: a V2-style router plus its factory.
/// List order is priority order for pair resolution.
#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    pub name: String,
    pub router: Address,
    pub factory: Address,
}

/// Monitor configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct BotConfig {
    // Network
    pub rpc_url: String,
    pub chain_id: u64,

    // Exchanges, in priority order
    pub exchanges: Vec<ExchangeConfig>,

    // Tokens
    pub wrapped_native: Address,
    pub base_tokens: Vec<Address>,
    pub known_decimals: Vec<(Address, u8)>,

    // Scheduler
    pub poll_interval_ms: u64,
    pub worker_count: usize,

    // Economics
    /// Fraction added on top of the victim's gas price (0.5 = overbid by 50%).
    pub gas_overpayment: f64,
    /// DEX fee multiplier, e.g. 0.9975 for a 0.25% fee.
    pub dex_fee: f64,
    /// Fraction of the algebraic optimum actually sized (0.85 = keep 15% headroom).
    pub safety_margin: f64,

    // Reporting
    pub report_json: bool,
}

impl BotConfig {
    /// Routers whose transactions the decoder accepts.
    pub fn router_set(&self) -> HashSet<Address> {
        self.exchanges.iter().map(|ex| ex.router).collect()
    }

    /// Base tokens for buy-order classification.
    pub fn base_token_set(&self) -> HashSet<Address> {
        self.base_tokens.iter().copied().collect()
    }
}

pub fn load_config(env_file: &str) -> Result<BotConfig> {
    // Missing file is fine — values may come from the process environment.
    dotenv::from_filename(env_file).ok();

    let exchanges = parse_exchanges(&required("EXCHANGES")?)?;
    if exchanges.is_empty() {
        bail!("EXCHANGES must list at least one name:router:factory entry");
    }

    let wrapped_native = parse_address(&required("WRAPPED_NATIVE")?)
        .context("WRAPPED_NATIVE")?;

    let mut base_tokens = match std::env::var("BASE_TOKENS") {
        Ok(raw) => parse_address_list(&raw).context("BASE_TOKENS")?,
        Err(_) => Vec::new(),
    };
    // The wrapped native token is always a base token.
    if !base_tokens.contains(&wrapped_native) {
        base_tokens.push(wrapped_native);
    }

    let known_decimals = match std::env::var("KNOWN_DECIMALS") {
        Ok(raw) => parse_known_decimals(&raw).context("KNOWN_DECIMALS")?,
        Err(_) => Vec::new(),
    };

    let config = BotConfig {
        rpc_url: required("RPC_URL")?,
        chain_id: required("CHAIN_ID")?.parse().context("CHAIN_ID")?,
        exchanges,
        wrapped_native,
        base_tokens,
        known_decimals,
        poll_interval_ms: optional("POLL_INTERVAL_MS", 1000)?,
        worker_count: optional("WORKER_COUNT", 5)?,
        gas_overpayment: optional("GAS_OVERPAYMENT", 0.5)?,
        dex_fee: optional("DEX_FEE", 0.9975)?,
        safety_margin: optional("SAFETY_MARGIN", 0.85)?,
        report_json: std::env::var("REPORT_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false),
    };

    validate(&config)?;
    Ok(config)
}

fn validate(config: &BotConfig) -> Result<()> {
    if config.worker_count == 0 {
        bail!("WORKER_COUNT must be at least 1");
    }
    if config.poll_interval_ms == 0 {
        bail!("POLL_INTERVAL_MS must be at least 1");
    }
    if !(config.dex_fee > 0.0 && config.dex_fee <= 1.0) {
        bail!("DEX_FEE must be in (0, 1], got {}", config.dex_fee);
    }
    if !(config.safety_margin > 0.0 && config.safety_margin <= 1.0) {
        bail!("SAFETY_MARGIN must be in (0, 1], got {}", config.safety_margin);
    }
    if config.gas_overpayment <= 0.0 {
        bail!("GAS_OVERPAYMENT must be positive, got {}", config.gas_overpayment);
    }
    Ok(())
}

fn required(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("{} not set", key))
}

fn optional<T: FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw.parse().with_context(|| format!("{} invalid: {}", key, raw)),
        Err(_) => Ok(default),
    }
}

fn parse_address(raw: &str) -> Result<Address> {
    Address::from_str(raw.trim()).with_context(|| format!("invalid address: {}", raw))
}

fn parse_address_list(raw: &str) -> Result<Vec<Address>> {
    raw.split(',')
        .filter(|s| !s.trim().is_empty())
        .map(parse_address)
        .collect()
}

/// Format: "PancakeSwap:0xrouter:0xfactory,Biswap:0xrouter:0xfactory"
fn parse_exchanges(raw: &str) -> Result<Vec<ExchangeConfig>> {
    raw.split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|entry| {
            let parts: Vec<&str> = entry.trim().split(':').collect();
            if parts.len() != 3 {
                bail!("invalid exchange entry (want name:router:factory): {}", entry);
            }
            Ok(ExchangeConfig {
                name: parts[0].to_string(),
                router: parse_address(parts[1])?,
                factory: parse_address(parts[2])?,
            })
        })
        .collect()
}

/// Format: "0xToken:18,0xOther:6"
fn parse_known_decimals(raw: &str) -> Result<Vec<(Address, u8)>> {
    raw.split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|entry| {
            let parts: Vec<&str> = entry.trim().split(':').collect();
            if parts.len() != 2 {
                bail!("invalid decimals entry (want addr:decimals): {}", entry);
            }
            let decimals: u8 = parts[1]
                .parse()
                .with_context(|| format!("invalid decimals: {}", parts[1]))?;
            if decimals > 30 {
                bail!("decimals out of range [0, 30]: {}", decimals);
            }
            Ok((parse_address(parts[0])?, decimals))
        })
        .collect()
}

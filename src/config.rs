use std::env;

use url::Url;

use crate::{
    creation::{ScanAnchor, DEFAULT_SCAN_WINDOW},
    error::{InspectorError, Result},
};

const DEFAULT_EXPLORER_URL: &str = "https://bscscan.com";

// Configuration (loaded from the environment / .env)
#[derive(Debug, Clone)]
pub struct Config {
    pub rpc_url: Url,
    pub token_address: String,
    pub scan_anchor: ScanAnchor,
    pub scan_window: u64,
    pub explorer_url: String,
}

impl Config {
    /// Reads the environment; a first command line argument overrides `TOKEN_ADDRESS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok(), env::args().nth(1))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>, cli_token: Option<String>) -> Result<Self> {
        let rpc_url_str = lookup("RPC_URL").ok_or(InspectorError::Config {
            key: "RPC_URL",
            message: "not set".to_string(),
        })?;
        let rpc_url = Url::parse(&rpc_url_str).map_err(|e| InspectorError::Config {
            key: "RPC_URL",
            message: format!("'{}': {}", rpc_url_str, e),
        })?;

        let token_address = cli_token
            .or_else(|| lookup("TOKEN_ADDRESS"))
            .ok_or(InspectorError::Config {
                key: "TOKEN_ADDRESS",
                message: "not set and no address argument given".to_string(),
            })?;

        let scan_anchor = lookup("SCAN_ANCHOR")
            .map(|s| s.parse::<ScanAnchor>())
            .transpose()?
            .unwrap_or_default();

        let scan_window = match lookup("SCAN_WINDOW") {
            Some(s) => match s.trim().parse::<u64>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(InspectorError::Config {
                        key: "SCAN_WINDOW",
                        message: format!("expected a positive block count, got '{}'", s),
                    })
                }
            },
            None => DEFAULT_SCAN_WINDOW,
        };

        let explorer_url =
            lookup("EXPLORER_URL").unwrap_or_else(|| DEFAULT_EXPLORER_URL.to_string());

        Ok(Self {
            rpc_url,
            token_address,
            scan_anchor,
            scan_window,
            explorer_url,
        })
    }
}

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

lazy_static! {
    static ref SOLANA_MINT: Regex = Regex::new(r"^[1-9A-HJ-NP-Za-km-z]{32,44}$").unwrap();
    static ref EVM_ADDRESS: Regex = Regex::new(r"^0x[a-fA-F0-9]{40}$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Solana,
    Ethereum,
    Base,
    Arbitrum,
    Bsc,
    Bitcoin,
}

/// How a chain identifies tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainFamily {
    /// SPL mints, with mint/freeze authorities.
    Solana,
    /// ERC-20 contracts.
    Evm,
    /// The chain's own asset; no token address at all.
    Native,
}

impl Chain {
    /// Parses the `chain` query value. Blank input means Solana.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "" | "solana" => Some(Chain::Solana),
            "ethereum" => Some(Chain::Ethereum),
            "base" => Some(Chain::Base),
            "arbitrum" => Some(Chain::Arbitrum),
            "bsc" => Some(Chain::Bsc),
            "bitcoin" => Some(Chain::Bitcoin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Chain::Solana => "solana",
            Chain::Ethereum => "ethereum",
            Chain::Base => "base",
            Chain::Arbitrum => "arbitrum",
            Chain::Bsc => "bsc",
            Chain::Bitcoin => "bitcoin",
        }
    }

    pub fn family(&self) -> ChainFamily {
        match self {
            Chain::Solana => ChainFamily::Solana,
            Chain::Ethereum | Chain::Base | Chain::Arbitrum | Chain::Bsc => ChainFamily::Evm,
            Chain::Bitcoin => ChainFamily::Native,
        }
    }

    pub fn is_solana(&self) -> bool {
        self.family() == ChainFamily::Solana
    }

    /// GeckoTerminal network slug, if the chain has pools there.
    pub fn gecko_network(&self) -> Option<&'static str> {
        match self {
            Chain::Solana => Some("solana"),
            Chain::Ethereum => Some("eth"),
            Chain::Bsc => Some("bsc"),
            Chain::Base => Some("base"),
            Chain::Arbitrum => Some("arbitrum"),
            Chain::Bitcoin => None,
        }
    }

    /// Checks that `address` has the shape this chain expects.
    /// Returns the user-facing message on failure.
    pub fn validate_address(&self, address: &str) -> Result<(), &'static str> {
        let address = address.trim();
        match self.family() {
            ChainFamily::Solana if !SOLANA_MINT.is_match(address) => {
                Err("Please provide a valid Solana mint address.")
            }
            ChainFamily::Evm if !EVM_ADDRESS.is_match(address) => {
                Err("Please provide a valid EVM token address.")
            }
            ChainFamily::Native if !address.is_empty() => Err(
                "Bitcoin does not use token contracts. Leave the address empty to fetch BTC.",
            ),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! # Genesis Builder
//!
//! Turns [`GenesisConfig`] into the state a fresh node starts from.

use std::collections::BTreeSet;

use lc_04_transaction_processing::{Account, AccountLedger};
use serde::Deserialize;
use shared_crypto::Sha384Digest;
use shared_types::{AccountId, Key};
use thiserror::Error;
use tracing::info;

/// Genesis creation errors.
#[derive(Debug, Error)]
pub enum GenesisError {
    #[error("Account {0} appears more than once")]
    DuplicateAccount(u64),

    #[error("Required account {0} is missing from genesis")]
    MissingAccount(AccountId),

    #[error("Invalid public key for account {num}: {reason}")]
    InvalidKey { num: u64, reason: String },

    #[error("Invalid running hash seed: {0}")]
    InvalidSeed(String),

    #[error("Total supply overflows")]
    SupplyOverflow,
}

/// Initial accounts and record stream seed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GenesisConfig {
    pub accounts: Vec<GenesisAccount>,
    /// Hex SHA-384 digest the record running hash starts from. All zeros when
    /// absent.
    pub running_hash_seed: Option<String>,
}

impl Default for GenesisConfig {
    fn default() -> Self {
        Self {
            accounts: vec![
                GenesisAccount::keyless(2, 5_000_000_000_000_000_000),
                GenesisAccount::keyless(3, 0),
                GenesisAccount::keyless(98, 0),
            ],
            running_hash_seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenesisAccount {
    pub num: u64,
    pub balance: u64,
    /// Hex Ed25519 public key.
    #[serde(default)]
    pub public_key: Option<String>,
}

impl GenesisAccount {
    pub fn keyless(num: u64, balance: u64) -> Self {
        Self {
            num,
            balance,
            public_key: None,
        }
    }

    fn key(&self) -> Result<Key, GenesisError> {
        let Some(hex_key) = &self.public_key else {
            // An empty key list is never active.
            return Ok(Key::KeyList(Vec::new()));
        };
        let bytes = hex::decode(hex_key).map_err(|e| GenesisError::InvalidKey {
            num: self.num,
            reason: e.to_string(),
        })?;
        let key: [u8; 32] = bytes.try_into().map_err(|b: Vec<u8>| GenesisError::InvalidKey {
            num: self.num,
            reason: format!("expected 32 bytes, got {}", b.len()),
        })?;
        Ok(Key::Ed25519(key))
    }
}

/// The state a fresh node starts from.
pub struct Genesis {
    pub ledger: AccountLedger,
    pub running_hash_seed: Sha384Digest,
    pub total_supply: u64,
}

pub struct GenesisBuilder<'a> {
    config: &'a GenesisConfig,
    required: Vec<AccountId>,
}

impl<'a> GenesisBuilder<'a> {
    pub fn new(config: &'a GenesisConfig) -> Self {
        Self {
            config,
            required: Vec::new(),
        }
    }

    /// Fails the build unless `account` is among the genesis accounts.
    pub fn require(mut self, account: AccountId) -> Self {
        self.required.push(account);
        self
    }

    pub fn build(self) -> Result<Genesis, GenesisError> {
        let mut seen = BTreeSet::new();
        let mut total_supply: u64 = 0;
        let mut accounts = Vec::with_capacity(self.config.accounts.len());
        for entry in &self.config.accounts {
            if !seen.insert(entry.num) {
                return Err(GenesisError::DuplicateAccount(entry.num));
            }
            total_supply = total_supply
                .checked_add(entry.balance)
                .ok_or(GenesisError::SupplyOverflow)?;
            accounts.push((
                AccountId::from_num(entry.num),
                Account::new(entry.balance, entry.key()?),
            ));
        }
        if let Some(missing) = self.required.iter().find(|a| !seen.contains(&a.num())) {
            return Err(GenesisError::MissingAccount(*missing));
        }

        let running_hash_seed = match &self.config.running_hash_seed {
            Some(seed) => parse_seed(seed)?,
            None => [0; 48],
        };

        info!(
            accounts = accounts.len(),
            total_supply, "Genesis ledger built"
        );
        Ok(Genesis {
            ledger: AccountLedger::with_accounts(accounts),
            running_hash_seed,
            total_supply,
        })
    }
}

fn parse_seed(seed: &str) -> Result<Sha384Digest, GenesisError> {
    let bytes = hex::decode(seed).map_err(|e| GenesisError::InvalidSeed(e.to_string()))?;
    bytes
        .try_into()
        .map_err(|b: Vec<u8>| GenesisError::InvalidSeed(format!("expected 48 bytes, got {}", b.len())))
}

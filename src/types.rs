//! Ethereum address and storage word primitives

use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Result};

/// A 20-byte Ethereum address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Address([u8; 20]);

impl Address {
    pub const LEN: usize = 20;

    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Parse a hex address, with or without a `0x` prefix. The input must
    /// encode exactly 20 bytes.
    pub fn from_hex(s: &str) -> Result<Self> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        if stripped.len() != Self::LEN * 2 {
            bail!("address must be {} hex characters: {}", Self::LEN * 2, s);
        }
        let mut bytes = [0u8; Self::LEN];
        hex::decode_to_slice(stripped, &mut bytes)?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

/// One 32-byte word of contract storage, big-endian as returned by
/// `eth_getStorageAt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageWord([u8; 32]);

impl StorageWord {
    pub const LEN: usize = 32;

    pub const ZERO: Self = Self([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse a JSON-RPC data hex string. Some nodes trim leading zeros, so
    /// short values are left-padded back to 32 bytes.
    pub fn from_hex(s: &str) -> Result<Self> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        if stripped.len() > Self::LEN * 2 {
            bail!("storage word wider than 32 bytes: {}", s);
        }
        let mut padded = String::with_capacity(Self::LEN * 2);
        for _ in stripped.len()..Self::LEN * 2 {
            padded.push('0');
        }
        padded.push_str(stripped);

        let mut bytes = [0u8; Self::LEN];
        hex::decode_to_slice(&padded, &mut bytes)?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Decode a right-aligned address from the word. The high 12 bytes are
    /// padding and are stripped without validation.
    pub fn address(&self) -> Address {
        let mut bytes = [0u8; Address::LEN];
        bytes.copy_from_slice(&self.0[12..]);
        Address::new(bytes)
    }
}

impl fmt::Display for StorageWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

// icon-core/src/types.rs

use crate::{IconError, IconResult};
use icon_crypto::Hash;
use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use std::fmt;
use std::str::FromStr;

/// Owned byte sequence, written as `0x` followed by lowercase hex
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Bytes(Vec<u8>);

impl Bytes {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.0))
    }

    /// Parse `0x`-prefixed hex with an even number of digits
    pub fn from_hex(s: &str) -> IconResult<Self> {
        let body = s
            .strip_prefix("0x")
            .ok_or_else(|| IconError::format(format!("bytes must start with 0x: {:?}", s)))?;
        if body.len() % 2 != 0 {
            return Err(IconError::format(format!("odd number of hex digits: {:?}", s)));
        }
        hex::decode(body)
            .map(Self)
            .map_err(|e| IconError::format(format!("invalid hex bytes {:?}: {}", s, e)))
    }
}

impl FromStr for Bytes {
    type Err = IconError;

    fn from_str(s: &str) -> IconResult<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Bytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Bytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bytes({})", self.to_hex())
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Bytes {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<Hash> for Bytes {
    fn from(hash: Hash) -> Self {
        Self(hash.as_bytes().to_vec())
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Denomination of ICX amounts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// Smallest indivisible unit
    Loop,
    /// 1 ICX = 10^18 loop
    Icx,
}

impl Unit {
    pub fn decimals(&self) -> u32 {
        match self {
            Unit::Loop => 0,
            Unit::Icx => 18,
        }
    }

    fn scale(&self) -> BigInt {
        BigInt::from(10u32).pow(self.decimals())
    }

    /// Convert a decimal amount in this unit (e.g. `"1.5"`) into loop.
    ///
    /// Fractions finer than one loop are rejected rather than rounded.
    pub fn to_loop(&self, amount: &str) -> IconResult<BigInt> {
        let invalid = || IconError::format(format!("invalid {:?} amount: {:?}", self, amount));

        let (negative, digits) = match amount.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, amount),
        };
        let (integer, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        if integer.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !integer.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if fraction.len() > self.decimals() as usize {
            return Err(IconError::format(format!(
                "{:?} has more than {} decimals",
                amount,
                self.decimals()
            )));
        }

        let padded = format!("{}{}{}", integer, fraction, "0".repeat(self.decimals() as usize - fraction.len()));
        let value = BigInt::from_str(&padded).map_err(|_| invalid())?;
        Ok(if negative { -value } else { value })
    }

    /// Render a loop amount in this unit, trimming trailing zeros
    pub fn format_loop(&self, value: &BigInt) -> String {
        let scale = self.scale();
        let magnitude = value.abs();
        let integer = &magnitude / &scale;
        let remainder = &magnitude % &scale;
        let sign = if value.is_negative() { "-" } else { "" };

        if remainder.is_zero() {
            return format!("{}{}", sign, integer);
        }
        let fraction = format!("{:0>width$}", remainder.to_string(), width = self.decimals() as usize);
        format!("{}{}.{}", sign, integer, fraction.trim_end_matches('0'))
    }
}

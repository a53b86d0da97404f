// icon-crypto/src/address.rs

use crate::{CryptoError, CryptoResult, Hashable, PublicKey};
use std::fmt;
use std::str::FromStr;

/// Length of the address body in bytes
pub const ADDRESS_BODY_SIZE: usize = 20;

/// Account kind encoded in the two-character address prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AddressPrefix {
    /// Externally owned account (`hx`)
    Eoa,
    /// SCORE contract (`cx`)
    Contract,
}

impl AddressPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressPrefix::Eoa => "hx",
            AddressPrefix::Contract => "cx",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "hx" => Some(AddressPrefix::Eoa),
            "cx" => Some(AddressPrefix::Contract),
            _ => None,
        }
    }
}

/// Account or contract address: `hx`/`cx` followed by 40 lowercase hex characters
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    prefix: AddressPrefix,
    body: [u8; ADDRESS_BODY_SIZE],
}

impl Address {
    pub fn new(prefix: AddressPrefix, body: [u8; ADDRESS_BODY_SIZE]) -> Self {
        Self { prefix, body }
    }

    /// Derive the `hx` address of a public key: the last 20 bytes of the
    /// SHA3-256 digest of the uncompressed key without its `0x04` marker.
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        let uncompressed = public_key.serialize_uncompressed();
        let hash = uncompressed[1..].hash();
        let mut body = [0u8; ADDRESS_BODY_SIZE];
        body.copy_from_slice(&hash.as_bytes()[12..]);
        Self::new(AddressPrefix::Eoa, body)
    }

    pub fn prefix(&self) -> AddressPrefix {
        self.prefix
    }

    pub fn body(&self) -> &[u8; ADDRESS_BODY_SIZE] {
        &self.body
    }

    pub fn is_contract(&self) -> bool {
        self.prefix == AddressPrefix::Contract
    }

    /// Whether `s` is a well-formed address string
    pub fn is_valid(s: &str) -> bool {
        s.parse::<Address>().is_ok()
    }
}

impl FromStr for Address {
    type Err = CryptoError;

    fn from_str(s: &str) -> CryptoResult<Self> {
        let invalid = |reason: &str| CryptoError::InvalidAddress(format!("{}: {:?}", reason, s));

        if !s.is_ascii() {
            return Err(invalid("non-ascii characters"));
        }
        if s.len() != 2 + ADDRESS_BODY_SIZE * 2 {
            return Err(invalid("wrong length"));
        }
        let (prefix, body) = s.split_at(2);
        let prefix = AddressPrefix::parse(prefix).ok_or_else(|| invalid("unknown prefix"))?;
        if !body.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(invalid("body is not lowercase hex"));
        }

        let mut bytes = [0u8; ADDRESS_BODY_SIZE];
        hex::decode_to_slice(body, &mut bytes)
            .map_err(|e| CryptoError::InvalidAddress(e.to_string()))?;
        Ok(Self::new(prefix, bytes))
    }
}

impl TryFrom<&str> for Address {
    type Error = CryptoError;

    fn try_from(s: &str) -> CryptoResult<Self> {
        s.parse()
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix.as_str(), hex::encode(self.body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EOA: &str = "hxbe258ceb872e08851f1f59694dac2558708ece11";
    const SCORE: &str = "cx0000000000000000000000000000000000000001";

    #[test]
    fn test_parse_and_display() {
        let address: Address = EOA.parse().unwrap();
        assert_eq!(address.prefix(), AddressPrefix::Eoa);
        assert_eq!(address.to_string(), EOA);

        let score: Address = SCORE.parse().unwrap();
        assert!(score.is_contract());
        assert_eq!(score.body()[19], 1);
        assert_eq!(score.to_string(), SCORE);
    }

    #[test]
    fn test_missing_prefix() {
        let result = "be258ceb872e08851f1f59694dac2558708ece11".parse::<Address>();
        assert!(matches!(result, Err(CryptoError::InvalidAddress(_))));

        let result = "0xbe258ceb872e08851f1f59694dac2558708ece11".parse::<Address>();
        assert!(matches!(result, Err(CryptoError::InvalidAddress(_))));
    }

    #[test]
    fn test_wrong_length() {
        assert!(matches!(
            "hxbe258ceb872e08851f1f59694dac2558708ece1".parse::<Address>(),
            Err(CryptoError::InvalidAddress(_))
        ));
        assert!(matches!(
            "hxbe258ceb872e08851f1f59694dac2558708ece111".parse::<Address>(),
            Err(CryptoError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_non_hex_body() {
        assert!(matches!(
            "hxzz258ceb872e08851f1f59694dac2558708ece11".parse::<Address>(),
            Err(CryptoError::InvalidAddress(_))
        ));
        assert!(matches!(
            "hxBE258CEB872E08851F1F59694DAC2558708ECE11".parse::<Address>(),
            Err(CryptoError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_is_valid() {
        assert!(Address::is_valid(EOA));
        assert!(!Address::is_valid("hx"));
        assert!(!Address::is_valid("hxé58ceb872e08851f1f59694dac2558708ece1"));
    }
}

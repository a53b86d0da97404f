// icon-core/src/rpc_item.rs

//! The value tree exchanged with ICON nodes.
//!
//! Every leaf is a string. Integers, booleans and byte arrays are written in
//! `0x` hex form and parsed back on demand, so the interpretation of a leaf is
//! chosen by whoever reads it. Objects keep their insertion order for the wire;
//! the canonical serializer sorts keys on its own.

use crate::types::Bytes;
use crate::{IconError, IconResult};
use icon_crypto::Address;
use num_bigint::{BigInt, BigUint, Sign};
use std::fmt;

/// A leaf, object or array
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcItem {
    Value(RpcValue),
    Object(RpcObject),
    Array(RpcArray),
}

impl RpcItem {
    pub fn as_value(&self) -> IconResult<&RpcValue> {
        match self {
            RpcItem::Value(value) => Ok(value),
            other => Err(IconError::format(format!("expected a value, found {}", other.kind()))),
        }
    }

    pub fn as_object(&self) -> IconResult<&RpcObject> {
        match self {
            RpcItem::Object(object) => Ok(object),
            other => Err(IconError::format(format!("expected an object, found {}", other.kind()))),
        }
    }

    pub fn as_array(&self) -> IconResult<&RpcArray> {
        match self {
            RpcItem::Array(array) => Ok(array),
            other => Err(IconError::format(format!("expected an array, found {}", other.kind()))),
        }
    }

    pub fn as_string(&self) -> IconResult<String> {
        Ok(self.as_value()?.as_string())
    }

    pub fn as_integer(&self) -> IconResult<BigInt> {
        self.as_value()?.as_integer()
    }

    pub fn as_boolean(&self) -> IconResult<bool> {
        self.as_value()?.as_boolean()
    }

    pub fn as_bytes(&self) -> IconResult<Bytes> {
        self.as_value()?.as_bytes()
    }

    pub fn as_address(&self) -> IconResult<Address> {
        self.as_value()?.as_address()
    }

    pub fn is_empty(&self) -> bool {
        match self {
            RpcItem::Value(value) => value.as_str().is_empty(),
            RpcItem::Object(object) => object.is_empty(),
            RpcItem::Array(array) => array.is_empty(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            RpcItem::Value(_) => "value",
            RpcItem::Object(_) => "object",
            RpcItem::Array(_) => "array",
        }
    }
}

impl From<RpcValue> for RpcItem {
    fn from(value: RpcValue) -> Self {
        RpcItem::Value(value)
    }
}

impl From<RpcObject> for RpcItem {
    fn from(object: RpcObject) -> Self {
        RpcItem::Object(object)
    }
}

impl From<RpcArray> for RpcItem {
    fn from(array: RpcArray) -> Self {
        RpcItem::Array(array)
    }
}

macro_rules! item_from_value {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for RpcItem {
                fn from(value: $t) -> Self {
                    RpcItem::Value(RpcValue::from(value))
                }
            }
        )*
    };
}

item_from_value!(&str, String, &[u8], Vec<u8>, Bytes, &Bytes, BigInt, &BigInt, i64, u64, bool, Address, &Address);

/// A leaf holding its canonical string form
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RpcValue(String);

impl RpcValue {
    /// Wrap a string verbatim
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// `0x` + lowercase hex of every byte, leading zero bytes kept
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(format!("0x{}", hex::encode(bytes)))
    }

    /// `0x` + lowercase hex magnitude, `-` before the prefix when negative
    pub fn from_integer(value: &BigInt) -> Self {
        let sign = if value.sign() == Sign::Minus { "-" } else { "" };
        Self(format!("{}0x{:x}", sign, value.magnitude()))
    }

    pub fn from_bool(value: bool) -> Self {
        Self(if value { "0x1" } else { "0x0" }.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_string(&self) -> String {
        self.0.clone()
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Parse `[-]0x<hex>`; a leading `+` or a missing prefix is rejected
    pub fn as_integer(&self) -> IconResult<BigInt> {
        let (sign, rest) = match self.0.strip_prefix('-') {
            Some(rest) => (Sign::Minus, rest),
            None => (Sign::Plus, self.0.as_str()),
        };
        let body = rest
            .strip_prefix("0x")
            .ok_or_else(|| IconError::format(format!("integer must be 0x-prefixed hex: {:?}", self.0)))?;
        let magnitude = parse_hex_magnitude(body)
            .ok_or_else(|| IconError::format(format!("invalid hex integer: {:?}", self.0)))?;
        Ok(BigInt::from_biguint(sign, magnitude))
    }

    /// Parse either the hex form or a plain decimal literal.
    ///
    /// Decimal text only shows up when a node answered with a JSON number
    /// (block heights and timestamps of older block formats).
    pub fn as_number(&self) -> IconResult<BigInt> {
        if self.is_decimal() {
            return self
                .0
                .parse::<BigInt>()
                .map_err(|e| IconError::format(format!("invalid decimal {:?}: {}", self.0, e)));
        }
        self.as_integer()
    }

    /// Parse `0x` followed by an even number of hex digits
    pub fn as_bytes(&self) -> IconResult<Bytes> {
        Bytes::from_hex(&self.0)
    }

    /// Only `0x0` and `0x1` are booleans
    pub fn as_boolean(&self) -> IconResult<bool> {
        match self.0.as_str() {
            "0x1" => Ok(true),
            "0x0" => Ok(false),
            other => Err(IconError::format(format!("invalid boolean: {:?}", other))),
        }
    }

    pub fn as_address(&self) -> IconResult<Address> {
        self.0.parse::<Address>().map_err(|e| IconError::Format(e.to_string()))
    }

    fn is_decimal(&self) -> bool {
        let digits = self.0.strip_prefix('-').unwrap_or(&self.0);
        !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
    }
}

fn parse_hex_magnitude(body: &str) -> Option<BigUint> {
    // BigUint::parse_bytes tolerates '_' separators, which the wire format does not
    if body.is_empty() || !body.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    BigUint::parse_bytes(body.as_bytes(), 16)
}

impl fmt::Display for RpcValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RpcValue {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RpcValue {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&[u8]> for RpcValue {
    fn from(value: &[u8]) -> Self {
        Self::from_bytes(value)
    }
}

impl From<Vec<u8>> for RpcValue {
    fn from(value: Vec<u8>) -> Self {
        Self::from_bytes(&value)
    }
}

impl From<Bytes> for RpcValue {
    fn from(value: Bytes) -> Self {
        Self::from_bytes(value.as_slice())
    }
}

impl From<&Bytes> for RpcValue {
    fn from(value: &Bytes) -> Self {
        Self::from_bytes(value.as_slice())
    }
}

impl From<BigInt> for RpcValue {
    fn from(value: BigInt) -> Self {
        Self::from_integer(&value)
    }
}

impl From<&BigInt> for RpcValue {
    fn from(value: &BigInt) -> Self {
        Self::from_integer(value)
    }
}

impl From<i64> for RpcValue {
    fn from(value: i64) -> Self {
        Self::from_integer(&BigInt::from(value))
    }
}

impl From<u64> for RpcValue {
    fn from(value: u64) -> Self {
        Self::from_integer(&BigInt::from(value))
    }
}

impl From<bool> for RpcValue {
    fn from(value: bool) -> Self {
        Self::from_bool(value)
    }
}

impl From<Address> for RpcValue {
    fn from(value: Address) -> Self {
        Self(value.to_string())
    }
}

impl From<&Address> for RpcValue {
    fn from(value: &Address) -> Self {
        Self(value.to_string())
    }
}

/// Read-only ordered mapping from keys to items
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RpcObject {
    entries: Vec<(String, RpcItem)>,
}

impl RpcObject {
    pub fn builder() -> RpcObjectBuilder {
        RpcObjectBuilder::new()
    }

    /// A builder pre-populated with this object's entries; `self` is left untouched
    pub fn to_builder(&self) -> RpcObjectBuilder {
        RpcObjectBuilder { entries: self.entries.clone() }
    }

    /// `None` when the key is absent
    pub fn get(&self, key: &str) -> Option<&RpcItem> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, item)| item)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RpcItem)> {
        self.entries.iter().map(|(k, item)| (k.as_str(), item))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Scratch space for an `RpcObject`
#[derive(Debug, Default)]
pub struct RpcObjectBuilder {
    entries: Vec<(String, RpcItem)>,
}

impl RpcObjectBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace `key`; a replaced key keeps its original position
    pub fn put(mut self, key: impl Into<String>, item: impl Into<RpcItem>) -> Self {
        self.insert(key, item);
        self
    }

    /// Insert only when `item` is present
    pub fn put_opt<I: Into<RpcItem>>(mut self, key: impl Into<String>, item: Option<I>) -> Self {
        if let Some(item) = item {
            self.insert(key, item);
        }
        self
    }

    /// Non-consuming variant of `put` for loops
    pub fn insert(&mut self, key: impl Into<String>, item: impl Into<RpcItem>) {
        let key = key.into();
        let item = item.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = item,
            None => self.entries.push((key, item)),
        }
    }

    pub fn remove(mut self, key: &str) -> Self {
        self.entries.retain(|(k, _)| k != key);
        self
    }

    pub fn build(self) -> RpcObject {
        RpcObject { entries: self.entries }
    }
}

/// Read-only sequence of items.
///
/// Slots are optional: a `null` element received from a node stays in place
/// so that positions keep their meaning.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RpcArray {
    items: Vec<Option<RpcItem>>,
}

impl RpcArray {
    pub fn builder() -> RpcArrayBuilder {
        RpcArrayBuilder::new()
    }

    /// `Ok(None)` for an empty slot, `IndexOutOfBounds` past the end
    pub fn get(&self, index: usize) -> IconResult<Option<&RpcItem>> {
        self.items
            .get(index)
            .map(Option::as_ref)
            .ok_or(IconError::IndexOutOfBounds { index, len: self.items.len() })
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&RpcItem>> {
        self.items.iter().map(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<I: Into<RpcItem>> FromIterator<I> for RpcArray {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        Self { items: iter.into_iter().map(|item| Some(item.into())).collect() }
    }
}

/// Scratch space for an `RpcArray`
#[derive(Debug, Default)]
pub struct RpcArrayBuilder {
    items: Vec<Option<RpcItem>>,
}

impl RpcArrayBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, item: impl Into<RpcItem>) -> Self {
        self.push(item);
        self
    }

    pub fn add_null(mut self) -> Self {
        self.items.push(None);
        self
    }

    pub fn push(&mut self, item: impl Into<RpcItem>) {
        self.items.push(Some(item.into()));
    }

    pub(crate) fn push_slot(&mut self, item: Option<RpcItem>) {
        self.items.push(item);
    }

    pub fn build(self) -> RpcArray {
        RpcArray { items: self.items }
    }
}

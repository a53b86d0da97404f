// icon-core/src/codec.rs

//! JSON codec for `RpcItem`.
//!
//! Encoding is strict: every leaf is written as a JSON string. Decoding is
//! tolerant: JSON numbers keep their decimal text and JSON booleans become
//! `0x1`/`0x0`, so non-conforming node responses still produce usable values.

use crate::rpc_item::{RpcArray, RpcArrayBuilder, RpcItem, RpcObject, RpcObjectBuilder, RpcValue};
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fmt;

impl Serialize for RpcItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RpcItem::Value(value) => value.serialize(serializer),
            RpcItem::Object(object) => object.serialize(serializer),
            RpcItem::Array(array) => array.serialize(serializer),
        }
    }
}

impl Serialize for RpcValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl Serialize for RpcObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, item) in self.iter() {
            map.serialize_entry(key, item)?;
        }
        map.end()
    }
}

impl Serialize for RpcArray {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for item in self.iter() {
            seq.serialize_element(&item)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for RpcItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer
            .deserialize_any(ItemVisitor)?
            .ok_or_else(|| de::Error::custom("null is only allowed inside arrays and objects"))
    }
}

impl<'de> Deserialize<'de> for RpcObject {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RpcItem::deserialize(deserializer)? {
            RpcItem::Object(object) => Ok(object),
            _ => Err(de::Error::custom("expected a JSON object")),
        }
    }
}

/// Yields `None` for JSON `null`
struct ItemVisitor;

impl<'de> Visitor<'de> for ItemVisitor {
    type Value = Option<RpcItem>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON-RPC value")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Some(RpcValue::new(v).into()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(Some(RpcValue::new(v).into()))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(Some(RpcValue::from_bool(v).into()))
    }

    // Numbers keep their decimal text and skip hex validation
    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(RpcValue::new(v.to_string()).into()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(RpcValue::new(v.to_string()).into()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(Some(RpcValue::new(v.to_string()).into()))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(ItemVisitor)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut builder = RpcArrayBuilder::new();
        while let Some(slot) = seq.next_element::<Slot>()? {
            builder.push_slot(slot.0);
        }
        Ok(Some(builder.build().into()))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut builder = RpcObjectBuilder::new();
        let mut first = true;
        while let Some(key) = map.next_key::<String>()? {
            if first && key == NUMBER_TOKEN {
                let text: String = map.next_value()?;
                return Ok(Some(RpcValue::new(text).into()));
            }
            first = false;
            // null fields read as absent
            if let Some(item) = map.next_value::<Slot>()?.0 {
                builder.insert(key, item);
            }
        }
        Ok(Some(builder.build().into()))
    }
}

/// serde_json built with `arbitrary_precision` hands every number over as a
/// one-entry map under this key, with the literal as its value
const NUMBER_TOKEN: &str = "$serde_json::private::Number";

/// A possibly-null element
struct Slot(Option<RpcItem>);

impl<'de> Deserialize<'de> for Slot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ItemVisitor).map(Slot)
    }
}

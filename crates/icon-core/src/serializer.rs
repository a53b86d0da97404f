// icon-core/src/serializer.rs

//! Canonical string form of transaction parameters.
//!
//! The string is `icx_sendTransaction` followed by the parameters with keys
//! sorted at every level, every token joined with `.`. Nested objects are
//! wrapped in `{}`, nested arrays in `[]`, an empty array slot is written as
//! `\0`, and `\ . { } [ ]` inside keys and values are escaped with `\`.
//! SHA3-256 over that string is the digest a wallet signs, and also the
//! transaction hash the network reports.

use crate::rpc_item::{RpcArray, RpcItem, RpcObject};
use icon_crypto::{Hash, Hashable};

/// Method name every signed transaction is submitted under
pub const SEND_TRANSACTION_METHOD: &str = "icx_sendTransaction";

/// Canonical serialization of `params`.
///
/// An empty object yields the bare method segment.
pub fn serialize(params: &RpcObject) -> String {
    let mut out = String::from(SEND_TRANSACTION_METHOD);
    if !params.is_empty() {
        out.push('.');
        write_object_entries(&mut out, params);
    }
    out
}

/// SHA3-256 digest of the canonical serialization
pub fn message_hash(params: &RpcObject) -> Hash {
    serialize(params).hash()
}

fn write_object_entries(out: &mut String, object: &RpcObject) {
    let mut entries: Vec<(&str, &RpcItem)> = object.iter().collect();
    entries.sort_unstable_by(|a, b| a.0.cmp(b.0));

    for (i, (key, item)) in entries.into_iter().enumerate() {
        if i > 0 {
            out.push('.');
        }
        write_escaped(out, key);
        out.push('.');
        write_item(out, item);
    }
}

fn write_array_items(out: &mut String, array: &RpcArray) {
    for (i, item) in array.iter().enumerate() {
        if i > 0 {
            out.push('.');
        }
        match item {
            Some(item) => write_item(out, item),
            None => out.push_str("\\0"),
        }
    }
}

fn write_item(out: &mut String, item: &RpcItem) {
    match item {
        RpcItem::Value(value) => write_escaped(out, value.as_str()),
        RpcItem::Object(object) => {
            out.push('{');
            write_object_entries(out, object);
            out.push('}');
        }
        RpcItem::Array(array) => {
            out.push('[');
            write_array_items(out, array);
            out.push(']');
        }
    }
}

fn write_escaped(out: &mut String, s: &str) {
    for c in s.chars() {
        if matches!(c, '\\' | '.' | '{' | '}' | '[' | ']') {
            out.push('\\');
        }
        out.push(c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc_item::RpcArray;
    use num_bigint::BigInt;

    const FROM: &str = "hxbe258ceb872e08851f1f59694dac2558708ece11";
    const TO: &str = "hx5bfdb090f43a808005ffc27c25b213145e80b7cd";

    fn transfer_params() -> RpcObject {
        RpcObject::builder()
            .put("version", 3i64)
            .put("from", FROM)
            .put("to", TO)
            .put("value", BigInt::from(1_000_000_000_000_000_000u64))
            .put("stepLimit", 0x12345i64)
            .put("timestamp", 0x563a6cf330136i64)
            .put("nonce", 1i64)
            .build()
    }

    #[test]
    fn test_transfer_serialization() {
        assert_eq!(
            serialize(&transfer_params()),
            "icx_sendTransaction.from.hxbe258ceb872e08851f1f59694dac2558708ece11.nonce.0x1.\
             stepLimit.0x12345.timestamp.0x563a6cf330136.to.hx5bfdb090f43a808005ffc27c25b213145e80b7cd.\
             value.0xde0b6b3a7640000.version.0x3"
        );
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let forward = RpcObject::builder().put("from", FROM).put("to", TO).put("value", 10i64).build();
        let backward = RpcObject::builder().put("value", 10i64).put("to", TO).put("from", FROM).build();
        assert_eq!(serialize(&forward), serialize(&backward));
        assert_eq!(message_hash(&forward), message_hash(&backward));
    }

    #[test]
    fn test_nested_object_and_array() {
        let params = RpcObject::builder()
            .put("dataType", "call")
            .put(
                "data",
                RpcObject::builder()
                    .put("params", RpcObject::builder().put("to", TO).put("amount", 1i64).build())
                    .put("method", "transfer")
                    .build(),
            )
            .put("list", RpcArray::builder().add("a").add_null().add(RpcArray::builder().add(2i64).build()).build())
            .build();

        assert_eq!(
            serialize(&params),
            format!(
                "icx_sendTransaction.data.{{method.transfer.params.{{amount.0x1.to.{}}}}}.dataType.call.list.[a.\\0.[0x2]]",
                TO
            )
        );
    }

    #[test]
    fn test_special_characters_escaped() {
        let params = RpcObject::builder()
            .put("data", "a.b{c}[d]\\e")
            .put("k.ey", "v")
            .build();
        assert_eq!(
            serialize(&params),
            "icx_sendTransaction.data.a\\.b\\{c\\}\\[d\\]\\\\e.k\\.ey.v"
        );
    }

    #[test]
    fn test_empty_params_keep_method_segment() {
        assert_eq!(serialize(&RpcObject::default()), "icx_sendTransaction");
    }

    #[test]
    fn test_message_hash_is_sha3_of_serialization() {
        let params = transfer_params();
        assert_eq!(message_hash(&params), serialize(&params).as_bytes().hash());
        assert_eq!(message_hash(&params).to_hex().len(), 64);
    }
}

// icon-core/src/converter.rs

//! Conversion between response items and typed results.
//!
//! The built-in result types form a closed set (`ResultKind`). Callers can
//! register their own converters for any other type, or to replace a built-in
//! one; registered converters are consulted first, in registration order.

use crate::block::{object_list, Block, ConfirmedTransaction};
use crate::result::{ScoreApi, TransactionResult};
use crate::rpc_item::{RpcArray, RpcItem};
use crate::types::Bytes;
use crate::{IconError, IconResult};
use icon_crypto::Address;
use num_bigint::BigInt;
use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Bidirectional mapping between `T` and `RpcItem`
pub trait RpcConverter<T>: Send + Sync {
    fn convert_to(&self, item: &RpcItem) -> IconResult<T>;

    fn convert_from(&self, value: &T) -> IconResult<RpcItem>;
}

/// Result types with a built-in converter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultKind {
    Integer,
    Boolean,
    String,
    Bytes,
    Address,
    Item,
    Block,
    ConfirmedTransaction,
    TransactionResult,
    ScoreApiList,
}

impl ResultKind {
    pub const ALL: [ResultKind; 10] = [
        ResultKind::Integer,
        ResultKind::Boolean,
        ResultKind::String,
        ResultKind::Bytes,
        ResultKind::Address,
        ResultKind::Item,
        ResultKind::Block,
        ResultKind::ConfirmedTransaction,
        ResultKind::TransactionResult,
        ResultKind::ScoreApiList,
    ];

    fn result_type(self) -> TypeId {
        match self {
            ResultKind::Integer => TypeId::of::<BigInt>(),
            ResultKind::Boolean => TypeId::of::<bool>(),
            ResultKind::String => TypeId::of::<String>(),
            ResultKind::Bytes => TypeId::of::<Bytes>(),
            ResultKind::Address => TypeId::of::<Address>(),
            ResultKind::Item => TypeId::of::<RpcItem>(),
            ResultKind::Block => TypeId::of::<Block>(),
            ResultKind::ConfirmedTransaction => TypeId::of::<ConfirmedTransaction>(),
            ResultKind::TransactionResult => TypeId::of::<TransactionResult>(),
            ResultKind::ScoreApiList => TypeId::of::<Vec<ScoreApi>>(),
        }
    }

    /// Kind whose built-in converter produces `T`, if any
    pub fn of<T: 'static>() -> Option<ResultKind> {
        let id = TypeId::of::<T>();
        Self::ALL.into_iter().find(|kind| kind.result_type() == id)
    }

    /// Built-in converter as a boxed `Arc<dyn RpcConverter<_>>` of the kind's type
    fn converter(self) -> Box<dyn Any> {
        fn boxed<T: 'static>(converter: impl RpcConverter<T> + 'static) -> Box<dyn Any> {
            Box::new(Arc::new(converter) as Arc<dyn RpcConverter<T>>)
        }

        match self {
            ResultKind::Integer => boxed(IntegerConverter),
            ResultKind::Boolean => boxed(BooleanConverter),
            ResultKind::String => boxed(StringConverter),
            ResultKind::Bytes => boxed(BytesConverter),
            ResultKind::Address => boxed(AddressConverter),
            ResultKind::Item => boxed(ItemConverter),
            ResultKind::Block => boxed(BlockConverter),
            ResultKind::ConfirmedTransaction => boxed(ConfirmedTransactionConverter),
            ResultKind::TransactionResult => boxed(TransactionResultConverter),
            ResultKind::ScoreApiList => boxed(ScoreApiListConverter),
        }
    }
}

/// Integers in `0x` hex, or decimal text taken from a JSON number
pub struct IntegerConverter;

impl RpcConverter<BigInt> for IntegerConverter {
    fn convert_to(&self, item: &RpcItem) -> IconResult<BigInt> {
        item.as_value()?.as_number()
    }

    fn convert_from(&self, value: &BigInt) -> IconResult<RpcItem> {
        Ok(value.into())
    }
}

pub struct BooleanConverter;

impl RpcConverter<bool> for BooleanConverter {
    fn convert_to(&self, item: &RpcItem) -> IconResult<bool> {
        item.as_boolean()
    }

    fn convert_from(&self, value: &bool) -> IconResult<RpcItem> {
        Ok((*value).into())
    }
}

pub struct StringConverter;

impl RpcConverter<String> for StringConverter {
    fn convert_to(&self, item: &RpcItem) -> IconResult<String> {
        item.as_string()
    }

    fn convert_from(&self, value: &String) -> IconResult<RpcItem> {
        Ok(value.as_str().into())
    }
}

pub struct BytesConverter;

impl RpcConverter<Bytes> for BytesConverter {
    fn convert_to(&self, item: &RpcItem) -> IconResult<Bytes> {
        item.as_bytes()
    }

    fn convert_from(&self, value: &Bytes) -> IconResult<RpcItem> {
        Ok(value.into())
    }
}

pub struct AddressConverter;

impl RpcConverter<Address> for AddressConverter {
    fn convert_to(&self, item: &RpcItem) -> IconResult<Address> {
        item.as_address()
    }

    fn convert_from(&self, value: &Address) -> IconResult<RpcItem> {
        Ok(value.into())
    }
}

/// Hands the item over untouched
pub struct ItemConverter;

impl RpcConverter<RpcItem> for ItemConverter {
    fn convert_to(&self, item: &RpcItem) -> IconResult<RpcItem> {
        Ok(item.clone())
    }

    fn convert_from(&self, value: &RpcItem) -> IconResult<RpcItem> {
        Ok(value.clone())
    }
}

pub struct BlockConverter;

impl RpcConverter<Block> for BlockConverter {
    fn convert_to(&self, item: &RpcItem) -> IconResult<Block> {
        Ok(Block::new(item.as_object()?.clone()))
    }

    fn convert_from(&self, value: &Block) -> IconResult<RpcItem> {
        Ok(value.properties().clone().into())
    }
}

pub struct ConfirmedTransactionConverter;

impl RpcConverter<ConfirmedTransaction> for ConfirmedTransactionConverter {
    fn convert_to(&self, item: &RpcItem) -> IconResult<ConfirmedTransaction> {
        Ok(ConfirmedTransaction::new(item.as_object()?.clone()))
    }

    fn convert_from(&self, value: &ConfirmedTransaction) -> IconResult<RpcItem> {
        Ok(value.properties().clone().into())
    }
}

pub struct TransactionResultConverter;

impl RpcConverter<TransactionResult> for TransactionResultConverter {
    fn convert_to(&self, item: &RpcItem) -> IconResult<TransactionResult> {
        Ok(TransactionResult::new(item.as_object()?.clone()))
    }

    fn convert_from(&self, value: &TransactionResult) -> IconResult<RpcItem> {
        Ok(value.properties().clone().into())
    }
}

pub struct ScoreApiListConverter;

impl RpcConverter<Vec<ScoreApi>> for ScoreApiListConverter {
    fn convert_to(&self, item: &RpcItem) -> IconResult<Vec<ScoreApi>> {
        object_list(item.as_array()?, "result")?
            .into_iter()
            .map(ScoreApi::from_object)
            .collect()
    }

    fn convert_from(&self, value: &Vec<ScoreApi>) -> IconResult<RpcItem> {
        Ok(value.iter().map(ScoreApi::to_object).collect::<RpcArray>().into())
    }
}

type ToFn<T> = dyn Fn(&RpcItem) -> IconResult<T> + Send + Sync;
type FromFn<T> = dyn Fn(&T) -> IconResult<RpcItem> + Send + Sync;

/// Converter built from closures. Without a `from` closure, `convert_from`
/// fails with `NoConverter`.
pub struct FnConverter<T> {
    to: Box<ToFn<T>>,
    from: Option<Box<FromFn<T>>>,
}

impl<T> FnConverter<T> {
    pub fn new(to: impl Fn(&RpcItem) -> IconResult<T> + Send + Sync + 'static) -> Self {
        Self { to: Box::new(to), from: None }
    }

    pub fn with_from(mut self, from: impl Fn(&T) -> IconResult<RpcItem> + Send + Sync + 'static) -> Self {
        self.from = Some(Box::new(from));
        self
    }
}

impl<T> RpcConverter<T> for FnConverter<T> {
    fn convert_to(&self, item: &RpcItem) -> IconResult<T> {
        (self.to)(item)
    }

    fn convert_from(&self, value: &T) -> IconResult<RpcItem> {
        match &self.from {
            Some(from) => from(value),
            None => Err(IconError::NoConverter(type_name::<T>().to_string())),
        }
    }
}

/// Converters looked up by result type
#[derive(Default, Clone)]
pub struct ConverterRegistry {
    // Each entry holds an `Arc<dyn RpcConverter<T>>` for the `T` named by its `TypeId`
    custom: Vec<(TypeId, Arc<dyn Any + Send + Sync>)>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: 'static>(&mut self, converter: impl RpcConverter<T> + 'static) {
        tracing::debug!(result_type = type_name::<T>(), "registering converter");
        let converter: Arc<dyn RpcConverter<T>> = Arc::new(converter);
        self.custom.push((TypeId::of::<T>(), Arc::new(converter)));
    }

    /// Converter for `T`: the first registered one, else the built-in
    pub fn find<T: 'static>(&self) -> IconResult<Arc<dyn RpcConverter<T>>> {
        let id = TypeId::of::<T>();
        let custom = self
            .custom
            .iter()
            .filter(|(entry, _)| *entry == id)
            .find_map(|(_, converter)| converter.downcast_ref::<Arc<dyn RpcConverter<T>>>());
        if let Some(converter) = custom {
            return Ok(converter.clone());
        }

        ResultKind::of::<T>()
            .and_then(|kind| kind.converter().downcast::<Arc<dyn RpcConverter<T>>>().ok())
            .map(|converter| *converter)
            .ok_or_else(|| IconError::NoConverter(type_name::<T>().to_string()))
    }

    pub fn convert_to<T: 'static>(&self, item: &RpcItem) -> IconResult<T> {
        self.find::<T>()?.convert_to(item)
    }

    pub fn convert_from<T: 'static>(&self, value: &T) -> IconResult<RpcItem> {
        self.find::<T>()?.convert_from(value)
    }

    pub fn len(&self) -> usize {
        self.custom.len()
    }

    pub fn is_empty(&self) -> bool {
        self.custom.is_empty()
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterRegistry").field("custom", &self.custom.len()).finish()
    }
}

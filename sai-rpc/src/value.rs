/*
 *
 *    Copyright (c) 2024 SAI RPC Authors
 *
 *    Licensed under the Apache License, Version 2.0 (the "License");
 *    you may not use this file except in compliance with the License.
 *    You may obtain a copy of the License at
 *
 *        http://www.apache.org/licenses/LICENSE-2.0
 *
 *    Unless required by applicable law or agreed to in writing, software
 *    distributed under the License is distributed on an "AS IS" BASIS,
 *    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *    See the License for the specific language governing permissions and
 *    limitations under the License.
 */

//! Native attribute values.

use sai_meta::{AttrId, ObjectId, ValueKind};

use crate::acl::{AclAction, AclCapability, AclField, AclResource};
use crate::addr::{IpAddress, IpPrefix, Ip4, Ip6, Mac};
use crate::config::CodecConfig;
use crate::error::{Error, ErrorCode};
use crate::list::{ListAlloc, Malloc, NativeList};
use crate::qos::QosMap;
use crate::wire::{WireConvert, WireS32Range, WireU16Range, WireU32Range, WireValue};

macro_rules! wire_convert_for_int {
    ($($t:ident:$w:ident)*) => {
        $(
            #[allow(clippy::unnecessary_cast)]
            impl WireConvert for $t {
                type Wire = $w;

                fn from_wire(wire: &$w, _config: &CodecConfig) -> Result<Self, Error> {
                    Ok(*wire as $t)
                }

                fn to_wire(&self) -> $w {
                    *self as $w
                }
            }
        )*
    };
}

wire_convert_for_int!(u8:i8 i8:i8 u16:i16 i16:i16 u32:i32 i32:i32 u64:i64 i64:i64);

pub const CHARDATA_LEN: usize = 32;

/// `char chardata[32]`: NUL-padded, not necessarily NUL-terminated.
pub type CharData = [u8; CHARDATA_LEN];

/// Copy a string into a NUL-padded chardata buffer.
///
/// Strings longer than the buffer are rejected rather than truncated.
pub fn chardata_from_wire(s: &str) -> Result<CharData, Error> {
    let bytes = s.as_bytes();

    if bytes.len() > CHARDATA_LEN {
        log::warn!(
            "Chardata of {} bytes does not fit into {CHARDATA_LEN} bytes",
            bytes.len()
        );
        Err(ErrorCode::CharDataTooLong)?;
    }

    let mut data = [0; CHARDATA_LEN];
    data[..bytes.len()].copy_from_slice(bytes);

    Ok(data)
}

/// The text of a chardata buffer, up to the first NUL.
pub fn chardata_to_wire(data: &CharData) -> Result<String, Error> {
    let len = data.iter().position(|b| *b == 0).unwrap_or(CHARDATA_LEN);

    Ok(core::str::from_utf8(&data[..len])?.to_string())
}

/// `sai_u32_range_t`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(C)]
pub struct U32Range {
    pub min: u32,
    pub max: u32,
}

impl WireConvert for U32Range {
    type Wire = WireU32Range;

    fn from_wire(wire: &WireU32Range, _config: &CodecConfig) -> Result<Self, Error> {
        Ok(Self {
            min: wire.min as u32,
            max: wire.max as u32,
        })
    }

    fn to_wire(&self) -> WireU32Range {
        WireU32Range {
            min: self.min as i32,
            max: self.max as i32,
        }
    }
}

/// `sai_s32_range_t`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(C)]
pub struct S32Range {
    pub min: i32,
    pub max: i32,
}

impl WireConvert for S32Range {
    type Wire = WireS32Range;

    fn from_wire(wire: &WireS32Range, _config: &CodecConfig) -> Result<Self, Error> {
        Ok(Self {
            min: wire.min,
            max: wire.max,
        })
    }

    fn to_wire(&self) -> WireS32Range {
        WireS32Range {
            min: self.min,
            max: self.max,
        }
    }
}

/// `sai_u16_range_t`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(C)]
pub struct U16Range {
    pub min: u16,
    pub max: u16,
}

impl WireConvert for U16Range {
    type Wire = WireU16Range;

    fn from_wire(wire: &WireU16Range, _config: &CodecConfig) -> Result<Self, Error> {
        Ok(Self {
            min: wire.min as u16,
            max: wire.max as u16,
        })
    }

    fn to_wire(&self) -> WireU16Range {
        WireU16Range {
            min: self.min as i16,
            max: self.max as i16,
        }
    }
}

/// A native attribute value (`sai_attribute_value_t`).
///
/// The active variant must agree with the value kind the metadata registry
/// declares for the attribute; the codec refuses values that do not.
#[derive(Debug, PartialEq, Eq)]
pub enum NativeValue<A: ListAlloc = Malloc> {
    Bool(bool),
    CharData(CharData),
    U8(u8),
    S8(i8),
    U16(u16),
    S16(i16),
    U32(u32),
    S32(i32),
    U64(u64),
    S64(i64),
    Mac(Mac),
    Ip4(Ip4),
    Ip6(Ip6),
    IpAddress(IpAddress),
    IpPrefix(IpPrefix),
    ObjectId(ObjectId),
    ObjectList(NativeList<ObjectId, A>),
    U8List(NativeList<u8, A>),
    S8List(NativeList<i8, A>),
    U16List(NativeList<u16, A>),
    S16List(NativeList<i16, A>),
    U32List(NativeList<u32, A>),
    S32List(NativeList<i32, A>),
    U32Range(U32Range),
    S32Range(S32Range),
    U16RangeList(NativeList<U16Range, A>),
    AclField(AclField<A>),
    AclAction(AclAction<A>),
    AclCapability(AclCapability<A>),
    AclResourceList(NativeList<AclResource, A>),
    IpAddressList(NativeList<IpAddress, A>),
    IpPrefixList(NativeList<IpPrefix, A>),
    QosMapList(NativeList<QosMap, A>),
}

impl<A: ListAlloc> NativeValue<A> {
    /// The value kind of the active variant.
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::CharData(_) => ValueKind::Chardata,
            Self::U8(_) => ValueKind::Uint8,
            Self::S8(_) => ValueKind::Int8,
            Self::U16(_) => ValueKind::Uint16,
            Self::S16(_) => ValueKind::Int16,
            Self::U32(_) => ValueKind::Uint32,
            Self::S32(_) => ValueKind::Int32,
            Self::U64(_) => ValueKind::Uint64,
            Self::S64(_) => ValueKind::Int64,
            Self::Mac(_) => ValueKind::Mac,
            Self::Ip4(_) => ValueKind::Ipv4,
            Self::Ip6(_) => ValueKind::Ipv6,
            Self::IpAddress(_) => ValueKind::IpAddress,
            Self::IpPrefix(_) => ValueKind::IpPrefix,
            Self::ObjectId(_) => ValueKind::ObjectId,
            Self::ObjectList(_) => ValueKind::ObjectList,
            Self::U8List(_) => ValueKind::Uint8List,
            Self::S8List(_) => ValueKind::Int8List,
            Self::U16List(_) => ValueKind::Uint16List,
            Self::S16List(_) => ValueKind::Int16List,
            Self::U32List(_) => ValueKind::Uint32List,
            Self::S32List(_) => ValueKind::Int32List,
            Self::U32Range(_) => ValueKind::Uint32Range,
            Self::S32Range(_) => ValueKind::Int32Range,
            Self::U16RangeList(_) => ValueKind::Uint16RangeList,
            Self::AclField(field) => field.kind(),
            Self::AclAction(action) => action.kind(),
            Self::AclCapability(_) => ValueKind::AclCapability,
            Self::AclResourceList(_) => ValueKind::AclResourceList,
            Self::IpAddressList(_) => ValueKind::IpAddressList,
            Self::IpPrefixList(_) => ValueKind::IpPrefixList,
            Self::QosMapList(_) => ValueKind::QosMapList,
        }
    }

    /// Convert a wire value into the native value of the same kind.
    ///
    /// Every list in the result is freshly allocated. On error, whatever was
    /// allocated so far has already been released.
    pub fn from_wire(wire: &WireValue, config: &CodecConfig) -> Result<Self, Error> {
        let value = match wire {
            WireValue::BoolData(v) => Self::Bool(*v),
            WireValue::CharData(v) => Self::CharData(chardata_from_wire(v)?),
            WireValue::U8(v) => Self::U8(WireConvert::from_wire(v, config)?),
            WireValue::S8(v) => Self::S8(*v),
            WireValue::U16(v) => Self::U16(WireConvert::from_wire(v, config)?),
            WireValue::S16(v) => Self::S16(*v),
            WireValue::U32(v) => Self::U32(WireConvert::from_wire(v, config)?),
            WireValue::S32(v) => Self::S32(*v),
            WireValue::U64(v) => Self::U64(WireConvert::from_wire(v, config)?),
            WireValue::S64(v) => Self::S64(*v),
            WireValue::Mac(v) => Self::Mac(WireConvert::from_wire(v, config)?),
            WireValue::Ip4(v) => Self::Ip4(WireConvert::from_wire(v, config)?),
            WireValue::Ip6(v) => Self::Ip6(WireConvert::from_wire(v, config)?),
            WireValue::IpAddr(v) => Self::IpAddress(WireConvert::from_wire(v, config)?),
            WireValue::IpPrefix(v) => Self::IpPrefix(WireConvert::from_wire(v, config)?),
            WireValue::Oid(v) => Self::ObjectId(WireConvert::from_wire(v, config)?),
            WireValue::ObjList(v) => Self::ObjectList(NativeList::from_wire(v, config)?),
            WireValue::U8List(v) => Self::U8List(NativeList::from_wire(v, config)?),
            WireValue::S8List(v) => Self::S8List(NativeList::from_wire(v, config)?),
            WireValue::U16List(v) => Self::U16List(NativeList::from_wire(v, config)?),
            WireValue::S16List(v) => Self::S16List(NativeList::from_wire(v, config)?),
            WireValue::U32List(v) => Self::U32List(NativeList::from_wire(v, config)?),
            WireValue::S32List(v) => Self::S32List(NativeList::from_wire(v, config)?),
            WireValue::U32Range(v) => Self::U32Range(WireConvert::from_wire(v, config)?),
            WireValue::S32Range(v) => Self::S32Range(WireConvert::from_wire(v, config)?),
            WireValue::U16RangeList(v) => Self::U16RangeList(NativeList::from_wire(v, config)?),
            WireValue::AclField(v) => Self::AclField(AclField::from_wire(v, config)?),
            WireValue::AclAction(v) => Self::AclAction(AclAction::from_wire(v, config)?),
            WireValue::AclCapability(v) => {
                Self::AclCapability(AclCapability::from_wire(v, config)?)
            }
            WireValue::AclResource(v) => Self::AclResourceList(NativeList::from_wire(v, config)?),
            WireValue::IpAddrList(v) => Self::IpAddressList(NativeList::from_wire(v, config)?),
            WireValue::IpPrefixList(v) => Self::IpPrefixList(NativeList::from_wire(v, config)?),
            WireValue::QosMap(v) => Self::QosMapList(NativeList::from_wire(v, config)?),
        };

        Ok(value)
    }

    /// Convert the value to its wire form, releasing every list it owns.
    pub fn into_wire(self) -> Result<WireValue, Error> {
        let value = match self {
            Self::Bool(v) => WireValue::BoolData(v),
            Self::CharData(v) => WireValue::CharData(chardata_to_wire(&v)?),
            Self::U8(v) => WireValue::U8(v.to_wire()),
            Self::S8(v) => WireValue::S8(v),
            Self::U16(v) => WireValue::U16(v.to_wire()),
            Self::S16(v) => WireValue::S16(v),
            Self::U32(v) => WireValue::U32(v.to_wire()),
            Self::S32(v) => WireValue::S32(v),
            Self::U64(v) => WireValue::U64(v.to_wire()),
            Self::S64(v) => WireValue::S64(v),
            Self::Mac(v) => WireValue::Mac(v.to_wire()),
            Self::Ip4(v) => WireValue::Ip4(v.to_wire()),
            Self::Ip6(v) => WireValue::Ip6(v.to_wire()),
            Self::IpAddress(v) => WireValue::IpAddr(v.to_wire()),
            Self::IpPrefix(v) => WireValue::IpPrefix(v.to_wire()),
            Self::ObjectId(v) => WireValue::Oid(v.to_wire()),
            Self::ObjectList(v) => WireValue::ObjList(v.into_wire()),
            Self::U8List(v) => WireValue::U8List(v.into_wire()),
            Self::S8List(v) => WireValue::S8List(v.into_wire()),
            Self::U16List(v) => WireValue::U16List(v.into_wire()),
            Self::S16List(v) => WireValue::S16List(v.into_wire()),
            Self::U32List(v) => WireValue::U32List(v.into_wire()),
            Self::S32List(v) => WireValue::S32List(v.into_wire()),
            Self::U32Range(v) => WireValue::U32Range(v.to_wire()),
            Self::S32Range(v) => WireValue::S32Range(v.to_wire()),
            Self::U16RangeList(v) => WireValue::U16RangeList(v.into_wire()),
            Self::AclField(v) => WireValue::AclField(v.into_wire()),
            Self::AclAction(v) => WireValue::AclAction(v.into_wire()),
            Self::AclCapability(v) => WireValue::AclCapability(v.into_wire()),
            Self::AclResourceList(v) => WireValue::AclResource(v.into_wire()),
            Self::IpAddressList(v) => WireValue::IpAddrList(v.into_wire()),
            Self::IpPrefixList(v) => WireValue::IpPrefixList(v.into_wire()),
            Self::QosMapList(v) => WireValue::QosMap(v.into_wire()),
        };

        Ok(value)
    }
}

/// `sai_attribute_t`
#[derive(Debug, PartialEq, Eq)]
pub struct NativeAttribute<A: ListAlloc = Malloc> {
    pub id: AttrId,
    pub value: NativeValue<A>,
}

impl<A: ListAlloc> NativeAttribute<A> {
    pub const fn new(id: AttrId, value: NativeValue<A>) -> Self {
        Self { id, value }
    }
}

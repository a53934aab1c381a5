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

//! The SAI Thrift wire model.
//!
//! These types mirror the structs and unions of the SAI Thrift IDL. The IDL has
//! no unsigned integers, so every unsigned native width travels in the signed
//! Thrift type of the same width (`u8` as `i8`, `u32` as `i32`, object ids as
//! `i64`) and is reinterpreted bit for bit on either side.
//!
//! Addresses travel as text: MAC addresses as `xx:xx:xx:xx:xx:xx`, IPv4 as a
//! dotted quad and IPv6 in its RFC 5952 form.

use sai_meta::{AttrId, ValueKind};

use crate::config::CodecConfig;
use crate::error::Error;

/// A value that has a counterpart in the wire model.
///
/// Implemented for the native scalars and records; the list marshaller and the
/// value dispatchers are built on top of it.
pub trait WireConvert: Copy {
    type Wire;

    fn from_wire(wire: &Self::Wire, config: &CodecConfig) -> Result<Self, Error>;

    fn to_wire(&self) -> Self::Wire;
}

/// The address union of `sai_thrift_ip_address_t`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WireIpAddr {
    Ip4(String),
    Ip6(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WireIpAddress {
    /// `SAI_IP_ADDR_FAMILY_*`; selects which arm of `addr` is meaningful
    pub addr_family: i32,
    pub addr: WireIpAddr,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WireIpPrefix {
    pub addr_family: i32,
    pub addr: WireIpAddr,
    pub mask: WireIpAddr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WireU32Range {
    pub min: i32,
    pub max: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WireS32Range {
    pub min: i32,
    pub max: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WireU16Range {
    pub min: i16,
    pub max: i16,
}

/// Data and mask of an ACL match field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WireAclFieldData {
    Bool(bool),
    U8 { data: i8, mask: i8 },
    S8 { data: i8, mask: i8 },
    U16 { data: i16, mask: i16 },
    S16 { data: i16, mask: i16 },
    U32 { data: i32, mask: i32 },
    S32 { data: i32, mask: i32 },
    Mac { data: String, mask: String },
    Ip4 { data: String, mask: String },
    Ip6 { data: String, mask: String },
    Oid(i64),
    ObjList(Vec<i64>),
    U8List { data: Vec<i8>, mask: Vec<i8> },
}

impl WireAclFieldData {
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::AclFieldDataBool,
            Self::U8 { .. } => ValueKind::AclFieldDataUint8,
            Self::S8 { .. } => ValueKind::AclFieldDataInt8,
            Self::U16 { .. } => ValueKind::AclFieldDataUint16,
            Self::S16 { .. } => ValueKind::AclFieldDataInt16,
            Self::U32 { .. } => ValueKind::AclFieldDataUint32,
            Self::S32 { .. } => ValueKind::AclFieldDataInt32,
            Self::Mac { .. } => ValueKind::AclFieldDataMac,
            Self::Ip4 { .. } => ValueKind::AclFieldDataIpv4,
            Self::Ip6 { .. } => ValueKind::AclFieldDataIpv6,
            Self::Oid(_) => ValueKind::AclFieldDataObjectId,
            Self::ObjList(_) => ValueKind::AclFieldDataObjectList,
            Self::U8List { .. } => ValueKind::AclFieldDataUint8List,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WireAclField {
    pub enable: bool,
    pub data: WireAclFieldData,
}

/// Parameter of an ACL action.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WireAclActionParameter {
    Bool(bool),
    U8(i8),
    S8(i8),
    U16(i16),
    S16(i16),
    U32(i32),
    S32(i32),
    Mac(String),
    Ip4(String),
    Ip6(String),
    IpAddr(WireIpAddress),
    Oid(i64),
    ObjList(Vec<i64>),
}

impl WireAclActionParameter {
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::AclActionDataBool,
            Self::U8(_) => ValueKind::AclActionDataUint8,
            Self::S8(_) => ValueKind::AclActionDataInt8,
            Self::U16(_) => ValueKind::AclActionDataUint16,
            Self::S16(_) => ValueKind::AclActionDataInt16,
            Self::U32(_) => ValueKind::AclActionDataUint32,
            Self::S32(_) => ValueKind::AclActionDataInt32,
            Self::Mac(_) => ValueKind::AclActionDataMac,
            Self::Ip4(_) => ValueKind::AclActionDataIpv4,
            Self::Ip6(_) => ValueKind::AclActionDataIpv6,
            Self::IpAddr(_) => ValueKind::AclActionDataIpAddress,
            Self::Oid(_) => ValueKind::AclActionDataObjectId,
            Self::ObjList(_) => ValueKind::AclActionDataObjectList,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WireAclAction {
    pub enable: bool,
    pub parameter: WireAclActionParameter,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct WireAclCapability {
    pub is_action_list_mandatory: bool,
    pub action_list: Vec<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WireAclResource {
    pub stage: i32,
    pub bind_point: i32,
    pub avail_num: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WireQosMapParams {
    pub tc: i8,
    pub dscp: i8,
    pub dot1p: i8,
    pub prio: i8,
    pub pg: i8,
    pub queue_index: i8,
    pub color: i32,
    pub mpls_exp: i8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WireQosMap {
    pub key: WireQosMapParams,
    pub value: WireQosMapParams,
}

/// The value union of `sai_thrift_attribute_t`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WireValue {
    BoolData(bool),
    CharData(String),
    U8(i8),
    S8(i8),
    U16(i16),
    S16(i16),
    U32(i32),
    S32(i32),
    U64(i64),
    S64(i64),
    Mac(String),
    Ip4(String),
    Ip6(String),
    IpAddr(WireIpAddress),
    IpPrefix(WireIpPrefix),
    Oid(i64),
    ObjList(Vec<i64>),
    U8List(Vec<i8>),
    S8List(Vec<i8>),
    U16List(Vec<i16>),
    S16List(Vec<i16>),
    U32List(Vec<i32>),
    S32List(Vec<i32>),
    U32Range(WireU32Range),
    S32Range(WireS32Range),
    U16RangeList(Vec<WireU16Range>),
    AclField(WireAclField),
    AclAction(WireAclAction),
    AclCapability(WireAclCapability),
    AclResource(Vec<WireAclResource>),
    IpAddrList(Vec<WireIpAddress>),
    IpPrefixList(Vec<WireIpPrefix>),
    QosMap(Vec<WireQosMap>),
}

impl WireValue {
    /// The value kind this union arm carries.
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::BoolData(_) => ValueKind::Bool,
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
            Self::IpAddr(_) => ValueKind::IpAddress,
            Self::IpPrefix(_) => ValueKind::IpPrefix,
            Self::Oid(_) => ValueKind::ObjectId,
            Self::ObjList(_) => ValueKind::ObjectList,
            Self::U8List(_) => ValueKind::Uint8List,
            Self::S8List(_) => ValueKind::Int8List,
            Self::U16List(_) => ValueKind::Uint16List,
            Self::S16List(_) => ValueKind::Int16List,
            Self::U32List(_) => ValueKind::Uint32List,
            Self::S32List(_) => ValueKind::Int32List,
            Self::U32Range(_) => ValueKind::Uint32Range,
            Self::S32Range(_) => ValueKind::Int32Range,
            Self::U16RangeList(_) => ValueKind::Uint16RangeList,
            Self::AclField(field) => field.data.kind(),
            Self::AclAction(action) => action.parameter.kind(),
            Self::AclCapability(_) => ValueKind::AclCapability,
            Self::AclResource(_) => ValueKind::AclResourceList,
            Self::IpAddrList(_) => ValueKind::IpAddressList,
            Self::IpPrefixList(_) => ValueKind::IpPrefixList,
            Self::QosMap(_) => ValueKind::QosMapList,
        }
    }
}

/// `sai_thrift_attribute_t`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WireAttribute {
    pub id: AttrId,
    pub value: WireValue,
}

impl WireAttribute {
    pub const fn new(id: AttrId, value: WireValue) -> Self {
        Self { id, value }
    }
}

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

//! ACL field, action, capability and resource records.
//!
//! Field and action data are tagged unions on both sides; the tag is the
//! attribute's value kind, so a record can only carry the data shape its
//! attribute was declared with.

use sai_meta::{ObjectId, ValueKind};

use crate::addr::{
    format_ipv4, format_ipv6, format_mac, parse_ipv4, parse_ipv6, parse_mac, Ip4, Ip6, IpAddress,
    Mac,
};
use crate::config::CodecConfig;
use crate::error::Error;
use crate::list::{ListAlloc, Malloc, NativeList};
use crate::wire::{
    WireAclAction, WireAclActionParameter, WireAclCapability, WireAclField, WireAclFieldData,
    WireAclResource, WireConvert,
};

/// Data and mask of an ACL match field (`sai_acl_field_data_t`).
#[derive(Debug, PartialEq, Eq)]
pub enum AclFieldData<A: ListAlloc = Malloc> {
    Bool(bool),
    U8 { data: u8, mask: u8 },
    S8 { data: i8, mask: i8 },
    U16 { data: u16, mask: u16 },
    S16 { data: i16, mask: i16 },
    U32 { data: u32, mask: u32 },
    S32 { data: i32, mask: i32 },
    Mac { data: Mac, mask: Mac },
    Ip4 { data: Ip4, mask: Ip4 },
    Ip6 { data: Ip6, mask: Ip6 },
    ObjectId(ObjectId),
    ObjectList(NativeList<ObjectId, A>),
    U8List {
        data: NativeList<u8, A>,
        mask: NativeList<u8, A>,
    },
}

impl<A: ListAlloc> AclFieldData<A> {
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
            Self::ObjectId(_) => ValueKind::AclFieldDataObjectId,
            Self::ObjectList(_) => ValueKind::AclFieldDataObjectList,
            Self::U8List { .. } => ValueKind::AclFieldDataUint8List,
        }
    }

    pub fn from_wire(wire: &WireAclFieldData, config: &CodecConfig) -> Result<Self, Error> {
        let data = match wire {
            WireAclFieldData::Bool(data) => Self::Bool(*data),
            WireAclFieldData::U8 { data, mask } => Self::U8 {
                data: *data as u8,
                mask: *mask as u8,
            },
            WireAclFieldData::S8 { data, mask } => Self::S8 {
                data: *data,
                mask: *mask,
            },
            WireAclFieldData::U16 { data, mask } => Self::U16 {
                data: *data as u16,
                mask: *mask as u16,
            },
            WireAclFieldData::S16 { data, mask } => Self::S16 {
                data: *data,
                mask: *mask,
            },
            WireAclFieldData::U32 { data, mask } => Self::U32 {
                data: *data as u32,
                mask: *mask as u32,
            },
            WireAclFieldData::S32 { data, mask } => Self::S32 {
                data: *data,
                mask: *mask,
            },
            WireAclFieldData::Mac { data, mask } => Self::Mac {
                data: parse_mac(data)?,
                mask: parse_mac(mask)?,
            },
            WireAclFieldData::Ip4 { data, mask } => Self::Ip4 {
                data: parse_ipv4(data, config.ipv4)?,
                mask: parse_ipv4(mask, config.ipv4)?,
            },
            WireAclFieldData::Ip6 { data, mask } => Self::Ip6 {
                data: parse_ipv6(data)?,
                mask: parse_ipv6(mask)?,
            },
            WireAclFieldData::Oid(data) => Self::ObjectId(*data as ObjectId),
            WireAclFieldData::ObjList(data) => {
                Self::ObjectList(NativeList::from_wire(data, config)?)
            }
            WireAclFieldData::U8List { data, mask } => Self::U8List {
                data: NativeList::from_wire(data, config)?,
                mask: NativeList::from_wire(mask, config)?,
            },
        };

        Ok(data)
    }

    pub fn into_wire(self) -> WireAclFieldData {
        match self {
            Self::Bool(data) => WireAclFieldData::Bool(data),
            Self::U8 { data, mask } => WireAclFieldData::U8 {
                data: data as i8,
                mask: mask as i8,
            },
            Self::S8 { data, mask } => WireAclFieldData::S8 { data, mask },
            Self::U16 { data, mask } => WireAclFieldData::U16 {
                data: data as i16,
                mask: mask as i16,
            },
            Self::S16 { data, mask } => WireAclFieldData::S16 { data, mask },
            Self::U32 { data, mask } => WireAclFieldData::U32 {
                data: data as i32,
                mask: mask as i32,
            },
            Self::S32 { data, mask } => WireAclFieldData::S32 { data, mask },
            Self::Mac { data, mask } => WireAclFieldData::Mac {
                data: format_mac(&data),
                mask: format_mac(&mask),
            },
            Self::Ip4 { data, mask } => WireAclFieldData::Ip4 {
                data: format_ipv4(data),
                mask: format_ipv4(mask),
            },
            Self::Ip6 { data, mask } => WireAclFieldData::Ip6 {
                data: format_ipv6(&data),
                mask: format_ipv6(&mask),
            },
            Self::ObjectId(data) => WireAclFieldData::Oid(data as i64),
            Self::ObjectList(data) => WireAclFieldData::ObjList(data.into_wire()),
            Self::U8List { data, mask } => WireAclFieldData::U8List {
                data: data.into_wire(),
                mask: mask.into_wire(),
            },
        }
    }
}

/// `sai_acl_field_data_t`
#[derive(Debug, PartialEq, Eq)]
pub struct AclField<A: ListAlloc = Malloc> {
    pub enable: bool,
    pub data: AclFieldData<A>,
}

impl<A: ListAlloc> AclField<A> {
    pub const fn kind(&self) -> ValueKind {
        self.data.kind()
    }

    pub fn from_wire(wire: &WireAclField, config: &CodecConfig) -> Result<Self, Error> {
        Ok(Self {
            enable: wire.enable,
            data: AclFieldData::from_wire(&wire.data, config)?,
        })
    }

    pub fn into_wire(self) -> WireAclField {
        WireAclField {
            enable: self.enable,
            data: self.data.into_wire(),
        }
    }
}

/// Parameter of an ACL action (`sai_acl_action_parameter_t`).
#[derive(Debug, PartialEq, Eq)]
pub enum AclActionParameter<A: ListAlloc = Malloc> {
    Bool(bool),
    U8(u8),
    S8(i8),
    U16(u16),
    S16(i16),
    U32(u32),
    S32(i32),
    Mac(Mac),
    Ip4(Ip4),
    Ip6(Ip6),
    IpAddress(IpAddress),
    ObjectId(ObjectId),
    ObjectList(NativeList<ObjectId, A>),
}

impl<A: ListAlloc> AclActionParameter<A> {
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
            Self::IpAddress(_) => ValueKind::AclActionDataIpAddress,
            Self::ObjectId(_) => ValueKind::AclActionDataObjectId,
            Self::ObjectList(_) => ValueKind::AclActionDataObjectList,
        }
    }

    pub fn from_wire(wire: &WireAclActionParameter, config: &CodecConfig) -> Result<Self, Error> {
        let parameter = match wire {
            WireAclActionParameter::Bool(v) => Self::Bool(*v),
            WireAclActionParameter::U8(v) => Self::U8(*v as u8),
            WireAclActionParameter::S8(v) => Self::S8(*v),
            WireAclActionParameter::U16(v) => Self::U16(*v as u16),
            WireAclActionParameter::S16(v) => Self::S16(*v),
            WireAclActionParameter::U32(v) => Self::U32(*v as u32),
            WireAclActionParameter::S32(v) => Self::S32(*v),
            WireAclActionParameter::Mac(v) => Self::Mac(parse_mac(v)?),
            WireAclActionParameter::Ip4(v) => Self::Ip4(parse_ipv4(v, config.ipv4)?),
            WireAclActionParameter::Ip6(v) => Self::Ip6(parse_ipv6(v)?),
            WireAclActionParameter::IpAddr(v) => Self::IpAddress(IpAddress::from_wire(v, config)?),
            WireAclActionParameter::Oid(v) => Self::ObjectId(*v as ObjectId),
            WireAclActionParameter::ObjList(v) => {
                Self::ObjectList(NativeList::from_wire(v, config)?)
            }
        };

        Ok(parameter)
    }

    pub fn into_wire(self) -> WireAclActionParameter {
        match self {
            Self::Bool(v) => WireAclActionParameter::Bool(v),
            Self::U8(v) => WireAclActionParameter::U8(v as i8),
            Self::S8(v) => WireAclActionParameter::S8(v),
            Self::U16(v) => WireAclActionParameter::U16(v as i16),
            Self::S16(v) => WireAclActionParameter::S16(v),
            Self::U32(v) => WireAclActionParameter::U32(v as i32),
            Self::S32(v) => WireAclActionParameter::S32(v),
            Self::Mac(v) => WireAclActionParameter::Mac(format_mac(&v)),
            Self::Ip4(v) => WireAclActionParameter::Ip4(format_ipv4(v)),
            Self::Ip6(v) => WireAclActionParameter::Ip6(format_ipv6(&v)),
            Self::IpAddress(v) => WireAclActionParameter::IpAddr(v.to_wire()),
            Self::ObjectId(v) => WireAclActionParameter::Oid(v as i64),
            Self::ObjectList(v) => WireAclActionParameter::ObjList(v.into_wire()),
        }
    }
}

/// `sai_acl_action_data_t`
#[derive(Debug, PartialEq, Eq)]
pub struct AclAction<A: ListAlloc = Malloc> {
    pub enable: bool,
    pub parameter: AclActionParameter<A>,
}

impl<A: ListAlloc> AclAction<A> {
    pub const fn kind(&self) -> ValueKind {
        self.parameter.kind()
    }

    pub fn from_wire(wire: &WireAclAction, config: &CodecConfig) -> Result<Self, Error> {
        Ok(Self {
            enable: wire.enable,
            parameter: AclActionParameter::from_wire(&wire.parameter, config)?,
        })
    }

    pub fn into_wire(self) -> WireAclAction {
        WireAclAction {
            enable: self.enable,
            parameter: self.parameter.into_wire(),
        }
    }
}

/// `sai_acl_capability_t`
#[derive(Debug, PartialEq, Eq)]
pub struct AclCapability<A: ListAlloc = Malloc> {
    pub is_action_list_mandatory: bool,
    /// `sai_acl_action_type_t` values
    pub action_list: NativeList<i32, A>,
}

impl<A: ListAlloc> AclCapability<A> {
    pub fn from_wire(wire: &WireAclCapability, config: &CodecConfig) -> Result<Self, Error> {
        Ok(Self {
            is_action_list_mandatory: wire.is_action_list_mandatory,
            action_list: NativeList::from_wire(&wire.action_list, config)?,
        })
    }

    pub fn into_wire(self) -> WireAclCapability {
        WireAclCapability {
            is_action_list_mandatory: self.is_action_list_mandatory,
            action_list: self.action_list.into_wire(),
        }
    }
}

/// `sai_acl_stage_t`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct AclStage(pub i32);

impl AclStage {
    pub const INGRESS: Self = Self(0);
    pub const EGRESS: Self = Self(1);
    pub const INGRESS_MACSEC: Self = Self(2);
    pub const EGRESS_MACSEC: Self = Self(3);
    pub const PRE_INGRESS: Self = Self(4);
}

/// `sai_acl_bind_point_type_t`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct AclBindPointType(pub i32);

impl AclBindPointType {
    pub const PORT: Self = Self(0);
    pub const LAG: Self = Self(1);
    pub const VLAN: Self = Self(2);
    pub const ROUTER_INTERFACE: Self = Self(3);
    pub const SWITCH: Self = Self(4);
}

/// `sai_acl_resource_t`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(C)]
pub struct AclResource {
    pub stage: AclStage,
    pub bind_point: AclBindPointType,
    pub avail_num: u32,
}

impl WireConvert for AclResource {
    type Wire = WireAclResource;

    fn from_wire(wire: &WireAclResource, _config: &CodecConfig) -> Result<Self, Error> {
        Ok(Self {
            stage: AclStage(wire.stage),
            bind_point: AclBindPointType(wire.bind_point),
            avail_num: wire.avail_num as u32,
        })
    }

    fn to_wire(&self) -> WireAclResource {
        WireAclResource {
            stage: self.stage.0,
            bind_point: self.bind_point.0,
            avail_num: self.avail_num as i32,
        }
    }
}

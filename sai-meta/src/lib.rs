//! Attribute metadata model for the SAI RPC codec.
//!
//! Every SAI attribute is identified by an `(ObjectType, AttrId)` pair. The
//! metadata registry maps that pair to the [`ValueKind`] of the attribute,
//! i.e. the shape its value takes on the native side, plus a human-readable
//! name used in diagnostics.
//!
//! The registry is normally loaded once at startup from a definition file
//! (see [`defs`]) and is immutable afterwards.

use core::fmt;
use core::str::FromStr;

use thiserror::Error;

#[cfg(feature = "defs")]
pub mod defs;

mod registry;

pub use registry::*;

pub type AttrId = u32;
pub type ObjectId = u64;

/// A SAI object type (`sai_object_type_t`).
///
/// Kept open-ended: the codec never needs to enumerate object types, only to
/// key the metadata registry with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct ObjectType(pub i32);

impl ObjectType {
    pub const NULL: Self = Self(0);
    pub const PORT: Self = Self(1);
    pub const LAG: Self = Self(2);
    pub const VIRTUAL_ROUTER: Self = Self(3);
    pub const NEXT_HOP: Self = Self(4);
    pub const NEXT_HOP_GROUP: Self = Self(5);
    pub const ROUTER_INTERFACE: Self = Self(6);
    pub const ACL_TABLE: Self = Self(7);
    pub const ACL_ENTRY: Self = Self(8);
    pub const ACL_COUNTER: Self = Self(9);
    pub const ACL_RANGE: Self = Self(10);
    pub const QOS_MAP: Self = Self(20);
    pub const SWITCH: Self = Self(33);

    pub const fn code(&self) -> i32 {
        self.0
    }
}

impl From<i32> for ObjectType {
    fn from(code: i32) -> Self {
        Self(code)
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a value kind name is not recognized.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown attribute value type `{0}`")]
pub struct UnknownValueKind(pub String);

macro_rules! value_kinds {
    ($($(#[$meta:meta])* $kind:ident => $name:literal,)*) => {
        /// The shape of an attribute value (`sai_attr_value_type_t`).
        ///
        /// There is exactly one kind per attribute; it decides which variant of
        /// the native and wire value unions is active.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum ValueKind {
            $($(#[$meta])* $kind,)*
        }

        impl ValueKind {
            /// All value kinds, in declaration order.
            pub const ALL: &'static [ValueKind] = &[$(ValueKind::$kind,)*];

            /// The SAI name of the kind, without the `SAI_ATTR_VALUE_TYPE_` prefix.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$kind => $name,)*
                }
            }
        }

        impl FromStr for ValueKind {
            type Err = UnknownValueKind;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let name = s.strip_prefix(ValueKind::PREFIX).unwrap_or(s);

                match name {
                    $($name => Ok(Self::$kind),)*
                    _ => Err(UnknownValueKind(s.into())),
                }
            }
        }
    };
}

value_kinds! {
    Bool => "BOOL",
    Chardata => "CHARDATA",
    Uint8 => "UINT8",
    Int8 => "INT8",
    Uint16 => "UINT16",
    Int16 => "INT16",
    Uint32 => "UINT32",
    Int32 => "INT32",
    Uint64 => "UINT64",
    Int64 => "INT64",
    Pointer => "POINTER",
    Mac => "MAC",
    Ipv4 => "IPV4",
    Ipv6 => "IPV6",
    IpAddress => "IP_ADDRESS",
    IpPrefix => "IP_PREFIX",
    ObjectId => "OBJECT_ID",
    ObjectList => "OBJECT_LIST",
    Uint8List => "UINT8_LIST",
    Int8List => "INT8_LIST",
    Uint16List => "UINT16_LIST",
    Int16List => "INT16_LIST",
    Uint32List => "UINT32_LIST",
    Int32List => "INT32_LIST",
    Uint32Range => "UINT32_RANGE",
    Int32Range => "INT32_RANGE",
    Uint16RangeList => "UINT16_RANGE_LIST",
    VlanList => "VLAN_LIST",
    QosMapList => "QOS_MAP_LIST",
    MapList => "MAP_LIST",
    AclFieldDataBool => "ACL_FIELD_DATA_BOOL",
    AclFieldDataUint8 => "ACL_FIELD_DATA_UINT8",
    AclFieldDataInt8 => "ACL_FIELD_DATA_INT8",
    AclFieldDataUint16 => "ACL_FIELD_DATA_UINT16",
    AclFieldDataInt16 => "ACL_FIELD_DATA_INT16",
    AclFieldDataUint32 => "ACL_FIELD_DATA_UINT32",
    AclFieldDataInt32 => "ACL_FIELD_DATA_INT32",
    AclFieldDataUint64 => "ACL_FIELD_DATA_UINT64",
    AclFieldDataMac => "ACL_FIELD_DATA_MAC",
    AclFieldDataIpv4 => "ACL_FIELD_DATA_IPV4",
    AclFieldDataIpv6 => "ACL_FIELD_DATA_IPV6",
    AclFieldDataObjectId => "ACL_FIELD_DATA_OBJECT_ID",
    AclFieldDataObjectList => "ACL_FIELD_DATA_OBJECT_LIST",
    AclFieldDataUint8List => "ACL_FIELD_DATA_UINT8_LIST",
    AclActionDataBool => "ACL_ACTION_DATA_BOOL",
    AclActionDataUint8 => "ACL_ACTION_DATA_UINT8",
    AclActionDataInt8 => "ACL_ACTION_DATA_INT8",
    AclActionDataUint16 => "ACL_ACTION_DATA_UINT16",
    AclActionDataInt16 => "ACL_ACTION_DATA_INT16",
    AclActionDataUint32 => "ACL_ACTION_DATA_UINT32",
    AclActionDataInt32 => "ACL_ACTION_DATA_INT32",
    AclActionDataMac => "ACL_ACTION_DATA_MAC",
    AclActionDataIpv4 => "ACL_ACTION_DATA_IPV4",
    AclActionDataIpv6 => "ACL_ACTION_DATA_IPV6",
    AclActionDataIpAddress => "ACL_ACTION_DATA_IP_ADDRESS",
    AclActionDataObjectId => "ACL_ACTION_DATA_OBJECT_ID",
    AclActionDataObjectList => "ACL_ACTION_DATA_OBJECT_LIST",
    AclCapability => "ACL_CAPABILITY",
    AclResourceList => "ACL_RESOURCE_LIST",
    TlvList => "TLV_LIST",
    SegmentList => "SEGMENT_LIST",
    IpAddressList => "IP_ADDRESS_LIST",
    PortEyeValues => "PORT_EYE_VALUES",
    Timespec => "TIMESPEC",
    NatEntryData => "NAT_ENTRY_DATA",
    IpPrefixList => "IP_PREFIX_LIST",
}

impl ValueKind {
    pub const PREFIX: &'static str = "SAI_ATTR_VALUE_TYPE_";
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::PREFIX, self.as_str())
    }
}

/// Metadata of a single attribute, as known to the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttrMetadata {
    pub object_type: ObjectType,
    pub attr_id: AttrId,
    pub value_kind: ValueKind,
    /// The attribute id name, e.g. `SAI_PORT_ATTR_SPEED`
    pub name: String,
}

impl AttrMetadata {
    pub fn new(
        object_type: ObjectType,
        attr_id: AttrId,
        value_kind: ValueKind,
        name: impl Into<String>,
    ) -> Self {
        Self {
            object_type,
            attr_id,
            value_kind,
            name: name.into(),
        }
    }
}

impl fmt::Display for AttrMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.value_kind)
    }
}

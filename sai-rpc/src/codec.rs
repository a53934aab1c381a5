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

//! The attribute dispatchers.

use core::marker::PhantomData;

use log::{error, trace, warn};

use sai_meta::{AttrId, AttrMetadata, MetadataRegistry, ObjectType, ValueKind};

use crate::config::CodecConfig;
use crate::error::{AttrContext, Direction, Error, ErrorCode};
use crate::list::{ListAlloc, Malloc};
use crate::value::{NativeAttribute, NativeValue};
use crate::wire::WireAttribute;

/// Return `true` if the codec can convert values of `kind`.
pub const fn is_supported(kind: ValueKind) -> bool {
    !matches!(
        kind,
        ValueKind::Pointer
            | ValueKind::VlanList
            | ValueKind::MapList
            | ValueKind::AclFieldDataUint64
            | ValueKind::TlvList
            | ValueKind::SegmentList
            | ValueKind::PortEyeValues
            | ValueKind::Timespec
            | ValueKind::NatEntryData
    )
}

/// Converts attributes between the wire and the native representation.
///
/// The value kind of every attribute is taken from the metadata registry and
/// decides which value variant is legal; the value itself is never trusted to
/// describe its own shape.
///
/// Native lists are allocated with `A`. Conversions to native hand the lists
/// over to the caller; conversions to wire consume the native attributes and
/// release their lists.
pub struct AttrCodec<'r, R, A = Malloc>
where
    R: MetadataRegistry,
    A: ListAlloc,
{
    registry: &'r R,
    config: CodecConfig,
    _alloc: PhantomData<fn() -> A>,
}

impl<'r, R> AttrCodec<'r, R, Malloc>
where
    R: MetadataRegistry,
{
    /// Create a codec allocating native lists with `malloc`.
    pub const fn new(registry: &'r R) -> Self {
        Self::new_in(registry)
    }
}

impl<'r, R, A> AttrCodec<'r, R, A>
where
    R: MetadataRegistry,
    A: ListAlloc,
{
    /// Create a codec allocating native lists with `A`.
    pub const fn new_in(registry: &'r R) -> Self {
        Self {
            registry,
            config: CodecConfig::new(),
            _alloc: PhantomData,
        }
    }

    pub fn with_config(mut self, config: CodecConfig) -> Self {
        self.config = config;
        self
    }

    pub const fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub const fn registry(&self) -> &'r R {
        self.registry
    }

    /// Resolve the metadata of an attribute.
    pub fn metadata(
        &self,
        object_type: ObjectType,
        attr_id: AttrId,
    ) -> Result<&'r AttrMetadata, Error> {
        let registry: &'r R = self.registry;

        registry.lookup(object_type, attr_id).ok_or_else(|| {
            error!(
                "Attribute metadata not found for object type {object_type} and attribute {attr_id}"
            );
            ErrorCode::MetadataNotFound.into()
        })
    }

    /// The value kind of an attribute.
    pub fn value_kind(&self, object_type: ObjectType, attr_id: AttrId) -> Result<ValueKind, Error> {
        self.metadata(object_type, attr_id).map(|md| md.value_kind)
    }

    /// Resolve the metadata of an attribute and check that `kind` is both
    /// supported and the kind the attribute is declared with.
    fn check(
        &self,
        object_type: ObjectType,
        attr_id: AttrId,
        kind: ValueKind,
    ) -> Result<&'r AttrMetadata, Error> {
        let md = self.metadata(object_type, attr_id)?;

        if !is_supported(md.value_kind) {
            error!(
                "Attribute value type {} not supported for {}",
                md.value_kind, md.name
            );
            Err(ErrorCode::UnsupportedValueKind)?;
        }

        if kind != md.value_kind {
            warn!(
                "Attribute {} expects a value of type {}, got {}",
                md.name, md.value_kind, kind
            );
            Err(ErrorCode::ValueKindMismatch)?;
        }

        Ok(md)
    }

    /// Convert one wire attribute into a native attribute.
    ///
    /// On error, nothing is allocated and the error carries the id of the
    /// attribute.
    pub fn to_native(
        &self,
        object_type: ObjectType,
        attr: &WireAttribute,
    ) -> Result<NativeAttribute<A>, Error> {
        let ctx = AttrContext::new(object_type, attr.id, Direction::ToNative);

        let convert = || {
            let md = self.check(object_type, attr.id, attr.value.kind())?;

            trace!("Converting {md} to native");

            NativeValue::from_wire(&attr.value, &self.config)
        };

        let value = convert().map_err(|e| e.with_context(ctx))?;

        Ok(NativeAttribute::new(attr.id, value))
    }

    /// Convert one native attribute into a wire attribute.
    ///
    /// The native attribute is consumed and every list it owns is released,
    /// whether the conversion succeeds or not.
    pub fn to_wire(
        &self,
        object_type: ObjectType,
        attr: NativeAttribute<A>,
    ) -> Result<WireAttribute, Error> {
        let ctx = AttrContext::new(object_type, attr.id, Direction::ToWire);

        let convert = || {
            let md = self.check(object_type, attr.id, attr.value.kind())?;

            trace!("Converting {md} to wire");

            attr.value.into_wire()
        };

        let value = convert().map_err(|e| e.with_context(ctx))?;

        Ok(WireAttribute::new(ctx.attr_id, value))
    }

    /// Convert a batch of wire attributes, preserving their order.
    ///
    /// Stops at the first failure; the attributes converted until then are
    /// released before the error is returned.
    pub fn to_native_list(
        &self,
        object_type: ObjectType,
        attrs: &[WireAttribute],
    ) -> Result<Vec<NativeAttribute<A>>, Error> {
        attrs
            .iter()
            .map(|attr| self.to_native(object_type, attr))
            .collect()
    }

    /// Convert a batch of native attributes, preserving their order.
    ///
    /// All attributes are consumed, including those not yet reached when a
    /// conversion fails.
    pub fn to_wire_list(
        &self,
        object_type: ObjectType,
        attrs: Vec<NativeAttribute<A>>,
    ) -> Result<Vec<WireAttribute>, Error> {
        attrs
            .into_iter()
            .map(|attr| self.to_wire(object_type, attr))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use sai_meta::Registry;

    use crate::wire::WireValue;

    fn registry() -> Registry {
        [
            AttrMetadata::new(ObjectType::PORT, 3, ValueKind::Uint32, "SAI_PORT_ATTR_SPEED"),
            AttrMetadata::new(ObjectType::PORT, 9, ValueKind::VlanList, "SAI_PORT_ATTR_VLANS"),
            AttrMetadata::new(ObjectType::SWITCH, 3, ValueKind::Mac, "SAI_SWITCH_ATTR_SRC_MAC"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_same_id_different_object_types() {
        let registry = registry();
        let codec = AttrCodec::new(&registry);

        let port = codec
            .to_native(ObjectType::PORT, &WireAttribute::new(3, WireValue::U32(100_000)))
            .unwrap();
        assert_eq!(port.value, NativeValue::U32(100_000));

        let err = codec
            .to_native(ObjectType::SWITCH, &WireAttribute::new(3, WireValue::U32(100_000)))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValueKindMismatch);
        assert_eq!(err.attr_id(), Some(3));
    }

    #[test]
    fn test_unsupported_kind() {
        let registry = registry();
        let codec = AttrCodec::new(&registry);

        let err = codec
            .to_native(ObjectType::PORT, &WireAttribute::new(9, WireValue::U16List(vec![1])))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnsupportedValueKind);
        assert_eq!(
            err.context(),
            Some(&AttrContext::new(ObjectType::PORT, 9, Direction::ToNative))
        );
    }

    #[test]
    fn test_supported_kinds() {
        assert!(is_supported(ValueKind::QosMapList));
        assert!(is_supported(ValueKind::AclFieldDataUint8List));
        assert!(!is_supported(ValueKind::AclFieldDataUint64));
        assert!(!is_supported(ValueKind::Pointer));
    }
}

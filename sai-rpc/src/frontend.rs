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

//! The RPC handler layer on top of the codec.
//!
//! [`Frontend`] takes attributes as they arrive from the transport, converts
//! them with an [`AttrCodec`], calls into the native API and converts the
//! results back. Every failure is reported as a SAI [`Status`].

use core::slice;

use log::{debug, warn};

use sai_meta::{AttrId, MetadataRegistry, ObjectId, ObjectType};

use crate::codec::AttrCodec;
use crate::error::Error;
use crate::list::{ListAlloc, Malloc, NativeList};
use crate::status::Status;
use crate::value::{NativeAttribute, NativeValue};
use crate::wire::WireAttribute;

/// The native switch API, as far as the frontend uses it.
pub trait SwitchApi<A: ListAlloc = Malloc> {
    /// Create an object. The attributes, with all their lists, are handed over.
    fn create_object(
        &self,
        object_type: ObjectType,
        switch_id: ObjectId,
        attrs: Vec<NativeAttribute<A>>,
    ) -> Result<ObjectId, Status>;

    fn remove_object(&self, object_type: ObjectType, object_id: ObjectId) -> Result<(), Status>;

    fn set_attribute(
        &self,
        object_type: ObjectType,
        object_id: ObjectId,
        attr: NativeAttribute<A>,
    ) -> Result<(), Status>;

    /// Fill in the values of `attrs` in place. Lists are provided by the caller
    /// and may be shortened, but not replaced, by the implementation.
    fn get_attributes(
        &self,
        object_type: ObjectType,
        object_id: ObjectId,
        attrs: &mut [NativeAttribute<A>],
    ) -> Result<(), Status>;

    fn object_type_get_availability(
        &self,
        switch_id: ObjectId,
        object_type: ObjectType,
        attrs: &[NativeAttribute<A>],
    ) -> Result<u64, Status>;

    /// Write the supported enum values of an attribute into `values`,
    /// shortening it to the number written.
    fn query_attribute_enum_values_capability(
        &self,
        switch_id: ObjectId,
        object_type: ObjectType,
        attr_id: AttrId,
        values: &mut NativeList<i32, A>,
    ) -> Result<(), Status>;
}

impl<T, A> SwitchApi<A> for &T
where
    T: SwitchApi<A> + ?Sized,
    A: ListAlloc,
{
    fn create_object(
        &self,
        object_type: ObjectType,
        switch_id: ObjectId,
        attrs: Vec<NativeAttribute<A>>,
    ) -> Result<ObjectId, Status> {
        (**self).create_object(object_type, switch_id, attrs)
    }

    fn remove_object(&self, object_type: ObjectType, object_id: ObjectId) -> Result<(), Status> {
        (**self).remove_object(object_type, object_id)
    }

    fn set_attribute(
        &self,
        object_type: ObjectType,
        object_id: ObjectId,
        attr: NativeAttribute<A>,
    ) -> Result<(), Status> {
        (**self).set_attribute(object_type, object_id, attr)
    }

    fn get_attributes(
        &self,
        object_type: ObjectType,
        object_id: ObjectId,
        attrs: &mut [NativeAttribute<A>],
    ) -> Result<(), Status> {
        (**self).get_attributes(object_type, object_id, attrs)
    }

    fn object_type_get_availability(
        &self,
        switch_id: ObjectId,
        object_type: ObjectType,
        attrs: &[NativeAttribute<A>],
    ) -> Result<u64, Status> {
        (**self).object_type_get_availability(switch_id, object_type, attrs)
    }

    fn query_attribute_enum_values_capability(
        &self,
        switch_id: ObjectId,
        object_type: ObjectType,
        attr_id: AttrId,
        values: &mut NativeList<i32, A>,
    ) -> Result<(), Status> {
        (**self).query_attribute_enum_values_capability(switch_id, object_type, attr_id, values)
    }
}

pub struct Frontend<'r, R, S, A = Malloc>
where
    R: MetadataRegistry,
    S: SwitchApi<A>,
    A: ListAlloc,
{
    codec: AttrCodec<'r, R, A>,
    api: S,
    switch_id: ObjectId,
}

impl<'r, R, S, A> Frontend<'r, R, S, A>
where
    R: MetadataRegistry,
    S: SwitchApi<A>,
    A: ListAlloc,
{
    pub const fn new(codec: AttrCodec<'r, R, A>, api: S, switch_id: ObjectId) -> Self {
        Self {
            codec,
            api,
            switch_id,
        }
    }

    pub const fn codec(&self) -> &AttrCodec<'r, R, A> {
        &self.codec
    }

    pub const fn api(&self) -> &S {
        &self.api
    }

    pub const fn switch_id(&self) -> ObjectId {
        self.switch_id
    }

    pub fn create(
        &self,
        object_type: ObjectType,
        attrs: &[WireAttribute],
    ) -> Result<ObjectId, Status> {
        let attrs = self
            .codec
            .to_native_list(object_type, attrs)
            .map_err(Self::status)?;

        let object_id = self.api.create_object(object_type, self.switch_id, attrs)?;

        debug!("Created object {object_id:#x} of type {object_type}");

        Ok(object_id)
    }

    pub fn remove(&self, object_type: ObjectType, object_id: ObjectId) -> Result<(), Status> {
        self.api.remove_object(object_type, object_id)
    }

    pub fn set(
        &self,
        object_type: ObjectType,
        object_id: ObjectId,
        attr: &WireAttribute,
    ) -> Result<(), Status> {
        let attr = self
            .codec
            .to_native(object_type, attr)
            .map_err(Self::status)?;

        self.api.set_attribute(object_type, object_id, attr)
    }

    /// Read attributes of an object.
    ///
    /// `attrs` names the attributes to read and carries list capacities the
    /// native API fills in; the values read are returned in the same order.
    pub fn get(
        &self,
        object_type: ObjectType,
        object_id: ObjectId,
        attrs: &[WireAttribute],
    ) -> Result<Vec<WireAttribute>, Status> {
        let mut attrs = self
            .codec
            .to_native_list(object_type, attrs)
            .map_err(Self::status)?;

        self.api.get_attributes(object_type, object_id, &mut attrs)?;

        self.codec
            .to_wire_list(object_type, attrs)
            .map_err(Self::status)
    }

    /// The number of objects of `object_type` that can still be created,
    /// given one `s32` constraint attribute.
    pub fn object_type_get_availability(
        &self,
        object_type: ObjectType,
        attr_id: AttrId,
        attr_type: i32,
    ) -> Result<u64, Status> {
        let attr = NativeAttribute::new(attr_id, NativeValue::S32(attr_type));

        self.api
            .object_type_get_availability(self.switch_id, object_type, slice::from_ref(&attr))
    }

    /// The enum values the switch supports for an attribute.
    ///
    /// At most `caps_count` values are returned; a non-positive count or a
    /// failing query yields an empty list.
    pub fn query_attribute_enum_values_capability(
        &self,
        object_type: ObjectType,
        attr_id: AttrId,
        caps_count: i32,
    ) -> Vec<i32> {
        let Ok(count) = usize::try_from(caps_count) else {
            return Vec::new();
        };

        if count == 0 {
            return Vec::new();
        }

        let mut values = match NativeList::<i32, A>::filled(0, count) {
            Ok(values) => values,
            Err(e) => {
                warn!("Failed to allocate enum capability list: {e}");
                return Vec::new();
            }
        };

        match self.api.query_attribute_enum_values_capability(
            self.switch_id,
            object_type,
            attr_id,
            &mut values,
        ) {
            Ok(()) => values.into_wire(),
            Err(status) => {
                warn!(
                    "Enum capability query for attribute {attr_id} of object type {object_type} failed: {status}"
                );
                Vec::new()
            }
        }
    }

    fn status(e: Error) -> Status {
        debug!("Attribute conversion failed: {e}");

        e.status()
    }
}

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

//! Attribute codec for the SAI Thrift RPC server.
//!
//! SAI attributes arrive over Thrift as a tagged union of strings, signed
//! integers and lists. The native SAI API expects the C layout: unsigned
//! integers, binary addresses and `{ count, list }` buffers allocated on the
//! C heap. This crate converts between the two.
//!
//! The shape of every attribute value is decided by the metadata registry
//! ([`MetadataRegistry`]), keyed by object type and attribute id. An
//! [`AttrCodec`] looks the attribute up and converts its value accordingly;
//! a [`Frontend`](frontend::Frontend) wires the codec to a native
//! [`SwitchApi`](frontend::SwitchApi).
//!
//! # Examples
//! ```
//! use sai_rpc::{AttrCodec, AttrMetadata, NativeValue, ObjectType, Registry, ValueKind};
//! use sai_rpc::wire::{WireAttribute, WireValue};
//!
//! let mut registry = Registry::new();
//! registry.insert(AttrMetadata::new(
//!     ObjectType::SWITCH,
//!     3,
//!     ValueKind::Mac,
//!     "SAI_SWITCH_ATTR_SRC_MAC",
//! ));
//!
//! let codec = AttrCodec::new(&registry);
//!
//! let wire = WireAttribute::new(3, WireValue::Mac("00:11:22:33:44:55".into()));
//! let native = codec.to_native(ObjectType::SWITCH, &wire).unwrap();
//! assert_eq!(native.value, NativeValue::Mac([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]));
//!
//! // Converting back consumes the native attribute
//! assert_eq!(codec.to_wire(ObjectType::SWITCH, native).unwrap(), wire);
//! ```

pub mod acl;
pub mod addr;
pub mod codec;
pub mod config;
pub mod error;
pub mod frontend;
pub mod list;
pub mod qos;
pub mod status;
pub mod value;
pub mod wire;

pub use sai_meta::{
    AttrId, AttrMetadata, MetadataRegistry, ObjectId, ObjectType, Registry, ValueKind,
};

pub use codec::AttrCodec;
pub use config::{CodecConfig, Ipv4Parse};
pub use error::{Error, ErrorCode};
pub use list::{ListAlloc, Malloc, NativeList};
pub use status::Status;
pub use value::{NativeAttribute, NativeValue};

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

//! SAI status codes, as returned by the native API and reported to the
//! remote caller when a call fails.

use strum::{Display, FromRepr};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, FromRepr, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(i32)]
pub enum Status {
    Success = 0,
    Failure = -1,
    NotSupported = -2,
    NoMemory = -3,
    InsufficientResources = -4,
    InvalidParameter = -5,
    ItemAlreadyExists = -6,
    ItemNotFound = -7,
    BufferOverflow = -8,
    InvalidPortNumber = -9,
    InvalidPortMember = -10,
    InvalidVlanId = -11,
    Uninitialized = -12,
    TableFull = -13,
    MandatoryAttributeMissing = -14,
    NotImplemented = -15,
    AddrNotFound = -16,
    ObjectInUse = -17,
    InvalidObjectType = -18,
    InvalidObjectId = -19,
    InvalidNvStorage = -20,
    NvStorageFull = -21,
    SwUpgradeVersionMismatch = -22,
    NotExecuted = -23,
}

impl Status {
    /// Map a raw `sai_status_t`. Codes outside the known set (e.g. the
    /// per-attribute status ranges) collapse to `Failure`.
    pub fn from_raw(raw: i32) -> Self {
        Self::from_repr(raw).unwrap_or(Self::Failure)
    }

    pub const fn raw(&self) -> i32 {
        *self as i32
    }

    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// `Ok(())` on success, the status itself otherwise.
    pub fn into_result(self) -> Result<(), Status> {
        if self.is_success() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

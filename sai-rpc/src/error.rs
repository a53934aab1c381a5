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

use core::{fmt, str::Utf8Error};

use sai_meta::{AttrId, ObjectType};

use crate::status::Status;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ErrorCode {
    /// The `(object type, attribute id)` pair is unknown to the metadata registry
    MetadataNotFound,
    /// The registry knows the attribute, but the codec has no converter for its kind
    UnsupportedValueKind,
    /// The value handed to the codec does not have the shape of the attribute's kind
    ValueKindMismatch,
    InvalidMac,
    InvalidIpv4,
    InvalidIpv6,
    InvalidAddrFamily,
    AddrFamilyMismatch,
    CharDataTooLong,
    Utf8Fail,
    ListTooLong,
    NoMemory,
}

/// Which of the two dispatchers raised an error.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Direction {
    /// Wire format to native format
    ToNative,
    /// Native format to wire format
    ToWire,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ToNative => write!(f, "wire->native"),
            Self::ToWire => write!(f, "native->wire"),
        }
    }
}

/// The attribute being converted when an error was raised.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct AttrContext {
    pub object_type: ObjectType,
    pub attr_id: AttrId,
    pub direction: Direction,
}

impl AttrContext {
    pub const fn new(object_type: ObjectType, attr_id: AttrId, direction: Direction) -> Self {
        Self {
            object_type,
            attr_id,
            direction,
        }
    }
}

impl fmt::Display for AttrContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, object type {}, attribute {}",
            self.direction, self.object_type, self.attr_id
        )
    }
}

impl From<ErrorCode> for Error {
    fn from(code: ErrorCode) -> Self {
        Self::new(code)
    }
}

pub struct Error {
    code: ErrorCode,
    context: Option<AttrContext>,
    #[cfg(feature = "backtrace")]
    backtrace: std::backtrace::Backtrace,
}

impl Error {
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            context: None,
            #[cfg(feature = "backtrace")]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    pub const fn context(&self) -> Option<&AttrContext> {
        self.context.as_ref()
    }

    /// The id of the attribute whose conversion failed, if known.
    pub fn attr_id(&self) -> Option<AttrId> {
        self.context.map(|ctx| ctx.attr_id)
    }

    #[cfg(feature = "backtrace")]
    pub const fn backtrace(&self) -> &std::backtrace::Backtrace {
        &self.backtrace
    }

    /// Attach the attribute context, unless one is already present.
    pub fn with_context(mut self, context: AttrContext) -> Self {
        if self.context.is_none() {
            self.context = Some(context);
        }

        self
    }

    /// The status reported back to the remote caller for this error.
    pub const fn status(&self) -> Status {
        match self.code {
            ErrorCode::UnsupportedValueKind => Status::NotSupported,
            ErrorCode::NoMemory => Status::NoMemory,
            ErrorCode::ListTooLong => Status::BufferOverflow,
            ErrorCode::MetadataNotFound
            | ErrorCode::ValueKindMismatch
            | ErrorCode::InvalidMac
            | ErrorCode::InvalidIpv4
            | ErrorCode::InvalidIpv6
            | ErrorCode::InvalidAddrFamily
            | ErrorCode::AddrFamilyMismatch
            | ErrorCode::CharDataTooLong
            | ErrorCode::Utf8Fail => Status::InvalidParameter,
        }
    }
}

impl From<Utf8Error> for Error {
    fn from(_e: Utf8Error) -> Self {
        Self::new(ErrorCode::Utf8Fail)
    }
}

impl From<Error> for Status {
    fn from(e: Error) -> Self {
        e.status()
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[cfg(not(feature = "backtrace"))]
        {
            write!(f, "Error::{}", self)?;
        }

        #[cfg(feature = "backtrace")]
        {
            writeln!(f, "Error::{} {{", self)?;
            write!(f, "{}", self.backtrace())?;
            writeln!(f, "}}")?;
        }

        Ok(())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(ctx) => write!(f, "{:?} ({})", self.code, ctx),
            None => write!(f, "{:?}", self.code),
        }
    }
}

impl std::error::Error for Error {}

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

//! Runtime knobs of the codec.

/// How IPv4 text is turned into a native address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Ipv4Parse {
    /// Dotted-quad only; anything else is `InvalidIpv4`.
    #[default]
    Strict,
    /// Legacy behavior: every run of digits is an octet, every other character
    /// a separator, and the octets are packed left to right. Octet values wrap
    /// at 256 and extra octets shift earlier ones out. Only the empty string is
    /// rejected.
    Lenient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CodecConfig {
    pub ipv4: Ipv4Parse,
}

impl CodecConfig {
    pub const fn new() -> Self {
        Self {
            ipv4: Ipv4Parse::Strict,
        }
    }

    pub const fn with_ipv4(self, ipv4: Ipv4Parse) -> Self {
        Self { ipv4 }
    }
}

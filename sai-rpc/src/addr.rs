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

//! MAC and IP address converters.

use core::fmt::{self, Write};
use core::hash::{Hash, Hasher};
use core::net::{Ipv4Addr, Ipv6Addr};

use log::warn;

use strum::FromRepr;

use crate::config::{CodecConfig, Ipv4Parse};
use crate::error::{Error, ErrorCode};
use crate::wire::{WireConvert, WireIpAddr, WireIpAddress, WireIpPrefix};

/// `sai_mac_t`
pub type Mac = [u8; 6];

/// `sai_ip6_t`
pub type Ip6 = [u8; 16];

/// `sai_ip4_t`: an IPv4 address held in network byte order, i.e. the first
/// octet is the lowest byte in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Ip4(pub u32);

impl Ip4 {
    pub const fn from_octets(octets: [u8; 4]) -> Self {
        Self(u32::from_ne_bytes(octets))
    }

    pub const fn octets(&self) -> [u8; 4] {
        self.0.to_ne_bytes()
    }
}

impl From<Ipv4Addr> for Ip4 {
    fn from(addr: Ipv4Addr) -> Self {
        Self::from_octets(addr.octets())
    }
}

impl From<Ip4> for Ipv4Addr {
    fn from(addr: Ip4) -> Self {
        Ipv4Addr::from(addr.octets())
    }
}

/// Parse a MAC address.
///
/// Hex digits are consumed pairwise into the six octets; every other character
/// is skipped, so both `00:11:22:33:44:55` and `0011.2233.4455` are accepted.
/// Exactly twelve hex digits are required.
pub fn parse_mac(s: &str) -> Result<Mac, Error> {
    let mut mac = [0; 6];
    let mut digits = 0;

    for nibble in s.chars().filter_map(|c| c.to_digit(16)) {
        if digits == 12 {
            digits += 1;
            break;
        }

        mac[digits / 2] = (mac[digits / 2] << 4) | nibble as u8;
        digits += 1;
    }

    if digits != 12 {
        warn!("Malformed MAC address {s:?}");
        Err(ErrorCode::InvalidMac)?;
    }

    Ok(mac)
}

/// Format a MAC address as lowercase, colon-separated hex.
pub fn format_mac(mac: &Mac) -> String {
    let mut s = String::with_capacity(17);

    for (i, octet) in mac.iter().enumerate() {
        if i > 0 {
            s.push(':');
        }

        let _ = write!(s, "{octet:02x}");
    }

    s
}

/// Parse an IPv4 address into network byte order.
pub fn parse_ipv4(s: &str, mode: Ipv4Parse) -> Result<Ip4, Error> {
    let ip = match mode {
        Ipv4Parse::Strict => s.parse::<Ipv4Addr>().ok().map(Ip4::from),
        Ipv4Parse::Lenient => parse_ipv4_lenient(s),
    };

    ip.ok_or_else(|| {
        warn!("Malformed IPv4 address {s:?}");
        ErrorCode::InvalidIpv4.into()
    })
}

fn parse_ipv4_lenient(s: &str) -> Option<Ip4> {
    if s.is_empty() {
        return None;
    }

    let mut addr: u32 = 0;
    let mut octet: u8 = 0;

    for b in s.bytes() {
        if b.is_ascii_digit() {
            octet = octet.wrapping_mul(10).wrapping_add(b - b'0');
        } else {
            addr = (addr << 8) | octet as u32;
            octet = 0;
        }
    }

    addr = (addr << 8) | octet as u32;

    Some(Ip4(addr.to_be()))
}

pub fn format_ipv4(ip: Ip4) -> String {
    Ipv4Addr::from(ip).to_string()
}

pub fn parse_ipv6(s: &str) -> Result<Ip6, Error> {
    s.parse::<Ipv6Addr>().map(|addr| addr.octets()).map_err(|_| {
        warn!("Malformed IPv6 address {s:?}");
        ErrorCode::InvalidIpv6.into()
    })
}

pub fn format_ipv6(ip: &Ip6) -> String {
    Ipv6Addr::from(*ip).to_string()
}

impl WireConvert for Mac {
    type Wire = String;

    fn from_wire(wire: &String, _config: &CodecConfig) -> Result<Self, Error> {
        parse_mac(wire)
    }

    fn to_wire(&self) -> String {
        format_mac(self)
    }
}

impl WireConvert for Ip4 {
    type Wire = String;

    fn from_wire(wire: &String, config: &CodecConfig) -> Result<Self, Error> {
        parse_ipv4(wire, config.ipv4)
    }

    fn to_wire(&self) -> String {
        format_ipv4(*self)
    }
}

impl WireConvert for Ip6 {
    type Wire = String;

    fn from_wire(wire: &String, _config: &CodecConfig) -> Result<Self, Error> {
        parse_ipv6(wire)
    }

    fn to_wire(&self) -> String {
        format_ipv6(self)
    }
}

/// `sai_ip_addr_family_t`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr)]
#[repr(i32)]
pub enum IpAddrFamily {
    Ipv4 = 0,
    Ipv6 = 1,
}

impl IpAddrFamily {
    pub fn from_wire(family: i32) -> Result<Self, Error> {
        Self::from_repr(family).ok_or_else(|| {
            warn!("Unknown IP address family {family}");
            ErrorCode::InvalidAddrFamily.into()
        })
    }

    pub const fn to_wire(self) -> i32 {
        self as i32
    }
}

fn ip4_from_wire(addr: &WireIpAddr, config: &CodecConfig) -> Result<Ip4, Error> {
    match addr {
        WireIpAddr::Ip4(s) => parse_ipv4(s, config.ipv4),
        WireIpAddr::Ip6(_) => Err(ErrorCode::AddrFamilyMismatch.into()),
    }
}

fn ip6_from_wire(addr: &WireIpAddr) -> Result<Ip6, Error> {
    match addr {
        WireIpAddr::Ip6(s) => parse_ipv6(s),
        WireIpAddr::Ip4(_) => Err(ErrorCode::AddrFamilyMismatch.into()),
    }
}

/// `sai_ip_addr_t`
///
/// All 16 bytes are always initialized; an IPv4 address occupies the first
/// four and the rest are zero.
#[derive(Clone, Copy)]
#[repr(C)]
pub union IpAddrUnion {
    pub ip4: Ip4,
    pub ip6: Ip6,
}

impl IpAddrUnion {
    pub const fn from_ip4(ip: Ip4) -> Self {
        let o = ip.octets();

        Self {
            ip6: [o[0], o[1], o[2], o[3], 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        }
    }

    pub const fn from_ip6(ip: Ip6) -> Self {
        Self { ip6: ip }
    }

    /// # Safety
    ///
    /// The union must hold an IPv4 address.
    const unsafe fn ip4(&self) -> Ip4 {
        self.ip4
    }

    /// # Safety
    ///
    /// The union must hold an IPv6 address.
    const unsafe fn ip6(&self) -> Ip6 {
        self.ip6
    }
}

/// `sai_ip_address_t`: the address family followed by the address union.
///
/// The family always names the arm of the union that holds the address.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct IpAddress {
    addr_family: IpAddrFamily,
    addr: IpAddrUnion,
}

impl IpAddress {
    pub const fn v4(ip: Ip4) -> Self {
        Self {
            addr_family: IpAddrFamily::Ipv4,
            addr: IpAddrUnion::from_ip4(ip),
        }
    }

    pub const fn v6(ip: Ip6) -> Self {
        Self {
            addr_family: IpAddrFamily::Ipv6,
            addr: IpAddrUnion::from_ip6(ip),
        }
    }

    pub const fn family(&self) -> IpAddrFamily {
        self.addr_family
    }

    pub const fn ip4(&self) -> Option<Ip4> {
        match self.addr_family {
            IpAddrFamily::Ipv4 => Some(unsafe { self.addr.ip4() }),
            IpAddrFamily::Ipv6 => None,
        }
    }

    pub const fn ip6(&self) -> Option<Ip6> {
        match self.addr_family {
            IpAddrFamily::Ipv4 => None,
            IpAddrFamily::Ipv6 => Some(unsafe { self.addr.ip6() }),
        }
    }

    pub fn to_ip_addr(&self) -> core::net::IpAddr {
        match self.addr_family {
            IpAddrFamily::Ipv4 => core::net::IpAddr::V4(unsafe { self.addr.ip4() }.into()),
            IpAddrFamily::Ipv6 => core::net::IpAddr::V6(unsafe { self.addr.ip6() }.into()),
        }
    }
}

impl From<core::net::IpAddr> for IpAddress {
    fn from(addr: core::net::IpAddr) -> Self {
        match addr {
            core::net::IpAddr::V4(addr) => Self::v4(addr.into()),
            core::net::IpAddr::V6(addr) => Self::v6(addr.octets()),
        }
    }
}

impl From<IpAddress> for core::net::IpAddr {
    fn from(addr: IpAddress) -> Self {
        addr.to_ip_addr()
    }
}

impl PartialEq for IpAddress {
    fn eq(&self, other: &Self) -> bool {
        self.to_ip_addr() == other.to_ip_addr()
    }
}

impl Eq for IpAddress {}

impl Hash for IpAddress {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_ip_addr().hash(state)
    }
}

impl fmt::Debug for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IpAddress({})", self.to_ip_addr())
    }
}

impl WireConvert for IpAddress {
    type Wire = WireIpAddress;

    /// The family decides which text is parsed; the other parser is never used.
    fn from_wire(wire: &WireIpAddress, config: &CodecConfig) -> Result<Self, Error> {
        match IpAddrFamily::from_wire(wire.addr_family)? {
            IpAddrFamily::Ipv4 => Ok(Self::v4(ip4_from_wire(&wire.addr, config)?)),
            IpAddrFamily::Ipv6 => Ok(Self::v6(ip6_from_wire(&wire.addr)?)),
        }
    }

    fn to_wire(&self) -> WireIpAddress {
        let addr = match self.to_ip_addr() {
            core::net::IpAddr::V4(ip) => WireIpAddr::Ip4(ip.to_string()),
            core::net::IpAddr::V6(ip) => WireIpAddr::Ip6(ip.to_string()),
        };

        WireIpAddress {
            addr_family: self.addr_family.to_wire(),
            addr,
        }
    }
}

/// `sai_ip_prefix_t`: family, address union and mask union, in that order.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct IpPrefix {
    addr_family: IpAddrFamily,
    addr: IpAddrUnion,
    mask: IpAddrUnion,
}

impl IpPrefix {
    pub const fn v4(addr: Ip4, mask: Ip4) -> Self {
        Self {
            addr_family: IpAddrFamily::Ipv4,
            addr: IpAddrUnion::from_ip4(addr),
            mask: IpAddrUnion::from_ip4(mask),
        }
    }

    pub const fn v6(addr: Ip6, mask: Ip6) -> Self {
        Self {
            addr_family: IpAddrFamily::Ipv6,
            addr: IpAddrUnion::from_ip6(addr),
            mask: IpAddrUnion::from_ip6(mask),
        }
    }

    pub const fn family(&self) -> IpAddrFamily {
        self.addr_family
    }

    pub const fn addr(&self) -> IpAddress {
        IpAddress {
            addr_family: self.addr_family,
            addr: self.addr,
        }
    }

    pub const fn mask(&self) -> IpAddress {
        IpAddress {
            addr_family: self.addr_family,
            addr: self.mask,
        }
    }
}

impl PartialEq for IpPrefix {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr() && self.mask() == other.mask()
    }
}

impl Eq for IpPrefix {}

impl Hash for IpPrefix {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
        self.mask().hash(state);
    }
}

impl fmt::Debug for IpPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "IpPrefix({}/{})",
            self.addr().to_ip_addr(),
            self.mask().to_ip_addr()
        )
    }
}

impl WireConvert for IpPrefix {
    type Wire = WireIpPrefix;

    fn from_wire(wire: &WireIpPrefix, config: &CodecConfig) -> Result<Self, Error> {
        match IpAddrFamily::from_wire(wire.addr_family)? {
            IpAddrFamily::Ipv4 => Ok(Self::v4(
                ip4_from_wire(&wire.addr, config)?,
                ip4_from_wire(&wire.mask, config)?,
            )),
            IpAddrFamily::Ipv6 => Ok(Self::v6(
                ip6_from_wire(&wire.addr)?,
                ip6_from_wire(&wire.mask)?,
            )),
        }
    }

    fn to_wire(&self) -> WireIpPrefix {
        let addr = self.addr().to_wire();
        let mask = self.mask().to_wire();

        WireIpPrefix {
            addr_family: self.addr_family.to_wire(),
            addr: addr.addr,
            mask: mask.addr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("00:11:22:33:44:55", [0x00, 0x11, 0x22, 0x33, 0x44, 0x55])]
    #[case("AA:bb:CC:dd:EE:ff", [0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff])]
    #[case("0011.2233.4455", [0x00, 0x11, 0x22, 0x33, 0x44, 0x55])]
    #[case("001122334455", [0x00, 0x11, 0x22, 0x33, 0x44, 0x55])]
    fn test_parse_mac(#[case] input: &str, #[case] expected: Mac) {
        assert_eq!(parse_mac(input).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("00:11:22:33:44")]
    #[case("00:11:22:33:44:55:66")]
    #[case("00:11:22:33:44:5")]
    #[case("zz:11:22:33:44:55")]
    fn test_parse_mac_invalid(#[case] input: &str) {
        assert_eq!(parse_mac(input).unwrap_err().code(), ErrorCode::InvalidMac);
    }

    #[test]
    fn test_format_mac() {
        assert_eq!(
            format_mac(&[0x00, 0x1a, 0x2b, 0x3c, 0x4d, 0xff]),
            "00:1a:2b:3c:4d:ff"
        );
    }

    #[test]
    fn test_ipv4_network_order() {
        let ip = parse_ipv4("10.0.0.1", Ipv4Parse::Strict).unwrap();

        assert_eq!(ip.octets(), [10, 0, 0, 1]);
        assert_eq!(ip.0, u32::from_be(0x0a00_0001));
        assert_eq!(format_ipv4(ip), "10.0.0.1");
    }

    #[rstest]
    #[case("")]
    #[case("10.0.0")]
    #[case("10.0.0.256")]
    #[case("10.0.0.1.5")]
    #[case("a.b.c.d")]
    #[case("::1")]
    fn test_ipv4_strict_rejects(#[case] input: &str) {
        assert_eq!(
            parse_ipv4(input, Ipv4Parse::Strict).unwrap_err().code(),
            ErrorCode::InvalidIpv4
        );
    }

    #[rstest]
    #[case("10.0.0.1", [10, 0, 0, 1])]
    #[case("192.168.1.254", [192, 168, 1, 254])]
    #[case("1.2.3", [0, 1, 2, 3])]
    #[case("1.2.3.4.5", [2, 3, 4, 5])]
    #[case("10.0.0.300", [10, 0, 0, 44])]
    fn test_ipv4_lenient(#[case] input: &str, #[case] expected: [u8; 4]) {
        assert_eq!(
            parse_ipv4(input, Ipv4Parse::Lenient).unwrap().octets(),
            expected
        );
    }

    #[test]
    fn test_ipv4_lenient_rejects_empty() {
        assert!(parse_ipv4("", Ipv4Parse::Lenient).is_err());
    }

    #[test]
    fn test_ipv6() {
        let ip = parse_ipv6("2001:db8::1").unwrap();

        assert_eq!(ip[..4], [0x20, 0x01, 0x0d, 0xb8]);
        assert_eq!(ip[15], 1);
        assert_eq!(format_ipv6(&ip), "2001:db8::1");

        assert_eq!(
            parse_ipv6("10.0.0.1").unwrap_err().code(),
            ErrorCode::InvalidIpv6
        );
    }

    #[test]
    fn test_ip_address_family_selects_parser() {
        let config = CodecConfig::new();

        let wire = WireIpAddress {
            addr_family: 0,
            addr: WireIpAddr::Ip4("192.168.0.1".into()),
        };
        let ip = IpAddress::from_wire(&wire, &config).unwrap();
        assert_eq!(ip, IpAddress::v4(Ip4::from_octets([192, 168, 0, 1])));
        assert_eq!(ip.to_wire(), wire);

        let wire = WireIpAddress {
            addr_family: 1,
            addr: WireIpAddr::Ip4("::1".into()),
        };
        assert_eq!(
            IpAddress::from_wire(&wire, &config).unwrap_err().code(),
            ErrorCode::AddrFamilyMismatch
        );

        let wire = WireIpAddress {
            addr_family: 7,
            addr: WireIpAddr::Ip4("10.0.0.1".into()),
        };
        assert_eq!(
            IpAddress::from_wire(&wire, &config).unwrap_err().code(),
            ErrorCode::InvalidAddrFamily
        );
    }

    #[test]
    fn test_ipv4_prefix_uses_ipv4_parser() {
        let config = CodecConfig::new();

        let wire = WireIpPrefix {
            addr_family: 0,
            addr: WireIpAddr::Ip4("10.1.0.0".into()),
            mask: WireIpAddr::Ip4("255.255.0.0".into()),
        };
        let prefix = IpPrefix::from_wire(&wire, &config).unwrap();
        assert_eq!(
            prefix,
            IpPrefix::v4(
                Ip4::from_octets([10, 1, 0, 0]),
                Ip4::from_octets([255, 255, 0, 0]),
            )
        );
        assert_eq!(prefix.mask().ip4(), Some(Ip4::from_octets([255, 255, 0, 0])));
        assert_eq!(prefix.addr().ip6(), None);
        assert_eq!(prefix.to_wire(), wire);

        // IPv6 text in the IPv4 arm is an IPv4 parse failure
        let wire = WireIpPrefix {
            addr_family: 0,
            addr: WireIpAddr::Ip4("2001:db8::".into()),
            mask: WireIpAddr::Ip4("ffff:ffff::".into()),
        };
        assert_eq!(
            IpPrefix::from_wire(&wire, &config).unwrap_err().code(),
            ErrorCode::InvalidIpv4
        );
    }

    #[test]
    fn test_ipv6_prefix() {
        let wire = WireIpPrefix {
            addr_family: 1,
            addr: WireIpAddr::Ip6("2001:db8::".into()),
            mask: WireIpAddr::Ip6("ffff:ffff::".into()),
        };
        let prefix = IpPrefix::from_wire(&wire, &CodecConfig::new()).unwrap();

        assert_eq!(prefix.family(), IpAddrFamily::Ipv6);
        assert_eq!(prefix.to_wire(), wire);
    }

    #[repr(C)]
    struct CIpAddress {
        addr_family: i32,
        addr: [u8; 16],
    }

    #[repr(C)]
    struct CIpPrefix {
        addr_family: i32,
        addr: [u8; 16],
        mask: [u8; 16],
    }

    #[test]
    fn test_c_layout() {
        use core::mem::{align_of, offset_of, size_of};

        assert_eq!(size_of::<IpAddrUnion>(), 16);
        assert_eq!(align_of::<IpAddrUnion>(), 4);

        assert_eq!(size_of::<IpAddress>(), size_of::<CIpAddress>());
        assert_eq!(offset_of!(IpAddress, addr_family), 0);
        assert_eq!(offset_of!(IpAddress, addr), offset_of!(CIpAddress, addr));

        assert_eq!(size_of::<IpPrefix>(), size_of::<CIpPrefix>());
        assert_eq!(offset_of!(IpPrefix, addr), offset_of!(CIpPrefix, addr));
        assert_eq!(offset_of!(IpPrefix, mask), offset_of!(CIpPrefix, mask));
    }

    #[test]
    fn test_prefix_list_as_seen_by_native_code() {
        use crate::list::{ListAlloc, Malloc, NativeList};

        let list: NativeList<IpPrefix> = NativeList::from_slice(&[
            IpPrefix::v4(
                Ip4::from_octets([10, 1, 0, 0]),
                Ip4::from_octets([255, 255, 0, 0]),
            ),
            IpPrefix::v6(
                parse_ipv6("fd00::").unwrap(),
                parse_ipv6("ff00::").unwrap(),
            ),
        ])
        .unwrap();

        let (ptr, count) = list.into_raw_parts();
        assert_eq!(count, 2);

        let c = unsafe { core::slice::from_raw_parts(ptr as *const CIpPrefix, 2) };

        assert_eq!(c[0].addr_family, 0);
        assert_eq!(c[0].addr[..4], [10, 1, 0, 0]);
        assert_eq!(c[0].mask[..4], [255, 255, 0, 0]);
        assert!(c[0].addr[4..].iter().all(|b| *b == 0));

        assert_eq!(c[1].addr_family, 1);
        assert_eq!(c[1].addr[0], 0xfd);
        assert_eq!(c[1].mask[0], 0xff);
        assert_eq!(c[1].mask[1], 0);

        unsafe { Malloc::release(ptr as *mut u8) };
    }

    #[test]
    fn test_address_list_as_seen_by_native_code() {
        use crate::list::NativeList;

        let list: NativeList<IpAddress> = NativeList::from_slice(&[
            IpAddress::v4(Ip4::from_octets([192, 168, 0, 1])),
            IpAddress::v6(parse_ipv6("::1").unwrap()),
        ])
        .unwrap();

        let c = unsafe { core::slice::from_raw_parts(list.as_ptr() as *const CIpAddress, 2) };

        assert_eq!(c[0].addr_family, 0);
        assert_eq!(c[0].addr[..4], [192, 168, 0, 1]);
        assert_eq!(c[1].addr_family, 1);
        assert_eq!(c[1].addr[15], 1);
    }

    #[test]
    fn test_native_written_prefix_is_read_back() {
        use crate::list::{ListAlloc, Malloc, NativeList};

        let ptr = Malloc::allocate(core::mem::size_of::<CIpPrefix>()) as *mut CIpPrefix;
        assert!(!ptr.is_null());

        let mut addr = [0; 16];
        addr[..4].copy_from_slice(&[172, 16, 0, 0]);
        let mut mask = [0; 16];
        mask[..4].copy_from_slice(&[255, 240, 0, 0]);

        unsafe {
            ptr.write(CIpPrefix {
                addr_family: 0,
                addr,
                mask,
            })
        };

        let list = unsafe { NativeList::<IpPrefix>::from_raw_parts(ptr as *mut IpPrefix, 1) }
            .unwrap();

        assert_eq!(
            list[0],
            IpPrefix::v4(
                Ip4::from_octets([172, 16, 0, 0]),
                Ip4::from_octets([255, 240, 0, 0]),
            )
        );
        assert_eq!(list[0].to_wire().mask, WireIpAddr::Ip4("255.240.0.0".into()));
    }
}

//! CIDR, address range and IP version models

use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use crate::address_space::{IPV4_BITS, IPV4_MAX, IPV6_BITS};
use crate::{codec, range, Error, Result};

/// IP protocol version
///
/// Serialized as the bare number `4` or `6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum IpVersion {
    V4,
    V6,
}

impl IpVersion {
    /// Width of an address in bits (32 or 128)
    pub const fn bits(self) -> u8 {
        match self {
            IpVersion::V4 => IPV4_BITS,
            IpVersion::V6 => IPV6_BITS,
        }
    }

    /// Highest address value of this family
    pub const fn max_address(self) -> u128 {
        match self {
            IpVersion::V4 => IPV4_MAX,
            IpVersion::V6 => u128::MAX,
        }
    }

    /// Validate a prefix length for this family
    pub fn check_prefix(self, prefix: u8) -> Result<u8> {
        if prefix > self.bits() {
            return Err(Error::PrefixOutOfRange {
                prefix: u32::from(prefix),
                version: self,
            });
        }
        Ok(prefix)
    }

    /// Mask covering the host bits of `prefix`.
    ///
    /// `prefix` must already be valid for this family.
    pub(crate) fn host_mask(self, prefix: u8) -> u128 {
        let host_bits = u32::from(self.bits().saturating_sub(prefix));
        1u128
            .checked_shl(host_bits)
            .map(|block| block - 1)
            .unwrap_or(u128::MAX)
    }

    /// Mask covering the network bits of `prefix`, restricted to this family.
    pub(crate) fn network_mask(self, prefix: u8) -> u128 {
        self.max_address() & !self.host_mask(prefix)
    }
}

impl fmt::Display for IpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpVersion::V4 => write!(f, "IPv4"),
            IpVersion::V6 => write!(f, "IPv6"),
        }
    }
}

impl From<IpVersion> for u8 {
    fn from(version: IpVersion) -> Self {
        match version {
            IpVersion::V4 => 4,
            IpVersion::V6 => 6,
        }
    }
}

impl TryFrom<u8> for IpVersion {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            4 => Ok(IpVersion::V4),
            6 => Ok(IpVersion::V6),
            other => Err(Error::InvalidArgument(format!(
                "IP version must be 4 or 6, got {}",
                other
            ))),
        }
    }
}

/// A normalized CIDR block
///
/// The base address always has its host bits cleared, so two CIDRs that
/// denote the same range compare equal regardless of how they were written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cidr {
    version: IpVersion,
    base: u128,
    prefix: u8,
}

impl Cidr {
    /// Build a CIDR from an address value, normalizing it down to the network base
    pub fn new(version: IpVersion, address: u128, prefix: u8) -> Result<Self> {
        version.check_prefix(prefix)?;
        if address > version.max_address() {
            return Err(Error::InvalidAddress {
                text: address.to_string(),
                version,
            });
        }
        Ok(Self::aligned(version, address, prefix))
    }

    /// Build a CIDR whose prefix is known to be valid for `version`
    pub(crate) fn aligned(version: IpVersion, address: u128, prefix: u8) -> Self {
        debug_assert!(prefix <= version.bits());
        Self {
            version,
            base: address & version.network_mask(prefix),
            prefix,
        }
    }

    pub fn version(&self) -> IpVersion {
        self.version
    }

    /// Network base address
    pub fn base(&self) -> u128 {
        self.base
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Last address covered by this block
    pub fn last(&self) -> u128 {
        self.base | self.version.host_mask(self.prefix)
    }

    /// Inclusive address range covered by this block
    pub fn range(&self) -> AddressRange {
        AddressRange {
            start: self.base,
            end: self.last(),
            version: self.version,
        }
    }

    /// Number of addresses in the block
    pub fn size(&self) -> BigUint {
        BigUint::from(1u32) << (self.version.bits() - self.prefix)
    }

    /// Check if `other` lies entirely within this block
    pub fn contains(&self, other: &Cidr) -> bool {
        self.version == other.version
            && other.prefix >= self.prefix
            && other.base & self.version.network_mask(self.prefix) == self.base
    }

    /// Check if a single address value lies within this block
    pub fn contains_address(&self, address: u128) -> bool {
        address >= self.base && address <= self.last()
    }

    /// Check if two blocks share any address
    ///
    /// Aligned blocks either nest or are disjoint, so overlap is containment
    /// in one direction or the other.
    pub fn overlaps(&self, other: &Cidr) -> bool {
        self.contains(other) || other.contains(self)
    }
}

impl fmt::Display for Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}",
            codec::format_address(self.base, self.version),
            self.prefix
        )
    }
}

impl FromStr for Cidr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        range::parse_cidr(s)
    }
}

impl TryFrom<String> for Cidr {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Cidr> for String {
    fn from(cidr: Cidr) -> Self {
        cidr.to_string()
    }
}

impl From<IpNet> for Cidr {
    fn from(net: IpNet) -> Self {
        match net {
            IpNet::V4(net) => Self::aligned(
                IpVersion::V4,
                u128::from(u32::from(net.network())),
                net.prefix_len(),
            ),
            IpNet::V6(net) => Self::aligned(
                IpVersion::V6,
                u128::from(net.network()),
                net.prefix_len(),
            ),
        }
    }
}

impl TryFrom<Cidr> for IpNet {
    type Error = Error;

    fn try_from(cidr: Cidr) -> Result<Self> {
        Ok(match cidr.version {
            IpVersion::V4 => {
                let addr = u32::try_from(cidr.base).map_err(|_| Error::InvalidAddress {
                    text: cidr.base.to_string(),
                    version: IpVersion::V4,
                })?;
                IpNet::V4(Ipv4Net::new(Ipv4Addr::from(addr), cidr.prefix)?)
            }
            IpVersion::V6 => IpNet::V6(Ipv6Net::new(Ipv6Addr::from(cidr.base), cidr.prefix)?),
        })
    }
}

/// Inclusive range of address values within one address family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AddressRange {
    pub start: u128,
    pub end: u128,
    pub version: IpVersion,
}

impl AddressRange {
    /// Create a range, checking `start <= end` and both within the family
    pub fn new(start: u128, end: u128, version: IpVersion) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidArgument(format!(
                "range start {} is after end {}",
                start, end
            )));
        }
        if end > version.max_address() {
            return Err(Error::InvalidAddress {
                text: end.to_string(),
                version,
            });
        }
        Ok(Self {
            start,
            end,
            version,
        })
    }

    /// Number of addresses in the range (up to 2^128)
    pub fn size(&self) -> BigUint {
        BigUint::from(self.end - self.start) + 1u32
    }

    /// First address, formatted
    pub fn first(&self) -> String {
        codec::format_address(self.start, self.version)
    }

    /// Last address, formatted
    pub fn last(&self) -> String {
        codec::format_address(self.end, self.version)
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.first(), self.last())
    }
}

impl From<&Cidr> for AddressRange {
    fn from(cidr: &Cidr) -> Self {
        cidr.range()
    }
}

/// Display-ready summary of one CIDR block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetInfo {
    pub cidr: Cidr,
    /// Dotted netmask (IPv4 only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub netmask: Option<String>,
    pub first: String,
    pub last: String,
    /// Host-assignable addresses
    #[serde(with = "crate::counts::decimal")]
    pub usable: BigUint,
    #[serde(with = "crate::counts::decimal")]
    pub total: BigUint,
}

impl From<&Cidr> for SubnetInfo {
    fn from(cidr: &Cidr) -> Self {
        let version = cidr.version();
        let netmask = match version {
            IpVersion::V4 => range::netmask(cidr.prefix()).ok(),
            IpVersion::V6 => None,
        };
        let range = cidr.range();
        Self {
            cidr: *cidr,
            netmask,
            first: range.first(),
            last: range.last(),
            usable: range::usable_addresses_for(cidr.prefix(), version),
            total: cidr.size(),
        }
    }
}

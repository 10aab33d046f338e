//! CIDR range arithmetic
//!
//! Conversions between CIDR text, normalized [`Cidr`] values and inclusive
//! address ranges, plus exact address counts. Counts are [`BigUint`] because an
//! IPv6 `/0` holds 2^128 addresses, one more than `u128` can represent.

use num_bigint::BigUint;
use num_traits::One;

use crate::codec;
use crate::models::{AddressRange, Cidr, IpVersion, SubnetInfo};
use crate::{Error, Result};

/// Parse `address/prefix` text into a normalized CIDR
///
/// The version is detected from the address (`:` means IPv6, otherwise
/// dotted IPv4). Host bits are masked off, so `10.0.0.7/8` parses as
/// `10.0.0.0/8`.
pub fn parse_cidr(text: &str) -> Result<Cidr> {
    let invalid = || Error::InvalidCidr(text.to_string());

    let (address, prefix) = text.split_once('/').ok_or_else(invalid)?;
    let version = codec::ip_version(address).ok_or_else(invalid)?;

    let prefix = prefix.trim();
    if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let prefix: u32 = prefix.parse().map_err(|_| invalid())?;
    let prefix = u8::try_from(prefix)
        .ok()
        .filter(|p| *p <= version.bits())
        .ok_or(Error::PrefixOutOfRange { prefix, version })?;

    let value = codec::parse_address(address, version)?;
    Ok(Cidr::aligned(version, value, prefix))
}

/// Total addresses in a block of the given prefix: `2^(bits - prefix)`
pub fn total_addresses(prefix: u8, version: IpVersion) -> Result<BigUint> {
    version.check_prefix(prefix)?;
    Ok(total_addresses_for(prefix, version))
}

pub(crate) fn total_addresses_for(prefix: u8, version: IpVersion) -> BigUint {
    BigUint::one() << (version.bits() - prefix)
}

/// Addresses assignable to hosts
///
/// IPv6 reserves nothing. IPv4 loses the network and broadcast addresses, so
/// `/31` and `/32` report zero usable addresses.
pub fn usable_addresses(prefix: u8, version: IpVersion) -> Result<BigUint> {
    version.check_prefix(prefix)?;
    Ok(usable_addresses_for(prefix, version))
}

pub(crate) fn usable_addresses_for(prefix: u8, version: IpVersion) -> BigUint {
    let total = total_addresses_for(prefix, version);
    match version {
        IpVersion::V6 => total,
        IpVersion::V4 if total >= BigUint::from(2u32) => total - 2u32,
        IpVersion::V4 => BigUint::default(),
    }
}

/// Inclusive range of a CIDR
pub fn range_of(cidr: &Cidr) -> Result<AddressRange> {
    range_from(cidr.base(), cidr.prefix(), cidr.version())
}

/// Inclusive range of a block starting at a raw (possibly unaligned) address
///
/// Fails with [`Error::RangeOverflow`] when the block would run past the top
/// of the address family.
pub fn range_from(start: u128, prefix: u8, version: IpVersion) -> Result<AddressRange> {
    version.check_prefix(prefix)?;
    let overflow = || Error::RangeOverflow {
        start,
        prefix,
        version,
    };
    let end = start
        .checked_add(version.host_mask(prefix))
        .filter(|end| *end <= version.max_address())
        .ok_or_else(overflow)?;
    Ok(AddressRange {
        start,
        end,
        version,
    })
}

/// Dotted-quad netmask for an IPv4 prefix
pub fn netmask(prefix: u8) -> Result<String> {
    let version = IpVersion::V4;
    version.check_prefix(prefix)?;
    Ok(codec::format_address(version.network_mask(prefix), version))
}

/// Smallest prefix (largest block) whose size is at least `required`
///
/// Equivalent to scanning from the narrowest prefix toward `/0` and stopping
/// at the first block that fits. Demands beyond the whole family clamp to `/0`.
pub fn prefix_for_at_least(required: &BigUint, version: IpVersion) -> u8 {
    if *required <= BigUint::one() {
        return version.bits();
    }
    // ceil(log2(required)) is the bit length of required - 1
    let exponent = (required - 1u32).bits();
    let bits = u64::from(version.bits());
    (bits - exponent.min(bits)) as u8
}

/// Summary of the block containing `address` at `prefix`
///
/// The version is detected from the address when not given.
pub fn subnet_info(address: &str, prefix: u8, version: Option<IpVersion>) -> Result<SubnetInfo> {
    let detected = if address.contains(':') {
        IpVersion::V6
    } else {
        IpVersion::V4
    };
    let version = match version {
        Some(expected) if expected != detected => {
            return Err(Error::VersionMismatch {
                expected,
                found: detected,
            });
        }
        Some(expected) => expected,
        None => detected,
    };
    version.check_prefix(prefix)?;
    let value = codec::parse_address(address, version)?;
    Ok(SubnetInfo::from(&Cidr::aligned(version, value, prefix)))
}

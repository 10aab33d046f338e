//! Address text codec
//!
//! Converts dotted-quad IPv4 and hextet IPv6 text to and from integer
//! address values. IPv6 output is always the canonical compressed form: the
//! longest run of two or more zero groups becomes `::`, leftmost run on ties.

use crate::models::IpVersion;
use crate::{Error, Result};

/// Detect the IP version of an address or CIDR string
///
/// Anything containing `:` is treated as IPv6; four all-digit dotted parts as
/// IPv4. Everything else has no version.
pub fn ip_version(text: &str) -> Option<IpVersion> {
    let address = text.split('/').next().unwrap_or_default().trim();
    if address.contains(':') {
        return Some(IpVersion::V6);
    }
    let parts: Vec<&str> = address.split('.').collect();
    if parts.len() == 4 && parts.iter().all(|p| is_decimal(p)) {
        Some(IpVersion::V4)
    } else {
        None
    }
}

/// Parse address text into its integer value
pub fn parse_address(text: &str, version: IpVersion) -> Result<u128> {
    let parsed = match version {
        IpVersion::V4 => parse_ipv4(text).map(u128::from),
        IpVersion::V6 => parse_ipv6_groups(text).map(groups_to_value),
    };
    parsed.ok_or_else(|| Error::InvalidAddress {
        text: text.to_string(),
        version,
    })
}

/// Format an integer address value
///
/// IPv4 uses the low 32 bits of `value`.
pub fn format_address(value: u128, version: IpVersion) -> String {
    match version {
        IpVersion::V4 => {
            let [a, b, c, d] = (value as u32).to_be_bytes();
            format!("{}.{}.{}.{}", a, b, c, d)
        }
        IpVersion::V6 => format_ipv6(&value_to_groups(value)),
    }
}

/// Expand IPv6 text to eight zero-padded groups
pub fn expand_ipv6(text: &str) -> Result<String> {
    let groups = parse_ipv6_groups(text).ok_or_else(|| Error::InvalidAddress {
        text: text.to_string(),
        version: IpVersion::V6,
    })?;
    Ok(groups
        .iter()
        .map(|g| format!("{:04x}", g))
        .collect::<Vec<_>>()
        .join(":"))
}

/// Rewrite IPv6 text in canonical compressed form
pub fn compress_ipv6(text: &str) -> Result<String> {
    let value = parse_address(text, IpVersion::V6)?;
    Ok(format_address(value, IpVersion::V6))
}

fn is_decimal(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn parse_ipv4(text: &str) -> Option<u32> {
    let parts: Vec<&str> = text.trim().split('.').collect();
    if parts.len() != 4 {
        return None;
    }
    let mut value = 0u32;
    for part in parts {
        if !is_decimal(part) {
            return None;
        }
        let octet: u8 = part.parse().ok()?;
        value = (value << 8) | u32::from(octet);
    }
    Some(value)
}

fn parse_group(group: &str) -> Option<u16> {
    if group.is_empty() || !group.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(group, 16).ok()
}

fn parse_side(side: &str) -> Option<Vec<u16>> {
    if side.is_empty() {
        return Some(Vec::new());
    }
    side.split(':').map(parse_group).collect()
}

/// Parse IPv6 text into eight groups.
///
/// Accepts 3 to 8 colon-separated pieces with at most one `::`. Embedded
/// IPv4 notation is rejected.
fn parse_ipv6_groups(text: &str) -> Option<[u16; 8]> {
    let s = text.trim();
    if s.contains('.') {
        return None;
    }
    let pieces = s.split(':').count();
    if !(3..=8).contains(&pieces) {
        return None;
    }

    let mut groups = [0u16; 8];
    match s.split_once("::") {
        None => {
            let explicit = parse_side(s)?;
            if explicit.len() != 8 {
                return None;
            }
            groups.copy_from_slice(&explicit);
        }
        Some((head, tail)) => {
            if tail.contains("::") {
                return None;
            }
            let head = parse_side(head)?;
            let tail = parse_side(tail)?;
            if head.len() + tail.len() > 7 {
                return None;
            }
            groups[..head.len()].copy_from_slice(&head);
            groups[8 - tail.len()..].copy_from_slice(&tail);
        }
    }
    Some(groups)
}

fn groups_to_value(groups: [u16; 8]) -> u128 {
    groups
        .iter()
        .fold(0u128, |acc, &g| (acc << 16) | u128::from(g))
}

fn value_to_groups(value: u128) -> [u16; 8] {
    let mut groups = [0u16; 8];
    for (i, group) in groups.iter_mut().enumerate() {
        *group = (value >> (112 - 16 * i)) as u16;
    }
    groups
}

fn format_ipv6(groups: &[u16; 8]) -> String {
    // Longest zero run; strict comparison keeps the leftmost on ties
    let (mut best_start, mut best_len) = (0, 0);
    let mut i = 0;
    while i < groups.len() {
        if groups[i] != 0 {
            i += 1;
            continue;
        }
        let start = i;
        while i < groups.len() && groups[i] == 0 {
            i += 1;
        }
        if i - start > best_len {
            best_start = start;
            best_len = i - start;
        }
    }

    let join = |gs: &[u16]| {
        gs.iter()
            .map(|g| format!("{:x}", g))
            .collect::<Vec<_>>()
            .join(":")
    };

    if best_len < 2 {
        return join(groups);
    }
    format!(
        "{}::{}",
        join(&groups[..best_start]),
        join(&groups[best_start + best_len..])
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ipv4() {
        assert_eq!(parse_address("10.0.0.1", IpVersion::V4).unwrap(), 0x0A00_0001);
        assert_eq!(
            parse_address(" 255.255.255.255 ", IpVersion::V4).unwrap(),
            0xFFFF_FFFF
        );
        assert_eq!(parse_address("0.0.0.0", IpVersion::V4).unwrap(), 0);
    }

    #[test]
    fn test_parse_ipv4_invalid() {
        for bad in ["", "10.0.0", "10.0.0.0.0", "256.0.0.1", "10.0.0.-1", "a.b.c.d", "10..0.1", "1.2.3.4a"] {
            let result = parse_address(bad, IpVersion::V4);
            assert!(
                matches!(result, Err(Error::InvalidAddress { .. })),
                "{:?} should be invalid",
                bad
            );
        }
    }

    #[test]
    fn test_parse_ipv6() {
        assert_eq!(parse_address("::", IpVersion::V6).unwrap(), 0);
        assert_eq!(parse_address("::1", IpVersion::V6).unwrap(), 1);
        assert_eq!(
            parse_address("2001:db8::", IpVersion::V6).unwrap(),
            0x2001_0db8u128 << 96
        );
        assert_eq!(
            parse_address("FFFF:ffff:ffff:ffff:ffff:ffff:ffff:ffff", IpVersion::V6).unwrap(),
            u128::MAX
        );
        assert_eq!(
            parse_address("1:2:3:4:5:6::8", IpVersion::V6).unwrap(),
            parse_address("1:2:3:4:5:6:0:8", IpVersion::V6).unwrap()
        );
    }

    #[test]
    fn test_parse_ipv6_invalid() {
        for bad in [
            "",
            "1:2",
            "1::2::3",
            ":::",
            "1:::2",
            ":1:2:3:4:5:6:7",
            "1:2:3:4:5:6:7",
            "1:2:3:4:5:6:7:8:9",
            "1:2:3:4:5:6:7::",
            "12345::",
            "g::1",
            "::ffff:10.0.0.1",
        ] {
            let result = parse_address(bad, IpVersion::V6);
            assert!(
                matches!(result, Err(Error::InvalidAddress { .. })),
                "{:?} should be invalid",
                bad
            );
        }
    }

    #[test]
    fn test_format_ipv4() {
        assert_eq!(format_address(0xC0A8_0101, IpVersion::V4), "192.168.1.1");
        assert_eq!(format_address(0, IpVersion::V4), "0.0.0.0");
    }

    #[test]
    fn test_format_ipv6_compression() {
        let fmt = |s: &str| compress_ipv6(s).unwrap();
        assert_eq!(fmt("0:0:0:0:0:0:0:0"), "::");
        assert_eq!(fmt("0:0:0:0:0:0:0:1"), "::1");
        assert_eq!(fmt("1:0:0:0:0:0:0:0"), "1::");
        assert_eq!(fmt("2001:0db8:0000:0000:0000:0000:0000:0001"), "2001:db8::1");
        // A single zero group is never compressed
        assert_eq!(fmt("1:0:2:3:4:5:6:7"), "1:0:2:3:4:5:6:7");
        // Longest run wins
        assert_eq!(fmt("1:0:0:2:0:0:0:3"), "1:0:0:2::3");
        // Leftmost run wins ties
        assert_eq!(fmt("1:0:0:2:3:0:0:4"), "1::2:3:0:0:4");
    }

    #[test]
    fn test_expand_ipv6() {
        assert_eq!(
            expand_ipv6("2001:db8::1").unwrap(),
            "2001:0db8:0000:0000:0000:0000:0000:0001"
        );
        assert_eq!(
            expand_ipv6("::").unwrap(),
            "0000:0000:0000:0000:0000:0000:0000:0000"
        );
        assert!(expand_ipv6("10.0.0.1").is_err());
    }

    #[test]
    fn test_ip_version() {
        assert_eq!(ip_version("10.0.0.0/24"), Some(IpVersion::V4));
        assert_eq!(ip_version("2001:db8::/32"), Some(IpVersion::V6));
        assert_eq!(ip_version("::1"), Some(IpVersion::V6));
        assert_eq!(ip_version("10.0.0/24"), None);
        assert_eq!(ip_version("example.com"), None);
        assert_eq!(ip_version(""), None);
    }
}

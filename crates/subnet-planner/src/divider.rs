//! Subnet division, parent and sibling lookup

use num_bigint::BigUint;
use num_traits::One;

use crate::models::{Cidr, IpVersion};
use crate::{Error, Result};

/// Default cap on the number of subnets [`divide`] will materialize
pub const DEFAULT_DIVIDE_LIMIT: usize = 1 << 16;

/// Lazy iterator over the equal-size subnets of a CIDR, in ascending order
#[derive(Debug, Clone)]
pub struct Subnets {
    version: IpVersion,
    prefix: u8,
    next: Option<u128>,
    last: u128,
}

impl Subnets {
    fn host_bits(&self) -> u32 {
        u32::from(self.version.bits() - self.prefix)
    }
}

impl Iterator for Subnets {
    type Item = Cidr;

    fn next(&mut self) -> Option<Cidr> {
        let current = self.next?;
        self.next = if current == self.last {
            None
        } else {
            1u128
                .checked_shl(self.host_bits())
                .and_then(|step| current.checked_add(step))
        };
        Some(Cidr::aligned(self.version, current, self.prefix))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let Some(current) = self.next else {
            return (0, Some(0));
        };
        let remaining = (self.last - current)
            .checked_shr(self.host_bits())
            .unwrap_or(0)
            .checked_add(1)
            .and_then(|n| usize::try_from(n).ok());
        match remaining {
            Some(n) => (n, Some(n)),
            None => (usize::MAX, None),
        }
    }
}

/// Iterate the subnets of `cidr` at `new_prefix`
///
/// Requires `cidr.prefix() <= new_prefix <= bits`. Yields
/// `2^(new_prefix - prefix)` contiguous blocks covering exactly the parent.
pub fn subnets(cidr: &Cidr, new_prefix: u8) -> Result<Subnets> {
    let version = cidr.version();
    version.check_prefix(new_prefix)?;
    if new_prefix < cidr.prefix() {
        return Err(Error::PrefixTooShort {
            requested: new_prefix,
            current: cidr.prefix(),
        });
    }
    Ok(Subnets {
        version,
        prefix: new_prefix,
        next: Some(cidr.base()),
        last: cidr.last() & version.network_mask(new_prefix),
    })
}

/// Number of subnets `cidr` splits into at `new_prefix`
pub fn subnet_count(cidr: &Cidr, new_prefix: u8) -> Result<BigUint> {
    cidr.version().check_prefix(new_prefix)?;
    if new_prefix < cidr.prefix() {
        return Err(Error::PrefixTooShort {
            requested: new_prefix,
            current: cidr.prefix(),
        });
    }
    Ok(BigUint::one() << (new_prefix - cidr.prefix()))
}

/// Split `cidr` into subnets of `new_prefix`
///
/// Fails with [`Error::TooManySubnets`] above [`DEFAULT_DIVIDE_LIMIT`]; use
/// [`subnets`] to walk larger divisions lazily.
pub fn divide(cidr: &Cidr, new_prefix: u8) -> Result<Vec<Cidr>> {
    divide_with_limit(cidr, new_prefix, DEFAULT_DIVIDE_LIMIT)
}

/// Split `cidr` into subnets of `new_prefix`, materializing at most `limit`
pub fn divide_with_limit(cidr: &Cidr, new_prefix: u8, limit: usize) -> Result<Vec<Cidr>> {
    let count = subnet_count(cidr, new_prefix)?;
    if count > BigUint::from(limit) {
        return Err(Error::TooManySubnets {
            cidr: cidr.to_string(),
            prefix: new_prefix,
            limit,
        });
    }
    Ok(subnets(cidr, new_prefix)?.collect())
}

/// The block one prefix bit shorter that contains `cidr`
pub fn parent_of(cidr: &Cidr) -> Result<Cidr> {
    if cidr.prefix() == 0 {
        return Err(Error::NoParent(cidr.to_string()));
    }
    Ok(Cidr::aligned(cidr.version(), cidr.base(), cidr.prefix() - 1))
}

/// The other half of `cidr`'s parent
pub fn sibling_of(cidr: &Cidr) -> Result<Cidr> {
    let parent = parent_of(cidr)?;
    subnets(&parent, cidr.prefix())?
        .find(|half| half != cidr)
        .ok_or_else(|| Error::NoParent(cidr.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cidr(s: &str) -> Cidr {
        s.parse().unwrap()
    }

    fn strings(cidrs: &[Cidr]) -> Vec<String> {
        cidrs.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_divide_v4() {
        let parts = divide(&cidr("10.0.0.0/24"), 26).unwrap();
        assert_eq!(
            strings(&parts),
            vec!["10.0.0.0/26", "10.0.0.64/26", "10.0.0.128/26", "10.0.0.192/26"]
        );
    }

    #[test]
    fn test_divide_same_prefix_is_identity() {
        let c = cidr("10.0.0.0/24");
        assert_eq!(divide(&c, 24).unwrap(), vec![c]);
    }

    #[test]
    fn test_divide_v6() {
        let parts = divide(&cidr("2001:db8::/48"), 50).unwrap();
        assert_eq!(
            strings(&parts),
            vec![
                "2001:db8::/50",
                "2001:db8:0:4000::/50",
                "2001:db8:0:8000::/50",
                "2001:db8:0:c000::/50"
            ]
        );
    }

    #[test]
    fn test_divide_top_of_space() {
        let parts = divide(&cidr("255.255.255.252/30"), 32).unwrap();
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[3].to_string(), "255.255.255.255/32");

        let parts = divide(&cidr("::/0"), 1).unwrap();
        assert_eq!(strings(&parts), vec!["::/1", "8000::/1"]);
    }

    #[test]
    fn test_divide_invalid_prefix() {
        let c = cidr("10.0.0.0/24");
        assert!(matches!(
            divide(&c, 23),
            Err(Error::PrefixTooShort { requested: 23, current: 24 })
        ));
        assert!(matches!(
            divide(&c, 33),
            Err(Error::PrefixOutOfRange { prefix: 33, .. })
        ));
    }

    #[test]
    fn test_divide_limit() {
        let c = cidr("10.0.0.0/8");
        assert!(matches!(
            divide(&c, 32),
            Err(Error::TooManySubnets { limit: DEFAULT_DIVIDE_LIMIT, .. })
        ));
        assert_eq!(divide_with_limit(&c, 12, 16).unwrap().len(), 16);
        assert!(divide_with_limit(&c, 13, 16).is_err());
    }

    #[test]
    fn test_subnets_lazy_over_huge_division() {
        let mut iter = subnets(&cidr("::/0"), 128).unwrap();
        assert_eq!(iter.size_hint().1, None);
        assert_eq!(iter.next().unwrap().to_string(), "::/128");
        assert_eq!(iter.next().unwrap().to_string(), "::1/128");

        let iter = subnets(&cidr("10.0.0.0/24"), 28).unwrap();
        assert_eq!(iter.size_hint(), (16, Some(16)));
        assert_eq!(iter.count(), 16);
    }

    #[test]
    fn test_subnet_count() {
        assert_eq!(
            subnet_count(&cidr("::/0"), 128).unwrap(),
            BigUint::one() << 128
        );
        assert_eq!(
            subnet_count(&cidr("10.0.0.0/8"), 16).unwrap(),
            BigUint::from(256u32)
        );
    }

    #[test]
    fn test_parent_of() {
        assert_eq!(parent_of(&cidr("10.0.1.0/24")).unwrap(), cidr("10.0.0.0/23"));
        assert_eq!(
            parent_of(&cidr("2001:db8:0:1::/64")).unwrap(),
            cidr("2001:db8::/63")
        );
        assert!(matches!(
            parent_of(&cidr("0.0.0.0/0")),
            Err(Error::NoParent(_))
        ));
    }

    #[test]
    fn test_sibling_of() {
        assert_eq!(sibling_of(&cidr("10.0.0.0/24")).unwrap(), cidr("10.0.1.0/24"));
        assert_eq!(sibling_of(&cidr("10.0.1.0/24")).unwrap(), cidr("10.0.0.0/24"));
        assert_eq!(
            sibling_of(&cidr("2001:db8:0:1::/64")).unwrap(),
            cidr("2001:db8::/64")
        );
        assert_eq!(sibling_of(&cidr("::/1")).unwrap(), cidr("8000::/1"));
        assert!(sibling_of(&cidr("::/0")).is_err());
    }
}

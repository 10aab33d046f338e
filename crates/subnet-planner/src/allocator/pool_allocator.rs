//! Power-of-two pool division of a base range

use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::codec::format_address;
use crate::models::{AddressRange, Cidr, PoolRange};
use crate::range::prefix_for_at_least;

/// How a base range is shared between tenants
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolStrategy {
    /// Near-equal pools, larger ones first
    #[default]
    Even,
    /// One pool per demand, sized to fit it where space allows
    Demand,
}

/// Divides one base range into contiguous pools
///
/// Every pool is a power of two in size. When the base is itself an aligned
/// CIDR block, every pool is an aligned CIDR block too.
#[derive(Debug, Clone)]
pub struct PoolAllocator {
    base: AddressRange,
}

impl PoolAllocator {
    pub fn new(base: AddressRange) -> Self {
        Self { base }
    }

    pub fn for_cidr(cidr: &Cidr) -> Self {
        Self::new(cidr.range())
    }

    pub fn base(&self) -> &AddressRange {
        &self.base
    }

    /// Dispatch on `strategy`; `Even` only looks at the number of demands
    pub fn divide(&self, strategy: PoolStrategy, demands: &[BigUint]) -> Vec<PoolRange> {
        match strategy {
            PoolStrategy::Even => self.divide_even(demands.len()),
            PoolStrategy::Demand => self.divide_by_demand(demands),
        }
    }

    /// Split the base into exactly `count` pools with non-increasing sizes
    ///
    /// Each pool targets `remaining / pools_left` rounded up to a power of
    /// two, capped by the room left after reserving one address per later
    /// pool and by the previous pool's size. Returns an empty list when
    /// `count` is zero or exceeds the number of addresses in the base.
    pub fn divide_even(&self, count: usize) -> Vec<PoolRange> {
        if count == 0 {
            return Vec::new();
        }
        let base_size = self.base.size();
        if base_size < BigUint::from(count) {
            warn!(count, base = %self.base, "more pools requested than addresses");
            return Vec::new();
        }

        let mut remaining = base_size.clone();
        let mut previous = base_size;
        let mut sizes = Vec::with_capacity(count);
        for i in 0..count {
            let left = BigUint::from(count - i);
            let cap = &remaining - (&left - 1u32);
            let mut size = next_power_of_two(&(&remaining / &left));
            if size > cap {
                size = floor_power_of_two(&cap);
            }
            if size > previous {
                size = previous.clone();
            }
            if size.is_zero() {
                break;
            }
            remaining -= &size;
            previous = size.clone();
            sizes.push(size);
        }

        // Non-increasing sizes keep every pool aligned in input order
        let order: Vec<usize> = (0..sizes.len()).collect();
        let pools = self.place(&sizes, &order);
        debug!(pools = pools.len(), base = %self.base, "divided base evenly");
        pools
    }

    /// One pool per demand, each the next power of two at or above it
    ///
    /// A pool shrinks to the largest power of two that still leaves one
    /// address for every later demand, so the total never exceeds the base.
    /// Stops early when fewer addresses remain than demands left. Pools are
    /// returned in demand order; they are laid out largest first so each
    /// stays aligned.
    pub fn divide_by_demand(&self, demands: &[BigUint]) -> Vec<PoolRange> {
        let total = demands.len();
        let mut remaining = self.base.size();
        let mut sizes = Vec::with_capacity(total);
        for (i, demand) in demands.iter().enumerate() {
            let reserve = BigUint::from(total - i - 1);
            if remaining <= reserve {
                warn!(
                    placed = i,
                    requested = total,
                    base = %self.base,
                    "base exhausted before every demand was placed"
                );
                break;
            }
            let cap = &remaining - reserve;
            let ideal = next_power_of_two(demand);
            let size = if ideal <= cap {
                ideal
            } else {
                floor_power_of_two(&cap)
            };
            remaining -= &size;
            sizes.push(size);
        }

        let mut order: Vec<usize> = (0..sizes.len()).collect();
        order.sort_by(|&a, &b| sizes[b].cmp(&sizes[a]));
        let pools = self.place(&sizes, &order);
        debug!(pools = pools.len(), base = %self.base, "divided base by demand");
        pools
    }

    /// Lay pools out back to back in `order`, returning them by index
    fn place(&self, sizes: &[BigUint], order: &[usize]) -> Vec<PoolRange> {
        let mut slots: Vec<Option<PoolRange>> = vec![None; sizes.len()];
        let mut cursor = Some(self.base.start);
        for &index in order {
            let Some(start) = cursor else {
                break;
            };
            let Some(pool) = self.pool_at(start, &sizes[index]) else {
                warn!(
                    start = %format_address(start, self.base.version),
                    "pool does not fit in base"
                );
                break;
            };
            cursor = pool.end.checked_add(1);
            slots[index] = Some(pool);
        }
        slots.into_iter().flatten().collect()
    }

    fn pool_at(&self, start: u128, size: &BigUint) -> Option<PoolRange> {
        let span = (size - 1u32).to_u128()?;
        let end = start.checked_add(span)?;
        if end > self.base.end {
            return None;
        }
        let version = self.base.version;
        let prefix = prefix_for_at_least(size, version);
        Some(PoolRange {
            start,
            end,
            prefix,
            version,
            cidr: format!("{}/{}", format_address(start, version), prefix),
        })
    }
}

/// Smallest power of two `>= n`, with 0 and 1 both mapping to 1
fn next_power_of_two(n: &BigUint) -> BigUint {
    if *n <= BigUint::one() {
        return BigUint::one();
    }
    BigUint::one() << (n - 1u32).bits()
}

/// Largest power of two `<= n`, or 0 for 0
fn floor_power_of_two(n: &BigUint) -> BigUint {
    if n.is_zero() {
        return BigUint::zero();
    }
    BigUint::one() << (n.bits() - 1)
}

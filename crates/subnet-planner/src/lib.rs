//! Subnet Planner
//!
//! CIDR arithmetic and capacity planning for tenants sharing one base block:
//! - Address parsing and canonical formatting (IPv4 and IPv6)
//! - Exact range math with arbitrary-precision counts
//! - Subnet division, parent and sibling lookup
//! - Per-tenant block sizing with growth headroom
//! - Largest network count / hosts-per-network that still fits the base
//! - Power-of-two pool division of the base
//!
//! Features:
//! - Pure, synchronous functions over caller-owned snapshots
//! - Counts up to 2^128 carried exactly, never through floating point
//! - Serde models with counts as decimal strings

pub mod allocator;
pub mod codec;
pub mod config;
pub mod counts;
pub mod divider;
pub mod error;
pub mod models;
pub mod planner;
pub mod range;
pub mod sizing;

// Re-export core types
pub use allocator::{PoolAllocator, PoolStrategy};
pub use codec::{compress_ipv6, expand_ipv6, format_address, ip_version, parse_address};
pub use config::{PlanFile, PlannerConfig, SizingPolicy};
pub use counts::{
    compare_counts, format_count, format_count_text, pool_usage, sum_counts, total_ips_for_cidr,
    utilization_percent, PoolUsage,
};
pub use divider::{divide, divide_with_limit, parent_of, sibling_of, subnets, Subnets};
pub use error::{Error, Result};
pub use models::{
    AddressRange, Cidr, IpVersion, PoolRange, SizingResult, SubnetInfo, TenantSizingSpec,
};
pub use planner::{plan, PlanReport, TenantPlan};
pub use range::{
    netmask, parse_cidr, prefix_for_at_least, range_of, subnet_info, total_addresses,
    usable_addresses,
};
pub use sizing::{CapacityQuery, SizingEngine};

/// Address family constants
pub mod address_space {
    /// Bits in an IPv4 address
    pub const IPV4_BITS: u8 = 32;

    /// Bits in an IPv6 address
    pub const IPV6_BITS: u8 = 128;

    /// Largest IPv4 address value
    pub const IPV4_MAX: u128 = u32::MAX as u128;
}

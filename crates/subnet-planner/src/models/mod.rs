//! Data models for CIDR planning

mod cidr;
mod pool;
mod tenant;

pub use cidr::{AddressRange, Cidr, IpVersion, SubnetInfo};
pub use pool::PoolRange;
pub use tenant::{SizingResult, TenantSizingSpec};

//! Pool ranges carved from a base range

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use super::IpVersion;

/// One contiguous power-of-two slice of a base range assigned to a tenant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolRange {
    pub start: u128,
    pub end: u128,
    pub prefix: u8,
    pub version: IpVersion,
    /// `start/prefix` in address notation
    pub cidr: String,
}

impl PoolRange {
    /// Number of addresses in the pool
    pub fn size(&self) -> BigUint {
        BigUint::from(self.end - self.start) + 1u32
    }
}

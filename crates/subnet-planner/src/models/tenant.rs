//! Tenant (environment) sizing input and derived sizing results

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

/// Planning input for one tenant sharing a base block
///
/// Owned by the caller. The engine only reads it; out-of-range values are
/// normalized by the engine, never rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantSizingSpec {
    /// Tenant identifier, unique within a snapshot
    pub id: String,
    /// Number of equal-size subnets the tenant plans to carve
    #[serde(default = "default_networks")]
    pub networks: u64,
    /// Hosts needed in each subnet before growth
    #[serde(default = "default_hosts")]
    pub hosts_per_network: u64,
    /// Headroom added on top of the host count, in percent
    #[serde(default)]
    pub growth_percent: f64,
}

fn default_networks() -> u64 {
    1
}

fn default_hosts() -> u64 {
    8
}

impl TenantSizingSpec {
    /// Create a spec with no growth headroom
    pub fn new(id: impl Into<String>, networks: u64, hosts_per_network: u64) -> Self {
        Self {
            id: id.into(),
            networks,
            hosts_per_network,
            growth_percent: 0.0,
        }
    }

    pub fn with_growth(mut self, growth_percent: f64) -> Self {
        self.growth_percent = growth_percent;
        self
    }

    pub fn with_networks(&self, networks: u64) -> Self {
        Self {
            networks,
            ..self.clone()
        }
    }

    pub fn with_hosts(&self, hosts_per_network: u64) -> Self {
        Self {
            hosts_per_network,
            ..self.clone()
        }
    }
}

/// Sizing derived from a [`TenantSizingSpec`]
///
/// Recomputed on every call; counts that can exceed 2^64 are exact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizingResult {
    /// Prefix of each planned subnet
    pub subnet_prefix: u8,
    /// Prefix of the single block holding all planned subnets
    pub block_prefix: u8,
    /// Hosts per subnet after normalization and growth
    pub required_hosts_per_network: u64,
    /// `networks * required_hosts_per_network`
    #[serde(with = "crate::counts::decimal")]
    pub required_ips: BigUint,
    /// `networks * subnet_ips`
    #[serde(with = "crate::counts::decimal")]
    pub required_block_ips: BigUint,
    /// Addresses in the suggested block
    #[serde(with = "crate::counts::decimal")]
    pub usable_ips: BigUint,
    /// Addresses in each planned subnet
    #[serde(with = "crate::counts::decimal")]
    pub subnet_ips: BigUint,
}

impl SizingResult {
    /// Size of the suggested block
    pub fn block_size(&self) -> &BigUint {
        &self.usable_ips
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_defaults_from_toml() {
        let spec: TenantSizingSpec = toml::from_str(r#"id = "dev""#).unwrap();
        assert_eq!(spec.networks, 1);
        assert_eq!(spec.hosts_per_network, 8);
        assert_eq!(spec.growth_percent, 0.0);
    }

    #[test]
    fn test_spec_builders() {
        let spec = TenantSizingSpec::new("prod", 2, 64).with_growth(25.0);
        assert_eq!(spec.with_networks(4).networks, 4);
        assert_eq!(spec.with_hosts(128).hosts_per_network, 128);
        assert_eq!(spec.with_hosts(128).growth_percent, 25.0);
    }

    #[test]
    fn test_result_serializes_counts_as_strings() {
        let result = SizingResult {
            subnet_prefix: 64,
            block_prefix: 63,
            required_hosts_per_network: 8,
            required_ips: BigUint::from(16u32),
            required_block_ips: BigUint::from(1u32) << 65,
            usable_ips: BigUint::from(1u32) << 65,
            subnet_ips: BigUint::from(1u32) << 64,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["usable_ips"], "36893488147419103232");
        assert_eq!(json["subnet_ips"], "18446744073709551616");
        let back: SizingResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }
}

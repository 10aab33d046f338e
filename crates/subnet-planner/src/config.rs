//! Planner configuration
//!
//! Loaded from TOML. Every field has a default, so an empty file is a valid
//! configuration.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::allocator::PoolStrategy;
use crate::divider::DEFAULT_DIVIDE_LIMIT;
use crate::models::{Cidr, TenantSizingSpec};
use crate::{Error, Result};

/// Normalization and search constants for tenant sizing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizingPolicy {
    /// Floor applied to hosts-per-network
    #[serde(default = "default_min_hosts")]
    pub min_hosts: u64,
    /// Hosts-per-network is rounded down to a multiple of this
    #[serde(default = "default_host_step")]
    pub host_step: u64,
    /// Floor applied to the network count
    #[serde(default = "default_min_networks")]
    pub min_networks: u64,
    /// Upper bound for the hosts-per-network search
    #[serde(default = "default_max_host_search")]
    pub max_host_search: u64,
}

fn default_min_hosts() -> u64 {
    8
}
fn default_host_step() -> u64 {
    8
}
fn default_min_networks() -> u64 {
    1
}
fn default_max_host_search() -> u64 {
    1 << 30
}

impl Default for SizingPolicy {
    fn default() -> Self {
        Self {
            min_hosts: default_min_hosts(),
            host_step: default_host_step(),
            min_networks: default_min_networks(),
            max_host_search: default_max_host_search(),
        }
    }
}

impl SizingPolicy {
    /// Validates the policy.
    ///
    /// ## Errors
    ///
    /// - `Error::Config` if `host_step`, `min_hosts` or `min_networks` is zero
    /// - `Error::Config` if `min_hosts` is not a multiple of `host_step`
    /// - `Error::Config` if `max_host_search` is below `min_hosts`
    pub fn validate(&self) -> Result<()> {
        if self.host_step == 0 {
            return Err(Error::Config("host_step must be at least 1".to_string()));
        }
        if self.min_hosts == 0 {
            return Err(Error::Config("min_hosts must be at least 1".to_string()));
        }
        if self.min_hosts % self.host_step != 0 {
            return Err(Error::Config(format!(
                "min_hosts {} is not a multiple of host_step {}",
                self.min_hosts, self.host_step
            )));
        }
        if self.min_networks == 0 {
            return Err(Error::Config("min_networks must be at least 1".to_string()));
        }
        if self.max_host_search < self.min_hosts {
            return Err(Error::Config(format!(
                "max_host_search {} is below min_hosts {}",
                self.max_host_search, self.min_hosts
            )));
        }
        Ok(())
    }
}

/// Top-level planner configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default)]
    pub policy: SizingPolicy,
    /// Default log filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Cap on subnets materialized by a single division
    #[serde(default = "default_max_divide_subnets")]
    pub max_divide_subnets: usize,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_divide_subnets() -> usize {
    DEFAULT_DIVIDE_LIMIT
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            policy: SizingPolicy::default(),
            log_level: default_log_level(),
            max_divide_subnets: default_max_divide_subnets(),
        }
    }
}

impl PlannerConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        self.policy.validate()?;
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(Error::Config(format!(
                "invalid log level '{}', must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            )));
        }
        if self.max_divide_subnets == 0 {
            return Err(Error::Config(
                "max_divide_subnets must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// A caller snapshot: base block, pre-existing occupancy and tenants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanFile {
    pub base: Cidr,
    /// Addresses already taken in the base outside the listed tenants
    #[serde(default, with = "crate::counts::decimal")]
    pub occupied_ips: BigUint,
    #[serde(default)]
    pub strategy: PoolStrategy,
    #[serde(default)]
    pub tenants: Vec<TenantSizingSpec>,
}

impl PlanFile {
    /// Parse a TOML snapshot, rejecting duplicate tenant ids
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let plan: Self = toml::from_str(content)?;
        let mut seen = std::collections::HashSet::new();
        for tenant in &plan.tenants {
            if !seen.insert(tenant.id.as_str()) {
                return Err(Error::Config(format!("duplicate tenant id '{}'", tenant.id)));
            }
        }
        Ok(plan)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }
}

//! Sizing engine

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use tracing::{debug, instrument, warn};

use super::search::max_satisfying;
use super::CapacityQuery;
use crate::config::SizingPolicy;
use crate::models::{IpVersion, SizingResult, TenantSizingSpec};
use crate::range::{prefix_for_at_least, total_addresses_for};

/// Derives tenant sizing under a [`SizingPolicy`]
///
/// Holds no state beyond the policy; every method is a pure function of its
/// arguments.
#[derive(Debug, Clone, Default)]
pub struct SizingEngine {
    policy: SizingPolicy,
}

impl SizingEngine {
    pub fn new(policy: SizingPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &SizingPolicy {
        &self.policy
    }

    /// Floor-clamp to `min_hosts`, then round down to a multiple of `host_step`
    pub fn normalize_hosts(&self, hosts: u64) -> u64 {
        let step = self.policy.host_step.max(1);
        let raw = hosts.max(self.policy.min_hosts);
        (raw / step * step).max(self.policy.min_hosts)
    }

    pub fn normalize_networks(&self, networks: u64) -> u64 {
        networks.max(self.policy.min_networks)
    }

    /// Negative and non-finite growth counts as none
    pub fn normalize_growth(growth_percent: f64) -> f64 {
        if growth_percent.is_finite() {
            growth_percent.max(0.0)
        } else {
            0.0
        }
    }

    /// `ceil(normalized_hosts * (1 + growth / 100))`, at least 1
    pub fn required_hosts_per_subnet(&self, spec: &TenantSizingSpec) -> u64 {
        let hosts = self.normalize_hosts(spec.hosts_per_network);
        let growth = Self::normalize_growth(spec.growth_percent);
        if growth == 0.0 {
            return hosts.max(1);
        }
        // Float-to-int casts saturate
        let grown = (hosts as f64 * (1.0 + growth / 100.0)).ceil() as u64;
        grown.max(1)
    }

    /// Tightest power-of-two subnet holding the per-subnet demand
    pub fn subnet_prefix(&self, spec: &TenantSizingSpec, version: IpVersion) -> u8 {
        let needed = BigUint::from(self.required_hosts_per_subnet(spec));
        prefix_for_at_least(&needed, version)
    }

    /// Tightest single power-of-two block holding all planned subnets
    pub fn block_prefix(&self, spec: &TenantSizingSpec, version: IpVersion) -> u8 {
        let subnet_prefix = self.subnet_prefix(spec, version);
        let required = self.required_block_ips(spec, subnet_prefix, version);
        prefix_for_at_least(&required, version)
    }

    fn required_block_ips(
        &self,
        spec: &TenantSizingSpec,
        subnet_prefix: u8,
        version: IpVersion,
    ) -> BigUint {
        let networks = self.normalize_networks(spec.networks);
        BigUint::from(networks) * total_addresses_for(subnet_prefix, version)
    }

    /// Full sizing for one tenant
    pub fn suggest_block(&self, spec: &TenantSizingSpec, version: IpVersion) -> SizingResult {
        let networks = self.normalize_networks(spec.networks);
        let required_hosts_per_network = self.required_hosts_per_subnet(spec);
        let subnet_prefix =
            prefix_for_at_least(&BigUint::from(required_hosts_per_network), version);
        let required_block_ips = self.required_block_ips(spec, subnet_prefix, version);
        let block_prefix = prefix_for_at_least(&required_block_ips, version);

        SizingResult {
            subnet_prefix,
            block_prefix,
            required_hosts_per_network,
            required_ips: BigUint::from(networks) * required_hosts_per_network,
            required_block_ips,
            usable_ips: total_addresses_for(block_prefix, version),
            subnet_ips: total_addresses_for(subnet_prefix, version),
        }
    }

    /// Addresses consumed by the tenant's block
    pub fn block_size(&self, spec: &TenantSizingSpec, version: IpVersion) -> BigUint {
        total_addresses_for(self.block_prefix(spec, version), version)
    }

    /// Sum of every tenant's block size
    pub fn total_allocated_block_ips(
        &self,
        tenants: &[TenantSizingSpec],
        version: IpVersion,
    ) -> BigUint {
        tenants
            .iter()
            .map(|t| self.block_size(t, version))
            .sum()
    }

    /// `max(0, base - occupied - sum of sibling blocks)`
    pub fn remaining_capacity(&self, query: &CapacityQuery<'_>) -> BigUint {
        let version = query.version();
        let base_total = query.base().size();
        let siblings: BigUint = query
            .siblings()
            .map(|t| self.block_size(t, version))
            .sum();
        let used = query.occupied_ips() + siblings;
        if used >= base_total {
            BigUint::zero()
        } else {
            base_total - used
        }
    }

    /// Largest network count the target can request without exceeding capacity
    ///
    /// Returns at least `min_networks` even when nothing fits; callers check
    /// [`remaining_capacity`](Self::remaining_capacity) before treating the
    /// value as feasible.
    #[instrument(level = "debug", skip(self, query), fields(target = %query.target_id()))]
    pub fn max_networks(&self, query: &CapacityQuery<'_>) -> u64 {
        let min = self.policy.min_networks;
        let Some(target) = query.target() else {
            debug!("target tenant not in snapshot");
            return min;
        };
        let capacity = self.remaining_capacity(query);
        if capacity.is_zero() {
            warn!("no capacity left in base {}", query.base());
            return min;
        }

        let version = query.version();
        let base = TenantSizingSpec {
            hosts_per_network: self.normalize_hosts(target.hosts_per_network),
            growth_percent: Self::normalize_growth(target.growth_percent),
            ..target.clone()
        };
        let fits = |networks: u64| self.block_size(&base.with_networks(networks), version) <= capacity;

        // Every network costs at least one address
        let ceiling = capacity.to_u64().unwrap_or(u64::MAX).max(min);
        let start = self.normalize_networks(target.networks);
        let result = self.grow_then_search(min, start, ceiling, 1, fits);
        debug!(max_networks = result, capacity = %capacity, "computed network limit");
        result
    }

    /// Largest hosts-per-network (a multiple of `host_step`) the target can
    /// request without exceeding capacity
    ///
    /// Returns at least `min_hosts`; the search never goes past
    /// `max_host_search`.
    #[instrument(level = "debug", skip(self, query), fields(target = %query.target_id()))]
    pub fn max_hosts_per_network(&self, query: &CapacityQuery<'_>) -> u64 {
        let min = self.policy.min_hosts;
        let Some(target) = query.target() else {
            debug!("target tenant not in snapshot");
            return min;
        };
        let capacity = self.remaining_capacity(query);
        if capacity.is_zero() {
            warn!("no capacity left in base {}", query.base());
            return min;
        }

        let version = query.version();
        let base = TenantSizingSpec {
            networks: self.normalize_networks(target.networks),
            growth_percent: Self::normalize_growth(target.growth_percent),
            ..target.clone()
        };
        let fits = |hosts: u64| {
            let spec = base.with_hosts(self.normalize_hosts(hosts));
            self.block_size(&spec, version) <= capacity
        };

        let step = self.policy.host_step.max(1);
        let ceiling = (self.policy.max_host_search / step * step).max(min);
        let start = self.normalize_hosts(target.hosts_per_network).min(ceiling);
        let result = self.grow_then_search(min, start, ceiling, step, fits);
        debug!(max_hosts = result, capacity = %capacity, "computed host limit");
        result
    }

    /// Double from `start` until `fits` fails or `ceiling` is reached, then
    /// binary-search the boundary between the last fit and the first failure.
    fn grow_then_search<F>(&self, min: u64, start: u64, ceiling: u64, step: u64, mut fits: F) -> u64
    where
        F: FnMut(u64) -> bool,
    {
        if !fits(min) {
            return min;
        }
        let mut last_fit = min;
        let mut probe = start.clamp(min, ceiling);
        loop {
            if !fits(probe) {
                return max_satisfying(last_fit, probe - 1, step, &mut fits);
            }
            last_fit = probe;
            if probe >= ceiling {
                return probe;
            }
            probe = probe.saturating_mul(2).min(ceiling);
        }
    }
}

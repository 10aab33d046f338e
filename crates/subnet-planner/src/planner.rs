//! Whole-snapshot advisor report
//!
//! Runs every sizing and capacity query for each tenant in a snapshot and
//! lays the tenants out as pools in the base block.

use num_bigint::BigUint;
use num_traits::Zero;
use serde::Serialize;
use tracing::{debug, info};

use crate::allocator::{PoolAllocator, PoolStrategy};
use crate::config::PlanFile;
use crate::counts::{self, utilization_percent};
use crate::models::{Cidr, IpVersion, PoolRange, SizingResult, TenantSizingSpec};
use crate::sizing::{CapacityQuery, SizingEngine};

/// Sizing, limits and placement of one tenant
#[derive(Debug, Clone, Serialize)]
pub struct TenantPlan {
    pub id: String,
    pub sizing: SizingResult,
    /// Addresses left for this tenant once everyone else is placed
    #[serde(with = "counts::decimal")]
    pub remaining_ips: BigUint,
    pub max_networks: u64,
    pub max_hosts_per_network: u64,
    /// The tenant's block fits in what is left
    pub fits: bool,
    /// Pool assigned by the chosen strategy, if the base had room
    pub pool: Option<PoolRange>,
}

/// Advisor report over a whole snapshot
#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    pub base: Cidr,
    pub version: IpVersion,
    pub strategy: PoolStrategy,
    #[serde(with = "counts::decimal")]
    pub base_ips: BigUint,
    #[serde(with = "counts::decimal")]
    pub occupied_ips: BigUint,
    /// Sum of every tenant's block size
    #[serde(with = "counts::decimal")]
    pub allocated_ips: BigUint,
    #[serde(with = "counts::decimal")]
    pub available_ips: BigUint,
    pub utilization_percent: f64,
    /// Occupied plus allocated addresses overrun the base
    pub exceeds_base: bool,
    pub tenants: Vec<TenantPlan>,
}

/// Build the report for `tenants` sharing `base`
pub fn plan(
    base: &Cidr,
    tenants: &[TenantSizingSpec],
    occupied_ips: &BigUint,
    strategy: PoolStrategy,
    engine: &SizingEngine,
) -> PlanReport {
    let version = base.version();
    let base_ips = base.size();
    let allocated_ips = engine.total_allocated_block_ips(tenants, version);
    let used = occupied_ips + &allocated_ips;
    let exceeds_base = used > base_ips;
    let available_ips = if exceeds_base {
        BigUint::zero()
    } else {
        &base_ips - &used
    };

    let demands: Vec<BigUint> = tenants
        .iter()
        .map(|t| engine.block_size(t, version))
        .collect();
    let mut pools = PoolAllocator::for_cidr(base)
        .divide(strategy, &demands)
        .into_iter();

    let plans = tenants
        .iter()
        .zip(&demands)
        .map(|(tenant, block)| {
            let query = CapacityQuery::new(tenants, *base, &tenant.id)
                .with_occupied_ips(occupied_ips.clone());
            let remaining_ips = engine.remaining_capacity(&query);
            TenantPlan {
                id: tenant.id.clone(),
                sizing: engine.suggest_block(tenant, version),
                fits: !remaining_ips.is_zero() && *block <= remaining_ips,
                remaining_ips,
                max_networks: engine.max_networks(&query),
                max_hosts_per_network: engine.max_hosts_per_network(&query),
                pool: pools.next(),
            }
        })
        .collect::<Vec<_>>();

    let report = PlanReport {
        base: *base,
        version,
        strategy,
        utilization_percent: utilization_percent(&base_ips, &used),
        base_ips,
        occupied_ips: occupied_ips.clone(),
        allocated_ips,
        available_ips,
        exceeds_base,
        tenants: plans,
    };
    debug!(
        tenants = report.tenants.len(),
        exceeds_base = report.exceeds_base,
        "built plan report"
    );
    if report.exceeds_base {
        info!(base = %report.base, "tenant blocks overrun the base block");
    }
    report
}

/// [`plan`] over a loaded snapshot file
pub fn plan_file(file: &PlanFile, engine: &SizingEngine) -> PlanReport {
    plan(
        &file.base,
        &file.tenants,
        &file.occupied_ips,
        file.strategy,
        engine,
    )
}

//! End-to-end tests for subnet-planner
//!
//! Exercises the public API the way a planning UI drives it: parse a base
//! block, size tenants against it, query limits, and lay out pools.

use num_bigint::BigUint;
use num_traits::Zero;
use subnet_planner::{
    divide, format_address, parent_of, parse_address, parse_cidr, plan, sibling_of,
    total_addresses, usable_addresses, CapacityQuery, Error, IpVersion, PoolAllocator,
    PoolStrategy, SizingEngine, TenantSizingSpec,
};

fn three_small_tenants() -> Vec<TenantSizingSpec> {
    vec![
        TenantSizingSpec::new("alpha", 1, 8),
        TenantSizingSpec::new("beta", 1, 8),
        TenantSizingSpec::new("gamma", 1, 8),
    ]
}

// ============================================================================
// Range math
// ============================================================================

#[test]
fn test_total_addresses_known_values() {
    assert_eq!(
        total_addresses(24, IpVersion::V4).unwrap(),
        BigUint::from(256u32)
    );
    assert_eq!(
        total_addresses(64, IpVersion::V6).unwrap().to_string(),
        "18446744073709551616"
    );
    assert_eq!(
        total_addresses(8, IpVersion::V6).unwrap().to_string(),
        "1329227995784915872903807060280344576"
    );
    for prefix in 0..=32u8 {
        assert_eq!(
            total_addresses(prefix, IpVersion::V4).unwrap(),
            BigUint::from(1u64 << (32 - prefix))
        );
    }
    assert!(matches!(
        total_addresses(33, IpVersion::V4),
        Err(Error::PrefixOutOfRange { prefix: 33, .. })
    ));
}

#[test]
fn test_usable_addresses_reserve_only_v4() {
    assert_eq!(
        usable_addresses(24, IpVersion::V4).unwrap(),
        BigUint::from(254u32)
    );
    assert_eq!(
        usable_addresses(64, IpVersion::V6).unwrap(),
        total_addresses(64, IpVersion::V6).unwrap()
    );
}

#[test]
fn test_address_normalization() {
    let value = parse_address("2001:0db8:0000:0000:0000:0000:0000:0001", IpVersion::V6).unwrap();
    assert_eq!(format_address(value, IpVersion::V6), "2001:db8::1");
    let cidr = parse_cidr("10.1.2.3/16").unwrap();
    assert_eq!(cidr.to_string(), "10.1.0.0/16");
    assert!(parse_cidr("10.0.0.0").is_err());
    assert!(parse_cidr("300.0.0.0/8").is_err());
    assert!(parse_cidr("2001:db8::/129").is_err());
}

#[test]
fn test_navigation_round_trip() {
    let cidr = parse_cidr("192.168.4.0/22").unwrap();
    let parts = divide(&cidr, 24).unwrap();
    assert_eq!(parts.len(), 4);
    for part in &parts {
        assert!(cidr.contains(part));
        assert_eq!(sibling_of(&sibling_of(part).unwrap()).unwrap(), *part);
    }
    assert_eq!(parent_of(&parts[3]).unwrap().to_string(), "192.168.6.0/23");
}

// ============================================================================
// Sizing and capacity
// ============================================================================

#[test]
fn test_ipv6_sizing_examples() {
    let engine = SizingEngine::default();
    let one = engine.suggest_block(&TenantSizingSpec::new("a", 1, 8), IpVersion::V6);
    assert_eq!((one.subnet_prefix, one.block_prefix), (125, 125));
    assert_eq!(one.required_block_ips, BigUint::from(8u32));

    let two = engine.suggest_block(&TenantSizingSpec::new("a", 2, 8), IpVersion::V6);
    assert_eq!(two.block_prefix, 124);
    assert_eq!(two.required_block_ips, BigUint::from(16u32));
}

#[test]
fn test_three_tenants_in_slash_eight() {
    let engine = SizingEngine::default();
    let tenants = three_small_tenants();
    let base = parse_cidr("10.0.0.0/8").unwrap();

    for tenant in &tenants {
        let query = CapacityQuery::new(&tenants, base, &tenant.id);
        let block = engine.block_size(tenant, IpVersion::V4);
        assert!(block <= engine.remaining_capacity(&query));
        let max = engine.max_networks(&query);
        assert!(max > 100, "{} max_networks = {}", tenant.id, max);
        // 8 * n must stay a power of two inside 2^24 - 16
        assert_eq!(max, 1 << 20);
    }
}

#[test]
fn test_three_tenants_in_slash_twenty_eight() {
    let engine = SizingEngine::default();
    let tenants = three_small_tenants();
    let base = parse_cidr("10.0.0.0/28").unwrap();

    for tenant in &tenants {
        let query = CapacityQuery::new(&tenants, base, &tenant.id);
        assert!(engine.max_networks(&query) <= 16);
        assert!(engine.remaining_capacity(&query).is_zero());
    }
}

#[test]
fn test_what_if_override_and_occupancy() {
    let engine = SizingEngine::default();
    let tenants = three_small_tenants();
    let base = parse_cidr("10.0.0.0/24").unwrap();

    // 256 - 64 occupied - 16 for the siblings leaves 176 for alpha
    let query = CapacityQuery::new(&tenants, base, "alpha")
        .with_occupied_ips(BigUint::from(64u32));
    assert_eq!(engine.remaining_capacity(&query), BigUint::from(176u32));
    assert_eq!(engine.max_networks(&query), 16);
    assert_eq!(engine.max_hosts_per_network(&query), 128);

    let edited = TenantSizingSpec::new("alpha", 4, 8);
    let query = query.with_override(&edited);
    assert_eq!(engine.max_hosts_per_network(&query), 32);
}

// ============================================================================
// Pools and reports
// ============================================================================

#[test]
fn test_pools_for_tenant_blocks() {
    let engine = SizingEngine::default();
    let tenants = vec![
        TenantSizingSpec::new("web", 8, 200),
        TenantSizingSpec::new("db", 2, 16),
    ];
    let base = parse_cidr("172.16.0.0/16").unwrap();
    let demands: Vec<BigUint> = tenants
        .iter()
        .map(|t| engine.block_size(t, IpVersion::V4))
        .collect();
    let pools = PoolAllocator::for_cidr(&base).divide_by_demand(&demands);
    assert_eq!(pools[0].cidr, "172.16.0.0/21");
    assert_eq!(pools[1].cidr, "172.16.8.0/27");
}

#[test]
fn test_report_round_trips_through_json() {
    let base = parse_cidr("fd00::/56").unwrap();
    let tenants = three_small_tenants();
    let report = plan(
        &base,
        &tenants,
        &BigUint::zero(),
        PoolStrategy::Even,
        &SizingEngine::default(),
    );
    assert_eq!(report.tenants.len(), 3);
    assert!(report.tenants.iter().all(|t| t.fits && t.pool.is_some()));
    assert_eq!(report.tenants[0].pool.as_ref().unwrap().cidr, "fd00::/57");

    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"base_ips\":\"4722366482869645213696\""));
}

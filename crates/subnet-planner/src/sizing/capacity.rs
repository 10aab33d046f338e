//! Capacity query snapshot

use num_bigint::BigUint;

use crate::models::{Cidr, IpVersion, TenantSizingSpec};

/// One capacity question: how much room does `target_id` have in `base`,
/// given every other tenant in `tenants` as it stands right now?
///
/// The tenant list is treated as an atomic snapshot. Results are only valid
/// against the snapshot passed; re-query after every change.
#[derive(Debug, Clone)]
pub struct CapacityQuery<'a> {
    tenants: &'a [TenantSizingSpec],
    base: Cidr,
    target_id: &'a str,
    target_override: Option<&'a TenantSizingSpec>,
    occupied_ips: BigUint,
}

impl<'a> CapacityQuery<'a> {
    pub fn new(tenants: &'a [TenantSizingSpec], base: Cidr, target_id: &'a str) -> Self {
        Self {
            tenants,
            base,
            target_id,
            target_override: None,
            occupied_ips: BigUint::default(),
        }
    }

    /// Evaluate an uncommitted edit of the target instead of its stored spec
    pub fn with_override(mut self, spec: &'a TenantSizingSpec) -> Self {
        self.target_override = Some(spec);
        self
    }

    /// Addresses already taken in the base outside the tenant list
    pub fn with_occupied_ips(mut self, occupied_ips: BigUint) -> Self {
        self.occupied_ips = occupied_ips;
        self
    }

    pub fn tenants(&self) -> &'a [TenantSizingSpec] {
        self.tenants
    }

    pub fn base(&self) -> &Cidr {
        &self.base
    }

    pub fn version(&self) -> IpVersion {
        self.base.version()
    }

    pub fn occupied_ips(&self) -> &BigUint {
        &self.occupied_ips
    }

    /// Id whose stored spec is excluded from the sibling sum
    pub fn target_id(&self) -> &str {
        self.target_override
            .map(|spec| spec.id.as_str())
            .unwrap_or(self.target_id)
    }

    /// The spec being sized: the override if any, else the stored tenant
    pub fn target(&self) -> Option<&'a TenantSizingSpec> {
        self.target_override
            .or_else(|| self.tenants.iter().find(|t| t.id == self.target_id))
    }

    /// Every tenant other than the target
    pub fn siblings(&self) -> impl Iterator<Item = &'a TenantSizingSpec> + '_ {
        let target_id = self.target_id();
        self.tenants.iter().filter(move |t| t.id != target_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenants() -> Vec<TenantSizingSpec> {
        vec![
            TenantSizingSpec::new("a", 1, 8),
            TenantSizingSpec::new("b", 2, 16),
            TenantSizingSpec::new("c", 1, 32),
        ]
    }

    #[test]
    fn test_target_lookup() {
        let tenants = tenants();
        let base: Cidr = "10.0.0.0/24".parse().unwrap();
        let query = CapacityQuery::new(&tenants, base, "b");
        assert_eq!(query.target().unwrap().networks, 2);
        let siblings: Vec<&str> = query.siblings().map(|t| t.id.as_str()).collect();
        assert_eq!(siblings, vec!["a", "c"]);
        assert_eq!(query.version(), IpVersion::V4);
    }

    #[test]
    fn test_override_replaces_target() {
        let tenants = tenants();
        let edited = TenantSizingSpec::new("b", 8, 16);
        let base: Cidr = "10.0.0.0/24".parse().unwrap();
        let query = CapacityQuery::new(&tenants, base, "b").with_override(&edited);
        assert_eq!(query.target().unwrap().networks, 8);
        assert_eq!(query.siblings().count(), 2);
    }

    #[test]
    fn test_missing_target() {
        let tenants = tenants();
        let base: Cidr = "10.0.0.0/24".parse().unwrap();
        let query = CapacityQuery::new(&tenants, base, "zzz");
        assert!(query.target().is_none());
        assert_eq!(query.siblings().count(), 3);
    }
}

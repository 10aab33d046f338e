//! Pool allocation
//!
//! Carves a base range into contiguous power-of-two pools, one per tenant:
//! - evenly, front-loading larger pools
//! - by demand, sizing each pool to its tenant's requirement

mod pool_allocator;

pub use pool_allocator::{PoolAllocator, PoolStrategy};

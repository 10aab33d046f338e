//! Tenant sizing and capacity-bounded limits
//!
//! Derives per-tenant subnet and block prefixes from host demand, and the
//! largest network count or host count a tenant may request without pushing
//! the shared base block past capacity. Everything is a pure function of the
//! snapshot passed in; nothing is reserved.

mod capacity;
mod engine;
pub mod search;

pub use capacity::CapacityQuery;
pub use engine::SizingEngine;
pub use search::max_satisfying;

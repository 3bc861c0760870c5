//! Service layer for the freelancer catalog.
//! - `storage::FreelancerStore` is the backend-independent contract.
//! - `storage::memory` and `storage::airtable` are its two implementations.
//! - `storage::build_store` picks one from configuration at startup.

pub mod errors;
pub mod storage;

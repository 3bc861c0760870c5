//! Record schema for the freelancer catalog.
//! - `Freelancer` is the shape every backend hands back, defaults applied.
//! - `InsertFreelancer` / `FreelancerPatch` are the create and partial-update payloads.
//! - `validation` gates every write and reports all field problems at once.

pub mod errors;
pub mod freelancer;
pub mod validation;

pub use errors::ModelError;
pub use freelancer::{Freelancer, FreelancerFields, FreelancerPatch, InsertFreelancer};
pub use validation::{validate_insert, validate_partial};

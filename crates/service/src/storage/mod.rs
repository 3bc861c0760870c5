//! Storage abstractions for the service layer
//!
//! `FreelancerStore` is implemented by an in-process map (`memory`) and by
//! the Airtable REST adapter (`airtable`). Handlers only ever see the trait.

pub mod airtable;
pub mod memory;

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use configs::AirtableConfig;
use models::{Freelancer, FreelancerPatch, InsertFreelancer};
use serde::Serialize;
use tracing::info;

use crate::errors::ServiceError;

pub use airtable::{AirtableCredentials, AirtableStore};
pub use memory::MemoryStore;

/// Which backend a store talks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Memory,
    Airtable,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Memory => f.write_str("memory"),
            Backend::Airtable => f.write_str("airtable"),
        }
    }
}

/// One page of records plus the remote continuation token, if any.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FreelancerPage {
    pub list: Vec<Freelancer>,
    pub offset: Option<String>,
}

/// Backend-independent CRUD contract over freelancer records.
#[async_trait]
pub trait FreelancerStore: Send + Sync {
    fn backend(&self) -> Backend;

    /// One page of records. `offset` is a continuation token from a previous
    /// page; backends without paging ignore it.
    async fn list(&self, offset: Option<String>) -> Result<FreelancerPage, ServiceError>;

    /// Lookup by id; an unknown id is `Ok(None)`.
    async fn get(&self, id: &str) -> Result<Option<Freelancer>, ServiceError>;

    async fn create(&self, input: InsertFreelancer) -> Result<Freelancer, ServiceError>;

    async fn update(&self, id: &str, patch: FreelancerPatch) -> Result<Freelancer, ServiceError>;

    /// Returns whether a record was removed.
    async fn delete(&self, id: &str) -> Result<bool, ServiceError>;
}

/// Select the backend once from configuration: Airtable when both token and
/// base id are set, the in-memory map otherwise.
pub fn build_store(cfg: &AirtableConfig) -> Result<Arc<dyn FreelancerStore>, ServiceError> {
    match AirtableCredentials::from_config(cfg) {
        Some(creds) => {
            info!(backend = %Backend::Airtable, table = %creds.table, "using remote freelancer store");
            Ok(Arc::new(AirtableStore::new(creds)?))
        }
        None => {
            info!(backend = %Backend::Memory, "airtable credentials missing; using in-memory freelancer store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
